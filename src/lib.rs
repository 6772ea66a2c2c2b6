//! Stitching of overlapping consensus windows.
//!
//! Consensus is predicted in overlapping windows along each reference
//! sequence. [`trim_samples`] decides, for an ordered run of windows, which
//! index range of each window to keep so the kept ranges tile the reference
//! without duplication, optionally restricted to a region.

pub mod error;
pub mod io_utils;
pub mod overlap;
pub mod pipeline;
pub mod relationship;
pub mod sample;
pub mod samples_io;
pub mod trim;

pub use error::{OverlapError, Result, TrimError};
pub use overlap::{overlap_indices, OverlapSplit};
pub use relationship::{relative_position, Relationship};
pub use sample::{Position, RegionInt, Sample, TrimInfo};
pub use trim::{trim_sample_refs, trim_samples};
