//! Error types for window stitching.

use thiserror::Error;

use crate::relationship::Relationship;

pub type Result<T> = std::result::Result<T, TrimError>;

/// Failures raised while resolving the split point between two windows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlapError {
    #[error("Cannot overlap samples! Relationship is not FORWARD_OVERLAP. rel = {0}")]
    UnexpectedRelationship(Relationship),

    #[error("Samples should be overlapping, but cannot find adequate coordinate positions!")]
    MissingCoordinates,
}

/// Error type for `trim_samples` and the window constructors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrimError {
    /// A window reference in the input sequence was missing.
    #[error("Missing sample provided to trim_samples at index {index}")]
    InvalidInput { index: usize },

    /// Adjacent windows are not in forward order.
    #[error(
        "Unhandled overlap type whilst stitching chunks: relationship {relationship} \
         between sample {kept} and sample {index}"
    )]
    UnsupportedRelationship {
        relationship: Relationship,
        kept: usize,
        index: usize,
    },

    /// Windows overlap but the overlap could not be located.
    #[error("Unhandled overlap type whilst stitching chunks {kept} and {index}. Message: {source}")]
    UnresolvableOverlap {
        kept: usize,
        index: usize,
        #[source]
        source: OverlapError,
    },

    #[error(
        "Region trimming coordinates are not valid. \
         seq_id = {seq_id}, start = {start}, end = {end}"
    )]
    InvalidRegion { seq_id: i32, start: i64, end: i64 },

    #[error("Invalid sample: {reason}")]
    InvalidSample { reason: String },
}

impl TrimError {
    pub fn invalid_sample(reason: impl Into<String>) -> Self {
        Self::InvalidSample { reason: reason.into() }
    }

    /// Attaches the indices of the two windows being stitched to a resolver failure.
    pub(crate) fn from_overlap(err: OverlapError, kept: usize, index: usize) -> Self {
        match err {
            OverlapError::UnexpectedRelationship(relationship) => {
                Self::UnsupportedRelationship { relationship, kept, index }
            }
            source => Self::UnresolvableOverlap { kept, index, source },
        }
    }
}
