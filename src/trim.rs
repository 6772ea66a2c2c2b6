//! Stitching of ordered consensus windows into non-overlapping trims.

use std::borrow::Borrow;

use log::{debug, trace};

use crate::error::{Result, TrimError};
use crate::overlap::overlap_indices;
use crate::relationship::{relative_position, Relationship};
use crate::sample::{RegionInt, Sample, TrimInfo};

fn check_shape(sample: &Sample, index: usize) -> Result<()> {
    if sample.positions_major.len() != sample.positions_minor.len() {
        return Err(TrimError::invalid_sample(format!(
            "sample {index} has {} major but {} minor positions",
            sample.positions_major.len(),
            sample.positions_minor.len()
        )));
    }
    if sample.is_empty() {
        return Err(TrimError::invalid_sample(format!("sample {index} has no positions")));
    }
    Ok(())
}

/// Computes one trim per window so that the trimmed windows tile each
/// reference sequence without overlap, then optionally clips to `region`.
///
/// Windows must be sorted by position within each sequence. Accepts both
/// owned windows (`&[Sample]`) and borrowed views (`&[&Sample]`), so callers
/// can reorder or filter without copying window contents.
///
/// A window fully contained in the previous kept window is left untrimmed and
/// does not move the kept boundary. A boundary with no clean split point is
/// reported as `-1` on the affected side rather than as an error.
pub fn trim_samples<S: Borrow<Sample>>(
    samples: &[S],
    region: Option<RegionInt>,
) -> Result<Vec<TrimInfo>> {
    if samples.is_empty() {
        return Ok(Vec::new());
    }
    for (i, sample) in samples.iter().enumerate() {
        check_shape(sample.borrow(), i)?;
    }

    let mut result = vec![TrimInfo::default(); samples.len()];
    result[0] = TrimInfo::full(samples[0].borrow().len());

    let mut idx_kept = 0usize;
    let mut num_heuristic = 0usize;

    for i in 1..samples.len() {
        let s1 = samples[idx_kept].borrow();
        let s2 = samples[i].borrow();
        result[i] = TrimInfo::full(s2.len());

        match relative_position(s1, s2) {
            Relationship::S2WithinS1 => {
                debug!("Sample {i} is contained in sample {idx_kept}, keeping boundary");
                continue;
            }
            Relationship::ForwardGapped | Relationship::DifferentRefName => {}
            _ => {
                let split = overlap_indices(s1, s2)
                    .map_err(|e| TrimError::from_overlap(e, idx_kept, i))?;
                result[idx_kept].end = split.end_in_s1;
                result[i].start = split.start_in_s2;
                if split.heuristic {
                    result[idx_kept].heuristic = true;
                    result[i].heuristic = true;
                    num_heuristic += 1;
                }
            }
        }

        idx_kept = i;
    }

    // The last window has no successor to trim it.
    if let (Some(last), Some(trim)) = (samples.last(), result.last_mut()) {
        trim.end = last.borrow().len() as i64;
    }

    match region {
        Some(region) => {
            trace!("[trim_samples] Trimming to region.");
            clip_to_region(samples, &mut result, &region)?;
        }
        None => trace!("[trim_samples] Not trimming to region."),
    }

    trace!("[trim_samples] num_heuristic = {num_heuristic}");

    Ok(result)
}

/// Same as [`trim_samples`] for a sequence of optional references, failing on
/// the first missing one.
pub fn trim_sample_refs(
    samples: &[Option<&Sample>],
    region: Option<RegionInt>,
) -> Result<Vec<TrimInfo>> {
    let refs = samples
        .iter()
        .enumerate()
        .map(|(index, s)| s.ok_or(TrimError::InvalidInput { index }))
        .collect::<Result<Vec<&Sample>>>()?;
    trim_samples(&refs, region)
}

/// Restricts existing trims to the major-coordinate interval of `region`.
///
/// Windows on another sequence, or with no columns left inside the region, are
/// marked excluded. Sides already set to `-1` by an unresolved overlap are left
/// as they are. Every other side must lie within its window.
pub(crate) fn clip_to_region<S: Borrow<Sample>>(
    samples: &[S],
    trims: &mut [TrimInfo],
    region: &RegionInt,
) -> Result<()> {
    if !region.is_valid() {
        return Err(TrimError::InvalidRegion {
            seq_id: region.seq_id,
            start: region.start,
            end: region.end,
        });
    }
    if samples.len() != trims.len() {
        return Err(TrimError::invalid_sample(format!(
            "{} samples but {} trims",
            samples.len(),
            trims.len()
        )));
    }
    for (i, (sample, trim)) in samples.iter().zip(trims.iter()).enumerate() {
        let len = sample.borrow().len() as i64;
        let in_bounds = |side: i64| side == TrimInfo::EXCLUDED || (0..=len).contains(&side);
        if !in_bounds(trim.start) || !in_bounds(trim.end) {
            return Err(TrimError::invalid_sample(format!(
                "trim {i} ({trim}) is out of bounds for a sample of {len} positions"
            )));
        }
    }

    for (sample, trim) in samples.iter().zip(trims.iter_mut()) {
        let sample = sample.borrow();
        if sample.seq_id != region.seq_id {
            trim.exclude();
            continue;
        }

        let major = &sample.positions_major;
        let num_positions = major.len() as i64;

        if trim.start >= 0 {
            while trim.start < num_positions && major[trim.start as usize] < region.start {
                trim.start += 1;
            }
            if trim.start >= num_positions {
                trim.exclude();
                continue;
            }
        }

        if trim.end >= 0 {
            // End is exclusive.
            while trim.end > 0 && major[(trim.end - 1) as usize] >= region.end {
                trim.end -= 1;
            }
            if trim.end <= 0 {
                trim.exclude();
                continue;
            }
        }

        if trim.start >= 0 && trim.end >= 0 && trim.start >= trim.end {
            trim.exclude();
        }
    }

    Ok(())
}
