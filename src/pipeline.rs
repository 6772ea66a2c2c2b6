//! Runs the trimmer over a whole window table, one independent run per contig
//! or per region, in parallel.

use std::collections::BTreeMap;

use log::info;
use rayon::prelude::*;

use crate::error::Result;
use crate::sample::{RegionInt, Sample};
use crate::samples_io::{TrimRow, WindowTable};
use crate::trim::trim_samples;

/// Input indices of the windows on each sequence, in input order.
fn windows_by_contig(samples: &[Sample]) -> BTreeMap<i32, Vec<usize>> {
    let mut groups: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (i, sample) in samples.iter().enumerate() {
        groups.entry(sample.seq_id).or_default().push(i);
    }
    groups
}

fn trim_indices(
    samples: &[Sample],
    indices: &[usize],
    region: Option<RegionInt>,
) -> Result<Vec<TrimRow>> {
    let view: Vec<&Sample> = indices.iter().map(|&i| &samples[i]).collect();
    let trims = trim_samples(&view, region)?;
    Ok(indices
        .iter()
        .zip(trims)
        .map(|(&window, trim)| TrimRow { seq_id: samples[window].seq_id, window, trim })
        .collect())
}

/// Trims every contig's windows independently, rows ordered by contig id.
pub fn trim_by_contig(table: &WindowTable) -> Result<Vec<TrimRow>> {
    let groups: Vec<(i32, Vec<usize>)> = windows_by_contig(&table.samples).into_iter().collect();
    info!("Trimming {} windows on {} contigs", table.samples.len(), groups.len());

    let per_contig = groups
        .par_iter()
        .map(|(_, indices)| trim_indices(&table.samples, indices, None))
        .collect::<Result<Vec<_>>>()?;
    Ok(per_contig.into_iter().flatten().collect())
}

/// Trims the windows of each region's contig to that region, rows ordered by
/// region.
pub fn trim_by_region(table: &WindowTable, regions: &[RegionInt]) -> Result<Vec<TrimRow>> {
    let groups = windows_by_contig(&table.samples);
    info!("Trimming {} windows to {} regions", table.samples.len(), regions.len());

    let per_region = regions
        .par_iter()
        .map(|region| match groups.get(&region.seq_id) {
            Some(indices) => trim_indices(&table.samples, indices, Some(*region)),
            None => Ok(Vec::new()),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(per_region.into_iter().flatten().collect())
}
