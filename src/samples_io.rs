//! Tab-separated window tables, BED regions and trim output.
//!
//! Window lines are `contig<TAB>majors<TAB>minors` with comma-separated
//! integer lists. Contigs get sequence ids in order of first appearance.

use std::collections::HashMap;
use std::io::{BufRead, Read, Write};

use anyhow::{anyhow, bail, Context, Result};
use bio::io::bed;
use log::warn;

use crate::sample::{RegionInt, Sample, TrimInfo};

/// Windows read from a table, with the contig names behind their ids.
#[derive(Debug, Default, Clone)]
pub struct WindowTable {
    pub contigs: Vec<String>,
    pub samples: Vec<Sample>,
    ids: HashMap<String, i32>,
}

impl WindowTable {
    pub fn seq_id(&self, contig: &str) -> Option<i32> {
        self.ids.get(contig).copied()
    }

    pub fn contig_name(&self, seq_id: i32) -> &str {
        usize::try_from(seq_id)
            .ok()
            .and_then(|i| self.contigs.get(i))
            .map_or("*", String::as_str)
    }

    fn intern(&mut self, contig: &str) -> Result<i32> {
        if let Some(&id) = self.ids.get(contig) {
            return Ok(id);
        }
        let id: i32 = self.contigs.len().try_into().context("too many contigs")?;
        self.contigs.push(contig.to_string());
        self.ids.insert(contig.to_string(), id);
        Ok(id)
    }
}

fn parse_ints(field: &str, line_no: usize, what: &str) -> Result<Vec<i64>> {
    field
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<i64>()
                .with_context(|| format!("line {line_no}: invalid {what} value '{v}'"))
        })
        .collect()
}

/// Reads a window table. Blank lines and `#` comments are skipped.
pub fn read_windows<R: BufRead>(reader: R) -> Result<WindowTable> {
    let mut table = WindowTable::default();

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 3 {
            bail!("line {line_no}: expected 3 tab-separated fields, found {}", fields.len());
        }

        let seq_id = table.intern(fields[0])?;
        let major = parse_ints(fields[1], line_no, "major")?;
        let minor = parse_ints(fields[2], line_no, "minor")?;
        let sample =
            Sample::try_new(seq_id, major, minor).with_context(|| format!("line {line_no}"))?;
        table.samples.push(sample);
    }

    Ok(table)
}

/// Reads BED intervals, resolving contigs against `table`. Intervals on
/// contigs with no windows are skipped.
pub fn read_regions<R: Read>(reader: R, table: &WindowTable) -> Result<Vec<RegionInt>> {
    let mut bed_reader = bed::Reader::new(reader);
    let mut regions = Vec::new();

    for (i, record) in bed_reader.records().enumerate() {
        let record = record.with_context(|| format!("BED record {i} could not be parsed"))?;
        let Some(seq_id) = table.seq_id(record.chrom()) else {
            warn!("BED record {i}: contig '{}' has no windows, skipping", record.chrom());
            continue;
        };
        let start: i64 = record
            .start()
            .try_into()
            .with_context(|| format!("BED record {i} is invalid: unable to parse start"))?;
        let end: i64 = record
            .end()
            .try_into()
            .with_context(|| format!("BED record {i} is invalid: unable to parse end"))?;
        if end < start {
            return Err(anyhow!("BED record {i} is invalid: end < start"));
        }
        regions.push(RegionInt::new(seq_id, start, end));
    }

    Ok(regions)
}

/// One output row: the trim for window `window` (input order) on `seq_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimRow {
    pub seq_id: i32,
    pub window: usize,
    pub trim: TrimInfo,
}

pub fn write_trims<W: Write>(
    mut writer: W,
    table: &WindowTable,
    rows: &[TrimRow],
    skip_excluded: bool,
) -> Result<()> {
    writeln!(writer, "contig\twindow\tstart\tend\theuristic")?;
    for row in rows {
        if skip_excluded && row.trim.is_excluded() {
            continue;
        }
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}",
            table.contig_name(row.seq_id),
            row.window,
            row.trim.start,
            row.trim.end,
            row.trim.heuristic
        )?;
    }
    writer.flush()?;
    Ok(())
}
