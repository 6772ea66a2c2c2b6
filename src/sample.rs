//! Value types shared by the stitching stages: positions, windows, regions and trims.

use std::fmt;
use std::ops::Range;

use crate::error::{Result, TrimError};

/// A column address inside a consensus window.
///
/// `major` is the reference coordinate, `minor` the insertion sub-index at that
/// coordinate (0 is the reference column itself). Field order gives the
/// lexicographic ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub major: i64,
    pub minor: i64,
}

impl Position {
    pub fn new(major: i64, minor: i64) -> Self {
        Position { major, minor }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.major, self.minor)
    }
}

/// A window of per-column consensus predictions along one reference sequence.
///
/// Only the coordinate arrays are carried here; per-column payloads stay with
/// whoever produced the window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sample {
    pub seq_id: i32,
    pub positions_major: Vec<i64>,
    pub positions_minor: Vec<i64>,
}

impl Sample {
    /// Builds a window, checking that both coordinate arrays have the same
    /// non-zero length and that positions are strictly increasing.
    pub fn try_new(
        seq_id: i32,
        positions_major: Vec<i64>,
        positions_minor: Vec<i64>,
    ) -> Result<Self> {
        if positions_major.len() != positions_minor.len() {
            return Err(TrimError::invalid_sample(format!(
                "major/minor length mismatch ({} vs {})",
                positions_major.len(),
                positions_minor.len()
            )));
        }
        if positions_major.is_empty() {
            return Err(TrimError::invalid_sample("window has no positions"));
        }

        let sample = Sample { seq_id, positions_major, positions_minor };
        for i in 1..sample.len() {
            if sample.position(i - 1) >= sample.position(i) {
                return Err(TrimError::invalid_sample(format!(
                    "positions not strictly increasing at index {}: {} then {}",
                    i,
                    sample.position(i - 1),
                    sample.position(i)
                )));
            }
        }
        Ok(sample)
    }

    pub fn len(&self) -> usize {
        self.positions_major.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions_major.is_empty()
    }

    pub fn position(&self, idx: usize) -> Position {
        Position::new(self.positions_major[idx], self.positions_minor[idx])
    }

    pub fn first_position(&self) -> Position {
        self.position(0)
    }

    pub fn last_position(&self) -> Position {
        self.position(self.len() - 1)
    }
}

/// Half-open interval `[start, end)` in major coordinates on one sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionInt {
    pub seq_id: i32,
    pub start: i64,
    pub end: i64,
}

impl RegionInt {
    pub fn new(seq_id: i32, start: i64, end: i64) -> Self {
        RegionInt { seq_id, start, end }
    }

    pub fn is_valid(&self) -> bool {
        self.seq_id >= 0 && self.start >= 0 && self.end > 0
    }
}

/// Trimmed index range `[start, end)` for one window.
///
/// `start == end == -1` marks a window excluded from the stitched output.
/// A single `-1` side is a boundary for which no split point was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimInfo {
    pub start: i64,
    pub end: i64,
    pub heuristic: bool,
}

impl TrimInfo {
    pub const EXCLUDED: i64 = -1;

    pub fn new(start: i64, end: i64, heuristic: bool) -> Self {
        TrimInfo { start, end, heuristic }
    }

    /// Untrimmed range covering a whole window of `len` columns.
    pub fn full(len: usize) -> Self {
        TrimInfo::new(0, len as i64, false)
    }

    pub fn exclude(&mut self) {
        self.start = Self::EXCLUDED;
        self.end = Self::EXCLUDED;
    }

    pub fn is_excluded(&self) -> bool {
        self.start == Self::EXCLUDED && self.end == Self::EXCLUDED
    }

    /// Index range to slice the window's per-column arrays with, if both
    /// boundaries were resolved and the range is non-empty.
    pub fn range(&self) -> Option<Range<usize>> {
        if self.start < 0 || self.end < 0 || self.start >= self.end {
            return None;
        }
        Some(self.start as usize..self.end as usize)
    }
}

impl Default for TrimInfo {
    fn default() -> Self {
        TrimInfo::new(0, 0, false)
    }
}

impl fmt::Display for TrimInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "start = {}, end = {}, heuristic = {}", self.start, self.end, self.heuristic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_order_by_major_then_minor() {
        assert!(Position::new(4, 3) < Position::new(5, 0));
        assert!(Position::new(4, 1) < Position::new(4, 2));
        assert_eq!(Position::new(2, 2), Position::new(2, 2));
    }

    #[test]
    fn try_new_accepts_valid_window() {
        let s = Sample::try_new(0, vec![0, 0, 1, 2], vec![0, 1, 0, 0]).unwrap();
        assert_eq!(s.len(), 4);
        assert_eq!(s.first_position(), Position::new(0, 0));
        assert_eq!(s.last_position(), Position::new(2, 0));
    }

    #[test]
    fn try_new_rejects_length_mismatch() {
        let err = Sample::try_new(0, vec![0, 1], vec![0]).unwrap_err();
        assert!(err.to_string().contains("length mismatch"));
    }

    #[test]
    fn try_new_rejects_empty_window() {
        assert!(Sample::try_new(0, vec![], vec![]).is_err());
    }

    #[test]
    fn try_new_rejects_unsorted_positions() {
        let err = Sample::try_new(0, vec![0, 1, 1], vec![0, 1, 0]).unwrap_err();
        assert!(err.to_string().contains("index 2"));
    }

    #[test]
    fn trim_info_range_and_sentinel() {
        assert_eq!(TrimInfo::new(1, 4, false).range(), Some(1..4));
        assert_eq!(TrimInfo::new(-1, 4, true).range(), None);

        let mut t = TrimInfo::full(7);
        assert_eq!(t, TrimInfo::new(0, 7, false));
        t.exclude();
        assert!(t.is_excluded());
        assert_eq!(t.range(), None);
    }

    #[test]
    fn trim_info_display() {
        assert_eq!(TrimInfo::new(0, 9, false).to_string(), "start = 0, end = 9, heuristic = false");
    }

    #[test]
    fn region_validity() {
        assert!(RegionInt::new(0, 0, 10).is_valid());
        assert!(!RegionInt::new(-1, 0, 10).is_valid());
        assert!(!RegionInt::new(0, -1, 10).is_valid());
        assert!(!RegionInt::new(0, 0, 0).is_valid());
    }
}
