//! Split-point search between two overlapping windows.
//!
//! When both windows agree on the column structure of their shared span the
//! overlap is cut in the middle. When they disagree (e.g. chunking changed
//! which reads contributed insertion columns) a split is searched for near the
//! middle of the overlap where both windows have the same number of columns at
//! one major coordinate.

use log::debug;

use crate::error::OverlapError;
use crate::relationship::{relative_position, Relationship};
use crate::sample::{Position, Sample};

/// Minimum number of distinct major coordinates each window needs inside the
/// overlap before the heuristic search is attempted.
const MIN_UNIQUE_MAJOR: usize = 3;

/// Where to cut two adjacent windows: `s1` keeps `[.., end_in_s1)` and `s2`
/// keeps `[start_in_s2, ..)`. Both are `-1` if no viable junction was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapSplit {
    pub end_in_s1: i64,
    pub start_in_s2: i64,
    pub heuristic: bool,
}

impl OverlapSplit {
    pub const UNRESOLVED: i64 = -1;

    fn new(end_in_s1: i64, start_in_s2: i64, heuristic: bool) -> Self {
        OverlapSplit { end_in_s1, start_in_s2, heuristic }
    }

    fn unresolved() -> Self {
        OverlapSplit::new(Self::UNRESOLVED, Self::UNRESOLVED, true)
    }

    pub fn is_resolved(&self) -> bool {
        self.end_in_s1 != Self::UNRESOLVED && self.start_in_s2 != Self::UNRESOLVED
    }
}

/// Index of the last position in `s` that is not past `target`, or `None` if
/// every position is past it.
fn find_left(s: &Sample, target: Position) -> Option<usize> {
    let n = (0..s.len()).take_while(|&i| s.position(i) <= target).count();
    n.checked_sub(1)
}

/// One past the index of the first position in `s` at or after `target`, or
/// `s.len()` if there is none.
fn find_right(s: &Sample, target: Position) -> usize {
    (0..s.len()).find(|&i| target <= s.position(i)).map_or(s.len(), |i| i + 1)
}

/// Number of runs of equal values in `values[start..end]`.
fn count_unique(values: &[i64], start: usize, end: usize) -> usize {
    if end <= start || end > values.len() {
        return 0;
    }
    1 + values[start..end].windows(2).filter(|w| w[0] != w[1]).count()
}

/// Length of the run of values equal to `values[start]`.
fn streak_count(values: &[i64], start: usize) -> usize {
    match values.get(start) {
        Some(&v) => values[start..].iter().take_while(|&&x| x == v).count(),
        None => 0,
    }
}

/// Index of the first value not less than `value` in a non-decreasing slice.
/// `value` may lie outside the `i64` range.
fn lower_bound(values: &[i64], value: i128) -> usize {
    values.partition_point(|&x| i128::from(x) < value)
}

fn exact_split(
    s1: &Sample,
    s2: &Sample,
    ovl_start_in_s1: usize,
    ovl_end_in_s2: usize,
) -> Option<OverlapSplit> {
    if s1.positions_minor[ovl_start_in_s1..] != s2.positions_minor[..ovl_end_in_s2] {
        return None;
    }

    // Both overlap spans have the same length here.
    let overlap_len = ovl_end_in_s2;
    let pad_1 = overlap_len / 2;
    let pad_2 = overlap_len - pad_1;
    let end_in_s1 = ovl_start_in_s1 + pad_1;
    let start_in_s2 = ovl_end_in_s2 - pad_2;

    if (end_in_s1 - ovl_start_in_s1) + (ovl_end_in_s2 - start_in_s2) != overlap_len {
        return None;
    }
    Some(OverlapSplit::new(end_in_s1 as i64, start_in_s2 as i64, false))
}

fn heuristic_split(
    s1: &Sample,
    s2: &Sample,
    ovl_start_in_s1: usize,
    ovl_end_in_s2: usize,
) -> OverlapSplit {
    let major1 = &s1.positions_major;
    let major2 = &s2.positions_major;

    let unique_s1 = count_unique(major1, ovl_start_in_s1, major1.len());
    let unique_s2 = count_unique(major2, 0, ovl_end_in_s2);
    if unique_s1 <= MIN_UNIQUE_MAJOR || unique_s2 <= MIN_UNIQUE_MAJOR {
        debug!(
            "Overlap too short for a heuristic split ({unique_s1} and {unique_s2} major positions)"
        );
        return OverlapSplit::unresolved();
    }

    // Widened so the search can step past either end of the coordinate range.
    let start = i128::from(major1[ovl_start_in_s1]);
    let end = i128::from(major1[major1.len() - 1]);
    let mid = start + (end - start) / 2;

    let mut offset: i128 = 1;
    while mid + offset <= end || mid - offset >= start {
        for test in [mid + offset, mid - offset] {
            let left = lower_bound(major1, test);
            let right = lower_bound(major2, test);
            if left < major1.len()
                && right < major2.len()
                && streak_count(major1, left) == streak_count(major2, right)
            {
                return OverlapSplit::new(left as i64, right as i64, true);
            }
        }
        offset += 1;
    }

    OverlapSplit::unresolved()
}

/// Finds the indices at which to cut `s1` and `s2` so their concatenation
/// covers the shared span exactly once.
///
/// Only forward-abutted and forward-overlapping windows can be split; any other
/// relationship is an error. An overlap with no viable junction is not an
/// error and comes back as an unresolved split.
pub fn overlap_indices(s1: &Sample, s2: &Sample) -> Result<OverlapSplit, OverlapError> {
    match relative_position(s1, s2) {
        Relationship::ForwardAbutted => return Ok(OverlapSplit::new(s1.len() as i64, 0, false)),
        Relationship::ForwardOverlap => {}
        rel => return Err(OverlapError::UnexpectedRelationship(rel)),
    }

    let ovl_start_in_s1 =
        find_left(s1, s2.first_position()).ok_or(OverlapError::MissingCoordinates)?;
    let ovl_end_in_s2 = find_right(s2, s1.last_position());

    if let Some(split) = exact_split(s1, s2, ovl_start_in_s1, ovl_end_in_s2) {
        return Ok(split);
    }

    debug!(
        "Overlap structure differs between windows ({} vs {} columns), \
         searching for a heuristic split",
        s1.len() - ovl_start_in_s1,
        ovl_end_in_s2
    );
    Ok(heuristic_split(s1, s2, ovl_start_in_s1, ovl_end_in_s2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample(major: &[i64], minor: &[i64]) -> Sample {
        Sample::try_new(0, major.to_vec(), minor.to_vec()).unwrap()
    }

    #[test]
    fn find_left_and_right_bracket_the_overlap() {
        let s1 = sample(&[0, 0, 1, 2, 2, 2, 3, 4, 4, 4, 4], &[0, 1, 0, 0, 1, 2, 0, 0, 1, 2, 3]);
        let s2 = sample(&[4, 4, 4, 4, 5, 6, 6, 7], &[1, 2, 3, 5, 0, 0, 1, 0]);
        assert_eq!(find_left(&s1, s2.first_position()), Some(8));
        assert_eq!(find_right(&s2, s1.last_position()), 3);
        assert_eq!(find_left(&s2, Position::new(0, 0)), None);
    }

    #[rstest]
    #[case(&[1, 1, 2, 3, 3, 3], 0, 6, 3)]
    #[case(&[1, 1, 2, 3, 3, 3], 2, 4, 2)]
    #[case(&[5], 0, 1, 1)]
    #[case(&[1, 2], 1, 1, 0)]
    #[case(&[1, 2], 0, 3, 0)]
    fn counts_unique_runs(
        #[case] values: &[i64],
        #[case] start: usize,
        #[case] end: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(count_unique(values, start, end), expected);
    }

    #[rstest]
    #[case(&[1, 1, 2, 3, 3, 3], 0, 2)]
    #[case(&[1, 1, 2, 3, 3, 3], 1, 1)]
    #[case(&[1, 1, 2, 3, 3, 3], 3, 3)]
    #[case(&[1, 1, 2, 3, 3, 3], 6, 0)]
    fn counts_streaks(#[case] values: &[i64], #[case] start: usize, #[case] expected: usize) {
        assert_eq!(streak_count(values, start), expected);
    }

    #[test]
    fn abutted_windows_split_at_boundary() {
        let s1 = sample(&[0, 1, 2], &[0, 0, 0]);
        let s2 = sample(&[3, 4], &[0, 0]);
        assert_eq!(overlap_indices(&s1, &s2), Ok(OverlapSplit::new(3, 0, false)));
    }

    #[test]
    fn congruent_overlap_splits_at_midpoint() {
        let s1 = sample(&[0, 0, 1, 2, 2, 2, 3, 4, 4, 4, 4], &[0, 1, 0, 0, 1, 2, 0, 0, 1, 2, 3]);
        let s2 = sample(&[4, 4, 4, 4, 5, 6, 6, 7], &[1, 2, 3, 5, 0, 0, 1, 0]);
        assert_eq!(overlap_indices(&s1, &s2), Ok(OverlapSplit::new(9, 1, false)));
    }

    #[test]
    fn odd_overlap_gives_extra_column_to_second_window() {
        let s1 = sample(&[0, 1, 2, 3, 4], &[0, 0, 0, 0, 0]);
        let s2 = sample(&[2, 3, 4, 5], &[0, 0, 0, 0]);
        // Overlap is columns 2..=4: s1 keeps major 2, s2 keeps 3 and 4.
        assert_eq!(overlap_indices(&s1, &s2), Ok(OverlapSplit::new(3, 1, false)));
    }

    #[test]
    fn incongruent_overlap_uses_matching_streaks() {
        // s1 has two insertion columns at major 4, s2 only one.
        let s1 = sample(&[0, 1, 2, 3, 4, 4, 4, 5, 6, 7, 8], &[0, 0, 0, 0, 0, 1, 2, 0, 0, 0, 0]);
        let s2 = sample(&[2, 3, 4, 4, 5, 6, 7, 8, 9, 10], &[0, 0, 0, 1, 0, 0, 0, 0, 0, 0]);
        let split = overlap_indices(&s1, &s2).unwrap();
        assert!(split.heuristic);
        // mid = 5; 6 is tried first and has single columns in both windows.
        assert_eq!(split, OverlapSplit::new(8, 5, true));
        assert_eq!(s1.positions_major[8], 6);
        assert_eq!(s2.positions_major[5], 6);
    }

    #[test]
    fn heuristic_search_falls_below_midpoint_when_above_differs() {
        // Overlap spans majors 2..=6, mid = 4. Major 5 differs in column count,
        // major 3 does not.
        let s1 = sample(&[0, 1, 2, 3, 4, 4, 5, 5, 6], &[0, 0, 0, 0, 0, 1, 0, 1, 0]);
        let s2 = sample(&[2, 3, 4, 5, 6, 7], &[0, 0, 0, 0, 0, 0]);
        let split = overlap_indices(&s1, &s2).unwrap();
        assert_eq!(split, OverlapSplit::new(3, 1, true));
    }

    #[test]
    fn short_incongruent_overlap_is_unresolved() {
        let s1 = sample(&[0, 1, 2, 2, 3], &[0, 0, 0, 1, 0]);
        let s2 = sample(&[2, 3, 4], &[0, 0, 0]);
        let split = overlap_indices(&s1, &s2).unwrap();
        assert!(!split.is_resolved());
        assert_eq!(split, OverlapSplit::new(-1, -1, true));
    }

    #[test]
    fn heuristic_without_matching_streak_is_unresolved() {
        // Every major in the overlap has a different column count in each window.
        let s1 = sample(&[0, 0, 1, 1, 2, 2, 3, 3, 4, 4], &[0, 1, 0, 1, 0, 1, 0, 1, 0, 1]);
        let s2 = sample(&[1, 2, 3, 4, 5], &[0, 0, 0, 0, 0]);
        let split = overlap_indices(&s1, &s2).unwrap();
        assert_eq!(split, OverlapSplit::new(-1, -1, true));
    }

    #[test]
    fn heuristic_search_at_end_of_coordinate_range_is_unresolved() {
        // Same column-count mismatch as above, ending at the largest major.
        let k = i64::MAX - 4;
        let s1 = sample(
            &[k, k, k + 1, k + 1, k + 2, k + 2, k + 3, k + 3, i64::MAX, i64::MAX],
            &[0, 1, 0, 1, 0, 1, 0, 1, 0, 1],
        );
        let s2 = sample(&[k + 1, k + 2, k + 3, i64::MAX, i64::MAX, i64::MAX], &[0, 0, 0, 0, 1, 2]);
        let split = overlap_indices(&s1, &s2).unwrap();
        assert_eq!(split, OverlapSplit::new(-1, -1, true));
    }

    #[test]
    fn heuristic_search_at_start_of_coordinate_range_finds_split() {
        let k = i64::MIN;
        let s1 = sample(
            &[k, k + 1, k + 2, k + 3, k + 4, k + 4, k + 4, k + 5, k + 6, k + 7, k + 8],
            &[0, 0, 0, 0, 0, 1, 2, 0, 0, 0, 0],
        );
        let s2 = sample(
            &[k + 2, k + 3, k + 4, k + 4, k + 5, k + 6, k + 7, k + 8, k + 9, k + 10],
            &[0, 0, 0, 1, 0, 0, 0, 0, 0, 0],
        );
        assert_eq!(overlap_indices(&s1, &s2), Ok(OverlapSplit::new(8, 5, true)));
    }

    #[rstest]
    #[case(Relationship::ReverseOverlap, &[4, 5, 6], &[0, 1, 2, 3, 4, 5])]
    #[case(Relationship::ForwardGapped, &[0, 1], &[5, 6])]
    #[case(Relationship::S2WithinS1, &[0, 1, 2, 3], &[1, 2])]
    fn rejects_non_forward_relationships(
        #[case] rel: Relationship,
        #[case] major1: &[i64],
        #[case] major2: &[i64],
    ) {
        let s1 = sample(major1, &vec![0; major1.len()]);
        let s2 = sample(major2, &vec![0; major2.len()]);
        assert_eq!(overlap_indices(&s1, &s2), Err(OverlapError::UnexpectedRelationship(rel)));
    }
}
