//! Geometric relationship between two windows.

use std::cmp::Reverse;
use std::fmt;

use crate::sample::Sample;

/// How the second of two windows sits relative to the first.
///
/// `Forward*` variants mean the windows were given in ascending order,
/// `Reverse*` that the second actually starts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relationship {
    DifferentRefName,
    ForwardOverlap,
    ReverseOverlap,
    ForwardAbutted,
    ReverseAbutted,
    ForwardGapped,
    ReverseGapped,
    S2WithinS1,
    S1WithinS2,
    Unknown,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::DifferentRefName => "DIFFERENT_REF_NAME",
            Relationship::ForwardOverlap => "FORWARD_OVERLAP",
            Relationship::ReverseOverlap => "REVERSE_OVERLAP",
            Relationship::ForwardAbutted => "FORWARD_ABUTTED",
            Relationship::ReverseAbutted => "REVERSE_ABUTTED",
            Relationship::ForwardGapped => "FORWARD_GAPPED",
            Relationship::ReverseGapped => "REVERSE_GAPPED",
            Relationship::S2WithinS1 => "S2_WITHIN_S1",
            Relationship::S1WithinS2 => "S1_WITHIN_S2",
            Relationship::Unknown => "UNKNOWN",
        }
    }

    fn oriented(is_ordered: bool, forward: Relationship, reverse: Relationship) -> Relationship {
        if is_ordered {
            forward
        } else {
            reverse
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Predicates below assume `s1` starts no later than `s2`. Coordinates may sit
// at `i64::MAX`, so successors are taken with `checked_add`.

fn is_successor(next: i64, prev: i64) -> bool {
    prev.checked_add(1) == Some(next)
}

fn is_past_successor(next: i64, prev: i64) -> bool {
    prev.checked_add(1).is_some_and(|succ| next > succ)
}

fn ordered_contained(s1: &Sample, s2: &Sample) -> bool {
    s2.first_position() >= s1.first_position() && s2.last_position() <= s1.last_position()
}

fn ordered_abuts(s1: &Sample, s2: &Sample) -> bool {
    let end = s1.last_position();
    let start = s2.first_position();
    (is_successor(start.major, end.major) && start.minor == 0)
        || (start.major == end.major && is_successor(start.minor, end.minor))
}

fn ordered_overlaps(s1: &Sample, s2: &Sample) -> bool {
    let end = s1.last_position();
    let start = s2.first_position();
    start.major < end.major || (start.major == end.major && start.minor <= end.minor)
}

fn ordered_gapped(s1: &Sample, s2: &Sample) -> bool {
    let end = s1.last_position();
    let start = s2.first_position();
    is_past_successor(start.major, end.major)
        || (start.major > end.major && start.minor > 0)
        || (start.major == end.major && is_past_successor(start.minor, end.minor))
}

/// Classifies how `s2` sits relative to `s1`.
///
/// Windows are ordered by first position, ties going to the longer window.
/// Both windows must be non-empty.
pub fn relative_position(s1: &Sample, s2: &Sample) -> Relationship {
    if s1.seq_id != s2.seq_id {
        return Relationship::DifferentRefName;
    }

    let key1 = (s1.first_position(), Reverse(s1.len()));
    let key2 = (s2.first_position(), Reverse(s2.len()));
    let is_ordered = key1 <= key2;
    let (s1_ord, s2_ord) = if is_ordered { (s1, s2) } else { (s2, s1) };

    use Relationship::*;
    if ordered_contained(s1_ord, s2_ord) {
        Relationship::oriented(is_ordered, S2WithinS1, S1WithinS2)
    } else if ordered_abuts(s1_ord, s2_ord) {
        Relationship::oriented(is_ordered, ForwardAbutted, ReverseAbutted)
    } else if ordered_overlaps(s1_ord, s2_ord) {
        Relationship::oriented(is_ordered, ForwardOverlap, ReverseOverlap)
    } else if ordered_gapped(s1_ord, s2_ord) {
        Relationship::oriented(is_ordered, ForwardGapped, ReverseGapped)
    } else {
        Unknown
    }
}
