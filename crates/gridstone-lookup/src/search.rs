//! Search strategies over flattened arrays.
//!
//! Five independent strategies cover the lookup functions:
//!
//! - [`approximate_binary_search`]: the legacy search behind MATCH, LOOKUP
//!   and VLOOKUP's approximate mode
//! - [`linear_scan`]: XLOOKUP's forward/backward scan
//! - [`binary_scan_ascending`] / [`binary_scan_descending`]: XLOOKUP's
//!   binary modes under the total order
//! - [`xmatch_binary_search`]: XMATCH's binary modes, one branch per
//!   match-mode and direction combination
//! - [`xmatch_linear_search`]: XMATCH's non-binary modes, a sort-then-scan
//!   over the XMATCH order
//!
//! All return a zero-based index into the array, `None` when nothing
//! qualifies. The binary strategies assume the array is sorted in their
//! direction; they do not verify it, and unsorted input yields the
//! deterministic result of each probe sequence.

use std::cmp::Ordering;

use gridstone_core::CellValue;

use crate::compare::{
    fold_case, legacy_cmp, legacy_type, strict_eq, total_cmp, xmatch_ge, xmatch_le, xmatch_lt,
    xmatch_sort_cmp,
};
use crate::wildcard::WildcardPattern;

/// How a non-exact candidate may satisfy a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Exact matches only (numeric code 0)
    Exact,
    /// Exact, else the smallest value greater than the key (code 1)
    NextGreater,
    /// Exact, else the largest value smaller than the key (code -1)
    NextSmaller,
    /// Text wildcard pattern (code 2); rejected by the binary strategies
    Wildcard,
}

impl MatchMode {
    /// Decode the numeric form used by the public functions.
    pub fn from_number(n: f64) -> Option<MatchMode> {
        if n == 0.0 {
            Some(MatchMode::Exact)
        } else if n == 1.0 {
            Some(MatchMode::NextGreater)
        } else if n == -1.0 {
            Some(MatchMode::NextSmaller)
        } else if n == 2.0 {
            Some(MatchMode::Wildcard)
        } else {
            None
        }
    }
}

/// Traversal strategy over the lookup array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// First to last (numeric code 1)
    Forward,
    /// Last to first (code -1)
    Backward,
    /// Binary search assuming ascending order (code 2)
    BinaryAscending,
    /// Binary search assuming descending order (code -2)
    BinaryDescending,
}

impl SearchMode {
    /// Decode the numeric form used by the public functions.
    pub fn from_number(n: f64) -> Option<SearchMode> {
        if n == 1.0 {
            Some(SearchMode::Forward)
        } else if n == -1.0 {
            Some(SearchMode::Backward)
        } else if n == 2.0 {
            Some(SearchMode::BinaryAscending)
        } else if n == -2.0 {
            Some(SearchMode::BinaryDescending)
        } else {
            None
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, SearchMode::BinaryAscending | SearchMode::BinaryDescending)
    }
}

/// Legacy approximate search, assuming ascending order.
///
/// Only elements of the key's legacy type class participate: a probe that
/// lands on a foreign-type element advances to the next same-type element
/// within the current bounds, shrinking the upper bound when none exists.
/// Returns the exact match if one is hit, otherwise the index of the
/// greatest participating element below the key.
pub fn approximate_binary_search(key: &CellValue, array: &[CellValue]) -> Option<usize> {
    let key_type = legacy_type(key);
    let mut best: Option<usize> = None;
    let mut start: i64 = 0;
    let mut end: i64 = array.len() as i64 - 1;

    while end >= start {
        let probe = start + (end - start) / 2;
        let mut middle = probe;
        while middle <= end && legacy_type(&array[middle as usize]) != key_type {
            middle += 1;
        }
        if middle > end {
            end = probe - 1;
            continue;
        }
        match legacy_cmp(key, &array[middle as usize]) {
            Ordering::Greater => {
                best = Some(middle as usize);
                start = middle + 1;
            }
            Ordering::Less => end = middle - 1,
            Ordering::Equal => return Some(middle as usize),
        }
    }
    best
}

/// Single-pass scan in either direction under the total order.
///
/// Exact mode returns the first equal element in traversal order. The
/// next-smaller/next-greater modes return immediately on an exact hit and
/// otherwise track the best candidate, first-seen winning ties. Wildcard
/// mode matches text elements against a text key's pattern and degrades to
/// a strict-equality scan for non-text keys.
pub fn linear_scan(
    key: &CellValue,
    array: &[CellValue],
    match_mode: MatchMode,
    reverse: bool,
) -> Option<usize> {
    let key = fold_case(key);
    let pattern = match (&key, match_mode) {
        (CellValue::String(p), MatchMode::Wildcard) => Some(WildcardPattern::new(p)),
        _ => None,
    };
    let mut closest: Option<usize> = None;

    let len = array.len();
    for step in 0..len {
        let i = if reverse { len - 1 - step } else { step };
        let current = &array[i];
        match match_mode {
            MatchMode::Exact => {
                if total_cmp(&key, current) == Ordering::Equal {
                    return Some(i);
                }
            }
            MatchMode::NextSmaller => match total_cmp(&key, current) {
                Ordering::Equal => return Some(i),
                Ordering::Greater => {
                    let better = match closest {
                        None => true,
                        Some(c) => total_cmp(&array[c], current) == Ordering::Less,
                    };
                    if better {
                        closest = Some(i);
                    }
                }
                Ordering::Less => {}
            },
            MatchMode::NextGreater => match total_cmp(&key, current) {
                Ordering::Equal => return Some(i),
                Ordering::Less => {
                    let better = match closest {
                        None => true,
                        Some(c) => total_cmp(&array[c], current) == Ordering::Greater,
                    };
                    if better {
                        closest = Some(i);
                    }
                }
                Ordering::Greater => {}
            },
            MatchMode::Wildcard => match (&pattern, current) {
                (Some(p), CellValue::String(s)) => {
                    if p.matches(&s.to_lowercase()) {
                        return Some(i);
                    }
                }
                (None, _) => {
                    if strict_eq(&key, current) {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
    }
    closest
}

/// Binary search under the total order, assuming ascending order. An exact
/// hit walks backward to the first index of the equal run. Without an exact
/// hit, the next-smaller/next-greater modes resolve from the final probe
/// bounds.
pub fn binary_scan_ascending(
    key: &CellValue,
    array: &[CellValue],
    match_mode: MatchMode,
) -> Option<usize> {
    let mut left: i64 = 0;
    let mut right: i64 = array.len() as i64 - 1;
    while left <= right {
        let mid = (left + right) / 2;
        match total_cmp(key, &array[mid as usize]) {
            Ordering::Equal => {
                let mut i = mid as usize;
                while i > 0 && total_cmp(key, &array[i - 1]) == Ordering::Equal {
                    i -= 1;
                }
                return Some(i);
            }
            Ordering::Greater => left = mid + 1,
            Ordering::Less => right = mid - 1,
        }
    }
    let len = array.len() as i64;
    match match_mode {
        MatchMode::NextSmaller => {
            if right < 0 {
                None
            } else if total_cmp(key, &array[right as usize]) == Ordering::Greater {
                Some(right as usize)
            } else if right > 0 {
                Some(right as usize - 1)
            } else {
                None
            }
        }
        MatchMode::NextGreater => {
            if left >= len {
                None
            } else if total_cmp(key, &array[left as usize]) == Ordering::Less {
                Some(left as usize)
            } else if left < len - 1 {
                Some(left as usize + 1)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Mirror of [`binary_scan_ascending`] for descending arrays. An exact hit
/// walks forward to the last index of the equal run.
pub fn binary_scan_descending(
    key: &CellValue,
    array: &[CellValue],
    match_mode: MatchMode,
) -> Option<usize> {
    let mut left: i64 = 0;
    let mut right: i64 = array.len() as i64 - 1;
    while left <= right {
        let mid = (left + right) / 2;
        match total_cmp(key, &array[mid as usize]) {
            Ordering::Equal => {
                let mut i = mid as usize;
                while i + 1 < array.len() && total_cmp(key, &array[i + 1]) == Ordering::Equal {
                    i += 1;
                }
                return Some(i);
            }
            Ordering::Less => left = mid + 1,
            Ordering::Greater => right = mid - 1,
        }
    }
    let len = array.len() as i64;
    match match_mode {
        MatchMode::NextSmaller => {
            if left >= len {
                None
            } else if total_cmp(key, &array[left as usize]) == Ordering::Greater {
                Some(left as usize)
            } else if left > 0 {
                Some(left as usize - 1)
            } else {
                None
            }
        }
        MatchMode::NextGreater => {
            if right < 0 {
                None
            } else if total_cmp(key, &array[right as usize]) == Ordering::Less {
                Some(right as usize)
            } else if right < len - 1 {
                Some(right as usize + 1)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Binary search combining match mode and direction in six independent
/// branches. Equality is strict; ordering is the XMATCH order. An exact hit
/// keeps narrowing toward lower indices in the ascending modes and toward
/// higher indices in the descending modes, so duplicate runs resolve
/// differently by direction. Inexact candidates satisfying the requested
/// relational test are recorded and superseded as the probes narrow.
pub fn xmatch_binary_search(
    key: &CellValue,
    array: &[CellValue],
    match_mode: MatchMode,
    search_mode: SearchMode,
) -> Option<usize> {
    let ascending = search_mode != SearchMode::BinaryDescending;
    let mut low: i64 = 0;
    let mut up: i64 = array.len() as i64 - 1;
    let mut exact: Option<usize> = None;
    let mut last: Option<usize> = None;

    while low <= up {
        let mid = (low + up) / 2;
        let element = &array[mid as usize];
        let is_equal = strict_eq(element, key);
        let is_less = xmatch_lt(element, key);
        match (match_mode, ascending) {
            (MatchMode::Exact, true) => {
                if is_equal {
                    exact = Some(mid as usize);
                    up = mid - 1;
                } else if is_less {
                    low = mid + 1;
                } else {
                    up = mid - 1;
                }
            }
            (MatchMode::Exact, false) => {
                if is_equal {
                    exact = Some(mid as usize);
                    low = mid + 1;
                } else if is_less {
                    up = mid - 1;
                } else {
                    low = mid + 1;
                }
            }
            (MatchMode::NextGreater, true) => {
                if is_equal {
                    exact = Some(mid as usize);
                    up = mid - 1;
                } else if is_less {
                    low = mid + 1;
                } else {
                    last = Some(mid as usize);
                    up = mid - 1;
                }
            }
            (MatchMode::NextSmaller, true) => {
                if is_equal {
                    exact = Some(mid as usize);
                    up = mid - 1;
                } else if is_less {
                    last = Some(mid as usize);
                    low = mid + 1;
                } else {
                    up = mid - 1;
                }
            }
            (MatchMode::NextGreater, false) => {
                if is_equal {
                    exact = Some(mid as usize);
                    low = mid + 1;
                } else if is_less {
                    up = mid - 1;
                } else {
                    last = Some(mid as usize);
                    low = mid + 1;
                }
            }
            (MatchMode::NextSmaller, false) => {
                if is_equal {
                    exact = Some(mid as usize);
                    low = mid + 1;
                } else if is_less {
                    last = Some(mid as usize);
                    up = mid - 1;
                } else {
                    low = mid + 1;
                }
            }
            (MatchMode::Wildcard, _) => return None,
        }
    }
    exact.or(last)
}

/// Non-binary XMATCH search: scan a direction-adjusted sorted copy for the
/// first element satisfying the match rule, then map the matched value back
/// to its first occurrence in the unsorted array.
pub fn xmatch_linear_search(
    key: &CellValue,
    array: &[CellValue],
    match_mode: MatchMode,
    search_mode: SearchMode,
) -> Option<usize> {
    let mut ordered: Vec<CellValue> = array.to_vec();
    ordered.sort_by(xmatch_sort_cmp);
    let reversed = (match_mode == MatchMode::NextSmaller && search_mode != SearchMode::Backward)
        || (match_mode == MatchMode::NextGreater && search_mode == SearchMode::Backward);
    if reversed {
        ordered.reverse();
    }

    let len = ordered.len();
    for step in 0..len {
        let i = if search_mode == SearchMode::Backward {
            len - 1 - step
        } else {
            step
        };
        let value = &ordered[i];
        let matched = match match_mode {
            MatchMode::Exact => strict_eq(value, key),
            MatchMode::NextGreater => xmatch_ge(value, key),
            MatchMode::NextSmaller => xmatch_le(value, key),
            MatchMode::Wildcard => false,
        };
        if matched {
            return array.iter().position(|v| strict_eq(v, value));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridstone_core::CellError;
    use pretty_assertions::assert_eq;

    fn nums(values: &[f64]) -> Vec<CellValue> {
        values.iter().map(|n| CellValue::Number(*n)).collect()
    }

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    fn text(s: &str) -> CellValue {
        CellValue::string(s)
    }

    #[test]
    fn test_match_mode_decoding() {
        assert_eq!(MatchMode::from_number(0.0), Some(MatchMode::Exact));
        assert_eq!(MatchMode::from_number(-0.0), Some(MatchMode::Exact));
        assert_eq!(MatchMode::from_number(1.0), Some(MatchMode::NextGreater));
        assert_eq!(MatchMode::from_number(-1.0), Some(MatchMode::NextSmaller));
        assert_eq!(MatchMode::from_number(2.0), Some(MatchMode::Wildcard));
        assert_eq!(MatchMode::from_number(3.0), None);
        assert_eq!(SearchMode::from_number(-2.0), Some(SearchMode::BinaryDescending));
        assert_eq!(SearchMode::from_number(0.0), None);
        assert!(SearchMode::BinaryAscending.is_binary());
        assert!(!SearchMode::Backward.is_binary());
    }

    #[test]
    fn test_approximate_greatest_not_exceeding() {
        let a = nums(&[1.0, 3.0, 5.0, 7.0]);
        assert_eq!(approximate_binary_search(&num(4.0), &a), Some(1));
        assert_eq!(approximate_binary_search(&num(7.0), &a), Some(3));
        assert_eq!(approximate_binary_search(&num(100.0), &a), Some(3));
        assert_eq!(approximate_binary_search(&num(0.5), &a), None);
    }

    #[test]
    fn test_approximate_exact_hit_returns_probe() {
        let a = nums(&[1.0, 3.0, 5.0, 7.0, 9.0]);
        assert_eq!(approximate_binary_search(&num(5.0), &a), Some(2));
    }

    #[test]
    fn test_approximate_skips_foreign_types() {
        let a = vec![num(1.0), text("x"), num(5.0), text("y"), num(9.0)];
        assert_eq!(approximate_binary_search(&num(6.0), &a), Some(2));
        // text key only sees the text elements
        assert_eq!(approximate_binary_search(&text("x"), &a), Some(1));
        assert_eq!(approximate_binary_search(&text("X"), &a), Some(1));
    }

    #[test]
    fn test_approximate_all_foreign_types() {
        let a = vec![text("a"), text("b")];
        assert_eq!(approximate_binary_search(&num(1.0), &a), None);
    }

    #[test]
    fn test_linear_scan_exact() {
        let a = nums(&[3.0, 1.0, 2.0, 2.0]);
        assert_eq!(linear_scan(&num(2.0), &a, MatchMode::Exact, false), Some(2));
        assert_eq!(linear_scan(&num(2.0), &a, MatchMode::Exact, true), Some(3));
        assert_eq!(linear_scan(&num(9.0), &a, MatchMode::Exact, false), None);
        let t = vec![text("alpha"), text("Beta")];
        assert_eq!(linear_scan(&text("BETA"), &t, MatchMode::Exact, false), Some(1));
    }

    #[test]
    fn test_linear_scan_next_smaller_keeps_first_seen_tie() {
        let a = nums(&[5.0, 3.0, 8.0, 3.0]);
        // both 3s are the closest below 4; the first in traversal order wins
        assert_eq!(
            linear_scan(&num(4.0), &a, MatchMode::NextSmaller, false),
            Some(1)
        );
        assert_eq!(
            linear_scan(&num(4.0), &a, MatchMode::NextSmaller, true),
            Some(3)
        );
    }

    #[test]
    fn test_linear_scan_next_greater() {
        let a = nums(&[10.0, 6.0, 8.0]);
        assert_eq!(
            linear_scan(&num(7.0), &a, MatchMode::NextGreater, false),
            Some(2)
        );
        assert_eq!(linear_scan(&num(11.0), &a, MatchMode::NextGreater, false), None);
    }

    #[test]
    fn test_linear_scan_wildcard() {
        let a = vec![text("alpha"), text("beta"), text("gamma")];
        assert_eq!(
            linear_scan(&text("G*A"), &a, MatchMode::Wildcard, false),
            Some(2)
        );
        assert_eq!(
            linear_scan(&text("?eta"), &a, MatchMode::Wildcard, false),
            Some(1)
        );
        // non-text key degrades to strict equality
        let b = vec![text("1"), num(1.0)];
        assert_eq!(linear_scan(&num(1.0), &b, MatchMode::Wildcard, false), Some(1));
    }

    #[test]
    fn test_binary_ascending_first_of_run() {
        let a = nums(&[1.0, 3.0, 5.0, 5.0, 5.0, 9.0]);
        assert_eq!(binary_scan_ascending(&num(5.0), &a, MatchMode::Exact), Some(2));
    }

    #[test]
    fn test_binary_ascending_fixups() {
        let a = nums(&[1.0, 3.0, 5.0, 9.0]);
        assert_eq!(binary_scan_ascending(&num(4.0), &a, MatchMode::Exact), None);
        assert_eq!(
            binary_scan_ascending(&num(4.0), &a, MatchMode::NextSmaller),
            Some(1)
        );
        assert_eq!(
            binary_scan_ascending(&num(4.0), &a, MatchMode::NextGreater),
            Some(2)
        );
        assert_eq!(
            binary_scan_ascending(&num(0.5), &a, MatchMode::NextSmaller),
            None
        );
        assert_eq!(
            binary_scan_ascending(&num(0.5), &a, MatchMode::NextGreater),
            Some(0)
        );
        assert_eq!(
            binary_scan_ascending(&num(10.0), &a, MatchMode::NextSmaller),
            Some(3)
        );
        assert_eq!(
            binary_scan_ascending(&num(10.0), &a, MatchMode::NextGreater),
            None
        );
    }

    #[test]
    fn test_binary_descending_last_of_run() {
        let a = nums(&[9.0, 5.0, 5.0, 5.0, 3.0, 1.0]);
        assert_eq!(binary_scan_descending(&num(5.0), &a, MatchMode::Exact), Some(3));
    }

    #[test]
    fn test_binary_descending_fixups() {
        let a = nums(&[9.0, 5.0, 3.0, 1.0]);
        assert_eq!(
            binary_scan_descending(&num(4.0), &a, MatchMode::NextSmaller),
            Some(2)
        );
        assert_eq!(
            binary_scan_descending(&num(4.0), &a, MatchMode::NextGreater),
            Some(1)
        );
        assert_eq!(
            binary_scan_descending(&num(10.0), &a, MatchMode::NextGreater),
            None
        );
        assert_eq!(
            binary_scan_descending(&num(0.5), &a, MatchMode::NextSmaller),
            None
        );
    }

    #[test]
    fn test_binary_round_trip() {
        let a = nums(&[1.0, 3.0, 5.0, 9.0]);
        let i = binary_scan_ascending(&num(4.0), &a, MatchMode::NextSmaller);
        assert_eq!(i, Some(1));
        let again = binary_scan_ascending(&a[1], &a, MatchMode::Exact);
        assert_eq!(again, i);
    }

    #[test]
    fn test_xmatch_binary_exact_runs() {
        let asc = nums(&[1.0, 2.0, 2.0, 2.0, 3.0]);
        assert_eq!(
            xmatch_binary_search(&num(2.0), &asc, MatchMode::Exact, SearchMode::BinaryAscending),
            Some(1)
        );
        let desc = nums(&[3.0, 2.0, 2.0, 2.0, 1.0]);
        assert_eq!(
            xmatch_binary_search(&num(2.0), &desc, MatchMode::Exact, SearchMode::BinaryDescending),
            Some(3)
        );
    }

    #[test]
    fn test_xmatch_binary_relational_candidates() {
        let asc = nums(&[1.0, 3.0, 5.0, 9.0]);
        assert_eq!(
            xmatch_binary_search(&num(4.0), &asc, MatchMode::NextGreater, SearchMode::BinaryAscending),
            Some(2)
        );
        assert_eq!(
            xmatch_binary_search(&num(4.0), &asc, MatchMode::NextSmaller, SearchMode::BinaryAscending),
            Some(1)
        );
        assert_eq!(
            xmatch_binary_search(&num(0.5), &asc, MatchMode::NextSmaller, SearchMode::BinaryAscending),
            None
        );
        let desc = nums(&[9.0, 5.0, 3.0, 1.0]);
        assert_eq!(
            xmatch_binary_search(&num(4.0), &desc, MatchMode::NextGreater, SearchMode::BinaryDescending),
            Some(1)
        );
        assert_eq!(
            xmatch_binary_search(&num(4.0), &desc, MatchMode::NextSmaller, SearchMode::BinaryDescending),
            Some(2)
        );
        assert_eq!(
            xmatch_binary_search(&num(10.0), &desc, MatchMode::NextGreater, SearchMode::BinaryDescending),
            None
        );
    }

    #[test]
    fn test_xmatch_linear_first_occurrence() {
        let a = nums(&[3.0, 1.0, 2.0, 2.0]);
        assert_eq!(
            xmatch_linear_search(&num(2.0), &a, MatchMode::Exact, SearchMode::Forward),
            Some(2)
        );
    }

    #[test]
    fn test_xmatch_linear_next_smaller_finds_largest_below() {
        let a = nums(&[1.0, 9.0, 4.0, 7.0]);
        // largest value not above 8 is 7
        assert_eq!(
            xmatch_linear_search(&num(8.0), &a, MatchMode::NextSmaller, SearchMode::Forward),
            Some(3)
        );
        // smallest value not below 8 is 9
        assert_eq!(
            xmatch_linear_search(&num(8.0), &a, MatchMode::NextGreater, SearchMode::Forward),
            Some(1)
        );
    }

    #[test]
    fn test_xmatch_linear_not_found() {
        let a = nums(&[1.0, 2.0]);
        assert_eq!(
            xmatch_linear_search(&num(9.0), &a, MatchMode::NextGreater, SearchMode::Forward),
            None
        );
        assert_eq!(
            xmatch_linear_search(&CellValue::Error(CellError::Na), &a, MatchMode::NextGreater, SearchMode::Forward),
            None
        );
    }
}
