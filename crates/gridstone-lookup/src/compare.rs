//! The three value orderings used across the lookup functions.
//!
//! Three comparator families coexist and disagree with one another by
//! construction:
//!
//! - the **legacy order** ([`legacy_cmp`]): type-segmented, used by the
//!   approximate search behind MATCH, LOOKUP and VLOOKUP. Cross-type pairs
//!   are never compared (callers skip them); blanks, errors and ranges share
//!   one class in which every pair is equal.
//! - the **total order** ([`total_cmp`]): number < text < boolean <
//!   error/other < blank, used by XLOOKUP's linear and binary searches.
//! - the **XMATCH order** ([`xmatch_gt`] and friends): boolean above text
//!   above everything else, with blank reading as 0 and errors failing every
//!   relational test.
//!
//! Collapsing them into one ordering changes observable results of at least
//! one public function, so each stays separate.

use std::cmp::Ordering;

use gridstone_core::CellValue;

/// Strict equality: same type, same value. Text is case-sensitive, errors
/// compare by kind, blank equals blank, NaN equals nothing.
pub fn strict_eq(a: &CellValue, b: &CellValue) -> bool {
    match (a, b) {
        (CellValue::Number(x), CellValue::Number(y)) => x == y,
        (CellValue::String(x), CellValue::String(y)) => x == y,
        (CellValue::Boolean(x), CellValue::Boolean(y)) => x == y,
        (CellValue::Blank, CellValue::Blank) => true,
        (CellValue::Missing, CellValue::Missing) => true,
        (CellValue::Error(x), CellValue::Error(y)) => x == y,
        _ => false,
    }
}

/// Case-insensitive text comparison, folding per character without
/// allocating.
pub fn cmp_ci(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// True when the two strings are equal ignoring case.
pub fn eq_ci(a: &str, b: &str) -> bool {
    cmp_ci(a, b) == Ordering::Equal
}

/// Copy of a value with text lowercased; every other value unchanged.
pub fn fold_case(value: &CellValue) -> CellValue {
    match value {
        CellValue::String(s) => CellValue::String(s.to_lowercase()),
        other => other.clone(),
    }
}

/// Type classes of the legacy order. Blanks, errors and ranges share one
/// class; a missing argument is its own class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyType {
    Number,
    Text,
    Boolean,
    Object,
    Undefined,
}

/// Classify a value for the legacy order.
pub fn legacy_type(value: &CellValue) -> LegacyType {
    match value {
        CellValue::Number(_) => LegacyType::Number,
        CellValue::String(_) => LegacyType::Text,
        CellValue::Boolean(_) => LegacyType::Boolean,
        CellValue::Missing => LegacyType::Undefined,
        CellValue::Blank | CellValue::Error(_) | CellValue::Array(_) => LegacyType::Object,
    }
}

/// Three-way comparison within one legacy type class. Text folds case;
/// every pair in the object class compares equal; NaN compares equal to any
/// number.
///
/// Callers must have established that `key` and `elem` share a legacy type.
pub fn legacy_cmp(key: &CellValue, elem: &CellValue) -> Ordering {
    match (key, elem) {
        (CellValue::Number(a), CellValue::Number(b)) => {
            a.partial_cmp(b).unwrap_or(Ordering::Equal)
        }
        (CellValue::String(a), CellValue::String(b)) => cmp_ci(a, b),
        (CellValue::Boolean(a), CellValue::Boolean(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

fn type_precedence(value: &CellValue) -> u8 {
    match value {
        CellValue::Number(_) => 0,
        CellValue::String(_) => 1,
        CellValue::Boolean(_) => 2,
        CellValue::Blank => 4,
        _ => 3,
    }
}

/// Total order over all values: number < text < boolean < error/other <
/// blank, text case-insensitive. Within the error/other class, values of
/// the same kind compare equal and everything else compares greater
/// regardless of operand order; NaN against any number is greater.
pub fn total_cmp(a: &CellValue, b: &CellValue) -> Ordering {
    let (pa, pb) = (type_precedence(a), type_precedence(b));
    if pa != pb {
        return pa.cmp(&pb);
    }
    match (a, b) {
        (CellValue::Number(x), CellValue::Number(y)) => {
            if x == y {
                Ordering::Equal
            } else if x < y {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
        (CellValue::String(x), CellValue::String(y)) => cmp_ci(x, y),
        (CellValue::Boolean(x), CellValue::Boolean(y)) => x.cmp(y),
        _ => {
            if strict_eq(a, b) {
                Ordering::Equal
            } else {
                Ordering::Greater
            }
        }
    }
}

/// Numeric projection of the XMATCH general class: blank reads as 0, errors
/// and missing values as NaN.
fn general_key(value: &CellValue) -> f64 {
    match value {
        CellValue::Number(n) => *n,
        CellValue::Blank => 0.0,
        _ => f64::NAN,
    }
}

/// `a > b` in the XMATCH order: booleans above everything, text above the
/// rest, the remaining class numeric. Text comparison is case-sensitive;
/// callers fold both sides first.
pub fn xmatch_gt(a: &CellValue, b: &CellValue) -> bool {
    match (a, b) {
        (CellValue::Boolean(x), CellValue::Boolean(y)) => x > y,
        (CellValue::Boolean(_), _) => true,
        (_, CellValue::Boolean(_)) => false,
        (CellValue::String(x), CellValue::String(y)) => x > y,
        (CellValue::String(_), _) => true,
        (_, CellValue::String(_)) => false,
        _ => general_key(a) > general_key(b),
    }
}

/// `a >= b` in the XMATCH order. Not equivalent to `xmatch_gt || strict_eq`:
/// two errors of the same kind are strictly equal yet satisfy no relational
/// test.
pub fn xmatch_ge(a: &CellValue, b: &CellValue) -> bool {
    match (a, b) {
        (CellValue::Boolean(x), CellValue::Boolean(y)) => x >= y,
        (CellValue::Boolean(_), _) => true,
        (_, CellValue::Boolean(_)) => false,
        (CellValue::String(x), CellValue::String(y)) => x >= y,
        (CellValue::String(_), _) => true,
        (_, CellValue::String(_)) => false,
        _ => general_key(a) >= general_key(b),
    }
}

/// `a < b` in the XMATCH order.
pub fn xmatch_lt(a: &CellValue, b: &CellValue) -> bool {
    match (a, b) {
        (CellValue::Boolean(x), CellValue::Boolean(y)) => x < y,
        (CellValue::Boolean(_), _) => false,
        (_, CellValue::Boolean(_)) => true,
        (CellValue::String(x), CellValue::String(y)) => x < y,
        (CellValue::String(_), _) => false,
        (_, CellValue::String(_)) => true,
        _ => general_key(a) < general_key(b),
    }
}

/// `a <= b` in the XMATCH order.
pub fn xmatch_le(a: &CellValue, b: &CellValue) -> bool {
    match (a, b) {
        (CellValue::Boolean(x), CellValue::Boolean(y)) => x <= y,
        (CellValue::Boolean(_), _) => false,
        (_, CellValue::Boolean(_)) => true,
        (CellValue::String(x), CellValue::String(y)) => x <= y,
        (CellValue::String(_), _) => false,
        (_, CellValue::String(_)) => true,
        _ => general_key(a) <= general_key(b),
    }
}

fn xmatch_sort_class(value: &CellValue) -> u8 {
    match value {
        CellValue::Number(n) if n.is_nan() => 3,
        CellValue::Number(_) | CellValue::Blank => 0,
        CellValue::String(_) => 1,
        CellValue::Boolean(_) => 2,
        _ => 3,
    }
}

/// Sort comparator deriving a total order from the XMATCH relational tests.
/// Values no relational test can order (errors, NaN, missing) form a final
/// class of their own in which every pair is equal, keeping the comparator
/// consistent for a stable sort.
pub fn xmatch_sort_cmp(a: &CellValue, b: &CellValue) -> Ordering {
    let (ca, cb) = (xmatch_sort_class(a), xmatch_sort_class(b));
    if ca != cb {
        return ca.cmp(&cb);
    }
    match (a, b) {
        (CellValue::String(x), CellValue::String(y)) => x.cmp(y),
        (CellValue::Boolean(x), CellValue::Boolean(y)) => x.cmp(y),
        _ if ca == 0 => general_key(a)
            .partial_cmp(&general_key(b))
            .unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}
