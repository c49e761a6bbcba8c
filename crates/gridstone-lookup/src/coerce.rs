//! Argument coercion and range-shape utilities shared by the function
//! implementations.
//!
//! The coercions here deliberately mirror spreadsheet argument handling
//! rather than Rust conventions: blanks and missing arguments often read as
//! zero, booleans refuse numeric conversion, and any failure is reported as
//! an error sentinel in the returned value.

use gridstone_core::{CellError, CellValue};

/// Shape classes of a range argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    /// A scalar (non-array) value
    Single,
    /// Exactly one row
    Line,
    /// One cell per row
    Column,
    /// More than one row and more than one column
    Matrix,
}

/// Classify a value by shape. A single-cell array counts as a line.
pub fn variable_type(value: &CellValue) -> VariableType {
    match value {
        CellValue::Array(rows) => {
            if rows.len() == 1 {
                VariableType::Line
            } else if rows.iter().all(|r| r.len() == 1) {
                VariableType::Column
            } else {
                VariableType::Matrix
            }
        }
        _ => VariableType::Single,
    }
}

/// Deep row-major flatten. Scalars become a one-element vector.
pub fn flatten(value: &CellValue) -> Vec<CellValue> {
    let mut out = Vec::new();
    flatten_into(value, &mut out);
    out
}

fn flatten_into(value: &CellValue, out: &mut Vec<CellValue>) {
    match value {
        CellValue::Array(rows) => {
            for row in rows {
                for cell in row {
                    flatten_into(cell, out);
                }
            }
        }
        other => out.push(other.clone()),
    }
}

/// One-level flatten: the rows of an array concatenated, cells kept as-is.
/// Scalars become a one-element vector.
pub fn flatten_shallow(value: &CellValue) -> Vec<CellValue> {
    match value {
        CellValue::Array(rows) => rows.iter().flatten().cloned().collect(),
        other => vec![other.clone()],
    }
}

/// Rows become columns. The width is taken from the first row; cells absent
/// from shorter rows materialize as [`CellValue::Missing`].
pub fn transpose(rows: &[Vec<CellValue>]) -> Vec<Vec<CellValue>> {
    let width = rows.first().map_or(0, |r| r.len());
    (0..width)
        .map(|c| {
            rows.iter()
                .map(|row| row.get(c).cloned().unwrap_or(CellValue::Missing))
                .collect()
        })
        .collect()
}

/// One column of a row matrix, as a one-cell-per-row matrix.
pub fn column_as_matrix(rows: &[Vec<CellValue>], col: usize) -> Vec<Vec<CellValue>> {
    rows.iter()
        .map(|row| vec![row.get(col).cloned().unwrap_or(CellValue::Missing)])
        .collect()
}

/// First error among the given arguments, if any.
pub fn first_error(values: &[&CellValue]) -> Option<CellError> {
    values.iter().find_map(|v| v.as_error())
}

/// Unsigned decimal grammar `digits[.digits]`. A single leading `+`/`-` is
/// accepted only when `allow_sign` is set. No whitespace, no bare or
/// trailing dot.
pub fn is_valid_number(text: &str, allow_sign: bool) -> bool {
    let (signed, digits) = match text.as_bytes().first() {
        Some(b'+') | Some(b'-') => (true, &text[1..]),
        _ => (false, text),
    };
    if signed && !allow_sign {
        return false;
    }
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    match digits.split_once('.') {
        Some((int_part, frac_part)) => all_digits(int_part) && all_digits(frac_part),
        None => all_digits(digits),
    }
}

/// Convert signed-decimal text to a number; every other value passes
/// through unchanged. Callers type-check the result.
pub fn get_number(value: &CellValue) -> CellValue {
    match value {
        CellValue::String(s) if is_valid_number(s, true) => {
            CellValue::Number(s.parse().unwrap_or(f64::NAN))
        }
        other => other.clone(),
    }
}

/// Numeric coercion: blanks and missing arguments read as 0, booleans as
/// NaN, text through a trimmed float parse. Errors pass through; anything
/// else is `#VALUE!`.
pub fn parse_number(value: &CellValue) -> CellValue {
    match value {
        CellValue::Number(n) => CellValue::Number(*n),
        CellValue::Error(e) => CellValue::Error(*e),
        CellValue::Blank | CellValue::Missing => CellValue::Number(0.0),
        CellValue::Boolean(_) => CellValue::Number(f64::NAN),
        CellValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return CellValue::Error(CellError::Value);
            }
            match trimmed.parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::Error(CellError::Value),
            }
        }
        CellValue::Array(_) => CellValue::Error(CellError::Value),
    }
}

/// Boolean coercion: numbers read as `n != 0` (NaN included), text must
/// spell TRUE or FALSE in any case. Errors pass through; anything else is
/// `#VALUE!`.
pub fn parse_bool(value: &CellValue) -> CellValue {
    match value {
        CellValue::Boolean(b) => CellValue::Boolean(*b),
        CellValue::Error(e) => CellValue::Error(*e),
        CellValue::Number(n) => CellValue::Boolean(*n != 0.0),
        CellValue::String(s) => match s.to_uppercase().as_str() {
            "TRUE" => CellValue::Boolean(true),
            "FALSE" => CellValue::Boolean(false),
            _ => CellValue::Error(CellError::Value),
        },
        _ => CellValue::Error(CellError::Value),
    }
}
