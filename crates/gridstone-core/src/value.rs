//! Cell value types

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents a cell value as seen by the lookup functions
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CellValue {
    /// Empty cell (no value)
    Blank,

    /// An omitted optional argument
    ///
    /// Distinct from [`CellValue::Blank`]: functions default a missing
    /// argument but treat a blank cell as a searchable value.
    Missing,

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Numeric value (all numbers stored as f64)
    Number(f64),

    /// String value
    String(String),

    /// Error value (#VALUE!, #REF!, etc.)
    Error(CellError),

    /// A rectangular range as a value; outer Vec is rows, inner Vec is columns
    Array(Vec<Vec<CellValue>>),
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Check if the cell is blank
    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }

    /// Check if this stands for an omitted argument
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Check if the cell contains an error
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    /// Check if the value is a range
    pub fn is_array(&self) -> bool {
        matches!(self, CellValue::Array(_))
    }

    /// Get the error if this is an error value
    pub fn as_error(&self) -> Option<CellError> {
        match self {
            CellValue::Error(e) => Some(*e),
            _ => None,
        }
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Boolean(true) => Some(1.0),
            CellValue::Boolean(false) => Some(0.0),
            _ => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            CellValue::Number(n) => Some(*n != 0.0),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the rows if this is a range value
    pub fn as_array(&self) -> Option<&[Vec<CellValue>]> {
        match self {
            CellValue::Array(rows) => Some(rows),
            _ => None,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Blank => "blank",
            CellValue::Missing => "missing",
            CellValue::Boolean(_) => "boolean",
            CellValue::Number(_) => "number",
            CellValue::String(_) => "string",
            CellValue::Error(_) => "error",
            CellValue::Array(_) => "array",
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Blank
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Blank => write!(f, ""),
            CellValue::Missing => write!(f, ""),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Error(e) => write!(f, "{}", e),
            CellValue::Array(rows) => {
                let mut first = true;
                for cell in rows.iter().flatten() {
                    if !first {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", cell)?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<CellError> for CellValue {
    fn from(e: CellError) -> Self {
        CellValue::Error(e)
    }
}

/// Excel error values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CellError {
    /// #NULL! - range intersection is empty
    Null,
    /// #DIV/0! - division by zero
    Div0,
    /// #VALUE! - argument has the wrong type or shape
    Value,
    /// #REF! - reference or index out of bounds
    Ref,
    /// #NAME? - unrecognized name
    Name,
    /// #NUM! - invalid numeric value
    Num,
    /// #N/A - value not available (also: no match found)
    Na,
    /// #GETTING_DATA - external data is loading
    GettingData,
    /// #SPILL! - dynamic array cannot spill
    Spill,
    /// #CALC! - calculation error
    Calc,
}

impl CellError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Null => "#NULL!",
            CellError::Div0 => "#DIV/0!",
            CellError::Value => "#VALUE!",
            CellError::Ref => "#REF!",
            CellError::Name => "#NAME?",
            CellError::Num => "#NUM!",
            CellError::Na => "#N/A",
            CellError::GettingData => "#GETTING_DATA",
            CellError::Spill => "#SPILL!",
            CellError::Calc => "#CALC!",
        }
    }

    /// Parse an error string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "#NULL!" => Some(CellError::Null),
            "#DIV/0!" => Some(CellError::Div0),
            "#VALUE!" => Some(CellError::Value),
            "#REF!" => Some(CellError::Ref),
            "#NAME?" => Some(CellError::Name),
            "#NUM!" => Some(CellError::Num),
            "#N/A" => Some(CellError::Na),
            "#GETTING_DATA" => Some(CellError::GettingData),
            "#SPILL!" => Some(CellError::Spill),
            "#CALC!" => Some(CellError::Calc),
            _ => None,
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cell_value_conversions() {
        assert_eq!(CellValue::from(42), CellValue::Number(42.0));
        assert_eq!(CellValue::from(2.5), CellValue::Number(2.5));
        assert_eq!(CellValue::from(true), CellValue::Boolean(true));
        assert_eq!(CellValue::from("hi"), CellValue::String("hi".to_string()));
        assert_eq!(
            CellValue::from(CellError::Na),
            CellValue::Error(CellError::Na)
        );
    }

    #[test]
    fn test_cell_value_as_number() {
        assert_eq!(CellValue::Number(3.5).as_number(), Some(3.5));
        assert_eq!(CellValue::Boolean(true).as_number(), Some(1.0));
        assert_eq!(CellValue::Boolean(false).as_number(), Some(0.0));
        assert_eq!(CellValue::string("3.5").as_number(), None);
        assert_eq!(CellValue::Blank.as_number(), None);
    }

    #[test]
    fn test_cell_value_display() {
        assert_eq!(CellValue::Number(42.0).to_string(), "42");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Boolean(true).to_string(), "TRUE");
        assert_eq!(CellValue::Blank.to_string(), "");
        assert_eq!(CellValue::Error(CellError::Div0).to_string(), "#DIV/0!");
        let range = CellValue::Array(vec![
            vec![CellValue::Number(1.0), CellValue::Number(2.0)],
            vec![CellValue::Number(3.0)],
        ]);
        assert_eq!(range.to_string(), "1,2,3");
    }

    #[test]
    fn test_blank_and_missing_are_distinct() {
        assert_ne!(CellValue::Blank, CellValue::Missing);
        assert!(CellValue::Blank.is_blank());
        assert!(!CellValue::Blank.is_missing());
        assert!(CellValue::Missing.is_missing());
        assert_eq!(CellValue::Blank.type_name(), "blank");
        assert_eq!(CellValue::Missing.type_name(), "missing");
    }

    #[test]
    fn test_cell_error_display() {
        assert_eq!(CellError::Value.to_string(), "#VALUE!");
        assert_eq!(CellError::Na.to_string(), "#N/A");
        assert_eq!(CellError::Ref.as_str(), "#REF!");
    }

    #[test]
    fn test_cell_error_parse() {
        assert_eq!(CellError::from_str("#N/A"), Some(CellError::Na));
        assert_eq!(CellError::from_str("#value!"), Some(CellError::Value));
        assert_eq!(CellError::from_str("#REF!"), Some(CellError::Ref));
        assert_eq!(CellError::from_str("not an error"), None);
    }

    #[test]
    fn test_as_error() {
        assert_eq!(
            CellValue::Error(CellError::Ref).as_error(),
            Some(CellError::Ref)
        );
        assert_eq!(CellValue::Number(1.0).as_error(), None);
    }
}
