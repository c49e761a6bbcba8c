//! # gridstone-core
//!
//! Core value types for the gridstone spreadsheet function library:
//!
//! - [`CellValue`]: the cell value union (numbers, text, booleans, blanks,
//!   errors, nested ranges)
//! - [`CellError`]: the spreadsheet error sentinels (`#N/A`, `#VALUE!`, ...)
//!
//! Errors are ordinary values here, not Rust errors: a function that fails
//! returns `CellValue::Error(...)` so the result can land in a cell like any
//! other value.
//!
//! ## Example
//!
//! ```
//! use gridstone_core::{CellError, CellValue};
//!
//! let v = CellValue::Number(42.0);
//! assert_eq!(v.as_number(), Some(42.0));
//!
//! let e = CellValue::Error(CellError::Na);
//! assert_eq!(e.to_string(), "#N/A");
//! assert!(e.is_error());
//! ```

pub mod value;

pub use value::{CellError, CellValue};
