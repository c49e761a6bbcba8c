//! # gridstone-lookup
//!
//! Lookup and reference functions for gridstone.
//!
//! This crate provides:
//! - The classic lookup family (MATCH, LOOKUP, VLOOKUP, HLOOKUP)
//! - The modern pair (XLOOKUP, XMATCH) with match and search modes
//! - Reference helpers (CHOOSE, INDEX, ROWS, COLUMNS, ADDRESS)
//! - The comparison and coercion rules those functions share
//!
//! Failures follow spreadsheet conventions: bad input produces an error
//! value such as `#N/A` or `#VALUE!` inside the returned [`CellValue`],
//! and `Err` is reserved for calling mistakes like an unknown function
//! name.
//!
//! ## Example
//!
//! ```rust
//! use gridstone_lookup::{evaluate_function, CellValue};
//!
//! let table = CellValue::Array(vec![
//!     vec![CellValue::string("apples"), CellValue::Number(50.0)],
//!     vec![CellValue::string("pears"), CellValue::Number(40.0)],
//! ]);
//! let args = [
//!     CellValue::string("pears"),
//!     table,
//!     CellValue::Number(2.0),
//!     CellValue::Boolean(false),
//! ];
//! let price = evaluate_function("VLOOKUP", &args)?;
//! assert_eq!(price, CellValue::Number(40.0));
//! # Ok::<(), gridstone_lookup::LookupError>(())
//! ```

use std::sync::OnceLock;

pub mod coerce;
pub mod compare;
pub mod error;
pub mod functions;
pub mod search;
pub mod wildcard;

pub use error::{LookupError, LookupResult};
pub use functions::{FunctionDef, FunctionImpl, FunctionRegistry};
pub use gridstone_core::{CellError, CellValue};
pub use search::{MatchMode, SearchMode};

static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

/// The process-wide registry, built on first use.
pub fn function_registry() -> &'static FunctionRegistry {
    FUNCTION_REGISTRY.get_or_init(FunctionRegistry::new)
}

/// Evaluates a registered function by name.
///
/// Names are case-insensitive. An unknown name is a caller mistake and
/// comes back as [`LookupError::UnknownFunction`]; an argument count
/// outside the function's declared range is a data problem and reports
/// `#N/A` in the result instead.
pub fn evaluate_function(name: &str, args: &[CellValue]) -> LookupResult<CellValue> {
    let def = function_registry()
        .get(name)
        .ok_or_else(|| LookupError::UnknownFunction(name.to_string()))?;
    if args.len() < def.min_args {
        return Ok(CellValue::Error(CellError::Na));
    }
    if let Some(max) = def.max_args {
        if args.len() > max {
            return Ok(CellValue::Error(CellError::Na));
        }
    }
    (def.implementation)(args)
}
