//! Error types for the lookup crate

use thiserror::Error;

/// Result type for function evaluation
pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// Errors reported on the Rust error channel.
///
/// Spreadsheet-visible failures are sentinel values
/// ([`CellError`](gridstone_core::CellError) inside `Ok`); this enum covers
/// caller programming errors only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// Function name not present in the registry
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_display() {
        let err = LookupError::UnknownFunction("FROB".to_string());
        assert_eq!(err.to_string(), "Unknown function: FROB");
    }
}
