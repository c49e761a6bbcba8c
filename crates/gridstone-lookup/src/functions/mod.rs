//! Function registry and dispatch.
//!
//! Each function is a plain `fn(&[CellValue]) -> LookupResult<CellValue>`
//! registered under its uppercase name with an arity range. Dispatch checks
//! the name and arity, then hands the raw arguments to the implementation;
//! everything past that point reports problems as error values in the
//! returned `CellValue`, not as `Err`.

pub mod lookup;
pub mod reference;
pub mod xlookup;

use std::collections::HashMap;

use gridstone_core::CellValue;

use crate::error::LookupResult;

/// Signature shared by every registered function.
pub type FunctionImpl = fn(&[CellValue]) -> LookupResult<CellValue>;

/// A registered function with its arity constraints.
pub struct FunctionDef {
    pub name: &'static str,
    /// Minimum number of arguments
    pub min_args: usize,
    /// Maximum number of arguments (None = unlimited)
    pub max_args: Option<usize>,
    pub implementation: FunctionImpl,
}

/// Registry of all available functions.
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDef>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        let mut registry = FunctionRegistry {
            functions: HashMap::new(),
        };
        lookup::register_lookup_functions(&mut registry);
        xlookup::register_xlookup_functions(&mut registry);
        reference::register_reference_functions(&mut registry);
        registry
    }

    /// Look up a function by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_uppercase())
    }

    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.to_string(), def);
    }

    /// Names of all registered functions, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(|k| k.as_str())
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
