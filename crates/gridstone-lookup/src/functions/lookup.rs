//! MATCH, LOOKUP, VLOOKUP and HLOOKUP.
//!
//! The classic lookup family. All four search with the legacy type-skipping
//! comparison rules; VLOOKUP's exact mode is the one case-sensitive search
//! in the crate.

use std::cmp::Ordering;

use gridstone_core::{CellError, CellValue};

use crate::coerce;
use crate::compare::{legacy_cmp, legacy_type, strict_eq};
use crate::error::LookupResult;
use crate::functions::{FunctionDef, FunctionRegistry};
use crate::search;
use crate::wildcard::WildcardPattern;

pub fn register_lookup_functions(registry: &mut FunctionRegistry) {
    // MATCH
    registry.register(FunctionDef {
        name: "MATCH",
        min_args: 2,
        max_args: Some(3),
        implementation: fn_match,
    });

    // LOOKUP
    registry.register(FunctionDef {
        name: "LOOKUP",
        min_args: 2,
        max_args: Some(3),
        implementation: fn_lookup,
    });

    // VLOOKUP
    registry.register(FunctionDef {
        name: "VLOOKUP",
        min_args: 3,
        max_args: Some(4),
        implementation: fn_vlookup,
    });

    // HLOOKUP
    registry.register(FunctionDef {
        name: "HLOOKUP",
        min_args: 3,
        max_args: Some(4),
        implementation: fn_hlookup,
    });
}

/// MATCH(lookup_value, lookup_array, [match_type])
pub fn fn_match(args: &[CellValue]) -> LookupResult<CellValue> {
    let rows = match args[1].as_array() {
        Some(rows) => rows,
        None => return Ok(CellValue::Error(CellError::Na)),
    };
    if let Some(e) = args[0].as_error() {
        return Ok(CellValue::Error(e));
    }
    let match_type = match args.get(2) {
        None | Some(CellValue::Missing) => CellValue::Number(1.0),
        Some(v) => v.clone(),
    };
    if match_type.is_error() {
        return Ok(CellValue::Error(CellError::Ref));
    }
    if rows.len() > 1 && rows[0].len() > 1 {
        return Ok(CellValue::Error(CellError::Na));
    }
    let array = coerce::flatten(&args[1]);
    let match_type = match coerce::get_number(&match_type) {
        CellValue::Number(n) => n,
        _ => return Ok(CellValue::Error(CellError::Value)),
    };
    let key = if args[0].is_blank() {
        CellValue::Number(0.0)
    } else {
        args[0].clone()
    };

    if match_type > 0.0 {
        return Ok(match search::approximate_binary_search(&key, &array) {
            Some(i) => CellValue::Number((i + 1) as f64),
            None => CellValue::Error(CellError::Na),
        });
    }

    if match_type == 0.0 {
        if let CellValue::String(s) = &key {
            let pattern = WildcardPattern::new(&s.to_lowercase());
            for (i, element) in array.iter().enumerate() {
                if let CellValue::String(e) = element {
                    if pattern.matches(&e.to_lowercase()) {
                        return Ok(CellValue::Number((i + 1) as f64));
                    }
                }
            }
        } else {
            for (i, element) in array.iter().enumerate() {
                if strict_eq(element, &key) {
                    return Ok(CellValue::Number((i + 1) as f64));
                }
            }
        }
        return Ok(CellValue::Error(CellError::Na));
    }

    // negative (or NaN) match type: scan assuming descending order
    let key_type = legacy_type(&key);
    let mut lowest: Option<usize> = None;
    for (i, element) in array.iter().enumerate() {
        if legacy_type(element) != key_type {
            continue;
        }
        match legacy_cmp(&key, element) {
            Ordering::Greater => break,
            Ordering::Less => lowest = Some(i),
            Ordering::Equal => return Ok(CellValue::Number((i + 1) as f64)),
        }
    }
    Ok(match lowest {
        Some(i) => CellValue::Number((i + 1) as f64),
        None => CellValue::Error(CellError::Na),
    })
}

/// LOOKUP(lookup_value, array, [result_array])
///
/// The array form: the search vector is the first row or first column of
/// `array`, whichever is longer, and the default result vector is the
/// opposite edge.
pub fn fn_lookup(args: &[CellValue]) -> LookupResult<CellValue> {
    let key = &args[0];
    if let Some(e) = key.as_error() {
        return Ok(CellValue::Error(e));
    }
    let table: Vec<Vec<CellValue>> = match &args[1] {
        CellValue::Array(rows) => rows.clone(),
        other => vec![vec![other.clone()]],
    };

    let row_oriented = table.first().map_or(0, |r| r.len()) > table.len();
    let (search_values, default_results): (Vec<CellValue>, Vec<CellValue>) = if row_oriented {
        (
            table.first().cloned().unwrap_or_default(),
            table.last().cloned().unwrap_or_default(),
        )
    } else {
        (
            table
                .iter()
                .map(|row| row.first().cloned().unwrap_or(CellValue::Missing))
                .collect(),
            table
                .iter()
                .map(|row| row.last().cloned().unwrap_or(CellValue::Missing))
                .collect(),
        )
    };

    let results = match args.get(2) {
        None | Some(CellValue::Missing) => default_results,
        Some(provided) => {
            if let CellValue::Array(rows) = provided {
                if rows.len() > 1 && rows[0].len() > 1 {
                    return Ok(CellValue::Error(CellError::Na));
                }
            }
            coerce::flatten(provided)
        }
    };
    let search_values = coerce::flatten(&CellValue::Array(vec![search_values]));

    match search::approximate_binary_search(key, &search_values) {
        None => Ok(CellValue::Error(CellError::Na)),
        Some(i) if i >= results.len() => Ok(CellValue::Error(CellError::Ref)),
        Some(i) => Ok(results[i].clone()),
    }
}

/// VLOOKUP(lookup_value, table_array, col_index_num, [range_lookup])
pub fn fn_vlookup(args: &[CellValue]) -> LookupResult<CellValue> {
    let key = &args[0];
    if let Some(e) = key.as_error() {
        return Ok(CellValue::Error(e));
    }
    if let Some(e) = args[2].as_error() {
        return Ok(CellValue::Error(e));
    }
    let flag = match args.get(3) {
        None | Some(CellValue::Missing) => CellValue::Boolean(true),
        Some(v) => v.clone(),
    };
    if let Some(e) = flag.as_error() {
        return Ok(CellValue::Error(e));
    }
    let table: Vec<Vec<CellValue>> = match &args[1] {
        CellValue::Array(rows) => rows.clone(),
        other => vec![vec![other.clone()]],
    };
    let approximate = match coerce::parse_bool(&flag) {
        CellValue::Boolean(b) => b,
        _ => return Ok(CellValue::Error(CellError::Value)),
    };

    let matched: Option<&Vec<CellValue>> = if approximate {
        let first_column: Vec<CellValue> = table
            .iter()
            .map(|row| row.first().cloned().unwrap_or(CellValue::Missing))
            .collect();
        search::approximate_binary_search(key, &first_column).map(|i| &table[i])
    } else {
        // case-sensitive, and a later duplicate key wins
        let mut found = None;
        for row in &table {
            let head = row.first().cloned().unwrap_or(CellValue::Missing);
            if strict_eq(&head, key) {
                found = Some(row);
            }
        }
        found
    };
    let row = match matched {
        Some(row) => row,
        None => return Ok(CellValue::Error(CellError::Na)),
    };

    let col = match coerce::get_number(&args[2]) {
        CellValue::Number(n) => n,
        _ => return Ok(CellValue::Error(CellError::Value)),
    };
    if col < 1.0 {
        return Ok(CellValue::Error(CellError::Value));
    }
    if col > table[0].len() as f64 {
        return Ok(CellValue::Error(CellError::Ref));
    }
    if col.fract() != 0.0 {
        return Ok(CellValue::Missing);
    }
    Ok(row.get(col as usize - 1).cloned().unwrap_or(CellValue::Missing))
}

/// HLOOKUP(lookup_value, table_array, row_index_num, [range_lookup])
pub fn fn_hlookup(args: &[CellValue]) -> LookupResult<CellValue> {
    let mut forwarded = args.to_vec();
    if let CellValue::Array(rows) = &args[1] {
        forwarded[1] = CellValue::Array(coerce::transpose(rows));
    }
    fn_vlookup(&forwarded)
}
