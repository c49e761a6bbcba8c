//! XLOOKUP and XMATCH.
//!
//! The modern lookup pair. Both take a match mode and a search mode;
//! XLOOKUP additionally maps a hit in the lookup range onto a parallel
//! return range and broadcasts over array keys.

use gridstone_core::{CellError, CellValue};

use crate::coerce::{self, VariableType};
use crate::compare::fold_case;
use crate::error::LookupResult;
use crate::functions::{FunctionDef, FunctionRegistry};
use crate::search::{self, MatchMode, SearchMode};

pub fn register_xlookup_functions(registry: &mut FunctionRegistry) {
    // XLOOKUP
    registry.register(FunctionDef {
        name: "XLOOKUP",
        min_args: 3,
        max_args: Some(6),
        implementation: fn_xlookup,
    });

    // XMATCH
    registry.register(FunctionDef {
        name: "XMATCH",
        min_args: 2,
        max_args: None,
        implementation: fn_xmatch,
    });
}

/// XLOOKUP(lookup_value, lookup_array, return_array, [if_not_found],
/// [match_mode], [search_mode])
pub fn fn_xlookup(args: &[CellValue]) -> LookupResult<CellValue> {
    let key = &args[0];
    let lookup_array = &args[1];
    let return_array = &args[2];
    if key.is_missing() || lookup_array.is_missing() || return_array.is_missing() {
        return Ok(CellValue::Error(CellError::Na));
    }
    let if_not_found = args.get(3).cloned().unwrap_or(CellValue::Missing);
    let match_mode_arg = match args.get(4) {
        None | Some(CellValue::Missing) => CellValue::Number(0.0),
        Some(v) => v.clone(),
    };
    let search_mode_arg = match args.get(5) {
        None | Some(CellValue::Missing) => CellValue::Number(1.0),
        Some(v) => v.clone(),
    };
    if let Some(e) = coerce::first_error(&[
        key,
        lookup_array,
        return_array,
        &match_mode_arg,
        &search_mode_arg,
    ]) {
        return Ok(CellValue::Error(e));
    }

    let (match_mode, search_mode) = match (
        coerce::parse_number(&match_mode_arg),
        coerce::parse_number(&search_mode_arg),
    ) {
        (CellValue::Number(m), CellValue::Number(s)) => (m, s),
        _ => return Ok(CellValue::Error(CellError::Value)),
    };
    let match_mode = match MatchMode::from_number(match_mode) {
        Some(m) => m,
        None => return Ok(CellValue::Error(CellError::Value)),
    };
    let search_mode = match SearchMode::from_number(search_mode) {
        Some(s) => s,
        None => return Ok(CellValue::Error(CellError::Value)),
    };
    if match_mode == MatchMode::Wildcard && search_mode.is_binary() {
        return Ok(CellValue::Error(CellError::Value));
    }

    let lookup_type = coerce::variable_type(lookup_array);
    if lookup_type == VariableType::Matrix {
        return Ok(CellValue::Error(CellError::Value));
    }
    let flattened = match lookup_array {
        CellValue::Array(lookup_rows) => {
            let return_rows = match return_array.as_array() {
                Some(rows) => rows,
                None => return Ok(CellValue::Error(CellError::Value)),
            };
            if lookup_type == VariableType::Line {
                let lookup_width = lookup_rows.first().map_or(0, |r| r.len());
                if return_rows.first().map_or(0, |r| r.len()) != lookup_width {
                    return Ok(CellValue::Error(CellError::Value));
                }
            } else if return_rows.len() != lookup_rows.len() {
                return Ok(CellValue::Error(CellError::Value));
            }
            coerce::flatten(lookup_array)
        }
        _ => vec![lookup_array.clone()],
    };

    let run_search = |probe: &CellValue| -> Option<usize> {
        match search_mode {
            SearchMode::Forward => search::linear_scan(probe, &flattened, match_mode, false),
            SearchMode::Backward => search::linear_scan(probe, &flattened, match_mode, true),
            SearchMode::BinaryAscending => {
                search::binary_scan_ascending(probe, &flattened, match_mode)
            }
            SearchMode::BinaryDescending => {
                search::binary_scan_descending(probe, &flattened, match_mode)
            }
        }
    };

    if coerce::variable_type(key) == VariableType::Single {
        return Ok(match run_search(key) {
            Some(p) => single_key_result(p, lookup_type, return_array),
            None if if_not_found.is_missing() => CellValue::Error(CellError::Na),
            None => if_not_found,
        });
    }

    // array key: search once per cell and return a same-shaped array
    let key_rows = match key {
        CellValue::Array(rows) => rows,
        _ => return Ok(CellValue::Error(CellError::Na)),
    };
    let value_columns = key_rows.first().map_or(0, |r| r.len());
    let mut result_rows = Vec::with_capacity(key_rows.len());
    for row in key_rows {
        let mut result_row = Vec::with_capacity(value_columns);
        for j in 0..value_columns {
            if lookup_type == VariableType::Single {
                if let CellValue::Array(rows) = return_array {
                    if rows.len() > 1 && rows.first().map_or(0, |r| r.len()) > 1 {
                        result_row.push(CellValue::Error(CellError::Value));
                        continue;
                    }
                }
            }
            let cell = row.get(j).cloned().unwrap_or(CellValue::Missing);
            result_row.push(match run_search(&cell) {
                Some(p) => broadcast_result(p, lookup_type, return_array),
                None => missing_marker(&if_not_found),
            });
        }
        result_rows.push(result_row);
    }
    Ok(CellValue::Array(result_rows))
}

/// Maps a hit position onto the return range for a scalar key. A vector
/// lookup range slices the matching row or column out of the return range
/// and collapses it when it is a single cell; a single-cell lookup range
/// returns the whole return range.
fn single_key_result(
    position: usize,
    lookup_type: VariableType,
    return_array: &CellValue,
) -> CellValue {
    match (lookup_type, return_array) {
        (VariableType::Line, CellValue::Array(rows)) => {
            let column = coerce::column_as_matrix(rows, position);
            if column.len() == 1 {
                column[0][0].clone()
            } else {
                CellValue::Array(column)
            }
        }
        (VariableType::Column, CellValue::Array(rows)) => {
            let row = rows.get(position).cloned().unwrap_or_default();
            if row.len() == 1 {
                row[0].clone()
            } else {
                CellValue::Array(vec![row])
            }
        }
        _ => {
            if let CellValue::Array(rows) = return_array {
                if rows.len() > 1 && rows.first().map_or(0, |r| r.len()) > 1 {
                    return CellValue::Error(CellError::Value);
                }
            }
            return_array.clone()
        }
    }
}

/// Per-cell result for a broadcast lookup: only the first matching cell of
/// the return range comes back, never a slice.
fn broadcast_result(
    position: usize,
    lookup_type: VariableType,
    return_array: &CellValue,
) -> CellValue {
    match (lookup_type, return_array) {
        (VariableType::Line, CellValue::Array(rows)) => rows
            .first()
            .and_then(|r| r.get(position))
            .cloned()
            .unwrap_or(CellValue::Missing),
        (VariableType::Column, CellValue::Array(rows)) => rows
            .get(position)
            .and_then(|r| r.first())
            .cloned()
            .unwrap_or(CellValue::Missing),
        (_, CellValue::Array(rows)) => rows
            .first()
            .and_then(|r| r.first())
            .cloned()
            .unwrap_or(CellValue::Missing),
        (_, scalar) => scalar.clone(),
    }
}

fn missing_marker(if_not_found: &CellValue) -> CellValue {
    match if_not_found {
        CellValue::Missing => CellValue::Error(CellError::Na),
        CellValue::Array(rows) => rows
            .first()
            .and_then(|r| r.first())
            .cloned()
            .unwrap_or(CellValue::Missing),
        other => other.clone(),
    }
}

/// XMATCH(search_key, lookup_array, [match_mode], [search_mode])
pub fn fn_xmatch(args: &[CellValue]) -> LookupResult<CellValue> {
    let key = match &args[0] {
        CellValue::Missing => CellValue::Blank,
        other => other.clone(),
    };
    let match_mode_arg = match args.get(2) {
        None | Some(CellValue::Missing) => CellValue::Number(0.0),
        Some(v) => v.clone(),
    };
    let search_mode_arg = match args.get(3) {
        None | Some(CellValue::Missing) => CellValue::Number(1.0),
        Some(v) => v.clone(),
    };

    let range_type = coerce::variable_type(&args[1]);
    if range_type == VariableType::Single || range_type == VariableType::Matrix {
        return Ok(CellValue::Error(CellError::Value));
    }
    let (match_mode, search_mode) = match (
        coerce::parse_number(&match_mode_arg),
        coerce::parse_number(&search_mode_arg),
    ) {
        (CellValue::Number(m), CellValue::Number(s)) => (m, s),
        _ => return Ok(CellValue::Error(CellError::Value)),
    };
    // the wildcard mode of XLOOKUP is not accepted here
    let match_mode = match MatchMode::from_number(match_mode) {
        Some(MatchMode::Wildcard) | None => return Ok(CellValue::Error(CellError::Value)),
        Some(m) => m,
    };
    let search_mode = match SearchMode::from_number(search_mode) {
        Some(s) => s,
        None => return Ok(CellValue::Error(CellError::Value)),
    };

    let key = fold_case(&key);
    let range: Vec<CellValue> = coerce::flatten_shallow(&args[1])
        .iter()
        .map(fold_case)
        .collect();

    let position = if search_mode.is_binary() {
        search::xmatch_binary_search(&key, &range, match_mode, search_mode)
    } else {
        search::xmatch_linear_search(&key, &range, match_mode, search_mode)
    };
    Ok(match position {
        Some(i) => CellValue::Number((i + 1) as f64),
        None => CellValue::Error(CellError::Na),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    fn text(s: &str) -> CellValue {
        CellValue::string(s)
    }

    fn err(e: CellError) -> CellValue {
        CellValue::Error(e)
    }

    fn column(values: Vec<CellValue>) -> CellValue {
        CellValue::Array(values.into_iter().map(|v| vec![v]).collect())
    }

    fn line(values: Vec<CellValue>) -> CellValue {
        CellValue::Array(vec![values])
    }

    #[test]
    fn test_xlookup_exact_column() {
        let keys = column(vec![num(1.0), num(5.0), num(9.0)]);
        let names = column(vec![text("a"), text("b"), text("c")]);
        assert_eq!(
            fn_xlookup(&[num(5.0), keys.clone(), names.clone()]).unwrap(),
            text("b")
        );
        assert_eq!(
            fn_xlookup(&[num(2.0), keys.clone(), names.clone()]).unwrap(),
            err(CellError::Na)
        );
        assert_eq!(
            fn_xlookup(&[num(2.0), keys, names, text("missing")]).unwrap(),
            text("missing")
        );
        let dupes = column(vec![num(1.0), num(3.0), num(5.0), num(5.0), num(9.0)]);
        let letters = column(vec![text("a"), text("b"), text("c"), text("d"), text("e")]);
        assert_eq!(fn_xlookup(&[num(5.0), dupes, letters]).unwrap(), text("c"));
    }

    #[test]
    fn test_xlookup_next_item_modes() {
        let keys = column(vec![num(10.0), num(20.0), num(30.0)]);
        let names = column(vec![text("a"), text("b"), text("c")]);
        assert_eq!(
            fn_xlookup(&[
                num(25.0),
                keys.clone(),
                names.clone(),
                CellValue::Missing,
                num(-1.0)
            ])
            .unwrap(),
            text("b")
        );
        assert_eq!(
            fn_xlookup(&[num(25.0), keys, names, CellValue::Missing, num(1.0)]).unwrap(),
            text("c")
        );
    }

    #[test]
    fn test_xlookup_backward_search() {
        let keys = column(vec![num(1.0), num(2.0), num(1.0)]);
        let names = column(vec![text("first"), text("mid"), text("last")]);
        assert_eq!(
            fn_xlookup(&[
                num(1.0),
                keys,
                names,
                CellValue::Missing,
                num(0.0),
                num(-1.0)
            ])
            .unwrap(),
            text("last")
        );
    }

    #[test]
    fn test_xlookup_binary_search_modes() {
        let ascending = column(vec![num(1.0), num(3.0), num(5.0), num(7.0)]);
        let names = column(vec![text("a"), text("b"), text("c"), text("d")]);
        assert_eq!(
            fn_xlookup(&[
                num(5.0),
                ascending,
                names.clone(),
                CellValue::Missing,
                num(0.0),
                num(2.0)
            ])
            .unwrap(),
            text("c")
        );
        let descending = column(vec![num(7.0), num(5.0), num(3.0), num(1.0)]);
        assert_eq!(
            fn_xlookup(&[
                num(5.0),
                descending,
                names,
                CellValue::Missing,
                num(0.0),
                num(-2.0)
            ])
            .unwrap(),
            text("b")
        );
    }

    #[test]
    fn test_xlookup_wildcard_match_mode() {
        let keys = column(vec![text("apple"), text("banana")]);
        let names = column(vec![num(1.0), num(2.0)]);
        assert_eq!(
            fn_xlookup(&[
                text("BA*"),
                keys.clone(),
                names.clone(),
                CellValue::Missing,
                num(2.0)
            ])
            .unwrap(),
            num(2.0)
        );
        // wildcards cannot be combined with a binary search
        assert_eq!(
            fn_xlookup(&[
                text("BA*"),
                keys,
                names,
                CellValue::Missing,
                num(2.0),
                num(2.0)
            ])
            .unwrap(),
            err(CellError::Value)
        );
    }

    #[test]
    fn test_xlookup_line_lookup_slices_a_column() {
        let keys = line(vec![num(1.0), num(2.0), num(3.0)]);
        let table = CellValue::Array(vec![
            vec![text("a1"), text("b1"), text("c1")],
            vec![text("a2"), text("b2"), text("c2")],
        ]);
        assert_eq!(
            fn_xlookup(&[num(2.0), keys.clone(), table]).unwrap(),
            CellValue::Array(vec![vec![text("b1")], vec![text("b2")]])
        );
        let single_row = line(vec![text("x"), text("y"), text("z")]);
        assert_eq!(
            fn_xlookup(&[num(2.0), keys, single_row]).unwrap(),
            text("y")
        );
    }

    #[test]
    fn test_xlookup_column_lookup_slices_a_row() {
        let keys = column(vec![num(1.0), num(2.0)]);
        let table = CellValue::Array(vec![
            vec![text("a1"), text("a2")],
            vec![text("b1"), text("b2")],
        ]);
        assert_eq!(
            fn_xlookup(&[num(2.0), keys, table]).unwrap(),
            CellValue::Array(vec![vec![text("b1"), text("b2")]])
        );
    }

    #[test]
    fn test_xlookup_shape_validation() {
        let keys = column(vec![num(1.0), num(2.0)]);
        let shorter = column(vec![text("a")]);
        assert_eq!(
            fn_xlookup(&[num(1.0), keys, shorter.clone()]).unwrap(),
            err(CellError::Value)
        );
        let wide_keys = line(vec![num(1.0), num(2.0), num(3.0)]);
        let narrow = line(vec![text("a"), text("b")]);
        assert_eq!(
            fn_xlookup(&[num(1.0), wide_keys, narrow]).unwrap(),
            err(CellError::Value)
        );
        let matrix = CellValue::Array(vec![
            vec![num(1.0), num(2.0)],
            vec![num(3.0), num(4.0)],
        ]);
        assert_eq!(
            fn_xlookup(&[num(1.0), matrix, shorter]).unwrap(),
            err(CellError::Value)
        );
    }

    #[test]
    fn test_xlookup_rejects_bad_modes() {
        let keys = column(vec![num(1.0)]);
        let names = column(vec![text("a")]);
        assert_eq!(
            fn_xlookup(&[num(1.0), keys.clone(), names.clone(), CellValue::Missing, num(5.0)])
                .unwrap(),
            err(CellError::Value)
        );
        assert_eq!(
            fn_xlookup(&[
                num(1.0),
                keys.clone(),
                names.clone(),
                CellValue::Missing,
                num(0.0),
                num(0.0)
            ])
            .unwrap(),
            err(CellError::Value)
        );
        assert_eq!(
            fn_xlookup(&[
                num(1.0),
                keys,
                names,
                CellValue::Missing,
                CellValue::Boolean(true)
            ])
            .unwrap(),
            err(CellError::Value)
        );
    }

    #[test]
    fn test_xlookup_missing_arguments_and_errors() {
        let keys = column(vec![num(1.0)]);
        let names = column(vec![text("a")]);
        assert_eq!(
            fn_xlookup(&[CellValue::Missing, keys.clone(), names.clone()]).unwrap(),
            err(CellError::Na)
        );
        // the if_not_found argument is exempt from error propagation
        assert_eq!(
            fn_xlookup(&[num(2.0), keys.clone(), names.clone(), err(CellError::Div0)]).unwrap(),
            err(CellError::Div0)
        );
        assert_eq!(
            fn_xlookup(&[
                num(1.0),
                keys,
                names,
                CellValue::Missing,
                num(0.0),
                err(CellError::Num)
            ])
            .unwrap(),
            err(CellError::Num)
        );
    }

    #[test]
    fn test_xlookup_broadcasts_over_array_keys() {
        let keys = column(vec![num(1.0), num(2.0)]);
        let names = column(vec![text("a"), text("b")]);
        let probes = line(vec![num(2.0), num(9.0)]);
        assert_eq!(
            fn_xlookup(&[probes.clone(), keys.clone(), names.clone()]).unwrap(),
            CellValue::Array(vec![vec![text("b"), err(CellError::Na)]])
        );
        let fallback = line(vec![text("none"), text("ignored")]);
        assert_eq!(
            fn_xlookup(&[probes, keys, names, fallback]).unwrap(),
            CellValue::Array(vec![vec![text("b"), text("none")]])
        );
    }

    #[test]
    fn test_xlookup_broadcast_never_collapses() {
        let keys = column(vec![num(1.0), num(2.0)]);
        let names = column(vec![text("a"), text("b")]);
        let probe = CellValue::Array(vec![vec![num(2.0)]]);
        assert_eq!(
            fn_xlookup(&[probe, keys, names]).unwrap(),
            CellValue::Array(vec![vec![text("b")]])
        );
    }

    #[test]
    fn test_xlookup_single_cell_lookup_range() {
        assert_eq!(
            fn_xlookup(&[num(5.0), num(5.0), text("hit")]).unwrap(),
            text("hit")
        );
        let wide = CellValue::Array(vec![
            vec![num(1.0), num(2.0)],
            vec![num(3.0), num(4.0)],
        ]);
        assert_eq!(
            fn_xlookup(&[num(5.0), num(5.0), wide]).unwrap(),
            err(CellError::Value)
        );
    }

    #[test]
    fn test_xmatch_exact_returns_first_position() {
        let range = column(vec![num(3.0), num(1.0), num(2.0), num(2.0)]);
        assert_eq!(
            fn_xmatch(&[num(2.0), range, num(0.0), num(1.0)]).unwrap(),
            num(3.0)
        );
    }

    #[test]
    fn test_xmatch_is_case_insensitive() {
        let range = column(vec![text("Alpha"), text("Beta")]);
        assert_eq!(fn_xmatch(&[text("beta"), range]).unwrap(), num(2.0));
    }

    #[test]
    fn test_xmatch_relational_modes() {
        let range = line(vec![num(10.0), num(30.0), num(20.0)]);
        assert_eq!(
            fn_xmatch(&[num(25.0), range.clone(), num(-1.0)]).unwrap(),
            num(3.0)
        );
        assert_eq!(
            fn_xmatch(&[num(25.0), range, num(1.0)]).unwrap(),
            num(2.0)
        );
    }

    #[test]
    fn test_xmatch_backward_exact_still_reports_first_occurrence() {
        // positions are recovered from the original range by first
        // occurrence, so the scan direction cannot change an exact result
        let range = column(vec![num(1.0), num(2.0), num(1.0)]);
        assert_eq!(
            fn_xmatch(&[num(1.0), range, num(0.0), num(-1.0)]).unwrap(),
            num(1.0)
        );
    }

    #[test]
    fn test_xmatch_binary_duplicate_runs() {
        let ascending = column(vec![num(1.0), num(2.0), num(2.0), num(3.0)]);
        assert_eq!(
            fn_xmatch(&[num(2.0), ascending, num(0.0), num(2.0)]).unwrap(),
            num(2.0)
        );
        let descending = column(vec![num(3.0), num(2.0), num(2.0), num(1.0)]);
        assert_eq!(
            fn_xmatch(&[num(2.0), descending, num(0.0), num(-2.0)]).unwrap(),
            num(3.0)
        );
    }

    #[test]
    fn test_xmatch_rejects_bad_ranges_and_modes() {
        let range = column(vec![num(1.0)]);
        assert_eq!(
            fn_xmatch(&[num(1.0), num(1.0)]).unwrap(),
            err(CellError::Value)
        );
        let matrix = CellValue::Array(vec![
            vec![num(1.0), num(2.0)],
            vec![num(3.0), num(4.0)],
        ]);
        assert_eq!(
            fn_xmatch(&[num(1.0), matrix]).unwrap(),
            err(CellError::Value)
        );
        assert_eq!(
            fn_xmatch(&[num(1.0), range.clone(), num(2.0)]).unwrap(),
            err(CellError::Value)
        );
        assert_eq!(
            fn_xmatch(&[num(1.0), range.clone(), num(0.0), num(0.0)]).unwrap(),
            err(CellError::Value)
        );
        assert_eq!(
            fn_xmatch(&[num(1.0), range, text("abc")]).unwrap(),
            err(CellError::Value)
        );
    }

    #[test]
    fn test_xmatch_missing_key_reads_as_blank() {
        let range = column(vec![num(7.0), CellValue::Blank]);
        assert_eq!(
            fn_xmatch(&[CellValue::Missing, range]).unwrap(),
            num(2.0)
        );
    }

    #[test]
    fn test_xmatch_not_found() {
        let range = column(vec![num(1.0), num(2.0)]);
        assert_eq!(
            fn_xmatch(&[num(9.0), range]).unwrap(),
            err(CellError::Na)
        );
    }
}
