//! CHOOSE, INDEX, ROWS, COLUMNS and ADDRESS.

use gridstone_core::{CellError, CellValue};
use lazy_regex::regex_is_match;

use crate::coerce;
use crate::error::LookupResult;
use crate::functions::{FunctionDef, FunctionRegistry};

pub fn register_reference_functions(registry: &mut FunctionRegistry) {
    // CHOOSE
    registry.register(FunctionDef {
        name: "CHOOSE",
        min_args: 2,
        max_args: None,
        implementation: fn_choose,
    });

    // INDEX
    registry.register(FunctionDef {
        name: "INDEX",
        min_args: 2,
        max_args: Some(3),
        implementation: fn_index,
    });

    // ROWS
    registry.register(FunctionDef {
        name: "ROWS",
        min_args: 1,
        max_args: Some(1),
        implementation: fn_rows,
    });

    // COLUMNS
    registry.register(FunctionDef {
        name: "COLUMNS",
        min_args: 1,
        max_args: Some(1),
        implementation: fn_columns,
    });

    // ADDRESS
    registry.register(FunctionDef {
        name: "ADDRESS",
        min_args: 2,
        max_args: Some(5),
        implementation: fn_address,
    });
}

/// CHOOSE(index_num, value1, [value2], ...)
pub fn fn_choose(args: &[CellValue]) -> LookupResult<CellValue> {
    Ok(choose_value(&args[0], args))
}

// An array index broadcasts CHOOSE over its cells.
fn choose_value(index: &CellValue, args: &[CellValue]) -> CellValue {
    let position = match index {
        CellValue::Array(rows) => {
            return CellValue::Array(
                rows.iter()
                    .map(|row| row.iter().map(|cell| choose_value(cell, args)).collect())
                    .collect(),
            );
        }
        CellValue::Error(e) => return CellValue::Error(*e),
        CellValue::String(s) => {
            let trimmed = s.trim();
            if !coerce::is_valid_number(trimmed, false) {
                return CellValue::Error(CellError::Value);
            }
            trimmed.parse().unwrap_or(f64::NAN)
        }
        CellValue::Number(n) => *n,
        CellValue::Boolean(true) => 1.0,
        CellValue::Boolean(false) => 0.0,
        CellValue::Blank => 0.0,
        CellValue::Missing => f64::NAN,
    };
    let position = position.trunc();
    if position < 1.0 || position > 254.0 {
        return CellValue::Error(CellError::Value);
    }
    if (args.len() as f64) < position + 1.0 {
        return CellValue::Error(CellError::Value);
    }
    if !position.is_finite() {
        return CellValue::Missing;
    }
    args[position as usize].clone()
}

/// INDEX(array, row_num, [column_num])
///
/// A zero row or column selects the whole row or column; zero for both
/// returns the array itself. Single-cell results collapse to a scalar.
pub fn fn_index(args: &[CellValue]) -> LookupResult<CellValue> {
    let arg_refs: Vec<&CellValue> = args.iter().collect();
    if let Some(e) = coerce::first_error(&arg_refs) {
        return Ok(CellValue::Error(e));
    }
    let mut rows: Vec<Vec<CellValue>> = match &args[0] {
        CellValue::Array(rows) => rows.clone(),
        other => vec![vec![other.clone()]],
    };
    if rows.is_empty() {
        rows.push(vec![CellValue::Missing]);
    }

    // on a single-row array an omitted column argument shifts the second
    // argument over to the column position
    let single_row = rows.len() == 1;
    let (row_arg, col_arg) = match args.get(2) {
        None | Some(CellValue::Missing) => {
            if single_row {
                (CellValue::Number(1.0), args[1].clone())
            } else {
                (args[1].clone(), CellValue::Number(1.0))
            }
        }
        Some(col) => (args[1].clone(), col.clone()),
    };
    let col = match coerce::get_number(&col_arg) {
        CellValue::Number(n) => n.trunc(),
        _ => return Ok(CellValue::Error(CellError::Value)),
    };
    let row = match coerce::get_number(&row_arg) {
        CellValue::Number(n) => n.trunc(),
        _ => return Ok(CellValue::Error(CellError::Value)),
    };
    if col < 0.0 || row < 0.0 || col.is_nan() || row.is_nan() {
        return Ok(CellValue::Error(CellError::Value));
    }
    if row > rows.len() as f64 || col > rows.first().map_or(0, |r| r.len()) as f64 {
        return Ok(CellValue::Error(CellError::Ref));
    }

    let result: Vec<Vec<CellValue>> = if row == 0.0 && col == 0.0 {
        rows
    } else if col == 0.0 {
        vec![rows[row as usize - 1].clone()]
    } else if row == 0.0 {
        coerce::column_as_matrix(&rows, col as usize - 1)
    } else {
        return Ok(rows[row as usize - 1]
            .get(col as usize - 1)
            .cloned()
            .unwrap_or(CellValue::Missing));
    };
    if result.len() == 1 && result[0].len() == 1 {
        return Ok(result[0][0].clone());
    }
    Ok(CellValue::Array(result))
}

/// ROWS(array)
pub fn fn_rows(args: &[CellValue]) -> LookupResult<CellValue> {
    Ok(match &args[0] {
        CellValue::Array(rows) => CellValue::Number(rows.len() as f64),
        _ => CellValue::Number(1.0),
    })
}

/// COLUMNS(array)
pub fn fn_columns(args: &[CellValue]) -> LookupResult<CellValue> {
    Ok(match &args[0] {
        CellValue::Array(rows) => match rows.first() {
            Some(row) => CellValue::Number(row.len() as f64),
            None => CellValue::Error(CellError::Value),
        },
        _ => CellValue::Number(1.0),
    })
}

/// ADDRESS(row_num, column_num, [abs_num], [a1], [sheet_text])
pub fn fn_address(args: &[CellValue]) -> LookupResult<CellValue> {
    let arg_refs: Vec<&CellValue> = args.iter().collect();
    if let Some(e) = coerce::first_error(&arg_refs) {
        return Ok(CellValue::Error(e));
    }
    let row = match address_coordinate(&args[0]) {
        Ok(n) => n,
        Err(e) => return Ok(CellValue::Error(e)),
    };
    let column = match address_coordinate(&args[1]) {
        Ok(n) => n,
        Err(e) => return Ok(CellValue::Error(e)),
    };
    if row < 1.0 || column < 1.0 {
        return Ok(CellValue::Error(CellError::Value));
    }
    let abs_arg = match args.get(2) {
        None | Some(CellValue::Missing) => CellValue::Number(1.0),
        Some(v) => v.clone(),
    };
    let abs_num = match coerce::get_number(&abs_arg) {
        CellValue::Number(n) => n.trunc(),
        _ => return Ok(CellValue::Error(CellError::Value)),
    };
    if !(1.0..=4.0).contains(&abs_num) {
        return Ok(CellValue::Error(CellError::Value));
    }
    let a1_arg = match args.get(3) {
        None | Some(CellValue::Missing) => CellValue::Boolean(true),
        Some(v) => v.clone(),
    };
    let a1 = match coerce::parse_bool(&a1_arg) {
        CellValue::Boolean(b) => b,
        _ => return Ok(CellValue::Error(CellError::Value)),
    };

    let mut result = String::new();
    if let Some(sheet) = args.get(4) {
        if !sheet.is_missing() {
            result.push_str(&sheet_prefix(sheet));
            result.push('!');
        }
    }

    let cell = if a1 {
        let letters = column_letters(column - 1.0);
        match abs_num as u8 {
            1 => format!("${}${}", letters, row),
            2 => format!("{}${}", letters, row),
            3 => format!("${}{}", letters, row),
            _ => format!("{}{}", letters, row),
        }
    } else {
        match abs_num as u8 {
            1 => format!("R{}C{}", row, column),
            2 => format!("R{}C[{}]", row, column),
            3 => format!("R[{}]C{}", row, column),
            _ => format!("R[{}]C[{}]", row, column),
        }
    };
    result.push_str(&cell);
    Ok(CellValue::String(result))
}

// Coordinates take anything the numeric coercion does, plus the textual
// booleans "TRUE" and "FALSE".
fn address_coordinate(value: &CellValue) -> Result<f64, CellError> {
    let n = match coerce::get_number(value) {
        CellValue::Number(n) => n,
        CellValue::String(s) => match s.to_uppercase().as_str() {
            "TRUE" => 1.0,
            "FALSE" => 0.0,
            _ => return Err(CellError::Value),
        },
        CellValue::Boolean(true) => 1.0,
        CellValue::Boolean(false) => 0.0,
        CellValue::Blank => 0.0,
        CellValue::Missing => f64::NAN,
        _ => return Err(CellError::Value),
    };
    Ok(n.trunc())
}

// Only the first character decides whether a sheet name needs quoting.
fn sheet_prefix(sheet: &CellValue) -> String {
    if sheet.is_blank() {
        return String::new();
    }
    let name = sheet.to_string();
    let upper = name.to_uppercase();
    if upper == "TRUE" || upper == "FALSE" {
        return format!("'{}'", upper);
    }
    if !name.is_empty()
        && (regex_is_match!(r"^-*[0-9]", &name) || !regex_is_match!(r"^[A-Za-z0-9_]", &name))
    {
        return format!("'{}'", name);
    }
    name
}

/// Bijective base-26 column naming: 0 is "A", 25 is "Z", 26 is "AA".
fn column_letters(index: f64) -> String {
    if !index.is_finite() {
        return String::new();
    }
    let mut letters = String::new();
    let mut index = index;
    while index >= 0.0 {
        letters.insert(0, (b'A' + (index % 26.0) as u8) as char);
        index = (index / 26.0).floor() - 1.0;
    }
    letters
}
