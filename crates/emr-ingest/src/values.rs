//! Polars `AnyValue` helpers.
//!
//! Checks work on one column at a time and look at each cell either as text
//! or as a number. A cell is missing when it is null or a floating-point NaN.

use polars::prelude::{AnyValue, Column};

/// Returns true for null cells and NaN floats.
pub fn is_missing_value(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => true,
        AnyValue::Float32(v) => v.is_nan(),
        AnyValue::Float64(v) => v.is_nan(),
        _ => false,
    }
}

/// Text rendering of a cell, `None` when the cell is missing.
///
/// Integers render without a decimal part, floats without trailing zeros and
/// booleans as `true`/`false`.
pub fn any_to_string(value: AnyValue<'_>) -> Option<String> {
    if is_missing_value(&value) {
        return None;
    }
    let text = match value {
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    };
    Some(text)
}

/// Formats a floating-point number without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    if v.fract() == 0.0 && v.is_finite() {
        return format!("{v:.0}");
    }
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Numeric view of a cell. Text cells are parsed; anything else is `None`.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    let number = match value {
        AnyValue::Int8(v) => f64::from(v),
        AnyValue::Int16(v) => f64::from(v),
        AnyValue::Int32(v) => f64::from(v),
        AnyValue::Int64(v) => v as f64,
        AnyValue::UInt8(v) => f64::from(v),
        AnyValue::UInt16(v) => f64::from(v),
        AnyValue::UInt32(v) => f64::from(v),
        AnyValue::UInt64(v) => v as f64,
        AnyValue::Float32(v) => f64::from(v),
        AnyValue::Float64(v) => v,
        AnyValue::String(s) => parse_f64(s)?,
        AnyValue::StringOwned(s) => parse_f64(&s)?,
        _ => return None,
    };
    if number.is_nan() { None } else { Some(number) }
}

/// Parses a string as f64, returning None for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Text view of every cell in a column, in row order.
pub fn text_values(column: &Column) -> Vec<Option<String>> {
    (0..column.len())
        .map(|idx| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect()
}

/// Numeric view of every cell in a column, in row order.
pub fn numeric_values(column: &Column) -> Vec<Option<f64>> {
    (0..column.len())
        .map(|idx| any_to_f64(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect()
}

/// Number of missing cells in a column.
pub fn missing_count(column: &Column) -> usize {
    (0..column.len())
        .filter(|&idx| is_missing_value(&column.get(idx).unwrap_or(AnyValue::Null)))
        .count()
}
