//! Table shape checks: column existence, required columns, row and column counts.

use polars::prelude::DataFrame;

use crate::check::CheckOutcome;

/// Passes iff `column` is one of the dataset's columns.
pub fn column_exists(df: &DataFrame, column: &str) -> CheckOutcome {
    let outcome = if df.get_column_index(column).is_some() {
        CheckOutcome::pass(format!("Column '{column}' exists"))
    } else {
        CheckOutcome::fail(format!("Column '{column}' does not exist"))
    };
    outcome.with_detail("column", column)
}

/// Passes iff every required column is present. Missing columns are reported
/// in declaration order.
pub fn required_columns(df: &DataFrame, required: &[String]) -> CheckOutcome {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| df.get_column_index(name).is_none())
        .cloned()
        .collect();
    let outcome = if missing.is_empty() {
        CheckOutcome::pass("All required columns present")
    } else {
        CheckOutcome::fail(format!("Missing required columns: {}", missing.join(", ")))
    };
    outcome
        .with_detail("required_count", required.len())
        .with_detail("missing_columns", missing)
}

pub fn row_count_between(df: &DataFrame, min: usize, max: usize) -> CheckOutcome {
    let rows = df.height();
    CheckOutcome::new(
        (min..=max).contains(&rows),
        format!("Row count: {rows} (expected: [{min}, {max}])"),
    )
    .with_detail("row_count", rows)
    .with_detail("min_expected", min)
    .with_detail("max_expected", max)
}

pub fn column_count_equals(df: &DataFrame, expected: usize) -> CheckOutcome {
    let columns = df.width();
    CheckOutcome::new(
        columns == expected,
        format!("Column count: {columns} (expected: {expected})"),
    )
    .with_detail("column_count", columns)
    .with_detail("expected", expected)
}
