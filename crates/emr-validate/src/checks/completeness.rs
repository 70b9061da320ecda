use polars::prelude::DataFrame;

use emr_ingest::missing_count;

use super::{fraction, lookup, missing_column, percentage, threshold_label};
use crate::check::CheckOutcome;

/// Fraction of non-null cells must reach `threshold`.
pub fn not_null(df: &DataFrame, column: &str, threshold: f64) -> CheckOutcome {
    let Some(series) = lookup(df, column) else {
        return missing_column(column);
    };
    let rows = df.height();
    let null_count = missing_count(series);
    let non_null = fraction(rows - null_count, rows);
    let pct = percentage(non_null);
    CheckOutcome::new(
        non_null >= threshold,
        format!(
            "Non-null percentage for '{column}': {pct}% (threshold {}%)",
            threshold_label(threshold)
        ),
    )
    .with_detail("column", column)
    .with_detail("non_null_percentage", pct)
    .with_detail("threshold", percentage(threshold))
    .with_detail("null_count", null_count)
}
