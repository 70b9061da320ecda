use polars::prelude::DataFrame;

use emr_ingest::{format_numeric, numeric_values};
use emr_model::round2;

use super::{fraction, lookup, missing_column, percentage, threshold_label};
use crate::check::CheckOutcome;

/// Fraction of cells within `[min, max]` must reach `threshold`. Nulls and
/// values that are not numeric count as out of range.
pub fn between(df: &DataFrame, column: &str, min: f64, max: f64, threshold: f64) -> CheckOutcome {
    let Some(series) = lookup(df, column) else {
        return missing_column(column);
    };
    let rows = df.height();
    let in_range = numeric_values(series)
        .into_iter()
        .flatten()
        .filter(|value| (min..=max).contains(value))
        .count();
    let valid_fraction = fraction(in_range, rows);
    let pct = percentage(valid_fraction);
    CheckOutcome::new(
        valid_fraction >= threshold,
        format!(
            "In range [{}, {}]: {pct:.2}% (threshold: {}%)",
            format_numeric(min),
            format_numeric(max),
            threshold_label(threshold)
        ),
    )
    .with_detail("column", column)
    .with_detail("valid_percentage", pct)
    .with_detail("threshold", percentage(threshold))
    .with_detail("min_value", min)
    .with_detail("max_value", max)
    .with_detail("out_of_range_count", rows - in_range)
}

/// Mean of the numeric, non-null cells must lie within `[min, max]`.
pub fn mean_between(df: &DataFrame, column: &str, min: f64, max: f64) -> CheckOutcome {
    let Some(series) = lookup(df, column) else {
        return missing_column(column);
    };
    let values: Vec<f64> = numeric_values(series).into_iter().flatten().collect();
    if values.is_empty() {
        return CheckOutcome::fail(format!("No numeric values in column '{column}' to average"))
            .with_detail("column", column)
            .with_detail("mean", None::<f64>);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    CheckOutcome::new(
        (min..=max).contains(&mean),
        format!(
            "Mean: {mean:.2} (expected: [{}, {}])",
            format_numeric(min),
            format_numeric(max)
        ),
    )
    .with_detail("column", column)
    .with_detail("mean", round2(mean))
    .with_detail("min_expected", min)
    .with_detail("max_expected", max)
}
