//! Set membership. Values are compared by their text rendering, so an
//! integer column can be checked against `["1", "2"]`.

use std::collections::BTreeSet;

use polars::prelude::DataFrame;

use emr_ingest::text_values;

use super::{MAX_INVALID_EXAMPLES, fraction, lookup, missing_column, percentage, threshold_label};
use crate::check::CheckOutcome;

/// Fraction of cells in `allowed` must reach `threshold`. Nulls count as
/// invalid but are never listed among the invalid examples.
pub fn in_set(df: &DataFrame, column: &str, allowed: &BTreeSet<String>, threshold: f64) -> CheckOutcome {
    let Some(series) = lookup(df, column) else {
        return missing_column(column);
    };
    let rows = df.height();
    let mut valid = 0usize;
    let mut examples: Vec<String> = Vec::new();
    for value in text_values(series) {
        match value {
            Some(text) if allowed.contains(&text) => valid += 1,
            Some(text) => {
                if examples.len() < MAX_INVALID_EXAMPLES && !examples.contains(&text) {
                    examples.push(text);
                }
            }
            None => {}
        }
    }
    let valid_fraction = fraction(valid, rows);
    let pct = percentage(valid_fraction);
    CheckOutcome::new(
        valid_fraction >= threshold,
        format!(
            "Values in set for '{column}': {pct}% (threshold {}%)",
            threshold_label(threshold)
        ),
    )
    .with_detail("column", column)
    .with_detail("valid_percentage", pct)
    .with_detail("threshold", percentage(threshold))
    .with_detail("invalid_count", rows - valid)
    .with_detail("invalid_values", examples)
}
