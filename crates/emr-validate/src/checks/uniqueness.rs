use std::collections::HashSet;

use polars::prelude::DataFrame;

use emr_ingest::text_values;

use super::{fraction, lookup, missing_column, percentage, threshold_label};
use crate::check::CheckOutcome;

/// Distinct non-null values over the row count must reach `threshold`.
///
/// Nulls never add to the distinct count, so each null shows up in
/// `duplicate_count` (row count minus distinct count).
pub fn unique(df: &DataFrame, column: &str, threshold: f64) -> CheckOutcome {
    let Some(series) = lookup(df, column) else {
        return missing_column(column);
    };
    let rows = df.height();
    let distinct: HashSet<String> = text_values(series).into_iter().flatten().collect();
    let unique_fraction = fraction(distinct.len(), rows);
    let pct = percentage(unique_fraction);
    CheckOutcome::new(
        unique_fraction >= threshold,
        format!(
            "Unique: {pct:.2}% (threshold: {}%)",
            threshold_label(threshold)
        ),
    )
    .with_detail("column", column)
    .with_detail("unique_percentage", pct)
    .with_detail("threshold", percentage(threshold))
    .with_detail("distinct_count", distinct.len())
    .with_detail("duplicate_count", rows - distinct.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use emr_model::DetailValue;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    #[test]
    fn duplicates_are_counted() {
        let df = DataFrame::new(vec![
            Series::new("encounter_id".into(), &["E1", "E2", "E2", "E3"]).into_column(),
        ])
        .unwrap();
        let outcome = unique(&df, "encounter_id", 0.7);
        assert!(outcome.passed);
        assert_eq!(outcome.message, "Unique: 75.00% (threshold: 70%)");
        assert_eq!(outcome.details.get("duplicate_count"), Some(&DetailValue::Int(1)));
        assert!(!unique(&df, "encounter_id", 1.0).passed);
    }

    #[test]
    fn nulls_reduce_uniqueness() {
        let df = DataFrame::new(vec![
            Series::new("mrn".into(), &[Some("A"), None, Some("B")]).into_column(),
        ])
        .unwrap();
        let outcome = unique(&df, "mrn", 1.0);
        assert!(!outcome.passed);
        assert_eq!(outcome.details.get("distinct_count"), Some(&DetailValue::Int(2)));
        assert_eq!(outcome.details.get("duplicate_count"), Some(&DetailValue::Int(1)));
    }
}
