//! Data model for EMR data validation runs.

pub mod detail;
pub mod metadata;
pub mod result;
pub mod summary;

pub use detail::{DetailValue, Details};
pub use metadata::RunMetadata;
pub use result::{CheckLabel, CheckResult, RESERVED_FIELDS, ValidationStatus};
pub use summary::{Summary, round2, success_rate};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_match_status() {
        let results = vec![
            CheckResult::rule("column_exists", true, true, "Column 'mrn' exists"),
            CheckResult::rule("values_unique", false, false, "Unique: 50.00%"),
        ];
        let summary = Summary::from_results(&results);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.success_rate, 50.0);
        assert_eq!(
            ValidationStatus::from_results(&results),
            ValidationStatus::Warning
        );
    }

    #[test]
    fn metadata_round_trips() {
        let metadata = RunMetadata::new("EMR Validation");
        let json = serde_json::to_string(&metadata).expect("serialize metadata");
        let round: RunMetadata = serde_json::from_str(&json).expect("deserialize metadata");
        assert_eq!(round, metadata);
    }
}
