use serde::{Deserialize, Serialize};

use crate::metadata::RunMetadata;
use crate::result::CheckResult;

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `passed / total * 100`, rounded to two decimals; zero when nothing ran.
pub fn success_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(passed as f64 / total as f64 * 100.0)
}

/// Aggregate counts of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    pub success_rate: f64,
}

impl Summary {
    /// Summary from the running totals kept in the metadata.
    pub fn from_metadata(metadata: &RunMetadata) -> Self {
        Self {
            total: metadata.total_validations,
            passed: metadata.passed,
            failed: metadata.failed,
            warnings: metadata.warnings,
            success_rate: success_rate(metadata.passed, metadata.total_validations),
        }
    }

    /// Summary counted directly from a result list (used for batch results
    /// that never went through a validator).
    pub fn from_results(results: &[CheckResult]) -> Self {
        let passed = results.iter().filter(|result| result.passed).count();
        let failed = results.iter().filter(|result| result.is_failure()).count();
        let warnings = results.iter().filter(|result| result.is_warning()).count();
        Self {
            total: results.len(),
            passed,
            failed,
            warnings,
            success_rate: success_rate(passed, results.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_summary_has_zero_rate() {
        let summary = Summary::from_results(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.success_rate, 0.0);
    }

    #[test]
    fn rate_is_rounded() {
        assert_eq!(success_rate(1, 3), 33.33);
        assert_eq!(success_rate(2, 3), 66.67);
        assert_eq!(success_rate(3, 3), 100.0);
    }

    #[test]
    fn metadata_and_results_agree() {
        let results = vec![
            CheckResult::rule("a", true, true, ""),
            CheckResult::rule("b", true, false, ""),
            CheckResult::rule("c", false, false, ""),
        ];
        let mut metadata = RunMetadata::new("Test");
        for result in &results {
            metadata.record(result);
        }
        assert_eq!(Summary::from_metadata(&metadata), Summary::from_results(&results));
    }
}
