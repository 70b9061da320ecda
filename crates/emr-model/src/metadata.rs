use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::result::CheckResult;

/// Run-level metadata owned by a validator.
///
/// Counters are strictly additive: every recorded result bumps
/// `total_validations` and exactly one of `passed`, `failed` or `warnings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub name: String,
    pub created_at: String,
    pub total_rows: Option<usize>,
    pub total_columns: Option<usize>,
    pub total_validations: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
}

impl RunMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: Utc::now().to_rfc3339(),
            total_rows: None,
            total_columns: None,
            total_validations: 0,
            passed: 0,
            failed: 0,
            warnings: 0,
        }
    }

    /// Record the dataset shape at load time.
    pub fn set_shape(&mut self, rows: usize, columns: usize) {
        self.total_rows = Some(rows);
        self.total_columns = Some(columns);
    }

    pub fn record(&mut self, result: &CheckResult) {
        self.total_validations += 1;
        if result.passed {
            self.passed += 1;
        } else if result.critical {
            self.failed += 1;
        } else {
            self.warnings += 1;
        }
    }
}
