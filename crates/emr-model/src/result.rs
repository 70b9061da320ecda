use std::fmt;

use serde::{Deserialize, Serialize};

use crate::detail::{DetailValue, Details};

/// Overall or per-check status.
///
/// Precedence is `Failed` > `Warning` > `Passed`: a single critical failure
/// overrides any number of warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Passed,
    Warning,
    Failed,
}

impl ValidationStatus {
    /// Status of a whole run, derived from its recorded results.
    pub fn from_results(results: &[CheckResult]) -> Self {
        if results.iter().any(CheckResult::is_failure) {
            Self::Failed
        } else if results.iter().any(CheckResult::is_warning) {
            Self::Warning
        } else {
            Self::Passed
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Warning => "WARNING",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Name of the check that produced a result.
///
/// Validator and rule-set results are keyed by rule name, suite results by
/// expectation name. Serialized as a single `"rule"` or `"expectation"` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckLabel {
    Rule(String),
    Expectation(String),
}

impl CheckLabel {
    pub fn name(&self) -> &str {
        match self {
            Self::Rule(name) | Self::Expectation(name) => name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rule(_) => "rule",
            Self::Expectation(_) => "expectation",
        }
    }
}

/// Record fields a details entry must not shadow, in serialized and flat form.
pub const RESERVED_FIELDS: [&str; 9] = [
    "rule",
    "expectation",
    "kind",
    "name",
    "description",
    "critical",
    "passed",
    "status",
    "message",
];

/// The atomic unit of a validation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    #[serde(flatten)]
    pub label: CheckLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub column: Option<String>,
    pub critical: bool,
    pub passed: bool,
    pub message: String,
    #[serde(flatten)]
    pub details: Details,
}

impl CheckResult {
    pub fn new(label: CheckLabel, critical: bool, passed: bool, message: impl Into<String>) -> Self {
        Self {
            label,
            description: None,
            column: None,
            critical,
            passed,
            message: message.into(),
            details: Details::new(),
        }
    }

    pub fn rule(name: impl Into<String>, critical: bool, passed: bool, message: impl Into<String>) -> Self {
        Self::new(CheckLabel::Rule(name.into()), critical, passed, message)
    }

    pub fn expectation(
        name: impl Into<String>,
        critical: bool,
        passed: bool,
        message: impl Into<String>,
    ) -> Self {
        Self::new(CheckLabel::Expectation(name.into()), critical, passed, message)
    }

    #[must_use]
    pub fn with_column(mut self, column: Option<String>) -> Self {
        self.column = column;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a details bag. A textual `column` entry is lifted into
    /// [`CheckResult::column`] when no column was set explicitly. Any other
    /// key that names a record field is stored as `detail_<key>`, so the
    /// serialized record and flat exports never carry a field twice.
    #[must_use]
    pub fn with_details(mut self, mut details: Details) -> Self {
        if let Some(value) = details.remove("column") {
            match value {
                DetailValue::Text(column) => {
                    if self.column.is_none() {
                        self.column = Some(column);
                    }
                }
                DetailValue::Null => {}
                other => {
                    details.insert("column_value".to_string(), other);
                }
            }
        }
        for key in RESERVED_FIELDS {
            if let Some(value) = details.remove(key) {
                details.insert(format!("detail_{key}"), value);
            }
        }
        self.details = details;
        self
    }

    pub fn name(&self) -> &str {
        self.label.name()
    }

    pub fn detail(&self, key: &str) -> Option<&DetailValue> {
        self.details.get(key)
    }

    /// Critical check that did not pass.
    pub fn is_failure(&self) -> bool {
        !self.passed && self.critical
    }

    /// Non-critical check that did not pass.
    pub fn is_warning(&self) -> bool {
        !self.passed && !self.critical
    }

    pub fn status(&self) -> ValidationStatus {
        if self.passed {
            ValidationStatus::Passed
        } else if self.critical {
            ValidationStatus::Failed
        } else {
            ValidationStatus::Warning
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_criticality() {
        let failed = CheckResult::rule("a", true, false, "x");
        let warning = CheckResult::rule("b", false, false, "x");
        let passed = CheckResult::rule("c", true, true, "x");
        assert_eq!(failed.status(), ValidationStatus::Failed);
        assert_eq!(warning.status(), ValidationStatus::Warning);
        assert_eq!(passed.status(), ValidationStatus::Passed);
        assert_eq!(
            ValidationStatus::from_results(&[passed.clone(), warning.clone()]),
            ValidationStatus::Warning
        );
        assert_eq!(
            ValidationStatus::from_results(&[warning, failed, passed]),
            ValidationStatus::Failed
        );
        assert_eq!(ValidationStatus::from_results(&[]), ValidationStatus::Passed);
    }

    #[test]
    fn column_detail_is_lifted() {
        let mut details = Details::new();
        details.insert("column".to_string(), "age".into());
        details.insert("null_count".to_string(), 5usize.into());
        let result = CheckResult::expectation("age_not_null", true, true, "ok").with_details(details);
        assert_eq!(result.column.as_deref(), Some("age"));
        assert!(result.detail("column").is_none());
        assert_eq!(result.detail("null_count"), Some(&DetailValue::Int(5)));
    }

    #[test]
    fn record_fields_are_not_shadowed_by_details() {
        let mut details = Details::new();
        details.insert("passed".to_string(), true.into());
        details.insert("status".to_string(), "ok".into());
        details.insert("column".to_string(), 3usize.into());
        let result = CheckResult::expectation("custom", true, false, "bad").with_details(details);
        assert!(result.detail("passed").is_none());
        assert_eq!(result.detail("detail_passed"), Some(&DetailValue::Bool(true)));
        assert_eq!(result.detail("detail_status"), Some(&DetailValue::from("ok")));
        assert_eq!(result.detail("column_value"), Some(&DetailValue::Int(3)));

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["passed"], false);
        assert_eq!(value["detail_passed"], true);
    }

    #[test]
    fn serialized_shape() {
        let mut details = Details::new();
        details.insert("null_count".to_string(), 0usize.into());
        let result = CheckResult::rule("column_not_null", true, true, "Non-null percentage for 'mrn': 100%")
            .with_column(Some("mrn".to_string()))
            .with_details(details);
        insta::assert_json_snapshot!(result, @r#"
        {
          "rule": "column_not_null",
          "column": "mrn",
          "critical": true,
          "passed": true,
          "message": "Non-null percentage for 'mrn': 100%",
          "null_count": 0
        }
        "#);
    }
}
