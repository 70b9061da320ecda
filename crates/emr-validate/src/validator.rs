//! The validation orchestrator.
//!
//! [`DataValidator`] owns one dataset, the ordered list of results recorded
//! against it and the running counters in [`RunMetadata`]. Every check method
//! appends exactly one result and returns the validator so calls can be
//! chained with `?`:
//!
//! ```ignore
//! validator
//!     .expect_column_exists("mrn", true)?
//!     .expect_column_not_null("mrn", 1.0, true)?;
//! ```

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

use emr_ingest::{ColumnAliases, read_dataset, resolve_aliases};
use emr_model::{CheckResult, RunMetadata, Summary, ValidationStatus};

use crate::check::{Check, Params};
use crate::checks::IcdVersion;
use crate::error::{Result, ValidationError};
use crate::expectations;
use crate::report::{self, ValidationResults};
use crate::rules::RuleSet;
use crate::suite::ExpectationSuite;

/// Name used when a validator is created without one.
pub const DEFAULT_VALIDATOR_NAME: &str = "EMR Validation";

#[derive(Debug, Clone)]
pub struct DataValidator {
    data: Option<DataFrame>,
    results: Vec<CheckResult>,
    metadata: RunMetadata,
}

impl Default for DataValidator {
    fn default() -> Self {
        Self::new(DEFAULT_VALIDATOR_NAME)
    }
}

impl DataValidator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            data: None,
            results: Vec::new(),
            metadata: RunMetadata::new(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Take ownership of `df` as the dataset under validation.
    pub fn load_data(&mut self, df: DataFrame) -> &mut Self {
        self.metadata.set_shape(df.height(), df.width());
        info!(
            validator = %self.metadata.name,
            rows = df.height(),
            columns = df.width(),
            "dataset loaded"
        );
        self.data = Some(df);
        self
    }

    pub fn load_file(&mut self, path: &Path) -> Result<&mut Self> {
        let df = read_dataset(path)?;
        Ok(self.load_data(df))
    }

    /// Load a file and rename aliased headers to their canonical names.
    pub fn load_file_with_aliases(&mut self, path: &Path, aliases: &ColumnAliases) -> Result<&mut Self> {
        let mut df = read_dataset(path)?;
        let renames = resolve_aliases(&mut df, aliases)?;
        if !renames.is_empty() {
            info!(renamed = renames.len(), "resolved column aliases");
        }
        Ok(self.load_data(df))
    }

    pub fn data(&self) -> Option<&DataFrame> {
        self.data.as_ref()
    }

    fn dataset(&self) -> Result<&DataFrame> {
        self.data.as_ref().ok_or_else(|| ValidationError::DatasetNotLoaded {
            validator: self.metadata.name.clone(),
        })
    }

    fn run(
        &mut self,
        rule: &str,
        column: Option<&str>,
        critical: bool,
        check: &Check,
        params: &Params,
    ) -> Result<&mut Self> {
        let outcome = check.invoke(self.dataset()?, params);
        let result = CheckResult::rule(rule, critical, outcome.passed, outcome.message)
            .with_column(column.map(str::to_string))
            .with_details(outcome.details);
        self.record(result);
        Ok(self)
    }

    fn record(&mut self, result: CheckResult) {
        debug!(
            rule = result.name(),
            column = result.column.as_deref().unwrap_or(""),
            passed = result.passed,
            critical = result.critical,
            "check recorded"
        );
        if result.is_failure() {
            warn!(rule = result.name(), message = %result.message, "critical check failed");
        }
        self.metadata.record(&result);
        self.results.push(result);
    }

    pub fn expect_column_exists(&mut self, column: &str, critical: bool) -> Result<&mut Self> {
        let check = expectations::column_to_exist(column);
        self.run("column_exists", Some(column), critical, &check, &Params::new())
    }

    /// `threshold` is the minimum non-null fraction; pass `1.0` for zero tolerance.
    pub fn expect_column_not_null(&mut self, column: &str, threshold: f64, critical: bool) -> Result<&mut Self> {
        let check = expectations::column_values_to_not_be_null(column, threshold);
        self.run("column_not_null", Some(column), critical, &check, &Params::new())
    }

    pub fn expect_column_values_in_set<I, S>(
        &mut self,
        column: &str,
        values: I,
        threshold: f64,
        critical: bool,
    ) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let check = expectations::column_values_to_be_in_set(column, values, threshold);
        self.run("values_in_set", Some(column), critical, &check, &Params::new())
    }

    pub fn expect_column_values_unique(&mut self, column: &str, threshold: f64, critical: bool) -> Result<&mut Self> {
        let check = expectations::column_values_to_be_unique(column, threshold);
        self.run("values_unique", Some(column), critical, &check, &Params::new())
    }

    pub fn expect_column_values_between(
        &mut self,
        column: &str,
        min: f64,
        max: f64,
        threshold: f64,
        critical: bool,
    ) -> Result<&mut Self> {
        let check = expectations::column_values_to_be_between(column, min, max, threshold);
        self.run("values_between", Some(column), critical, &check, &Params::new())
    }

    pub fn expect_column_date_format(
        &mut self,
        column: &str,
        format: &str,
        threshold: f64,
        critical: bool,
    ) -> Result<&mut Self> {
        let check = expectations::column_values_to_match_date_format(column, format, threshold);
        self.run("date_format", Some(column), critical, &check, &Params::new())
    }

    pub fn expect_mrn_format(
        &mut self,
        column: &str,
        pattern: Option<&str>,
        threshold: f64,
        critical: bool,
    ) -> Result<&mut Self> {
        let check = expectations::column_values_to_be_valid_mrn(column, pattern, threshold);
        self.run("mrn_format", Some(column), critical, &check, &Params::new())
    }

    pub fn expect_icd_format(
        &mut self,
        column: &str,
        version: IcdVersion,
        threshold: f64,
        critical: bool,
    ) -> Result<&mut Self> {
        let check = expectations::column_values_to_be_valid_icd(column, version, threshold);
        self.run("icd_format", Some(column), critical, &check, &Params::new())
    }

    /// Run an arbitrary check under `rule_name`.
    pub fn expect_custom(
        &mut self,
        rule_name: &str,
        check: &Check,
        column: Option<&str>,
        critical: bool,
        params: &Params,
    ) -> Result<&mut Self> {
        self.run(rule_name, column, critical, check, params)
    }

    /// Execute a rule set and record its results in declaration order.
    pub fn apply_ruleset(&mut self, ruleset: &RuleSet) -> Result<&mut Self> {
        let results = ruleset.execute_all(self.dataset()?);
        for result in results {
            self.record(result);
        }
        Ok(self)
    }

    /// Validate an expectation suite and record its results in declaration order.
    pub fn apply_suite(&mut self, suite: &ExpectationSuite) -> Result<&mut Self> {
        let results = suite.validate(self.dataset()?);
        for result in results {
            self.record(result);
        }
        Ok(self)
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn metadata(&self) -> &RunMetadata {
        &self.metadata
    }

    pub fn summary(&self) -> Summary {
        Summary::from_metadata(&self.metadata)
    }

    pub fn status(&self) -> ValidationStatus {
        ValidationStatus::from_results(&self.results)
    }

    /// Owned snapshot of metadata, summary and results.
    pub fn get_results(&self) -> ValidationResults {
        ValidationResults {
            metadata: self.metadata.clone(),
            summary: self.summary(),
            results: self.results.clone(),
        }
    }

    /// True iff no critical check has failed.
    pub fn is_valid(&self) -> bool {
        !self.results.iter().any(CheckResult::is_failure)
    }

    /// Every result that did not pass, critical or not.
    pub fn get_failed_validations(&self) -> Vec<&CheckResult> {
        self.results.iter().filter(|result| !result.passed).collect()
    }

    pub fn to_dataframe(&self) -> Result<DataFrame> {
        report::results_to_dataframe(&self.results)
    }

    pub fn write_csv(&self, path: &Path) -> Result<PathBuf> {
        report::write_results_csv_file(path, &self.results)
    }

    pub fn write_json_report(&self, path: &Path) -> Result<PathBuf> {
        report::write_json_report(path, &self.get_results())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::CheckOutcome;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    fn patients() -> DataFrame {
        DataFrame::new(vec![
            Series::new("mrn".into(), &["MRN00000001", "MRN00000002", "MRN00000002"]).into_column(),
            Series::new("gender".into(), &[Some("M"), Some("F"), None]).into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn checks_before_load_fail() {
        let mut validator = DataValidator::new("Unloaded");
        let err = validator.expect_column_exists("mrn", true).unwrap_err();
        assert!(matches!(err, ValidationError::DatasetNotLoaded { .. }));
        assert!(validator.results().is_empty());
        assert_eq!(validator.metadata().total_validations, 0);
    }

    #[test]
    fn chained_checks_accumulate() {
        let mut validator = DataValidator::default();
        validator.load_data(patients());
        validator
            .expect_column_exists("mrn", true)
            .unwrap()
            .expect_column_values_unique("mrn", 1.0, false)
            .unwrap()
            .expect_column_values_in_set("gender", ["M", "F"], 1.0, true)
            .unwrap()
            .expect_column_exists("dob", false)
            .unwrap();

        let names: Vec<&str> = validator.results().iter().map(CheckResult::name).collect();
        assert_eq!(
            names,
            ["column_exists", "values_unique", "values_in_set", "column_exists"]
        );
        let metadata = validator.metadata();
        assert_eq!(metadata.total_rows, Some(3));
        assert_eq!(metadata.total_validations, 4);
        assert_eq!(metadata.passed, 1);
        assert_eq!(metadata.failed, 1);
        assert_eq!(metadata.warnings, 2);
        assert_eq!(validator.status(), ValidationStatus::Failed);
        assert!(!validator.is_valid());
        assert_eq!(validator.get_failed_validations().len(), 3);
    }

    #[test]
    fn custom_check_receives_params() {
        let check = Check::new(|df, params| {
            let max_rows = params.number("max_rows").unwrap_or(0.0);
            Ok(CheckOutcome::new(df.height() as f64 <= max_rows, "row limit")
                .with_detail("rows", df.height()))
        });
        let mut validator = DataValidator::new("Custom");
        validator.load_data(patients());
        validator
            .expect_custom("row_limit", &check, None, true, &Params::new().with("max_rows", 10))
            .unwrap();
        let result = &validator.results()[0];
        assert!(result.passed);
        assert_eq!(result.name(), "row_limit");
        assert!(result.column.is_none());
        assert_eq!(validator.summary().success_rate, 100.0);
    }

    #[test]
    fn missing_column_is_recorded_not_raised() {
        let mut validator = DataValidator::new("Missing");
        validator.load_data(patients());
        validator.expect_column_not_null("age", 0.0, true).unwrap();
        let result = &validator.results()[0];
        assert!(!result.passed);
        assert_eq!(result.message, "Column 'age' does not exist");
        assert_eq!(result.column.as_deref(), Some("age"));
    }
}
