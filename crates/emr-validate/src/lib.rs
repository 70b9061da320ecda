//! Rule evaluation engine for EMR data quality checks.
//!
//! Checks run against a Polars [`DataFrame`](polars::prelude::DataFrame) and
//! produce [`CheckResult`]s. A failed check is recorded, never raised; only a
//! missing dataset or a load failure is returned as an error.

pub mod check;
pub mod checks;
pub mod error;
pub mod expectations;
pub mod healthcare;
pub mod presets;
pub mod report;
pub mod rules;
pub mod suite;
pub mod validator;

pub use check::{Check, CheckOutcome, Params};
pub use checks::IcdVersion;
pub use error::{Result, ValidationError};
pub use presets::{SourcePreset, SourceSystem, build_ruleset, ruleset_for, supported_systems};
pub use report::{
    ValidationResults, render_json_report, results_to_dataframe, write_json_report,
    write_results_csv,
};
pub use rules::{Rule, RuleSet};
pub use suite::ExpectationSuite;
pub use validator::{DEFAULT_VALIDATOR_NAME, DataValidator};

pub use emr_model::{CheckLabel, CheckResult, DetailValue, Details, RunMetadata, Summary, ValidationStatus};
