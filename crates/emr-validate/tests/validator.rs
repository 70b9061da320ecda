//! End-to-end tests for the validator against a synthetic patient extract.

use emr_validate::{
    Check, CheckOutcome, DataValidator, ExpectationSuite, IcdVersion, Params, ValidationError,
    ValidationStatus, expectations, healthcare,
};
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};

/// 100 patients; five ages are missing.
fn sample_patients() -> DataFrame {
    let mrns: Vec<String> = (0..100).map(|i| format!("MRN{:08}", 10_000 + i)).collect();
    let ages: Vec<Option<i64>> = (0..100).map(|i| (i % 20 != 0).then_some(18 + i % 70)).collect();
    let genders: Vec<&str> = (0..100).map(|i| ["M", "F", "Other"][i % 3]).collect();
    let codes: Vec<&str> = (0..100).map(|i| ["I10", "E11.9", "J44.0"][i % 3]).collect();
    let visits: Vec<String> = (0..100).map(|i| format!("2024-01-{:02}", 1 + i % 28)).collect();
    DataFrame::new(vec![
        Series::new("mrn".into(), mrns).into_column(),
        Series::new("age".into(), ages).into_column(),
        Series::new("gender".into(), genders).into_column(),
        Series::new("icd10_code".into(), codes).into_column(),
        Series::new("visit_date".into(), visits).into_column(),
    ])
    .unwrap()
}

fn loaded() -> DataValidator {
    let mut validator = DataValidator::new("Patients");
    validator.load_data(sample_patients());
    validator
}

#[test]
fn test_not_null_threshold_scenario() {
    let mut validator = loaded();
    validator
        .expect_column_not_null("age", 0.90, true)
        .unwrap()
        .expect_column_not_null("age", 1.0, true)
        .unwrap();
    let results = validator.results();
    assert!(results[0].passed);
    assert!(!results[1].passed);
    assert_eq!(
        results[0].detail("null_count").and_then(|v| v.as_i64()),
        Some(5)
    );
    assert_eq!(
        results[0].detail("non_null_percentage").and_then(|v| v.as_f64()),
        Some(95.0)
    );
}

#[test]
fn test_full_chain_on_clean_data() {
    let mut validator = loaded();
    validator
        .expect_column_exists("mrn", true)
        .unwrap()
        .expect_column_values_unique("mrn", 1.0, true)
        .unwrap()
        .expect_mrn_format("mrn", Some(r"MRN\d{8}"), 1.0, true)
        .unwrap()
        .expect_column_values_in_set("gender", ["M", "F", "Other"], 1.0, true)
        .unwrap()
        .expect_column_values_between("age", 0.0, 120.0, 0.95, true)
        .unwrap()
        .expect_column_date_format("visit_date", "%Y-%m-%d", 1.0, true)
        .unwrap()
        .expect_icd_format("icd10_code", IcdVersion::ICD10, 1.0, true)
        .unwrap();

    assert!(validator.is_valid(), "{:#?}", validator.get_failed_validations());
    assert_eq!(validator.status(), ValidationStatus::Passed);
    let summary = validator.summary();
    assert_eq!(summary.total, 7);
    assert_eq!(summary.success_rate, 100.0);
}

#[test]
fn test_warnings_do_not_invalidate() {
    let mut validator = loaded();
    validator
        .expect_column_values_in_set("gender", ["M", "F"], 1.0, false)
        .unwrap();
    assert!(validator.is_valid());
    assert_eq!(validator.status(), ValidationStatus::Warning);
    let failed = validator.get_failed_validations();
    assert_eq!(failed.len(), 1);
    let examples = failed[0].detail("invalid_values").and_then(|v| v.as_list()).unwrap();
    assert_eq!(examples.len(), 1);
}

#[test]
fn test_icd_edge_cases() {
    let df = DataFrame::new(vec![
        Series::new("good".into(), &["I10"]).into_column(),
        Series::new("bad".into(), &["INVALID"]).into_column(),
        Series::new("empty".into(), &[None::<&str>]).into_column(),
    ])
    .unwrap();
    let mut validator = DataValidator::new("ICD");
    validator.load_data(df);
    validator
        .expect_icd_format("good", IcdVersion::ICD10, 1.0, true)
        .unwrap()
        .expect_icd_format("bad", IcdVersion::ICD10, 1.0, true)
        .unwrap()
        .expect_icd_format("empty", IcdVersion::ICD10, 0.0, true)
        .unwrap();
    let results = validator.results();
    assert!(results[0].passed);
    assert!(!results[1].passed);
    assert!(!results[2].passed);
    assert!(results[2].message.contains("No non-null values"));
}

#[test]
fn test_custom_check_faults_are_contained() {
    let mut validator = loaded();
    let failing = Check::new(|_df, _params| anyhow::bail!("reference table missing"));
    let panicking = Check::from_fn(|df| {
        let rows = df.height();
        assert!(rows == 0, "unexpected rows: {rows}");
        CheckOutcome::pass("empty")
    });
    validator
        .expect_custom("reference", &failing, Some("mrn"), true, &Params::new())
        .unwrap()
        .expect_custom("panics", &panicking, None, false, &Params::new())
        .unwrap()
        .expect_column_exists("mrn", true)
        .unwrap();

    let results = validator.results();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].message, "Validation error: reference table missing");
    assert!(results[0].details.is_empty());
    assert_eq!(results[1].message, "Validation error: unexpected rows: 100");
    assert!(results[2].passed);
    let metadata = validator.metadata();
    assert_eq!((metadata.passed, metadata.failed, metadata.warnings), (1, 1, 1));
}

#[test]
fn test_unloaded_validator_rejects_every_family() {
    let mut validator = DataValidator::new("Empty");
    assert!(matches!(
        validator.expect_column_not_null("age", 1.0, true),
        Err(ValidationError::DatasetNotLoaded { .. })
    ));
    assert!(validator.expect_icd_format("dx", IcdVersion::ICD10, 1.0, true).is_err());
    assert!(validator.apply_ruleset(&healthcare::financial_data()).is_err());
    assert!(validator.apply_suite(&ExpectationSuite::new("s")).is_err());
    assert_eq!(validator.summary().total, 0);
    assert_eq!(validator.status(), ValidationStatus::Passed);
}

#[test]
fn test_rulesets_and_suites_feed_the_counters() {
    let mut suite = ExpectationSuite::new("Shape");
    suite
        .expect("rows", expectations::table_row_count_to_be_between(1, 1000), true)
        .expect("columns", expectations::table_column_count_to_equal(6), false)
        .expect("mean_age", expectations::column_mean_to_be_between("age", 30.0, 70.0), true);

    let mut validator = loaded();
    validator
        .apply_ruleset(&healthcare::patient_demographics())
        .unwrap()
        .apply_suite(&suite)
        .unwrap();

    let names: Vec<&str> = validator.results().iter().map(|r| r.name()).collect();
    assert_eq!(names, ["mrn_format", "age_range", "rows", "columns", "mean_age"]);
    let summary = validator.summary();
    assert_eq!(summary.total, 5);
    assert_eq!(summary.warnings, 1);
    // five missing ages keep age_range at 95%
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.success_rate, 60.0);
}

#[test]
fn test_exports() {
    let mut validator = loaded();
    validator
        .expect_column_exists("mrn", true)
        .unwrap()
        .expect_column_exists("dob", true)
        .unwrap();

    let df = validator.to_dataframe().unwrap();
    assert_eq!(df.height(), 2);

    let dir = tempfile::tempdir().unwrap();
    let csv_path = validator.write_csv(&dir.path().join("results.csv")).unwrap();
    let csv_text = std::fs::read_to_string(csv_path).unwrap();
    assert_eq!(csv_text.lines().count(), 3);
    assert!(csv_text.contains("Column 'dob' does not exist"));

    let json_path = validator.write_json_report(&dir.path().join("report.json")).unwrap();
    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(report["status"], "FAILED");
    assert_eq!(report["metadata"]["total_rows"], 100);
    assert_eq!(report["validations"][0]["rule"], "column_exists");

    let snapshot = validator.get_results();
    assert_eq!(snapshot.results.len(), 2);
    assert_eq!(snapshot.summary.failed, 1);
}

#[test]
fn test_custom_details_do_not_collide_with_record_fields() {
    let mut validator = loaded();
    let check = Check::from_fn(|_df| {
        CheckOutcome::fail("bad")
            .with_detail("status", "ok")
            .with_detail("passed", true)
            .with_detail("message", "fine")
    });
    validator
        .expect_custom("custom_fields", &check, None, true, &Params::new())
        .unwrap();

    let df = validator.to_dataframe().unwrap();
    let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
    assert_eq!(names.iter().filter(|name| *name == "status").count(), 1);
    assert!(names.contains(&"detail_status".to_string()));

    let dir = tempfile::tempdir().unwrap();
    let json_path = validator.write_json_report(&dir.path().join("report.json")).unwrap();
    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    let record = &report["validations"][0];
    assert_eq!(record["passed"], false);
    assert_eq!(record["message"], "bad");
    assert_eq!(record["detail_passed"], true);
    assert_eq!(record["detail_message"], "fine");
    assert!(!validator.is_valid());
}
