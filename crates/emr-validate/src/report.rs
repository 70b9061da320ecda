//! Results view, flat tabular export and JSON report.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use serde::Serialize;

use emr_model::{CheckResult, RunMetadata, Summary, ValidationStatus};

use crate::error::{Result, ValidationError};

const REPORT_SCHEMA: &str = "emr-validate.validation-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

/// Fixed leading columns of the flat export; detail keys follow, sorted.
pub const BASE_COLUMNS: [&str; 8] = [
    "kind",
    "name",
    "column",
    "description",
    "critical",
    "passed",
    "status",
    "message",
];

/// Snapshot of a run: metadata, summary counts and every recorded result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResults {
    pub metadata: RunMetadata,
    pub summary: Summary,
    pub results: Vec<CheckResult>,
}

impl ValidationResults {
    /// Results of a stand-alone batch, e.g. from
    /// [`RuleSet::execute_all`](crate::RuleSet::execute_all).
    pub fn from_batch(name: impl Into<String>, results: Vec<CheckResult>) -> Self {
        let mut metadata = RunMetadata::new(name);
        for result in &results {
            metadata.record(result);
        }
        Self {
            summary: Summary::from_metadata(&metadata),
            metadata,
            results,
        }
    }

    pub fn status(&self) -> ValidationStatus {
        ValidationStatus::from_results(&self.results)
    }

    pub fn is_valid(&self) -> bool {
        !self.results.iter().any(CheckResult::is_failure)
    }

    pub fn failed(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|result| !result.passed)
    }
}

#[derive(Debug, Serialize)]
struct ValidationReportPayload<'a> {
    schema: &'static str,
    schema_version: u32,
    generated_at: String,
    status: ValidationStatus,
    metadata: &'a RunMetadata,
    summary: &'a Summary,
    validations: &'a [CheckResult],
}

/// Pretty-printed JSON report with a trailing newline.
pub fn render_json_report(results: &ValidationResults) -> Result<String> {
    let payload = ValidationReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        status: results.status(),
        metadata: &results.metadata,
        summary: &results.summary,
        validations: &results.results,
    };
    let json = serde_json::to_string_pretty(&payload)?;
    Ok(format!("{json}\n"))
}

/// Write the JSON report to `path`, creating parent directories.
pub fn write_json_report(path: &Path, results: &ValidationResults) -> Result<PathBuf> {
    let json = render_json_report(results)?;
    create_parent(path)?;
    fs::write(path, json).map_err(|source| ValidationError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}

fn detail_columns(results: &[CheckResult]) -> Vec<String> {
    let keys: BTreeSet<&String> = results
        .iter()
        .flat_map(|result| result.details.keys())
        .collect();
    keys.into_iter().cloned().collect()
}

fn detail_cells(results: &[CheckResult], key: &str) -> Vec<Option<String>> {
    results
        .iter()
        .map(|result| result.detail(key).map(ToString::to_string))
        .collect()
}

/// One row per result. Detail values are rendered as text so results with
/// different detail types share a column.
pub fn results_to_dataframe(results: &[CheckResult]) -> Result<DataFrame> {
    let text = |name: &str, values: Vec<Option<String>>| -> Column {
        Series::new(name.into(), values).into_column()
    };
    let mut columns: Vec<Column> = vec![
        text(
            "kind",
            results.iter().map(|r| Some(r.label.kind().to_string())).collect(),
        ),
        text("name", results.iter().map(|r| Some(r.name().to_string())).collect()),
        text("column", results.iter().map(|r| r.column.clone()).collect()),
        text(
            "description",
            results.iter().map(|r| r.description.clone()).collect(),
        ),
        Series::new(
            "critical".into(),
            results.iter().map(|r| r.critical).collect::<Vec<bool>>(),
        )
        .into_column(),
        Series::new(
            "passed".into(),
            results.iter().map(|r| r.passed).collect::<Vec<bool>>(),
        )
        .into_column(),
        text(
            "status",
            results.iter().map(|r| Some(r.status().label().to_string())).collect(),
        ),
        text("message", results.iter().map(|r| Some(r.message.clone())).collect()),
    ];
    for key in detail_columns(results) {
        columns.push(text(&key, detail_cells(results, &key)));
    }
    Ok(DataFrame::new(columns)?)
}

/// Write the flat export as CSV with a header row.
pub fn write_results_csv<W: Write>(results: &[CheckResult], writer: W) -> Result<()> {
    let details = detail_columns(results);
    let mut csv_writer = csv::Writer::from_writer(writer);
    let header: Vec<&str> = BASE_COLUMNS
        .iter()
        .copied()
        .chain(details.iter().map(String::as_str))
        .collect();
    csv_writer.write_record(&header)?;
    for result in results {
        let mut record = vec![
            result.label.kind().to_string(),
            result.name().to_string(),
            result.column.clone().unwrap_or_default(),
            result.description.clone().unwrap_or_default(),
            result.critical.to_string(),
            result.passed.to_string(),
            result.status().label().to_string(),
            result.message.clone(),
        ];
        record.extend(
            details
                .iter()
                .map(|key| result.detail(key).map(ToString::to_string).unwrap_or_default()),
        );
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush().map_err(|err| ValidationError::Export {
        message: err.to_string(),
    })?;
    Ok(())
}

/// Write the flat export to a CSV file, creating parent directories.
pub fn write_results_csv_file(path: &Path, results: &[CheckResult]) -> Result<PathBuf> {
    create_parent(path)?;
    let file = File::create(path).map_err(|source| ValidationError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    write_results_csv(results, file)?;
    Ok(path.to_path_buf())
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| ValidationError::Write {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
