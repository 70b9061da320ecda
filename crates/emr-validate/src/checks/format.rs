//! Format checks for dates, medical record numbers and ICD codes.

use std::fmt;
use std::sync::LazyLock;

use chrono::format::{ParseErrorKind, Parsed, StrftimeItems, parse};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::DataFrame;
use regex::Regex;

use emr_ingest::text_values;

use super::{fraction, lookup, missing_column, percentage, threshold_label};
use crate::check::CheckOutcome;

/// ICD-10: letter, two digits, optional dot, optional one or two digits.
static ICD10_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]\d{2}\.?(?:\d{1,2})?$").expect("Invalid ICD-10 regex"));

/// Older revisions: three to five digits with an optional decimal suffix.
static ICD9_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3,5}(?:\.\d+)?$").expect("Invalid ICD-9 regex"));

const MRN_MIN_LEN: usize = 5;
const MRN_MAX_LEN: usize = 20;

/// ICD revision used to pick the code pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IcdVersion(pub u32);

impl IcdVersion {
    pub const ICD9: Self = Self(9);
    pub const ICD10: Self = Self(10);

    pub fn is_icd10(self) -> bool {
        self.0 == 10
    }

    fn matches(self, code: &str) -> bool {
        if self.is_icd10() {
            ICD10_REGEX.is_match(&code.to_uppercase())
        } else {
            ICD9_REGEX.is_match(code)
        }
    }
}

impl Default for IcdVersion {
    fn default() -> Self {
        Self::ICD10
    }
}

impl fmt::Display for IcdVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// True when `value` parses with the strftime `format` as a date, a
/// datetime or a time of day.
///
/// Formats naming only some fields (`%Y-%m`, `%b %Y`, `%H`) match when the
/// whole value is consumed and every field it names is in range.
pub fn matches_date_format(value: &str, format: &str) -> bool {
    match NaiveDate::parse_from_str(value, format) {
        Ok(_) => true,
        Err(err) if err.kind() == ParseErrorKind::NotEnough => {
            NaiveDateTime::parse_from_str(value, format).is_ok()
                || NaiveTime::parse_from_str(value, format).is_ok()
                || parse(&mut Parsed::new(), value, StrftimeItems::new(format)).is_ok()
        }
        Err(_) => false,
    }
}

/// Fraction of cells matching `format` must reach `threshold`. Nulls never match.
pub fn date_format(df: &DataFrame, column: &str, format: &str, threshold: f64) -> CheckOutcome {
    let Some(series) = lookup(df, column) else {
        return missing_column(column);
    };
    let rows = df.height();
    let valid = text_values(series)
        .iter()
        .flatten()
        .filter(|value| matches_date_format(value, format))
        .count();
    let valid_fraction = fraction(valid, rows);
    let pct = percentage(valid_fraction);
    CheckOutcome::new(
        valid_fraction >= threshold,
        format!("Valid format: {pct:.2}% (expected: {format})"),
    )
    .with_detail("column", column)
    .with_detail("valid_percentage", pct)
    .with_detail("threshold", percentage(threshold))
    .with_detail("date_format", format)
    .with_detail("invalid_count", rows - valid)
}

/// Compile a caller-supplied MRN pattern, anchored at the start of the value.
pub fn compile_mrn_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})"))
}

/// Fraction of valid MRNs must reach `threshold`.
///
/// With a pattern, a value is valid when the pattern matches at its start.
/// Without one, a value is valid when it is between 5 and 20 characters long.
pub fn mrn_format(
    df: &DataFrame,
    column: &str,
    pattern: Option<&Regex>,
    threshold: f64,
) -> CheckOutcome {
    let Some(series) = lookup(df, column) else {
        return missing_column(column);
    };
    let rows = df.height();
    let valid = text_values(series)
        .iter()
        .flatten()
        .filter(|value| match pattern {
            Some(regex) => regex.is_match(value),
            None => (MRN_MIN_LEN..=MRN_MAX_LEN).contains(&value.chars().count()),
        })
        .count();
    let valid_fraction = fraction(valid, rows);
    let pct = percentage(valid_fraction);
    CheckOutcome::new(
        valid_fraction >= threshold,
        format!(
            "Valid MRNs: {pct:.2}% (threshold: {}%)",
            threshold_label(threshold)
        ),
    )
    .with_detail("column", column)
    .with_detail("valid_percentage", pct)
    .with_detail("threshold", percentage(threshold))
    .with_detail("invalid_count", rows - valid)
    .with_detail("pattern", pattern.map(Regex::as_str))
}

/// Fraction of non-null cells that are well-formed ICD codes must reach
/// `threshold`. A column without any non-null value fails.
pub fn icd_format(df: &DataFrame, column: &str, version: IcdVersion, threshold: f64) -> CheckOutcome {
    let Some(series) = lookup(df, column) else {
        return missing_column(column);
    };
    let codes: Vec<String> = text_values(series).into_iter().flatten().collect();
    if codes.is_empty() {
        return CheckOutcome::fail(format!(
            "No non-null values in column '{column}' to validate"
        ))
        .with_detail("column", column)
        .with_detail("icd_version", version.0);
    }
    let valid = codes.iter().filter(|code| version.matches(code)).count();
    let valid_fraction = fraction(valid, codes.len());
    let pct = percentage(valid_fraction);
    CheckOutcome::new(
        valid_fraction >= threshold,
        format!(
            "ICD{version} valid percentage for '{column}': {pct}% (threshold {}%)",
            threshold_label(threshold)
        ),
    )
    .with_detail("column", column)
    .with_detail("valid_percentage", pct)
    .with_detail("threshold", percentage(threshold))
    .with_detail("icd_version", version.0)
    .with_detail("invalid_count", codes.len() - valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use emr_model::DetailValue;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    fn frame(name: &str, values: &[Option<&str>]) -> DataFrame {
        DataFrame::new(vec![Series::new(name.into(), values).into_column()]).unwrap()
    }

    #[test]
    fn icd10_codes() {
        let valid = frame("icd10_code", &[Some("I10"), Some("e11.9"), Some("J44.0"), Some("Z7901")]);
        assert!(icd_format(&valid, "icd10_code", IcdVersion::ICD10, 1.0).passed);

        let invalid = frame("icd10_code", &[Some("INVALID")]);
        let outcome = icd_format(&invalid, "icd10_code", IcdVersion::ICD10, 0.5);
        assert!(!outcome.passed);
        assert_eq!(outcome.details.get("invalid_count"), Some(&DetailValue::Int(1)));
    }

    #[test]
    fn icd_nulls_are_excluded_but_all_null_fails() {
        let partly = frame("dx", &[Some("I10"), None]);
        assert!(icd_format(&partly, "dx", IcdVersion::ICD10, 1.0).passed);

        let empty = frame("dx", &[None, None]);
        let outcome = icd_format(&empty, "dx", IcdVersion::ICD10, 0.0);
        assert!(!outcome.passed);
        assert_eq!(outcome.message, "No non-null values in column 'dx' to validate");
    }

    #[test]
    fn icd9_codes() {
        let df = frame("dx", &[Some("250.00"), Some("4019"), Some("V45")]);
        let outcome = icd_format(&df, "dx", IcdVersion::ICD9, 0.6);
        assert!(outcome.passed);
        assert_eq!(outcome.details.get("icd_version"), Some(&DetailValue::Int(9)));
    }

    #[test]
    fn date_formats() {
        assert!(matches_date_format("2024-01-15", "%Y-%m-%d"));
        assert!(matches_date_format("2024-01-15 08:30", "%Y-%m-%d %H:%M"));
        assert!(matches_date_format("08:30", "%H:%M"));
        assert!(!matches_date_format("15/01/2024", "%Y-%m-%d"));
        assert!(!matches_date_format("2024-02-30", "%Y-%m-%d"));
        assert!(!matches_date_format("25:00", "%H:%M"));
    }

    #[test]
    fn partial_date_formats() {
        assert!(matches_date_format("2024-01", "%Y-%m"));
        assert!(matches_date_format("2024", "%Y"));
        assert!(matches_date_format("Jan 2024", "%b %Y"));
        assert!(!matches_date_format("2024-13", "%Y-%m"));
        assert!(!matches_date_format("2024-01-x", "%Y-%m"));
        assert!(!matches_date_format("01/2024", "%Y-%m"));

        let df = frame("period", &[Some("2024-01"), Some("2023-12")]);
        let outcome = date_format(&df, "period", "%Y-%m", 1.0);
        assert!(outcome.passed);
        assert_eq!(outcome.message, "Valid format: 100.00% (expected: %Y-%m)");
        assert_eq!(outcome.details.get("invalid_count"), Some(&DetailValue::Int(0)));

        let df = frame("dob", &[Some("1980-05-01"), Some("01/05/1980"), None, Some("1975-12-31")]);
        let outcome = date_format(&df, "dob", "%Y-%m-%d", 0.5);
        assert!(outcome.passed);
        assert_eq!(outcome.details.get("invalid_count"), Some(&DetailValue::Int(2)));
    }

    #[test]
    fn mrn_default_length_rule() {
        let df = frame("mrn", &[Some("MRN00000001"), Some("123"), None, Some("ABCDE")]);
        let outcome = mrn_format(&df, "mrn", None, 0.5);
        assert!(outcome.passed);
        assert!(outcome.details["pattern"].is_null());
        assert!(!mrn_format(&df, "mrn", None, 0.6).passed);
    }

    #[test]
    fn mrn_pattern_is_prefix_anchored() {
        let df = frame("mrn", &[Some("MRN12345678"), Some("XMRN1234"), Some("MRN1")]);
        let pattern = compile_mrn_pattern(r"MRN\d{8}").unwrap();
        let outcome = mrn_format(&df, "mrn", Some(&pattern), 0.0);
        assert_eq!(outcome.details.get("invalid_count"), Some(&DetailValue::Int(2)));
    }
}
