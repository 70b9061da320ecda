//! Predefined rule sets for common healthcare extracts.
//!
//! These rules read their target column from the bound `column` parameter,
//! so a rule can be pointed at a differently named column with
//! [`Rule::with_param`].

use polars::prelude::DataFrame;

use emr_ingest::{numeric_values, text_values};
use emr_model::round2;

use crate::check::{Check, CheckOutcome, Params};
use crate::checks::{fraction, lookup, missing_column};
use crate::rules::{Rule, RuleSet};

const MRN_MIN_LEN: usize = 5;
const MRN_PASS_PERCENT: f64 = 95.0;
const AGE_MIN: f64 = 0.0;
const AGE_MAX: f64 = 120.0;
const RANGE_PASS_PERCENT: f64 = 99.0;

/// MRN presence and plausible age.
pub fn patient_demographics() -> RuleSet {
    let mut rules = RuleSet::new("Patient Demographics")
        .with_description("Validation rules for patient demographic data");
    rules
        .add_rule(
            Rule::new(
                "mrn_format",
                "MRN format validation",
                Check::new(|df, params| Ok(mrn_presence(df, params))),
            )
            .with_param("column", "mrn"),
        )
        .add_rule(
            Rule::new(
                "age_range",
                "Age range validation",
                Check::new(|df, params| Ok(age_range(df, params))),
            )
            .with_param("column", "age"),
        );
    rules
}

/// Non-negative charge amounts.
pub fn financial_data() -> RuleSet {
    let mut rules = RuleSet::new("Financial Data")
        .with_description("Validation rules for financial and billing data");
    rules.add_rule(
        Rule::new(
            "positive_charges",
            "Charges must be non-negative",
            Check::new(|df, params| Ok(positive_charges(df, params))),
        )
        .with_param("column", "charge_amount"),
    );
    rules
}

fn column_param<'a>(params: &'a Params, default: &'a str) -> &'a str {
    params.text("column").unwrap_or(default)
}

fn mrn_presence(df: &DataFrame, params: &Params) -> CheckOutcome {
    let column = column_param(params, "mrn");
    let Some(series) = lookup(df, column) else {
        return missing_column(column);
    };
    let valid = text_values(series)
        .iter()
        .flatten()
        .filter(|mrn| mrn.chars().count() >= MRN_MIN_LEN)
        .count();
    let pct = fraction(valid, df.height()) * 100.0;
    CheckOutcome::new(pct > MRN_PASS_PERCENT, format!("Valid MRNs: {pct:.1}%"))
        .with_detail("column", column)
        .with_detail("valid_percentage", round2(pct))
}

fn percent_in_range(df: &DataFrame, column: &str, min: f64, max: f64) -> Option<f64> {
    let series = lookup(df, column)?;
    let in_range = numeric_values(series)
        .into_iter()
        .flatten()
        .filter(|value| (min..=max).contains(value))
        .count();
    Some(fraction(in_range, df.height()) * 100.0)
}

fn age_range(df: &DataFrame, params: &Params) -> CheckOutcome {
    let column = column_param(params, "age");
    let Some(pct) = percent_in_range(df, column, AGE_MIN, AGE_MAX) else {
        return missing_column(column);
    };
    CheckOutcome::new(
        pct > RANGE_PASS_PERCENT,
        format!("Valid ages (0-120): {pct:.1}%"),
    )
    .with_detail("column", column)
    .with_detail("valid_percentage", round2(pct))
}

fn positive_charges(df: &DataFrame, params: &Params) -> CheckOutcome {
    let column = column_param(params, "charge_amount");
    let Some(pct) = percent_in_range(df, column, 0.0, f64::INFINITY) else {
        return missing_column(column);
    };
    CheckOutcome::new(
        pct > RANGE_PASS_PERCENT,
        format!("Non-negative charges: {pct:.1}%"),
    )
    .with_detail("column", column)
    .with_detail("valid_percentage", round2(pct))
}
