//! Expectation catalog.
//!
//! Each factory binds its configuration and returns a [`Check`] that can be
//! placed in a [`RuleSet`](crate::RuleSet), an
//! [`ExpectationSuite`](crate::ExpectationSuite) or passed to
//! [`DataValidator::expect_custom`](crate::DataValidator::expect_custom).
//! `mostly` is the minimum passing fraction in `[0, 1]`.

use std::collections::BTreeSet;

use anyhow::Context;

use crate::check::Check;
use crate::checks::{IcdVersion, completeness, format, membership, presence, range, uniqueness};

pub fn column_to_exist(column: impl Into<String>) -> Check {
    let column = column.into();
    Check::from_fn(move |df| presence::column_exists(df, &column))
}

/// Every listed column must be present; missing ones are reported together.
pub fn columns_to_exist<I, S>(columns: I) -> Check
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
    Check::from_fn(move |df| presence::required_columns(df, &columns))
}

pub fn column_values_to_not_be_null(column: impl Into<String>, mostly: f64) -> Check {
    let column = column.into();
    Check::from_fn(move |df| completeness::not_null(df, &column, mostly))
}

pub fn column_values_to_be_in_set<I, S>(column: impl Into<String>, values: I, mostly: f64) -> Check
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let column = column.into();
    let allowed: BTreeSet<String> = values.into_iter().map(Into::into).collect();
    Check::from_fn(move |df| membership::in_set(df, &column, &allowed, mostly))
}

pub fn column_values_to_be_unique(column: impl Into<String>, mostly: f64) -> Check {
    let column = column.into();
    Check::from_fn(move |df| uniqueness::unique(df, &column, mostly))
}

pub fn column_values_to_be_between(column: impl Into<String>, min: f64, max: f64, mostly: f64) -> Check {
    let column = column.into();
    Check::from_fn(move |df| range::between(df, &column, min, max, mostly))
}

pub fn column_mean_to_be_between(column: impl Into<String>, min: f64, max: f64) -> Check {
    let column = column.into();
    Check::from_fn(move |df| range::mean_between(df, &column, min, max))
}

pub fn table_row_count_to_be_between(min: usize, max: usize) -> Check {
    Check::from_fn(move |df| presence::row_count_between(df, min, max))
}

pub fn table_column_count_to_equal(expected: usize) -> Check {
    Check::from_fn(move |df| presence::column_count_equals(df, expected))
}

/// Values must parse with the strftime `date_format`.
pub fn column_values_to_match_date_format(
    column: impl Into<String>,
    date_format: impl Into<String>,
    mostly: f64,
) -> Check {
    let column = column.into();
    let date_format = date_format.into();
    Check::from_fn(move |df| format::date_format(df, &column, &date_format, mostly))
}

/// Values must be medical record numbers. An invalid `pattern` makes every
/// invocation fail with the regex compile error.
pub fn column_values_to_be_valid_mrn(column: impl Into<String>, pattern: Option<&str>, mostly: f64) -> Check {
    let column = column.into();
    let pattern = pattern.map(|raw| {
        format::compile_mrn_pattern(raw)
            .with_context(|| format!("invalid MRN pattern '{raw}'"))
            .map_err(|err| format!("{err:#}"))
    });
    Check::new(move |df, _params| {
        let regex = match &pattern {
            Some(Ok(regex)) => Some(regex),
            Some(Err(message)) => anyhow::bail!("{message}"),
            None => None,
        };
        Ok(format::mrn_format(df, &column, regex, mostly))
    })
}

pub fn column_values_to_be_valid_icd(column: impl Into<String>, version: IcdVersion, mostly: f64) -> Check {
    let column = column.into();
    Check::from_fn(move |df| format::icd_format(df, &column, version, mostly))
}
