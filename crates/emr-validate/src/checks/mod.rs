//! Built-in check families.
//!
//! Each function evaluates one family against a dataset and returns the
//! outcome triple. Column-level checks first look the column up and fail
//! locally with `Column '<name>' does not exist` when it is absent.
//!
//! Fractions are computed over the dataset's row count; a zero-row dataset
//! yields a fraction of 0.0 rather than a division fault.

pub mod completeness;
pub mod format;
pub mod membership;
pub mod presence;
pub mod range;
pub mod uniqueness;

use polars::prelude::{Column, DataFrame};

use emr_ingest::format_numeric;
use emr_model::round2;

use crate::check::CheckOutcome;

pub use format::IcdVersion;

/// Maximum number of distinct invalid values reported by membership checks.
pub const MAX_INVALID_EXAMPLES: usize = 10;

pub(crate) fn lookup<'a>(df: &'a DataFrame, column: &str) -> Option<&'a Column> {
    df.column(column).ok()
}

pub(crate) fn missing_column(column: &str) -> CheckOutcome {
    CheckOutcome::fail(format!("Column '{column}' does not exist")).with_detail("column", column)
}

pub(crate) fn fraction(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Percentage of a fraction, rounded to 2 decimals.
pub(crate) fn percentage(fraction: f64) -> f64 {
    round2(fraction * 100.0)
}

/// Threshold rendered as a percentage, e.g. `0.95` becomes `95`.
pub(crate) fn threshold_label(threshold: f64) -> String {
    format_numeric(round2(threshold * 100.0))
}
