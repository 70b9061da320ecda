//! The check-function contract.
//!
//! A check takes the dataset plus its bound keyword parameters and returns a
//! [`CheckOutcome`] (passed, message, details). [`Check::invoke`] is the only
//! place checks are called from: errors and panics raised inside a check are
//! turned into a failed outcome whose message starts with `Validation error:`,
//! so one broken check never aborts a batch.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use polars::prelude::DataFrame;
use tracing::warn;

use emr_model::{DetailValue, Details};

/// Result triple produced by a check function.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckOutcome {
    pub passed: bool,
    pub message: String,
    pub details: Details,
}

impl CheckOutcome {
    pub fn new(passed: bool, message: impl Into<String>) -> Self {
        Self {
            passed,
            message: message.into(),
            details: Details::new(),
        }
    }

    pub fn pass(message: impl Into<String>) -> Self {
        Self::new(true, message)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(false, message)
    }

    /// Failed outcome for a fault raised inside a check.
    pub fn error(cause: impl fmt::Display) -> Self {
        Self::fail(format!("Validation error: {cause}"))
    }

    #[must_use]
    pub fn with_detail(mut self, key: &str, value: impl Into<DetailValue>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

/// Keyword parameters bound to a rule or passed to a custom check.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params(BTreeMap<String, DetailValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<DetailValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<DetailValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&DetailValue> {
        self.0.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(DetailValue::as_str)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(DetailValue::as_f64)
    }
}

type CheckFn = dyn Fn(&DataFrame, &Params) -> anyhow::Result<CheckOutcome> + Send + Sync;

/// A check function value, cheap to clone and share between rule sets.
#[derive(Clone)]
pub struct Check {
    inner: Arc<CheckFn>,
}

impl Check {
    /// Wrap a fallible check function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&DataFrame, &Params) -> anyhow::Result<CheckOutcome> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Wrap a check that ignores parameters and cannot fail.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&DataFrame) -> CheckOutcome + Send + Sync + 'static,
    {
        Self::new(move |df, _params| Ok(f(df)))
    }

    /// Run the check, containing any error or panic it raises.
    pub fn invoke(&self, df: &DataFrame, params: &Params) -> CheckOutcome {
        match catch_unwind(AssertUnwindSafe(|| (self.inner)(df, params))) {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(error)) => {
                warn!(error = %format!("{error:#}"), "check returned an error");
                CheckOutcome::error(format!("{error:#}"))
            }
            Err(payload) => {
                let cause = panic_message(payload.as_ref());
                warn!(cause = %cause, "check panicked");
                CheckOutcome::error(cause)
            }
        }
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check").finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "check panicked".to_string()
    }
}
