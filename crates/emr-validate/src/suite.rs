use polars::prelude::DataFrame;
use tracing::debug_span;

use emr_model::CheckResult;

use crate::check::{Check, Params};

#[derive(Debug, Clone)]
struct Expectation {
    name: String,
    check: Check,
    critical: bool,
}

/// An ordered list of named expectations, evaluated as one batch.
#[derive(Debug, Clone)]
pub struct ExpectationSuite {
    name: String,
    expectations: Vec<Expectation>,
}

impl ExpectationSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expectations: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expect(&mut self, name: impl Into<String>, check: Check, critical: bool) -> &mut Self {
        self.expectations.push(Expectation {
            name: name.into(),
            check,
            critical,
        });
        self
    }

    /// Evaluate every expectation in declaration order.
    pub fn validate(&self, df: &DataFrame) -> Vec<CheckResult> {
        let span = debug_span!("suite", name = %self.name, expectations = self.expectations.len());
        let _guard = span.enter();
        let params = Params::new();
        self.expectations
            .iter()
            .map(|expectation| {
                let outcome = expectation.check.invoke(df, &params);
                CheckResult::expectation(
                    &expectation.name,
                    expectation.critical,
                    outcome.passed,
                    outcome.message,
                )
                .with_details(outcome.details)
            })
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.expectations.iter().map(|expectation| expectation.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.expectations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expectations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expectations;
    use emr_model::CheckLabel;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    #[test]
    fn suite_results_are_labelled_as_expectations() {
        let df = DataFrame::new(vec![
            Series::new("age".into(), &[Some(34i64), None]).into_column(),
        ])
        .unwrap();
        let mut suite = ExpectationSuite::new("Demographics");
        suite
            .expect("age_present", expectations::column_to_exist("age"), true)
            .expect("age_complete", expectations::column_values_to_not_be_null("age", 1.0), false)
            .expect("panics", Check::from_fn(|_df| panic!("bad state")), true);

        let results = suite.validate(&df);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].label, CheckLabel::Expectation("age_present".to_string()));
        assert!(results[1].is_warning());
        assert_eq!(results[1].column.as_deref(), Some("age"));
        assert!(results[2].is_failure());
        assert_eq!(results[2].message, "Validation error: bad state");
        assert_eq!(suite.names().collect::<Vec<_>>(), ["age_present", "age_complete", "panics"]);
    }
}
