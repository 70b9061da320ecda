//! Named rules and reusable rule sets.

use polars::prelude::DataFrame;
use tracing::debug_span;

use emr_model::{CheckResult, DetailValue};

use crate::check::{Check, Params};

/// A named check with its criticality and bound parameters.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    description: String,
    check: Check,
    critical: bool,
    params: Params,
}

impl Rule {
    /// Create a critical rule with no bound parameters.
    pub fn new(name: impl Into<String>, description: impl Into<String>, check: Check) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            check,
            critical: true,
            params: Params::new(),
        }
    }

    #[must_use]
    pub fn critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    #[must_use]
    pub fn with_param(mut self, key: &str, value: impl Into<DetailValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Run the rule against `df`. Never fails; faults become a failed result.
    pub fn execute(&self, df: &DataFrame) -> CheckResult {
        let outcome = self.check.invoke(df, &self.params);
        CheckResult::rule(&self.name, self.critical, outcome.passed, outcome.message)
            .with_description(&self.description)
            .with_details(outcome.details)
    }
}

/// An ordered, append-only collection of rules.
///
/// Rule sets hold no results of their own and can be executed against any
/// number of datasets.
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: String,
    description: String,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            description: format!("{name} validation rules"),
            name,
            rules: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn add_rule(&mut self, rule: Rule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Build a rule from its parts and append it.
    pub fn create_rule(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        check: Check,
        critical: bool,
    ) -> &mut Self {
        self.add_rule(Rule::new(name, description, check).critical(critical))
    }

    /// Execute every rule in declaration order.
    pub fn execute_all(&self, df: &DataFrame) -> Vec<CheckResult> {
        let span = debug_span!("ruleset", name = %self.name, rules = self.rules.len());
        let _guard = span.enter();
        self.rules.iter().map(|rule| rule.execute(df)).collect()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }
}

impl Extend<Rule> for RuleSet {
    fn extend<T: IntoIterator<Item = Rule>>(&mut self, iter: T) {
        self.rules.extend(iter);
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
