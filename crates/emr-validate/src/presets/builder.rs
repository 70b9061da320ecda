use crate::expectations;
use crate::rules::{Rule, RuleSet};

/// Minimum passing fraction for preset not-null and uniqueness rules.
pub const PRESET_MOSTLY: f64 = 0.99;

/// Baseline rule set for a source-system export.
///
/// Produces one critical `required_columns` rule, one critical
/// `not_null_<column>` rule per not-null column and one warning-level
/// `unique_<column>` rule per unique column, in that order.
pub fn build_ruleset(
    display: &str,
    required_columns: &[String],
    not_null_columns: &[String],
    unique_columns: &[String],
) -> RuleSet {
    let mut rules = RuleSet::new(format!("{display} Export"))
        .with_description(format!("Baseline validation rules for {display} exports"));
    rules.add_rule(Rule::new(
        "required_columns",
        "Required columns present",
        expectations::columns_to_exist(required_columns.iter().cloned()),
    ));
    for column in not_null_columns {
        rules.add_rule(Rule::new(
            format!("not_null_{column}"),
            format!("'{column}' must be mostly non-null"),
            expectations::column_values_to_not_be_null(column.as_str(), PRESET_MOSTLY),
        ));
    }
    for column in unique_columns {
        rules.add_rule(
            Rule::new(
                format!("unique_{column}"),
                format!("'{column}' should be mostly unique"),
                expectations::column_values_to_be_unique(column.as_str(), PRESET_MOSTLY),
            )
            .critical(false),
        );
    }
    rules
}
