//! Load, resolve and validate a single extract.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use emr_ingest::{read_dataset, resolve_aliases};
use emr_model::ValidationStatus;
use emr_validate::presets::PRESET_MOSTLY;
use emr_validate::{DataValidator, Rule, RuleSet, SourcePreset, SourceSystem, expectations};

/// Where the rule set for a run comes from.
#[derive(Debug, Clone)]
pub enum PresetSource<'a> {
    System(&'a str),
    File(&'a Path),
    None,
}

impl PresetSource<'_> {
    pub fn load(&self) -> Result<Option<SourcePreset>> {
        match self {
            Self::System(key) => {
                let system: SourceSystem = key.parse()?;
                Ok(Some(system.preset()))
            }
            Self::File(path) => {
                let preset = SourcePreset::from_toml_file(path)
                    .with_context(|| format!("load preset {}", path.display()))?;
                Ok(Some(preset))
            }
            Self::None => Ok(None),
        }
    }
}

/// Options for one validation run.
#[derive(Debug, Clone)]
pub struct ValidationPlan {
    pub name: String,
    pub preset: Option<SourcePreset>,
    pub resolve_aliases: bool,
}

/// Checks used when no preset is chosen: the table must have rows, and every
/// column should be mostly non-null.
pub fn basic_ruleset(df: &DataFrame) -> RuleSet {
    let mut rules = RuleSet::new("Basic")
        .with_description("Table-level checks applied when no source system is selected");
    rules.add_rule(Rule::new(
        "has_rows",
        "Dataset contains at least one row",
        expectations::table_row_count_to_be_between(1, usize::MAX),
    ));
    for name in df.get_column_names() {
        rules.add_rule(
            Rule::new(
                format!("not_null_{name}"),
                format!("'{name}' should be mostly non-null"),
                expectations::column_values_to_not_be_null(name.as_str(), PRESET_MOSTLY),
            )
            .critical(false),
        );
    }
    rules
}

/// Load `path`, apply the plan's aliases and rules, and return the populated validator.
pub fn run_validation(path: &Path, plan: &ValidationPlan) -> Result<DataValidator> {
    let span = info_span!("validate", name = %plan.name, file = %path.display());
    let _guard = span.enter();

    let mut df = read_dataset(path).with_context(|| format!("load {}", path.display()))?;
    if plan.resolve_aliases
        && let Some(preset) = &plan.preset
    {
        let renames = resolve_aliases(&mut df, &preset.aliases)
            .with_context(|| format!("resolve {} aliases", preset.key))?;
        for rename in &renames {
            info!(from = %rename.from, to = %rename.to, "renamed column");
        }
    }

    let rules = match &plan.preset {
        Some(preset) => preset.ruleset(),
        None => basic_ruleset(&df),
    };

    let mut validator = DataValidator::new(plan.name.clone());
    validator.load_data(df).apply_ruleset(&rules)?;

    let summary = validator.summary();
    info!(
        status = %validator.status(),
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        warnings = summary.warnings,
        "validation finished"
    );
    Ok(validator)
}

/// Process exit status for a finished run.
pub fn exit_code(status: ValidationStatus, strict: bool) -> i32 {
    match status {
        ValidationStatus::Failed => 1,
        ValidationStatus::Warning if strict => 1,
        ValidationStatus::Warning | ValidationStatus::Passed => 0,
    }
}
