use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::info;

use emr_validate::SourceSystem;

use crate::cli::ValidateArgs;
use crate::summary::apply_table_style;
use crate::types::RunReport;
use emr_cli::pipeline::{PresetSource, ValidationPlan, run_validation};

pub fn run_systems() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["System", "Display", "Required columns", "Aliases"]);
    apply_table_style(&mut table, Vec::new());
    for system in SourceSystem::ALL {
        let preset = system.preset();
        table.add_row(vec![
            preset.key,
            preset.display,
            preset.required_columns.join(", "),
            preset.aliases.len().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_validate(args: &ValidateArgs) -> Result<RunReport> {
    let source = match (&args.system, &args.preset) {
        (Some(key), _) => PresetSource::System(key),
        (None, Some(path)) => PresetSource::File(path),
        (None, None) => PresetSource::None,
    };
    let preset = source.load()?;
    let system = preset.as_ref().map(|preset| preset.display.clone());
    let plan = ValidationPlan {
        name: args.name.clone().unwrap_or_else(|| default_name(&args.file)),
        preset,
        resolve_aliases: !args.no_aliases,
    };
    let validator = run_validation(&args.file, &plan)?;

    let mut outputs = Vec::new();
    if let Some(path) = &args.json {
        let written = validator
            .write_json_report(path)
            .with_context(|| format!("write {}", path.display()))?;
        info!(path = %written.display(), "wrote JSON report");
        outputs.push(written);
    }
    if let Some(path) = &args.csv {
        let written = validator
            .write_csv(path)
            .with_context(|| format!("write {}", path.display()))?;
        info!(path = %written.display(), "wrote CSV results");
        outputs.push(written);
    }

    Ok(RunReport {
        input: args.file.clone(),
        system,
        validator,
        outputs,
    })
}

fn default_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| emr_validate::DEFAULT_VALIDATOR_NAME.to_string())
}
