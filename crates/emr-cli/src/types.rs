use std::path::PathBuf;

use emr_validate::DataValidator;

/// Outcome of the `validate` command.
#[derive(Debug)]
pub struct RunReport {
    pub input: PathBuf,
    pub system: Option<String>,
    pub validator: DataValidator,
    pub outputs: Vec<PathBuf>,
}
