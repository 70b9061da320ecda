//! Source-system presets.
//!
//! A preset names the columns an export from one EMR vendor must carry, the
//! columns that must be mostly non-null or unique, and the alternative
//! headers those columns may arrive under. Built-in presets live in
//! [`systems`]; others can be read from TOML:
//!
//! ```toml
//! key = "clinic"
//! display = "CLINIC"
//! required_columns = ["patient_id", "mrn"]
//! not_null_columns = ["patient_id"]
//! unique_columns = ["patient_id"]
//!
//! [aliases]
//! patient_id = ["pat_id", "person_id"]
//! ```

pub mod builder;
pub mod systems;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use emr_ingest::ColumnAliases;

use crate::error::{Result, ValidationError};
use crate::rules::RuleSet;

pub use builder::{PRESET_MOSTLY, build_ruleset};
pub use systems::{SourceSystem, ruleset_for, supported_systems};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcePreset {
    pub key: String,
    pub display: String,
    pub required_columns: Vec<String>,
    #[serde(default)]
    pub not_null_columns: Vec<String>,
    #[serde(default)]
    pub unique_columns: Vec<String>,
    #[serde(default)]
    pub aliases: ColumnAliases,
}

impl SourcePreset {
    pub fn ruleset(&self) -> RuleSet {
        build_ruleset(
            &self.display,
            &self.required_columns,
            &self.not_null_columns,
            &self.unique_columns,
        )
    }

    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self> {
        let preset: Self = toml::from_str(content).map_err(|err| ValidationError::PresetParse {
            origin: origin.to_string(),
            message: err.to_string(),
        })?;
        preset.check(origin)?;
        Ok(preset)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ValidationError::PresetFile {
            path: path.to_path_buf(),
            source,
        })?;
        let preset = Self::from_toml_str(&content, &path.display().to_string())?;
        debug!(path = %path.display(), key = %preset.key, "loaded preset");
        Ok(preset)
    }

    fn check(&self, origin: &str) -> Result<()> {
        let invalid = |message: &str| ValidationError::PresetParse {
            origin: origin.to_string(),
            message: message.to_string(),
        };
        if self.key.trim().is_empty() {
            return Err(invalid("key must not be empty"));
        }
        if self.display.trim().is_empty() {
            return Err(invalid("display must not be empty"));
        }
        if self.required_columns.iter().any(|column| column.trim().is_empty()) {
            return Err(invalid("required_columns must not contain empty names"));
        }
        Ok(())
    }
}
