//! Error types for the validation engine.

use std::path::PathBuf;

use emr_ingest::IngestError;
use thiserror::Error;

/// Errors raised to the caller. Check failures are never errors; they are
/// recorded as failed results.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A check method was called before any dataset was loaded.
    #[error("no dataset loaded in validator '{validator}'; load data before running checks")]
    DatasetNotLoaded { validator: String },

    /// Loading the dataset failed.
    #[error(transparent)]
    Load(#[from] IngestError),

    /// Unknown source-system key.
    #[error("unsupported system '{system}'. Supported: {supported}")]
    UnknownSystem { system: String, supported: String },

    /// Failed to read a preset file.
    #[error("failed to read preset {path}: {source}")]
    PresetFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Preset content is malformed or incomplete.
    #[error("invalid preset {origin}: {message}")]
    PresetParse { origin: String, message: String },

    /// Writing or converting results failed.
    #[error("failed to export results: {message}")]
    Export { message: String },

    /// Failed to write an output file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<polars::prelude::PolarsError> for ValidationError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::Export {
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for ValidationError {
    fn from(err: csv::Error) -> Self {
        Self::Export {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Export {
            message: err.to_string(),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, ValidationError>;
