//! Dataset loading for EMR validation: file reading, alias resolution and
//! Polars value helpers.

pub mod alias;
pub mod error;
pub mod reader;
pub mod values;

pub use alias::{AliasRename, ColumnAliases, resolve_aliases};
pub use error::{IngestError, Result};
pub use reader::{DatasetFormat, ReadOptions, read_dataset, read_dataset_with_options};
pub use values::{
    any_to_f64, any_to_string, format_numeric, is_missing_value, missing_count, numeric_values,
    parse_f64, text_values,
};
