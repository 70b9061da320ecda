//! Reading tabular files into Polars DataFrames.

use std::path::Path;

use polars::prelude::{CsvParseOptions, CsvReadOptions, DataFrame, SerReader};
use tracing::{debug, info};

use crate::error::{IngestError, Result};

/// Options for reading a delimited file.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    /// Field separator.
    pub separator: u8,
    /// Number of rows used for schema inference.
    pub infer_schema_rows: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            separator: b',',
            infer_schema_rows: 10_000,
        }
    }
}

/// Supported input formats, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Tsv,
}

impl DatasetFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            _ => None,
        }
    }
}

/// Reads a dataset file with default options.
pub fn read_dataset(path: &Path) -> Result<DataFrame> {
    read_dataset_with_options(path, ReadOptions::default())
}

/// Reads a dataset file into a DataFrame.
///
/// Fails for missing files, unsupported extensions (including Excel
/// workbooks) and files with no content.
pub fn read_dataset_with_options(path: &Path, options: ReadOptions) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let Some(format) = DatasetFormat::from_path(path) else {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_string();
        return Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        });
    };
    let size = std::fs::metadata(path)
        .map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    if size == 0 {
        return Err(IngestError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    let separator = match format {
        DatasetFormat::Csv => options.separator,
        DatasetFormat::Tsv => b'\t',
    };
    debug!(path = %path.display(), ?format, "reading dataset");
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(options.infer_schema_rows))
        .with_parse_options(CsvParseOptions::default().with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.width() == 0 {
        return Err(IngestError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "dataset loaded"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn temp_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            DatasetFormat::from_path(Path::new("a/b.CSV")),
            Some(DatasetFormat::Csv)
        );
        assert_eq!(DatasetFormat::from_path(Path::new("b.xlsx")), None);
        assert_eq!(DatasetFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn reads_csv() {
        let file = temp_file(".csv", "mrn,age\nMRN00000001,30\nMRN00000002,\n");
        let df = read_dataset(file.path()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
        assert_eq!(df.column("age").unwrap().null_count(), 1);
    }

    #[test]
    fn reads_tsv() {
        let file = temp_file(".tsv", "mrn\tage\nMRN00000001\t30\n");
        let df = read_dataset(file.path()).unwrap();
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn rejects_excel() {
        let file = temp_file(".xlsx", "not really a workbook");
        let err = read_dataset(file.path()).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { ref extension, .. } if extension == "xlsx"));
    }

    #[test]
    fn rejects_empty_file() {
        let file = temp_file(".csv", "");
        let err = read_dataset(file.path()).unwrap_err();
        assert!(matches!(err, IngestError::EmptyFile { .. }));
    }

    #[test]
    fn rejects_missing_file() {
        let err = read_dataset(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }
}
