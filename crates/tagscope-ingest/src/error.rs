//! Error types for dataset ingestion.

use std::path::PathBuf;

use tagscope_model::ValidationError;
use thiserror::Error;

/// File-level failures. Row-level problems are reported as
/// [`crate::RejectedRow`] instead and do not abort a load.
#[derive(Debug, Error)]
pub enum IngestError {
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the configured size limit.
    #[error("file too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// File is not valid UTF-8.
    #[error("unsupported encoding in {path}: {encoding}")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    /// Malformed CSV content.
    #[error("failed to parse CSV {source_name}: {message}")]
    CsvParse {
        source_name: String,
        message: String,
    },

    /// CSV has no header row.
    #[error("CSV is empty: {source_name}")]
    EmptyCsv { source_name: String },

    /// Header lacks a required column.
    #[error("required column '{column}' not found in {source_name}")]
    MissingColumn {
        column: String,
        source_name: String,
    },

    /// Records could not form a dataset.
    #[error(transparent)]
    Dataset(#[from] ValidationError),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/resources.csv"),
        };
        assert_eq!(err.to_string(), "CSV file not found: /path/to/resources.csv");

        let err = IngestError::MissingColumn {
            column: "ResourceID".to_string(),
            source_name: "inline".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "required column 'ResourceID' not found in inline"
        );
    }
}
