//! Error types for the prompts migration generator.
//!
//! - [`CsvError`] - reading and decoding the questions CSV
//! - [`MigrationError`] - top-level errors from [`crate::pipeline`]
//!
//! Conversion is automatic via `From`, so `?` works across the boundary.
//! Rejected rows are not errors: they end up as [`crate::models::SkippedRow`]s.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors while loading the questions CSV.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read the input file.
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input is not valid UTF-8.
    #[error("Input is not valid UTF-8 (detected charset: {detected})")]
    Encoding { detected: String },

    /// Malformed CSV structure.
    #[error("Invalid CSV at line {line}: {message}")]
    Parse { line: u64, message: String },

    /// No header row at all.
    #[error("CSV file is empty")]
    EmptyFile,

    /// Required header columns are absent.
    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        CsvError::Parse {
            line,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Migration Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`crate::pipeline::generate_migration`].
#[derive(Debug, Error)]
pub enum MigrationError {
    /// CSV loading error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Failed to write the generated SQL.
    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for migration operations.
pub type MigrationResult<T> = Result<T, MigrationError>;
