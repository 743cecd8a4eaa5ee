//! # prompts-migrate - questions CSV to prompts table migration
//!
//! Reads the questions export (one row per prompt) and writes a SQL migration
//! that brings the `prompts` table in line with it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV File   │────▶│   Parser    │────▶│  Validation │────▶│  SQL script │
//! │   (UTF-8)   │     │ (header chk)│     │ filter/lint │     │ (migration) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use prompts_migrate::generate_migration;
//! use std::path::Path;
//!
//! let report = generate_migration(Path::new("questions.csv"), Some(Path::new("out.sql")))?;
//! println!("Included {} rows", report.rows_included);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`config`] - Default paths and environment overrides
//! - [`logs`] - Operator log
//! - [`models`] - Input and validated records
//! - [`parser`] - CSV reading
//! - [`validation`] - Row filtering, normalization and lints
//! - [`sql`] - Literal escaping and script assembly
//! - [`pipeline`] - File-to-file generation

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Parsing
pub mod parser;

// Validation
pub mod validation;

// SQL generation
pub mod sql;

// Orchestration
pub mod pipeline;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, CsvResult, MigrationError, MigrationResult};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    InputRecord,
    PromptRecord,
    SkipReason,
    SkippedRow,
    MANAGED_CATEGORIES,
    PLACEHOLDER_MARKER,
    REQUIRED_COLUMNS,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_encoding,
    parse_bytes,
    parse_csv,
    parse_csv_file,
    ParseResult,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{
    filter_records,
    is_integer_literal,
    lint,
    normalize,
    FilterResult,
    Lint,
    LintKind,
};

// =============================================================================
// Re-exports - SQL
// =============================================================================

pub use sql::{escape, render_migration, ValueTuple};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{build_migration, generate_migration, MigrationReport};
