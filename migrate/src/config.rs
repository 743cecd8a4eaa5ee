//! Run configuration.
//!
//! Each path comes from, in order: the command line, the environment
//! (a `.env` file in the working directory is honored), the built-in default.

use std::path::PathBuf;

/// Questions export read when no input path is given.
pub const DEFAULT_CSV_PATH: &str = "questions.csv";

/// Migration written when no output path is given.
pub const DEFAULT_OUTPUT_PATH: &str = "supabase/migrations/053_update_prompts_from_csv.sql";

/// Environment variable overriding [`DEFAULT_CSV_PATH`].
pub const CSV_PATH_ENV: &str = "PROMPTS_CSV_PATH";

/// Environment variable overriding [`DEFAULT_OUTPUT_PATH`].
pub const OUTPUT_PATH_ENV: &str = "PROMPTS_MIGRATION_PATH";

/// Load `.env` from the working directory, if present.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Resolved input and output paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Paths {
    /// Resolve paths against the process environment.
    pub fn resolve(input: Option<PathBuf>, output: Option<PathBuf>) -> Self {
        Self::resolve_with(input, output, |key| std::env::var(key).ok())
    }

    /// Resolve paths with a custom environment lookup. Blank values count as unset.
    pub fn resolve_with<F>(input: Option<PathBuf>, output: Option<PathBuf>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = |key: &str, default: &str| {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };

        Self {
            input: input.unwrap_or_else(|| from_env(CSV_PATH_ENV, DEFAULT_CSV_PATH)),
            output: output.unwrap_or_else(|| from_env(OUTPUT_PATH_ENV, DEFAULT_OUTPUT_PATH)),
        }
    }
}
