//! Domain models for the prompts migration.
//!
//! - [`InputRecord`] - one CSV row, fields looked up by header name
//! - [`PromptRecord`] - a row that passed filtering, normalized
//! - [`SkipReason`] / [`SkippedRow`] - why a row was left out
//!
//! Everything here lives only for the duration of one run.

use serde::Serialize;
use std::fmt;

// =============================================================================
// Columns & Categories
// =============================================================================

/// Header names the input CSV must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = ["id", "question", "category", "deck_id", "deck_order"];

/// Questions containing this text are unpublished placeholders.
pub const PLACEHOLDER_MARKER: &str = "Update coming soon";

/// Categories managed by the CSV. Prompts in any other category are never deleted.
pub const MANAGED_CATEGORIES: [&str; 2] = ["Standard", "Deck"];

// =============================================================================
// Input Record
// =============================================================================

/// A raw CSV row.
///
/// A field is `None` when the row is shorter than the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRecord {
    /// 1-based line in the source file where the row starts.
    pub line: u64,
    pub id: Option<String>,
    pub question: Option<String>,
    pub category: Option<String>,
    pub deck_id: Option<String>,
    pub deck_order: Option<String>,
}

impl InputRecord {
    /// Build a record from plain field values; handy for tests and callers
    /// that already hold the row in memory.
    pub fn from_fields(
        line: u64,
        id: &str,
        question: &str,
        category: &str,
        deck_id: &str,
        deck_order: &str,
    ) -> Self {
        Self {
            line,
            id: Some(id.to_string()),
            question: Some(question.to_string()),
            category: Some(category.to_string()),
            deck_id: Some(deck_id.to_string()),
            deck_order: Some(deck_order.to_string()),
        }
    }
}

// =============================================================================
// Validated Record
// =============================================================================

/// A row that made it into the migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRecord {
    pub line: u64,
    /// `None` means "new prompt": the migration generates an id for it.
    pub id: Option<String>,
    pub question: String,
    pub category: String,
    pub deck_id: Option<String>,
    /// Digit-only position, kept as text so it is emitted exactly as written.
    pub deck_order: Option<String>,
}

impl PromptRecord {
    /// True when the row updates an existing prompt rather than inserting one.
    pub fn is_update(&self) -> bool {
        self.id.is_some()
    }
}

// =============================================================================
// Skipped Rows
// =============================================================================

/// Why a row was left out of the migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// `question` missing or blank.
    MissingQuestion,
    /// `question` contains the placeholder marker.
    Placeholder,
    /// `category` missing or blank.
    MissingCategory,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingQuestion => write!(f, "missing question"),
            SkipReason::Placeholder => write!(f, "placeholder question"),
            SkipReason::MissingCategory => write!(f, "missing category"),
        }
    }
}

/// A row that was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: SkipReason,
}
