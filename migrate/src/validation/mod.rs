//! Row filtering and normalization.
//!
//! # Filtering
//!
//! A row is dropped, in this order of checks, when:
//! - `question` is missing or blank
//! - `question` contains the placeholder marker (`Update coming soon`)
//! - `category` is missing or blank
//!
//! # Normalization
//!
//! Every kept field is trimmed. Blank `id` / `deck_id` become `None`, and
//! `deck_order` is kept only when it is made of ASCII digits.
//!
//! # Lints
//!
//! [`lint`] flags values that are emitted as-is but will misbehave once the
//! migration runs (non-UUID ids, out-of-range orders, duplicate ids). Lints
//! never change the generated SQL.
//!
//! # Example
//!
//! ```rust,ignore
//! use prompts_migrate::{normalize, InputRecord, SkipReason};
//!
//! let row = InputRecord::from_fields(2, "", " Q? ", "Standard", "", "3");
//! let prompt = normalize(&row).unwrap();
//! assert_eq!(prompt.question, "Q?");
//! assert_eq!(prompt.deck_order.as_deref(), Some("3"));
//!
//! let placeholder = InputRecord::from_fields(3, "", "Update coming soon", "Deck", "", "");
//! assert_eq!(normalize(&placeholder), Err(SkipReason::Placeholder));
//! ```

use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::models::{InputRecord, PromptRecord, SkipReason, SkippedRow, PLACEHOLDER_MARKER};

/// Outcome of filtering a batch of rows
#[derive(Debug, Clone, Default)]
pub struct FilterResult {
    /// Rows kept, in input order
    pub included: Vec<PromptRecord>,
    /// Rows dropped, in input order
    pub skipped: Vec<SkippedRow>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// True when `value` is a non-empty run of ASCII decimal digits.
pub fn is_integer_literal(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Decide whether a row is kept and normalize it.
pub fn normalize(record: &InputRecord) -> Result<PromptRecord, SkipReason> {
    let question = non_blank(record.question.as_deref()).ok_or(SkipReason::MissingQuestion)?;
    if question.contains(PLACEHOLDER_MARKER) {
        return Err(SkipReason::Placeholder);
    }
    let category = non_blank(record.category.as_deref()).ok_or(SkipReason::MissingCategory)?;

    let deck_order = non_blank(record.deck_order.as_deref())
        .filter(|order| is_integer_literal(order))
        .map(String::from);

    Ok(PromptRecord {
        line: record.line,
        id: non_blank(record.id.as_deref()).map(String::from),
        question: question.to_string(),
        category: category.to_string(),
        deck_id: non_blank(record.deck_id.as_deref()).map(String::from),
        deck_order,
    })
}

/// Split rows into kept and skipped, preserving order.
pub fn filter_records(records: &[InputRecord]) -> FilterResult {
    let mut result = FilterResult::default();

    for record in records {
        match normalize(record) {
            Ok(prompt) => result.included.push(prompt),
            Err(reason) => result.skipped.push(SkippedRow {
                line: record.line,
                reason,
            }),
        }
    }

    result
}

// =============================================================================
// Lints
// =============================================================================

/// Something suspicious about a kept row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LintKind {
    /// `id` is not a UUID: it matches no existing prompt.
    InvalidId { value: String },
    /// `deck_id` is not a UUID: the `::UUID` cast aborts the migration.
    InvalidDeckId { value: String },
    /// `deck_order` was given but is not digit-only; emitted as `NULL`.
    NonNumericDeckOrder { value: String },
    /// `deck_order` does not fit an `INTEGER` column.
    DeckOrderOutOfRange { value: String },
    /// Same `id` already used on an earlier line.
    DuplicateId { value: String, first_line: u64 },
}

impl fmt::Display for LintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintKind::InvalidId { value } => {
                write!(f, "id '{}' is not a UUID and will not match any prompt", value)
            }
            LintKind::InvalidDeckId { value } => {
                write!(f, "deck_id '{}' is not a UUID; the migration will fail on it", value)
            }
            LintKind::NonNumericDeckOrder { value } => {
                write!(f, "deck_order '{}' is not a whole number; written as NULL", value)
            }
            LintKind::DeckOrderOutOfRange { value } => {
                write!(f, "deck_order {} does not fit an INTEGER column", value)
            }
            LintKind::DuplicateId { value, first_line } => {
                write!(f, "id '{}' already used on line {}", value, first_line)
            }
        }
    }
}

/// A lint attached to its source line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lint {
    pub line: u64,
    #[serde(flatten)]
    pub kind: LintKind,
}

impl fmt::Display for Lint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

/// Check kept rows for values that will misbehave in the database.
///
/// `inputs` must be the raw rows the prompts came from; they are matched by
/// line to report `deck_order` values that normalization discarded.
pub fn lint(prompts: &[PromptRecord], inputs: &[InputRecord]) -> Vec<Lint> {
    let raw_orders: HashMap<u64, &str> = inputs
        .iter()
        .filter_map(|r| non_blank(r.deck_order.as_deref()).map(|o| (r.line, o)))
        .collect();
    let mut seen_ids: HashMap<&str, u64> = HashMap::new();
    let mut lints = Vec::new();

    for prompt in prompts {
        let mut push = |kind: LintKind| lints.push(Lint { line: prompt.line, kind });

        if let Some(id) = prompt.id.as_deref() {
            if Uuid::parse_str(id).is_err() {
                push(LintKind::InvalidId { value: id.to_string() });
            }
            match seen_ids.entry(id) {
                Entry::Occupied(first) => push(LintKind::DuplicateId {
                    value: id.to_string(),
                    first_line: *first.get(),
                }),
                Entry::Vacant(slot) => {
                    slot.insert(prompt.line);
                }
            }
        }

        if let Some(deck_id) = prompt.deck_id.as_deref() {
            if Uuid::parse_str(deck_id).is_err() {
                push(LintKind::InvalidDeckId { value: deck_id.to_string() });
            }
        }

        match prompt.deck_order.as_deref() {
            Some(order) if order.parse::<i32>().is_err() => {
                push(LintKind::DeckOrderOutOfRange { value: order.to_string() });
            }
            Some(_) => {}
            None => {
                if let Some(raw) = raw_orders.get(&prompt.line) {
                    push(LintKind::NonNumericDeckOrder { value: raw.to_string() });
                }
            }
        }
    }

    lints
}
