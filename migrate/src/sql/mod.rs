//! SQL generation.
//!
//! - [`escape`] - string literals for the target dialect
//! - [`ValueTuple`] - one staging row rendered as SQL literals
//! - [`script`] - the full migration script

pub mod script;

use std::fmt;

use crate::models::PromptRecord;

pub use script::render_migration;

/// Render an optional string as a SQL literal.
///
/// `None` becomes `NULL`; anything else is single-quoted with embedded quotes
/// doubled. Backslashes are left alone, which is only correct for dialects
/// with standard-conforming strings (PostgreSQL's default).
///
/// # Example
/// ```ignore
/// use prompts_migrate::escape;
///
/// assert_eq!(escape(None), "NULL");
/// assert_eq!(escape(Some("it's")), "'it''s'");
/// ```
pub fn escape(value: Option<&str>) -> String {
    match value {
        None => "NULL".to_string(),
        Some(s) => format!("'{}'", s.replace('\'', "''")),
    }
}

/// A staging row as SQL literals, in `(id, question, category, deck_id, deck_order)` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueTuple {
    pub id: String,
    pub question: String,
    pub category: String,
    pub deck_id: String,
    pub deck_order: String,
}

impl From<&PromptRecord> for ValueTuple {
    fn from(prompt: &PromptRecord) -> Self {
        Self {
            id: escape(prompt.id.as_deref()),
            question: escape(Some(prompt.question.as_str())),
            category: escape(Some(prompt.category.as_str())),
            deck_id: escape(prompt.deck_id.as_deref()),
            // Digit-only by construction, so emitted bare.
            deck_order: prompt.deck_order.clone().unwrap_or_else(|| "NULL".to_string()),
        }
    }
}

impl fmt::Display for ValueTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {})",
            self.id, self.question, self.category, self.deck_id, self.deck_order
        )
    }
}
