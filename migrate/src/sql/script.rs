//! Migration script assembly.
//!
//! The script runs, in order:
//!
//! ```text
//! 1. ALTER TABLE   add prompts.deck if missing
//! 2. CREATE TEMP   csv_prompts staging table
//! 3. INSERT        every kept CSV row into csv_prompts (one statement)
//! 4. UPDATE        prompts whose id is in the CSV
//! 5. INSERT        CSV rows without id as new prompts
//! 6. DELETE        Standard/Deck prompts whose id is not in the CSV
//! 7. UPDATE        prompts.deck from decks.name
//! 8. UPDATE        prompts.deck = NULL where deck_id is NULL
//! 9. DROP          csv_prompts
//! ```
//!
//! Output depends only on the records and their order.

use crate::models::{PromptRecord, MANAGED_CATEGORIES};

use super::{escape, ValueTuple};

const HEADER: &[&str] = &[
    "-- Migration: Update prompts table from CSV data",
    "-- 1. Update existing prompts (matching IDs)",
    "-- 2. Insert new prompts (blank IDs in CSV)",
    "-- 3. Delete prompts not in CSV (Standard/Deck categories only)",
    "-- 4. Add deck column showing deck name",
    "",
    "-- Step 1: Add deck column to prompts table",
    "ALTER TABLE prompts ADD COLUMN IF NOT EXISTS deck TEXT;",
    "",
    "-- Step 2: Create temporary table with CSV data",
    "CREATE TEMP TABLE csv_prompts (",
    "  id TEXT,",
    "  question TEXT,",
    "  category TEXT,",
    "  deck_id TEXT,",
    "  deck_order INTEGER",
    ");",
    "",
    "-- Step 3: Insert CSV data into temporary table",
    "-- Note: Skipping empty rows and placeholder text",
];

const STAGING_INSERT: &str =
    "INSERT INTO csv_prompts (id, question, category, deck_id, deck_order) VALUES";

const NO_ROWS: &str = "-- No CSV rows qualified: csv_prompts stays empty";

const UPSERT: &[&str] = &[
    "",
    "-- Step 4: Update existing prompts (where ID exists in CSV and DB)",
    "UPDATE prompts p",
    "SET ",
    "  question = csv.question,",
    "  category = csv.category,",
    "  deck_id = CASE ",
    "    WHEN csv.deck_id IS NOT NULL AND csv.deck_id != '' THEN csv.deck_id::UUID ",
    "    ELSE p.deck_id ",
    "  END,",
    "  deck_order = CASE ",
    "    WHEN csv.deck_order IS NOT NULL THEN csv.deck_order ",
    "    ELSE p.deck_order ",
    "  END",
    "FROM csv_prompts csv",
    "WHERE csv.id IS NOT NULL ",
    "  AND csv.id != ''",
    "  AND p.id::TEXT = csv.id",
    "  AND csv.question IS NOT NULL ",
    "  AND csv.question != '';",
    "",
    "-- Step 5: Insert new prompts (where ID is blank in CSV)",
    "INSERT INTO prompts (id, question, category, deck_id, deck_order)",
    "SELECT ",
    "  uuid_generate_v4(),",
    "  csv.question,",
    "  csv.category,",
    "  CASE WHEN csv.deck_id IS NOT NULL AND csv.deck_id != '' THEN csv.deck_id::UUID ELSE NULL END,",
    "  csv.deck_order",
    "FROM csv_prompts csv",
    "WHERE (csv.id IS NULL OR csv.id = '')",
    "  AND csv.question IS NOT NULL ",
    "  AND csv.question != '';",
    "",
];

const DENORMALIZE: &[&str] = &[
    "",
    "-- Step 7: Update deck column with deck names",
    "UPDATE prompts p",
    "SET deck = d.name",
    "FROM decks d",
    "WHERE p.deck_id = d.id;",
    "",
    "-- Step 8: Set deck to NULL where deck_id is NULL",
    "UPDATE prompts",
    "SET deck = NULL",
    "WHERE deck_id IS NULL;",
    "",
    "-- Clean up temporary table",
    "DROP TABLE csv_prompts;",
];

/// Step 6, built from [`MANAGED_CATEGORIES`].
fn delete_statement() -> Vec<String> {
    let categories = MANAGED_CATEGORIES
        .iter()
        .map(|c| escape(Some(*c)))
        .collect::<Vec<_>>()
        .join(", ");
    let labels = MANAGED_CATEGORIES
        .iter()
        .map(|c| escape(Some(*c)))
        .collect::<Vec<_>>()
        .join(" or ");

    vec![
        format!(
            "-- Step 6: Delete prompts that exist in DB with category {} but ID not in CSV",
            labels
        ),
        "DELETE FROM prompts".to_string(),
        format!("WHERE category IN ({})", categories),
        "  AND id::TEXT NOT IN (".to_string(),
        "    SELECT id FROM csv_prompts ".to_string(),
        "    WHERE id IS NOT NULL AND id != ''".to_string(),
        "  );".to_string(),
    ]
}

/// Step 3: one bulk insert, or a comment when nothing qualified.
fn staging_insert(prompts: &[PromptRecord]) -> Vec<String> {
    if prompts.is_empty() {
        return vec![NO_ROWS.to_string()];
    }

    let values = prompts
        .iter()
        .map(|p| ValueTuple::from(p).to_string())
        .collect::<Vec<_>>()
        .join(",\n");

    vec![STAGING_INSERT.to_string(), format!("{};", values)]
}

/// Build the complete migration script.
///
/// Lines are joined with `\n`; the script ends right after the final `;`.
pub fn render_migration(prompts: &[PromptRecord]) -> String {
    let mut lines: Vec<String> = HEADER.iter().map(|l| l.to_string()).collect();
    lines.extend(staging_insert(prompts));
    lines.extend(UPSERT.iter().map(|l| l.to_string()));
    lines.extend(delete_statement());
    lines.extend(DENORMALIZE.iter().map(|l| l.to_string()));

    lines.join("\n")
}
