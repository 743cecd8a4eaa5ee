//! End-to-end migration generation: CSV file in, SQL file out.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV file   │────▶│   Parser    │────▶│  Validation │────▶│  SQL script │
//! │   (UTF-8)   │     │ (header chk)│     │ filter/lint │     │  (9 steps)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use prompts_migrate::generate_migration;
//! use std::path::Path;
//!
//! let report = generate_migration(
//!     Path::new("questions.csv"),
//!     Some(Path::new("supabase/migrations/053_update_prompts_from_csv.sql")),
//! )?;
//! println!("{} rows included", report.rows_included);
//! ```

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MigrationError, MigrationResult};
use crate::logs::{
    log_info, log_info_indent, log_success, log_warning, log_warning_indent, LogEntry, LOGGER,
};
use crate::models::{InputRecord, SkipReason, SkippedRow, MANAGED_CATEGORIES};
use crate::parser::parse_csv_file;
use crate::sql::render_migration;
use crate::validation::{filter_records, lint, Lint};

/// A generated migration and what went into it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    /// CSV the rows were read from
    pub input: PathBuf,
    /// File the SQL was written to; `None` when the caller keeps it in memory
    pub output: Option<PathBuf>,
    /// Data rows in the CSV
    pub rows_read: usize,
    /// Rows in the staging insert
    pub rows_included: usize,
    /// Included rows with an id (update path)
    pub updates: usize,
    /// Included rows without an id (insert path)
    pub inserts: usize,
    /// Rows left out, with the reason
    pub skipped: Vec<SkippedRow>,
    /// Suspicious values in included rows
    pub lints: Vec<Lint>,
    /// Everything logged while generating
    pub log: Vec<LogEntry>,
    /// The generated script
    #[serde(skip)]
    pub sql: String,
}

impl MigrationReport {
    /// Number of skipped rows for one reason.
    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.iter().filter(|s| s.reason == reason).count()
    }
}

/// Build the migration for rows already in memory. Pure; nothing is logged.
pub fn build_migration(input: &Path, records: &[InputRecord]) -> MigrationReport {
    let filtered = filter_records(records);
    let lints = lint(&filtered.included, records);
    let updates = filtered.included.iter().filter(|p| p.is_update()).count();

    MigrationReport {
        input: input.to_path_buf(),
        output: None,
        rows_read: records.len(),
        rows_included: filtered.included.len(),
        updates,
        inserts: filtered.included.len() - updates,
        skipped: filtered.skipped,
        lints,
        log: Vec::new(),
        sql: render_migration(&filtered.included),
    }
}

/// Read `input`, generate the migration and write it to `output`.
///
/// With `output` set to `None` the SQL is only returned in
/// [`MigrationReport::sql`]. Nothing is written if reading or parsing fails.
/// The run's log lines end up in [`MigrationReport::log`].
pub fn generate_migration(input: &Path, output: Option<&Path>) -> MigrationResult<MigrationReport> {
    // Leftovers from an earlier failed run on this thread.
    LOGGER.drain();

    log_info(format!("📄 Reading: {}", input.display()));
    let parsed = parse_csv_file(input)?;
    log_info_indent(format!("Columns: {}", parsed.headers.join(", ")), 1);
    log_info_indent(format!("Rows: {}", parsed.records.len()), 1);

    let mut report = build_migration(input, &parsed.records);
    log_report(&report);

    if let Some(path) = output {
        write_sql(path, &report.sql)?;
        report.output = Some(path.to_path_buf());
        log_success(format!("Migration SQL generated: {}", path.display()));
    }
    log_info(format!("Total rows processed: {}", report.rows_included));
    report.log = LOGGER.drain();

    Ok(report)
}

fn log_report(report: &MigrationReport) {
    log_info_indent(
        format!(
            "Included: {} ({} updates, {} new)",
            report.rows_included, report.updates, report.inserts
        ),
        1,
    );

    if !report.skipped.is_empty() {
        log_info_indent(format!("Skipped: {}", report.skipped.len()), 1);
        for reason in [
            SkipReason::MissingQuestion,
            SkipReason::Placeholder,
            SkipReason::MissingCategory,
        ] {
            let count = report.skipped_for(reason);
            if count > 0 {
                log_info_indent(format!("{}: {}", reason, count), 2);
            }
        }
    }

    if !report.lints.is_empty() {
        log_warning(format!("{} suspicious value(s) in included rows", report.lints.len()));
        for lint in &report.lints {
            log_warning_indent(lint.to_string(), 1);
        }
    }

    if report.rows_included == 0 {
        log_warning(format!(
            "No rows qualified: the migration will delete every {} prompt",
            MANAGED_CATEGORIES.join("/")
        ));
    }
}

fn write_sql(path: &Path, sql: &str) -> MigrationResult<()> {
    let to_write_error = |source| MigrationError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_write_error)?;
    }
    fs::write(path, sql).map_err(to_write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CsvError;
    use tempfile::tempdir;

    const SAMPLE: &str = "id,question,category,deck_id,deck_order\n\
                          1,Q1,Standard,,\n\
                          ,Q2,Deck,d1,2\n\
                          ,Update coming soon,Standard,,\n\
                          2,,Standard,,\n";

    #[test]
    fn test_sample_rows_filtered() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("questions.csv");
        fs::write(&input, SAMPLE).unwrap();

        let report = generate_migration(&input, None).unwrap();

        assert_eq!(report.rows_read, 4);
        assert_eq!(report.rows_included, 2);
        assert_eq!(report.updates, 1);
        assert_eq!(report.inserts, 1);
        assert_eq!(report.skipped_for(SkipReason::Placeholder), 1);
        assert_eq!(report.skipped_for(SkipReason::MissingQuestion), 1);
        assert!(report.sql.contains(
            "VALUES\n('1', 'Q1', 'Standard', NULL, NULL),\n(NULL, 'Q2', 'Deck', 'd1', 2);"
        ));
        assert!(!report.sql.contains("Update coming soon"));
        assert!(report.output.is_none());
    }

    #[test]
    fn test_writes_output_and_creates_dirs() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("questions.csv");
        let output = dir.path().join("supabase/migrations/053.sql");
        fs::write(&input, SAMPLE).unwrap();

        let report = generate_migration(&input, Some(&output)).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written, report.sql);
        assert_eq!(report.output.as_deref(), Some(output.as_path()));
        assert!(written.ends_with("DROP TABLE csv_prompts;"));
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("questions.csv");
        let first = dir.path().join("first.sql");
        let second = dir.path().join("second.sql");
        fs::write(&input, SAMPLE).unwrap();

        generate_migration(&input, Some(&first)).unwrap();
        generate_migration(&input, Some(&second)).unwrap();

        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn test_missing_column_writes_nothing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("questions.csv");
        let output = dir.path().join("out.sql");
        fs::write(&input, "id,question,category\n1,Q1,Standard\n").unwrap();

        let err = generate_migration(&input, Some(&output)).unwrap_err();

        assert!(matches!(err, MigrationError::Csv(CsvError::MissingColumns(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_no_qualifying_rows() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("questions.csv");
        fs::write(
            &input,
            "id,question,category,deck_id,deck_order\n,Update coming soon,Deck,,\n",
        )
        .unwrap();

        let report = generate_migration(&input, None).unwrap();

        assert_eq!(report.rows_included, 0);
        assert!(!report.sql.contains("INSERT INTO csv_prompts"));
    }

    #[test]
    fn test_report_json_shape() {
        let records = vec![
            InputRecord::from_fields(2, "", "Q", "Deck", "", "x"),
            InputRecord::from_fields(3, "", "", "Deck", "", ""),
        ];
        let report = build_migration(Path::new("q.csv"), &records);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["rowsIncluded"], 1);
        assert_eq!(json["skipped"][0]["reason"], "missingQuestion");
        assert_eq!(json["lints"][0]["kind"], "nonNumericDeckOrder");
        assert_eq!(json["log"], serde_json::json!([]));
        assert!(json.get("sql").is_none());
    }

    #[test]
    fn test_report_carries_run_log() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("questions.csv");
        let output = dir.path().join("out.sql");
        fs::write(&input, SAMPLE).unwrap();

        let report = generate_migration(&input, Some(&output)).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        let messages: Vec<&str> = json["log"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|e| e["message"].as_str())
            .collect();

        assert!(messages[0].contains("Reading"));
        assert!(messages.contains(&format!("Migration SQL generated: {}", output.display()).as_str()));
        assert_eq!(messages.last(), Some(&"Total rows processed: 2"));
        assert!(json["log"]
            .as_array()
            .unwrap()
            .iter()
            .any(|e| e["level"] == "warning" && e["message"].as_str().unwrap().contains("not a UUID")));
        assert!(LOGGER.drain().is_empty());
    }

    #[test]
    fn test_failed_run_log_not_carried_over() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.csv");
        let good = dir.path().join("good.csv");
        fs::write(&bad, "id,question
1,Q1
").unwrap();
        fs::write(&good, SAMPLE).unwrap();

        assert!(generate_migration(&bad, None).is_err());
        let report = generate_migration(&good, None).unwrap();

        assert!(report.log.iter().all(|e| !e.message.contains("bad.csv")));
    }
}
