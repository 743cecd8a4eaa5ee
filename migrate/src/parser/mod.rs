//! Questions CSV reader.
//!
//! Decodes the file as UTF-8 (a leading BOM is dropped), checks the header
//! for the required columns and turns every row into an [`InputRecord`].
//! No filtering happens here; see [`crate::validation`].

use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::{InputRecord, REQUIRED_COLUMNS};

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Column headers, as found in the file
    pub headers: Vec<String>,
    /// One entry per data row, in file order
    pub records: Vec<InputRecord>,
}

/// Guess the charset of raw bytes using chardet.
///
/// Only used to give a useful hint when the input is not UTF-8.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "" => "unknown".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes as strict UTF-8, dropping a UTF-8 byte order mark.
pub fn decode_content(bytes: &[u8]) -> CsvResult<String> {
    let body = match encoding_rs::Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) if encoding == encoding_rs::UTF_8 => &bytes[bom_len..],
        Some((encoding, _)) => {
            return Err(CsvError::Encoding {
                detected: encoding.name().to_string(),
            })
        }
        None => bytes,
    };

    encoding_rs::UTF_8
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or_else(|| CsvError::Encoding {
            detected: detect_encoding(body),
        })
}

/// Position of each required column in the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    id: usize,
    question: usize,
    category: usize,
    deck_id: usize,
    deck_order: usize,
}

impl ColumnIndex {
    /// Locate the required columns; later duplicates of a header win.
    fn from_headers(headers: &[String]) -> CsvResult<Self> {
        let find = |name: &str| headers.iter().rposition(|h| h == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| find(*name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(CsvError::MissingColumns(missing));
        }

        // Every lookup below succeeded in the check above.
        let at = |name: &str| find(name).unwrap_or_default();
        Ok(Self {
            id: at("id"),
            question: at("question"),
            category: at("category"),
            deck_id: at("deck_id"),
            deck_order: at("deck_order"),
        })
    }

    fn record(&self, row: &StringRecord, line: u64) -> InputRecord {
        let field = |idx: usize| row.get(idx).map(str::to_string);
        InputRecord {
            line,
            id: field(self.id),
            question: field(self.question),
            category: field(self.category),
            deck_id: field(self.deck_id),
            deck_order: field(self.deck_order),
        }
    }
}

/// Parse CSV text into input records.
///
/// Rows may be shorter or longer than the header; missing fields are `None`.
///
/// # Example
/// ```ignore
/// use prompts_migrate::parse_csv;
///
/// let csv = "id,question,category,deck_id,deck_order\n,Hello?,Standard,,\n";
/// let result = parse_csv(csv).unwrap();
/// assert_eq!(result.records[0].question.as_deref(), Some("Hello?"));
/// ```
pub fn parse_csv(content: &str) -> CsvResult<ParseResult> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(CsvError::EmptyFile);
    }
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut records = Vec::new();
    let mut row = StringRecord::new();
    while reader.read_record(&mut row)? {
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        records.push(columns.record(&row, line));
    }

    Ok(ParseResult { headers, records })
}

/// Parse raw CSV bytes.
pub fn parse_bytes(bytes: &[u8]) -> CsvResult<ParseResult> {
    let content = decode_content(bytes)?;
    parse_csv(&content)
}

/// Read and parse a CSV file.
pub fn parse_csv_file<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| CsvError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,question,category,deck_id,deck_order";

    #[test]
    fn test_simple_csv() {
        let csv = format!("{HEADER}\n1,Q1,Standard,,\n,Q2,Deck,d1,2\n");
        let result = parse_csv(&csv).unwrap();

        assert_eq!(result.headers.len(), 5);
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].id.as_deref(), Some("1"));
        assert_eq!(result.records[0].deck_id.as_deref(), Some(""));
        assert_eq!(result.records[1].deck_id.as_deref(), Some("d1"));
        assert_eq!(result.records[1].deck_order.as_deref(), Some("2"));
    }

    #[test]
    fn test_line_numbers() {
        let csv = format!("{HEADER}\n1,Q1,Standard,,\n2,Q2,Standard,,\n");
        let result = parse_csv(&csv).unwrap();

        assert_eq!(result.records[0].line, 2);
        assert_eq!(result.records[1].line, 3);
    }

    #[test]
    fn test_quoted_values() {
        let csv = format!("{HEADER}\n,\"Why, \"\"really\"\"?\",Standard,,\n");
        let result = parse_csv(&csv).unwrap();

        assert_eq!(
            result.records[0].question.as_deref(),
            Some("Why, \"really\"?")
        );
    }

    #[test]
    fn test_multiline_question() {
        let csv = format!("{HEADER}\n,\"first\nsecond\",Standard,,\n3,Q3,Deck,,\n");
        let result = parse_csv(&csv).unwrap();

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].question.as_deref(), Some("first\nsecond"));
        assert_eq!(result.records[1].line, 4);
    }

    #[test]
    fn test_columns_in_any_order_and_extra_ignored() {
        let csv = "notes, deck_order ,category,question,id,deck_id\nx,4,Deck,Q,abc,d\n";
        let result = parse_csv(csv).unwrap();
        let record = &result.records[0];

        assert_eq!(record.id.as_deref(), Some("abc"));
        assert_eq!(record.question.as_deref(), Some("Q"));
        assert_eq!(record.deck_order.as_deref(), Some("4"));
    }

    #[test]
    fn test_short_rows_yield_none() {
        let csv = format!("{HEADER}\n1,Q1\n");
        let result = parse_csv(&csv).unwrap();
        let record = &result.records[0];

        assert_eq!(record.question.as_deref(), Some("Q1"));
        assert_eq!(record.category, None);
        assert_eq!(record.deck_order, None);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let csv = format!("{HEADER}\n1,Q1,Standard,,\n\n2,Q2,Standard,,\n");
        let result = parse_csv(&csv).unwrap();

        assert_eq!(result.records.len(), 2);
    }

    #[test]
    fn test_missing_columns_error() {
        let csv = "id,question,category\n1,Q,Standard\n";
        match parse_csv(csv) {
            Err(CsvError::MissingColumns(missing)) => {
                assert_eq!(missing, vec!["deck_id", "deck_order"]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(parse_csv(""), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(format!("{HEADER}\n1,Q1,Standard,,\n").as_bytes());
        let result = parse_bytes(&bytes).unwrap();

        assert_eq!(result.headers[0], "id");
        assert_eq!(result.records.len(), 1);
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        assert!(matches!(decode_content(bytes), Err(CsvError::Encoding { .. })));
    }

    #[test]
    fn test_utf16_bom_is_rejected() {
        let bytes: &[u8] = &[0xFF, 0xFE, b'i', 0x00, b'd', 0x00];
        match decode_content(bytes) {
            Err(CsvError::Encoding { detected }) => assert_eq!(detected, "UTF-16LE"),
            other => panic!("expected Encoding error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = parse_csv_file("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, CsvError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}
