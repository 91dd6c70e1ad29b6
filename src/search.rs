//! Substring search over a sheet snapshot with exact-match marking.

use crate::models::{EmbedField, Record, Row};
use crate::normalise::normalise;
use log::warn;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Trailing columns holding metadata that is never substring-searched.
pub const METADATA_COLUMNS: usize = 2;

static TOKEN_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;] ").expect("separator pattern is valid"));

/// Outcome of one search call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<R> {
    /// Matched records in sheet order.
    pub records: Vec<R>,
    /// Positions in `records` flagged as exact matches.
    ///
    /// A position is recorded as "index of the last record appended so far"
    /// when an exact-matching row is visited, so it can be `-1` or refer to a
    /// record appended for an earlier row.
    pub duplicates: BTreeSet<isize>,
    /// Whether this call reloaded the snapshot first.
    pub reloaded: bool,
}

impl<R: Record> SearchResult<R> {
    pub fn is_duplicate(&self, index: usize) -> bool {
        isize::try_from(index).is_ok_and(|i| self.duplicates.contains(&i))
    }

    /// Display units for every record, with duplicate emphasis applied.
    pub fn fields(&self) -> Vec<EmbedField> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| record.to_field(self.is_duplicate(i)))
            .collect()
    }
}

/// Searchable cells of a row: all but the trailing metadata columns.
pub fn searchable_cells(row: &[String]) -> &[String] {
    &row[..row.len().saturating_sub(METADATA_COLUMNS)]
}

/// Whether any searchable cell contains the (already normalised) query.
pub fn row_matches(normalised_query: &str, row: &[String]) -> bool {
    searchable_cells(row)
        .iter()
        .any(|cell| normalise(cell).contains(normalised_query))
}

/// Whether the row is an exact match for the (already normalised) query.
///
/// Either the headword equals the query, or the query is one of the
/// `", "`/`"; "`-separated tokens of any later column, metadata included.
pub fn is_exact_match(normalised_query: &str, row: &[String]) -> bool {
    let Some((headword, rest)) = row.split_first() else {
        return false;
    };
    if normalise(headword) == normalised_query {
        return true;
    }
    rest.iter().any(|cell| {
        TOKEN_SEPARATOR
            .split(&normalise(cell))
            .any(|token| token == normalised_query)
    })
}

/// Scans every row, collecting matching records and exact-match positions.
///
/// Rows that match but do not fit the record schema are skipped with a
/// warning; their exact-match check still runs.
pub fn search_rows<R: Record>(query: &str, rows: &[Row]) -> (Vec<R>, BTreeSet<isize>) {
    let query = normalise(query);
    let mut records: Vec<R> = Vec::new();
    let mut duplicates = BTreeSet::new();

    for (index, row) in rows.iter().enumerate() {
        if row_matches(&query, row) {
            match R::decode(row) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping row {}: {}", index, e),
            }
        }
        if is_exact_match(&query, row) {
            duplicates.insert(records.len() as isize - 1);
        }
    }

    (records, duplicates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ThravelemehWord, Word};

    fn word_row(cells: &[&str]) -> Row {
        let mut row: Row = cells.iter().map(|c| c.to_string()).collect();
        row.resize(10, String::new());
        row
    }

    fn dupes(items: &[isize]) -> BTreeSet<isize> {
        items.iter().copied().collect()
    }

    #[test]
    fn test_single_exact_headword() {
        let rows = vec![word_row(&["hello", "", "", "greeting", "", "", "", "", "meta", "meta"])];
        let (records, duplicates) = search_rows::<Word>("hello", &rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].word, "hello");
        assert_eq!(duplicates, dupes(&[0]));
    }

    #[test]
    fn test_empty_query_matches_every_row() {
        let rows = vec![
            word_row(&["a"]),
            word_row(&["b", "noun"]),
            word_row(&["", "", "", "", "", "", "", "", "lang", "src"]),
        ];
        let (records, _) = search_rows::<Word>("", &rows);
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_match_is_normalised_substring() {
        let rows = vec![
            word_row(&["Dááf", "house"]),
            word_row(&["other", "a big HOUSE"]),
            word_row(&["none", "tree"]),
        ];
        let (records, _) = search_rows::<Word>("  daaf ", &rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].word, "Dááf");

        let (records, _) = search_rows::<Word>("house", &rows);
        let words: Vec<&str> = records.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, ["Dááf", "other"]);
    }

    #[test]
    fn test_metadata_columns_are_not_searched() {
        let rows = vec![word_row(&["zed", "", "", "", "", "", "", "", "secret", "hidden"])];
        let (records, duplicates) = search_rows::<Word>("secr", &rows);
        assert!(records.is_empty());
        assert!(duplicates.is_empty());
    }

    #[test]
    fn test_one_record_per_row_even_with_many_matching_cells() {
        let rows = vec![word_row(&["run", "run", "run", "run"])];
        let (records, _) = search_rows::<Word>("run", &rows);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_second_row_exact_match_marks_its_position() {
        let rows = vec![
            word_row(&["running", "the act of running"]),
            word_row(&["run", "", "", "to move fast"]),
        ];
        let (records, duplicates) = search_rows::<Word>("run", &rows);
        assert_eq!(records.len(), 2);
        assert_eq!(duplicates, dupes(&[1]));
    }

    #[test]
    fn test_token_match_in_later_column() {
        let rows = vec![word_row(&["sol", "sun; star, light"])];
        let (_, duplicates) = search_rows::<Word>("Star", &rows);
        assert_eq!(duplicates, dupes(&[0]));

        // Separators need the trailing space.
        let rows = vec![word_row(&["sol", "sun;star"])];
        let (records, duplicates) = search_rows::<Word>("star", &rows);
        assert_eq!(records.len(), 1);
        assert!(duplicates.is_empty());
    }

    #[test]
    fn test_exact_match_in_metadata_column_marks_without_inclusion() {
        // Nothing is appended, yet the metadata token match records -1.
        let rows = vec![word_row(&["zed", "", "", "", "", "", "", "", "ko", "nara"])];
        let (records, duplicates) = search_rows::<Word>("nara", &rows);
        assert!(records.is_empty());
        assert_eq!(duplicates, dupes(&[-1]));
    }

    #[test]
    fn test_unappended_exact_row_marks_previous_record() {
        let rows = vec![
            word_row(&["nara-ri", "country"]),
            word_row(&["zed", "", "", "", "", "", "", "", "ko", "nara"]),
            word_row(&["tree", "wood"]),
        ];
        let (records, duplicates) = search_rows::<Word>("nara", &rows);
        assert_eq!(records.len(), 1);
        // Row 1 never matched for inclusion but points at row 0's record.
        assert_eq!(duplicates, dupes(&[0]));
    }

    #[test]
    fn test_malformed_row_is_skipped_but_still_checked() {
        let rows = vec![
            word_row(&["alpha", "first"]),
            vec!["beta".to_string(), "x".to_string(), "y".to_string()],
            word_row(&["beta", "second"]),
        ];
        let (records, duplicates) = search_rows::<Word>("beta", &rows);
        let words: Vec<&str> = records.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, ["beta"]);
        // The short row is not appended but still marks -1.
        assert_eq!(duplicates, dupes(&[-1, 0]));
    }

    #[test]
    fn test_empty_row_is_never_exact() {
        assert!(!is_exact_match("", &[]));
        assert!(!row_matches("", &[]));
    }

    #[test]
    fn test_thravelemeh_excludes_cont_and_origin() {
        let rows = vec![vec![
            "daaf".to_string(),
            "house".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            "arch".to_string(),
            "old".to_string(),
        ]];
        let (records, _) = search_rows::<ThravelemehWord>("arch", &rows);
        assert!(records.is_empty());
        let (records, duplicates) = search_rows::<ThravelemehWord>("daaf", &rows);
        assert_eq!(records[0].cont, "arch");
        assert_eq!(duplicates, dupes(&[0]));
    }

    #[test]
    fn test_fields_apply_duplicate_emphasis() {
        let result = SearchResult {
            records: vec![
                Word::decode(&word_row(&["running", "act"])).unwrap(),
                Word::decode(&word_row(&["run", "go"])).unwrap(),
            ],
            duplicates: dupes(&[-1, 1]),
            reloaded: false,
        };
        let fields = result.fields();
        assert_eq!(fields[0].name, "**running**");
        assert!(fields[0].inline);
        assert_eq!(fields[1].name, "__**run** (일치)__");
        assert!(!fields[1].inline);
    }
}
