//! Chat embed assembly for search results.

use crate::models::{EmbedField, Record};
use crate::search::SearchResult;
use serde::{Deserialize, Serialize};

/// Platform limit on fields per embed.
pub const MAX_FIELDS: usize = 25;
pub const MAX_FIELD_NAME: usize = 256;
pub const MAX_FIELD_VALUE: usize = 1024;

const EMPTY_VALUE: &str = "-";
const RELOADED_FOOTER: &str = "사전 데이터를 새로 불러왔습니다.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// A chat embed, serialisable to the platform's JSON shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub footer: Option<EmbedFooter>,
}

impl Embed {
    /// Builds the result embed for `query`.
    pub fn from_search<R: Record>(query: &str, result: &SearchResult<R>) -> Self {
        let total = result.records.len();
        let mut description = format!("{}개의 단어를 찾았습니다.", total);
        if total > MAX_FIELDS {
            description.push_str(&format!(
                " (상위 {}개만 표시, {}개 생략)",
                MAX_FIELDS,
                total - MAX_FIELDS
            ));
        }

        let fields = result
            .fields()
            .into_iter()
            .take(MAX_FIELDS)
            .map(fit_field)
            .collect();

        Embed {
            title: format!("\"{}\" 검색 결과", query),
            description,
            fields,
            footer: result.reloaded.then(|| EmbedFooter {
                text: RELOADED_FOOTER.to_string(),
            }),
        }
    }
}

fn fit_field(field: EmbedField) -> EmbedField {
    let value = if field.value.is_empty() {
        EMPTY_VALUE.to_string()
    } else {
        truncate(&field.value, MAX_FIELD_VALUE)
    };
    EmbedField {
        name: truncate(&field.name, MAX_FIELD_NAME),
        value,
        inline: field.inline,
    }
}

/// Cuts `text` to at most `max` characters, ending with an ellipsis if cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Word;
    use std::collections::BTreeSet;

    fn word(headword: &str, noun: &str) -> Word {
        Word {
            word: headword.to_string(),
            noun: noun.to_string(),
            ..Default::default()
        }
    }

    fn result(records: Vec<Word>, duplicates: &[isize], reloaded: bool) -> SearchResult<Word> {
        SearchResult {
            records,
            duplicates: duplicates.iter().copied().collect::<BTreeSet<_>>(),
            reloaded,
        }
    }

    #[test]
    fn test_embed_fields_and_emphasis() {
        let embed = Embed::from_search(
            "run",
            &result(vec![word("running", "act"), word("run", "go")], &[1], false),
        );
        assert_eq!(embed.title, "\"run\" 검색 결과");
        assert_eq!(embed.description, "2개의 단어를 찾았습니다.");
        assert_eq!(embed.fields.len(), 2);
        assert_eq!(embed.fields[1].name, "__**run** (일치)__");
        assert!(!embed.fields[1].inline);
        assert!(embed.footer.is_none());
    }

    #[test]
    fn test_field_cap_and_reload_footer() {
        let records = (0..30).map(|i| word(&format!("w{}", i), "n")).collect();
        let embed = Embed::from_search("w", &result(records, &[], true));
        assert_eq!(embed.fields.len(), MAX_FIELDS);
        assert!(embed.description.contains("5개 생략"));
        assert_eq!(embed.footer.unwrap().text, RELOADED_FOOTER);
    }

    #[test]
    fn test_empty_body_and_truncation() {
        let long = "가".repeat(2000);
        let embed = Embed::from_search(
            "x",
            &result(vec![word("bare", ""), word("long", &long)], &[], false),
        );
        assert_eq!(embed.fields[0].value, EMPTY_VALUE);
        assert_eq!(embed.fields[1].value.chars().count(), MAX_FIELD_VALUE);
        assert!(embed.fields[1].value.ends_with('…'));
    }

    #[test]
    fn test_serialises_to_embed_json() {
        let embed = Embed::from_search("hello", &result(vec![word("hello", "greeting")], &[0], true));
        let json = serde_json::to_value(&embed).unwrap();
        assert_eq!(json["fields"][0]["name"], "__**hello** (일치)__");
        assert_eq!(json["fields"][0]["value"], "명: greeting");
        assert_eq!(json["fields"][0]["inline"], false);
        assert_eq!(json["footer"]["text"], RELOADED_FOOTER);
    }
}
