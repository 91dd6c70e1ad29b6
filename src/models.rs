use crate::error::{DictError, Result};
use serde::{Deserialize, Serialize};

/// One spreadsheet row, cells in column order.
pub type Row = Vec<String>;

/// Field bodies longer than this (in characters) are never rendered inline.
pub const INLINE_BODY_LIMIT: usize = 70;

const MATCH_MARK: &str = "(일치)";
const REMARK_TAG: &str = "비고:";

// --- Schemas ---

/// Positional column layout of a dictionary sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Record name used in error messages.
    pub record: &'static str,
    /// Column names in sheet order.
    pub fields: &'static [&'static str],
    /// Whether extra trailing columns are accepted (collected as notes).
    pub variadic_tail: bool,
}

impl Schema {
    /// Checks the row width and returns the row if it fits.
    pub fn check<'a>(&self, row: &'a [String]) -> Result<&'a [String]> {
        let width = self.fields.len();
        let fits = if self.variadic_tail {
            row.len() >= width
        } else {
            row.len() == width
        };
        if fits {
            Ok(row)
        } else {
            Err(DictError::SchemaMismatch {
                record: self.record,
                expected: if self.variadic_tail {
                    format!("at least {}", width)
                } else {
                    width.to_string()
                },
                found: row.len(),
            })
        }
    }
}

// --- Display Unit ---

/// A rendered (title, body, inline) unit as consumed by a chat embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

// --- Record Contract ---

/// A typed view of one dictionary row that knows how to display itself.
pub trait Record: Sized {
    /// Column layout this record decodes from.
    const SCHEMA: Schema;

    /// Builds the record from a row that already passed `SCHEMA.check`.
    fn from_cells(cells: &[String]) -> Self;

    /// The headword.
    fn word(&self) -> &str;

    /// Tagged definition lines, in display order, empty fields included.
    fn definitions(&self) -> Vec<(&'static str, &str)>;

    /// Free-text remark, if the variant carries one.
    fn remark(&self) -> Option<&str> {
        None
    }

    /// Headword label; emphasised with a match marker when `special`.
    fn title(&self, special: bool) -> String {
        if special {
            format!("__**{}** {}__", self.word(), MATCH_MARK)
        } else {
            format!("**{}**", self.word())
        }
    }

    /// Decodes a row, failing with `SchemaMismatch` on the wrong width.
    fn decode(row: &[String]) -> Result<Self> {
        Self::SCHEMA.check(row).map(Self::from_cells)
    }

    /// One line per non-empty definition, remark last.
    fn body(&self) -> String {
        let mut lines: Vec<String> = self
            .definitions()
            .into_iter()
            .filter(|(_, text)| !text.is_empty())
            .map(|(tag, text)| format!("{} {}", tag, text))
            .collect();
        if let Some(remark) = self.remark().filter(|r| !r.is_empty()) {
            lines.push(format!("{} {}", REMARK_TAG, remark));
        }
        lines.join("\n")
    }

    /// Renders the record as an embed field.
    fn to_field(&self, special: bool) -> EmbedField {
        let value = self.body();
        let inline = !(special || value.chars().count() > INLINE_BODY_LIMIT);
        EmbedField {
            name: self.title(special),
            value,
            inline,
        }
    }
}

fn cell(cells: &[String], index: usize) -> String {
    cells.get(index).cloned().unwrap_or_default()
}

// --- Primary Dictionary ---

/// An entry of the main dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub word: String,
    pub noun: String,
    pub adj: String,
    pub verb: String,
    pub adv: String,
    pub prep: String,
    pub conj: String,
    pub remark: String,
    pub derived_from_language: String,
    pub derived_from_word: String,
}

impl Record for Word {
    const SCHEMA: Schema = Schema {
        record: "Word",
        fields: &[
            "word",
            "noun",
            "adj",
            "verb",
            "adv",
            "prep",
            "conj",
            "remark",
            "derived_from_language",
            "derived_from_word",
        ],
        variadic_tail: false,
    };

    fn from_cells(cells: &[String]) -> Self {
        Word {
            word: cell(cells, 0),
            noun: cell(cells, 1),
            adj: cell(cells, 2),
            verb: cell(cells, 3),
            adv: cell(cells, 4),
            prep: cell(cells, 5),
            conj: cell(cells, 6),
            remark: cell(cells, 7),
            derived_from_language: cell(cells, 8),
            derived_from_word: cell(cells, 9),
        }
    }

    fn word(&self) -> &str {
        &self.word
    }

    fn definitions(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("명:", self.noun.as_str()),
            ("형:", self.adj.as_str()),
            ("동:", self.verb.as_str()),
            ("부:", self.adv.as_str()),
            ("관:", self.prep.as_str()),
            ("접:", self.conj.as_str()),
        ]
    }

    fn remark(&self) -> Option<&str> {
        Some(self.remark.as_str())
    }
}

// --- Thravelemeh Dictionary ---

/// An entry of the Thravelemeh dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThravelemehWord {
    pub word: String,
    pub noun: String,
    pub verb: String,
    pub adj: String,
    pub adv: String,
    pub conj: String,
    pub remark: String,
    /// Context tag shown in front of the headword.
    pub cont: String,
    pub origin: String,
}

impl Record for ThravelemehWord {
    const SCHEMA: Schema = Schema {
        record: "ThravelemehWord",
        fields: &[
            "word", "noun", "verb", "adj", "adv", "conj", "remark", "cont", "origin",
        ],
        variadic_tail: false,
    };

    fn from_cells(cells: &[String]) -> Self {
        ThravelemehWord {
            word: cell(cells, 0),
            noun: cell(cells, 1),
            verb: cell(cells, 2),
            adj: cell(cells, 3),
            adv: cell(cells, 4),
            conj: cell(cells, 5),
            remark: cell(cells, 6),
            cont: cell(cells, 7),
            origin: cell(cells, 8),
        }
    }

    fn word(&self) -> &str {
        &self.word
    }

    fn title(&self, special: bool) -> String {
        if special {
            format!("__[{}] **{}** {}__", self.cont, self.word, MATCH_MARK)
        } else {
            format!("[{}] **{}**", self.cont, self.word)
        }
    }

    fn definitions(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("[명]", self.noun.as_str()),
            ("[동]", self.verb.as_str()),
            ("[형]", self.adj.as_str()),
            ("[부]", self.adv.as_str()),
            ("[접]", self.conj.as_str()),
        ]
    }

    fn remark(&self) -> Option<&str> {
        Some(self.remark.as_str())
    }
}

// --- Sesame Vocabulary ---

/// An entry of the object/action/property vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SesameWord {
    pub word: String,
    pub pronunciation: String,
    pub origin: String,
    pub object: String,
    pub action: String,
    pub property: String,
    pub etc: String,
    pub notes: Vec<String>,
}

impl Record for SesameWord {
    const SCHEMA: Schema = Schema {
        record: "SesameWord",
        fields: &[
            "word",
            "pronunciation",
            "origin",
            "object",
            "action",
            "property",
            "etc",
        ],
        variadic_tail: true,
    };

    fn from_cells(cells: &[String]) -> Self {
        SesameWord {
            word: cell(cells, 0),
            pronunciation: cell(cells, 1),
            origin: cell(cells, 2),
            object: cell(cells, 3),
            action: cell(cells, 4),
            property: cell(cells, 5),
            etc: cell(cells, 6),
            notes: cells.iter().skip(7).cloned().collect(),
        }
    }

    fn word(&self) -> &str {
        &self.word
    }

    fn definitions(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("[객체]", self.object.as_str()),
            ("[동작]", self.action.as_str()),
            ("[속성]", self.property.as_str()),
            ("[기타]", self.etc.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_word_decode_and_body() {
        let word = Word::decode(&row(&[
            "hello", "greeting", "", "to greet", "", "", "", "informal", "ko", "안녕",
        ]))
        .unwrap();
        assert_eq!(word.word, "hello");
        assert_eq!(word.derived_from_word, "안녕");
        assert_eq!(word.body(), "명: greeting\n동: to greet\n비고: informal");
        assert_eq!(word.title(false), "**hello**");
        assert_eq!(word.title(true), "__**hello** (일치)__");
    }

    #[test]
    fn test_decode_rejects_wrong_width() {
        let err = Word::decode(&row(&["hello", "greeting"])).unwrap_err();
        match err {
            DictError::SchemaMismatch {
                record,
                expected,
                found,
            } => {
                assert_eq!(record, "Word");
                assert_eq!(expected, "10");
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(ThravelemehWord::decode(&row(&["a"; 10])).is_err());
        assert!(SesameWord::decode(&row(&["a"; 6])).is_err());
    }

    #[test]
    fn test_thravelemeh_title_and_tags() {
        let word = ThravelemehWord::decode(&row(&[
            "daaf", "house", "", "big", "", "", "", "arch", "old",
        ]))
        .unwrap();
        assert_eq!(word.title(false), "[arch] **daaf**");
        assert_eq!(word.title(true), "__[arch] **daaf** (일치)__");
        assert_eq!(word.body(), "[명] house\n[형] big");
    }

    #[test]
    fn test_sesame_collects_notes_and_has_no_remark() {
        let word = SesameWord::decode(&row(&[
            "sa", "sa:", "root", "thing", "", "red", "misc", "note one", "note two",
        ]))
        .unwrap();
        assert_eq!(word.notes, vec!["note one", "note two"]);
        assert_eq!(word.body(), "[객체] thing\n[속성] red\n[기타] misc");
        assert_eq!(word.title(false), "**sa**");
    }

    #[test]
    fn test_inline_hint() {
        let short = Word::decode(&row(&["a", "b", "", "", "", "", "", "", "", ""])).unwrap();
        assert!(short.to_field(false).inline);
        assert!(!short.to_field(true).inline);

        let long_noun = "x".repeat(INLINE_BODY_LIMIT);
        let long = Word::decode(&row(&["a", long_noun.as_str(), "", "", "", "", "", "", "", ""])).unwrap();
        // "명: " prefix pushes the body past the limit.
        let field = long.to_field(false);
        assert!(field.value.chars().count() > INLINE_BODY_LIMIT);
        assert!(!field.inline);
    }

    #[test]
    fn test_inline_limit_counts_characters_not_bytes() {
        // "명: " plus 60 Hangul syllables is 63 chars but far more than 70 bytes.
        let noun = "가".repeat(60);
        let word = Word::decode(&row(&["a", noun.as_str(), "", "", "", "", "", "", "", ""])).unwrap();
        assert!(word.to_field(false).inline);
    }
}
