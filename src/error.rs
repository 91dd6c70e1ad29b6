use thiserror::Error;

/// Custom Result type for this crate.
pub type Result<T> = std::result::Result<T, DictError>;

/// Enum representing all possible errors in the conlang_dict library.
#[derive(Error, Debug)]
pub enum DictError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Row does not fit {record} schema: expected {expected} columns, found {found}")]
    SchemaMismatch {
        record: &'static str,
        expected: String,
        found: usize,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data directory not found or could not be determined")]
    DataDirNotFound,

    #[error("Dictionary has no entries")]
    EmptyDictionary,
}
