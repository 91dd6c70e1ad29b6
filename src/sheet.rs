//! Row sources: where dictionary snapshots come from.
//!
//! The live source is the Google Sheets `values.get` endpoint. A JSON
//! snapshot on disk and an in-memory table are provided for offline use
//! and tests.

use crate::error::{DictError, Result};
use crate::models::Row;
use directories_next::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;
use std::future::Future;
use std::path::{Path, PathBuf};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
/// Subdirectory name within user's data directory
pub const DATA_SUBDIR: &str = "conlang-dict";

/// Anything that can produce a full, ordered copy of a dictionary sheet.
pub trait RowSource {
    /// Fetches every row. Called on each reload; must not return partial data.
    fn fetch_rows(&self) -> impl Future<Output = Result<Vec<Row>>> + Send;

    /// Short label for log messages.
    fn describe(&self) -> String;
}

// --- Google Sheets ---

/// Credentials accepted by the Sheets API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetAuth {
    /// Public (link-shared) sheets only.
    ApiKey(String),
    /// OAuth2 access token, e.g. minted for a service account.
    BearerToken(String),
}

/// Reads a range of a spreadsheet through the Sheets REST API.
#[derive(Clone)]
pub struct SheetsSource {
    client: reqwest::Client,
    spreadsheet_id: String,
    range: String,
    auth: SheetAuth,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl SheetsSource {
    pub fn new(spreadsheet_id: impl Into<String>, range: impl Into<String>, auth: SheetAuth) -> Self {
        SheetsSource {
            client: reqwest::Client::new(),
            spreadsheet_id: spreadsheet_id.into(),
            range: range.into(),
            auth,
            base_url: SHEETS_API_BASE.to_string(),
        }
    }

    /// Points the source at a different API root (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn values_url(&self) -> String {
        format!(
            "{}/{}/values/{}",
            self.base_url.trim_end_matches('/'),
            self.spreadsheet_id,
            self.range
        )
    }
}

impl RowSource for SheetsSource {
    async fn fetch_rows(&self) -> Result<Vec<Row>> {
        let url = self.values_url();
        debug!("Fetching sheet values from {}", url);

        let request = self
            .client
            .get(&url)
            .query(&[("majorDimension", "ROWS")]);
        let request = match &self.auth {
            SheetAuth::ApiKey(key) => request.query(&[("key", key.as_str())]),
            SheetAuth::BearerToken(token) => request.bearer_auth(token),
        };

        let body: ValueRange = request.send().await?.error_for_status()?.json().await?;
        let rows = pad_rows(body.values);
        info!(
            "Fetched {} rows from spreadsheet {}",
            rows.len(),
            self.spreadsheet_id
        );
        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("sheet {} ({})", self.spreadsheet_id, self.range)
    }
}

/// Right-pads every row with empty cells up to the widest row.
///
/// The Sheets API omits trailing empty cells; the dictionaries rely on a
/// rectangular table so positional decoding stays aligned.
pub fn pad_rows(mut rows: Vec<Row>) -> Vec<Row> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, String::new());
    }
    rows
}

// --- JSON snapshot on disk ---

/// Reads rows from a JSON file holding an array of string arrays.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RowSource for FileSource {
    async fn fetch_rows(&self) -> Result<Vec<Row>> {
        debug!("Reading snapshot from {:?}", self.path);
        let content = tokio::fs::read_to_string(&self.path).await?;
        let rows: Vec<Row> = serde_json::from_str(&content)?;
        Ok(pad_rows(rows))
    }

    fn describe(&self) -> String {
        format!("file {:?}", self.path)
    }
}

/// Writes rows as a JSON snapshot that `FileSource` can read back.
pub async fn write_snapshot(path: &Path, rows: &[Row]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(rows)?;
    tokio::fs::write(path, json).await?;
    info!("Wrote {} rows to {:?}", rows.len(), path);
    Ok(())
}

/// Default location for a named snapshot, e.g. `main.json`.
pub fn default_snapshot_path(name: &str) -> Result<PathBuf> {
    let proj_dirs =
        ProjectDirs::from("org", "ConlangDict", DATA_SUBDIR).ok_or(DictError::DataDirNotFound)?;
    Ok(proj_dirs.data_dir().join(format!("{}.json", name)))
}

// --- In-memory ---

/// A fixed table, handy for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    rows: Vec<Row>,
}

impl StaticSource {
    pub fn new(rows: Vec<Row>) -> Self {
        StaticSource { rows }
    }
}

impl RowSource for StaticSource {
    async fn fetch_rows(&self) -> Result<Vec<Row>> {
        Ok(self.rows.clone())
    }

    fn describe(&self) -> String {
        format!("static table ({} rows)", self.rows.len())
    }
}
