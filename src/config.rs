//! Process configuration resolved from `CONLANG_DICT_*` environment variables.

use crate::cache::{HOURLY, WEEKLY};
use crate::error::{DictError, Result};
use crate::sheet::SheetAuth;
use std::env;
use std::time::Duration;

const ENV_PREFIX: &str = "CONLANG_DICT_";

/// Which dictionary sheet to work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum DictionaryKind {
    /// The main dictionary.
    Main,
    /// The Thravelemeh dictionary.
    Thravelemeh,
    /// The object/action/property vocabulary.
    Sesame,
}

impl DictionaryKind {
    pub fn name(self) -> &'static str {
        match self {
            DictionaryKind::Main => "main",
            DictionaryKind::Thravelemeh => "thravelemeh",
            DictionaryKind::Sesame => "sesame",
        }
    }

    /// Built-in reload cadence.
    pub fn default_threshold(self) -> Duration {
        match self {
            DictionaryKind::Main | DictionaryKind::Sesame => WEEKLY,
            DictionaryKind::Thravelemeh => HOURLY,
        }
    }

    fn env_key(self) -> String {
        self.name().to_uppercase()
    }
}

impl std::fmt::Display for DictionaryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub main_sheet: Option<String>,
    pub thravelemeh_sheet: Option<String>,
    pub sesame_sheet: Option<String>,
    /// A1 range or sheet name to read, `Sheet1` by default.
    pub range: String,
    pub auth: Option<SheetAuth>,
    /// Per-dictionary reload threshold overrides, in seconds.
    pub main_reload_secs: Option<u64>,
    pub thravelemeh_reload_secs: Option<u64>,
    pub sesame_reload_secs: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup (the environment, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| {
            lookup(&format!("{}{}", ENV_PREFIX, name)).filter(|v| !v.trim().is_empty())
        };
        let get_secs = |name: &str| -> Result<Option<u64>> {
            get(name)
                .map(|v| {
                    v.trim().parse::<u64>().map_err(|_| {
                        DictError::Config(format!("{}{} must be whole seconds, got {:?}", ENV_PREFIX, name, v))
                    })
                })
                .transpose()
        };

        let auth = match (get("ACCESS_TOKEN"), get("API_KEY")) {
            (Some(token), _) => Some(SheetAuth::BearerToken(token)),
            (None, Some(key)) => Some(SheetAuth::ApiKey(key)),
            (None, None) => None,
        };

        Ok(Config {
            main_sheet: get("MAIN_SHEET"),
            thravelemeh_sheet: get("THRAVELEMEH_SHEET"),
            sesame_sheet: get("SESAME_SHEET"),
            range: get("RANGE").unwrap_or_else(|| "Sheet1".to_string()),
            auth,
            main_reload_secs: get_secs("MAIN_RELOAD_SECS")?,
            thravelemeh_reload_secs: get_secs("THRAVELEMEH_RELOAD_SECS")?,
            sesame_reload_secs: get_secs("SESAME_RELOAD_SECS")?,
        })
    }

    /// Spreadsheet id for `kind`, or a config error naming the missing variable.
    pub fn sheet_id(&self, kind: DictionaryKind) -> Result<&str> {
        let id = match kind {
            DictionaryKind::Main => &self.main_sheet,
            DictionaryKind::Thravelemeh => &self.thravelemeh_sheet,
            DictionaryKind::Sesame => &self.sesame_sheet,
        };
        id.as_deref().ok_or_else(|| {
            DictError::Config(format!(
                "no spreadsheet configured for the {} dictionary (set {}{}_SHEET)",
                kind,
                ENV_PREFIX,
                kind.env_key()
            ))
        })
    }

    pub fn auth(&self) -> Result<&SheetAuth> {
        self.auth.as_ref().ok_or_else(|| {
            DictError::Config(format!(
                "no Sheets credentials (set {p}API_KEY or {p}ACCESS_TOKEN)",
                p = ENV_PREFIX
            ))
        })
    }

    /// Reload threshold for `kind`, honouring overrides.
    pub fn threshold(&self, kind: DictionaryKind) -> Duration {
        let secs = match kind {
            DictionaryKind::Main => self.main_reload_secs,
            DictionaryKind::Thravelemeh => self.thravelemeh_reload_secs,
            DictionaryKind::Sesame => self.sesame_reload_secs,
        };
        secs.map(Duration::from_secs)
            .unwrap_or_else(|| kind.default_threshold())
    }
}
