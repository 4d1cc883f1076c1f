//! Lookup configuration: built-in defaults, an optional YAML file, and CLI
//! overrides, applied in that order.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    columns::{DEFAULT_NAME_PATTERN, DEFAULT_PLATE_PATTERN},
    dataset::DEFAULT_PLACEHOLDER_PREFIX,
    error::{LookupError, Result},
    expiry::{CANONICAL_EXPIRY_COLUMNS, LEGACY_EXPIRY_COLUMNS},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LookupConfig {
    /// `,` or `;`; sniffed from the header line when absent.
    pub delimiter: Option<String>,
    pub input_encoding: Option<String>,
    pub identity_columns: Vec<String>,
    pub name_pattern: String,
    pub plate_pattern: String,
    pub placeholder_prefix: String,
    pub expiry_columns: Vec<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            input_encoding: None,
            identity_columns: vec!["NIK".to_string()],
            name_pattern: DEFAULT_NAME_PATTERN.to_string(),
            plate_pattern: DEFAULT_PLATE_PATTERN.to_string(),
            placeholder_prefix: DEFAULT_PLACEHOLDER_PREFIX.to_string(),
            expiry_columns: CANONICAL_EXPIRY_COLUMNS
                .iter()
                .chain(LEGACY_EXPIRY_COLUMNS.iter())
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl LookupConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| {
            LookupError::Config(format!("Reading config file {path:?} failed: {err}"))
        })?;
        Self::from_yaml(&raw)
            .map_err(|err| LookupError::Config(format!("Parsing config file {path:?}: {err}")))
    }

    pub fn from_yaml(raw: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn delimiter_byte(&self) -> Result<Option<u8>> {
        self.delimiter
            .as_deref()
            .map(|value| parse_delimiter(value).map_err(LookupError::Config))
            .transpose()
    }
}

/// Accepts the two dataset delimiters by symbol or by name.
pub fn parse_delimiter(value: &str) -> std::result::Result<u8, String> {
    match value.trim() {
        "," | "comma" => Ok(b','),
        ";" | "semicolon" => Ok(b';'),
        "" => Err("Delimiter cannot be empty".to_string()),
        other => Err(format!(
            "Unsupported delimiter '{other}' (expected ',' or ';')"
        )),
    }
}
