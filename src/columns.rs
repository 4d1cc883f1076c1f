//! Search column detection.
//!
//! [`ColumnRules`] is the rule table deciding which schema columns a free-text
//! query runs against: the identity column (exact name), the first column whose
//! name carries the word "name" (or Indonesian "nama"), and every plate-number
//! column.

use std::fmt;

use log::debug;
use regex::Regex;

use crate::{
    config::LookupConfig,
    error::{LookupError, Result},
};

pub const DEFAULT_NAME_PATTERN: &str = r"(?i)\b(?:name|nama)\b";
pub const DEFAULT_PLATE_PATTERN: &str =
    r"(?i)\bplate?\d*\b|\bno(?:mor|mer)?[\s._\-]*plate?\d*\b|\bno(?:mor)?[\s._\-]*pol(?:isi)?\b";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Identity,
    Name,
    Plate,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnRole::Identity => "identity",
            ColumnRole::Name => "name",
            ColumnRole::Plate => "plate",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchColumn {
    pub index: usize,
    pub name: String,
    pub role: ColumnRole,
}

/// Columns eligible for free-text matching, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchableColumnSet {
    columns: Vec<SearchColumn>,
}

impl SearchableColumnSet {
    pub fn columns(&self) -> &[SearchColumn] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn role_of(&self, index: usize) -> Option<ColumnRole> {
        self.columns
            .iter()
            .find(|column| column.index == index)
            .map(|column| column.role)
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.columns.iter().map(|column| column.index)
    }
}

#[derive(Debug, Clone)]
pub struct ColumnRules {
    identity: Vec<String>,
    name: Regex,
    plate: Regex,
}

impl Default for ColumnRules {
    fn default() -> Self {
        Self {
            identity: vec!["NIK".to_string()],
            name: Regex::new(DEFAULT_NAME_PATTERN).expect("default name pattern compiles"),
            plate: Regex::new(DEFAULT_PLATE_PATTERN).expect("default plate pattern compiles"),
        }
    }
}

impl ColumnRules {
    pub fn new(identity: Vec<String>, name_pattern: &str, plate_pattern: &str) -> Result<Self> {
        Ok(Self {
            identity,
            name: compile("name_pattern", name_pattern)?,
            plate: compile("plate_pattern", plate_pattern)?,
        })
    }

    pub fn from_config(config: &LookupConfig) -> Result<Self> {
        Self::new(
            config.identity_columns.clone(),
            &config.name_pattern,
            &config.plate_pattern,
        )
    }

    pub fn is_identity(&self, column: &str) -> bool {
        self.identity.iter().any(|name| name == column)
    }

    pub fn is_name(&self, column: &str) -> bool {
        self.name.is_match(column)
    }

    pub fn is_plate(&self, column: &str) -> bool {
        self.plate.is_match(column)
    }

    /// Applies the rule table to a schema. Identity wins over plate, plate wins
    /// over name; only the first name candidate is taken.
    pub fn searchable_columns(&self, headers: &[String]) -> SearchableColumnSet {
        let mut name_taken = false;
        let mut columns = Vec::new();
        for (index, header) in headers.iter().enumerate() {
            let role = if self.is_identity(header) {
                Some(ColumnRole::Identity)
            } else if self.is_plate(header) {
                Some(ColumnRole::Plate)
            } else if !name_taken && self.is_name(header) {
                name_taken = true;
                Some(ColumnRole::Name)
            } else {
                None
            };
            if let Some(role) = role {
                debug!("Column '{header}' searchable as {role}");
                columns.push(SearchColumn {
                    index,
                    name: header.clone(),
                    role,
                });
            }
        }
        SearchableColumnSet { columns }
    }
}

fn compile(key: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|err| LookupError::Config(format!("Invalid {key} '{pattern}': {err}")))
}
