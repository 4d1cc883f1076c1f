//! Dataset loading and normalization.
//!
//! A [`Dataset`] is the immutable, text-only table every query runs against.
//! Loading goes through [`load_dataset`]; in-memory data goes through
//! [`Dataset::from_raw`]. Both apply the same rules:
//!
//! - header names are trimmed and internal whitespace runs collapse to one space
//! - blank headers become `<placeholder>: <position>` and duplicates get `.N` suffixes
//! - placeholder columns with no non-empty cell are dropped
//! - cells are trimmed and never coerced, so identifiers keep leading zeros
//! - rows with the wrong field count are skipped and counted
//!
//! Normalizing an already normalized table returns the same table.

use std::{collections::HashSet, fs, path::Path};

use encoding_rs::{Encoding, UTF_8};
use itertools::Itertools;
use log::{debug, info, warn};

use crate::{
    error::{LookupError, Result},
    io_utils,
};

pub const DEFAULT_PLACEHOLDER_PREFIX: &str = "Unnamed";

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Explicit delimiter; `None` sniffs the header line.
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
    pub placeholder_prefix: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: UTF_8,
            placeholder_prefix: DEFAULT_PLACEHOLDER_PREFIX.to_string(),
        }
    }
}

/// One row of the normalized table, aligned with [`Dataset::headers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    position: usize,
    values: Vec<String>,
}

impl Record {
    /// Zero-based row position in the normalized table.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Cell text at `column`, or `None` when the cell is empty or out of range.
    pub fn value(&self, column: usize) -> Option<&str> {
        self.values
            .get(column)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    headers: Vec<String>,
    records: Vec<Record>,
    skipped_rows: usize,
}

impl Dataset {
    pub fn from_raw(headers: Vec<String>, rows: Vec<Vec<String>>, placeholder_prefix: &str) -> Self {
        let width = headers.len();
        let names = unique_header_names(&headers, placeholder_prefix);

        let mut skipped_rows = 0usize;
        let mut kept = Vec::with_capacity(rows.len());
        for row in rows {
            if row.len() != width {
                skipped_rows += 1;
                continue;
            }
            kept.push(row.into_iter().map(trim_cell).collect::<Vec<_>>());
        }

        let retained = names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                !name.starts_with(placeholder_prefix) || kept.iter().any(|row| !row[idx].is_empty())
            })
            .collect::<Vec<_>>();
        let dropped = names
            .iter()
            .zip(&retained)
            .filter(|(_, keep)| !**keep)
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>();
        if !dropped.is_empty() {
            debug!("Dropping empty placeholder column(s): {}", dropped.join(", "));
        }

        let headers = names
            .iter()
            .zip(&retained)
            .filter(|(_, keep)| **keep)
            .map(|(name, _)| name.clone())
            .collect();
        let records = kept
            .into_iter()
            .enumerate()
            .map(|(position, row)| Record {
                position,
                values: row
                    .into_iter()
                    .zip(&retained)
                    .filter(|(_, keep)| **keep)
                    .map(|(value, _)| value)
                    .collect(),
            })
            .collect();

        Self {
            headers,
            records,
            skipped_rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows discarded during loading because they could not be decoded or had
    /// the wrong number of fields.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn get<'a>(&self, record: &'a Record, column: &str) -> Option<&'a str> {
        self.column_index(column).and_then(|idx| record.value(idx))
    }
}

pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    let bytes = fs::read(path)
        .map_err(|err| LookupError::malformed(path, format!("cannot read file: {err}")))?;
    let delimiter = io_utils::resolve_input_delimiter(&bytes, options.delimiter);
    debug!(
        "Reading {:?} with delimiter '{}' and encoding {}",
        path,
        io_utils::printable_delimiter(delimiter),
        options.encoding.name()
    );

    let mut reader = io_utils::open_csv_reader(bytes.as_slice(), delimiter);
    let header_record = reader
        .byte_headers()
        .map_err(|err| LookupError::malformed(path, format!("header row cannot be parsed: {err}")))?
        .clone();
    if header_record.is_empty() {
        return Err(LookupError::malformed(path, "no header row"));
    }
    let mut headers = io_utils::decode_record(&header_record, options.encoding).ok_or_else(|| {
        LookupError::malformed(
            path,
            format!("header row is not valid {}", options.encoding.name()),
        )
    })?;
    if let Some(first) = headers.first_mut()
        && let Some(stripped) = first.strip_prefix('\u{feff}')
    {
        *first = stripped.to_string();
    }

    let mut rows = Vec::new();
    let mut unreadable = 0usize;
    for (idx, record) in reader.byte_records().enumerate() {
        let decoded = record
            .ok()
            .and_then(|record| io_utils::decode_record(&record, options.encoding));
        match decoded {
            Some(row) => rows.push(row),
            None => {
                unreadable += 1;
                debug!("Skipping unreadable row {}", idx + 2);
            }
        }
    }

    let mut dataset = Dataset::from_raw(headers, rows, &options.placeholder_prefix);
    dataset.skipped_rows += unreadable;
    if dataset.skipped_rows > 0 {
        warn!(
            "Skipped {} malformed row(s) while loading {:?}",
            dataset.skipped_rows, path
        );
    }
    info!(
        "Loaded {} row(s) across {} column(s) from {:?}",
        dataset.len(),
        dataset.headers.len(),
        path
    );
    Ok(dataset)
}

/// Trims a header and collapses internal whitespace runs to a single space.
pub fn normalize_header(name: &str) -> String {
    name.split_whitespace().join(" ")
}

fn unique_header_names(headers: &[String], placeholder_prefix: &str) -> Vec<String> {
    let mut seen = HashSet::with_capacity(headers.len());
    headers
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            let mut name = normalize_header(raw);
            if name.is_empty() {
                name = format!("{placeholder_prefix}: {idx}");
            }
            if seen.contains(&name) {
                let base = name.clone();
                let mut suffix = 1usize;
                while seen.contains(&name) {
                    name = format!("{base}.{suffix}");
                    suffix += 1;
                }
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

fn trim_cell(cell: String) -> String {
    let trimmed = cell.trim();
    if trimmed.len() == cell.len() {
        cell
    } else {
        trimmed.to_string()
    }
}
