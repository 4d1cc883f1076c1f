//! Free-text search over the searchable columns of a [`Dataset`].
//!
//! Query and cell text are both reduced to their normalized form (uppercase
//! ASCII letters and digits only) and compared by literal substring, so
//! `"b 1234-xyz"` finds `B1234XYZ`.

use log::debug;

use crate::{
    columns::SearchableColumnSet,
    dataset::{Dataset, Record},
};

/// Uppercases `value` and keeps only ASCII letters and digits.
pub fn normalize_text(value: &str) -> String {
    value
        .chars()
        .flat_map(char::to_uppercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult<'a> {
    pub query: String,
    pub normalized_query: String,
    pub records: Vec<&'a Record>,
}

impl MatchResult<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<'a> {
    /// Nothing to search for yet.
    EmptyQuery,
    /// The schema has no identity, name, or plate column.
    NoSearchableColumns,
    Matches(MatchResult<'a>),
}

pub fn search<'a>(
    dataset: &'a Dataset,
    columns: &SearchableColumnSet,
    query: &str,
) -> SearchOutcome<'a> {
    let trimmed = query.trim();
    let normalized_query = normalize_text(trimmed);
    if normalized_query.is_empty() {
        return SearchOutcome::EmptyQuery;
    }
    if columns.is_empty() {
        return SearchOutcome::NoSearchableColumns;
    }
    debug!("Searching for '{normalized_query}' across {} column(s)", columns.len());

    let records = dataset
        .records()
        .iter()
        .filter(|record| record_matches(record, columns, &normalized_query))
        .collect();
    SearchOutcome::Matches(MatchResult {
        query: trimmed.to_string(),
        normalized_query,
        records,
    })
}

/// True when any searchable cell of `record` contains `normalized_query`.
pub fn record_matches(record: &Record, columns: &SearchableColumnSet, normalized_query: &str) -> bool {
    columns.indices().any(|index| {
        record
            .value(index)
            .is_some_and(|value| normalize_text(value).contains(normalized_query))
    })
}
