//! Expired-document detection.
//!
//! Expiry cells hold day-first dates (`05/03/2024` is 5 March 2024). A record
//! is expired when any parsable expiry date falls strictly before the
//! reference day; blank or unparsable cells never count.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::dataset::Record;

/// Expiry columns of the multi-vehicle layout: car license, car registration,
/// motorcycle license, and registrations for up to three motorcycles.
pub const CANONICAL_EXPIRY_COLUMNS: [&str; 6] = [
    "Masa Berlaku SIM Mobil",
    "Masa Berlaku STNK Mobil ke-1",
    "Masa Berlaku SIM Motor",
    "Masa Berlaku STNK Motor ke-1",
    "Masa Berlaku STNK Motor ke-2",
    "Masa Berlaku STNK Motor ke-3",
];

/// Expiry columns of the single-vehicle layout.
pub const LEGACY_EXPIRY_COLUMNS: [&str; 2] = ["Masa Berlaku SIM", "Masa Berlaku STNK"];

// Years below this are typos (`05/03/202`) and read as no date.
const MIN_YEAR: i32 = 1000;

// Two-digit years come first in both lists: `%Y` also accepts "24" as year 0024.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%y", "%d-%m-%y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d",
    "%d %B %Y", "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%y %H:%M",
    "%d-%m-%y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryColumn {
    pub index: usize,
    pub name: String,
}

/// Expiry columns actually present in a schema, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpiryColumnSet {
    columns: Vec<ExpiryColumn>,
}

impl ExpiryColumnSet {
    pub fn resolve<S: AsRef<str>>(headers: &[String], candidates: &[S]) -> Self {
        let columns = headers
            .iter()
            .enumerate()
            .filter(|(_, header)| candidates.iter().any(|name| name.as_ref() == header.as_str()))
            .map(|(index, header)| ExpiryColumn {
                index,
                name: header.clone(),
            })
            .collect();
        Self { columns }
    }

    pub fn columns(&self) -> &[ExpiryColumn] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.columns.iter().any(|column| column.index == index)
    }
}

/// Parses a day-first date, tolerating a trailing time-of-day component.
pub fn parse_day_first_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|parsed| parsed.date())
        })
        .filter(|date| date.year() >= MIN_YEAR)
}

pub fn is_expired(record: &Record, columns: &ExpiryColumnSet, now: NaiveDateTime) -> bool {
    let today = now.date();
    columns
        .columns
        .iter()
        .any(|column| expired_on(record, column, today))
}

/// Names of the expiry columns of `record` that have already passed.
pub fn expired_columns<'a>(
    record: &Record,
    columns: &'a ExpiryColumnSet,
    now: NaiveDateTime,
) -> Vec<&'a str> {
    let today = now.date();
    columns
        .columns
        .iter()
        .filter(|column| expired_on(record, column, today))
        .map(|column| column.name.as_str())
        .collect()
}

fn expired_on(record: &Record, column: &ExpiryColumn, today: NaiveDate) -> bool {
    record
        .value(column.index)
        .and_then(parse_day_first_date)
        .is_some_and(|date| date < today)
}
