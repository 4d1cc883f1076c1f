//! I/O utilities for dataset reading, result writing, encoding, and delimiter
//! resolution.
//!
//! - **Delimiter resolution**: the two recognized dataset delimiters are `,`
//!   (legacy exports) and `;` (multi-vehicle exports). Without an explicit
//!   choice the header line is sniffed.
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8.
//! - **Reader/writer construction**: `open_csv_reader` is flexible so rows with
//!   the wrong field count reach the normalizer, which discards them.

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8};

use crate::error::LookupError;

pub const LEGACY_DELIMITER: u8 = b',';
pub const MULTI_VEHICLE_DELIMITER: u8 = b';';

pub fn resolve_encoding(label: Option<&str>) -> crate::error::Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| LookupError::Config(format!("Unknown encoding '{value}'")))
    } else {
        Ok(UTF_8)
    }
}

/// Picks the configured delimiter, or sniffs the first line of `sample`.
///
/// Sniffing counts unquoted `;` and `,` in the header line; semicolons win
/// only when they outnumber commas.
pub fn resolve_input_delimiter(sample: &[u8], provided: Option<u8>) -> u8 {
    if let Some(delimiter) = provided {
        return delimiter;
    }
    let mut in_quotes = false;
    let (mut commas, mut semicolons) = (0usize, 0usize);
    for byte in sample {
        match byte {
            b'"' => in_quotes = !in_quotes,
            b'\n' | b'\r' if !in_quotes => break,
            b',' if !in_quotes => commas += 1,
            b';' if !in_quotes => semicolons += 1,
            _ => {}
        }
    }
    if semicolons > commas {
        MULTI_VEHICLE_DELIMITER
    } else {
        LEGACY_DELIMITER
    }
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

/// Buffered file writer for `path`, or stdout when no path is given.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        None => Box::new(std::io::stdout()),
    })
}

pub fn open_csv_writer(path: Option<&Path>, delimiter: u8) -> Result<csv::Writer<Box<dyn Write>>> {
    let writer = open_output(path)?;
    let mut builder = csv::WriterBuilder::new();
    builder.delimiter(delimiter).double_quote(true);
    Ok(builder.from_writer(writer))
}

/// Decodes one field, returning `None` when the bytes are invalid for `encoding`.
pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Option<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
