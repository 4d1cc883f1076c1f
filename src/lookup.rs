//! Command handlers for `search` and `columns`, plus the rendering shared with
//! the interactive shell.

use std::{io::Write, path::Path};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use log::info;
use serde::Serialize;

use crate::{
    cli::{ColumnsArgs, DatasetArgs, OutputFormat, SearchArgs},
    config::LookupConfig,
    engine::{DatasetSource, LookupEngine, Snapshot},
    io_utils,
    search::{MatchResult, SearchOutcome},
    table,
};

const EXPIRY_LABEL_PREFIX: &str = "Masa Berlaku ";

pub fn execute_search(args: &SearchArgs, config: &LookupConfig) -> Result<()> {
    if args.format == OutputFormat::Table && args.output.is_some() {
        anyhow::bail!("--output requires --format csv or --format json");
    }
    let engine = open_engine(&args.dataset, config)?;
    let snapshot = engine.snapshot();
    let now = reference_now(args.today);
    let outcome = snapshot.search(&args.query);

    let SearchOutcome::Matches(result) = &outcome else {
        println!("{}", outcome_message(&outcome));
        return Ok(());
    };
    info!("{}", outcome_message(&outcome));

    match args.format {
        OutputFormat::Table => {
            print!("{}", render_outcome(&snapshot, &outcome, now, !args.no_color));
        }
        OutputFormat::Csv => write_csv(&snapshot, result, now, args.output.as_deref())?,
        OutputFormat::Json => write_json(&snapshot, result, now, args.output.as_deref())?,
    }
    Ok(())
}

pub fn execute_columns(args: &ColumnsArgs, config: &LookupConfig) -> Result<()> {
    let engine = open_engine(&args.dataset, config)?;
    print!("{}", render_columns(&engine.snapshot()));
    Ok(())
}

pub fn open_engine(args: &DatasetArgs, config: &LookupConfig) -> Result<LookupEngine> {
    let source = DatasetSource::from_config(
        &args.input,
        config,
        args.delimiter,
        args.input_encoding.as_deref(),
    )
    .context("Resolving dataset options")?;
    LookupEngine::open(source).with_context(|| format!("Loading dataset {:?}", args.input))
}

/// Start of `today`, or the current local time when no day is pinned.
pub fn reference_now(today: Option<NaiveDate>) -> NaiveDateTime {
    today
        .map(|day| day.and_time(NaiveTime::MIN))
        .unwrap_or_else(|| Local::now().naive_local())
}

/// The operator-facing sentence for every search outcome.
pub fn outcome_message(outcome: &SearchOutcome<'_>) -> String {
    match outcome {
        SearchOutcome::EmptyQuery => "Enter a name, NIK, or plate number to search.".to_string(),
        SearchOutcome::NoSearchableColumns => {
            "No searchable columns found. Check that the dataset has a NIK, name, or plate number column."
                .to_string()
        }
        SearchOutcome::Matches(result) if result.is_empty() => {
            format!("No results for '{}'.", result.query)
        }
        SearchOutcome::Matches(result) => {
            format!("Found {} result(s) for '{}'.", result.len(), result.query)
        }
    }
}

/// Message line plus, for non-empty matches, the result table.
pub fn render_outcome(
    snapshot: &Snapshot,
    outcome: &SearchOutcome<'_>,
    now: NaiveDateTime,
    color: bool,
) -> String {
    let mut rendered = outcome_message(outcome);
    rendered.push('\n');
    if let SearchOutcome::Matches(result) = outcome
        && !result.is_empty()
    {
        rendered.push_str(&render_matches(snapshot, result, now, color));
    }
    rendered
}

pub fn render_matches(
    snapshot: &Snapshot,
    result: &MatchResult<'_>,
    now: NaiveDateTime,
    color: bool,
) -> String {
    let track_expiry = !snapshot.expiry().is_empty();
    let mut headers = Vec::with_capacity(snapshot.dataset().headers().len() + 1);
    if track_expiry {
        headers.push("status".to_string());
    }
    headers.extend(snapshot.dataset().headers().iter().cloned());

    let mut rows = Vec::with_capacity(result.len());
    let mut flags = Vec::with_capacity(result.len());
    for record in &result.records {
        let expired = snapshot.expired_columns(record, now);
        let mut row = Vec::with_capacity(headers.len());
        if track_expiry {
            row.push(status_label(&expired));
        }
        row.extend(record.values().iter().cloned());
        flags.push(!expired.is_empty());
        rows.push(row);
    }

    if color {
        table::render_highlighted_table(&headers, &rows, &flags)
    } else {
        table::render_table(&headers, &rows)
    }
}

pub fn render_columns(snapshot: &Snapshot) -> String {
    let headers = vec!["#".to_string(), "column".to_string(), "role".to_string()];
    let rows = snapshot
        .dataset()
        .headers()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let role = match snapshot.searchable().role_of(idx) {
                Some(role) => role.to_string(),
                None if snapshot.expiry().contains(idx) => "expiry".to_string(),
                None => String::new(),
            };
            vec![(idx + 1).to_string(), name.clone(), role]
        })
        .collect::<Vec<_>>();
    let mut rendered = table::render_table(&headers, &rows);
    rendered.push_str(&format!(
        "{} row(s) loaded, {} malformed row(s) skipped\n",
        snapshot.dataset().len(),
        snapshot.dataset().skipped_rows()
    ));
    rendered
}

fn status_label(expired: &[&str]) -> String {
    if expired.is_empty() {
        "OK".to_string()
    } else {
        let documents = expired
            .iter()
            .map(|name| name.strip_prefix(EXPIRY_LABEL_PREFIX).unwrap_or(*name))
            .collect::<Vec<_>>();
        format!("EXPIRED: {}", documents.join(", "))
    }
}

fn write_csv(
    snapshot: &Snapshot,
    result: &MatchResult<'_>,
    now: NaiveDateTime,
    output: Option<&Path>,
) -> Result<()> {
    let mut writer = io_utils::open_csv_writer(output, io_utils::LEGACY_DELIMITER)?;
    let mut headers = snapshot.dataset().headers().to_vec();
    headers.push("expired".to_string());
    writer.write_record(&headers).context("Writing CSV headers")?;
    for record in &result.records {
        let mut row = record.values().to_vec();
        row.push(snapshot.is_expired(record, now).to_string());
        writer
            .write_record(&row)
            .with_context(|| format!("Writing row {}", record.position() + 1))?;
    }
    writer.flush().context("Flushing CSV output")?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct JsonMatch<'a> {
    /// 1-based position among the loaded rows; skipped source rows are not counted.
    index: usize,
    expired: bool,
    expired_documents: Vec<&'a str>,
    values: serde_json::Map<String, serde_json::Value>,
}

fn write_json(
    snapshot: &Snapshot,
    result: &MatchResult<'_>,
    now: NaiveDateTime,
    output: Option<&Path>,
) -> Result<()> {
    let headers = snapshot.dataset().headers();
    let matches = result
        .records
        .iter()
        .map(|record| {
            let expired_documents = snapshot.expired_columns(record, now);
            JsonMatch {
                index: record.position() + 1,
                expired: !expired_documents.is_empty(),
                expired_documents,
                values: headers
                    .iter()
                    .cloned()
                    .zip(
                        record
                            .values()
                            .iter()
                            .map(|value| serde_json::Value::String(value.clone())),
                    )
                    .collect(),
            }
        })
        .collect::<Vec<_>>();

    let mut writer = io_utils::open_output(output)?;
    serde_json::to_writer_pretty(&mut writer, &matches).context("Writing JSON output")?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
