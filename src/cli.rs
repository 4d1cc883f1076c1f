use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

pub use crate::config::parse_delimiter;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Look up vehicle and driver records and flag expired documents",
    long_about = None
)]
pub struct Cli {
    /// Optional YAML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a single query against the dataset
    Search(SearchArgs),
    /// List the dataset columns and the role detected for each
    Columns(ColumnsArgs),
    /// Read queries interactively from stdin, one per line
    Shell(ShellArgs),
}

#[derive(Debug, Clone, Args)]
pub struct DatasetArgs {
    /// Vehicle dataset to load
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Dataset delimiter (',' or ';'); sniffed from the header line when omitted
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the dataset (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    /// Name, NIK, or plate number to look for
    #[arg(short = 'q', long = "query", allow_hyphen_values = true)]
    pub query: String,
    /// Reference day for expiry checks as YYYY-MM-DD (defaults to today)
    #[arg(long, value_parser = parse_day)]
    pub today: Option<NaiveDate>,
    /// Output format for matching rows
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
    /// Write matching rows to this file instead of stdout (csv and json only)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Do not highlight expired rows with ANSI colors
    #[arg(long = "no-color")]
    pub no_color: bool,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
}

#[derive(Debug, Args)]
pub struct ShellArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    /// Reference day for expiry checks as YYYY-MM-DD (defaults to today)
    #[arg(long, value_parser = parse_day)]
    pub today: Option<NaiveDate>,
    /// Do not highlight expired rows with ANSI colors
    #[arg(long = "no-color")]
    pub no_color: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

pub fn parse_day(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|err| format!("Expected a date like 2024-01-31: {err}"))
}
