//! Interactive query loop: every input line is a query, `:`-prefixed lines
//! are commands.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{info, warn};

use crate::{
    cli::ShellArgs,
    config::LookupConfig,
    engine::LookupEngine,
    lookup,
    search::SearchOutcome,
};

const PROMPT: &str = "> ";
const HELP: &str = "Type a name, NIK, or plate number and press Enter.
Commands: :columns  show detected columns
          :reload   reload the dataset from disk
          :help     show this help
          :quit     leave the shell";

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    pub today: Option<NaiveDate>,
    pub color: bool,
}

pub fn execute(args: &ShellArgs, config: &LookupConfig) -> Result<()> {
    let engine = lookup::open_engine(&args.dataset, config)?;
    let options = SessionOptions {
        today: args.today,
        color: !args.no_color,
    };
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&engine, stdin.lock(), stdout.lock(), options)
}

pub fn run_session<R, W>(
    engine: &LookupEngine,
    input: R,
    mut output: W,
    options: SessionOptions,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{}", lookup::outcome_message(&SearchOutcome::EmptyQuery))?;
    prompt(&mut output)?;
    let mut queries = 0usize;
    for line in input.lines() {
        let line = line.context("Reading query from input")?;
        match line.trim() {
            ":q" | ":quit" | ":exit" => break,
            ":help" => writeln!(output, "{HELP}")?,
            ":columns" => write!(output, "{}", lookup::render_columns(&engine.snapshot()))?,
            ":reload" => match engine.reload() {
                Ok(snapshot) => writeln!(
                    output,
                    "Reloaded {} row(s) from {:?}.",
                    snapshot.dataset().len(),
                    engine.source().path
                )?,
                Err(err) => {
                    warn!("Reload failed: {err}");
                    writeln!(output, "Reload failed, keeping the previous data: {err}")?;
                }
            },
            query => {
                let snapshot = engine.snapshot();
                let outcome = snapshot.search(query);
                let now = lookup::reference_now(options.today);
                write!(
                    output,
                    "{}",
                    lookup::render_outcome(&snapshot, &outcome, now, options.color)
                )?;
                queries += 1;
            }
        }
        prompt(&mut output)?;
    }
    writeln!(output)?;
    output.flush()?;
    info!("Shell closed after {queries} query(ies)");
    Ok(())
}

fn prompt<W: Write>(output: &mut W) -> Result<()> {
    write!(output, "{PROMPT}")?;
    output.flush()?;
    Ok(())
}
