//! datamap command-line driver
//!
//! Pushes JSON rows through a field map declared in JSON and prints the
//! result, one JSON document per line.
//!
//! Usage:
//!   datamap --map users.json --input rows.json --mode roundtrip
//!
//! Conversion warnings are logged to stderr; stdout carries only data.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use datamap_cli::{Mode, load_map, process, read_rows, resolve_key};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "datamap")]
#[command(about = "Convert rows through a datamap field map")]
struct Args {
    /// Map definition (JSON)
    #[arg(short, long)]
    map: PathBuf,

    /// Input rows: a JSON array of objects, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    input: PathBuf,

    /// Import rows as typed records, or import and export them again
    #[arg(long, value_enum, default_value = "import")]
    mode: Mode,

    /// Passphrase for encrypted fields (ignored without --key-salt)
    #[arg(long, env = "DATAMAP_KEY", hide_env_values = true)]
    key_passphrase: Option<String>,

    /// Key derivation salt (32 hex digits)
    #[arg(long)]
    key_salt: Option<String>,

    /// Fail on columns the map does not declare
    #[arg(long)]
    strict: bool,

    /// Exit with status 2 if any conversion warning occurred
    #[arg(long)]
    deny_warnings: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn run(args: &Args) -> Result<usize> {
    let key = resolve_key(args.key_passphrase.as_deref(), args.key_salt.as_deref())?;
    let map = load_map(&args.map, key, args.strict)?;

    let rows = if args.input.as_os_str() == "-" {
        read_rows(io::stdin().lock())?
    } else {
        let file = std::fs::File::open(&args.input)
            .with_context(|| format!("failed to open {}", args.input.display()))?;
        read_rows(file)?
    };

    let outcome = process(&map, &rows, args.mode)?;

    let mut out = BufWriter::new(io::stdout().lock());
    for row in &outcome.rows {
        serde_json::to_writer(&mut out, row)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    info!(rows = outcome.rows.len(), warnings = outcome.warnings, "Done");
    Ok(outcome.warnings)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let warnings = run(&args)?;
    if args.deny_warnings && warnings > 0 {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}
