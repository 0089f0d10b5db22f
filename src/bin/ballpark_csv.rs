//! ballpark-csv: Load season CSV datasets into one table
//!
//! Usage:
//!   # Every home run from the 2016 and 2024 datasets
//!   ballpark-csv --home-runs \
//!     https://storage.googleapis.com/bucket/datasets/2016-mlb-homeruns.csv \
//!     https://storage.googleapis.com/bucket/datasets/2024-mlb-homeruns.csv
//!
//!   # Longest home runs first
//!   ballpark-csv "$HR_2024" --sort-by HitDistance --descending --top 5

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use ballpark::frame::analysis;
use ballpark::frame::{OutputFormat, TableWriter};
use ballpark::ingest::{CsvLoader, HOME_RUN_COLUMNS};
use ballpark::{FetchConfig, Table};
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ballpark-csv")]
#[command(about = "Load season CSV datasets into a table", long_about = None)]
struct Args {
    /// CSV URLs to load, in order; `/datasets/YYYY` in a URL names its season
    #[arg(value_name = "URL", required = true)]
    urls: Vec<String>,

    /// Keep only the home-run columns (season, play_id, title, ..., video)
    #[arg(long, conflicts_with = "select")]
    home_runs: bool,

    /// Comma-separated columns to keep, in order
    #[arg(long)]
    select: Option<String>,

    /// Column to sort rows by (nulls last)
    #[arg(long)]
    sort_by: Option<String>,

    /// Sort in descending order
    #[arg(long, requires = "sort_by")]
    descending: bool,

    /// Keep only the first N rows of the result
    #[arg(long)]
    top: Option<usize>,

    /// Output file (stdout if omitted)
    #[arg(long, short = 'o')]
    output: Option<String>,

    /// Write the table as one JSON document instead of JSON Lines
    #[arg(long)]
    document: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Request timeout in seconds (0 disables the timeout)
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Extra attempts after a transport failure
    #[arg(long, default_value_t = 0)]
    retries: u32,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let config = FetchConfig::default()
        .with_timeout((args.timeout > 0).then(|| Duration::from_secs(args.timeout)))
        .with_retries(args.retries);
    let loader = CsvLoader::http(config).context("Failed to build HTTP client")?;

    let mut table = loader
        .load_seasons(&args.urls)
        .context("Failed to load CSV datasets")?;
    info!(rows = table.len(), columns = table.columns().len(), "load complete");

    if args.home_runs {
        table = table.project(HOME_RUN_COLUMNS);
    }

    if args.select.is_some() || args.sort_by.is_some() || args.top.is_some() {
        let mut df = table.to_dataframe().context("Failed to build data frame")?;
        if let Some(columns) = &args.select {
            let columns: Vec<&str> = columns.split(',').map(|c| c.trim()).collect();
            df = analysis::select(&df, &columns).context("Failed to select columns")?;
        }
        if let Some(column) = &args.sort_by {
            df = analysis::sort_by(&df, column, args.descending)
                .with_context(|| format!("Failed to sort by `{}`", column))?;
        }
        if let Some(n) = args.top {
            df = analysis::head(&df, n);
        }
        table = Table::from_dataframe(&df).context("Failed to read data frame rows")?;
    }

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    let format = if args.document {
        OutputFormat::Document
    } else {
        OutputFormat::JsonLines
    };
    let mut writer = TableWriter::new(sink).with_format(format).pretty(args.pretty);
    writer.write_table(&table)?;
    writer.flush()?;

    Ok(())
}

fn init_logging() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}
