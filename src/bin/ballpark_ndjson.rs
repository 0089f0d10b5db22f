//! ballpark-ndjson: Load newline-delimited JSON datasets into a table
//!
//! Usage:
//!   # One file, rows to stdout as JSON Lines
//!   ballpark-ndjson https://storage.googleapis.com/bucket/fan-favs-follows.json
//!
//!   # Every shard of a sharded dataset
//!   ballpark-ndjson --shards 'https://storage.googleapis.com/bucket/captions-*.json' --count 13
//!
//!   # Most followed teams
//!   ballpark-ndjson fans.json --explode followed_team_ids --count-by followed_team_ids --top 10
//!
//!   # Captions written per day
//!   ballpark-ndjson --shards "$CAPTIONS" --count 13 --date-only write_date --count-by write_date_only

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{bail, Context, Result};
use ballpark::frame::analysis;
use ballpark::frame::{OutputFormat, TableWriter};
use ballpark::ingest::{expand_shards, LineDelimitedLoader};
use ballpark::{FetchConfig, Table};
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ballpark-ndjson")]
#[command(about = "Load newline-delimited JSON into a table", long_about = None)]
struct Args {
    /// URLs to load, in order
    #[arg(value_name = "URL", required_unless_present = "shards")]
    urls: Vec<String>,

    /// URL pattern with `*` standing for a zero-padded shard index
    #[arg(long, conflicts_with = "urls")]
    shards: Option<String>,

    /// Number of shards to expand the pattern into (default: 1)
    #[arg(long, requires = "shards")]
    count: Option<usize>,

    /// Array column to explode into one row per element
    #[arg(long)]
    explode: Option<String>,

    /// Timestamp column to add a `<COLUMN>_only` date column for
    #[arg(long, value_name = "COLUMN")]
    date_only: Option<String>,

    /// Comma-separated columns to count distinct values of
    #[arg(long)]
    count_by: Option<String>,

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
        .with_timeout(timeout_from_secs(args.timeout))
        .with_retries(args.retries);
    let loader = LineDelimitedLoader::http(config).context("Failed to build HTTP client")?;

    let urls = match &args.shards {
        Some(pattern) => expand_shards(pattern, args.count.unwrap_or(1)),
        None => args.urls.clone(),
    };

    let report = loader.load_shards(&urls);
    if !report.failed.is_empty() && report.failed.len() == urls.len() {
        bail!("all {} requested URLs failed to load", urls.len());
    }
    info!(
        rows = report.table.len(),
        failed = report.failed.len(),
        skipped_lines = report.skipped_lines,
        "load complete"
    );

    let mut table = report.table;
    let reshaping = args.explode.is_some()
        || args.date_only.is_some()
        || args.count_by.is_some()
        || args.top.is_some();
    if reshaping {
        let mut df = table.to_dataframe().context("Failed to build data frame")?;
        if let Some(column) = &args.explode {
            df = analysis::explode(&df, column)
                .with_context(|| format!("Failed to explode `{}`", column))?;
        }
        if let Some(column) = &args.date_only {
            df = analysis::truncate_to_date(&df, column, &format!("{}_only", column))
                .with_context(|| format!("Failed to take the date of `{}`", column))?;
        }
        if let Some(columns) = &args.count_by {
            let columns: Vec<&str> = columns.split(',').map(|c| c.trim()).collect();
            df = analysis::value_counts(&df, &columns).context("Failed to count values")?;
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

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
