//! ballpark-normalize: Flatten one JSON endpoint into a table
//!
//! Usage:
//!   # All teams, nested fields joined with `_`
//!   ballpark-normalize 'https://statsapi.mlb.com/api/v1/teams?sportId=1' --unwrap-key teams
//!
//!   # One player, whole document, dotted columns
//!   ballpark-normalize https://statsapi.mlb.com/api/v1/people/660271/ --separator .
//!
//!   # Just a few columns
//!   ballpark-normalize "$URL" --unwrap-key people --select id,nameFirstLast

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use ballpark::frame::analysis;
use ballpark::frame::{OutputFormat, TableWriter};
use ballpark::{EndpointNormalizer, FetchConfig, FlattenConfig, Table};
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ballpark-normalize")]
#[command(about = "Flatten a JSON endpoint into a table", long_about = None)]
struct Args {
    /// Endpoint URL
    #[arg(value_name = "URL")]
    url: String,

    /// Top-level field holding the records (whole document if omitted)
    #[arg(long)]
    unwrap_key: Option<String>,

    /// Separator joining nested key names
    #[arg(long, default_value = "_")]
    separator: String,

    /// Maximum object depth to flatten (unlimited if omitted)
    #[arg(long)]
    max_level: Option<usize>,

    /// Comma-separated columns to keep, in order
    #[arg(long)]
    select: Option<String>,

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

    let fetch = FetchConfig::default()
        .with_timeout((args.timeout > 0).then(|| Duration::from_secs(args.timeout)))
        .with_retries(args.retries);
    let flatten = FlattenConfig::default()
        .with_separator(args.separator.clone())
        .with_max_level(args.max_level);

    let normalizer =
        EndpointNormalizer::http(fetch, flatten).context("Failed to build HTTP client")?;
    let mut table = normalizer
        .normalize(&args.url, args.unwrap_key.as_deref())
        .with_context(|| format!("Failed to normalize {}", args.url))?;
    info!(url = %args.url, rows = table.len(), columns = table.columns().len(), "normalized");

    if let Some(columns) = &args.select {
        let columns: Vec<&str> = columns.split(',').map(|c| c.trim()).collect();
        let df = table.to_dataframe().context("Failed to build data frame")?;
        let df = analysis::select(&df, &columns).context("Failed to select columns")?;
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
