//! CSV datasets, each tagged with the season named in its URL

use crate::error::{FrameError, IngestError, Result};
use crate::frame::Table;
use crate::ingest::fetch::{Fetch, HttpClient, HttpFetcher};
use crate::types::FetchConfig;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use serde_json::Value;
use std::io::Cursor;
use tracing::{info, warn};

/// Column holding the season extracted from a dataset URL
pub const SEASON_COLUMN: &str = "season";

/// Columns kept from the home-run datasets, in display order
pub const HOME_RUN_COLUMNS: &[&str] = &[
    SEASON_COLUMN,
    "play_id",
    "title",
    "ExitVelocity",
    "LaunchAngle",
    "HitDistance",
    "video",
];

static SEASON_IN_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"/datasets/(\d{4})").unwrap());

/// Four-digit season following `/datasets/` in a dataset URL
pub fn season_from_url(url: &str) -> Option<&str> {
    SEASON_IN_URL
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse a CSV body with a header row into a table
///
/// Column types are inferred from every row. A blank body is an empty
/// table.
pub fn parse_csv(url: &str, body: &str) -> Result<Table> {
    if body.trim().is_empty() {
        return Ok(Table::empty());
    }

    let csv_error = |source: FrameError| IngestError::Csv {
        url: url.to_string(),
        source,
    };

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(Cursor::new(body.as_bytes().to_vec()))
        .finish()
        .map_err(|err| csv_error(err.into()))?;

    Table::from_dataframe(&df).map_err(csv_error)
}

/// Loads CSV datasets into tables
pub struct CsvLoader<F: Fetch> {
    fetcher: F,
}

impl CsvLoader<HttpClient> {
    /// Loader backed by a blocking HTTP client
    pub fn http(config: FetchConfig) -> std::result::Result<Self, reqwest::Error> {
        Ok(CsvLoader::new(HttpFetcher::retrying(config)?))
    }
}

impl<F: Fetch> CsvLoader<F> {
    pub fn new(fetcher: F) -> Self {
        CsvLoader { fetcher }
    }

    /// Fetch and parse one CSV resource
    pub fn fetch(&self, url: &str) -> Result<Table> {
        let response = self.fetcher.get(url)?.error_for_status()?;
        parse_csv(url, &response.body)
    }

    /// Load each URL in turn, tag its rows with the URL's season, and stack
    /// the results
    ///
    /// Any failing URL aborts the whole load. Rows from a URL without a
    /// season get a null season.
    pub fn load_seasons<S: AsRef<str>>(&self, urls: &[S]) -> Result<Table> {
        let mut tables = Vec::with_capacity(urls.len());

        for url in urls {
            let url = url.as_ref();
            let season = match season_from_url(url) {
                Some(season) => Value::from(season),
                None => {
                    warn!(url, "no season in dataset URL");
                    Value::Null
                }
            };

            let table = self.fetch(url)?.with_column(SEASON_COLUMN, season);
            info!(url, rows = table.len(), "loaded CSV");
            tables.push(table);
        }

        Ok(Table::concat(tables))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use crate::ingest::fetch::testing::StaticFetcher;
    use serde_json::json;

    const HR_2016: &str =
        "https://storage.example.test/hackathon/datasets/2016-mlb-homeruns.csv";
    const HR_2024_POST: &str =
        "https://storage.example.test/hackathon/datasets/2024-postseason-mlb-homeruns.csv";

    const BODY_2016: &str = "play_id,title,ExitVelocity,LaunchAngle,HitDistance,video\n\
        a1,\"Ortiz, D. homers (38)\",108.4,27,409,https://video.example.test/a1.mp4\n\
        a2,Trout homers (29),101.2,31,388,https://video.example.test/a2.mp4\n";

    const BODY_2024_POST: &str = "play_id,title,ExitVelocity,HitDistance,video,inning\n\
        560a2f9b,Freeman walk-off grand slam,109.2,409,https://video.example.test/fg.mp4,10\n";

    #[test]
    fn test_season_from_url() {
        assert_eq!(season_from_url(HR_2016), Some("2016"));
        assert_eq!(season_from_url(HR_2024_POST), Some("2024"));
        assert_eq!(season_from_url("https://example.test/files/2016-homeruns.csv"), None);
    }

    #[test]
    fn test_parse_csv() {
        let table = parse_csv(HR_2016, BODY_2016).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.columns(),
            &["play_id", "title", "ExitVelocity", "LaunchAngle", "HitDistance", "video"]
        );
        assert_eq!(table.get(0, "title"), Some(&json!("Ortiz, D. homers (38)")));
        assert_eq!(table.get(0, "ExitVelocity"), Some(&json!(108.4)));
        assert_eq!(table.get(1, "HitDistance"), Some(&json!(388)));

        assert!(parse_csv(HR_2016, "").unwrap().is_empty());
        assert!(parse_csv(HR_2016, " \n").unwrap().is_empty());
    }

    #[test]
    fn test_load_seasons_tags_and_stacks() {
        let fetcher = StaticFetcher::new()
            .with(HR_2016, 200, BODY_2016)
            .with(HR_2024_POST, 200, BODY_2024_POST);

        let table = CsvLoader::new(&fetcher)
            .load_seasons(&[HR_2016, HR_2024_POST])
            .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(fetcher.calls().len(), 2);

        let seasons: Vec<&Value> = table.column(SEASON_COLUMN).unwrap().collect();
        assert_eq!(seasons, vec![&json!("2016"), &json!("2016"), &json!("2024")]);
        assert!(table.has_column("inning"));

        let home_runs = table.project(HOME_RUN_COLUMNS);
        assert_eq!(home_runs.columns(), HOME_RUN_COLUMNS);
        assert_eq!(home_runs.get(2, "play_id"), Some(&json!("560a2f9b")));
        assert_eq!(home_runs.get(2, "LaunchAngle"), Some(&Value::Null));
    }

    #[test]
    fn test_failed_download_aborts() {
        let fetcher = StaticFetcher::new().with(HR_2016, 200, BODY_2016);

        let err = CsvLoader::new(fetcher)
            .load_seasons(&[HR_2016, HR_2024_POST])
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::Network(NetworkError::Status { status: 404, .. })
        ));
        assert_eq!(err.url(), HR_2024_POST);
    }

    #[test]
    fn test_url_without_season_gets_null() {
        let url = "https://example.test/extra.csv";
        let fetcher = StaticFetcher::new().with(url, 200, "play_id\nx\n");

        let table = CsvLoader::new(fetcher).load_seasons(&[url]).unwrap();
        assert_eq!(table.get(0, SEASON_COLUMN), Some(&Value::Null));
    }
}
