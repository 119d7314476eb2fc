//! Yahoo Finance data fetcher
//!
//! Fetches historical daily bars from the v8 chart API over blocking HTTP.
//!
//! # Example
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use ticker_forecast::config::ProviderConfig;
//! use ticker_forecast::data::{FetchRequest, MarketDataProvider, YahooProvider};
//!
//! let provider = YahooProvider::new(&ProviderConfig::default()).unwrap();
//! let request = FetchRequest::new(
//!     "AAPL",
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
//! );
//! let frame = provider.fetch(&request).unwrap();
//! println!("Got {} rows", frame.len());
//! ```

use super::provider::{FetchRequest, MarketDataProvider};
use crate::config::ProviderConfig;
use crate::core::{ColumnLabel, RawColumn, RawFrame};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate};
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

/// Chart endpoint of the Yahoo Finance API.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Browser-like user agent; the API rejects unknown clients.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// OHLCV fields in the column order the provider emits.
pub const FIELDS: [&str; 5] = ["Close", "High", "Low", "Open", "Volume"];

/// Yahoo Finance API response structures
#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: Meta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

impl QuoteData {
    fn fields(&self) -> [&[Option<f64>]; 5] {
        [&self.close, &self.high, &self.low, &self.open, &self.volume]
    }
}

/// Yahoo Finance client
#[derive(Debug, Clone)]
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: Url,
}

impl YahooProvider {
    /// Build a client with the configured user agent and request timeout.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ForecastError::Provider(e.to_string()))?;

        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| ForecastError::Provider(format!("invalid base url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ForecastError::Provider(format!(
                "invalid base url: {base_url}"
            )));
        }

        Ok(Self { client, base_url })
    }

    /// Build the API URL; the ticker is one percent-encoded path segment.
    pub fn chart_url(&self, request: &FetchRequest) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&request.ticker);
        }
        url.set_query(None);
        url.query_pairs_mut()
            .append_pair("period1", &unix_midnight(request.start).to_string())
            .append_pair("period2", &unix_midnight(request.end).to_string())
            .append_pair("interval", "1d")
            .append_pair("events", "history");
        url
    }
}

impl MarketDataProvider for YahooProvider {
    fn fetch(&self, request: &FetchRequest) -> Result<RawFrame> {
        let url = self.chart_url(request);
        tracing::debug!(%url, "requesting chart");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ForecastError::Provider(format!("request failed: {e}")))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ForecastError::Provider(format!("reading response failed: {e}")))?;

        // Unknown tickers come back as 404 with a JSON error body.
        match parse_response(&request.ticker, &body) {
            Err(ForecastError::Provider(msg)) if !status.is_success() => {
                Err(ForecastError::Provider(format!("HTTP {status}: {msg}")))
            }
            other => other,
        }
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

/// Parse a chart API response body into a raw frame.
///
/// Columns carry two-level labels `[field, ticker]`. Rows where every
/// field is missing are dropped; partially missing rows keep `NaN`.
pub fn parse_response(ticker: &str, body: &str) -> Result<RawFrame> {
    let response: YahooResponse = serde_json::from_str(body)
        .map_err(|e| ForecastError::Provider(format!("malformed chart response: {e}")))?;

    let empty = || ForecastError::EmptyResult {
        ticker: ticker.to_string(),
    };

    if let Some(error) = response.chart.error {
        if error.code.eq_ignore_ascii_case("Not Found") {
            return Err(empty());
        }
        return Err(ForecastError::Provider(format!(
            "{}: {}",
            error.code, error.description
        )));
    }

    let data = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(empty)?;
    let timestamps = data.timestamp.unwrap_or_default();
    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
    let fields = quote.fields();

    let mut index = Vec::with_capacity(timestamps.len());
    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(timestamps.len()); FIELDS.len()];
    let mut dropped = 0usize;

    for (i, &ts) in timestamps.iter().enumerate() {
        let row: Vec<Option<f64>> = fields
            .iter()
            .map(|field| field.get(i).copied().flatten())
            .collect();
        if row.iter().all(Option::is_none) {
            dropped += 1;
            continue;
        }
        let date = local_date(ts, data.meta.gmtoffset).ok_or_else(|| {
            ForecastError::Provider(format!("timestamp {ts} out of range"))
        })?;
        index.push(date);
        for (column, value) in columns.iter_mut().zip(row) {
            column.push(value.unwrap_or(f64::NAN));
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, "dropped rows with no quote data");
    }
    if index.is_empty() {
        return Err(empty());
    }

    let columns = FIELDS
        .iter()
        .zip(columns)
        .map(|(field, values)| RawColumn::new(ColumnLabel::hierarchical([*field, ticker]), values))
        .collect();
    RawFrame::new(ticker, index, columns)
}

/// Calendar date at the exchange for a Unix timestamp.
fn local_date(timestamp: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp + gmtoffset, 0).map(|dt| dt.date_naive())
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}
