//! Market data provider boundary.

use crate::core::{RawFrame, RunRequest};
use crate::error::Result;
use chrono::NaiveDate;

/// Date range to download for one ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Upper-cased ticker symbol.
    pub ticker: String,
    /// First calendar day included.
    pub start: NaiveDate,
    /// First calendar day excluded.
    pub end: NaiveDate,
}

impl FetchRequest {
    pub fn new(ticker: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            ticker: ticker.into(),
            start,
            end,
        }
    }
}

impl From<&RunRequest> for FetchRequest {
    fn from(request: &RunRequest) -> Self {
        Self::new(request.ticker(), request.start(), request.end())
    }
}

/// Source of historical daily OHLCV rows.
///
/// Implementations return every row in `[start, end)`. An unknown ticker
/// or an empty range is `EmptyResult`; transport and payload failures are
/// `Provider`. Neither is retried.
pub trait MarketDataProvider: Send + Sync {
    /// Download the rows for a request.
    fn fetch(&self, request: &FetchRequest) -> Result<RawFrame>;

    /// Short provider name for logs.
    fn name(&self) -> &str;
}
