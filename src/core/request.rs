//! Caller input for one forecasting run.

use crate::core::window::{ForecastAnchor, ForecastWindow};
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;

/// Validated inputs for a single pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    ticker: String,
    start: NaiveDate,
    end: NaiveDate,
    column: Option<String>,
    window: ForecastWindow,
    anchor: ForecastAnchor,
}

impl RunRequest {
    /// Validate caller input.
    ///
    /// The ticker is trimmed and upper-cased; an empty ticker or a date
    /// range with `start >= end` is rejected before any network work.
    pub fn new(
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        window: ForecastWindow,
    ) -> Result<Self> {
        let ticker = normalize_ticker(ticker)?;
        if start >= end {
            return Err(ForecastError::InvalidInput(format!(
                "start date {} must be before end date {}",
                start, end
            )));
        }

        Ok(Self {
            ticker,
            start,
            end,
            column: None,
            window,
            anchor: ForecastAnchor::default(),
        })
    }

    /// Forecast this column instead of the first numeric column.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_anchor(mut self, anchor: ForecastAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive upper bound of the fetch; also the forecast anchor date.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn window(&self) -> &ForecastWindow {
        &self.window
    }

    pub fn anchor(&self) -> ForecastAnchor {
        self.anchor
    }
}

/// Trim and upper-case a ticker symbol, rejecting blanks.
pub fn normalize_ticker(ticker: &str) -> Result<String> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(ForecastError::InvalidInput(
            "please enter a ticker symbol".to_string(),
        ));
    }
    Ok(ticker.to_uppercase())
}
