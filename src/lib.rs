//! # ticker-forecast
//!
//! Daily stock price forecasting with a seasonal ARIMA model.
//!
//! A run downloads daily OHLCV bars for one ticker, normalizes them into a
//! date-indexed frame, checks the chosen column for stationarity, splits it
//! into trend, seasonal and residual parts, fits a SARIMA model by
//! conditional sum of squares and forecasts a dated window past the data.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use ticker_forecast::prelude::*;
//! use ticker_forecast::config::ProviderConfig;
//! use ticker_forecast::data::YahooProvider;
//!
//! let provider = Arc::new(YahooProvider::new(&ProviderConfig::default()).unwrap());
//! let pipeline = Pipeline::new(provider, PipelineConfig::default());
//! let request = RunRequest::new(
//!     "aapl",
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 3, 16).unwrap(),
//!     ForecastWindow::reference(2, 1, 2, 12, 10).unwrap(),
//! )
//! .unwrap();
//!
//! let report = pipeline.run(&request).unwrap();
//! for (date, value) in report.predictions.rows() {
//!     println!("{date}  {value:.2}");
//! }
//! ```

#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod seasonality;
pub mod utils;
pub mod validation;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{
        ForecastAnchor, ForecastWindow, PredictionFrame, RunRequest, SelectedSeries,
        TimeSeriesFrame,
    };
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::{FittedModel, SarimaxSpec};
    pub use crate::pipeline::{Pipeline, PipelineConfig, RunReport};
}
