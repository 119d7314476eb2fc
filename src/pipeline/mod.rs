//! End-to-end forecasting run.
//!
//! validate → fetch → normalize → select → stationarity → decompose → fit →
//! forecast. The first failing stage ends the run; nothing partial is
//! returned.

mod worker;

pub use worker::run_blocking;

use crate::core::{
    forecast_window, normalize, PredictionFrame, RunRequest, SelectedSeries, TimeSeriesFrame,
};
use crate::data::{FetchRequest, MarketDataProvider};
use crate::error::{ForecastError, Result};
use crate::models::sarimax::{FitOptions, FittedSarimax, ModelSummary, SarimaxSpec};
use crate::seasonality::{seasonal_decompose, Decomposition, DEFAULT_PERIOD};
use crate::validation::{check_stationarity, StationarityReport};
use std::sync::Arc;
use std::time::Duration;

/// Settings that shape a run but are not part of the caller's request.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Time budget for the data download.
    pub fetch_timeout: Option<Duration>,
    /// Time budget for the model fit.
    pub fit_timeout: Option<Duration>,
    /// Period of the additive decomposition.
    pub decomposition_period: usize,
    /// Estimate a mean for the differenced series.
    pub include_constant: bool,
    pub fit_options: FitOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Some(Duration::from_secs(30)),
            fit_timeout: None,
            decomposition_period: DEFAULT_PERIOD,
            include_constant: false,
            fit_options: FitOptions::default(),
        }
    }
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub request: RunRequest,
    /// Normalized provider data.
    pub frame: TimeSeriesFrame,
    /// The forecast column, missing values removed.
    pub series: SelectedSeries,
    pub stationarity: StationarityReport,
    pub decomposition: Decomposition,
    pub model: FittedSarimax,
    pub summary: ModelSummary,
    pub predictions: PredictionFrame,
}

/// Runs requests against one market data provider.
#[derive(Clone)]
pub struct Pipeline {
    provider: Arc<dyn MarketDataProvider>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: PipelineConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Download and normalize the data for a request.
    pub fn fetch(&self, request: &RunRequest) -> Result<TimeSeriesFrame> {
        let fetch = FetchRequest::from(request);
        tracing::info!(
            provider = self.provider.name(),
            ticker = %fetch.ticker,
            start = %fetch.start,
            end = %fetch.end,
            "fetching data"
        );

        let provider = Arc::clone(&self.provider);
        let raw = run_blocking("fetch", self.config.fetch_timeout, move || {
            provider.fetch(&fetch)
        })?;

        let frame = normalize(raw)?;
        tracing::info!(
            rows = frame.len(),
            columns = ?frame.value_columns(),
            "data normalized"
        );
        Ok(frame)
    }

    /// Run every stage for a request.
    pub fn run(&self, request: &RunRequest) -> Result<RunReport> {
        let frame = self.fetch(request)?;
        self.analyze(request, frame)
    }

    /// Run the stages after acquisition on an already normalized frame.
    pub fn analyze(&self, request: &RunRequest, frame: TimeSeriesFrame) -> Result<RunReport> {
        let series = select_column(&frame, request.column())?;
        let values = series.values().to_vec();

        let stationarity = check_stationarity(&values)?;
        tracing::info!(
            statistic = stationarity.statistic,
            p_value = stationarity.p_value,
            stationary = stationarity.is_stationary,
            "stationarity checked"
        );

        let decomposition = seasonal_decompose(&values, self.config.decomposition_period)?;
        tracing::info!(period = decomposition.period, "series decomposed");

        let spec = SarimaxSpec::from_window(request.window())
            .with_constant(self.config.include_constant)
            .with_options(self.config.fit_options);
        tracing::info!(model = %spec.label(), n = values.len(), "fitting model");
        let model = run_blocking("fit", self.config.fit_timeout, move || spec.fit(&values))?;
        tracing::info!(
            iterations = model.iterations(),
            aic = model.aic(),
            "model fitted"
        );

        let predictions = forecast_window(
            &model,
            request.window().horizon(),
            request.end(),
            request.anchor(),
        )?;
        tracing::info!(
            rows = predictions.len(),
            first = ?predictions.dates().first(),
            "forecast ready"
        );

        let summary = model.summary(series.name());

        Ok(RunReport {
            request: request.clone(),
            frame,
            series,
            stationarity,
            decomposition,
            model,
            summary,
            predictions,
        })
    }
}

/// Pick the requested column, or the first data column when none is given.
///
/// Rows with a missing value in that column are dropped with a warning.
pub fn select_column(frame: &TimeSeriesFrame, column: Option<&str>) -> Result<SelectedSeries> {
    let name = match column {
        Some(name) => name,
        None => frame.value_columns().first().copied().ok_or_else(|| {
            ForecastError::InvalidInput(format!("no data columns for {}", frame.ticker()))
        })?,
    };

    let series = frame.select(name)?;
    let missing = series.missing();
    if missing > 0 {
        tracing::warn!(column = name, missing, "dropping rows with missing values");
    }
    let series = series.drop_missing();
    tracing::info!(column = series.name(), rows = series.len(), "column selected");
    Ok(series)
}
