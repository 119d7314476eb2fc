//! End-to-end runs against an in-memory market data provider.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use ticker_forecast::core::{
    ArimaOrder, ColumnLabel, ForecastAnchor, ForecastWindow, PredictionFrame, RawColumn, RawFrame,
    RunRequest, SeasonalOrder,
};
use ticker_forecast::data::{FetchRequest, MarketDataProvider};
use ticker_forecast::pipeline::{Pipeline, PipelineConfig};
use ticker_forecast::report::{render_text, write_outputs, OutputOptions};
use ticker_forecast::ForecastError;

const END: (i32, u32, u32) = (2025, 3, 16);

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn end_date() -> NaiveDate {
    date(END.0, END.1, END.2)
}

/// Provider serving a fixed synthetic price history.
struct StubProvider {
    rows: usize,
    delay: Option<std::time::Duration>,
    calls: AtomicUsize,
}

impl StubProvider {
    fn new(rows: usize) -> Self {
        Self {
            rows,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn slow(rows: usize, delay: std::time::Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(rows)
        }
    }
}

impl MarketDataProvider for StubProvider {
    fn fetch(&self, request: &FetchRequest) -> ticker_forecast::Result<RawFrame> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.rows == 0 {
            return Ok(RawFrame::empty(request.ticker.clone()));
        }

        let mut rng = StdRng::seed_from_u64(7);
        let index: Vec<NaiveDate> = (0..self.rows)
            .map(|i| request.start + Duration::days(i as i64))
            .collect();
        let close: Vec<f64> = (0..self.rows)
            .map(|i| {
                let t = i as f64;
                100.0
                    + 0.2 * t
                    + 3.0 * (2.0 * std::f64::consts::PI * t / 12.0).sin()
                    + rng.gen_range(-0.5..0.5)
            })
            .collect();
        let open: Vec<f64> = close.iter().map(|c| c - 0.3).collect();
        let volume: Vec<f64> = (0..self.rows).map(|i| 1.0e6 + i as f64).collect();

        let label = |field: &str| ColumnLabel::hierarchical([field, request.ticker.as_str()]);
        RawFrame::new(
            request.ticker.clone(),
            index,
            vec![
                RawColumn::new(label("Close"), close),
                RawColumn::new(label("Open"), open),
                RawColumn::new(label("Volume"), volume),
            ],
        )
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Provider serving a plain daily random walk with ±2 steps.
struct WalkProvider {
    rows: usize,
    seed: u64,
}

impl MarketDataProvider for WalkProvider {
    fn fetch(&self, request: &FetchRequest) -> ticker_forecast::Result<RawFrame> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut level = 150.0;
        let close: Vec<f64> = (0..self.rows)
            .map(|_| {
                level += rng.gen_range(-2.0..2.0);
                level
            })
            .collect();
        let index: Vec<NaiveDate> = (0..self.rows)
            .map(|i| request.start + Duration::days(i as i64))
            .collect();
        RawFrame::new(
            request.ticker.clone(),
            index,
            vec![RawColumn::new(
                ColumnLabel::hierarchical(["Close", request.ticker.as_str()]),
                close,
            )],
        )
    }

    fn name(&self) -> &str {
        "walk"
    }
}

fn small_window(horizon: usize) -> ForecastWindow {
    ForecastWindow::new(ArimaOrder::new(1, 1, 0), SeasonalOrder::none(), horizon).unwrap()
}

fn request(window: ForecastWindow) -> RunRequest {
    RunRequest::new("aapl", date(2024, 1, 1), end_date(), window).unwrap()
}

fn pipeline(provider: StubProvider) -> Pipeline {
    Pipeline::new(Arc::new(provider), PipelineConfig::default())
}

#[test]
fn run_produces_horizon_plus_one_daily_predictions() {
    let report = pipeline(StubProvider::new(120))
        .run(&request(small_window(10)))
        .unwrap();

    assert_eq!(report.frame.value_columns(), vec!["Close AAPL", "Open AAPL", "Volume AAPL"]);
    assert_eq!(report.series.name(), "Close AAPL");
    assert_eq!(report.series.len(), 120);
    assert_eq!(report.decomposition.len(), 120);

    let dates = report.predictions.dates();
    assert_eq!(dates.len(), 11);
    assert_eq!(dates[0], end_date());
    assert!(dates.windows(2).all(|w| w[1] - w[0] == Duration::days(1)));
    assert!(report.predictions.predicted_mean().iter().all(|v| v.is_finite()));
}

#[test]
fn day_after_anchor_shifts_every_date() {
    let report = pipeline(StubProvider::new(120))
        .run(&request(small_window(3)).with_anchor(ForecastAnchor::DayAfterEnd))
        .unwrap();
    assert_eq!(report.predictions.dates()[0], date(2025, 3, 17));
    assert_eq!(report.predictions.dates()[3], date(2025, 3, 20));
}

#[test]
fn explicit_column_is_forecast() {
    let report = pipeline(StubProvider::new(120))
        .run(&request(small_window(5)).with_column("Open AAPL"))
        .unwrap();
    assert_eq!(report.series.name(), "Open AAPL");
    assert_eq!(report.summary.dep_var, "Open AAPL");
}

#[test]
fn unknown_column_is_invalid_input() {
    let err = pipeline(StubProvider::new(120))
        .run(&request(small_window(5)).with_column("Adj Close"))
        .unwrap_err();
    assert!(matches!(err, ForecastError::InvalidInput(_)));
}

#[test]
fn empty_provider_response_halts_the_run() {
    let err = pipeline(StubProvider::new(0))
        .run(&request(small_window(10)))
        .unwrap_err();
    assert_eq!(
        err,
        ForecastError::EmptyResult {
            ticker: "AAPL".to_string()
        }
    );
}

#[test]
fn longer_horizon_keeps_earlier_predictions() {
    let pipeline = pipeline(StubProvider::new(120));
    let short = pipeline.run(&request(small_window(5))).unwrap();
    let long = pipeline.run(&request(small_window(20))).unwrap();

    let shared = short.predictions.len();
    assert_eq!(
        short.predictions.predicted_mean(),
        &long.predictions.predicted_mean()[..shared]
    );
    assert_eq!(short.predictions.dates(), &long.predictions.dates()[..shared]);
}

#[test]
fn slow_fetch_times_out() {
    let provider = StubProvider::slow(120, std::time::Duration::from_millis(500));
    let config = PipelineConfig {
        fetch_timeout: Some(std::time::Duration::from_millis(20)),
        ..PipelineConfig::default()
    };
    let err = Pipeline::new(Arc::new(provider), config)
        .run(&request(small_window(10)))
        .unwrap_err();
    assert!(matches!(err, ForecastError::Timeout { stage: "fetch", .. }));
}

#[test]
fn default_orders_forecast_plain_price_walks() {
    for seed in 0..10 {
        let provider = WalkProvider { rows: 300, seed };
        let window = ForecastWindow::reference(2, 1, 2, 12, 10).unwrap();
        let report = Pipeline::new(Arc::new(provider), PipelineConfig::default())
            .run(&request(window))
            .unwrap_or_else(|e| panic!("seed {seed}: {e}"));

        assert!(report.model.converged(), "seed {seed}");
        assert_eq!(report.predictions.len(), 11);
        assert_eq!(report.predictions.dates()[0], end_date());
        assert!(report.predictions.predicted_mean().iter().all(|v| v.is_finite()));
    }
}

#[test]
fn orders_too_large_for_the_sample_are_invalid() {
    let window = ForecastWindow::reference(2, 1, 2, 12, 10).unwrap();
    let err = pipeline(StubProvider::new(40)).run(&request(window)).unwrap_err();
    assert!(matches!(err, ForecastError::InvalidOrder(_)));
}

#[test]
fn short_history_cannot_be_decomposed() {
    let err = pipeline(StubProvider::new(20))
        .run(&request(small_window(10)))
        .unwrap_err();
    assert_eq!(err, ForecastError::InsufficientData { needed: 24, got: 20 });
}

#[test]
fn provider_is_called_once_per_run() {
    let provider = Arc::new(StubProvider::new(120));
    let pipeline = Pipeline::new(provider.clone(), PipelineConfig::default());
    pipeline.run(&request(small_window(2))).unwrap();
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn outputs_are_written_to_the_directory() {
    let report = pipeline(StubProvider::new(120))
        .run(&request(small_window(4)))
        .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let options = OutputOptions {
        separate_plots: true,
        ..OutputOptions::new(dir.path().join("out"))
    };

    let written = write_outputs(&report, &options).unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "data.csv",
            "selected.csv",
            "decomposition.csv",
            "predictions.csv",
            "summary.txt",
            "data.svg",
            "trend.svg",
            "seasonal.svg",
            "residual.svg",
            "forecast.svg",
            "actual.svg",
            "predicted.svg",
        ]
    );
    assert!(written.iter().all(|p| p.exists()));

    let predictions = std::fs::read_to_string(dir.path().join("out/predictions.csv")).unwrap();
    assert_eq!(predictions.lines().count(), 6);
    assert!(predictions.starts_with("Date,predicted_mean\n2025-03-16,"));

    let text = render_text(&report, 5);
    assert!(text.contains("Stationary: "));
    assert!(text.contains("trend strength "));
    assert!(text.contains("seasonal strength "));
    assert!(text.contains("predicted_mean"));
}

#[test]
fn charts_can_be_disabled() {
    let report = pipeline(StubProvider::new(120))
        .run(&request(small_window(4)))
        .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let options = OutputOptions {
        charts: false,
        ..OutputOptions::new(dir.path().to_path_buf())
    };

    let written = write_outputs(&report, &options).unwrap();
    assert_eq!(written.len(), 5);
    assert!(!dir.path().join("forecast.svg").exists());
}

#[test]
fn failed_chart_leaves_no_output_behind() {
    let mut report = pipeline(StubProvider::new(120))
        .run(&request(small_window(4)))
        .unwrap();
    report.predictions = PredictionFrame::daily(end_date(), vec![f64::NAN; 5]).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let options = OutputOptions {
        separate_plots: true,
        ..OutputOptions::new(dir.path().to_path_buf())
    };

    let err = write_outputs(&report, &options).unwrap_err();

    assert!(matches!(err, ForecastError::Output(_)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
