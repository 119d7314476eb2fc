//! # ticker-forecast
//!
//! Command-line front end: one forecasting run per invocation.

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use ticker_forecast::config::Config;
use ticker_forecast::core::{ArimaOrder, ForecastAnchor, ForecastWindow, RunRequest, SeasonalOrder};
use ticker_forecast::data::YahooProvider;
use ticker_forecast::pipeline::{select_column, Pipeline};
use ticker_forecast::report::{render_text, write_outputs, OutputOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ticker-forecast")]
#[command(about = "Forecast daily stock prices with a seasonal ARIMA model", long_about = None)]
struct Cli {
    /// Ticker symbol, e.g. AAPL
    #[arg(short, long)]
    ticker: Option<String>,

    /// First day of data (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Day after the last day of data (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Column to forecast (default: first data column)
    #[arg(long)]
    column: Option<String>,

    /// Autoregressive order
    #[arg(short)]
    p: Option<usize>,

    /// Differencing order
    #[arg(short)]
    d: Option<usize>,

    /// Moving-average order
    #[arg(short)]
    q: Option<usize>,

    /// Seasonal period
    #[arg(long)]
    seasonal_period: Option<usize>,

    /// Seasonal autoregressive order (default: p)
    #[arg(long)]
    seasonal_p: Option<usize>,

    /// Seasonal differencing order (default: d)
    #[arg(long)]
    seasonal_d: Option<usize>,

    /// Seasonal moving-average order (default: q)
    #[arg(long)]
    seasonal_q: Option<usize>,

    /// Days to forecast past the data
    #[arg(long)]
    horizon: Option<usize>,

    /// Date given to the first prediction
    #[arg(long, value_enum)]
    anchor: Option<Anchor>,

    /// Directory for CSV files, summary and charts
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip SVG charts
    #[arg(long)]
    no_charts: bool,

    /// Also chart actual and predicted values on their own
    #[arg(long)]
    separate_plots: bool,

    /// Configuration file (default: ./ticker-forecast.toml, then the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the available columns and exit
    #[arg(long)]
    list_columns: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Anchor {
    /// First prediction is dated on the end date
    EndDate,
    /// First prediction is dated the day after the end date
    DayAfter,
}

impl From<Anchor> for ForecastAnchor {
    fn from(anchor: Anchor) -> Self {
        match anchor {
            Anchor::EndDate => ForecastAnchor::EndDate,
            Anchor::DayAfter => ForecastAnchor::DayAfterEnd,
        }
    }
}

impl Cli {
    /// Model window from flags, falling back to the configuration.
    ///
    /// Without any seasonal order flag the seasonal orders repeat `p, d, q`.
    fn window(&self, config: &Config) -> ticker_forecast::Result<ForecastWindow> {
        let forecast = &config.forecast;
        let p = self.p.unwrap_or(forecast.order.p);
        let d = self.d.unwrap_or(forecast.order.d);
        let q = self.q.unwrap_or(forecast.order.q);
        let s = self.seasonal_period.unwrap_or(forecast.seasonal_period);
        let horizon = self.horizon.unwrap_or(forecast.horizon);

        if self.seasonal_p.is_none() && self.seasonal_d.is_none() && self.seasonal_q.is_none() {
            return ForecastWindow::reference(p, d, q, s, horizon);
        }
        ForecastWindow::new(
            ArimaOrder::new(p, d, q),
            SeasonalOrder::new(
                self.seasonal_p.unwrap_or(p),
                self.seasonal_d.unwrap_or(d),
                self.seasonal_q.unwrap_or(q),
                s,
            ),
            horizon,
        )
    }

    fn request(&self, config: &Config) -> anyhow::Result<RunRequest> {
        let forecast = &config.forecast;
        let Some(ticker) = self.ticker.as_deref().or(forecast.ticker.as_deref()) else {
            bail!("no ticker given; pass --ticker or set forecast.ticker in the config file");
        };

        let mut request = RunRequest::new(
            ticker,
            self.start.unwrap_or(forecast.start_date),
            self.end.unwrap_or(forecast.end_date),
            self.window(config).context("invalid model window")?,
        )
        .context("invalid request")?
        .with_anchor(self.anchor.map(Into::into).unwrap_or(forecast.anchor));

        if let Some(column) = self.column.as_ref().or(forecast.column.as_ref()) {
            request = request.with_column(column.clone());
        }
        Ok(request)
    }

    fn output_options(&self, config: &Config) -> OutputOptions {
        OutputOptions {
            dir: self.output.clone().unwrap_or_else(|| config.output.dir.clone()),
            charts: config.output.charts && !self.no_charts,
            separate_plots: self.separate_plots || config.output.separate_plots,
            preview_rows: config.output.preview_rows,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load_default(),
    };

    let request = cli.request(&config)?;
    let provider = YahooProvider::new(&config.provider).context("cannot create data provider")?;
    let pipeline = Pipeline::new(Arc::new(provider), config.pipeline_config());

    if cli.list_columns {
        let frame = pipeline
            .fetch(&request)
            .with_context(|| format!("failed to fetch {}", request.ticker()))?;
        for column in frame.value_columns() {
            println!("{column}");
        }
        // Reject an unknown --column.
        if let Some(column) = request.column() {
            select_column(&frame, Some(column))?;
        }
        return Ok(());
    }

    let report = pipeline
        .run(&request)
        .with_context(|| format!("forecast for {} failed", request.ticker()))?;

    let options = cli.output_options(&config);
    print!("{}", render_text(&report, options.preview_rows));

    let written = write_outputs(&report, &options)
        .with_context(|| format!("failed to write outputs to {}", options.dir.display()))?;
    println!("\nWrote {} files to {}", written.len(), options.dir.display());

    Ok(())
}
