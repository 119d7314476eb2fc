//! Configuration management for ticker-forecast.
//!
//! Loads run defaults, provider settings and output options from TOML.
//! Every section is optional; missing keys fall back to the defaults below.

use crate::core::{ArimaOrder, ForecastAnchor};
use crate::data::yahoo::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use crate::models::sarimax::FitOptions;
use crate::pipeline::PipelineConfig;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// File name searched for in the working directory.
pub const CONFIG_FILE: &str = "ticker-forecast.toml";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub model: ModelConfig,
    pub pipeline: TimeoutConfig,
    pub forecast: ForecastConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from default locations.
    ///
    /// Searches in order:
    /// 1. `./ticker-forecast.toml`
    /// 2. `~/.config/ticker-forecast/config.toml`
    ///
    /// Returns default config if no file found. A file that exists but
    /// does not parse is reported and skipped.
    pub fn load_default() -> Self {
        let mut candidates = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("ticker-forecast").join("config.toml"));
        }

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load(&path) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), "loaded configuration");
                    return config;
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "ignoring config file");
                }
            }
        }

        Self::default()
    }

    /// Save configuration to a file path.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Settings the pipeline runs with.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            fetch_timeout: self.pipeline.fetch_timeout_secs.map(Duration::from_secs),
            fit_timeout: self.pipeline.fit_timeout_secs.map(Duration::from_secs),
            decomposition_period: self.forecast.decomposition_period,
            include_constant: self.model.include_constant,
            fit_options: self.model.fit_options(),
        }
    }
}

/// Market data provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Yahoo Finance chart endpoint.
    pub base_url: String,
    /// User agent sent with every request.
    pub user_agent: String,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Model estimation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Optimizer iteration budget; unset uses `max(20_000, 2_000 * k)`.
    pub max_iterations: Option<usize>,
    /// Optimizer convergence tolerance.
    pub tolerance: f64,
    /// Estimate a mean for the differenced series.
    pub include_constant: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let options = FitOptions::default();
        Self {
            max_iterations: options.max_iterations,
            tolerance: options.tolerance,
            include_constant: false,
        }
    }
}

impl ModelConfig {
    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
        }
    }
}

/// Time budgets for the blocking stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Budget for the data download; unset waits indefinitely.
    pub fetch_timeout_secs: Option<u64>,
    /// Budget for the model fit; unset waits indefinitely.
    pub fit_timeout_secs: Option<u64>,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: Some(30),
            fit_timeout_secs: None,
        }
    }
}

/// Default run parameters, overridden by command-line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub ticker: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Column to forecast; unset picks the first data column.
    pub column: Option<String>,
    pub order: ArimaOrder,
    pub seasonal_period: usize,
    pub horizon: usize,
    pub anchor: ForecastAnchor,
    /// Period of the additive decomposition.
    pub decomposition_period: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            ticker: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 16).unwrap_or_default(),
            column: None,
            order: ArimaOrder::default(),
            seasonal_period: 12,
            horizon: 10,
            anchor: ForecastAnchor::default(),
            decomposition_period: crate::seasonality::DEFAULT_PERIOD,
        }
    }
}

/// Where and how results are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for CSV files, charts and the summary.
    pub dir: PathBuf,
    /// Render SVG charts.
    pub charts: bool,
    /// Also draw actual and predicted series on their own charts.
    pub separate_plots: bool,
    /// Rows shown in stdout table previews.
    pub preview_rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("forecast-output"),
            charts: true,
            separate_plots: false,
            preview_rows: 10,
        }
    }
}
