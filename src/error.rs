//! Error types for the ticker-forecast pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can terminate a forecasting run.
///
/// Every variant is terminal: the pipeline stops at the first error and
/// produces no partial output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Missing or malformed caller input, caught before expensive work.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The market data provider returned no rows.
    #[error("no data found for ticker symbol '{ticker}'")]
    EmptyResult { ticker: String },

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Model orders exceed what the series supports.
    #[error("invalid model order: {0}")]
    InvalidOrder(String),

    /// The optimizer did not converge within its iteration budget.
    #[error("model failed to converge after {iterations} iterations")]
    ModelConvergence { iterations: usize },

    /// Transport or payload failure talking to the data provider.
    #[error("data provider error: {0}")]
    Provider(String),

    /// A blocking stage exceeded its time budget.
    #[error("{stage} timed out after {seconds}s")]
    Timeout { stage: &'static str, seconds: u64 },

    /// Failure writing tables or charts.
    #[error("output error: {0}")]
    Output(String),
}

impl From<std::io::Error> for ForecastError {
    fn from(err: std::io::Error) -> Self {
        ForecastError::Output(err.to_string())
    }
}
