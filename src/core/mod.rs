//! Core data structures flowing through a forecasting run.

mod frame;
mod prediction;
mod request;
mod window;

pub use frame::{
    normalize, Column, ColumnLabel, RawColumn, RawFrame, SelectedSeries, TimeSeriesFrame,
    DATE_COLUMN,
};
pub use prediction::{daily_dates, forecast_window, PredictionFrame, PREDICTED_MEAN};
pub use request::{normalize_ticker, RunRequest};
pub use window::{
    validate_horizon, ArimaOrder, ForecastAnchor, ForecastWindow, SeasonalOrder, MAX_HORIZON,
    MAX_ORDER, MAX_SEASONAL_PERIOD,
};
