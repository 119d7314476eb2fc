//! CSV exports of a run.

use crate::core::{PredictionFrame, SelectedSeries, TimeSeriesFrame, DATE_COLUMN, PREDICTED_MEAN};
use crate::error::{ForecastError, Result};
use crate::seasonality::Decomposition;
use std::path::Path;

/// Write the normalized frame: `Date` followed by every data column.
pub fn write_frame(path: &Path, frame: &TimeSeriesFrame) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;

    let mut header = vec![DATE_COLUMN.to_string()];
    header.extend(frame.value_columns().iter().map(|c| c.to_string()));
    writer.write_record(&header).map_err(csv_error)?;

    for (row, date) in frame.dates().iter().enumerate() {
        let mut record = vec![date.to_string()];
        record.extend(frame.columns().iter().map(|c| cell(c.values()[row])));
        writer.write_record(&record).map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the forecast column as `Date,<column>`.
pub fn write_series(path: &Path, series: &SelectedSeries) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer
        .write_record([DATE_COLUMN, series.name()])
        .map_err(csv_error)?;

    for (date, value) in series.dates().iter().zip(series.values()) {
        writer
            .write_record([date.to_string(), cell(*value)])
            .map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write trend, seasonal and residual components against the series dates.
///
/// Undefined trend and residual values at the edges are empty cells.
pub fn write_decomposition(
    path: &Path,
    series: &SelectedSeries,
    decomposition: &Decomposition,
) -> Result<()> {
    if series.len() != decomposition.len() {
        return Err(ForecastError::Output(format!(
            "decomposition has {} rows for {} dates",
            decomposition.len(),
            series.len()
        )));
    }

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer
        .write_record([DATE_COLUMN, "trend", "seasonal", "residual"])
        .map_err(csv_error)?;

    for (i, date) in series.dates().iter().enumerate() {
        writer
            .write_record([
                date.to_string(),
                cell(decomposition.trend[i]),
                cell(decomposition.seasonal[i]),
                cell(decomposition.residual[i]),
            ])
            .map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the prediction frame as `Date,predicted_mean`.
pub fn write_predictions(path: &Path, predictions: &PredictionFrame) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer
        .write_record([DATE_COLUMN, PREDICTED_MEAN])
        .map_err(csv_error)?;

    for (date, value) in predictions.rows() {
        writer
            .write_record([date.to_string(), cell(value)])
            .map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

fn cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

fn csv_error(err: csv::Error) -> ForecastError {
    ForecastError::Output(format!("csv export failed: {err}"))
}
