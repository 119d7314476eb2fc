//! Plain-text table previews for the terminal.

use crate::core::{PredictionFrame, SelectedSeries, TimeSeriesFrame, DATE_COLUMN, PREDICTED_MEAN};
use crate::seasonality::Decomposition;
use chrono::NaiveDate;
use std::fmt::Write;

const DATE_WIDTH: usize = 10;
const VALUE_WIDTH: usize = 14;

/// First `rows` rows of the normalized frame.
pub fn frame_table(frame: &TimeSeriesFrame, rows: usize) -> String {
    let columns: Vec<&[f64]> = frame.columns().iter().map(|c| c.values()).collect();
    render(
        &frame.value_columns(),
        frame.dates(),
        |row| columns.iter().map(|c| c[row]).collect(),
        rows,
    )
}

/// First `rows` rows of the decomposition, dated by the series.
pub fn decomposition_table(
    series: &SelectedSeries,
    decomposition: &Decomposition,
    rows: usize,
) -> String {
    let dates = &series.dates()[..series.len().min(decomposition.len())];
    render(
        &["trend", "seasonal", "residual"],
        dates,
        |row| {
            vec![
                decomposition.trend[row],
                decomposition.seasonal[row],
                decomposition.residual[row],
            ]
        },
        rows,
    )
}

/// Every prediction row.
pub fn prediction_table(predictions: &PredictionFrame) -> String {
    let values = predictions.predicted_mean();
    render(
        &[PREDICTED_MEAN],
        predictions.dates(),
        |row| vec![values[row]],
        predictions.len(),
    )
}

fn render<F>(headers: &[&str], dates: &[NaiveDate], row_values: F, rows: usize) -> String
where
    F: Fn(usize) -> Vec<f64>,
{
    let widths: Vec<usize> = headers.iter().map(|h| h.len().max(VALUE_WIDTH)).collect();
    let mut out = String::new();

    let _ = write!(out, "{:<width$}", DATE_COLUMN, width = DATE_WIDTH);
    for (header, width) in headers.iter().zip(&widths) {
        let _ = write!(out, "  {:>width$}", header, width = *width);
    }
    out.push('\n');

    let shown = rows.min(dates.len());
    for (row, date) in dates.iter().take(shown).enumerate() {
        let _ = write!(out, "{:<width$}", date.to_string(), width = DATE_WIDTH);
        for (value, width) in row_values(row).into_iter().zip(&widths) {
            let _ = write!(out, "  {:>width$}", format_value(value), width = *width);
        }
        out.push('\n');
    }

    if shown < dates.len() {
        let _ = writeln!(out, "... {} more rows", dates.len() - shown);
    }
    out
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.4}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn prediction_table_lists_every_row() {
        let predictions = PredictionFrame::daily(date(16), vec![101.5, 102.25, 103.0]).unwrap();
        let table = prediction_table(&predictions);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Date"));
        assert!(lines[0].ends_with("predicted_mean"));
        assert!(lines[1].starts_with("2025-03-16"));
        assert!(lines[1].ends_with("101.5000"));
        assert!(lines[3].starts_with("2025-03-18"));
    }

    #[test]
    fn frame_table_truncates_and_marks_missing() {
        let frame = TimeSeriesFrame::from_columns(
            "MSFT",
            vec![date(3), date(4), date(5)],
            vec![("Close".to_string(), vec![1.0, f64::NAN, 3.0])],
        )
        .unwrap();

        let table = frame_table(&frame, 2);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[2].ends_with("NaN"));
        assert_eq!(lines[3], "... 1 more rows");
    }
}
