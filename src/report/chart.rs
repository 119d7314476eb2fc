//! SVG line charts of a run.

use crate::error::{ForecastError, Result};
use crate::pipeline::RunReport;
use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// Colour of observed values.
pub const ACTUAL_COLOR: RGBColor = RGBColor(30, 144, 255);
/// Colour of predicted values.
pub const PREDICTED_COLOR: RGBColor = RGBColor(220, 50, 32);
const SEASONAL_COLOR: RGBColor = RGBColor(0, 153, 76);

const PALETTE: [RGBColor; 5] = [
    ACTUAL_COLOR,
    RGBColor(255, 127, 14),
    SEASONAL_COLOR,
    PREDICTED_COLOR,
    RGBColor(148, 103, 189),
];

const SIZE: (u32, u32) = (1200, 500);

/// One labelled line of a chart.
#[derive(Debug, Clone)]
pub struct Line {
    pub label: String,
    pub color: RGBColor,
    pub points: Vec<(NaiveDate, f64)>,
}

impl Line {
    /// Pair dates with values, skipping missing values.
    pub fn new(label: impl Into<String>, color: RGBColor, dates: &[NaiveDate], values: &[f64]) -> Self {
        let points = dates
            .iter()
            .zip(values)
            .filter(|(_, v)| v.is_finite())
            .map(|(d, v)| (*d, *v))
            .collect();
        Self {
            label: label.into(),
            color,
            points,
        }
    }
}

/// Draw `lines` into an SVG file at `path`.
///
/// Lines without points are skipped. Fails with `Output` when no line has
/// any point to draw.
pub fn render_lines(path: &Path, title: &str, lines: &[Line]) -> Result<()> {
    let all = || lines.iter().flat_map(|l| l.points.iter());

    let (mut x_min, mut x_max) = match (all().map(|p| p.0).min(), all().map(|p| p.0).max()) {
        (Some(lo), Some(hi)) => (lo, hi),
        _ => {
            return Err(ForecastError::Output(format!(
                "nothing to draw for '{}'",
                title
            )))
        }
    };
    if x_min == x_max {
        x_min -= Duration::days(1);
        x_max += Duration::days(1);
    }

    let mut y_min = all().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let mut y_max = all().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let padding = match (y_max - y_min).abs() * 0.05 {
        p if p > 0.0 => p,
        _ => 1.0,
    };
    y_min -= padding;
    y_max += padding;

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(draw_error)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .y_labels(10)
        .x_desc("Date")
        .draw()
        .map_err(draw_error)?;

    for line in lines.iter().filter(|l| !l.points.is_empty()) {
        let color = line.color;
        chart
            .draw_series(LineSeries::new(line.points.iter().copied(), &color))
            .map_err(draw_error)?
            .label(line.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()
        .map_err(draw_error)?;

    root.present().map_err(draw_error)?;
    tracing::debug!(path = %path.display(), title, "chart written");
    Ok(())
}

/// Write every chart of a run into `dir` and return the written paths.
///
/// `separate_plots` adds single-line charts of the actual and predicted
/// values next to the combined forecast chart.
pub fn render_report(report: &RunReport, dir: &Path, separate_plots: bool) -> Result<Vec<PathBuf>> {
    let frame = &report.frame;
    let series = &report.series;
    let dates = series.dates();
    let decomposition = &report.decomposition;

    let data_lines: Vec<Line> = frame
        .columns()
        .iter()
        .zip(PALETTE.iter().cycle())
        .map(|(column, color)| Line::new(column.name(), *color, frame.dates(), column.values()))
        .collect();

    let actual = Line::new("Actual", ACTUAL_COLOR, dates, series.values());
    let predicted = Line::new(
        "Predicted",
        PREDICTED_COLOR,
        report.predictions.dates(),
        report.predictions.predicted_mean(),
    );

    let mut charts = vec![
        ("data.svg", format!("{} prices", frame.ticker()), data_lines),
        (
            "trend.svg",
            "Trend".to_string(),
            vec![Line::new("Trend", ACTUAL_COLOR, dates, &decomposition.trend)],
        ),
        (
            "seasonal.svg",
            "Seasonality".to_string(),
            vec![Line::new("Seasonal", SEASONAL_COLOR, dates, &decomposition.seasonal)],
        ),
        (
            "residual.svg",
            "Residuals".to_string(),
            vec![Line::new("Residual", PREDICTED_COLOR, dates, &decomposition.residual)],
        ),
        (
            "forecast.svg",
            format!("{} actual vs predicted", series.name()),
            vec![actual.clone(), predicted.clone()],
        ),
    ];
    if separate_plots {
        charts.push(("actual.svg", "Actual".to_string(), vec![actual]));
        charts.push(("predicted.svg", "Predicted".to_string(), vec![predicted]));
    }

    let mut written = Vec::with_capacity(charts.len());
    for (file, title, lines) in charts {
        let path = dir.join(file);
        render_lines(&path, &title, &lines)?;
        written.push(path);
    }
    Ok(written)
}

fn draw_error(err: impl std::fmt::Display) -> ForecastError {
    ForecastError::Output(format!("chart rendering failed: {err}"))
}
