//! Presentation of a finished run.
//!
//! Terminal previews, CSV exports, the model summary and SVG charts. Nothing
//! here feeds back into the pipeline.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use ticker_forecast::pipeline::RunReport;
//! use ticker_forecast::report::{write_outputs, OutputOptions};
//!
//! fn save(report: &RunReport) -> ticker_forecast::Result<()> {
//!     let options = OutputOptions::new(PathBuf::from("forecast-output"));
//!     let written = write_outputs(report, &options)?;
//!     println!("wrote {} files", written.len());
//!     Ok(())
//! }
//! ```

pub mod chart;
mod csv_export;
mod table;

pub use chart::{render_lines, render_report, Line, ACTUAL_COLOR, PREDICTED_COLOR};
pub use csv_export::{write_decomposition, write_frame, write_predictions, write_series};
pub use table::{decomposition_table, frame_table, prediction_table};

use crate::error::Result;
use crate::pipeline::RunReport;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

/// Where and what to write for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    pub dir: PathBuf,
    /// Render SVG charts.
    pub charts: bool,
    /// Also render the actual and predicted series on their own.
    pub separate_plots: bool,
    /// Rows shown in terminal previews.
    pub preview_rows: usize,
}

impl OutputOptions {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            charts: true,
            separate_plots: false,
            preview_rows: 10,
        }
    }
}

/// Text shown on stdout after a run.
pub fn render_text(report: &RunReport, preview_rows: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} from {} to {} ({} rows)\n",
        report.frame.ticker(),
        report.request.start(),
        report.request.end(),
        report.frame.len()
    );
    out.push_str(&frame_table(&report.frame, preview_rows));

    let _ = writeln!(
        out,
        "\nStationary: {} (ADF statistic {:.4}, p-value {:.4})\n",
        report.stationarity.is_stationary,
        report.stationarity.statistic,
        report.stationarity.p_value
    );

    let _ = writeln!(
        out,
        "Decomposition of {} (period {}, trend strength {:.3}, seasonal strength {:.3})",
        report.series.name(),
        report.decomposition.period,
        report.decomposition.trend_strength(),
        report.decomposition.seasonal_strength()
    );
    out.push_str(&decomposition_table(
        &report.series,
        &report.decomposition,
        preview_rows,
    ));

    let _ = writeln!(out, "\n{}", report.summary);
    let _ = writeln!(out, "Predictions");
    out.push_str(&prediction_table(&report.predictions));
    out
}

/// Write CSV files, `summary.txt` and, when enabled, charts.
///
/// The output directory is created if needed. Files are produced in a
/// staging directory inside it and moved into place only once all of them
/// were written, so a failed export leaves no new files behind. Returns the
/// final paths in the order they were produced.
pub fn write_outputs(report: &RunReport, options: &OutputOptions) -> Result<Vec<PathBuf>> {
    let dir = options.dir.as_path();
    fs::create_dir_all(dir)?;

    // Removed on drop, including on the error paths below.
    let staging = tempfile::Builder::new()
        .prefix(".ticker-forecast-")
        .tempdir_in(dir)?;
    let staged = write_all(report, options, staging.path())?;

    let mut written = Vec::with_capacity(staged.len());
    for path in staged {
        let Some(name) = path.file_name() else {
            continue;
        };
        let target = dir.join(name);
        fs::rename(&path, &target)?;
        tracing::debug!(path = %target.display(), "output written");
        written.push(target);
    }

    tracing::info!(dir = %dir.display(), files = written.len(), "outputs written");
    Ok(written)
}

fn write_all(report: &RunReport, options: &OutputOptions, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    let path = dir.join("data.csv");
    write_frame(&path, &report.frame)?;
    written.push(path);

    let path = dir.join("selected.csv");
    write_series(&path, &report.series)?;
    written.push(path);

    let path = dir.join("decomposition.csv");
    write_decomposition(&path, &report.series, &report.decomposition)?;
    written.push(path);

    let path = dir.join("predictions.csv");
    write_predictions(&path, &report.predictions)?;
    written.push(path);

    let path = dir.join("summary.txt");
    write_summary(&path, report)?;
    written.push(path);

    if options.charts {
        written.extend(render_report(report, dir, options.separate_plots)?);
    }
    Ok(written)
}

fn write_summary(path: &Path, report: &RunReport) -> Result<()> {
    fs::write(path, report.summary.to_string())?;
    Ok(())
}
