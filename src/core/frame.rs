//! Date-indexed tabular frames for fetched market data.
//!
//! A provider hands back a [`RawFrame`] whose column labels may be
//! hierarchical (one level per field, one per ticker). [`normalize`] turns it
//! into a [`TimeSeriesFrame`] with flat labels and an explicit leading `Date`
//! column, and [`TimeSeriesFrame::select`] narrows that to a single
//! [`SelectedSeries`].

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Name of the explicit date column of a normalized frame.
pub const DATE_COLUMN: &str = "Date";

/// A column label made of one or more levels.
///
/// A flat label has a single level. Multi-level labels come from providers
/// that key columns by `(field, ticker)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnLabel {
    levels: Vec<String>,
}

impl ColumnLabel {
    /// Create a single-level label.
    pub fn flat(name: impl Into<String>) -> Self {
        Self {
            levels: vec![name.into()],
        }
    }

    /// Create a multi-level label.
    pub fn hierarchical<I, S>(levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            levels: levels.into_iter().map(Into::into).collect(),
        }
    }

    /// Label levels, outermost first.
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// True when the label has more than one level.
    pub fn is_hierarchical(&self) -> bool {
        self.levels.len() > 1
    }

    /// Join the levels with a single space and trim the result.
    ///
    /// Flattening a flat label returns its trimmed name, so the operation is
    /// idempotent.
    pub fn flatten(&self) -> String {
        self.levels.join(" ").trim().to_string()
    }
}

/// One column of a raw provider frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub label: ColumnLabel,
    pub values: Vec<f64>,
}

impl RawColumn {
    pub fn new(label: ColumnLabel, values: Vec<f64>) -> Self {
        Self { label, values }
    }
}

/// Provider output: a date index plus labelled numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    ticker: String,
    index: Vec<NaiveDate>,
    columns: Vec<RawColumn>,
}

impl RawFrame {
    /// Create a raw frame, checking every column matches the index length.
    pub fn new(ticker: impl Into<String>, index: Vec<NaiveDate>, columns: Vec<RawColumn>) -> Result<Self> {
        for column in &columns {
            if column.values.len() != index.len() {
                return Err(ForecastError::Provider(format!(
                    "column '{}' has {} values for {} dates",
                    column.label.flatten(),
                    column.values.len(),
                    index.len()
                )));
            }
        }
        Ok(Self {
            ticker: ticker.into(),
            index,
            columns,
        })
    }

    /// A frame with no rows and no columns.
    pub fn empty(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            index: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// True when any column still carries a multi-level label.
    pub fn has_hierarchical_columns(&self) -> bool {
        self.columns.iter().any(|c| c.label.is_hierarchical())
    }

    /// Replace every label by its flattened single-level form.
    pub fn flatten_columns(mut self) -> Self {
        for column in &mut self.columns {
            column.label = ColumnLabel::flat(column.label.flatten());
        }
        self
    }
}

/// A named numeric column of a normalized frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<f64>,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Normalized frame: a leading `Date` column plus flat numeric columns.
///
/// Dates are strictly increasing and unique. Rows are addressed by ordinal
/// position.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesFrame {
    ticker: String,
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl TimeSeriesFrame {
    /// Build a frame from already-normalized parts.
    pub fn from_columns(
        ticker: impl Into<String>,
        dates: Vec<NaiveDate>,
        columns: Vec<(String, Vec<f64>)>,
    ) -> Result<Self> {
        if dates.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ForecastError::InvalidInput(
                "dates must be strictly increasing".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            if name == DATE_COLUMN || !seen.insert(name.clone()) {
                return Err(ForecastError::InvalidInput(format!(
                    "duplicate column name '{}'",
                    name
                )));
            }
            if values.len() != dates.len() {
                return Err(ForecastError::InvalidInput(format!(
                    "column '{}' has {} values for {} dates",
                    name,
                    values.len(),
                    dates.len()
                )));
            }
            out.push(Column { name, values });
        }

        Ok(Self {
            ticker: ticker.into(),
            dates,
            columns: out,
        })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The `Date` column.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// All column names, `Date` first.
    pub fn column_names(&self) -> Vec<&str> {
        std::iter::once(DATE_COLUMN)
            .chain(self.columns.iter().map(|c| c.name.as_str()))
            .collect()
    }

    /// Names of the numeric (non-date) columns.
    pub fn value_columns(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a numeric column by exact name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Narrow the frame to `Date` plus one numeric column.
    pub fn select(&self, name: &str) -> Result<SelectedSeries> {
        let values = self.column(name).ok_or_else(|| {
            ForecastError::InvalidInput(format!(
                "unknown column '{}', available: {}",
                name,
                self.value_columns().join(", ")
            ))
        })?;

        Ok(SelectedSeries {
            name: name.to_string(),
            dates: self.dates.clone(),
            values: values.to_vec(),
        })
    }
}

/// Flatten labels, promote the index to a `Date` column and order rows.
///
/// Rows are sorted by date; when a date repeats, the last occurrence wins.
/// A frame without rows is reported as [`ForecastError::EmptyResult`].
pub fn normalize(raw: RawFrame) -> Result<TimeSeriesFrame> {
    if raw.is_empty() {
        return Err(ForecastError::EmptyResult { ticker: raw.ticker });
    }

    let raw = raw.flatten_columns();

    let mut order: Vec<usize> = (0..raw.index.len()).collect();
    order.sort_by_key(|&i| raw.index[i]);

    // Keep the last row of each run of equal dates.
    let mut keep = Vec::with_capacity(order.len());
    for (pos, &row) in order.iter().enumerate() {
        let next_same = order
            .get(pos + 1)
            .is_some_and(|&next| raw.index[next] == raw.index[row]);
        if !next_same {
            keep.push(row);
        }
    }

    let dropped = order.len() - keep.len();
    if dropped > 0 {
        tracing::debug!(dropped, ticker = %raw.ticker, "collapsed duplicate dates");
    }

    let dates: Vec<NaiveDate> = keep.iter().map(|&i| raw.index[i]).collect();
    let columns = raw
        .columns
        .into_iter()
        .map(|c| {
            let values = keep.iter().map(|&i| c.values[i]).collect();
            (c.label.flatten(), values)
        })
        .collect();

    TimeSeriesFrame::from_columns(raw.ticker, dates, columns)
}

/// `Date` plus exactly one numeric field, in row order.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedSeries {
    name: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl SelectedSeries {
    /// Name of the selected field.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Number of rows whose value is not finite.
    pub fn missing(&self) -> usize {
        self.values.iter().filter(|v| !v.is_finite()).count()
    }

    /// Drop rows whose value is NaN or infinite, keeping order.
    pub fn drop_missing(self) -> Self {
        let (dates, values) = self
            .dates
            .into_iter()
            .zip(self.values)
            .filter(|(_, v)| v.is_finite())
            .unzip();
        Self {
            name: self.name,
            dates,
            values,
        }
    }
}
