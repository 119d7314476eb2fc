//! Classical additive decomposition.
//!
//! Splits a series into `trend + seasonal + residual` using a centered
//! moving average for the trend and per-phase means for the seasonal part.

use crate::error::{ForecastError, Result};
use crate::utils::stats::{nan_mean, variance};

/// Result of an additive decomposition.
///
/// All components have the input's length. Trend and residual are `NaN`
/// for the first and last `period / 2` points.
#[derive(Debug, Clone)]
pub struct Decomposition {
    /// Centered moving-average trend.
    pub trend: Vec<f64>,
    /// Seasonal pattern, zero mean over one period.
    pub seasonal: Vec<f64>,
    /// What remains after removing trend and seasonal.
    pub residual: Vec<f64>,
    /// Seasonal period used.
    pub period: usize,
}

impl Decomposition {
    /// Number of points in each component.
    pub fn len(&self) -> usize {
        self.trend.len()
    }

    /// Whether the decomposition holds no points.
    pub fn is_empty(&self) -> bool {
        self.trend.is_empty()
    }

    /// One period of the seasonal pattern, starting at phase 0.
    pub fn seasonal_pattern(&self) -> &[f64] {
        &self.seasonal[..self.period.min(self.seasonal.len())]
    }

    /// Seasonal strength in `[0, 1]`; values close to 1 indicate strong
    /// seasonality. Points with a `NaN` residual are ignored.
    pub fn seasonal_strength(&self) -> f64 {
        let (remainder, combined): (Vec<f64>, Vec<f64>) = self
            .seasonal
            .iter()
            .zip(&self.residual)
            .filter(|(_, r)| r.is_finite())
            .map(|(s, r)| (*r, s + r))
            .unzip();
        strength(&remainder, &combined)
    }

    /// Trend strength in `[0, 1]`; values close to 1 indicate strong trend.
    pub fn trend_strength(&self) -> f64 {
        let (remainder, combined): (Vec<f64>, Vec<f64>) = self
            .trend
            .iter()
            .zip(&self.residual)
            .filter(|(t, r)| t.is_finite() && r.is_finite())
            .map(|(t, r)| (*r, t + r))
            .unzip();
        strength(&remainder, &combined)
    }
}

fn strength(remainder: &[f64], combined: &[f64]) -> f64 {
    let var_combined = variance(combined);
    if var_combined.is_nan() || var_combined < 1e-10 {
        return 0.0;
    }
    (1.0 - variance(remainder) / var_combined).max(0.0)
}

/// Decompose `values` additively with the given seasonal period.
///
/// # Errors
/// `InvalidInput` when `period < 2` or the series has non-finite values;
/// `InsufficientData` when the series is shorter than two full periods.
///
/// # Example
/// ```
/// use ticker_forecast::seasonality::seasonal_decompose;
///
/// let values: Vec<f64> = (0..48).map(|i| i as f64 + [1.0, -1.0, 0.0, 0.0][i % 4]).collect();
/// let parts = seasonal_decompose(&values, 4).unwrap();
/// assert_eq!(parts.trend.len(), 48);
/// assert!(parts.trend[0].is_nan());
/// ```
pub fn seasonal_decompose(values: &[f64], period: usize) -> Result<Decomposition> {
    if period < 2 {
        return Err(ForecastError::InvalidInput(format!(
            "seasonal period must be at least 2, got {period}"
        )));
    }
    let n = values.len();
    if n < 2 * period {
        return Err(ForecastError::InsufficientData {
            needed: 2 * period,
            got: n,
        });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::InvalidInput(
            "decomposition requires finite values".to_string(),
        ));
    }

    let trend = centered_moving_average(values, period);

    let detrended: Vec<f64> = values.iter().zip(&trend).map(|(v, t)| v - t).collect();

    // Per-phase means, centered so one period sums to zero.
    let mut pattern: Vec<f64> = (0..period)
        .map(|phase| {
            let phase_values: Vec<f64> =
                detrended.iter().skip(phase).step_by(period).copied().collect();
            nan_mean(&phase_values)
        })
        .collect();
    let level = nan_mean(&pattern);
    pattern.iter_mut().for_each(|s| *s -= level);

    let seasonal: Vec<f64> = (0..n).map(|i| pattern[i % period]).collect();

    let residual: Vec<f64> = values
        .iter()
        .zip(&trend)
        .zip(&seasonal)
        .map(|((v, t), s)| v - t - s)
        .collect();

    tracing::debug!(n, period, "additive decomposition complete");

    Ok(Decomposition {
        trend,
        seasonal,
        residual,
        period,
    })
}

/// Centered moving average; even periods use the `2 x period` filter.
fn centered_moving_average(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let half = period / 2;
    let weights: Vec<f64> = if period % 2 == 0 {
        let mut w = vec![1.0 / period as f64; period + 1];
        w[0] = 0.5 / period as f64;
        w[period] = 0.5 / period as f64;
        w
    } else {
        vec![1.0 / period as f64; period]
    };

    let mut trend = vec![f64::NAN; n];
    for (i, slot) in trend.iter_mut().enumerate().take(n - half).skip(half) {
        *slot = values[i - half..]
            .iter()
            .zip(&weights)
            .map(|(v, w)| v * w)
            .sum();
    }
    trend
}
