//! Augmented Dickey-Fuller test for stationarity.
//!
//! Tests the null hypothesis that the series has a unit root. A p-value below
//! [`SIGNIFICANCE`] rejects the null, and the series is reported stationary.

use crate::error::{ForecastError, Result};
use crate::utils::ols::{ols_fit, OLSResult};
use crate::utils::stats::normal_cdf;

/// Significance level for declaring a series stationary.
pub const SIGNIFICANCE: f64 = 0.05;

/// Fewest observations the test accepts.
pub const MIN_OBSERVATIONS: usize = 10;

/// Result of a stationarity test.
#[derive(Debug, Clone)]
pub struct StationarityReport {
    /// Test statistic (t-ratio of the lagged level)
    pub statistic: f64,
    /// MacKinnon approximate p-value
    pub p_value: f64,
    /// Number of lagged differences used
    pub lags: usize,
    /// Observations in the final regression
    pub n_obs: usize,
    /// Critical values at common significance levels
    pub critical_values: CriticalValues,
    /// `p_value < SIGNIFICANCE`
    pub is_stationary: bool,
}

/// Critical values for the test with a constant.
#[derive(Debug, Clone, Default)]
pub struct CriticalValues {
    /// Critical value at 1% significance
    pub cv_1pct: f64,
    /// Critical value at 5% significance
    pub cv_5pct: f64,
    /// Critical value at 10% significance
    pub cv_10pct: f64,
}

impl CriticalValues {
    /// MacKinnon (2010) finite-sample critical values, constant only.
    fn for_sample(n_obs: usize) -> Self {
        let t = n_obs as f64;
        let surface = |b: [f64; 4]| b[0] + b[1] / t + b[2] / (t * t) + b[3] / (t * t * t);
        Self {
            cv_1pct: surface([-3.43035, -6.5393, -16.786, -79.433]),
            cv_5pct: surface([-2.86154, -2.8903, -4.234, -40.040]),
            cv_10pct: surface([-2.56677, -1.5384, -2.809, 0.0]),
        }
    }
}

/// Run the ADF test with the default lag search.
///
/// `true` in [`StationarityReport::is_stationary`] means the p-value is
/// strictly below 0.05.
pub fn check_stationarity(series: &[f64]) -> Result<StationarityReport> {
    adf_test(series, None)
}

/// Augmented Dickey-Fuller test with a constant.
///
/// Regresses `Δy_t` on a constant, `y_{t-1}` and `k` lagged differences,
/// where `k ≤ max_lags` minimizes AIC on a common sample.
///
/// # Arguments
/// * `series` - Time series data
/// * `max_lags` - Maximum lags to search (default: ⌈12·(n/100)^{1/4}⌉)
///
/// # Errors
/// `InsufficientData` below [`MIN_OBSERVATIONS`]; `InvalidInput` when the
/// series contains NaN or infinite values.
pub fn adf_test(series: &[f64], max_lags: Option<usize>) -> Result<StationarityReport> {
    let n = series.len();
    if n < MIN_OBSERVATIONS {
        return Err(ForecastError::InsufficientData {
            needed: MIN_OBSERVATIONS,
            got: n,
        });
    }
    if series.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::InvalidInput(
            "stationarity test requires finite values".to_string(),
        ));
    }

    let default_lags = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    let max_lags = max_lags.unwrap_or(default_lags).min(n / 2 - 2);

    let diff: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

    let best_lag = select_lag_aic(series, &diff, max_lags);
    let fit = best_lag.and_then(|lag| adf_regression(series, &diff, lag, lag).ok().map(|f| (lag, f)));

    let Some((lags, fit)) = fit else {
        tracing::debug!(n, "ADF regression degenerate, reporting NaN");
        return Ok(StationarityReport {
            statistic: f64::NAN,
            p_value: f64::NAN,
            lags: 0,
            n_obs: 0,
            critical_values: CriticalValues::default(),
            is_stationary: false,
        });
    };

    // Column 1 is the lagged level.
    let statistic = fit.t_statistic(1);
    let p_value = mackinnon_p_value(statistic);

    Ok(StationarityReport {
        statistic,
        p_value,
        lags,
        n_obs: fit.n_obs,
        critical_values: CriticalValues::for_sample(fit.n_obs),
        is_stationary: p_value < SIGNIFICANCE,
    })
}

/// Pick the lag order with the lowest AIC, all fits sharing one sample.
fn select_lag_aic(level: &[f64], diff: &[f64], max_lags: usize) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for lag in 0..=max_lags {
        let Ok(fit) = adf_regression(level, diff, lag, max_lags) else {
            continue;
        };
        let aic = fit.aic();
        if aic.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, best_aic)| aic < best_aic) {
            best = Some((lag, aic));
        }
    }

    best.map(|(lag, _)| lag)
}

/// OLS of `Δy_t` on `[1, y_{t-1}, Δy_{t-1}, ..., Δy_{t-lag}]`.
///
/// Rows start at `skip` so regressions with different `lag` can share a
/// sample; `skip >= lag`.
fn adf_regression(level: &[f64], diff: &[f64], lag: usize, skip: usize) -> Result<OLSResult> {
    let rows = skip..diff.len();
    let y: Vec<f64> = diff[rows.clone()].to_vec();
    let design: Vec<Vec<f64>> = rows
        .map(|t| {
            let mut row = Vec::with_capacity(lag + 2);
            row.push(1.0);
            row.push(level[t]);
            row.extend((1..=lag).map(|i| diff[t - i]));
            row
        })
        .collect();

    let fit = ols_fit(&y, &design)?;
    if fit.std_errors[1] == 0.0 || !fit.std_errors[1].is_finite() {
        return Err(ForecastError::InsufficientData {
            needed: lag + 3,
            got: y.len(),
        });
    }
    Ok(fit)
}

/// MacKinnon (1994) approximate p-value, constant only, one variable.
fn mackinnon_p_value(statistic: f64) -> f64 {
    const TAU_MAX: f64 = 2.74;
    const TAU_MIN: f64 = -18.83;
    const TAU_STAR: f64 = -1.61;
    const SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
    const LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

    if statistic.is_nan() {
        return f64::NAN;
    }
    if statistic > TAU_MAX {
        return 1.0;
    }
    if statistic < TAU_MIN {
        return 0.0;
    }

    let coefficients: &[f64] = if statistic <= TAU_STAR {
        &SMALL_P
    } else {
        &LARGE_P
    };
    let poly = coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, c| acc * statistic + c);

    normal_cdf(poly)
}
