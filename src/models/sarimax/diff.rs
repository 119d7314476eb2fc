//! Regular and seasonal differencing.

use super::polynomial::LagPolynomial;

/// Apply differencing to a time series.
///
/// # Arguments
/// * `series` - The input series
/// * `d` - Differencing order (number of times to difference)
///
/// # Returns
/// The differenced series, `d` values shorter.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            return Vec::new();
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Apply seasonal differencing to a time series.
///
/// # Arguments
/// * `series` - The input series
/// * `d` - Seasonal differencing order
/// * `period` - Seasonal period
///
/// # Returns
/// The seasonally differenced series, `d * period` values shorter.
pub fn seasonal_difference(series: &[f64], d: usize, period: usize) -> Vec<f64> {
    if d == 0 || period == 0 {
        return series.to_vec();
    }

    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= period {
            return Vec::new();
        }
        result = result
            .iter()
            .skip(period)
            .zip(result.iter())
            .map(|(curr, prev)| curr - prev)
            .collect();
    }
    result
}

/// `(1 - B)^d (1 - B^period)^seasonal_d` as a lag polynomial.
pub fn differencing_polynomial(d: usize, seasonal_d: usize, period: usize) -> LagPolynomial {
    let regular = LagPolynomial::from_lags(-1.0, &[1.0], 1).pow(d);
    if seasonal_d == 0 || period == 0 {
        return regular;
    }
    let seasonal = LagPolynomial::from_lags(-1.0, &[1.0], period).pow(seasonal_d);
    regular.multiply(&seasonal)
}

/// Invert one step of differencing.
///
/// Given the differenced value `w_t` and the levels before it, returns
/// `y_t = w_t - sum_k delta_k * y_{t-k}`. `history` must hold at least
/// `delta.degree()` values.
pub fn undifference(differenced: f64, history: &[f64], delta: &LagPolynomial) -> f64 {
    let n = history.len();
    delta
        .lag_terms()
        .iter()
        .enumerate()
        .fold(differenced, |acc, (k, c)| acc - c * history[n - 1 - k])
}
