//! Ordinary Least Squares (OLS) regression utilities.
//!
//! Used by the unit-root test, which needs coefficient standard errors, and
//! by the model summary, which needs a symmetric matrix inverse.

use crate::error::{ForecastError, Result};

/// OLS coefficients with their standard errors.
#[derive(Debug, Clone)]
pub struct OLSResult {
    /// Regression coefficients, one per design column.
    pub coefficients: Vec<f64>,
    /// Standard error of each coefficient.
    pub std_errors: Vec<f64>,
    /// Residual sum of squares.
    pub rss: f64,
    /// Number of observations.
    pub n_obs: usize,
}

impl OLSResult {
    /// t-ratio of coefficient `index`.
    pub fn t_statistic(&self, index: usize) -> f64 {
        self.coefficients[index] / self.std_errors[index]
    }

    /// Akaike information criterion under Gaussian errors.
    pub fn aic(&self) -> f64 {
        let n = self.n_obs as f64;
        let k = self.coefficients.len() as f64;
        let llf = -0.5 * n * ((2.0 * std::f64::consts::PI * self.rss / n).ln() + 1.0);
        -2.0 * llf + 2.0 * k
    }
}

/// Fit `y = X @ beta` where `design` holds one row per observation.
///
/// Include a column of ones in `design` for an intercept. Uses Cholesky
/// decomposition to solve the normal equations.
///
/// # Arguments
/// * `y` - Target values (length n)
/// * `design` - Design matrix rows (n rows, k columns each)
///
/// # Returns
/// Coefficients, standard errors and residual sum of squares.
pub fn ols_fit(y: &[f64], design: &[Vec<f64>]) -> Result<OLSResult> {
    let n = y.len();
    if design.len() != n {
        return Err(ForecastError::InvalidInput(format!(
            "design has {} rows for {} observations",
            design.len(),
            n
        )));
    }

    let k = design.first().map(|row| row.len()).unwrap_or(0);
    if k == 0 {
        return Err(ForecastError::InvalidInput(
            "design matrix has no columns".into(),
        ));
    }
    if n <= k {
        return Err(ForecastError::InsufficientData {
            needed: k + 1,
            got: n,
        });
    }

    // X'X and X'y
    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];

    for (row, &y_obs) in design.iter().zip(y) {
        if row.len() != k {
            return Err(ForecastError::InvalidInput(
                "design rows differ in length".into(),
            ));
        }
        for i in 0..k {
            xty[i] += row[i] * y_obs;
            for j in 0..=i {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..k {
        for j in 0..i {
            xtx[j][i] = xtx[i][j];
        }
    }

    let beta = solve_symmetric(&xtx, &xty).ok_or_else(|| {
        ForecastError::InvalidInput("OLS regression failed: matrix not positive definite".into())
    })?;

    let rss: f64 = design
        .iter()
        .zip(y)
        .map(|(row, &y_obs)| {
            let fitted: f64 = row.iter().zip(&beta).map(|(x, b)| x * b).sum();
            (y_obs - fitted).powi(2)
        })
        .sum();

    let sigma_sq = rss / (n - k) as f64;
    let inverse = invert_symmetric(&xtx).ok_or_else(|| {
        ForecastError::InvalidInput("OLS regression failed: singular design".into())
    })?;
    let std_errors = (0..k)
        .map(|i| (sigma_sq * inverse[i][i]).max(0.0).sqrt())
        .collect();

    Ok(OLSResult {
        coefficients: beta,
        std_errors,
        rss,
        n_obs: n,
    })
}

/// Cholesky factor `L` of a symmetric positive definite matrix.
fn cholesky(a: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    Some(l)
}

/// Solve `L @ L' @ x = b` given the Cholesky factor.
fn cholesky_solve(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();

    // Forward substitution: L @ y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: L' @ x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    x
}

/// Solve symmetric positive definite system `A @ x = b`.
pub fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    if b.is_empty() || a.len() != b.len() {
        return None;
    }
    let l = cholesky(a)?;
    Some(cholesky_solve(&l, b))
}

/// Inverse of a symmetric positive definite matrix.
///
/// Returns `None` when the matrix is not positive definite.
pub fn invert_symmetric(a: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    if n == 0 {
        return None;
    }
    let l = cholesky(a)?;

    let mut inverse = vec![vec![0.0; n]; n];
    let mut unit = vec![0.0; n];
    for col in 0..n {
        unit.iter_mut().for_each(|u| *u = 0.0);
        unit[col] = 1.0;
        let solved = cholesky_solve(&l, &unit);
        for row in 0..n {
            inverse[row][col] = solved[row];
        }
    }

    Some(inverse)
}
