//! Seasonal ARIMA fitted by conditional sum of squares.

use super::diff::{difference, differencing_polynomial, seasonal_difference, undifference};
use super::polynomial::LagPolynomial;
use super::summary::{ModelSummary, ParameterEstimate};
use crate::core::{ArimaOrder, ForecastWindow, SeasonalOrder};
use crate::error::{ForecastError, Result};
use crate::models::FittedModel;
use crate::utils::ols::invert_symmetric;
use crate::utils::optimization::{nelder_mead, numerical_hessian, NelderMeadConfig};
use crate::utils::stats::{mean, variance};
use crate::validation::{jarque_bera, ljung_box};

/// Bound on every AR and MA coefficient.
const COEFFICIENT_BOUND: f64 = 0.99;

/// Objective value for parameters whose recursion blows up.
const INVALID_OBJECTIVE: f64 = f64::MAX;

/// Nelder-Mead budget for `k` free coefficients: `max(20_000, 2_000 * k)`.
pub fn default_iteration_budget(k: usize) -> usize {
    20_000usize.max(2_000 * k)
}

/// Optimizer settings for [`SarimaxSpec::fit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Iteration budget; `None` uses [`default_iteration_budget`].
    pub max_iterations: Option<usize>,
    /// Convergence tolerance on the normalized objective.
    pub tolerance: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: None,
            tolerance: 1e-8,
        }
    }
}

/// SARIMA(p, d, q)x(P, D, Q, s) model specification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SarimaxSpec {
    /// Non-seasonal order.
    pub order: ArimaOrder,
    /// Seasonal order; ignored when all of P, D, Q are zero.
    pub seasonal: SeasonalOrder,
    /// Estimate a mean for the differenced series.
    pub include_constant: bool,
    /// Optimizer settings.
    pub options: FitOptions,
}

impl SarimaxSpec {
    /// Create a specification without a constant.
    pub fn new(order: ArimaOrder, seasonal: SeasonalOrder) -> Self {
        Self {
            order,
            seasonal,
            include_constant: false,
            options: FitOptions::default(),
        }
    }

    /// Specification with the orders of a forecast window.
    pub fn from_window(window: &ForecastWindow) -> Self {
        Self::new(window.order(), window.seasonal())
    }

    /// Toggle the constant term.
    pub fn with_constant(mut self, include_constant: bool) -> Self {
        self.include_constant = include_constant;
        self
    }

    /// Replace the optimizer settings.
    pub fn with_options(mut self, options: FitOptions) -> Self {
        self.options = options;
        self
    }

    /// Model label, e.g. `SARIMAX(2, 1, 2)x(2, 1, 2, 12)`.
    pub fn label(&self) -> String {
        format!("SARIMAX{}x{}", self.order, self.seasonal)
    }

    /// Number of estimated coefficients, excluding the innovation variance.
    pub fn num_coefficients(&self) -> usize {
        let seasonal = self.effective_seasonal();
        self.order.p + self.order.q + seasonal.p + seasonal.q + usize::from(self.include_constant)
    }

    /// Names of the estimated parameters, in the order they are reported.
    pub fn parameter_names(&self) -> Vec<String> {
        let seasonal = self.effective_seasonal();
        let mut names = Vec::with_capacity(self.num_coefficients() + 1);
        if self.include_constant {
            names.push("const".to_string());
        }
        names.extend((1..=self.order.p).map(|i| format!("ar.L{i}")));
        names.extend((1..=seasonal.p).map(|j| format!("ar.S.L{}", j * seasonal.s)));
        names.extend((1..=self.order.q).map(|i| format!("ma.L{i}")));
        names.extend((1..=seasonal.q).map(|j| format!("ma.S.L{}", j * seasonal.s)));
        names.push("sigma2".to_string());
        names
    }

    /// Seasonal order with inactive components zeroed out.
    fn effective_seasonal(&self) -> SeasonalOrder {
        if self.seasonal.is_active() {
            self.seasonal
        } else {
            SeasonalOrder::none()
        }
    }

    /// Fit the model to an ordered series.
    ///
    /// # Errors
    /// - `InvalidInput` for non-finite values.
    /// - `InvalidOrder` when seasonal terms lack a period, differencing
    ///   leaves fewer than two values, or too few values remain for the
    ///   longest lag plus the free parameters.
    /// - `ModelConvergence` when the optimizer runs out of iterations or
    ///   ends on a non-finite objective.
    pub fn fit(&self, values: &[f64]) -> Result<FittedSarimax> {
        if values.is_empty() {
            return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidInput(
                "model fit requires finite values".to_string(),
            ));
        }
        let structure = self.structure(values.len())?;

        let seasonal = self.effective_seasonal();
        let w = difference(
            &seasonal_difference(values, seasonal.d, seasonal.s),
            self.order.d,
        );
        let delta = differencing_polynomial(self.order.d, seasonal.d, seasonal.s);

        let scale = match variance(&w) {
            v if v.is_finite() && v > 0.0 => v,
            _ => 1.0,
        };
        let n_eff = (w.len() - structure.start) as f64;
        let objective = |params: &[f64]| {
            let css = structure.css(&w, params);
            if css.is_finite() {
                css / (n_eff * scale)
            } else {
                INVALID_OBJECTIVE
            }
        };

        let k = structure.num_params();
        let (params, iterations, converged) = if k == 0 {
            (Vec::new(), 0, true)
        } else {
            let max_iter = self
                .options
                .max_iterations
                .unwrap_or_else(|| default_iteration_budget(k));
            let result = nelder_mead(
                objective,
                &structure.initial_guess(&w),
                Some(&structure.bounds()),
                NelderMeadConfig {
                    max_iter,
                    tolerance: self.options.tolerance,
                    ..Default::default()
                },
            );
            tracing::debug!(
                iterations = result.iterations,
                objective = result.optimal_value,
                converged = result.converged,
                "Nelder-Mead finished"
            );
            if !result.converged
                || !result.optimal_value.is_finite()
                || result.optimal_value >= INVALID_OBJECTIVE
            {
                return Err(ForecastError::ModelConvergence {
                    iterations: result.iterations,
                });
            }
            (result.optimal_point, result.iterations, true)
        };

        let (mean_w, ar, ma) = structure.polynomials(&params);
        let recursion = Recursion {
            mean: mean_w,
            ar: ar.lag_terms(),
            ma: ma.lag_terms(),
        };
        let (w_fitted, w_residuals) = recursion.filter(&w, structure.start);

        let css: f64 = w_residuals[structure.start..].iter().map(|e| e * e).sum();
        let sigma2 = css / n_eff;
        let ln_2pi = (2.0 * std::f64::consts::PI).ln();
        let log_likelihood = -0.5 * n_eff * (ln_2pi + sigma2.ln() + 1.0);
        let n_ic = (k + 1) as f64;
        let aic = -2.0 * log_likelihood + 2.0 * n_ic;
        let bic = -2.0 * log_likelihood + n_ic * n_eff.ln();
        let hqic = -2.0 * log_likelihood + 2.0 * n_ic * n_eff.ln().ln();

        // Back on the level scale; the first `burn_in` points have no fit.
        let lag = delta.degree();
        let burn_in = lag + structure.start;
        let mut fitted_values = vec![f64::NAN; values.len()];
        let mut residuals = vec![f64::NAN; values.len()];
        for t in burn_in..values.len() {
            fitted_values[t] = undifference(w_fitted[t - lag], &values[..t], &delta);
            residuals[t] = values[t] - fitted_values[t];
        }

        let std_errors = structure.standard_errors(&w, &params, n_eff);

        Ok(FittedSarimax {
            spec: *self,
            names: self.parameter_names(),
            params,
            std_errors,
            sigma2,
            log_likelihood,
            aic,
            bic,
            hqic,
            values: values.to_vec(),
            differenced: w,
            innovations: w_residuals,
            fitted_values,
            residuals,
            delta,
            ar,
            ma,
            mean: mean_w,
            iterations,
            converged,
        })
    }

    /// Check the orders against a series of length `n`.
    fn structure(&self, n: usize) -> Result<ArmaStructure> {
        let seasonal = self.seasonal;
        if seasonal.is_active() && seasonal.s < 2 {
            return Err(ForecastError::InvalidOrder(format!(
                "seasonal order {} needs a seasonal period of at least 2",
                seasonal
            )));
        }
        let seasonal = self.effective_seasonal();

        let lost = self.order.d + seasonal.d * seasonal.s;
        if n < lost + 2 {
            return Err(ForecastError::InvalidOrder(format!(
                "differencing {} of {} observations leaves fewer than 2",
                lost, n
            )));
        }

        let structure = ArmaStructure {
            p: self.order.p,
            q: self.order.q,
            seasonal_p: seasonal.p,
            seasonal_q: seasonal.q,
            period: seasonal.s,
            include_constant: self.include_constant,
            start: self.order.p + seasonal.p * seasonal.s,
        };

        let m = n - lost;
        let max_lag = structure.start.max(self.order.q + seasonal.q * seasonal.s);
        if m <= max_lag + structure.num_params() {
            return Err(ForecastError::InvalidOrder(format!(
                "{} needs more than {} differenced observations, got {}",
                self.label(),
                max_lag + structure.num_params(),
                m
            )));
        }
        Ok(structure)
    }
}

/// Layout of the free parameter vector.
///
/// The vector holds `[const?, ar(p), seasonal ar(P), ma(q), seasonal ma(Q)]`.
#[derive(Debug, Clone, Copy)]
struct ArmaStructure {
    p: usize,
    q: usize,
    seasonal_p: usize,
    seasonal_q: usize,
    period: usize,
    include_constant: bool,
    /// First differenced index with a full AR history.
    start: usize,
}

impl ArmaStructure {
    fn num_params(&self) -> usize {
        usize::from(self.include_constant) + self.p + self.q + self.seasonal_p + self.seasonal_q
    }

    fn polynomials(&self, params: &[f64]) -> (f64, LagPolynomial, LagPolynomial) {
        let offset = usize::from(self.include_constant);
        let mean = if self.include_constant { params[0] } else { 0.0 };

        let (ar, rest) = params[offset..].split_at(self.p);
        let (seasonal_ar, rest) = rest.split_at(self.seasonal_p);
        let (ma, seasonal_ma) = rest.split_at(self.q);

        let ar_poly = LagPolynomial::from_lags(-1.0, ar, 1)
            .multiply(&LagPolynomial::from_lags(-1.0, seasonal_ar, self.period));
        let ma_poly = LagPolynomial::from_lags(1.0, ma, 1)
            .multiply(&LagPolynomial::from_lags(1.0, seasonal_ma, self.period));

        (mean, ar_poly, ma_poly)
    }

    /// Conditional sum of squares.
    fn css(&self, w: &[f64], params: &[f64]) -> f64 {
        let (mean, ar, ma) = self.polynomials(params);
        let recursion = Recursion {
            mean,
            ar: ar.lag_terms(),
            ma: ma.lag_terms(),
        };
        let (_, residuals) = recursion.filter(w, self.start);
        residuals[self.start..].iter().map(|e| e * e).sum()
    }

    fn initial_guess(&self, w: &[f64]) -> Vec<f64> {
        let mut initial = Vec::with_capacity(self.num_params());
        if self.include_constant {
            initial.push(mean(w));
        }
        for count in [self.p, self.seasonal_p, self.q, self.seasonal_q] {
            initial.extend((0..count).map(|i| 0.1 / (i + 1) as f64));
        }
        initial
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        let mut bounds = Vec::with_capacity(self.num_params());
        if self.include_constant {
            bounds.push((f64::NEG_INFINITY, f64::INFINITY));
        }
        let coefficients = self.num_params() - bounds.len();
        bounds.extend(std::iter::repeat((-COEFFICIENT_BOUND, COEFFICIENT_BOUND)).take(coefficients));
        bounds
    }

    /// Standard errors from the Hessian of the concentrated negative
    /// log-likelihood, followed by the one for `sigma2`.
    fn standard_errors(&self, w: &[f64], params: &[f64], n_eff: f64) -> Vec<f64> {
        let sigma2 = self.css(w, params) / n_eff;
        let sigma2_se = sigma2 * (2.0 / n_eff).sqrt();
        if params.is_empty() {
            return vec![sigma2_se];
        }

        let nll = |theta: &[f64]| 0.5 * n_eff * (self.css(w, theta) / n_eff).ln();
        let hessian = numerical_hessian(nll, params);
        let mut errors: Vec<f64> = match invert_symmetric(&hessian) {
            Some(cov) => (0..params.len())
                .map(|i| {
                    if cov[i][i] > 0.0 {
                        cov[i][i].sqrt()
                    } else {
                        f64::NAN
                    }
                })
                .collect(),
            None => vec![f64::NAN; params.len()],
        };
        errors.push(sigma2_se);
        errors
    }
}

/// One-step ARMA recursion on the differenced series.
struct Recursion<'a> {
    mean: f64,
    /// Lag terms of the AR polynomial (`1 + c_1 B + ...`).
    ar: &'a [f64],
    /// Lag terms of the MA polynomial.
    ma: &'a [f64],
}

impl Recursion<'_> {
    /// Prediction of `w[t]` from `w[..t]` and innovations `e[..t]`.
    fn step(&self, w: &[f64], e: &[f64], t: usize) -> f64 {
        let ar: f64 = self
            .ar
            .iter()
            .enumerate()
            .map(|(k, c)| c * (w[t - 1 - k] - self.mean))
            .sum();
        let ma: f64 = self
            .ma
            .iter()
            .enumerate()
            .take(t)
            .map(|(k, c)| c * e[t - 1 - k])
            .sum();
        self.mean - ar + ma
    }

    /// One-step fits and innovations from `start` on; innovations before
    /// `start` are zero and fits are `NaN`.
    fn filter(&self, w: &[f64], start: usize) -> (Vec<f64>, Vec<f64>) {
        let mut fitted = vec![f64::NAN; w.len()];
        let mut residuals = vec![0.0; w.len()];
        for t in start..w.len() {
            let prediction = self.step(w, &residuals, t);
            fitted[t] = prediction;
            residuals[t] = w[t] - prediction;
        }
        (fitted, residuals)
    }
}

/// A fitted seasonal ARIMA model.
#[derive(Debug, Clone)]
pub struct FittedSarimax {
    spec: SarimaxSpec,
    names: Vec<String>,
    params: Vec<f64>,
    std_errors: Vec<f64>,
    sigma2: f64,
    log_likelihood: f64,
    aic: f64,
    bic: f64,
    hqic: f64,
    values: Vec<f64>,
    differenced: Vec<f64>,
    innovations: Vec<f64>,
    fitted_values: Vec<f64>,
    residuals: Vec<f64>,
    delta: LagPolynomial,
    ar: LagPolynomial,
    ma: LagPolynomial,
    mean: f64,
    iterations: usize,
    converged: bool,
}

impl FittedSarimax {
    /// The specification that was fitted.
    pub fn spec(&self) -> &SarimaxSpec {
        &self.spec
    }

    /// Estimated parameters with standard errors, `sigma2` last.
    pub fn params(&self) -> Vec<ParameterEstimate> {
        self.params
            .iter()
            .chain(std::iter::once(&self.sigma2))
            .zip(&self.names)
            .zip(&self.std_errors)
            .map(|((&value, name), &std_error)| ParameterEstimate {
                name: name.clone(),
                coefficient: value,
                std_error,
            })
            .collect()
    }

    /// Look up a parameter by name, e.g. `ar.L1` or `sigma2`.
    pub fn param(&self, name: &str) -> Option<f64> {
        let index = self.names.iter().position(|n| n == name)?;
        Some(self.params.get(index).copied().unwrap_or(self.sigma2))
    }

    /// Innovation variance.
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Concentrated Gaussian log-likelihood.
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    pub fn aic(&self) -> f64 {
        self.aic
    }

    pub fn bic(&self) -> f64 {
        self.bic
    }

    pub fn hqic(&self) -> f64 {
        self.hqic
    }

    /// In-sample one-step residuals; `NaN` during burn-in.
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// In-sample one-step fits on the original scale; `NaN` during burn-in.
    pub fn fitted_values(&self) -> &[f64] {
        &self.fitted_values
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Structured report of the fit for a named dependent variable.
    pub fn summary(&self, dep_var: &str) -> ModelSummary {
        ModelSummary {
            dep_var: dep_var.to_string(),
            model: self.spec.label(),
            n_obs: self.values.len(),
            log_likelihood: self.log_likelihood,
            aic: self.aic,
            bic: self.bic,
            hqic: self.hqic,
            iterations: self.iterations,
            converged: self.converged,
            parameters: self.params(),
            ljung_box: ljung_box(&self.residuals, Some(1), 0),
            jarque_bera: jarque_bera(&self.residuals),
        }
    }

    /// Recursive forecasts for the `steps` points after the sample.
    fn forecast_path(&self, steps: usize) -> Vec<f64> {
        let recursion = Recursion {
            mean: self.mean,
            ar: self.ar.lag_terms(),
            ma: self.ma.lag_terms(),
        };
        let mut w = self.differenced.clone();
        let mut e = self.innovations.clone();
        let mut levels = self.values.clone();

        for _ in 0..steps {
            let t = w.len();
            let next = recursion.step(&w, &e, t);
            w.push(next);
            e.push(0.0);
            let level = undifference(next, &levels, &self.delta);
            levels.push(level);
        }

        levels.split_off(self.values.len())
    }
}

impl FittedModel for FittedSarimax {
    fn n_obs(&self) -> usize {
        self.values.len()
    }

    fn predict(&self, start: usize, end: usize) -> Result<Vec<f64>> {
        if start > end {
            return Err(ForecastError::InvalidInput(format!(
                "prediction start {start} is after end {end}"
            )));
        }
        let n = self.values.len();
        let mut predictions = Vec::with_capacity(end - start + 1);

        if start < n {
            predictions.extend_from_slice(&self.fitted_values[start..=end.min(n - 1)]);
        }
        if end >= n {
            let path = self.forecast_path(end - n + 1);
            predictions.extend(path.into_iter().skip(start.saturating_sub(n)));
        }
        Ok(predictions)
    }

    fn name(&self) -> &str {
        "SARIMAX"
    }
}
