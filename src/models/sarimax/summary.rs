//! Text report of a fitted model.

use crate::utils::stats::normal_cdf;
use crate::validation::{JarqueBeraResult, LjungBoxResult};
use std::fmt;

const WIDTH: usize = 78;

/// One estimated parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterEstimate {
    /// Parameter name, e.g. `ar.L1`.
    pub name: String,
    /// Point estimate.
    pub coefficient: f64,
    /// Standard error; `NaN` when the Hessian is not positive definite.
    pub std_error: f64,
}

impl ParameterEstimate {
    /// Wald z statistic.
    pub fn z(&self) -> f64 {
        self.coefficient / self.std_error
    }

    /// Two-sided p-value of the z statistic.
    pub fn p_value(&self) -> f64 {
        let z = self.z();
        if z.is_nan() {
            return f64::NAN;
        }
        2.0 * (1.0 - normal_cdf(z.abs()))
    }
}

/// Structured and printable summary of a fitted SARIMAX model.
#[derive(Debug, Clone)]
pub struct ModelSummary {
    pub dep_var: String,
    /// Model label, e.g. `SARIMAX(2, 1, 2)x(2, 1, 2, 12)`.
    pub model: String,
    pub n_obs: usize,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub hqic: f64,
    pub iterations: usize,
    pub converged: bool,
    pub parameters: Vec<ParameterEstimate>,
    /// Ljung-Box test at lag 1 on the residuals.
    pub ljung_box: LjungBoxResult,
    /// Jarque-Bera normality test on the residuals.
    pub jarque_bera: JarqueBeraResult,
}

impl ModelSummary {
    /// Parameter estimate by name.
    pub fn parameter(&self, name: &str) -> Option<&ParameterEstimate> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// Writes a `left` / `right` pair of label-value columns.
fn pair(f: &mut fmt::Formatter<'_>, left: (&str, String), right: (&str, String)) -> fmt::Result {
    writeln!(
        f,
        "{:<20}{:>18}   {:<18}{:>19}",
        left.0, left.1, right.0, right.1
    )
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let double = "=".repeat(WIDTH);
        let single = "-".repeat(WIDTH);

        writeln!(f, "{:^width$}", "SARIMAX Results", width = WIDTH)?;
        writeln!(f, "{double}")?;
        pair(
            f,
            ("Dep. Variable:", self.dep_var.clone()),
            ("No. Observations:", self.n_obs.to_string()),
        )?;
        pair(
            f,
            ("Model:", String::new()),
            ("Log Likelihood", format!("{:.3}", self.log_likelihood)),
        )?;
        writeln!(f, "  {}", self.model)?;
        pair(
            f,
            ("Iterations:", self.iterations.to_string()),
            ("AIC", format!("{:.3}", self.aic)),
        )?;
        pair(
            f,
            ("Converged:", self.converged.to_string()),
            ("BIC", format!("{:.3}", self.bic)),
        )?;
        pair(
            f,
            ("", String::new()),
            ("HQIC", format!("{:.3}", self.hqic)),
        )?;
        writeln!(f, "{double}")?;

        writeln!(
            f,
            "{:<12}{:>12}{:>12}{:>10}{:>10}",
            "", "coef", "std err", "z", "P>|z|"
        )?;
        writeln!(f, "{single}")?;
        for p in &self.parameters {
            writeln!(
                f,
                "{:<12}{:>12.4}{:>12.4}{:>10.3}{:>10.3}",
                p.name,
                p.coefficient,
                p.std_error,
                p.z(),
                p.p_value()
            )?;
        }
        writeln!(f, "{double}")?;

        pair(
            f,
            ("Ljung-Box (L1) (Q):", format!("{:.2}", self.ljung_box.statistic)),
            ("Jarque-Bera (JB):", format!("{:.2}", self.jarque_bera.statistic)),
        )?;
        pair(
            f,
            ("Prob(Q):", format!("{:.2}", self.ljung_box.p_value)),
            ("Prob(JB):", format!("{:.2}", self.jarque_bera.p_value)),
        )?;
        pair(
            f,
            ("Skew:", format!("{:.2}", self.jarque_bera.skewness)),
            ("Kurtosis:", format!("{:.2}", self.jarque_bera.kurtosis)),
        )?;
        write!(f, "{double}")
    }
}
