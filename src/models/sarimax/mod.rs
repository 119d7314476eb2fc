//! Seasonal ARIMA (SARIMAX family, no exogenous regressors).
//!
//! This module provides:
//! - Regular and seasonal differencing with exact inversion
//! - Multiplicative lag polynomials `φ(B)Φ(B^s)` and `θ(B)Θ(B^s)`
//! - Conditional-sum-of-squares estimation with Nelder-Mead
//! - A printable model summary
//!
//! # Example
//!
//! ```
//! use ticker_forecast::core::{ArimaOrder, SeasonalOrder};
//! use ticker_forecast::models::sarimax::SarimaxSpec;
//! use ticker_forecast::models::FittedModel;
//!
//! let values: Vec<f64> = (0..60).map(|i| 10.0 + i as f64 + (i % 3) as f64).collect();
//! let model = SarimaxSpec::new(ArimaOrder::new(0, 1, 0), SeasonalOrder::none())
//!     .fit(&values)
//!     .unwrap();
//! let forecast = model.forecast(3).unwrap();
//! assert_eq!(forecast.len(), 3);
//! ```

mod diff;
mod model;
mod polynomial;
mod summary;

pub use diff::{difference, differencing_polynomial, seasonal_difference, undifference};
pub use model::{default_iteration_budget, FitOptions, FittedSarimax, SarimaxSpec};
pub use polynomial::LagPolynomial;
pub use summary::{ModelSummary, ParameterEstimate};
