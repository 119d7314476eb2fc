//! Numerical utilities shared by the diagnostics and the model.

pub mod ols;
pub mod optimization;
pub mod stats;

pub use ols::{invert_symmetric, ols_fit, solve_symmetric, OLSResult};
pub use optimization::{nelder_mead, numerical_hessian, NelderMeadConfig, NelderMeadResult};
pub use stats::{autocorrelation, mean, nan_mean, normal_cdf, variance};
