//! Forecasting models.

mod traits;

pub mod sarimax;

pub use sarimax::{FittedSarimax, ModelSummary, SarimaxSpec};
pub use traits::FittedModel;
