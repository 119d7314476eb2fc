//! Interface shared by fitted forecasting models.

use crate::error::Result;

/// A model that has been fitted to an ordered series of observations.
///
/// Observation indices run from `0` to `n_obs() - 1`; anything from
/// `n_obs()` on is out of sample. The trait is object-safe and can be used
/// as `&dyn FittedModel`.
pub trait FittedModel {
    /// Number of observations the model was fitted on.
    fn n_obs(&self) -> usize;

    /// Predictions for the inclusive index range `[start, end]`.
    ///
    /// In-sample indices give one-step-ahead fits, out-of-sample indices
    /// give recursive forecasts.
    fn predict(&self, start: usize, end: usize) -> Result<Vec<f64>>;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Forecast the next `horizon` values after the sample.
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        if horizon == 0 {
            return Ok(Vec::new());
        }
        let n = self.n_obs();
        self.predict(n, n + horizon - 1)
    }
}
