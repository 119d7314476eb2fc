//! Seasonal decomposition.
//!
//! Classical additive decomposition into trend, seasonal and residual parts.

mod classical;

pub use classical::{seasonal_decompose, Decomposition};

/// Period the pipeline decomposes with.
pub const DEFAULT_PERIOD: usize = 12;
