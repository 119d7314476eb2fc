//! Statistical diagnostics for series and model residuals.
//!
//! # Example
//!
//! ```
//! use ticker_forecast::validation::{check_stationarity, ljung_box};
//!
//! let series: Vec<f64> = (0..60).map(|i| ((i * 7) % 11) as f64).collect();
//! let report = check_stationarity(&series).unwrap();
//! println!("ADF statistic {:.3}, p-value {:.3}", report.statistic, report.p_value);
//!
//! let residuals = vec![0.1, -0.2, 0.15, -0.1, 0.05, -0.08, 0.12, -0.15, 0.1, -0.05];
//! let lb = ljung_box(&residuals, Some(1), 0);
//! assert!(lb.statistic.is_finite());
//! ```

pub mod stationarity;

pub use residual_tests::{jarque_bera, ljung_box, JarqueBeraResult, LjungBoxResult};
pub use stationarity::{
    adf_test, check_stationarity, CriticalValues, StationarityReport, MIN_OBSERVATIONS,
    SIGNIFICANCE,
};
