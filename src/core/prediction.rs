//! Dated forecast output.

use crate::core::window::{validate_horizon, ForecastAnchor};
use crate::error::{ForecastError, Result};
use crate::models::FittedModel;
use chrono::{Duration, NaiveDate};

/// Name of the prediction value column.
pub const PREDICTED_MEAN: &str = "predicted_mean";

/// Forecast values stamped with consecutive calendar days.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionFrame {
    dates: Vec<NaiveDate>,
    predicted_mean: Vec<f64>,
}

impl PredictionFrame {
    /// Attach a daily date sequence starting at `start` to `values`.
    pub fn daily(start: NaiveDate, values: Vec<f64>) -> Result<Self> {
        let dates = daily_dates(start, values.len())?;
        Ok(Self {
            dates,
            predicted_mean: values,
        })
    }

    pub fn len(&self) -> usize {
        self.predicted_mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicted_mean.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn predicted_mean(&self) -> &[f64] {
        &self.predicted_mean
    }

    /// Iterate `(date, value)` rows.
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates
            .iter()
            .copied()
            .zip(self.predicted_mean.iter().copied())
    }
}

/// `count` consecutive days beginning at `start`.
pub fn daily_dates(start: NaiveDate, count: usize) -> Result<Vec<NaiveDate>> {
    (0..count)
        .map(|i| {
            start
                .checked_add_signed(Duration::days(i as i64))
                .ok_or_else(|| {
                    ForecastError::InvalidInput(format!(
                        "date range starting {} overflows the calendar",
                        start
                    ))
                })
        })
        .collect()
}

/// Forecast `horizon + 1` points past the observed data and date them.
///
/// Predictions cover the inclusive index range `[n, n + horizon]` where `n`
/// is the number of observations the model was fitted on. The dates form a
/// daily sequence whose first entry is `end_date` under
/// [`ForecastAnchor::EndDate`] or the following day under
/// [`ForecastAnchor::DayAfterEnd`].
pub fn forecast_window<M: FittedModel + ?Sized>(
    model: &M,
    horizon: usize,
    end_date: NaiveDate,
    anchor: ForecastAnchor,
) -> Result<PredictionFrame> {
    validate_horizon(horizon)?;

    let n = model.n_obs();
    let values = model.predict(n, n + horizon)?;

    let start = match anchor {
        ForecastAnchor::EndDate => end_date,
        ForecastAnchor::DayAfterEnd => end_date.succ_opt().ok_or_else(|| {
            ForecastError::InvalidInput(format!("no day after {}", end_date))
        })?,
    };

    PredictionFrame::daily(start, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Model that predicts its own index.
    struct IndexModel {
        n: usize,
    }

    impl FittedModel for IndexModel {
        fn n_obs(&self) -> usize {
            self.n
        }

        fn predict(&self, start: usize, end: usize) -> Result<Vec<f64>> {
            Ok((start..=end).map(|i| i as f64).collect())
        }

        fn name(&self) -> &str {
            "Index"
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_has_horizon_plus_one_rows() {
        let model = IndexModel { n: 50 };
        let frame = forecast_window(&model, 10, date(2025, 3, 16), ForecastAnchor::EndDate).unwrap();

        assert_eq!(frame.len(), 11);
        assert_eq!(frame.predicted_mean()[0], 50.0);
        assert_eq!(frame.predicted_mean()[10], 60.0);
    }

    #[test]
    fn window_starts_at_end_date_by_default() {
        let model = IndexModel { n: 5 };
        let frame =
            forecast_window(&model, 3, date(2025, 3, 16), ForecastAnchor::default()).unwrap();

        assert_eq!(
            frame.dates(),
            &[
                date(2025, 3, 16),
                date(2025, 3, 17),
                date(2025, 3, 18),
                date(2025, 3, 19)
            ]
        );
    }

    #[test]
    fn window_can_start_day_after() {
        let model = IndexModel { n: 5 };
        let frame =
            forecast_window(&model, 1, date(2024, 2, 28), ForecastAnchor::DayAfterEnd).unwrap();

        assert_eq!(frame.dates(), &[date(2024, 2, 29), date(2024, 3, 1)]);
    }

    #[test]
    fn window_rejects_bad_horizon() {
        let model = IndexModel { n: 5 };
        assert!(forecast_window(&model, 0, date(2024, 1, 1), ForecastAnchor::EndDate).is_err());
        assert!(forecast_window(&model, 366, date(2024, 1, 1), ForecastAnchor::EndDate).is_err());
    }

    #[test]
    fn daily_dates_cross_year_boundary() {
        let dates = daily_dates(date(2024, 12, 30), 3).unwrap();
        assert_eq!(
            dates,
            vec![date(2024, 12, 30), date(2024, 12, 31), date(2025, 1, 1)]
        );
    }

    #[test]
    fn rows_pair_dates_and_values() {
        let frame = PredictionFrame::daily(date(2024, 1, 1), vec![1.5, 2.5]).unwrap();
        let rows: Vec<_> = frame.rows().collect();
        assert_eq!(rows, vec![(date(2024, 1, 1), 1.5), (date(2024, 1, 2), 2.5)]);
    }
}
