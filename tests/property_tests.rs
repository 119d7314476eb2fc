//! Property-based tests for normalization, dating and forecasting.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated frames and series.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use ticker_forecast::core::{
    daily_dates, forecast_window, normalize, ArimaOrder, ColumnLabel, ForecastAnchor, RawColumn,
    RawFrame, SeasonalOrder,
};
use ticker_forecast::models::{FittedModel, SarimaxSpec};
use ticker_forecast::seasonality::seasonal_decompose;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Label levels made of short words with optional surrounding blanks.
fn label_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[ ]?[A-Za-z]{1,6}[ ]?", 1..4)
}

/// Day offsets in arbitrary order, possibly repeated.
fn offsets_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..400, 1..60)
}

/// Random walk with drift, never constant.
fn walk_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0..1.0_f64, min_len..max_len).prop_map(|steps| {
        let mut level = 100.0;
        steps
            .iter()
            .enumerate()
            .map(|(i, s)| {
                level += s + 0.01 * i as f64;
                level
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Flattening a label twice gives the same result as once.
    #[test]
    fn flatten_is_idempotent(levels in label_strategy()) {
        let once = ColumnLabel::hierarchical(levels).flatten();
        let twice = ColumnLabel::flat(once.clone()).flatten();
        prop_assert_eq!(once, twice);
    }

    /// Normalized dates are strictly increasing and labels are flat.
    #[test]
    fn normalized_dates_strictly_increase(offsets in offsets_strategy()) {
        let index: Vec<NaiveDate> = offsets.iter().map(|d| base_date() + Duration::days(*d)).collect();
        let values: Vec<f64> = (0..index.len()).map(|i| i as f64).collect();
        let raw = RawFrame::new(
            "TEST",
            index,
            vec![RawColumn::new(ColumnLabel::hierarchical(["Close", "TEST"]), values)],
        )
        .unwrap();

        let frame = normalize(raw).unwrap();
        prop_assert!(frame.dates().windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(frame.value_columns(), vec!["Close TEST"]);

        let mut unique = offsets.clone();
        unique.sort_unstable();
        unique.dedup();
        prop_assert_eq!(frame.len(), unique.len());
    }

    /// Daily dates step by exactly one day from the start.
    #[test]
    fn daily_dates_step_one_day(offset in 0i64..3650, count in 1usize..366) {
        let start = base_date() + Duration::days(offset);
        let dates = daily_dates(start, count).unwrap();
        prop_assert_eq!(dates.len(), count);
        prop_assert_eq!(dates[0], start);
        prop_assert!(dates.windows(2).all(|w| w[1] - w[0] == Duration::days(1)));
    }

    /// Every valid horizon yields horizon + 1 dated predictions.
    #[test]
    fn forecast_window_has_horizon_plus_one_rows(
        values in walk_strategy(40, 80),
        horizon in 1usize..=365,
        day_after in any::<bool>(),
    ) {
        let model = SarimaxSpec::new(ArimaOrder::new(0, 1, 0), SeasonalOrder::none())
            .fit(&values)
            .unwrap();
        let anchor = if day_after { ForecastAnchor::DayAfterEnd } else { ForecastAnchor::EndDate };
        let end = NaiveDate::from_ymd_opt(2025, 3, 16).unwrap();

        let predictions = forecast_window(&model, horizon, end, anchor).unwrap();

        prop_assert_eq!(predictions.len(), horizon + 1);
        let first = if day_after { end + Duration::days(1) } else { end };
        prop_assert_eq!(predictions.dates()[0], first);
        prop_assert!(predictions.predicted_mean().iter().all(|v| v.is_finite()));
    }

    /// A shorter forecast is a prefix of a longer one.
    #[test]
    fn forecasts_are_prefix_stable(values in walk_strategy(40, 80), h1 in 1usize..30, h2 in 1usize..30) {
        let model = SarimaxSpec::new(ArimaOrder::new(1, 1, 0), SeasonalOrder::none())
            .fit(&values)
            .unwrap();
        let a = model.forecast(h1).unwrap();
        let b = model.forecast(h2).unwrap();
        let shared = h1.min(h2);
        prop_assert_eq!(&a[..shared], &b[..shared]);
    }

    /// Decomposition components add back to the input where defined.
    #[test]
    fn decomposition_adds_back(values in walk_strategy(24, 100)) {
        let decomposition = seasonal_decompose(&values, 12).unwrap();
        for (i, y) in values.iter().enumerate() {
            let t = decomposition.trend[i];
            if t.is_finite() {
                let total = t + decomposition.seasonal[i] + decomposition.residual[i];
                prop_assert!((total - y).abs() < 1e-9);
            }
        }
    }
}
