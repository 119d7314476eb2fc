//! Benchmarks for the model fit and the analysis stages around it.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ticker_forecast::core::{ArimaOrder, SeasonalOrder};
use ticker_forecast::models::{FittedModel, SarimaxSpec};
use ticker_forecast::seasonality::seasonal_decompose;
use ticker_forecast::validation::check_stationarity;

fn generate_prices(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut level = 100.0;
    (0..n)
        .map(|i| {
            level += 0.05 + rng.gen_range(-1.0..1.0);
            level + 2.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin()
        })
        .collect()
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("sarimax_fit");
    group.sample_size(10);

    for size in [100, 250, 500].iter() {
        let prices = generate_prices(*size, 42);

        group.bench_with_input(BenchmarkId::new("ARIMA(1,1,1)", size), size, |b, _| {
            let spec = SarimaxSpec::new(ArimaOrder::new(1, 1, 1), SeasonalOrder::none());
            b.iter(|| spec.fit(black_box(&prices)))
        });

        group.bench_with_input(
            BenchmarkId::new("SARIMA(1,1,1)x(1,1,1,12)", size),
            size,
            |b, _| {
                let spec =
                    SarimaxSpec::new(ArimaOrder::new(1, 1, 1), SeasonalOrder::new(1, 1, 1, 12));
                b.iter(|| spec.fit(black_box(&prices)))
            },
        );
    }

    group.finish();
}

fn bench_forecast(c: &mut Criterion) {
    let prices = generate_prices(250, 7);
    let model = SarimaxSpec::new(ArimaOrder::new(2, 1, 2), SeasonalOrder::new(1, 1, 1, 12))
        .fit(&prices)
        .expect("benchmark series fits");

    c.bench_function("forecast_365", |b| b.iter(|| model.forecast(black_box(365))));
}

fn bench_diagnostics(c: &mut Criterion) {
    let mut group = c.benchmark_group("diagnostics");

    for size in [250, 1000].iter() {
        let prices = generate_prices(*size, 3);

        group.bench_with_input(BenchmarkId::new("adf", size), size, |b, _| {
            b.iter(|| check_stationarity(black_box(&prices)))
        });

        group.bench_with_input(BenchmarkId::new("decompose", size), size, |b, _| {
            b.iter(|| seasonal_decompose(black_box(&prices), 12))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fit, bench_forecast, bench_diagnostics);
criterion_main!(benches);
