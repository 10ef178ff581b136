use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use regression_bench::dataset::Dataset;
use regression_bench::training::{
    split, train_final, CrossValidator, Hyperparameter, ModelFamily, SelectionConfig, SelectionEngine, Sweeper,
};

fn create_regression_data(n_rows: usize, n_features: usize) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let x = Array2::from_shape_fn((n_rows, n_features), |_| rng.gen::<f64>() * 10.0);

    // Create target as sum of features + noise
    let y: Array1<f64> = x
        .rows()
        .into_iter()
        .map(|row| row.sum() + rng.gen::<f64>() * 0.1)
        .collect();

    let names = (0..n_features).map(|i| format!("feature_{}", i)).collect();
    Dataset::from_features_and_target(names, x, "target", y).unwrap()
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");
    group.sample_size(10); // Fewer samples for training benchmarks

    for n_rows in [500, 2000].iter() {
        let ds = create_regression_data(*n_rows, 8);
        let parts = split(&ds, "target", 0.2, 42).unwrap();
        let sweeper = Sweeper::new(CrossValidator::default());

        for family in [ModelFamily::Knn, ModelFamily::DecisionTree] {
            let grid = family.default_grid();
            group.bench_with_input(
                BenchmarkId::new(family.as_str(), n_rows),
                &parts.train,
                |b, train| b.iter(|| sweeper.sweep(family, black_box(train), &grid).unwrap()),
            );
        }
    }

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prediction");

    // Train model once
    let ds = create_regression_data(5000, 8);
    let parts = split(&ds, "target", 0.2, 42).unwrap();
    let knn = train_final(ModelFamily::Knn, &Hyperparameter::NNeighbors(5), &parts.train).unwrap();

    for n_rows in [100, 1000].iter() {
        let test = create_regression_data(*n_rows, 8);
        let x = test.values().slice(ndarray::s![.., ..8]).to_owned();

        group.bench_with_input(BenchmarkId::new("knn_predict", n_rows), &x, |b, x| {
            b.iter(|| knn.predict(black_box(x)).unwrap())
        });
    }

    group.finish();
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");
    group.sample_size(10);

    let ds = create_regression_data(1000, 8);
    group.bench_function("all_families", |b| {
        b.iter(|| {
            SelectionEngine::new(SelectionConfig::new("target"))
                .run(black_box(&ds))
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_sweep, bench_prediction, bench_selection);
criterion_main!(benches);
