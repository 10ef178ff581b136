//! Integration test: preprocessing and exploratory analysis

use ndarray::Array2;
use regression_bench::analysis::{analyze_distribution, correlation_matrix, describe, strong_correlations};
use regression_bench::dataset::Dataset;
use regression_bench::error::BenchError;
use regression_bench::preprocessing::{
    detect_outliers, handle_missing, normalize_columns, ImputeStrategy, OutlierMethod, ScalerType,
};

fn raw() -> Dataset {
    let mut values = Array2::from_shape_fn((30, 3), |(r, c)| match c {
        0 => (r % 10) as f64,
        1 => 2.0 * (r % 10) as f64 + 1.0,
        _ => ((r * 13) % 7) as f64,
    });
    values[[4, 0]] = f64::NAN;
    values[[9, 2]] = 500.0;
    Dataset::new(vec!["a".into(), "b".into(), "target".into()], values).unwrap()
}

#[test]
fn test_clean_then_normalize() {
    let cleaned = handle_missing(&raw(), ImputeStrategy::Median).unwrap();
    assert!(cleaned.values().iter().all(|v| !v.is_nan()));

    let scaled = normalize_columns(&cleaned, &["a", "b"], ScalerType::MinMax).unwrap();
    for name in ["a", "b"] {
        let col = scaled.column(name).unwrap();
        let min = col.iter().copied().fold(f64::INFINITY, f64::min);
        let max = col.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(min.abs() < 1e-12);
        assert!((max - 1.0).abs() < 1e-12);
    }
    // target untouched
    assert_eq!(scaled.column("target").unwrap(), cleaned.column("target").unwrap());
}

#[test]
fn test_strategy_names_fail_fast() {
    assert!(matches!("average".parse::<ImputeStrategy>(), Err(BenchError::ConfigError(_))));
    assert!(matches!("robust".parse::<ScalerType>(), Err(BenchError::ConfigError(_))));
    assert!(matches!("dbscan".parse::<OutlierMethod>(), Err(BenchError::ConfigError(_))));
}

#[test]
fn test_outlier_row_found_by_both_methods() {
    let ds = raw();
    assert_eq!(detect_outliers(&ds, "target", OutlierMethod::Iqr).unwrap(), vec![9]);
    assert_eq!(detect_outliers(&ds, "target", OutlierMethod::ZScore).unwrap(), vec![9]);
}

#[test]
fn test_analysis_on_raw_data() {
    let ds = raw();
    let stats = describe(&ds);
    assert_eq!(stats.len(), 3);
    assert_eq!(stats[0].count, 29);

    let pairs = strong_correlations(&correlation_matrix(&ds), 0.7);
    assert_eq!(pairs.len(), 1);
    assert_eq!((pairs[0].first.as_str(), pairs[0].second.as_str()), ("a", "b"));

    let dist = analyze_distribution(&ds, "target").unwrap();
    assert_eq!(dist.n, 30);
    assert!(dist.normality.is_some());
    assert!(dist.skewness.unwrap() > 1.0);
}
