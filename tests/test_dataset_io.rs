//! Integration test: dataset CSV persistence

use ndarray::{array, Array1, Array2};
use regression_bench::dataset::Dataset;
use regression_bench::error::BenchError;
use std::fs;

fn sample() -> Dataset {
    let x = Array2::from_shape_fn((6, 2), |(r, c)| (r * 2 + c) as f64 + 0.25);
    let y = Array1::from_iter((0..6).map(|r| r as f64 * 1.5));
    Dataset::from_features_and_target(vec!["MedInc".into(), "HouseAge".into()], x, "MedHouseVal", y).unwrap()
}

#[test]
fn test_csv_roundtrip_keeps_target_last() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("housing.csv");

    let ds = sample();
    ds.save_csv(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(header, "MedInc,HouseAge,MedHouseVal");

    let loaded = Dataset::load_csv(&path).unwrap();
    assert_eq!(loaded.columns(), ds.columns());
    assert_eq!(loaded.n_rows(), 6);
    for (a, b) in loaded.values().iter().zip(ds.values().iter()) {
        assert!((a - b).abs() < 1e-12);
    }
}

#[test]
fn test_empty_cells_load_as_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gaps.csv");
    fs::write(&path, "a,b,target\n1.0,2.0,3.0\n,5.0,6.0\n7.0,,9.0\n").unwrap();

    let ds = Dataset::load_csv(&path).unwrap();
    assert!(ds.values()[[1, 0]].is_nan());
    assert!(ds.values()[[2, 1]].is_nan());

    let info = ds.info();
    assert_eq!(info.n_rows, 3);
    assert_eq!(info.missing[0].count, 1);
    assert_eq!(info.missing[2].count, 0);
}

#[test]
fn test_integer_columns_are_numeric() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ints.csv");
    fs::write(&path, "rooms,target\n3,1.5\n4,2.5\n").unwrap();

    let ds = Dataset::load_csv(&path).unwrap();
    assert_eq!(ds.values(), &array![[3.0, 1.5], [4.0, 2.5]]);
}

#[test]
fn test_text_column_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("text.csv");
    fs::write(&path, "city,target\nRome,1.0\nMilan,2.0\n").unwrap();

    let err = Dataset::load_csv(&path).unwrap_err();
    assert!(matches!(err, BenchError::DataError(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Dataset::load_csv(dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, BenchError::IoError(_)));
}
