//! Seeded train/test partitioning

use crate::dataset::{Dataset, Partition};
use crate::error::{BenchError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Train and test sides of one split
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Partition,
    pub test: Partition,
}

/// Shuffle the row indices of `n` rows and cut off the test share.
///
/// The test side takes the first `round(n * test_fraction)` shuffled rows,
/// the train side keeps the remainder in shuffled order. The result only
/// depends on `(n, test_fraction, seed)`.
pub fn split_indices(n: usize, test_fraction: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(BenchError::invalid_parameter(
            "test_fraction",
            test_fraction,
            "must be strictly between 0 and 1",
        ));
    }

    let n_test = (n as f64 * test_fraction).round() as usize;
    if n_test == 0 || n_test >= n {
        return Err(BenchError::invalid_parameter(
            "test_fraction",
            test_fraction,
            format!("leaves an empty partition for {} rows", n),
        ));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok((train, indices))
}

/// Partition `dataset` into train and test sides around `target`.
///
/// Fails with `InvalidParameter` when `test_fraction` is outside `(0, 1)` and
/// with `FeatureNotFound` when `target` is not a column. Nothing is produced on
/// failure.
pub fn split(dataset: &Dataset, target: &str, test_fraction: f64, seed: u64) -> Result<TrainTestSplit> {
    let (train_rows, test_rows) = split_indices(dataset.n_rows(), test_fraction, seed)?;
    let target_idx = dataset.column_index(target)?;

    debug!(
        n_train = train_rows.len(),
        n_test = test_rows.len(),
        seed,
        "Split dataset"
    );

    Ok(TrainTestSplit {
        train: dataset.partition(target_idx, &train_rows),
        test: dataset.partition(target_idx, &test_rows),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use std::collections::HashSet;

    fn dataset(n: usize) -> Dataset {
        let values = Array2::from_shape_fn((n, 3), |(r, c)| (r * 3 + c) as f64);
        Dataset::new(vec!["a".into(), "b".into(), "y".into()], values).unwrap()
    }

    #[test]
    fn test_split_sizes_and_disjointness() {
        let (train, test) = split_indices(100, 0.2, 42).unwrap();
        assert_eq!(test.len(), 20);
        assert_eq!(train.len(), 80);

        let train_set: HashSet<_> = train.iter().copied().collect();
        let test_set: HashSet<_> = test.iter().copied().collect();
        assert!(train_set.is_disjoint(&test_set));
        assert_eq!(train_set.len() + test_set.len(), 100);
    }

    #[test]
    fn test_split_is_deterministic() {
        let first = split_indices(100, 0.2, 42).unwrap();
        let second = split_indices(100, 0.2, 42).unwrap();
        assert_eq!(first, second);

        let other_seed = split_indices(100, 0.2, 7).unwrap();
        assert_ne!(first.1, other_seed.1);
    }

    #[test]
    fn test_split_rounds_test_size() {
        // 0.25 * 10 = 2.5 rounds half away from zero
        let (train, test) = split_indices(10, 0.25, 1).unwrap();
        assert_eq!(test.len(), 3);
        assert_eq!(train.len(), 7);
    }

    #[test]
    fn test_invalid_fraction() {
        for bad in [1.5, 0.0, 1.0, -0.1, f64::NAN] {
            let err = split_indices(100, bad, 42).unwrap_err();
            assert!(matches!(err, BenchError::InvalidParameter { .. }));
        }
    }

    #[test]
    fn test_empty_partition_rejected() {
        assert!(split_indices(2, 0.1, 42).is_err());
        assert!(split_indices(2, 0.9, 42).is_err());
    }

    #[test]
    fn test_split_dataset_partitions() {
        let ds = dataset(50);
        let parts = split(&ds, "y", 0.2, 42).unwrap();
        assert_eq!(parts.test.n_rows(), 10);
        assert_eq!(parts.train.n_rows(), 40);
        assert_eq!(parts.train.feature_names, vec!["a", "b"]);

        // Target values follow their source rows
        for (pos, &row) in parts.test.row_indices.iter().enumerate() {
            assert_eq!(parts.test.y[pos], (row * 3 + 2) as f64);
        }
    }

    #[test]
    fn test_split_missing_target() {
        let err = split(&dataset(10), "price", 0.2, 42).unwrap_err();
        assert!(matches!(err, BenchError::FeatureNotFound(_)));
    }
}
