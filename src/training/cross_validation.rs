//! K-fold cross-validation on the training partition

use crate::error::{BenchError, Result};
use crate::evaluation::mean_squared_error;
use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Number of folds used by the selection engine unless configured otherwise
pub const DEFAULT_FOLDS: usize = 5;

/// A single train/validation split
#[derive(Debug, Clone)]
pub struct CVSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
    pub fold_idx: usize,
}

/// K-fold splitter and fold runner
#[derive(Debug, Clone)]
pub struct CrossValidator {
    n_splits: usize,
    shuffle: bool,
    random_state: Option<u64>,
}

impl CrossValidator {
    /// Contiguous (unshuffled) k-fold
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: false,
            random_state: None,
        }
    }

    /// Shuffle rows before cutting folds, using the given seed
    pub fn with_shuffle(mut self, seed: u64) -> Self {
        self.shuffle = true;
        self.random_state = Some(seed);
        self
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Generate k folds over `n_samples` rows.
    ///
    /// The first `n_samples % k` folds hold one extra row.
    pub fn split(&self, n_samples: usize) -> Result<Vec<CVSplit>> {
        if self.n_splits < 2 {
            return Err(BenchError::invalid_parameter(
                "n_splits",
                self.n_splits,
                "must be at least 2",
            ));
        }
        if n_samples < self.n_splits {
            return Err(BenchError::ValidationError(format!(
                "n_samples ({}) must be >= n_splits ({})",
                n_samples, self.n_splits
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if self.shuffle {
            let mut rng = ChaCha8Rng::seed_from_u64(self.random_state.unwrap_or(0));
            indices.shuffle(&mut rng);
        }

        let base = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;

        let mut splits = Vec::with_capacity(self.n_splits);
        let mut current = 0;
        for fold_idx in 0..self.n_splits {
            let fold_size = if fold_idx < remainder { base + 1 } else { base };
            let test_indices = indices[current..current + fold_size].to_vec();
            let train_indices: Vec<usize> = indices[..current]
                .iter()
                .chain(indices[current + fold_size..].iter())
                .copied()
                .collect();

            splits.push(CVSplit {
                train_indices,
                test_indices,
                fold_idx,
            });
            current += fold_size;
        }

        Ok(splits)
    }

    /// Fit on each fold's training rows and score its held-out rows.
    ///
    /// `fit_predict(x_train, y_train, x_valid)` must return one prediction per
    /// validation row. Folds run in parallel and are collected in fold order;
    /// the first failing fold fails the whole evaluation.
    pub fn evaluate<F>(&self, x: &Array2<f64>, y: &Array1<f64>, fit_predict: F) -> Result<CVResult>
    where
        F: Fn(&Array2<f64>, &Array1<f64>, &Array2<f64>) -> Result<Array1<f64>> + Sync,
    {
        if x.nrows() != y.len() {
            return Err(BenchError::ShapeError {
                expected: format!("y length = {}", x.nrows()),
                actual: format!("y length = {}", y.len()),
            });
        }

        let splits = self.split(x.nrows())?;

        // Scored as negative MSE, higher is better
        let neg_mse: Vec<f64> = splits
            .par_iter()
            .map(|fold| {
                let x_train = x.select(Axis(0), &fold.train_indices);
                let y_train = y.select(Axis(0), &fold.train_indices);
                let x_valid = x.select(Axis(0), &fold.test_indices);
                let y_valid = y.select(Axis(0), &fold.test_indices);

                let predictions = fit_predict(&x_train, &y_train, &x_valid)?;
                Ok(-mean_squared_error(&y_valid, &predictions)?)
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(CVResult::from_neg_mse_scores(&neg_mse))
    }
}

impl Default for CrossValidator {
    fn default() -> Self {
        Self::new(DEFAULT_FOLDS)
    }
}

/// Cross-validation error of one candidate, reported as positive MSE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CVResult {
    /// Per-fold mean squared error
    pub fold_mse: Vec<f64>,
    pub mean_mse: f64,
    /// Population standard deviation across folds
    pub std_mse: f64,
    pub n_folds: usize,
}

impl CVResult {
    /// Build from per-fold MSE values
    pub fn from_mse_scores(fold_mse: Vec<f64>) -> Self {
        let n_folds = fold_mse.len();
        let mean_mse = fold_mse.iter().sum::<f64>() / n_folds as f64;
        let variance = fold_mse.iter().map(|s| (s - mean_mse).powi(2)).sum::<f64>() / n_folds as f64;

        Self {
            fold_mse,
            mean_mse,
            std_mse: variance.sqrt(),
            n_folds,
        }
    }

    /// Build from negative-MSE fold scores (sign flipped back)
    pub fn from_neg_mse_scores(scores: &[f64]) -> Self {
        Self::from_mse_scores(scores.iter().map(|s| -s).collect())
    }
}
