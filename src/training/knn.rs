//! K-nearest-neighbours regression
//!
//! Uniformly weighted mean of the `k` closest training targets under the
//! Euclidean metric. Distance ties are broken by training row order so that
//! predictions are reproducible.

use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{BenchError, Result};
use crate::training::models::Model;
use crate::utils::squared_euclidean;

/// K-nearest-neighbours regressor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KNNRegressor {
    n_neighbors: usize,
    n_features: usize,
    /// Training rows, row-major, `n_features` values each
    x_train: Vec<f64>,
    y_train: Vec<f64>,
}

impl KNNRegressor {
    pub fn new(n_neighbors: usize) -> Self {
        Self {
            n_neighbors,
            n_features: 0,
            x_train: Vec::new(),
            y_train: Vec::new(),
        }
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    /// Number of stored training rows
    pub fn n_samples_fit(&self) -> usize {
        self.y_train.len()
    }

    fn neighbour_mean(&self, point: &[f64]) -> f64 {
        let neighbours = find_k_nearest(point, &self.x_train, &self.y_train, self.n_features, self.n_neighbors);
        neighbours.iter().map(|n| n.target).sum::<f64>() / neighbours.len() as f64
    }
}

impl Model for KNNRegressor {
    /// Store the training data. `k` may not exceed the number of rows.
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(BenchError::ShapeError {
                expected: format!("y length = {}", x.nrows()),
                actual: format!("y length = {}", y.len()),
            });
        }
        if self.n_neighbors == 0 {
            return Err(BenchError::invalid_parameter("n_neighbors", 0, "must be at least 1"));
        }
        if x.ncols() == 0 {
            return Err(BenchError::InvalidInput("KNN needs at least one feature".to_string()));
        }
        if self.n_neighbors > x.nrows() {
            return Err(BenchError::TrainingError(format!(
                "n_neighbors ({}) exceeds the {} training rows",
                self.n_neighbors,
                x.nrows()
            )));
        }

        self.n_features = x.ncols();
        self.x_train = x.iter().copied().collect();
        self.y_train = y.to_vec();
        Ok(())
    }

    /// Predict every row in parallel
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.y_train.is_empty() {
            return Err(BenchError::ModelNotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(BenchError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        let predictions: Vec<f64> = (0..x.nrows())
            .into_par_iter()
            .map(|i| {
                let point = x.row(i).to_vec();
                self.neighbour_mean(&point)
            })
            .collect();

        Ok(Array1::from_vec(predictions))
    }
}

/// Max-heap entry; the farthest kept neighbour sits on top
#[derive(Debug, PartialEq)]
struct Neighbour {
    dist: f64,
    index: usize,
    target: f64,
}

impl Eq for Neighbour {}

impl PartialOrd for Neighbour {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbour {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist
            .partial_cmp(&other.dist)
            .unwrap_or(Ordering::Equal)
            .then(self.index.cmp(&other.index))
    }
}

/// Keep the k smallest distances in O(n log k)
fn find_k_nearest(
    point: &[f64],
    x_train: &[f64],
    y_train: &[f64],
    n_features: usize,
    k: usize,
) -> Vec<Neighbour> {
    let mut heap = BinaryHeap::with_capacity(k + 1);

    for (index, row) in x_train.chunks_exact(n_features).enumerate() {
        let candidate = Neighbour {
            dist: squared_euclidean(point, row),
            index,
            target: y_train[index],
        };
        if heap.len() < k {
            heap.push(candidate);
        } else if let Some(top) = heap.peek() {
            if candidate < *top {
                heap.pop();
                heap.push(candidate);
            }
        }
    }

    heap.into_vec()
}
