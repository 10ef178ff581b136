//! Pearson correlation between columns

use crate::dataset::Dataset;
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Default |r| above which a pair is reported as strongly correlated
pub const STRONG_CORRELATION: f64 = 0.7;

/// Square correlation matrix labelled by column name
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// NaN where a coefficient is undefined (constant column, < 2 shared rows)
    pub values: Array2<f64>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[[i, j]])
    }
}

/// A column pair whose correlation exceeds the threshold in absolute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelatedPair {
    pub first: String,
    pub second: String,
    pub coefficient: f64,
}

/// Pearson r over rows where both cells are present
pub fn pearson(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(x, y)| (*x, *y))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    if var_a == 0.0 || var_b == 0.0 {
        return f64::NAN;
    }
    (cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0)
}

pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
    let n = dataset.n_columns();
    let data = dataset.values();
    let mut values = Array2::from_elem((n, n), f64::NAN);

    for i in 0..n {
        for j in i..n {
            let r = pearson(data.column(i), data.column(j));
            values[[i, j]] = r;
            values[[j, i]] = r;
        }
    }

    CorrelationMatrix {
        columns: dataset.columns().to_vec(),
        values,
    }
}

/// Pairs (i < j in column order) with |r| strictly above `threshold`
pub fn strong_correlations(matrix: &CorrelationMatrix, threshold: f64) -> Vec<CorrelatedPair> {
    let n = matrix.columns.len();
    let mut pairs = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let r = matrix.values[[i, j]];
            if !r.is_nan() && r.abs() > threshold {
                pairs.push(CorrelatedPair {
                    first: matrix.columns[i].clone(),
                    second: matrix.columns[j].clone(),
                    coefficient: r,
                });
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn sample() -> Dataset {
        let values = Array2::from_shape_fn((10, 4), |(r, c)| {
            let x = r as f64;
            match c {
                0 => x,
                1 => -2.0 * x + 1.0,
                2 => ((r * 7) % 3) as f64,
                _ => 5.0,
            }
        });
        Dataset::new(vec!["x".into(), "neg".into(), "noise".into(), "flat".into()], values).unwrap()
    }

    #[test]
    fn test_perfect_correlations() {
        let m = correlation_matrix(&sample());
        assert!((m.get("x", "x").unwrap() - 1.0).abs() < 1e-12);
        assert!((m.get("x", "neg").unwrap() + 1.0).abs() < 1e-12);
        assert!(m.get("x", "flat").unwrap().is_nan());
        assert_eq!(m.get("x", "missing"), None);
    }

    #[test]
    fn test_strong_pairs() {
        let pairs = strong_correlations(&correlation_matrix(&sample()), STRONG_CORRELATION);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].first, "x");
        assert_eq!(pairs[0].second, "neg");
        assert!(pairs[0].coefficient < -0.99);
    }

    #[test]
    fn test_missing_cells_skipped() {
        let a = ndarray::array![1.0, 2.0, f64::NAN, 4.0];
        let b = ndarray::array![2.0, 4.0, 100.0, 8.0];
        assert!((pearson(a.view(), b.view()) - 1.0).abs() < 1e-12);
    }
}
