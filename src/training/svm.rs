//! Epsilon-insensitive support vector regression
//!
//! The dual is solved by randomised coordinate descent with the bias folded
//! into the kernel (`K + 1`), which removes the equality constraint and leaves
//! box constraints `-C <= beta_i <= C` plus an L1 term for the tube width.

use crate::error::{BenchError, Result};
use crate::training::models::Model;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Kernel selected by name in the hyperparameter grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SvrKernel {
    Linear,
    Rbf,
    #[serde(rename = "poly")]
    Polynomial,
}

impl SvrKernel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SvrKernel::Linear => "linear",
            SvrKernel::Rbf => "rbf",
            SvrKernel::Polynomial => "poly",
        }
    }
}

impl fmt::Display for SvrKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SvrKernel {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(SvrKernel::Linear),
            "rbf" => Ok(SvrKernel::Rbf),
            "poly" | "polynomial" => Ok(SvrKernel::Polynomial),
            other => Err(BenchError::ConfigError(format!(
                "unsupported kernel '{}', expected linear, rbf or poly",
                other
            ))),
        }
    }
}

/// Kernel with its coefficients resolved against the training data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KernelType {
    /// K(x, y) = x · y
    Linear,
    /// K(x, y) = (γ x · y + r)^d
    Polynomial { degree: i32, gamma: f64, coef0: f64 },
    /// K(x, y) = exp(-γ ||x - y||²)
    RBF { gamma: f64 },
}

impl KernelType {
    fn eval(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
        match self {
            KernelType::Linear => a.dot(&b),
            KernelType::Polynomial { degree, gamma, coef0 } => (gamma * a.dot(&b) + coef0).powi(*degree),
            KernelType::RBF { gamma } => {
                let norm_sq: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum();
                (-gamma * norm_sq).exp()
            }
        }
    }
}

/// SVR settings other than the kernel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SVRConfig {
    /// Box constraint
    pub c: f64,
    /// Half-width of the insensitive tube
    pub epsilon: f64,
    /// Polynomial kernel degree
    pub degree: i32,
    /// Polynomial kernel offset
    pub coef0: f64,
    /// Stop when no coordinate moves the objective by more than this
    pub tol: f64,
    /// Maximum number of passes over the coordinates
    pub max_iter: usize,
    pub random_state: u64,
    /// Memory budget for cached kernel columns, in megabytes
    #[serde(default = "default_cache_size_mb")]
    pub cache_size_mb: usize,
}

fn default_cache_size_mb() -> usize {
    200
}

impl Default for SVRConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            epsilon: 0.1,
            degree: 3,
            coef0: 0.0,
            tol: 1e-3,
            max_iter: 1000,
            random_state: 42,
            cache_size_mb: default_cache_size_mb(),
        }
    }
}

/// Support vector regressor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SVMRegressor {
    kernel: SvrKernel,
    config: SVRConfig,
    resolved: Option<KernelType>,
    support_vectors: Option<Array2<f64>>,
    dual_coef: Option<Array1<f64>>,
    intercept: f64,
    converged: bool,
}

impl SVMRegressor {
    pub fn new(kernel: SvrKernel) -> Self {
        Self::with_config(kernel, SVRConfig::default())
    }

    pub fn with_config(kernel: SvrKernel, config: SVRConfig) -> Self {
        Self {
            kernel,
            config,
            resolved: None,
            support_vectors: None,
            dual_coef: None,
            intercept: 0.0,
            converged: false,
        }
    }

    pub fn kernel(&self) -> SvrKernel {
        self.kernel
    }

    pub fn n_support_vectors(&self) -> usize {
        self.support_vectors.as_ref().map_or(0, |sv| sv.nrows())
    }

    /// Whether the last fit met the tolerance before `max_iter`
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// `gamma = 1 / (n_features * Var(X))`, or 1 for constant input
    fn scale_gamma(x: &Array2<f64>) -> f64 {
        let variance = x.var(0.0);
        if variance > 0.0 && variance.is_finite() {
            1.0 / (x.ncols() as f64 * variance)
        } else {
            1.0
        }
    }

    fn resolve_kernel(&self, x: &Array2<f64>) -> KernelType {
        match self.kernel {
            SvrKernel::Linear => KernelType::Linear,
            SvrKernel::Rbf => KernelType::RBF { gamma: Self::scale_gamma(x) },
            SvrKernel::Polynomial => KernelType::Polynomial {
                degree: self.config.degree,
                gamma: Self::scale_gamma(x),
                coef0: self.config.coef0,
            },
        }
    }
}

/// Columns of the bias-augmented Gram matrix `K + 1`, computed on demand.
///
/// The full n×n matrix is never materialised. At most `capacity` columns are
/// held at once and the oldest one is evicted first.
struct KernelColumns<'a> {
    kernel: &'a KernelType,
    x: &'a Array2<f64>,
    cache: HashMap<usize, Array1<f64>>,
    order: VecDeque<usize>,
    capacity: usize,
}

impl<'a> KernelColumns<'a> {
    fn new(kernel: &'a KernelType, x: &'a Array2<f64>, cache_size_mb: usize) -> Self {
        let column_bytes = x.nrows().max(1) * std::mem::size_of::<f64>();
        let capacity = (cache_size_mb * 1024 * 1024 / column_bytes).max(1);
        Self {
            kernel,
            x,
            cache: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    fn diagonal(&self) -> Array1<f64> {
        self.x
            .rows()
            .into_iter()
            .map(|row| self.kernel.eval(row, row) + 1.0)
            .collect()
    }

    fn column(&mut self, i: usize) -> &Array1<f64> {
        if !self.cache.contains_key(&i) {
            if self.cache.len() >= self.capacity {
                if let Some(evicted) = self.order.pop_front() {
                    self.cache.remove(&evicted);
                }
            }
            self.order.push_back(i);
        }
        let (kernel, x) = (self.kernel, self.x);
        self.cache.entry(i).or_insert_with(|| {
            let anchor = x.row(i);
            Array1::from_vec(
                (0..x.nrows())
                    .into_par_iter()
                    .map(|j| kernel.eval(anchor, x.row(j)) + 1.0)
                    .collect(),
            )
        })
    }
}

fn soft_threshold(value: f64, threshold: f64) -> f64 {
    if value > threshold {
        value - threshold
    } else if value < -threshold {
        value + threshold
    } else {
        0.0
    }
}

impl Model for SVMRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n = x.nrows();

        if n != y.len() {
            return Err(BenchError::ShapeError {
                expected: format!("y length = {}", n),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n == 0 {
            return Err(BenchError::InvalidInput("cannot fit on zero rows".to_string()));
        }

        let kernel = self.resolve_kernel(x);
        let mut columns = KernelColumns::new(&kernel, x, self.config.cache_size_mb);
        let diag = columns.diagonal();
        debug!(n_samples = n, cached_columns = columns.capacity, "fitting SVR");

        let c = self.config.c;
        let eps = self.config.epsilon;
        let mut beta = Array1::<f64>::zeros(n);
        // Running K~ beta
        let mut fitted = Array1::<f64>::zeros(n);

        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.config.random_state);
        let mut converged = false;

        for epoch in 0..self.config.max_iter {
            order.shuffle(&mut rng);
            let mut max_step: f64 = 0.0;

            for &i in &order {
                let kii = diag[i];
                if kii <= 0.0 {
                    continue;
                }
                let gradient = fitted[i] - y[i];
                let target = soft_threshold(kii * beta[i] - gradient, eps) / kii;
                let updated = target.clamp(-c, c);
                let delta = updated - beta[i];

                if delta != 0.0 {
                    beta[i] = updated;
                    fitted.scaled_add(delta, columns.column(i));
                    max_step = max_step.max(delta.abs() * kii);
                }
            }

            if !max_step.is_finite() || fitted.iter().any(|v| !v.is_finite()) {
                return Err(BenchError::ConvergenceError { iterations: epoch + 1 });
            }
            if max_step < self.config.tol {
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(
                kernel = %self.kernel,
                max_iter = self.config.max_iter,
                "SVR solver did not reach tolerance"
            );
        }

        let support: Vec<usize> = (0..n).filter(|&i| beta[i].abs() > 1e-10).collect();
        self.intercept = beta.sum();
        self.support_vectors = Some(x.select(Axis(0), &support));
        self.dual_coef = Some(beta.select(Axis(0), &support));
        self.resolved = Some(kernel);
        self.converged = converged;

        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let (kernel, sv, coef) = match (&self.resolved, &self.support_vectors, &self.dual_coef) {
            (Some(k), Some(sv), Some(c)) => (k, sv, c),
            _ => return Err(BenchError::ModelNotFitted),
        };
        if x.ncols() != sv.ncols() {
            return Err(BenchError::ShapeError {
                expected: format!("{} features", sv.ncols()),
                actual: format!("{} features", x.ncols()),
            });
        }

        let predictions: Vec<f64> = (0..x.nrows())
            .into_par_iter()
            .map(|i| {
                let sample = x.row(i);
                sv.rows()
                    .into_iter()
                    .zip(coef.iter())
                    .map(|(row, b)| b * kernel.eval(sample, row))
                    .sum::<f64>()
                    + self.intercept
            })
            .collect();

        Ok(Array1::from_vec(predictions))
    }
}
