//! Final refit of a family's winning candidate on the whole training partition

use crate::dataset::Partition;
use crate::error::{BenchError, Result};
use crate::training::models::{Estimator, Hyperparameter, Model, ModelDetails, ModelFamily};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A fitted model together with the candidate it was built from
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub family: ModelFamily,
    pub hyperparameter: Hyperparameter,
    pub feature_names: Vec<String>,
    pub n_train: usize,
    pub details: ModelDetails,
    estimator: Estimator,
}

impl TrainedModel {
    /// Predict targets for feature rows laid out like the training partition
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.feature_names.len() {
            return Err(BenchError::ShapeError {
                expected: format!("{} features", self.feature_names.len()),
                actual: format!("{} features", x.ncols()),
            });
        }
        self.estimator.predict(x)
    }

    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    /// Metadata view for reports and JSON output, without fitted parameters
    pub fn summary(&self) -> TrainedModelSummary {
        TrainedModelSummary {
            family: self.family,
            hyperparameter: self.hyperparameter,
            n_train: self.n_train,
            details: self.details.clone(),
        }
    }
}

/// Serializable description of a [`TrainedModel`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModelSummary {
    pub family: ModelFamily,
    pub hyperparameter: Hyperparameter,
    pub n_train: usize,
    pub details: ModelDetails,
}

/// Refit `candidate` on every row of `train`.
///
/// Fold models from the sweep are never reused here; each of them saw only
/// part of the data.
pub fn train_final(family: ModelFamily, candidate: &Hyperparameter, train: &Partition) -> Result<TrainedModel> {
    let mut estimator = Estimator::build(family, candidate)?;
    estimator.fit(&train.x, &train.y)?;
    let details = estimator.describe(&train.feature_names)?;

    info!(
        family = %family,
        hyperparameter = %candidate,
        n_train = train.n_rows(),
        "Trained final model"
    );

    Ok(TrainedModel {
        family,
        hyperparameter: *candidate,
        feature_names: train.feature_names.clone(),
        n_train: train.n_rows(),
        details,
        estimator,
    })
}
