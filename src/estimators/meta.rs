//! Meta-estimator: a base estimator trained on a transformed target

use super::{Estimator, Target, TargetTransformer};
use crate::error::{ForeshadowError, Result};
use ndarray::{Array1, Array2};
use tracing::debug;

/// Composes a target transformer with a base estimator.
///
/// `fit` transforms the target before training; `predict` maps the
/// estimator's output back to the original target space when the transformer
/// has an inverse. `predict_proba` is passed through untouched.
pub struct MetaEstimator<E, T> {
    estimator: E,
    transformer: T,
    is_fitted: bool,
}

impl<E, T> MetaEstimator<E, T>
where
    E: Estimator,
    T: TargetTransformer,
{
    pub fn new(estimator: E, transformer: T) -> Self {
        Self {
            estimator,
            transformer,
            is_fitted: false,
        }
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    pub fn transformer(&self) -> &T {
        &self.transformer
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Take back the wrapped components
    pub fn into_parts(self) -> (E, T) {
        (self.estimator, self.transformer)
    }

    /// Fit the transformer on `y`, then the estimator on `(x, transform(y))`
    pub fn fit(&mut self, x: &Array2<f64>, y: &Target) -> Result<&mut Self> {
        if x.nrows() != y.len() {
            return Err(ForeshadowError::row_mismatch(x.nrows(), y.len()));
        }

        self.is_fitted = false;
        let y_transformed = self.transformer.fit_transform(y)?;
        self.estimator.fit(x, &y_transformed)?;
        self.is_fitted = true;

        debug!(
            estimator = self.estimator.name(),
            transformer = self.transformer.name(),
            n_samples = x.nrows(),
            "Fitted meta-estimator"
        );
        Ok(self)
    }

    /// Predictions in the original target space when the transformer is
    /// invertible, raw estimator output otherwise
    pub fn predict(&self, x: &Array2<f64>) -> Result<Target> {
        self.check_fitted()?;
        let raw = self.estimator.predict(x)?;
        match self.transformer.as_inverse() {
            Some(inverse) => inverse.inverse_transform(&raw),
            None => Ok(Target::Continuous(raw)),
        }
    }

    /// The base estimator's class probabilities, untransformed
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let probabilistic = self
            .estimator
            .as_probabilistic()
            .ok_or_else(|| ForeshadowError::capability(self.estimator.name(), "predict_proba"))?;
        self.check_fitted()?;
        probabilistic.predict_proba(x)
    }

    /// The base estimator's score against the transformed target
    pub fn score(&self, x: &Array2<f64>, y: &Target) -> Result<f64> {
        self.check_fitted()?;
        let y_transformed: Array1<f64> = self.transformer.transform(y)?;
        self.estimator.score(x, &y_transformed)
    }

    fn check_fitted(&self) -> Result<()> {
        if self.is_fitted {
            Ok(())
        } else {
            Err(ForeshadowError::ModelNotFitted)
        }
    }
}
