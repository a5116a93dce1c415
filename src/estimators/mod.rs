//! Estimator protocol and the target-transforming meta-estimator
//!
//! Components are polymorphic over a small capability set:
//! - [`Estimator`]: `fit`, `predict`, optionally `score`
//! - [`ProbabilisticEstimator`]: `predict_proba`, exposed through
//!   [`Estimator::as_probabilistic`]
//! - [`TargetTransformer`]: `fit`, `transform`
//! - [`InverseTransform`]: `inverse_transform`, exposed through
//!   [`TargetTransformer::as_inverse`]

mod target;
mod meta;
pub mod linear_models;

pub use target::Target;
pub use meta::MetaEstimator;
pub use linear_models::{LinearRegression, LogisticRegression};

use crate::error::{ForeshadowError, Result};
use ndarray::{Array1, Array2};

/// A model trained on a feature matrix and a numeric target
pub trait Estimator: Send + Sync {
    /// Name used in logs and capability errors
    fn name(&self) -> &str;

    /// Fit the model to training data
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Make predictions
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Goodness of fit on `(x, y)`
    fn score(&self, _x: &Array2<f64>, _y: &Array1<f64>) -> Result<f64> {
        Err(ForeshadowError::capability(self.name(), "score"))
    }

    /// Probability output, if the model supports it
    fn as_probabilistic(&self) -> Option<&dyn ProbabilisticEstimator> {
        None
    }
}

/// Estimators that output class probabilities
pub trait ProbabilisticEstimator: Send + Sync {
    /// One row per sample, one column per class; rows sum to 1
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>>;
}

/// Transformation applied to the target before fitting
pub trait TargetTransformer: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    fn fit(&mut self, y: &Target) -> Result<()>;

    fn transform(&self, y: &Target) -> Result<Array1<f64>>;

    fn fit_transform(&mut self, y: &Target) -> Result<Array1<f64>> {
        self.fit(y)?;
        self.transform(y)
    }

    /// Inverse mapping, if the transformation has one
    fn as_inverse(&self) -> Option<&dyn InverseTransform> {
        None
    }
}

/// Maps transformed values back to the original target space
pub trait InverseTransform: Send + Sync {
    fn inverse_transform(&self, y: &Array1<f64>) -> Result<Target>;
}

impl<E: Estimator + ?Sized> Estimator for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        (**self).fit(x, y)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        (**self).predict(x)
    }

    fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        (**self).score(x, y)
    }

    fn as_probabilistic(&self) -> Option<&dyn ProbabilisticEstimator> {
        (**self).as_probabilistic()
    }
}

impl<T: TargetTransformer + ?Sized> TargetTransformer for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fit(&mut self, y: &Target) -> Result<()> {
        (**self).fit(y)
    }

    fn transform(&self, y: &Target) -> Result<Array1<f64>> {
        (**self).transform(y)
    }

    fn fit_transform(&mut self, y: &Target) -> Result<Array1<f64>> {
        (**self).fit_transform(y)
    }

    fn as_inverse(&self) -> Option<&dyn InverseTransform> {
        (**self).as_inverse()
    }
}
