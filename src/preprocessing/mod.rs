//! Target and feature preprocessing
//!
//! Transformers applied to the dependent variable before fitting:
//! - [`Scaler`] - standard, min-max, robust and max-abs scaling
//! - [`LabelEncoder`] - class labels to `0..n_classes`
//! - [`PassThrough`] - identity
//!
//! and, on the feature side, [`FramePreprocessor`], which encodes each column
//! of a frame according to its intent.

mod scaler;
mod encoder;
mod frame;

pub use scaler::{Scaler, ScalerType};
pub use encoder::LabelEncoder;
pub use frame::FramePreprocessor;

use crate::error::Result;
use crate::estimators::{InverseTransform, Target, TargetTransformer};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Identity transformer for continuous targets
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PassThrough;

impl TargetTransformer for PassThrough {
    fn name(&self) -> &str {
        "PassThrough"
    }

    fn fit(&mut self, y: &Target) -> Result<()> {
        y.as_continuous().map(|_| ())
    }

    fn transform(&self, y: &Target) -> Result<Array1<f64>> {
        Ok(y.as_continuous()?.clone())
    }

    fn as_inverse(&self) -> Option<&dyn InverseTransform> {
        Some(self)
    }
}

impl InverseTransform for PassThrough {
    fn inverse_transform(&self, y: &Array1<f64>) -> Result<Target> {
        Ok(Target::Continuous(y.clone()))
    }
}
