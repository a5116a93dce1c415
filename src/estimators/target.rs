//! Target (dependent variable) values

use crate::error::{ForeshadowError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Dependent variable, either continuous values or class labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Target {
    Continuous(Array1<f64>),
    Labels(Vec<String>),
}

impl Target {
    /// Reshape a single-column matrix into a continuous target
    pub fn from_column(y: &Array2<f64>) -> Result<Self> {
        if y.ncols() != 1 {
            return Err(ForeshadowError::ShapeError {
                expected: "1 column".to_string(),
                actual: format!("{} columns", y.ncols()),
            });
        }
        Ok(Target::Continuous(y.column(0).to_owned()))
    }

    pub fn len(&self) -> usize {
        match self {
            Target::Continuous(values) => values.len(),
            Target::Labels(labels) => labels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_labels(&self) -> bool {
        matches!(self, Target::Labels(_))
    }

    /// Continuous values, or a validation error for labels
    pub fn as_continuous(&self) -> Result<&Array1<f64>> {
        match self {
            Target::Continuous(values) => Ok(values),
            Target::Labels(_) => Err(ForeshadowError::ValidationError(
                "expected a continuous target, got labels".to_string(),
            )),
        }
    }

    /// Labels, or a validation error for continuous values
    pub fn as_labels(&self) -> Result<&[String]> {
        match self {
            Target::Labels(labels) => Ok(labels),
            Target::Continuous(_) => Err(ForeshadowError::ValidationError(
                "expected a label target, got continuous values".to_string(),
            )),
        }
    }

    /// Continuous values as an `n x 1` matrix
    pub fn to_column(&self) -> Result<Array2<f64>> {
        Ok(self.as_continuous()?.clone().insert_axis(Axis(1)))
    }
}

impl From<Array1<f64>> for Target {
    fn from(values: Array1<f64>) -> Self {
        Target::Continuous(values)
    }
}

impl From<Vec<f64>> for Target {
    fn from(values: Vec<f64>) -> Self {
        Target::Continuous(Array1::from_vec(values))
    }
}

impl From<Vec<String>> for Target {
    fn from(labels: Vec<String>) -> Self {
        Target::Labels(labels)
    }
}

impl From<Vec<&str>> for Target {
    fn from(labels: Vec<&str>) -> Self {
        Target::Labels(labels.into_iter().map(String::from).collect())
    }
}
