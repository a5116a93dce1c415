//! Label encoding for class targets

use crate::error::{ForeshadowError, Result};
use crate::estimators::{InverseTransform, Target, TargetTransformer};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Encodes class labels as `0..n_classes`, classes in sorted order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
    mapping: HashMap<String, usize>,
}

impl LabelEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Known classes; index is the encoded value
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn is_fitted(&self) -> bool {
        !self.classes.is_empty()
    }
}

impl TargetTransformer for LabelEncoder {
    fn name(&self) -> &str {
        "LabelEncoder"
    }

    fn fit(&mut self, y: &Target) -> Result<()> {
        let labels = y.as_labels()?;
        let classes: BTreeSet<&String> = labels.iter().collect();
        self.classes = classes.into_iter().cloned().collect();
        self.mapping = self
            .classes
            .iter()
            .enumerate()
            .map(|(idx, class)| (class.clone(), idx))
            .collect();
        Ok(())
    }

    fn transform(&self, y: &Target) -> Result<Array1<f64>> {
        if !self.is_fitted() {
            return Err(ForeshadowError::ModelNotFitted);
        }
        y.as_labels()?
            .iter()
            .map(|label| {
                self.mapping.get(label).map(|&idx| idx as f64).ok_or_else(|| {
                    ForeshadowError::ValidationError(format!(
                        "y contains previously unseen label: {}",
                        label
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()
            .map(Array1::from_vec)
    }

    fn as_inverse(&self) -> Option<&dyn InverseTransform> {
        Some(self)
    }
}

impl InverseTransform for LabelEncoder {
    /// Values are rounded to the nearest class index
    fn inverse_transform(&self, y: &Array1<f64>) -> Result<Target> {
        if !self.is_fitted() {
            return Err(ForeshadowError::ModelNotFitted);
        }
        let labels = y
            .iter()
            .map(|&v| {
                let idx = v.round();
                if idx < 0.0 || idx as usize >= self.classes.len() || !v.is_finite() {
                    return Err(ForeshadowError::ValidationError(format!(
                        "{} is not a valid encoded label",
                        v
                    )));
                }
                Ok(self.classes[idx as usize].clone())
            })
            .collect::<Result<Vec<String>>>()?;
        Ok(Target::Labels(labels))
    }
}
