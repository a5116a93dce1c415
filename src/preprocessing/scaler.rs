//! Target scaling

use crate::error::{ForeshadowError, Result};
use crate::estimators::{InverseTransform, Target, TargetTransformer};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Type of scaler to use
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScalerType {
    /// Standard scaling (z-score normalization): (x - mean) / std
    Standard,
    /// Min-Max scaling: (x - min) / (max - min)
    MinMax,
    /// Robust scaling using median and IQR
    Robust,
    /// Max absolute scaling: x / max(|x|)
    MaxAbs,
}

/// Parameters for a fitted scaler
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct ScalerParams {
    center: f64,
    scale: f64,
}

/// Invertible scaler for continuous targets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    scaler_type: ScalerType,
    params: Option<ScalerParams>,
}

impl Default for Scaler {
    fn default() -> Self {
        Self::new(ScalerType::Standard)
    }
}

impl Scaler {
    pub fn new(scaler_type: ScalerType) -> Self {
        Self {
            scaler_type,
            params: None,
        }
    }

    pub fn scaler_type(&self) -> ScalerType {
        self.scaler_type
    }

    /// Fitted `(center, scale)`
    pub fn params(&self) -> Option<(f64, f64)> {
        self.params.map(|p| (p.center, p.scale))
    }

    fn fitted(&self) -> Result<ScalerParams> {
        self.params.ok_or(ForeshadowError::ModelNotFitted)
    }

    fn compute_params(&self, values: &Array1<f64>) -> Result<ScalerParams> {
        if values.is_empty() {
            return Err(ForeshadowError::ValidationError(
                "cannot fit a scaler on an empty target".to_string(),
            ));
        }

        let (center, scale) = match self.scaler_type {
            ScalerType::Standard => {
                let mean = values.mean().unwrap_or(0.0);
                (mean, values.std(0.0))
            }
            ScalerType::MinMax => {
                let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                (min, max - min)
            }
            ScalerType::Robust => {
                let mut sorted = values.to_vec();
                sorted.sort_by(|a, b| a.total_cmp(b));
                let q1 = quantile(&sorted, 0.25);
                let q3 = quantile(&sorted, 0.75);
                (quantile(&sorted, 0.5), q3 - q1)
            }
            ScalerType::MaxAbs => {
                let max_abs = values.iter().map(|v| v.abs()).fold(0.0, f64::max);
                (0.0, max_abs)
            }
        };

        Ok(ScalerParams {
            center,
            scale: if scale == 0.0 || !scale.is_finite() { 1.0 } else { scale },
        })
    }
}

/// Linear-interpolated quantile of sorted data
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

impl TargetTransformer for Scaler {
    fn name(&self) -> &str {
        "Scaler"
    }

    fn fit(&mut self, y: &Target) -> Result<()> {
        self.params = Some(self.compute_params(y.as_continuous()?)?);
        Ok(())
    }

    fn transform(&self, y: &Target) -> Result<Array1<f64>> {
        let params = self.fitted()?;
        Ok(y.as_continuous()?.mapv(|v| (v - params.center) / params.scale))
    }

    fn as_inverse(&self) -> Option<&dyn InverseTransform> {
        Some(self)
    }
}

impl InverseTransform for Scaler {
    fn inverse_transform(&self, y: &Array1<f64>) -> Result<Target> {
        let params = self.fitted()?;
        Ok(Target::Continuous(y.mapv(|v| v * params.scale + params.center)))
    }
}
