//! Top-level fit/predict surface

use crate::config::IntentConfig;
use crate::error::{ForeshadowError, Result};
use crate::estimators::{Estimator, MetaEstimator, Target, TargetTransformer};
use crate::preprocessing::{FramePreprocessor, PassThrough};
use ndarray::Array2;
use polars::prelude::DataFrame;
use tracing::info;

/// Estimator wrapper that remembers the training layout.
///
/// The target is routed through a [`MetaEstimator`]; without an explicit
/// y-transformer the target passes through unchanged. Frames given to the
/// `*_frame` methods are encoded by a [`FramePreprocessor`], the built-in
/// intents one unless another is set.
pub struct Foreshadow {
    meta: MetaEstimator<Box<dyn Estimator>, Box<dyn TargetTransformer>>,
    x_preprocessor: Option<FramePreprocessor>,
    n_features: Option<usize>,
}

impl Foreshadow {
    pub fn new(estimator: impl Estimator + 'static) -> Self {
        Self {
            meta: MetaEstimator::new(Box::new(estimator), Box::new(PassThrough)),
            x_preprocessor: None,
            n_features: None,
        }
    }

    /// Replace the y-transformer. Discards any previous fit.
    pub fn with_y_transformer(self, transformer: impl TargetTransformer + 'static) -> Self {
        let (estimator, _) = self.meta.into_parts();
        Self {
            meta: MetaEstimator::new(estimator, Box::new(transformer)),
            x_preprocessor: self.x_preprocessor,
            n_features: None,
        }
    }

    /// Replace the feature preprocessor used by the `*_frame` methods.
    /// Discards any previous fit.
    pub fn with_x_preprocessor(mut self, preprocessor: FramePreprocessor) -> Self {
        self.x_preprocessor = Some(preprocessor);
        self.n_features = None;
        self
    }

    pub fn x_preprocessor(&self) -> Option<&FramePreprocessor> {
        self.x_preprocessor.as_ref()
    }

    pub fn estimator(&self) -> &dyn Estimator {
        &**self.meta.estimator()
    }

    pub fn y_transformer(&self) -> &dyn TargetTransformer {
        &**self.meta.transformer()
    }

    /// Number of training columns, once fitted
    pub fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Target) -> Result<&mut Self> {
        self.n_features = None;
        self.meta.fit(x, y)?;
        self.n_features = Some(x.ncols());
        info!(
            estimator = self.meta.estimator().name(),
            n_samples = x.nrows(),
            n_features = x.ncols(),
            "Foreshadow fitted"
        );
        Ok(self)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Target> {
        self.check_layout(x)?;
        self.meta.predict(x)
    }

    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_layout(x)?;
        self.meta.predict_proba(x)
    }

    pub fn score(&self, x: &Array2<f64>, y: &Target) -> Result<f64> {
        self.check_layout(x)?;
        self.meta.score(x, y)
    }

    /// Classify and encode the columns of `df`, then fit on the encoded matrix
    pub fn fit_frame(&mut self, df: &DataFrame, y: &Target) -> Result<&mut Self> {
        let mut preprocessor = match self.x_preprocessor.take() {
            Some(preprocessor) => preprocessor,
            None => FramePreprocessor::with_builtin(&IntentConfig::default())?,
        };
        let fitted = preprocessor.fit_transform(df);
        self.x_preprocessor = Some(preprocessor);
        self.fit(&fitted?, y)
    }

    pub fn predict_frame(&self, df: &DataFrame) -> Result<Target> {
        self.predict(&self.encode(df)?)
    }

    pub fn predict_proba_frame(&self, df: &DataFrame) -> Result<Array2<f64>> {
        self.predict_proba(&self.encode(df)?)
    }

    pub fn score_frame(&self, df: &DataFrame, y: &Target) -> Result<f64> {
        self.score(&self.encode(df)?, y)
    }

    fn encode(&self, df: &DataFrame) -> Result<Array2<f64>> {
        self.n_features.ok_or_else(not_fitted)?;
        match &self.x_preprocessor {
            Some(preprocessor) if preprocessor.is_fitted() => preprocessor.transform(df),
            _ => Err(not_fitted()),
        }
    }

    fn check_layout(&self, x: &Array2<f64>) -> Result<()> {
        let n_features = self.n_features.ok_or_else(not_fitted)?;
        if x.ncols() != n_features {
            return Err(ForeshadowError::ValidationError(
                "Predict must have the same columns as train columns".to_string(),
            ));
        }
        Ok(())
    }
}

fn not_fitted() -> ForeshadowError {
    ForeshadowError::ValidationError("Foreshadow has not been fit yet".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimators::LinearRegression;
    use ndarray::array;
    use polars::prelude::NamedFrom;

    #[test]
    fn test_defaults_to_pass_through() {
        let foreshadow = Foreshadow::new(LinearRegression::new());
        assert_eq!(foreshadow.y_transformer().name(), "PassThrough");
        assert_eq!(foreshadow.estimator().name(), "LinearRegression");
        assert!(foreshadow.n_features().is_none());
    }

    #[test]
    fn test_predict_before_fit() {
        let foreshadow = Foreshadow::new(LinearRegression::new());
        let err = foreshadow.predict(&array![[1.0, 2.0]]).unwrap_err();
        assert_eq!(err.to_string(), "Foreshadow has not been fit yet");
    }

    #[test]
    fn test_predict_different_columns() {
        let mut foreshadow = Foreshadow::new(LinearRegression::new());
        let x = array![[0.0, 1.0], [1.0, 0.0], [2.0, 2.0], [3.0, 1.0]];
        foreshadow.fit(&x, &Target::from(vec![1.0, 2.0, 5.0, 6.0])).unwrap();
        assert_eq!(foreshadow.n_features(), Some(2));

        let err = foreshadow.predict(&array![[1.0]]).unwrap_err();
        assert_eq!(err.to_string(), "Predict must have the same columns as train columns");
    }

    #[test]
    fn test_predict_frame_before_fit() {
        let foreshadow = Foreshadow::new(LinearRegression::new());
        let df = polars::df!("a" => &[1.0, 2.0]).unwrap();
        let err = foreshadow.predict_frame(&df).unwrap_err();
        assert_eq!(err.to_string(), "Foreshadow has not been fit yet");
        assert!(foreshadow.x_preprocessor().is_none());
    }
}
