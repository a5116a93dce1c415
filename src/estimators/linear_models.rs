//! Linear model implementations

use super::{Estimator, ProbabilisticEstimator};
use crate::error::{ForeshadowError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Solve the symmetric positive-definite system `a * x = b` by Cholesky
/// decomposition. A near-singular matrix is retried once with a small ridge.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    let ridge = 1e-8 * a.diag().iter().map(|v| v.abs()).sum::<f64>() / n.max(1) as f64;
    for jitter in [0.0, ridge] {
        if let Some(l) = cholesky_factor(a, jitter) {
            // L * z = b
            let mut z = Array1::<f64>::zeros(n);
            for i in 0..n {
                let sum: f64 = (0..i).map(|j| l[[i, j]] * z[j]).sum();
                z[i] = (b[i] - sum) / l[[i, i]];
            }
            // L^T * x = z
            let mut x = Array1::<f64>::zeros(n);
            for i in (0..n).rev() {
                let sum: f64 = ((i + 1)..n).map(|j| l[[j, i]] * x[j]).sum();
                x[i] = (z[i] - sum) / l[[i, i]];
            }
            return Some(x);
        }
    }
    None
}

fn cholesky_factor(a: &Array2<f64>, jitter: f64) -> Option<Array2<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();
            if i == j {
                let diag = a[[i, i]] + jitter - sum;
                if diag <= 0.0 {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }
    Some(l)
}

/// Gauss-Jordan elimination with partial pivoting (fallback)
fn gauss_jordan_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    let mut aug = Array2::<f64>::zeros((n, n + 1));
    aug.slice_mut(ndarray::s![.., ..n]).assign(a);
    aug.column_mut(n).assign(b);

    for col in 0..n {
        let pivot = (col..n).max_by(|&r1, &r2| {
            aug[[r1, col]]
                .abs()
                .partial_cmp(&aug[[r2, col]].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if aug[[pivot, col]].abs() < 1e-12 {
            return None;
        }
        if pivot != col {
            for j in 0..=n {
                aug.swap([col, j], [pivot, j]);
            }
        }
        let p = aug[[col, col]];
        for j in 0..=n {
            aug[[col, j]] /= p;
        }
        for row in 0..n {
            if row != col {
                let factor = aug[[row, col]];
                for j in 0..=n {
                    aug[[row, j]] -= factor * aug[[col, j]];
                }
            }
        }
    }
    Some(aug.column(n).to_owned())
}

fn check_rows(x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(ForeshadowError::row_mismatch(x.nrows(), y.len()));
    }
    if x.nrows() == 0 {
        return Err(ForeshadowError::ValidationError(
            "cannot fit on an empty dataset".to_string(),
        ));
    }
    Ok(())
}

fn check_features(x: &Array2<f64>, coefficients: &Array1<f64>) -> Result<()> {
    if x.ncols() != coefficients.len() {
        return Err(ForeshadowError::ShapeError {
            expected: format!("{} features", coefficients.len()),
            actual: format!("{} features", x.ncols()),
        });
    }
    Ok(())
}

/// Ordinary least squares regression, optionally L2-regularized
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Fitted coefficients (weights)
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept (bias)
    pub intercept: f64,
    /// Whether to fit intercept
    pub fit_intercept: bool,
    /// Regularization strength (L2)
    pub alpha: f64,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: 0.0,
            fit_intercept: true,
            alpha: 0.0,
        }
    }

    /// Enable/disable fitting intercept
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Set regularization strength
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }
}

impl Estimator for LinearRegression {
    fn name(&self) -> &str {
        "LinearRegression"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_rows(x, y)?;

        let (x_centered, y_centered, x_mean, y_mean) = if self.fit_intercept {
            let x_mean = x
                .mean_axis(Axis(0))
                .ok_or_else(|| ForeshadowError::ComputationError("empty feature matrix".into()))?;
            let y_mean = y.mean().unwrap_or(0.0);
            let x_centered = x - &x_mean.clone().insert_axis(Axis(0));
            (x_centered, y - y_mean, Some(x_mean), y_mean)
        } else {
            (x.clone(), y.clone(), None, 0.0)
        };

        // (X^T X + alpha * I) w = X^T y
        let mut xtx = x_centered.t().dot(&x_centered);
        for i in 0..xtx.nrows() {
            xtx[[i, i]] += self.alpha;
        }
        let xty = x_centered.t().dot(&y_centered);

        let coefficients = cholesky_solve(&xtx, &xty)
            .or_else(|| gauss_jordan_solve(&xtx, &xty))
            .ok_or_else(|| {
                ForeshadowError::ComputationError(
                    "Matrix is singular, cannot solve least squares".to_string(),
                )
            })?;

        self.intercept = match x_mean {
            Some(x_mean) => y_mean - coefficients.dot(&x_mean),
            None => 0.0,
        };
        self.coefficients = Some(coefficients);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self.coefficients.as_ref().ok_or(ForeshadowError::ModelNotFitted)?;
        check_features(x, coefficients)?;
        Ok(x.dot(coefficients) + self.intercept)
    }

    /// R² score
    fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;
        if y_pred.len() != y.len() {
            return Err(ForeshadowError::row_mismatch(y_pred.len(), y.len()));
        }

        let y_mean = y.mean().unwrap_or(0.0);
        let ss_res = (&y_pred - y).mapv(|v| v * v).sum();
        let ss_tot = y.mapv(|v| (v - y_mean) * (v - y_mean)).sum();

        if ss_tot == 0.0 {
            return Ok(1.0);
        }
        Ok(1.0 - ss_res / ss_tot)
    }
}

/// Logistic regression for binary classification.
///
/// Targets must be encoded as `0.0` / `1.0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Fitted coefficients
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept
    pub intercept: f64,
    /// Regularization strength (L2)
    pub alpha: f64,
    /// Maximum iterations
    pub max_iter: usize,
    /// Convergence tolerance
    pub tol: f64,
    /// Learning rate
    pub learning_rate: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: 0.0,
            alpha: 0.01,
            max_iter: 1000,
            tol: 1e-6,
            learning_rate: 0.1,
        }
    }

    /// Set regularization strength
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set learning rate
    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    fn sigmoid(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|v| 1.0 / (1.0 + (-v).exp()))
    }

    /// Probability of the positive class
    fn positive_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self.coefficients.as_ref().ok_or(ForeshadowError::ModelNotFitted)?;
        check_features(x, coefficients)?;
        Ok(Self::sigmoid(&(x.dot(coefficients) + self.intercept)))
    }
}

impl Estimator for LogisticRegression {
    fn name(&self) -> &str {
        "LogisticRegression"
    }

    /// Batch gradient descent on the L2-regularized log loss
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_rows(x, y)?;
        if y.iter().any(|&v| v != 0.0 && v != 1.0) {
            return Err(ForeshadowError::ValidationError(
                "LogisticRegression expects binary targets encoded as 0 and 1".to_string(),
            ));
        }

        let n_samples = x.nrows() as f64;
        let mut weights = Array1::<f64>::zeros(x.ncols());
        let mut bias = 0.0;

        for _ in 0..self.max_iter {
            let predictions = Self::sigmoid(&(x.dot(&weights) + bias));
            let errors = &predictions - y;
            let dw = x.t().dot(&errors) / n_samples + self.alpha * &weights;
            let db = errors.mean().unwrap_or(0.0);

            let grad_norm = (dw.mapv(|v| v * v).sum() + db * db).sqrt();
            if grad_norm < self.tol {
                break;
            }

            weights = weights - self.learning_rate * dw;
            bias -= self.learning_rate * db;
        }

        self.coefficients = Some(weights);
        self.intercept = bias;
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        Ok(self.positive_proba(x)?.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }

    /// Accuracy
    fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;
        if y_pred.len() != y.len() {
            return Err(ForeshadowError::row_mismatch(y_pred.len(), y.len()));
        }
        if y.is_empty() {
            return Ok(0.0);
        }
        let correct = y_pred
            .iter()
            .zip(y.iter())
            .filter(|(pred, actual)| (*pred - *actual).abs() < 0.5)
            .count();
        Ok(correct as f64 / y.len() as f64)
    }

    fn as_probabilistic(&self) -> Option<&dyn ProbabilisticEstimator> {
        Some(self)
    }
}

impl ProbabilisticEstimator for LogisticRegression {
    /// Columns are `[P(class 0), P(class 1)]`
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let p = self.positive_proba(x)?;
        let mut out = Array2::<f64>::zeros((p.len(), 2));
        out.column_mut(0).assign(&p.mapv(|v| 1.0 - v));
        out.column_mut(1).assign(&p);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_linear_regression_exact_fit() {
        // y = 2 * x1 - x2 + 3
        let x = array![[1.0, 0.0], [2.0, 1.0], [3.0, 5.0], [4.0, 2.0], [5.0, 3.0]];
        let y = array![5.0, 6.0, 4.0, 9.0, 10.0];
        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let coef = model.coefficients.as_ref().unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-8);
        assert!((coef[1] + 1.0).abs() < 1e-8);
        assert!((model.intercept - 3.0).abs() < 1e-8);
        assert!((model.score(&x, &y).unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_linear_regression_without_intercept() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![2.0, 4.0, 6.0];
        let mut model = LinearRegression::new().with_fit_intercept(false);
        model.fit(&x, &y).unwrap();
        assert_eq!(model.intercept, 0.0);
        let pred = model.predict(&array![[10.0]]).unwrap();
        assert!((pred[0] - 20.0).abs() < 1e-8);
    }

    #[test]
    fn test_ridge_shrinks_coefficients() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![1.0, 2.0, 3.0, 4.0];
        let mut ols = LinearRegression::new();
        let mut ridge = LinearRegression::new().with_alpha(10.0);
        ols.fit(&x, &y).unwrap();
        ridge.fit(&x, &y).unwrap();
        assert!(ridge.coefficients.unwrap()[0] < ols.coefficients.unwrap()[0]);
    }

    #[test]
    fn test_predict_before_fit() {
        let model = LinearRegression::new();
        let err = model.predict(&array![[1.0]]).unwrap_err();
        assert!(matches!(err, ForeshadowError::ModelNotFitted));
    }

    #[test]
    fn test_feature_count_mismatch() {
        let mut model = LinearRegression::new();
        model.fit(&array![[1.0], [2.0], [3.0]], &array![1.0, 2.0, 3.0]).unwrap();
        let err = model.predict(&array![[1.0, 2.0]]).unwrap_err();
        assert!(matches!(err, ForeshadowError::ShapeError { .. }));
    }

    #[test]
    fn test_row_mismatch() {
        let mut model = LinearRegression::new();
        let err = model.fit(&array![[1.0], [2.0]], &array![1.0]).unwrap_err();
        assert!(matches!(err, ForeshadowError::ShapeError { .. }));
    }

    #[test]
    fn test_linear_regression_has_no_proba() {
        assert!(LinearRegression::new().as_probabilistic().is_none());
    }

    #[test]
    fn test_gauss_jordan_matches_cholesky() {
        let a = array![[4.0, 1.0], [1.0, 3.0]];
        let b = array![1.0, 2.0];
        let c = cholesky_solve(&a, &b).unwrap();
        let g = gauss_jordan_solve(&a, &b).unwrap();
        assert!((c[0] - g[0]).abs() < 1e-10 && (c[1] - g[1]).abs() < 1e-10);
    }

    #[test]
    fn test_logistic_regression_separable() {
        let x = array![[0.0], [0.1], [0.2], [0.3], [0.7], [0.8], [0.9], [1.0]];
        let y = array![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        let mut model = LogisticRegression::new().with_learning_rate(1.0).with_alpha(0.0);
        model.fit(&x, &y).unwrap();
        assert_eq!(model.score(&x, &y).unwrap(), 1.0);

        let proba = model.predict_proba(&x).unwrap();
        assert_eq!(proba.dim(), (8, 2));
        for row in proba.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-12);
        }
        assert!(proba[[0, 0]] > 0.5 && proba[[7, 1]] > 0.5);
    }

    #[test]
    fn test_logistic_regression_rejects_non_binary() {
        let mut model = LogisticRegression::new();
        let err = model.fit(&array![[1.0], [2.0]], &array![0.0, 2.0]).unwrap_err();
        assert!(matches!(err, ForeshadowError::ValidationError(_)));
    }
}
