//! Feature-side preprocessing driven by column intents

use super::LabelEncoder;
use crate::config::IntentConfig;
use crate::error::{ForeshadowError, Result};
use crate::estimators::{Target, TargetTransformer};
use crate::intents::builtin::is_numeric;
use crate::intents::{ColumnIntent, IntentResolver, CATEGORICAL_INTENT};
use ndarray::{Array1, Array2};
use polars::prelude::{ChunkAgg, DataFrame, DataType, Series};
use tracing::debug;

/// Encoding learned for one column
#[derive(Debug, Clone)]
enum ColumnEncoding {
    /// Cast to `f64`, nulls replaced by the training mean
    Numeric { fill: f64 },
    /// Values mapped to sorted category codes
    Ordinal(LabelEncoder),
}

/// Turns a frame into a feature matrix.
///
/// At fit time every column is classified with an [`IntentResolver`]:
/// categorical columns are ordinal-encoded, numeric columns are cast to
/// `f64` with nulls filled by the training mean. Any other column must be
/// castable to numbers.
#[derive(Clone)]
pub struct FramePreprocessor {
    resolver: IntentResolver,
    intents: Vec<ColumnIntent>,
    encodings: Vec<(String, ColumnEncoding)>,
}

impl FramePreprocessor {
    pub fn new(resolver: IntentResolver) -> Self {
        Self {
            resolver,
            intents: Vec::new(),
            encodings: Vec::new(),
        }
    }

    /// Preprocessor classifying against the built-in intents
    pub fn with_builtin(config: &IntentConfig) -> Result<Self> {
        Ok(Self::new(IntentResolver::with_builtin(config)?))
    }

    pub fn resolver(&self) -> &IntentResolver {
        &self.resolver
    }

    /// Intents found at fit time, in frame order
    pub fn column_intents(&self) -> &[ColumnIntent] {
        &self.intents
    }

    /// Training column names, in order
    pub fn columns(&self) -> Vec<&str> {
        self.encodings.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn is_fitted(&self) -> bool {
        !self.encodings.is_empty()
    }

    pub fn fit(&mut self, df: &DataFrame) -> Result<()> {
        let intents = self.resolver.resolve(df)?;
        let mut encodings = Vec::with_capacity(intents.len());

        for column_intent in &intents {
            let series = df.column(&column_intent.column)?.as_materialized_series();
            let encoding = if column_intent.intent.name() == CATEGORICAL_INTENT {
                let mut encoder = LabelEncoder::new();
                encoder.fit(&labels(series)?)?;
                ColumnEncoding::Ordinal(encoder)
            } else if is_numeric(series) {
                let values = series.cast(&DataType::Float64)?;
                ColumnEncoding::Numeric {
                    fill: values.f64()?.mean().unwrap_or(0.0),
                }
            } else {
                return Err(ForeshadowError::DataError(format!(
                    "column {} with intent {} has no numeric encoding",
                    column_intent.column,
                    column_intent.intent.name()
                )));
            };
            debug!(column = %column_intent.column, intent = column_intent.intent.name(), "Column encoding fitted");
            encodings.push((column_intent.column.clone(), encoding));
        }

        self.intents = intents;
        self.encodings = encodings;
        Ok(())
    }

    /// Encode `df`, whose columns must match the training columns
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted() {
            return Err(ForeshadowError::ModelNotFitted);
        }
        let same_columns = df.width() == self.encodings.len()
            && df
                .get_column_names()
                .iter()
                .zip(&self.encodings)
                .all(|(name, (trained, _))| name.as_str() == trained);
        if !same_columns {
            return Err(ForeshadowError::ValidationError(
                "Predict must have the same columns as train columns".to_string(),
            ));
        }

        let mut out = Array2::<f64>::zeros((df.height(), self.encodings.len()));
        for (idx, (name, encoding)) in self.encodings.iter().enumerate() {
            let series = df.column(name)?.as_materialized_series();
            let values = match encoding {
                ColumnEncoding::Numeric { fill } => {
                    let cast = series.cast(&DataType::Float64)?;
                    cast.f64()?
                        .into_iter()
                        .map(|v| v.unwrap_or(*fill))
                        .collect::<Array1<f64>>()
                }
                ColumnEncoding::Ordinal(encoder) => encoder.transform(&labels(series)?)?,
            };
            out.column_mut(idx).assign(&values);
        }
        Ok(out)
    }

    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<Array2<f64>> {
        self.fit(df)?;
        self.transform(df)
    }
}

/// Column values as text labels; nulls are rejected
fn labels(series: &Series) -> Result<Target> {
    let text = series.cast(&DataType::String)?;
    text.str()?
        .into_iter()
        .map(|v| {
            v.map(str::to_string).ok_or_else(|| {
                ForeshadowError::ValidationError(format!(
                    "categorical column {} contains nulls",
                    series.name()
                ))
            })
        })
        .collect::<Result<Vec<String>>>()
        .map(Target::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn frame() -> DataFrame {
        let amounts: Vec<Option<f64>> = (0..20)
            .map(|i| if i == 3 { None } else { Some(i as f64 * 2.0) })
            .collect();
        let cities: Vec<&str> = (0..20).map(|i| if i % 2 == 0 { "Oslo" } else { "Lima" }).collect();
        df!("amount" => amounts, "city" => cities).unwrap()
    }

    #[test]
    fn test_encodes_by_intent() {
        let mut pre = FramePreprocessor::with_builtin(&IntentConfig::default()).unwrap();
        let x = pre.fit_transform(&frame()).unwrap();

        assert_eq!(x.dim(), (20, 2));
        assert_eq!(pre.columns(), vec!["amount", "city"]);
        assert_eq!(pre.column_intents()[1].intent.name(), CATEGORICAL_INTENT);

        // Null filled with the mean of the observed values
        let observed: f64 = (0..20).filter(|&i| i != 3).map(|i| i as f64 * 2.0).sum::<f64>() / 19.0;
        assert!((x[[3, 0]] - observed).abs() < 1e-12);
        // "Lima" < "Oslo"
        assert_eq!(x[[0, 1]], 1.0);
        assert_eq!(x[[1, 1]], 0.0);
    }

    #[test]
    fn test_column_layout_must_match() {
        let mut pre = FramePreprocessor::with_builtin(&IntentConfig::default()).unwrap();
        pre.fit(&frame()).unwrap();

        let reordered = frame().select(["city", "amount"]).unwrap();
        let err = pre.transform(&reordered).unwrap_err();
        assert_eq!(err.to_string(), "Predict must have the same columns as train columns");
    }

    #[test]
    fn test_unseen_category() {
        let mut pre = FramePreprocessor::with_builtin(&IntentConfig::default()).unwrap();
        pre.fit(&frame()).unwrap();

        let other = df!("amount" => &[1.0], "city" => &["Rome"]).unwrap();
        let err = pre.transform(&other).unwrap_err();
        assert_eq!(err.to_string(), "y contains previously unseen label: Rome");
    }

    #[test]
    fn test_unencodable_column() {
        let mut pre = FramePreprocessor::with_builtin(&IntentConfig::default()).unwrap();
        let blobs: Vec<&[u8]> = vec![b"a", b"b"];
        let df = DataFrame::new(vec![Column::new("blob".into(), blobs)]).unwrap();
        let err = pre.fit(&df).unwrap_err();
        assert!(matches!(err, ForeshadowError::DataError(_)));
    }

    #[test]
    fn test_transform_before_fit() {
        let pre = FramePreprocessor::with_builtin(&IntentConfig::default()).unwrap();
        assert!(matches!(pre.transform(&frame()), Err(ForeshadowError::ModelNotFitted)));
    }
}
