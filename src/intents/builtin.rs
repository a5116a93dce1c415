//! Built-in intents
//!
//! The default hierarchy is:
//!
//! ```text
//! GenericIntent
//!     NumericIntent
//!     CategoricalIntent
//! ```

use super::base::{IntentDefinition, IntentDtype, IntentMatcher};
use super::registry::{global_registry, IntentRegistry};
use crate::config::IntentConfig;
use crate::error::Result;
use polars::prelude::{DataType, Series};
use tracing::info;

pub const GENERIC_INTENT: &str = "GenericIntent";
pub const NUMERIC_INTENT: &str = "NumericIntent";
pub const CATEGORICAL_INTENT: &str = "CategoricalIntent";

/// Matches every column
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyColumn;

impl IntentMatcher for AnyColumn {
    fn is_intent(&self, _column: &Series) -> Result<bool> {
        Ok(true)
    }
}

/// Matches columns whose values are all numbers and that are not
/// low-cardinality
#[derive(Debug, Clone, Default)]
pub struct NumericMatcher {
    config: IntentConfig,
}

impl NumericMatcher {
    pub fn new(config: IntentConfig) -> Self {
        Self { config }
    }
}

impl IntentMatcher for NumericMatcher {
    fn is_intent(&self, column: &Series) -> Result<bool> {
        if column.is_empty() || !is_numeric(column) {
            return Ok(false);
        }
        Ok(!is_low_cardinality(column, &self.config)?)
    }
}

/// Matches non-numeric columns and low-cardinality numeric columns
#[derive(Debug, Clone, Default)]
pub struct CategoricalMatcher {
    config: IntentConfig,
}

impl CategoricalMatcher {
    pub fn new(config: IntentConfig) -> Self {
        Self { config }
    }
}

impl IntentMatcher for CategoricalMatcher {
    fn is_intent(&self, column: &Series) -> Result<bool> {
        if column.is_empty() || !is_scalar(column.dtype()) {
            return Ok(false);
        }
        Ok(is_low_cardinality(column, &self.config)? || !is_numeric(column))
    }
}

/// Numeric storage, or text in which every non-null value parses as a number.
/// Columns that cannot be cast to `Float64` are not numeric.
pub(crate) fn is_numeric(column: &Series) -> bool {
    match column.dtype() {
        dtype if dtype.is_primitive_numeric() => true,
        DataType::String => match column.cast(&DataType::Float64) {
            Ok(cast) => cast.null_count() == column.null_count(),
            Err(_) => false,
        },
        _ => false,
    }
}

/// One value per row: numbers, text and booleans. Nested and binary
/// columns are left to the root intent.
fn is_scalar(dtype: &DataType) -> bool {
    dtype.is_primitive_numeric() || matches!(dtype, DataType::String | DataType::Boolean)
}

fn is_low_cardinality(column: &Series, config: &IntentConfig) -> Result<bool> {
    let n_unique = column.n_unique()?;
    let ratio = n_unique as f64 / column.len().max(1) as f64;
    Ok(n_unique <= config.max_categorical_unique && ratio <= config.categorical_threshold)
}

/// Definitions of the built-in hierarchy
pub fn builtin_definitions(config: &IntentConfig) -> Vec<IntentDefinition> {
    vec![
        IntentDefinition::new(GENERIC_INTENT)
            .with_dtype(IntentDtype::Any)
            .with_children([NUMERIC_INTENT, CATEGORICAL_INTENT])
            .with_matcher(AnyColumn),
        IntentDefinition::new(NUMERIC_INTENT)
            .with_dtype(IntentDtype::Numeric)
            .with_no_children()
            .with_matcher(NumericMatcher::new(config.clone())),
        IntentDefinition::new(CATEGORICAL_INTENT)
            .with_dtype(IntentDtype::Str)
            .with_no_children()
            .with_matcher(CategoricalMatcher::new(config.clone())),
    ]
}

/// Register the built-in hierarchy. Intents already present are kept.
pub fn register_builtin_intents(registry: &IntentRegistry, config: &IntentConfig) -> Result<()> {
    for definition in builtin_definitions(config) {
        registry.register_if_absent(definition)?;
    }
    Ok(())
}

/// Register the built-in hierarchy in the process-wide registry. Call once at
/// startup; later calls keep the first registration.
pub fn init_builtin_intents(config: &IntentConfig) -> Result<()> {
    register_builtin_intents(global_registry(), config)?;
    info!(root = GENERIC_INTENT, "Built-in intents available globally");
    Ok(())
}
