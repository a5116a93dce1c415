//! Column-by-column intent resolution for a whole frame

use super::base::IntentInstance;
use super::builtin::{register_builtin_intents, GENERIC_INTENT};
use super::registry::{first_match, IntentRegistry};
use crate::config::IntentConfig;
use crate::error::{ForeshadowError, Result};
use polars::prelude::DataFrame;
use rayon::prelude::*;
use tracing::info;

/// Intent assigned to one column
#[derive(Debug, Clone)]
pub struct ColumnIntent {
    /// Column name
    pub column: String,
    /// Matched intent
    pub intent: IntentInstance,
}

/// Classifies every column of a frame against one intent tree
#[derive(Clone)]
pub struct IntentResolver {
    registry: IntentRegistry,
    root: String,
}

impl IntentResolver {
    /// Resolve against the tree rooted at `root` in `registry`
    pub fn new(registry: IntentRegistry, root: impl Into<String>) -> Self {
        Self {
            registry,
            root: root.into(),
        }
    }

    /// Resolver over a private registry holding the built-in hierarchy
    pub fn with_builtin(config: &IntentConfig) -> Result<Self> {
        let registry = IntentRegistry::new();
        register_builtin_intents(&registry, config)?;
        Ok(Self::new(registry, GENERIC_INTENT))
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn registry(&self) -> &IntentRegistry {
        &self.registry
    }

    /// One entry per column, in frame order
    pub fn resolve(&self, df: &DataFrame) -> Result<Vec<ColumnIntent>> {
        let order = self.registry.priority_traverse(&self.root)?;

        let resolved = df
            .get_columns()
            .par_iter()
            .map(|column| {
                let series = column.as_materialized_series();
                let name = series.name().to_string();
                let intent = first_match(&order, series)?.ok_or_else(|| {
                    ForeshadowError::IntentNotFound(format!(
                        "no intent under {} matches column {}",
                        self.root, name
                    ))
                })?;
                Ok(ColumnIntent {
                    column: name,
                    intent: intent.instantiate()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(columns = resolved.len(), root = %self.root, "Resolved column intents");
        Ok(resolved)
    }
}
