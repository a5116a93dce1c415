//! Intent classes and their declarations

use crate::error::{ForeshadowError, Result};
use polars::prelude::Series;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Name of the abstract root of every intent hierarchy
pub const BASE_INTENT: &str = "BaseIntent";

const MISSING_DTYPE: &str = "Subclass must define cls.dtype attribute.\nThis attribute should define the dtype of the intent.";
const MISSING_CHILDREN: &str = "Subclass must define cls.children attribute.\nThis attribute should define the children of the intent.";

/// Primitive data type an intent governs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentDtype {
    /// Any storage type
    Any,
    Numeric,
    Str,
    Bool,
    Datetime,
}

/// Detection logic deciding whether a column matches an intent
pub trait IntentMatcher: Send + Sync {
    /// Whether `column` matches the intent's semantic pattern
    fn is_intent(&self, column: &Series) -> Result<bool>;
}

impl<F> IntentMatcher for F
where
    F: Fn(&Series) -> Result<bool> + Send + Sync,
{
    fn is_intent(&self, column: &Series) -> Result<bool> {
        self(column)
    }
}

/// Unvalidated intent declaration.
///
/// `dtype` and `children` are both required; a definition missing either is
/// rejected when it is registered.
#[derive(Clone)]
pub struct IntentDefinition {
    name: String,
    dtype: Option<IntentDtype>,
    children: Option<Vec<String>>,
    matcher: Option<Arc<dyn IntentMatcher>>,
}

impl IntentDefinition {
    /// Start a definition for the intent called `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dtype: None,
            children: None,
            matcher: None,
        }
    }

    /// Set the governed dtype
    pub fn with_dtype(mut self, dtype: IntentDtype) -> Self {
        self.dtype = Some(dtype);
        self
    }

    /// Set the ordered child intent names
    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = Some(children.into_iter().map(Into::into).collect());
        self
    }

    /// Declare the intent as a leaf
    pub fn with_no_children(mut self) -> Self {
        self.children = Some(Vec::new());
        self
    }

    /// Attach detection logic
    pub fn with_matcher(mut self, matcher: impl IntentMatcher + 'static) -> Self {
        self.matcher = Some(Arc::new(matcher));
        self
    }

    /// Intent name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check required attributes, `dtype` first, and build the class
    pub(crate) fn validate(self) -> Result<IntentClass> {
        let dtype = self
            .dtype
            .ok_or_else(|| ForeshadowError::ConfigError(MISSING_DTYPE.to_string()))?;
        let children = self
            .children
            .ok_or_else(|| ForeshadowError::ConfigError(MISSING_CHILDREN.to_string()))?;

        if self.name == BASE_INTENT {
            return Err(ForeshadowError::ConfigError(format!(
                "{} is reserved for the abstract base intent",
                BASE_INTENT
            )));
        }
        if children.iter().any(|child| child == BASE_INTENT) {
            return Err(ForeshadowError::ConfigError(format!(
                "{} may not be listed as a child of {}",
                BASE_INTENT, self.name
            )));
        }
        if self.name.is_empty() {
            return Err(ForeshadowError::ConfigError(
                "Intent name must not be empty".to_string(),
            ));
        }

        Ok(IntentClass {
            name: self.name,
            dtype,
            children,
            matcher: self.matcher,
            is_abstract: false,
        })
    }
}

impl fmt::Debug for IntentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentDefinition")
            .field("name", &self.name)
            .field("dtype", &self.dtype)
            .field("children", &self.children)
            .field("has_matcher", &self.matcher.is_some())
            .finish()
    }
}

/// A registered, validated intent
pub struct IntentClass {
    name: String,
    dtype: IntentDtype,
    children: Vec<String>,
    matcher: Option<Arc<dyn IntentMatcher>>,
    is_abstract: bool,
}

impl IntentClass {
    /// The abstract base intent
    pub(crate) fn base() -> Self {
        Self {
            name: BASE_INTENT.to_string(),
            dtype: IntentDtype::Any,
            children: Vec::new(),
            matcher: None,
            is_abstract: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> IntentDtype {
        self.dtype
    }

    /// Child intent names, in priority order
    pub fn children(&self) -> &[String] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Whether `column` matches this intent.
    ///
    /// Intents registered without a matcher fail with
    /// [`ForeshadowError::NotImplemented`].
    pub fn is_intent(&self, column: &Series) -> Result<bool> {
        match &self.matcher {
            Some(matcher) => matcher.is_intent(column),
            None => Err(ForeshadowError::NotImplemented(
                "is_intent is not implemented".to_string(),
            )),
        }
    }

    /// Create an instance of this intent
    pub fn instantiate(self: &Arc<Self>) -> Result<IntentInstance> {
        if self.is_abstract {
            return Err(ForeshadowError::InstantiationError(format!(
                "{} may not be instantiated",
                self.name
            )));
        }
        Ok(IntentInstance {
            class: Arc::clone(self),
        })
    }
}

impl fmt::Debug for IntentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentClass")
            .field("name", &self.name)
            .field("dtype", &self.dtype)
            .field("children", &self.children)
            .field("is_abstract", &self.is_abstract)
            .finish()
    }
}

/// An instance of a concrete intent, attached to a column once classified
#[derive(Debug, Clone)]
pub struct IntentInstance {
    class: Arc<IntentClass>,
}

impl IntentInstance {
    pub fn name(&self) -> &str {
        self.class.name()
    }

    pub fn class(&self) -> &Arc<IntentClass> {
        &self.class
    }

    pub fn is_intent(&self, column: &Series) -> Result<bool> {
        self.class.is_intent(column)
    }
}
