//! Foreshadow - intent-driven feature engineering
//!
//! This crate provides:
//! - Column intent inference over a priority-ordered intent tree
//! - A meta-estimator that trains on a transformed target and maps
//!   predictions back to the original target space
//!
//! # Modules
//!
//! - [`intents`] - Intent declarations, registry, traversal and resolution
//! - [`estimators`] - Estimator protocol, linear models, meta-estimator
//! - [`preprocessing`] - Target scalers and encoders
//! - [`foreshadow`] - Top-level fit/predict surface
//! - [`config`] - Serializable configuration

// Core error handling
pub mod error;
pub mod config;

// Intent inference
pub mod intents;

// Modeling
pub mod estimators;
pub mod preprocessing;
pub mod foreshadow;

pub use error::{ForeshadowError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{ForeshadowError, Result};

    // Configuration
    pub use crate::config::{ForeshadowConfig, IntentConfig};

    // Intents
    pub use crate::intents::{
        ColumnIntent, IntentClass, IntentDefinition, IntentDtype, IntentInstance, IntentMatcher,
        IntentRegistry, IntentResolver,
    };

    // Estimators
    pub use crate::estimators::{
        Estimator, InverseTransform, LinearRegression, LogisticRegression, MetaEstimator,
        ProbabilisticEstimator, Target, TargetTransformer,
    };

    // Preprocessing
    pub use crate::preprocessing::{FramePreprocessor, LabelEncoder, PassThrough, Scaler, ScalerType};

    pub use crate::foreshadow::Foreshadow;
}
