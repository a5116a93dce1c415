//! Column intent inference
//!
//! An intent is the semantic type of a column (numeric, categorical, ...),
//! distinct from its storage type. Intents form a tree: every intent names
//! its children in priority order, and a column is classified by trying the
//! most specific intents first and falling back toward the root.
//!
//! - [`IntentDefinition`] declares an intent; [`IntentRegistry::register`]
//!   validates it into an [`IntentClass`]
//! - [`IntentRegistry::priority_traverse`] orders a tree deepest-first
//! - [`IntentRegistry::render_tree`] renders a tree as indented text
//! - [`IntentResolver`] assigns an intent to every column of a frame

mod base;
mod registry;
pub mod builtin;
mod resolver;

pub use base::{IntentClass, IntentDefinition, IntentDtype, IntentInstance, IntentMatcher, BASE_INTENT};
pub use builtin::{init_builtin_intents, register_builtin_intents, GENERIC_INTENT, NUMERIC_INTENT, CATEGORICAL_INTENT};
pub use registry::{
    global_registry, priority_traverse, register_intent, render_tree, unregister_intent,
    IntentRegistry,
};
pub use resolver::{ColumnIntent, IntentResolver};
