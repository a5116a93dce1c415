//! Intent registry and tree traversal

use super::base::{IntentClass, IntentDefinition, IntentInstance, BASE_INTENT};
use crate::error::{ForeshadowError, Result};
use lazy_static::lazy_static;
use parking_lot::RwLock;
use polars::prelude::Series;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

lazy_static! {
    static ref GLOBAL_REGISTRY: IntentRegistry = IntentRegistry::new();
}

/// Table of registered intents, keyed by name.
///
/// Cloning yields a handle to the same table.
#[derive(Clone)]
pub struct IntentRegistry {
    entries: Arc<RwLock<HashMap<String, Arc<IntentClass>>>>,
    base: Arc<IntentClass>,
}

impl IntentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            base: Arc::new(IntentClass::base()),
        }
    }

    /// Validate and register an intent.
    ///
    /// Fails if the definition lacks `dtype` or `children`, or if the name is
    /// already taken.
    pub fn register(&self, definition: IntentDefinition) -> Result<Arc<IntentClass>> {
        let class = Arc::new(definition.validate()?);
        let mut entries = self.entries.write();
        if entries.contains_key(class.name()) {
            return Err(ForeshadowError::ConfigError(format!(
                "Intent {} is already registered",
                class.name()
            )));
        }
        entries.insert(class.name().to_string(), Arc::clone(&class));
        info!(intent = class.name(), children = ?class.children(), "Registered intent");
        Ok(class)
    }

    /// Register unless an intent with the same name exists, in which case the
    /// existing class is returned
    pub fn register_if_absent(&self, definition: IntentDefinition) -> Result<Arc<IntentClass>> {
        let class = definition.validate()?;
        let mut entries = self.entries.write();
        if let Some(existing) = entries.get(class.name()) {
            return Ok(Arc::clone(existing));
        }
        let class = Arc::new(class);
        entries.insert(class.name().to_string(), Arc::clone(&class));
        info!(intent = class.name(), "Registered intent");
        Ok(class)
    }

    /// Remove the named intents.
    ///
    /// Either every name is removed or, if any is unknown, none is.
    pub fn unregister<I, S>(&self, names: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        let mut entries = self.entries.write();
        if let Some(missing) = names.iter().find(|n| !entries.contains_key(n.as_str())) {
            return Err(ForeshadowError::IntentNotFound(missing.clone()));
        }
        let mut removed = 0;
        for name in &names {
            if entries.remove(name.as_str()).is_some() {
                removed += 1;
            }
        }
        debug!(removed, "Unregistered intents");
        Ok(removed)
    }

    /// Remove every registered intent
    pub fn clear(&self) {
        self.entries.write().clear();
        debug!("Cleared intent registry");
    }

    /// Look up an intent. `BaseIntent` always resolves to the abstract base.
    pub fn get(&self, name: &str) -> Result<Arc<IntentClass>> {
        if name == BASE_INTENT {
            return Ok(Arc::clone(&self.base));
        }
        self.entries
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ForeshadowError::IntentNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Instantiate the named intent
    pub fn instantiate(&self, name: &str) -> Result<IntentInstance> {
        self.get(name)?.instantiate()
    }

    /// Intents of the tree rooted at `root`, most specific first.
    ///
    /// Each child's whole subtree is emitted, children in listed order, before
    /// the node itself; the root is always last.
    pub fn priority_traverse(&self, root: &str) -> Result<Vec<Arc<IntentClass>>> {
        let entries = self.entries.read();
        let root = self.lookup(&entries, root)?;
        let mut order = Vec::new();
        let mut path = Vec::new();
        self.visit_post_order(&entries, &root, &mut path, &mut order)?;
        Ok(order)
    }

    /// Render the tree rooted at `root`: one line per intent, pre-order,
    /// indented with one tab per level of depth
    pub fn render_tree(&self, root: &str) -> Result<String> {
        let entries = self.entries.read();
        let root = self.lookup(&entries, root)?;
        let mut out = String::new();
        let mut path = Vec::new();
        self.visit_pre_order(&entries, &root, 0, &mut path, &mut out)?;
        Ok(out)
    }

    /// Most specific intent under `root` that matches `column`
    pub fn classify(&self, root: &str, column: &Series) -> Result<Arc<IntentClass>> {
        let order = self.priority_traverse(root)?;
        first_match(&order, column)?.ok_or_else(|| {
            ForeshadowError::IntentNotFound(format!(
                "no intent under {} matches column {}",
                root,
                column.name()
            ))
        })
    }

    fn lookup(
        &self,
        entries: &HashMap<String, Arc<IntentClass>>,
        name: &str,
    ) -> Result<Arc<IntentClass>> {
        if name == BASE_INTENT {
            return Ok(Arc::clone(&self.base));
        }
        entries
            .get(name)
            .cloned()
            .ok_or_else(|| ForeshadowError::IntentNotFound(name.to_string()))
    }

    fn enter(path: &mut Vec<String>, name: &str) -> Result<()> {
        if path.iter().any(|p| p == name) {
            return Err(ForeshadowError::ConfigError(format!(
                "Intent hierarchy contains a cycle: {} -> {}",
                path.join(" -> "),
                name
            )));
        }
        path.push(name.to_string());
        Ok(())
    }

    fn visit_post_order(
        &self,
        entries: &HashMap<String, Arc<IntentClass>>,
        node: &Arc<IntentClass>,
        path: &mut Vec<String>,
        order: &mut Vec<Arc<IntentClass>>,
    ) -> Result<()> {
        Self::enter(path, node.name())?;
        for child in node.children() {
            let child = self.lookup(entries, child)?;
            self.visit_post_order(entries, &child, path, order)?;
        }
        path.pop();
        order.push(Arc::clone(node));
        Ok(())
    }

    fn visit_pre_order(
        &self,
        entries: &HashMap<String, Arc<IntentClass>>,
        node: &Arc<IntentClass>,
        depth: usize,
        path: &mut Vec<String>,
        out: &mut String,
    ) -> Result<()> {
        Self::enter(path, node.name())?;
        out.push_str(&"\t".repeat(depth));
        out.push_str(node.name());
        out.push('\n');
        for child in node.children() {
            let child = self.lookup(entries, child)?;
            self.visit_pre_order(entries, &child, depth + 1, path, out)?;
        }
        path.pop();
        Ok(())
    }
}

impl Default for IntentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// First intent in `order` whose matcher accepts `column`
pub(crate) fn first_match(
    order: &[Arc<IntentClass>],
    column: &Series,
) -> Result<Option<Arc<IntentClass>>> {
    for intent in order {
        if intent.is_intent(column)? {
            debug!(column = %column.name(), intent = intent.name(), "Column classified");
            return Ok(Some(Arc::clone(intent)));
        }
    }
    Ok(None)
}

/// The process-wide registry
pub fn global_registry() -> &'static IntentRegistry {
    &GLOBAL_REGISTRY
}

/// Register an intent in the process-wide registry
pub fn register_intent(definition: IntentDefinition) -> Result<Arc<IntentClass>> {
    global_registry().register(definition)
}

/// Remove intents from the process-wide registry
pub fn unregister_intent<I, S>(names: I) -> Result<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    global_registry().unregister(names)
}

/// Priority order of a tree in the process-wide registry
pub fn priority_traverse(root: &str) -> Result<Vec<Arc<IntentClass>>> {
    global_registry().priority_traverse(root)
}

/// Rendering of a tree in the process-wide registry
pub fn render_tree(root: &str) -> Result<String> {
    global_registry().render_tree(root)
}
