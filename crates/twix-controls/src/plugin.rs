//! Per-type plugin table for sanitize/validate/format steps.
//!
//! A control "type" (e.g. `"spring"`) maps to an optional set of three
//! functions. Any missing function falls back to identity (sanitize, format)
//! or always-valid (validate), and an unregistered type behaves the same as a
//! type registered with no functions.
//!
//! The registry is built once and then shared read-only (typically behind an
//! `Arc`) by every control instance.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Maps a display value to its canonical form.
pub type Sanitizer<V, S> = Arc<dyn Fn(&V, &S) -> V + Send + Sync>;
/// Decides whether a display value may be committed.
pub type Validator<V, S> = Arc<dyn Fn(&V, &S) -> bool + Send + Sync>;
/// Projects a canonical value into its displayed form.
pub type Formatter<V, S> = Arc<dyn Fn(&V, &S) -> V + Send + Sync>;

/// Optional pipeline functions registered for one control type.
pub struct Plugin<V, S> {
    pub sanitizer: Option<Sanitizer<V, S>>,
    pub validator: Option<Validator<V, S>>,
    pub formatter: Option<Formatter<V, S>>,
}

impl<V, S> Plugin<V, S> {
    /// A plugin with no functions: identity / always-valid.
    pub fn new() -> Self {
        Self {
            sanitizer: None,
            validator: None,
            formatter: None,
        }
    }

    pub fn with_sanitizer(mut self, f: impl Fn(&V, &S) -> V + Send + Sync + 'static) -> Self {
        self.sanitizer = Some(Arc::new(f));
        self
    }

    pub fn with_validator(mut self, f: impl Fn(&V, &S) -> bool + Send + Sync + 'static) -> Self {
        self.validator = Some(Arc::new(f));
        self
    }

    pub fn with_formatter(mut self, f: impl Fn(&V, &S) -> V + Send + Sync + 'static) -> Self {
        self.formatter = Some(Arc::new(f));
        self
    }
}

impl<V, S> Default for Plugin<V, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> Clone for Plugin<V, S> {
    fn clone(&self) -> Self {
        Self {
            sanitizer: self.sanitizer.clone(),
            validator: self.validator.clone(),
            formatter: self.formatter.clone(),
        }
    }
}

impl<V, S> fmt::Debug for Plugin<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("sanitizer", &self.sanitizer.is_some())
            .field("validator", &self.validator.is_some())
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

/// Registry of plugins keyed by control type.
pub struct PluginRegistry<V, S> {
    plugins: HashMap<String, Plugin<V, S>>,
}

impl<V, S> Default for PluginRegistry<V, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> fmt::Debug for PluginRegistry<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.plugins.iter()).finish()
    }
}

impl<V, S> PluginRegistry<V, S> {
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
        }
    }

    /// Register (or replace) the plugin for `kind`.
    pub fn register(&mut self, kind: impl Into<String>, plugin: Plugin<V, S>) {
        self.plugins.insert(kind.into(), plugin);
    }

    pub fn get(&self, kind: &str) -> Option<&Plugin<V, S>> {
        self.plugins.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.plugins.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl<V: Clone, S> PluginRegistry<V, S> {
    pub fn sanitize(&self, kind: &str, value: &V, settings: &S) -> V {
        match self.get(kind).and_then(|p| p.sanitizer.as_ref()) {
            Some(sanitizer) => sanitizer(value, settings),
            None => value.clone(),
        }
    }

    pub fn format(&self, kind: &str, value: &V, settings: &S) -> V {
        match self.get(kind).and_then(|p| p.formatter.as_ref()) {
            Some(formatter) => formatter(value, settings),
            None => value.clone(),
        }
    }

    pub fn validate(&self, kind: &str, value: &V, settings: &S) -> bool {
        match self.get(kind).and_then(|p| p.validator.as_ref()) {
            Some(validator) => validator(value, settings),
            None => true,
        }
    }
}
