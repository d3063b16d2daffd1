//! Value synchronization between a committed value and its displayed form.
//!
//! The pipeline keeps two slots per control instance:
//! - the displayed value, freely overwritten by `on_change` while editing
//! - the last correct value, the most recent value known to be committed
//!
//! `on_update` runs validate -> sanitize -> equality check -> commit. An
//! invalid edit snaps the display back to the formatted last correct value;
//! a canonical value equal to the last correct value is a no-op, so repeated
//! commits never call `set` twice.
//!
//! External changes arrive through `sync_external`. They are adopted only when
//! they differ from the last correct value, which is what keeps a commit from
//! echoing back into the control as an "external" update.
//!
//! Values coming from outside (the mount value and external changes) are
//! canonicalized before they become the last correct value: a valid value is
//! sanitized, an invalid one is kept verbatim. A value mounted in a
//! non-canonical form therefore does not commit on its first update.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::plugin::PluginRegistry;

/// Commit callback invoked with each accepted, changed canonical value.
pub type Setter<V> = Box<dyn FnMut(&V)>;

/// Result of running the update path on a display value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Validation passed and the canonical value was committed via `set`.
    Committed,
    /// Canonical value equals the last committed value; nothing happened.
    Unchanged,
    /// Validation failed; the display was reset to the last correct value.
    RolledBack,
}

impl UpdateOutcome {
    pub fn is_committed(self) -> bool {
        matches!(self, Self::Committed)
    }
}

/// Per-instance value pipeline.
pub struct ValuePipeline<V, S> {
    kind: String,
    registry: Arc<PluginRegistry<V, S>>,
    settings: S,
    last_correct: V,
    displayed: V,
    set: Setter<V>,
}

impl<V, S> fmt::Debug for ValuePipeline<V, S>
where
    V: fmt::Debug,
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuePipeline")
            .field("kind", &self.kind)
            .field("settings", &self.settings)
            .field("last_correct", &self.last_correct)
            .field("displayed", &self.displayed)
            .finish_non_exhaustive()
    }
}

impl<V, S> ValuePipeline<V, S>
where
    V: Clone + PartialEq + fmt::Debug,
{
    /// Mount a pipeline on the externally committed `value`.
    ///
    /// The displayed value starts as the formatted committed value.
    pub fn new(
        kind: impl Into<String>,
        value: V,
        settings: S,
        registry: Arc<PluginRegistry<V, S>>,
        set: Setter<V>,
    ) -> Self {
        let kind = kind.into();
        let last_correct = canonicalize(&registry, &kind, &value, &settings);
        let displayed = registry.format(&kind, &last_correct, &settings);
        Self {
            kind,
            registry,
            settings,
            last_correct,
            displayed,
            set,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    pub fn displayed_value(&self) -> &V {
        &self.displayed
    }

    pub fn last_correct_value(&self) -> &V {
        &self.last_correct
    }

    /// Store an in-progress edit verbatim. No validation, no commit.
    pub fn on_change(&mut self, value: V) {
        self.displayed = value;
    }

    /// Validate, sanitize and commit a display value.
    pub fn on_update(&mut self, value: &V) -> UpdateOutcome {
        if !self.registry.validate(&self.kind, value, &self.settings) {
            debug!(kind = %self.kind, ?value, "rejected edit, rolling back");
            self.displayed = self.format(&self.last_correct);
            return UpdateOutcome::RolledBack;
        }

        let canonical = self.registry.sanitize(&self.kind, value, &self.settings);
        if canonical == self.last_correct {
            debug!(kind = %self.kind, "canonical value unchanged, skipping commit");
            return UpdateOutcome::Unchanged;
        }

        debug!(kind = %self.kind, value = ?canonical, "committing value");
        self.displayed = self.format(&canonical);
        (self.set)(&canonical);
        self.last_correct = canonical;
        UpdateOutcome::Committed
    }

    /// Reconcile with the externally owned value.
    ///
    /// Returns `true` when the value differed from the last correct value and
    /// was adopted. `set` is never called from here.
    pub fn sync_external(&mut self, value: &V) -> bool {
        let value = canonicalize(&self.registry, &self.kind, value, &self.settings);
        if value == self.last_correct {
            return false;
        }
        debug!(kind = %self.kind, ?value, "adopting external value");
        self.displayed = self.format(&value);
        self.last_correct = value;
        true
    }

    fn format(&self, value: &V) -> V {
        self.registry.format(&self.kind, value, &self.settings)
    }
}

fn canonicalize<V: Clone, S>(
    registry: &PluginRegistry<V, S>,
    kind: &str,
    value: &V,
    settings: &S,
) -> V {
    if registry.validate(kind, value, settings) {
        registry.sanitize(kind, value, settings)
    } else {
        value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::Plugin;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<i64>>>;

    fn recorder() -> (Log, Setter<i64>) {
        let log: Log = Rc::default();
        let sink = Rc::clone(&log);
        (log, Box::new(move |v: &i64| sink.borrow_mut().push(*v)))
    }

    /// Non-negative integers, sanitized to multiples of ten, displayed negated
    /// so that formatting is observable.
    fn tens_registry() -> Arc<PluginRegistry<i64, ()>> {
        let mut reg = PluginRegistry::new();
        reg.register(
            "tens",
            Plugin::new()
                .with_validator(|v: &i64, _: &()| *v >= 0)
                .with_sanitizer(|v: &i64, _: &()| v / 10 * 10)
                .with_formatter(|v: &i64, _: &()| -v),
        );
        Arc::new(reg)
    }

    #[test]
    fn mount_formats_initial_value() {
        let (log, set) = recorder();
        let p = ValuePipeline::new("tens", 40, (), tens_registry(), set);
        assert_eq!(*p.displayed_value(), -40);
        assert_eq!(*p.last_correct_value(), 40);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn on_change_stores_verbatim() {
        let (log, set) = recorder();
        let mut p = ValuePipeline::new("tens", 40, (), tens_registry(), set);
        p.on_change(-999);
        assert_eq!(*p.displayed_value(), -999);
        assert_eq!(*p.last_correct_value(), 40);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn update_commits_sanitized_value() {
        let (log, set) = recorder();
        let mut p = ValuePipeline::new("tens", 40, (), tens_registry(), set);
        assert_eq!(p.on_update(&57), UpdateOutcome::Committed);
        assert_eq!(*p.last_correct_value(), 50);
        assert_eq!(*p.displayed_value(), -50);
        assert_eq!(*log.borrow(), vec![50]);
    }

    #[test]
    fn repeated_commit_is_noop() {
        let (log, set) = recorder();
        let mut p = ValuePipeline::new("tens", 40, (), tens_registry(), set);
        assert_eq!(p.on_update(&57), UpdateOutcome::Committed);
        assert_eq!(p.on_update(&57), UpdateOutcome::Unchanged);
        // sanitizes to the same canonical value
        assert_eq!(p.on_update(&51), UpdateOutcome::Unchanged);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn invalid_edit_rolls_back() {
        let (log, set) = recorder();
        let mut p = ValuePipeline::new("tens", 40, (), tens_registry(), set);
        p.on_change(-5);
        assert_eq!(p.on_update(&-5), UpdateOutcome::RolledBack);
        assert_eq!(*p.last_correct_value(), 40);
        assert_eq!(*p.displayed_value(), -40);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn unregistered_type_commits_verbatim() {
        let (log, set) = recorder();
        let mut p = ValuePipeline::new("unknown", 1, (), Arc::new(PluginRegistry::new()), set);
        assert_eq!(p.on_update(&-3), UpdateOutcome::Committed);
        assert_eq!(*p.displayed_value(), -3);
        assert_eq!(*log.borrow(), vec![-3]);
    }

    #[test]
    fn external_change_adopted_without_set() {
        let (log, set) = recorder();
        let mut p = ValuePipeline::new("tens", 40, (), tens_registry(), set);
        assert!(p.sync_external(&90));
        assert_eq!(*p.displayed_value(), -90);
        assert_eq!(*p.last_correct_value(), 90);
        assert!(log.borrow().is_empty());

        // committing the adopted value again is a no-op
        assert_eq!(p.on_update(&90), UpdateOutcome::Unchanged);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn own_commit_echo_is_ignored() {
        let (_log, set) = recorder();
        let mut p = ValuePipeline::new("tens", 40, (), tens_registry(), set);
        p.on_update(&70);
        p.on_change(-123);
        // the owner echoes the committed value back
        assert!(!p.sync_external(&70));
        assert_eq!(*p.displayed_value(), -123);
    }

    #[test]
    fn mount_value_is_canonicalized() {
        let (log, set) = recorder();
        let mut p = ValuePipeline::new("tens", 47, (), tens_registry(), set);
        assert_eq!(*p.last_correct_value(), 40);
        assert_eq!(*p.displayed_value(), -40);

        // the displayed form of the mount value is not a change
        assert_eq!(p.on_update(&47), UpdateOutcome::Unchanged);
        assert!(log.borrow().is_empty());
        // neither is the owner's non-canonical copy
        assert!(!p.sync_external(&47));
    }

    #[test]
    fn invalid_external_value_is_kept_verbatim() {
        let (_log, set) = recorder();
        let mut p = ValuePipeline::new("tens", 40, (), tens_registry(), set);
        assert!(p.sync_external(&-7));
        assert_eq!(*p.last_correct_value(), -7);
    }
}
