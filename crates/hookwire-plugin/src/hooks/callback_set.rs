//! Ordered set of callbacks attached to one extension point.

use std::sync::Arc;

use crate::callback::{HookCallback, HookValue};

/// A registered callback together with the extra arguments supplied at
/// registration time.
///
/// The extra arguments are stored for inspection only; invocation never
/// passes them to the callback.
#[derive(Debug, Clone)]
pub struct CallbackEntry {
    /// The callback.
    pub callback: Arc<dyn HookCallback>,
    /// Extra registration arguments.
    pub args: Vec<HookValue>,
}

impl CallbackEntry {
    /// Returns the callback identity.
    pub fn id(&self) -> &str {
        self.callback.id()
    }
}

/// Callbacks for a single extension point, in registration order.
///
/// Re-adding an identity that is already present replaces its callback and
/// arguments without moving it.
#[derive(Debug, Clone)]
pub struct CallbackSet {
    name: String,
    entries: Vec<CallbackEntry>,
}

impl CallbackSet {
    /// Creates an empty set for the named point.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Inserts or overwrites the entry for the callback's identity.
    ///
    /// Returns `true` if an existing entry was replaced.
    pub fn add(&mut self, callback: Arc<dyn HookCallback>, args: Vec<HookValue>) -> bool {
        match self.position(callback.id()) {
            Some(index) => {
                self.entries[index] = CallbackEntry { callback, args };
                true
            }
            None => {
                self.entries.push(CallbackEntry { callback, args });
                false
            }
        }
    }

    /// Returns the point name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterates entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CallbackEntry> {
        self.entries.iter()
    }

    /// Returns the entry registered under `id`.
    pub fn get(&self, id: &str) -> Option<&CallbackEntry> {
        self.position(id).map(|index| &self.entries[index])
    }

    /// Returns whether a callback with this identity is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Returns the number of registered callbacks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no callbacks are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }
}

impl<'a> IntoIterator for &'a CallbackSet {
    type Item = &'a CallbackEntry;
    type IntoIter = std::slice::Iter<'a, CallbackEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
