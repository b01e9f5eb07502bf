//! Hook registry: extension point name to its callback set.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use super::callback_set::{CallbackEntry, CallbackSet};
use crate::callback::{HookCallback, HookValue};

/// Registry of callbacks organized by extension point.
///
/// This is the raw store; it performs no module discovery. Modules register
/// into it directly while they are being loaded.
#[derive(Debug)]
pub struct HookRegistry {
    /// Point name → callbacks in registration order.
    points: RwLock<HashMap<String, CallbackSet>>,
}

impl HookRegistry {
    /// Creates a new empty hook registry.
    pub fn new() -> Self {
        Self {
            points: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a callback on a point, creating the point if needed.
    pub async fn register(
        &self,
        point: &str,
        callback: Arc<dyn HookCallback>,
        args: Vec<HookValue>,
    ) {
        let callback_id = callback.id().to_string();
        let arg_count = args.len();

        let mut points = self.points.write().await;
        let set = points
            .entry(point.to_string())
            .or_insert_with(|| CallbackSet::new(point));
        let replaced = set.add(callback, args);

        info!(
            point = %point,
            callback = %callback_id,
            args = arg_count,
            replaced = replaced,
            "Hook callback registered"
        );
    }

    /// Returns a copy of a point's entries in registration order, or `None`
    /// if nothing was ever registered there.
    ///
    /// The lock is released before the caller runs anything, so callbacks
    /// are free to register further callbacks.
    pub async fn snapshot(&self, point: &str) -> Option<Vec<CallbackEntry>> {
        let points = self.points.read().await;
        points.get(point).map(|set| set.iter().cloned().collect())
    }

    /// Returns whether any callbacks are registered for a point.
    pub async fn has_callbacks(&self, point: &str) -> bool {
        let points = self.points.read().await;
        points.get(point).map(|set| !set.is_empty()).unwrap_or(false)
    }

    /// Returns the number of callbacks registered for a point.
    pub async fn callback_count(&self, point: &str) -> usize {
        let points = self.points.read().await;
        points.get(point).map(|set| set.len()).unwrap_or(0)
    }

    /// Returns all registered point names, sorted.
    pub async fn registered_points(&self) -> Vec<String> {
        let points = self.points.read().await;
        let mut names: Vec<String> = points.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}
