//! Hook dispatcher: runs a point's callbacks and combines their results.
//!
//! With the default [`DispatchConfig`]:
//! - Every callback receives the value originally passed in, not the
//!   previous callback's result.
//! - The result of the last callback is returned; earlier results are
//!   discarded.
//! - A sequence value (JSON array) is spread into positional arguments.
//! - A point with no callbacks returns the value unchanged, except that a
//!   sequence yields only its first element.
//!
//! `chain_filters` and `unwrap_unregistered_sequence` switch off the two
//! legacy behaviors respectively.

use std::sync::Arc;

use tracing::debug;

use hookwire_core::config::dispatch::DispatchConfig;
use hookwire_core::{AppError, AppResult, ErrorKind};

use super::callback_set::CallbackEntry;
use super::registry::HookRegistry;
use crate::callback::HookValue;

/// Dispatches filters and actions to registered callbacks.
#[derive(Debug)]
pub struct HookDispatcher {
    /// Hook registry.
    registry: Arc<HookRegistry>,
    /// Result-combination switches.
    config: DispatchConfig,
}

impl HookDispatcher {
    /// Creates a new hook dispatcher.
    pub fn new(registry: Arc<HookRegistry>, config: DispatchConfig) -> Self {
        Self { registry, config }
    }

    /// Passes `value` through every callback registered on `point`.
    ///
    /// The first callback error aborts the remaining callbacks and is
    /// returned as an [`ErrorKind::Invocation`] error.
    pub async fn apply(&self, point: &str, value: HookValue) -> AppResult<HookValue> {
        let entries = match self.registry.snapshot(point).await {
            Some(entries) if !entries.is_empty() => entries,
            _ => {
                debug!(point = %point, "No callbacks registered, passing value through");
                return Ok(self.passthrough(value));
            }
        };

        debug!(
            point = %point,
            callback_count = entries.len(),
            chained = self.config.chain_filters,
            "Applying filter"
        );

        let mut returned: Option<HookValue> = None;

        for entry in &entries {
            let input = match (&returned, self.config.chain_filters) {
                (Some(previous), true) => previous.clone(),
                _ => value.clone(),
            };
            returned = Some(self.invoke(point, entry, input).await?);
        }

        Ok(returned.unwrap_or(value))
    }

    /// Fires an action: every callback receives the empty string and results
    /// are discarded.
    pub async fn fire(&self, point: &str) -> AppResult<()> {
        self.apply(point, HookValue::String(String::new())).await?;
        Ok(())
    }

    /// Returns a reference to the hook registry.
    pub fn registry(&self) -> &Arc<HookRegistry> {
        &self.registry
    }

    /// Returns the active dispatch switches.
    pub fn config(&self) -> DispatchConfig {
        self.config
    }

    fn passthrough(&self, value: HookValue) -> HookValue {
        match value {
            HookValue::Array(items) if self.config.unwrap_unregistered_sequence => {
                items.into_iter().next().unwrap_or(HookValue::Null)
            }
            other => other,
        }
    }

    async fn invoke(
        &self,
        point: &str,
        entry: &CallbackEntry,
        input: HookValue,
    ) -> AppResult<HookValue> {
        let args = spread(input);

        if let Some(expected) = entry.callback.arity() {
            if expected != args.len() {
                return Err(AppError::invocation(format!(
                    "Callback '{}' on '{}' expects {} argument(s), got {}",
                    entry.id(),
                    point,
                    expected,
                    args.len()
                )));
            }
        }

        debug!(point = %point, callback = %entry.id(), args = args.len(), "Invoking callback");

        entry.callback.call(args).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Invocation,
                format!("Callback '{}' on '{}' failed: {}", entry.id(), point, e.message),
                e,
            )
        })
    }
}

/// Converts a value into positional arguments.
fn spread(value: HookValue) -> Vec<HookValue> {
    match value {
        HookValue::Array(items) => items,
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::{FnCallback, HookCallback};
    use serde_json::json;

    fn dispatcher(config: DispatchConfig) -> HookDispatcher {
        HookDispatcher::new(Arc::new(HookRegistry::new()), config)
    }

    fn double() -> Arc<dyn HookCallback> {
        FnCallback::unary("double", |v| Ok(json!(v.as_i64().unwrap_or(0) * 2))).shared()
    }

    fn add_one() -> Arc<dyn HookCallback> {
        FnCallback::unary("add_one", |v| Ok(json!(v.as_i64().unwrap_or(0) + 1))).shared()
    }

    #[test]
    fn test_spread() {
        assert_eq!(spread(json!([1, 2])), vec![json!(1), json!(2)]);
        assert_eq!(spread(json!("x")), vec![json!("x")]);
        assert!(spread(json!([])).is_empty());
    }

    #[tokio::test]
    async fn test_unregistered_scalar_passes_through() {
        let d = dispatcher(DispatchConfig::default());
        assert_eq!(d.apply("unused", json!(5)).await.unwrap(), json!(5));
        assert_eq!(d.apply("unused", json!("s")).await.unwrap(), json!("s"));
    }

    #[tokio::test]
    async fn test_unregistered_sequence_yields_first_element() {
        let d = dispatcher(DispatchConfig::default());
        assert_eq!(d.apply("unused", json!([1, 2, 3])).await.unwrap(), json!(1));
        assert_eq!(d.apply("unused", json!([])).await.unwrap(), HookValue::Null);
    }

    #[tokio::test]
    async fn test_unregistered_sequence_unchanged_when_unwrap_disabled() {
        let d = dispatcher(DispatchConfig {
            unwrap_unregistered_sequence: false,
            ..DispatchConfig::default()
        });
        assert_eq!(
            d.apply("unused", json!([1, 2, 3])).await.unwrap(),
            json!([1, 2, 3])
        );
    }

    #[tokio::test]
    async fn test_each_callback_sees_original_value() {
        let d = dispatcher(DispatchConfig::default());
        d.registry().register("calc", double(), Vec::new()).await;
        d.registry().register("calc", add_one(), Vec::new()).await;

        // add_one(5), not add_one(double(5))
        assert_eq!(d.apply("calc", json!(5)).await.unwrap(), json!(6));
    }

    #[tokio::test]
    async fn test_chained_mode_threads_results() {
        let d = dispatcher(DispatchConfig {
            chain_filters: true,
            ..DispatchConfig::default()
        });
        d.registry().register("calc", double(), Vec::new()).await;
        d.registry().register("calc", add_one(), Vec::new()).await;

        assert_eq!(d.apply("calc", json!(5)).await.unwrap(), json!(11));
    }

    #[tokio::test]
    async fn test_sequence_is_spread_into_arguments() {
        let d = dispatcher(DispatchConfig::default());
        let sum = FnCallback::new("sum", |args| {
            Ok(json!(args.iter().filter_map(|v| v.as_i64()).sum::<i64>()))
        })
        .shared();
        d.registry().register("total", sum, Vec::new()).await;

        assert_eq!(d.apply("total", json!([1, 2, 3])).await.unwrap(), json!(6));
    }

    #[tokio::test]
    async fn test_arity_mismatch_is_invocation_error() {
        let d = dispatcher(DispatchConfig::default());
        d.registry().register("calc", double(), Vec::new()).await;

        let err = d.apply("calc", json!([1, 2])).await.unwrap_err();
        assert!(err.is(ErrorKind::Invocation));
        assert!(err.message.contains("double"));
    }

    #[tokio::test]
    async fn test_callback_error_stops_dispatch() {
        let d = dispatcher(DispatchConfig::default());
        let failing =
            FnCallback::new("broken", |_| Err(AppError::invocation("boom"))).shared();
        d.registry().register("p", failing, Vec::new()).await;
        d.registry().register("p", double(), Vec::new()).await;

        let err = d.apply("p", json!(1)).await.unwrap_err();
        assert!(err.is(ErrorKind::Invocation));
        assert!(err.message.contains("boom"));
    }

    #[tokio::test]
    async fn test_fire_passes_empty_string() {
        let d = dispatcher(DispatchConfig::default());
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let record = FnCallback::new("record", move |args| {
            sink.lock().unwrap().push(args.to_vec());
            Ok(HookValue::Null)
        })
        .shared();
        d.registry().register("on_startup", record, Vec::new()).await;

        d.fire("on_startup").await.unwrap();
        d.fire("nothing_here").await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![vec![json!("")]]);
    }
}
