//! Callback trait and closure adapters.
//!
//! A callback is identified by its [`HookCallback::id`]; registering a second
//! callback with the same id on the same point replaces the first.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use hookwire_core::{AppError, AppResult};

/// Value passed through filters and actions.
///
/// A JSON array is treated as a sequence of positional arguments; every
/// other variant is passed as a single argument.
pub type HookValue = serde_json::Value;

/// Trait for anything that can be attached to an extension point.
#[async_trait]
pub trait HookCallback: Send + Sync + std::fmt::Debug {
    /// Returns the identity used to deduplicate registrations.
    fn id(&self) -> &str;

    /// Returns the exact number of positional arguments accepted, or `None`
    /// when the callback takes any number.
    fn arity(&self) -> Option<usize> {
        None
    }

    /// Invokes the callback with positional arguments.
    async fn call(&self, args: Vec<HookValue>) -> AppResult<HookValue>;
}

type AsyncCallFn = Arc<
    dyn Fn(Vec<HookValue>) -> Pin<Box<dyn Future<Output = AppResult<HookValue>> + Send>>
        + Send
        + Sync,
>;

/// A callback backed by an async closure.
pub struct ClosureCallback {
    /// Callback identity.
    id: String,
    /// Fixed argument count, if any.
    arity: Option<usize>,
    /// Closure body.
    handler: AsyncCallFn,
}

impl std::fmt::Debug for ClosureCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosureCallback")
            .field("id", &self.id)
            .field("arity", &self.arity)
            .field("handler", &"<closure>")
            .finish()
    }
}

impl ClosureCallback {
    /// Creates a variadic callback from an async closure.
    pub fn new<F, Fut>(id: &str, handler: F) -> Self
    where
        F: Fn(Vec<HookValue>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<HookValue>> + Send + 'static,
    {
        Self {
            id: id.to_string(),
            arity: None,
            handler: Arc::new(move |args| Box::pin(handler(args))),
        }
    }

    /// Restricts the callback to exactly `arity` positional arguments.
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = Some(arity);
        self
    }

    /// Wraps this callback into an `Arc<dyn HookCallback>`.
    pub fn shared(self) -> Arc<dyn HookCallback> {
        Arc::new(self)
    }
}

#[async_trait]
impl HookCallback for ClosureCallback {
    fn id(&self) -> &str {
        &self.id
    }

    fn arity(&self) -> Option<usize> {
        self.arity
    }

    async fn call(&self, args: Vec<HookValue>) -> AppResult<HookValue> {
        (self.handler)(args).await
    }
}

type SyncCallFn = Arc<dyn Fn(&[HookValue]) -> AppResult<HookValue> + Send + Sync>;

/// A callback backed by a plain synchronous function.
pub struct FnCallback {
    /// Callback identity.
    id: String,
    /// Fixed argument count, if any.
    arity: Option<usize>,
    /// Function body.
    func: SyncCallFn,
}

impl std::fmt::Debug for FnCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCallback")
            .field("id", &self.id)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl FnCallback {
    /// Creates a variadic callback from a function over positional arguments.
    pub fn new<F>(id: &str, func: F) -> Self
    where
        F: Fn(&[HookValue]) -> AppResult<HookValue> + Send + Sync + 'static,
    {
        Self {
            id: id.to_string(),
            arity: None,
            func: Arc::new(func),
        }
    }

    /// Creates a single-argument callback.
    pub fn unary<F>(id: &str, func: F) -> Self
    where
        F: Fn(&HookValue) -> AppResult<HookValue> + Send + Sync + 'static,
    {
        let name = id.to_string();
        Self::new(id, move |args| match args {
            [value] => func(value),
            _ => Err(AppError::invocation(format!(
                "callback '{}' expects 1 argument, got {}",
                name,
                args.len()
            ))),
        })
        .with_arity(1)
    }

    /// Restricts the callback to exactly `arity` positional arguments.
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = Some(arity);
        self
    }

    /// Wraps this callback into an `Arc<dyn HookCallback>`.
    pub fn shared(self) -> Arc<dyn HookCallback> {
        Arc::new(self)
    }
}

#[async_trait]
impl HookCallback for FnCallback {
    fn id(&self) -> &str {
        &self.id
    }

    fn arity(&self) -> Option<usize> {
        self.arity
    }

    async fn call(&self, args: Vec<HookValue>) -> AppResult<HookValue> {
        (self.func)(&args)
    }
}
