//! # hookwire-plugin
//!
//! Named extension points for hookwire. Provides:
//!
//! - Filter and action registration keyed by callback identity
//! - Invocation in registration order with legacy-compatible result rules
//! - One-shot discovery of module manifests in configured directories
//! - A catalog loader for compiled-in modules

pub mod callback;
pub mod discovery;
pub mod hooks;
pub mod loader;
pub mod macros;
pub mod manager;
pub mod prelude;

pub use callback::{ClosureCallback, FnCallback, HookCallback, HookValue};
pub use hooks::{CallbackEntry, CallbackSet, HookDispatcher, HookRegistry};
pub use loader::{CatalogLoader, HookModule, ModuleLoader, ModuleManifest};
pub use manager::{HookManager, HookManagerBuilder, RegistryState};
