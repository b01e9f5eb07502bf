//! Hook system: callback sets, the registry store, and the dispatcher.

pub mod callback_set;
pub mod dispatcher;
pub mod registry;

pub use callback_set::{CallbackEntry, CallbackSet};
pub use dispatcher::HookDispatcher;
pub use registry::HookRegistry;
