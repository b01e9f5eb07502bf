//! Prelude for module authors.

pub use async_trait::async_trait;

pub use hookwire_core::{AppError, AppResult};

pub use crate::callback::{ClosureCallback, FnCallback, HookCallback, HookValue};
pub use crate::hooks::registry::HookRegistry;
pub use crate::loader::HookModule;

pub use crate::hook_args;
