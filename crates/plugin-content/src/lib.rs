//! Content plugin for hookwire.
//!
//! Ships two compiled-in modules:
//!
//! - `content`: `trim_whitespace` and `clean_html` filters on
//!   `update_content`
//! - `audit`: a `record_event` callback on `on_startup` that counts and logs
//!   each firing

pub mod hooks;
pub mod html;
pub mod plugin;

pub use plugin::{AuditModule, ContentModule, catalog};
