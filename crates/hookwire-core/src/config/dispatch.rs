//! Filter dispatch behavior switches.

use serde::{Deserialize, Serialize};

/// Controls how filter invocations combine callback results.
///
/// The defaults reproduce the legacy semantics: every callback sees the
/// original value, the last result wins, and an unregistered point given a
/// sequence yields the sequence's first element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Feed each callback's result into the next callback.
    #[serde(default)]
    pub chain_filters: bool,
    /// Return only the first element when filtering a sequence through a
    /// point with no callbacks.
    #[serde(default = "default_true")]
    pub unwrap_unregistered_sequence: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            chain_filters: false,
            unwrap_unregistered_sequence: true,
        }
    }
}

fn default_true() -> bool {
    true
}
