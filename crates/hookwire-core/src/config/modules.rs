//! Module discovery configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where and how module manifests are discovered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModulesConfig {
    /// Application base path; the default search directory is `{base_dir}/modules`.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    /// Additional base directories, searched before the default one.
    #[serde(default)]
    pub directories: Vec<PathBuf>,
    /// File extension identifying module manifests (without the dot).
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Files named `*{test_marker}.{extension}` are never loaded.
    #[serde(default = "default_test_marker")]
    pub test_marker: String,
}

impl ModulesConfig {
    /// Returns the default search directory, `{base_dir}/modules`.
    pub fn default_directory(&self) -> PathBuf {
        self.base_dir.join("modules")
    }
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            directories: Vec::new(),
            extension: default_extension(),
            test_marker: default_test_marker(),
        }
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_extension() -> String {
    "toml".to_string()
}

fn default_test_marker() -> String {
    "_test".to_string()
}
