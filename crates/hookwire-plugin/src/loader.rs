//! Module loading: turns discovered module files into registrations.
//!
//! Modules are compiled in and looked up by name. A module file on disk is a
//! small TOML manifest that enables one of them:
//!
//! ```toml
//! # modules/text/content.toml
//! module = "content"   # defaults to the file stem
//! enabled = true       # defaults to true
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use hookwire_core::{AppError, AppResult, ErrorKind};

use crate::hooks::registry::HookRegistry;

/// A unit of extension code that registers callbacks when loaded.
#[async_trait]
pub trait HookModule: Send + Sync + std::fmt::Debug {
    /// Returns the name module manifests refer to.
    fn name(&self) -> &str;

    /// Registers this module's filters and actions.
    async fn register(&self, hooks: &HookRegistry) -> AppResult<()>;
}

/// Loads one discovered module file.
#[async_trait]
pub trait ModuleLoader: Send + Sync + std::fmt::Debug {
    /// Loads the module described by `path`, registering into `hooks`.
    ///
    /// An error is fatal to discovery; registrations made by modules loaded
    /// earlier are kept.
    async fn load(&self, path: &Path, hooks: &HookRegistry) -> AppResult<()>;
}

/// Contents of a module manifest file.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleManifest {
    /// Name of the compiled-in module to load.
    #[serde(default)]
    pub module: Option<String>,
    /// Whether the module should be loaded at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ModuleManifest {
    /// Reads and parses a manifest file.
    pub async fn read(path: &Path) -> AppResult<Self> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ModuleLoad,
                format!("Cannot read module manifest '{}': {}", path.display(), e),
                e,
            )
        })?;

        let parsed = config::Config::builder()
            .add_source(config::File::from_str(&text, config::FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize::<Self>());

        parsed.map_err(|e| {
            AppError::with_source(
                ErrorKind::ModuleLoad,
                format!("Invalid module manifest '{}': {}", path.display(), e),
                e,
            )
        })
    }

    /// Returns the module name, falling back to the manifest's file stem.
    pub fn module_name(&self, path: &Path) -> AppResult<String> {
        if let Some(name) = &self.module {
            return Ok(name.clone());
        }

        path.file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                AppError::module_load(format!(
                    "Cannot derive module name from '{}'",
                    path.display()
                ))
            })
    }
}

fn default_true() -> bool {
    true
}

/// Loader backed by a catalog of compiled-in modules.
#[derive(Debug, Default)]
pub struct CatalogLoader {
    /// Module name → module.
    modules: HashMap<String, Arc<dyn HookModule>>,
}

impl CatalogLoader {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module, replacing any module with the same name.
    pub fn with_module(mut self, module: Arc<dyn HookModule>) -> Self {
        self.modules.insert(module.name().to_string(), module);
        self
    }

    /// Returns the names of all catalogued modules, sorted.
    pub fn module_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl ModuleLoader for CatalogLoader {
    async fn load(&self, path: &Path, hooks: &HookRegistry) -> AppResult<()> {
        let manifest = ModuleManifest::read(path).await?;
        let name = manifest.module_name(path)?;

        if !manifest.enabled {
            debug!(path = %path.display(), module = %name, "Module disabled, skipping");
            return Ok(());
        }

        let module = self.modules.get(&name).ok_or_else(|| {
            AppError::module_load(format!(
                "Unknown module '{}' referenced by '{}'",
                name,
                path.display()
            ))
        })?;

        module.register(hooks).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ModuleLoad,
                format!("Module '{}' failed to register: {}", name, e.message),
                e,
            )
        })?;

        info!(path = %path.display(), module = %name, "Module loaded");
        Ok(())
    }
}
