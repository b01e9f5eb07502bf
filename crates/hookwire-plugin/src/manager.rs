//! Hook manager: the public facade for registering and firing hooks.
//!
//! The manager owns the registry and runs module discovery exactly once,
//! the first time any operation needs it (or when [`HookManager::initialize`]
//! is called explicitly). Its outcome is kept: a failed discovery is not
//! retried and every later call reports the same error.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, error, info};

use hookwire_core::config::AppConfig;
use hookwire_core::config::dispatch::DispatchConfig;
use hookwire_core::{AppError, AppResult, ErrorKind};

use crate::callback::{HookCallback, HookValue};
use crate::discovery::{DiscoveryOptions, discover_module_files};
use crate::hooks::dispatcher::HookDispatcher;
use crate::hooks::registry::HookRegistry;
use crate::loader::{CatalogLoader, ModuleLoader};

/// Lifecycle of a manager's one-shot module discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    /// Discovery has not run yet.
    Uninitialized,
    /// Discovery ran and every module loaded.
    Ready,
    /// Discovery ran and a module failed to load.
    Failed,
}

/// Search directories; frozen once discovery starts.
#[derive(Debug, Default)]
struct SearchPath {
    directories: Vec<PathBuf>,
    /// Always searched last, after every added directory.
    default_directory: Option<PathBuf>,
    frozen: bool,
}

impl SearchPath {
    fn bases(&self) -> Vec<PathBuf> {
        self.directories
            .iter()
            .chain(self.default_directory.iter())
            .cloned()
            .collect()
    }
}

/// Registers callbacks on named extension points and invokes them.
#[derive(Debug)]
pub struct HookManager {
    /// Callback store.
    registry: Arc<HookRegistry>,
    /// Filter/action dispatcher over `registry`.
    dispatcher: HookDispatcher,
    /// Turns discovered files into registrations.
    loader: Arc<dyn ModuleLoader>,
    /// Module file matching rules.
    options: DiscoveryOptions,
    /// Base directories to search.
    search_path: RwLock<SearchPath>,
    /// Outcome of discovery: the module files loaded, in order.
    discovery: OnceCell<AppResult<Vec<PathBuf>>>,
}

impl HookManager {
    /// Creates a manager with no search directories and an empty catalog.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts building a manager.
    pub fn builder() -> HookManagerBuilder {
        HookManagerBuilder::default()
    }

    /// Starts building a manager preset from application configuration.
    pub fn from_config(config: &AppConfig) -> HookManagerBuilder {
        Self::builder()
            .directories(config.modules.directories.iter().cloned())
            .default_directory(config.modules.default_directory())
            .discovery_options(DiscoveryOptions::from(&config.modules))
            .dispatch(config.dispatch)
    }

    /// Runs module discovery if it has not run yet.
    ///
    /// Idempotent: concurrent and repeated calls share one discovery run.
    pub async fn initialize(&self) -> AppResult<()> {
        self.discovery
            .get_or_init(|| self.discover())
            .await
            .as_ref()
            .map(|_| ())
            .map_err(Clone::clone)
    }

    /// Adds a filter callback to `point`.
    ///
    /// `args` are stored with the callback but never passed to it. A
    /// callback whose identity is already registered on `point` is replaced
    /// in place.
    pub async fn register_filter(
        &self,
        point: &str,
        callback: Arc<dyn HookCallback>,
        args: Vec<HookValue>,
    ) -> AppResult<()> {
        self.initialize().await?;
        self.registry.register(point, callback, args).await;
        Ok(())
    }

    /// Runs `value` through the callbacks on `point` and returns the result.
    ///
    /// See [`HookDispatcher::apply`] for how results are combined.
    pub async fn apply_filter(&self, point: &str, value: HookValue) -> AppResult<HookValue> {
        self.initialize().await?;
        self.dispatcher.apply(point, value).await
    }

    /// Adds an action callback to `point`.
    pub async fn register_action(
        &self,
        point: &str,
        callback: Arc<dyn HookCallback>,
    ) -> AppResult<()> {
        self.register_filter(point, callback, Vec::new()).await
    }

    /// Invokes every callback on `point` with the empty string.
    pub async fn add_action(&self, point: &str) -> AppResult<()> {
        self.initialize().await?;
        self.dispatcher.fire(point).await
    }

    /// Appends a base directory to search, ahead of the default directory.
    ///
    /// Fails with a configuration error once discovery has started.
    pub async fn add_directory(&self, directory: impl Into<PathBuf>) -> AppResult<()> {
        let directory = directory.into();
        let mut search_path = self.search_path.write().await;

        if search_path.frozen {
            return Err(AppError::configuration(format!(
                "Cannot add module directory '{}': discovery already ran",
                directory.display()
            )));
        }

        debug!(path = %directory.display(), "Module directory added");
        search_path.directories.push(directory);
        Ok(())
    }

    /// Returns the base directories in search order.
    pub async fn directories(&self) -> Vec<PathBuf> {
        self.search_path.read().await.bases()
    }

    /// Returns the discovery state.
    pub fn state(&self) -> RegistryState {
        match self.discovery.get() {
            None => RegistryState::Uninitialized,
            Some(Ok(_)) => RegistryState::Ready,
            Some(Err(_)) => RegistryState::Failed,
        }
    }

    /// Returns the module files loaded by a successful discovery.
    pub fn loaded_modules(&self) -> Vec<PathBuf> {
        match self.discovery.get() {
            Some(Ok(files)) => files.clone(),
            _ => Vec::new(),
        }
    }

    /// Returns the hook registry.
    pub fn registry(&self) -> &Arc<HookRegistry> {
        &self.registry
    }

    /// Returns the dispatcher.
    pub fn dispatcher(&self) -> &HookDispatcher {
        &self.dispatcher
    }

    async fn discover(&self) -> AppResult<Vec<PathBuf>> {
        let bases = {
            let mut search_path = self.search_path.write().await;
            search_path.frozen = true;
            search_path.bases()
        };

        if bases.is_empty() {
            debug!("No module directories configured, skipping discovery");
            return Ok(Vec::new());
        }

        let directories = bases.len();
        let options = self.options.clone();
        let files = tokio::task::spawn_blocking(move || discover_module_files(&bases, &options))
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Module directory scan failed", e)
            })?;
        info!(
            directories,
            modules = files.len(),
            "Loading discovered modules"
        );

        let mut loaded = Vec::with_capacity(files.len());
        for file in files {
            if let Err(e) = self.loader.load(&file, &self.registry).await {
                error!(path = %file.display(), error = %e, "Module discovery aborted");
                return Err(e);
            }
            loaded.push(file);
        }

        Ok(loaded)
    }
}

impl Default for HookManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`HookManager`].
#[derive(Debug, Default)]
pub struct HookManagerBuilder {
    directories: Vec<PathBuf>,
    default_directory: Option<PathBuf>,
    options: DiscoveryOptions,
    dispatch: DispatchConfig,
    loader: Option<Arc<dyn ModuleLoader>>,
}

impl HookManagerBuilder {
    /// Adds a base directory to search.
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directories.push(directory.into());
        self
    }

    /// Adds several base directories to search.
    pub fn directories(mut self, directories: impl IntoIterator<Item = PathBuf>) -> Self {
        self.directories.extend(directories);
        self
    }

    /// Sets the directory searched after all others.
    pub fn default_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.default_directory = Some(directory.into());
        self
    }

    /// Sets the module file matching rules.
    pub fn discovery_options(mut self, options: DiscoveryOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the dispatch switches.
    pub fn dispatch(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Sets the module loader.
    pub fn loader(mut self, loader: Arc<dyn ModuleLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Builds the manager; no discovery happens yet.
    pub fn build(self) -> HookManager {
        let registry = Arc::new(HookRegistry::new());
        let dispatcher = HookDispatcher::new(registry.clone(), self.dispatch);

        HookManager {
            registry,
            dispatcher,
            loader: self
                .loader
                .unwrap_or_else(|| Arc::new(CatalogLoader::new())),
            options: self.options,
            search_path: RwLock::new(SearchPath {
                directories: self.directories,
                default_directory: self.default_directory,
                frozen: false,
            }),
            discovery: OnceCell::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::FnCallback;
    use serde_json::json;

    #[tokio::test]
    async fn test_state_transitions_on_first_use() {
        let manager = HookManager::new();
        assert_eq!(manager.state(), RegistryState::Uninitialized);

        assert_eq!(manager.apply_filter("x", json!(1)).await.unwrap(), json!(1));
        assert_eq!(manager.state(), RegistryState::Ready);
        assert!(manager.loaded_modules().is_empty());
    }

    #[tokio::test]
    async fn test_directories_frozen_after_initialize() {
        let manager = HookManager::builder().directory("/nonexistent/a").build();
        manager.add_directory("/nonexistent/b").await.unwrap();
        assert_eq!(
            manager.directories().await,
            vec![PathBuf::from("/nonexistent/a"), PathBuf::from("/nonexistent/b")]
        );

        manager.initialize().await.unwrap();
        let err = manager.add_directory("/nonexistent/c").await.unwrap_err();
        assert!(err.is(hookwire_core::ErrorKind::Configuration));
        assert_eq!(manager.directories().await.len(), 2);
    }

    #[tokio::test]
    async fn test_register_action_stores_no_args() {
        let manager = HookManager::new();
        let noop = FnCallback::new("noop", |_| Ok(HookValue::Null)).shared();
        manager.register_action("on_startup", noop).await.unwrap();

        let entries = manager.registry().snapshot("on_startup").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].args.is_empty());
    }

    #[tokio::test]
    async fn test_default_directory_searched_last() {
        let mut config = AppConfig::default();
        config.modules.directories = vec![PathBuf::from("/opt/configured")];

        let manager = HookManager::from_config(&config)
            .directories(vec![PathBuf::from("/opt/cli")])
            .build();
        manager.add_directory("/opt/runtime").await.unwrap();

        assert_eq!(
            manager.directories().await,
            vec![
                PathBuf::from("/opt/configured"),
                PathBuf::from("/opt/cli"),
                PathBuf::from("/opt/runtime"),
                PathBuf::from(".").join("modules"),
            ]
        );
    }

    #[tokio::test]
    async fn test_from_config_uses_default_module_directory() {
        let config = AppConfig::default();
        let manager = HookManager::from_config(&config).build();
        assert_eq!(manager.dispatcher().config(), DispatchConfig::default());
        assert_eq!(
            manager.directories().await,
            vec![PathBuf::from(".").join("modules")]
        );
        assert_eq!(manager.state(), RegistryState::Uninitialized);
    }
}
