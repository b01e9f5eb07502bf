//! Module implementations: register the content plugin's callbacks.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use hookwire_core::AppResult;
use hookwire_plugin::hooks::registry::HookRegistry;
use hookwire_plugin::loader::{CatalogLoader, HookModule};

use crate::hooks::{CleanHtml, RecordEvent, TrimWhitespace};

/// Point fired with user-submitted content before it is stored.
pub const UPDATE_CONTENT: &str = "update_content";

/// Point fired once when the application starts.
pub const ON_STARTUP: &str = "on_startup";

/// Registers content-cleaning filters on [`UPDATE_CONTENT`].
#[derive(Debug, Default)]
pub struct ContentModule;

#[async_trait]
impl HookModule for ContentModule {
    fn name(&self) -> &str {
        "content"
    }

    async fn register(&self, hooks: &HookRegistry) -> AppResult<()> {
        hooks
            .register(UPDATE_CONTENT, Arc::new(TrimWhitespace), Vec::new())
            .await;
        hooks
            .register(UPDATE_CONTENT, Arc::new(CleanHtml), Vec::new())
            .await;
        Ok(())
    }
}

/// Registers an event recorder on [`ON_STARTUP`].
#[derive(Debug, Default)]
pub struct AuditModule {
    /// Number of times the recorder has fired.
    events: Arc<AtomicU64>,
}

impl AuditModule {
    /// Returns how many events have been recorded.
    pub fn recorded(&self) -> u64 {
        self.events.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HookModule for AuditModule {
    fn name(&self) -> &str {
        "audit"
    }

    async fn register(&self, hooks: &HookRegistry) -> AppResult<()> {
        let recorder = RecordEvent::new(ON_STARTUP, self.events.clone());
        hooks.register(ON_STARTUP, Arc::new(recorder), Vec::new()).await;
        Ok(())
    }
}

/// Returns a loader that knows every module in this crate.
///
/// `audit` is shared with the caller so its count stays observable after the
/// loader registers it.
pub fn catalog(audit: Arc<AuditModule>) -> CatalogLoader {
    CatalogLoader::new()
        .with_module(Arc::new(ContentModule))
        .with_module(audit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookwire_plugin::manager::HookManager;
    use serde_json::json;

    #[tokio::test]
    async fn test_content_filter_returns_clean_html() {
        let hooks = HookManager::new();
        ContentModule.register(hooks.registry()).await.unwrap();

        let out = hooks
            .apply_filter(UPDATE_CONTENT, json!("  <em>hi</em>  "))
            .await
            .unwrap();
        assert_eq!(out, json!("&lt;em&gt;hi&lt;/em&gt;"));
    }

    #[tokio::test]
    async fn test_audit_counts_startup() {
        let audit = Arc::new(AuditModule::default());
        let hooks = HookManager::new();
        audit.register(hooks.registry()).await.unwrap();

        hooks.add_action(ON_STARTUP).await.unwrap();
        hooks.add_action(ON_STARTUP).await.unwrap();
        assert_eq!(audit.recorded(), 2);
    }

    #[test]
    fn test_catalog_lists_modules() {
        let catalog = catalog(Arc::new(AuditModule::default()));
        assert_eq!(catalog.module_names(), vec!["audit", "content"]);
    }

    #[tokio::test]
    async fn test_catalog_audit_count_visible_to_caller() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("audit.toml"), "").unwrap();

        let audit = Arc::new(AuditModule::default());
        let hooks = HookManager::builder()
            .directory(dir.path())
            .loader(Arc::new(catalog(audit.clone())))
            .build();

        hooks.add_action(ON_STARTUP).await.unwrap();
        assert_eq!(audit.recorded(), 1);
    }
}
