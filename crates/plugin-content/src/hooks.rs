//! Callback implementations for the content plugin.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use hookwire_core::{AppError, AppResult};
use hookwire_plugin::callback::HookCallback;

use crate::html::escape_html;

fn expect_text<'a>(callback: &str, args: &'a [Value]) -> AppResult<&'a str> {
    match args {
        [Value::String(text)] => Ok(text.as_str()),
        _ => Err(AppError::invocation(format!(
            "{callback}: expected a single string argument"
        ))),
    }
}

/// Filter: strips leading and trailing whitespace.
#[derive(Debug, Default)]
pub struct TrimWhitespace;

#[async_trait]
impl HookCallback for TrimWhitespace {
    fn id(&self) -> &str {
        "trim_whitespace"
    }

    fn arity(&self) -> Option<usize> {
        Some(1)
    }

    async fn call(&self, args: Vec<Value>) -> AppResult<Value> {
        let text = expect_text(self.id(), &args)?;
        Ok(json!(text.trim()))
    }
}

/// Filter: trims and HTML-escapes content.
#[derive(Debug, Default)]
pub struct CleanHtml;

#[async_trait]
impl HookCallback for CleanHtml {
    fn id(&self) -> &str {
        "clean_html"
    }

    fn arity(&self) -> Option<usize> {
        Some(1)
    }

    async fn call(&self, args: Vec<Value>) -> AppResult<Value> {
        let text = expect_text(self.id(), &args)?;
        Ok(json!(escape_html(text.trim())))
    }
}

/// Action: counts and logs each firing of the point it is attached to.
#[derive(Debug)]
pub struct RecordEvent {
    /// Point name, for logging.
    point: String,
    /// Shared firing counter.
    count: Arc<AtomicU64>,
}

impl RecordEvent {
    /// Creates a recorder that increments `count` on every firing.
    pub fn new(point: &str, count: Arc<AtomicU64>) -> Self {
        Self {
            point: point.to_string(),
            count,
        }
    }
}

#[async_trait]
impl HookCallback for RecordEvent {
    fn id(&self) -> &str {
        "record_event"
    }

    async fn call(&self, args: Vec<Value>) -> AppResult<Value> {
        let total = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(point = %self.point, args = args.len(), total = total, "Event recorded");
        Ok(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clean_html_trims_and_escapes() {
        let out = CleanHtml.call(vec![json!("  <p>a & b</p>\n")]).await.unwrap();
        assert_eq!(out, json!("&lt;p&gt;a &amp; b&lt;/p&gt;"));
    }

    #[tokio::test]
    async fn test_non_string_is_invocation_error() {
        let err = TrimWhitespace.call(vec![json!(3)]).await.unwrap_err();
        assert!(err.is(hookwire_core::ErrorKind::Invocation));
    }

    #[tokio::test]
    async fn test_record_event_counts() {
        let count = Arc::new(AtomicU64::new(0));
        let recorder = RecordEvent::new("on_startup", count.clone());
        recorder.call(vec![json!("")]).await.unwrap();
        recorder.call(vec![json!("")]).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
