//! Convenience macros for module development.

/// Builds the extra registration arguments for a filter.
///
/// Each element is converted with `serde_json::json!`.
///
/// # Example
/// ```rust,ignore
/// hooks.register("update_content", callback, hook_args!["strict", 3]).await;
/// ```
#[macro_export]
macro_rules! hook_args {
    () => {
        ::std::vec::Vec::<$crate::callback::HookValue>::new()
    };
    ($($value:expr),+ $(,)?) => {
        vec![$(::serde_json::json!($value)),+]
    };
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    #[test]
    fn test_hook_args() {
        assert!(hook_args![].is_empty());
        assert_eq!(hook_args!["a", 1, true], vec![json!("a"), json!(1), json!(true)]);
    }
}
