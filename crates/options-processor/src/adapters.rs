//! Collaborators injected into the options processor

use nav_options::ResolvedAsset;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;

/// Central props store of the host
#[cfg_attr(test, mockall::automock)]
pub trait Store: Send + Sync {
    /// Register props for a component instance
    fn update_props(&self, component_id: &str, props: &Value);

    /// Make sure the component class for `name` is loaded
    fn ensure_class_for_name(&self, name: &str);
}

/// Resolves declarative color tokens into packed ARGB
#[cfg_attr(test, mockall::automock)]
pub trait ColorService: Send + Sync {
    /// Native color for a token, `None` when it cannot be resolved
    fn to_native_color(&self, color: &str) -> Option<u32>;
}

/// Resolves bundled image handles
#[cfg_attr(test, mockall::automock)]
pub trait AssetResolver: Send + Sync {
    /// Asset for a numeric resource handle, `None` when unknown
    fn resolve_from_require(&self, handle: u64) -> Option<ResolvedAsset>;
}

/// Generates unique ids
#[cfg_attr(test, mockall::automock)]
pub trait UniqueIdProvider: Send + Sync {
    /// A fresh id starting with `prefix`
    fn generate(&self, prefix: &str) -> String;
}

/// Id provider counting upwards per prefix (`CustomComponent1`, `CustomComponent2`, ...)
#[derive(Debug, Default)]
pub struct SequentialIdProvider {
    counters: Mutex<HashMap<String, u64>>,
}

impl SequentialIdProvider {
    /// Create a provider with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }
}

impl UniqueIdProvider for SequentialIdProvider {
    fn generate(&self, prefix: &str) -> String {
        let mut counters = self.counters.lock();
        let counter = counters.entry(prefix.to_string()).or_insert(0);
        *counter += 1;
        format!("{}{}", prefix, counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids_per_prefix() {
        let ids = SequentialIdProvider::new();
        assert_eq!(ids.generate("CustomComponent"), "CustomComponent1");
        assert_eq!(ids.generate("CustomComponent"), "CustomComponent2");
        assert_eq!(ids.generate("Button"), "Button1");
    }
}
