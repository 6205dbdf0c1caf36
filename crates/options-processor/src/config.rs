//! Processor configuration

use serde::{Deserialize, Serialize};

/// Target platform, selects platform specific deprecation rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Android
    #[default]
    Android,
    /// iOS
    Ios,
}

/// Options processor configuration
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Platform the payloads are processed for
    pub platform: Platform,
    /// Prefix of generated ids for embedded components
    pub custom_component_prefix: String,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self { platform: Platform::default(), custom_component_prefix: "CustomComponent".to_string() }
    }
}

impl ProcessorConfig {
    /// Create a configuration for a platform
    pub fn new(platform: Platform) -> Self {
        Self { platform, ..Default::default() }
    }

    /// Set the prefix of generated component ids
    pub fn custom_component_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.custom_component_prefix = prefix.into();
        self
    }
}
