//! Navigation configuration

use options_processor::Platform;
use serde::{Deserialize, Serialize};

/// Geometry and platform settings shared by all controllers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Status bar height in points
    pub status_bar_height: f64,
    /// Default top bar height in points, used when options don't set one
    pub top_bar_height: f64,
    /// Target platform
    pub platform: Platform,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self { status_bar_height: 24.0, top_bar_height: 56.0, platform: Platform::default() }
    }
}

impl NavigationConfig {
    /// Create a configuration for a platform
    pub fn new(platform: Platform) -> Self {
        Self { platform, ..Default::default() }
    }

    /// Set the status bar height
    pub fn status_bar_height(mut self, height: f64) -> Self {
        self.status_bar_height = height;
        self
    }

    /// Set the default top bar height
    pub fn top_bar_height(mut self, height: f64) -> Self {
        self.top_bar_height = height;
        self
    }
}
