//! Deprecated option usage
//!
//! Deprecated options still apply; they are only reported.

use serde_json::Value;
use std::fmt;

use crate::command::CommandName;
use crate::config::Platform;

/// A deprecated option usage found in a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deprecation {
    /// `bottomTabs.visible` changed through `mergeOptions` on iOS
    BottomTabsVisibilityMerge,
}

impl fmt::Display for Deprecation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deprecation::BottomTabsVisibilityMerge => {
                f.write_str("toggling bottomTabs visibility through mergeOptions is deprecated on iOS")
            }
        }
    }
}

/// Find deprecated usages in a raw payload and log each one
pub(crate) fn check(options: &Value, command: CommandName, platform: Platform) -> Vec<Deprecation> {
    let mut found = Vec::new();

    if command == CommandName::MergeOptions
        && platform == Platform::Ios
        && options.pointer("/bottomTabs/visible").is_some_and(|v| !v.is_null())
    {
        found.push(Deprecation::BottomTabsVisibilityMerge);
    }

    for deprecation in &found {
        tracing::warn!(options = %options, "{}", deprecation);
    }
    found
}
