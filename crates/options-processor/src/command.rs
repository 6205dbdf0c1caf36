//! Navigation command names

use serde::{Deserialize, Serialize};
use std::fmt;

/// A navigation command that carries an options payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandName {
    /// Replace the application root
    SetRoot,
    /// Set options applied under every screen
    SetDefaultOptions,
    /// Overlay options onto a live controller
    MergeOptions,
    /// Update a screen's props
    UpdateProps,
    /// Push onto a stack
    Push,
    /// Pop a stack
    Pop,
    /// Pop a stack down to a given screen
    PopTo,
    /// Pop a stack down to its root
    PopToRoot,
    /// Replace a stack's children
    SetStackRoot,
    /// Show a modal
    ShowModal,
    /// Dismiss a modal
    DismissModal,
    /// Dismiss every modal
    DismissAllModals,
    /// Show an overlay
    ShowOverlay,
    /// Dismiss an overlay
    DismissOverlay,
    /// Dismiss every overlay
    DismissAllOverlays,
}

impl CommandName {
    /// Wire name of the command
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandName::SetRoot => "setRoot",
            CommandName::SetDefaultOptions => "setDefaultOptions",
            CommandName::MergeOptions => "mergeOptions",
            CommandName::UpdateProps => "updateProps",
            CommandName::Push => "push",
            CommandName::Pop => "pop",
            CommandName::PopTo => "popTo",
            CommandName::PopToRoot => "popToRoot",
            CommandName::SetStackRoot => "setStackRoot",
            CommandName::ShowModal => "showModal",
            CommandName::DismissModal => "dismissModal",
            CommandName::DismissAllModals => "dismissAllModals",
            CommandName::ShowOverlay => "showOverlay",
            CommandName::DismissOverlay => "dismissOverlay",
            CommandName::DismissAllOverlays => "dismissAllOverlays",
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_name_matches_serde() {
        for command in [CommandName::SetRoot, CommandName::DismissAllModals, CommandName::PopTo] {
            let serialized = serde_json::to_value(command).unwrap();
            assert_eq!(serialized, serde_json::Value::String(command.as_str().to_string()));
        }
    }
}
