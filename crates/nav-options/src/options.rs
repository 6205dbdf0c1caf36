//! The root options tree

use serde::Deserialize;
use serde_json::Value;

use crate::animations::AnimationsOptions;
use crate::merge::{impl_merge, Merge};
use crate::params::{lenient, Bool, Param};
use crate::sections::{
    BottomTabOptions, BottomTabsOptions, HardwareBackButtonOptions, LayoutOptions, ModalOptions,
    ModalPresentationStyle, NavigationBarOptions, StatusBarOptions, TopTabOptions, TopTabsOptions,
};
use crate::top_bar::TopBarOptions;

/// Options of a single controller
///
/// Built from a normalized payload with [`Options::parse`]. Every field may be
/// unset; resolution against ancestors and defaults happens in the controller
/// layer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Top bar of the owning stack
    #[serde(deserialize_with = "lenient")]
    pub top_bar: TopBarOptions,
    /// Top tabs container
    #[serde(deserialize_with = "lenient")]
    pub top_tabs: TopTabsOptions,
    /// This screen's top tab
    #[serde(deserialize_with = "lenient")]
    pub top_tab: TopTabOptions,
    /// Bottom tabs container
    #[serde(deserialize_with = "lenient")]
    pub bottom_tabs: BottomTabsOptions,
    /// This screen's bottom tab
    #[serde(deserialize_with = "lenient")]
    pub bottom_tab: BottomTabOptions,
    /// Status bar
    #[serde(deserialize_with = "lenient")]
    pub status_bar: StatusBarOptions,
    /// System navigation bar
    #[serde(deserialize_with = "lenient")]
    pub navigation_bar: NavigationBarOptions,
    /// Layout
    #[serde(deserialize_with = "lenient")]
    pub layout: LayoutOptions,
    /// Modal behavior
    #[serde(deserialize_with = "lenient")]
    pub modal: ModalOptions,
    /// Command animations
    #[serde(deserialize_with = "lenient")]
    pub animations: AnimationsOptions,
    /// Hardware back button
    #[serde(deserialize_with = "lenient")]
    pub hardware_back_button: HardwareBackButtonOptions,
    /// Presentation style when shown as a modal
    pub modal_presentation_style: Param<ModalPresentationStyle>,
    /// Whether the interactive pop gesture is enabled
    pub pop_gesture: Bool,
    /// Dismiss the keyboard when the screen unmounts
    pub blur_on_unmount: Bool,
}

impl_merge!(Options {
    top_bar,
    top_tabs,
    top_tab,
    bottom_tabs,
    bottom_tab,
    status_bar,
    navigation_bar,
    layout,
    modal,
    animations,
    hardware_back_button,
    modal_presentation_style,
    pop_gesture,
    blur_on_unmount
});

impl Options {
    /// Parse a normalized payload
    ///
    /// Never fails: anything that is not an object yields empty options, and
    /// malformed values are dropped.
    pub fn parse(payload: &Value) -> Self {
        if !payload.is_object() {
            return Self::default();
        }
        match Self::deserialize(payload) {
            Ok(options) => options,
            Err(e) => {
                tracing::debug!("Discarding malformed options payload: {}", e);
                Self::default()
            }
        }
    }

    /// Options with nothing set
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether nothing at all is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether anything is set
    pub fn has_value(&self) -> bool {
        !self.is_empty()
    }

    /// Copy of these options overlaid with `other`
    pub fn merged_with(&self, other: &Options) -> Options {
        let mut merged = self.clone();
        merged.merge_with(other);
        merged
    }

    /// Copy of these options with unset values filled from `defaults`
    pub fn with_default_options(&self, defaults: &Options) -> Options {
        let mut merged = self.clone();
        merged.merge_with_default(defaults);
        merged
    }
}
