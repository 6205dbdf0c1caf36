//! Remaining option sections
//!
//! Status bar, navigation bar, tabs, layout, modal presentation and hardware
//! back button handling.

use serde::Deserialize;

use crate::merge::impl_merge;
use crate::params::{Bool, Colour, ImageSource, Number, Param, Text};

// =============================================================================
// System bars
// =============================================================================

/// Status bar content style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBarStyle {
    /// Light content
    Light,
    /// Dark content
    Dark,
}

/// Status bar options
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusBarOptions {
    /// Whether the status bar is shown
    pub visible: Bool,
    /// Draw screen content behind the status bar
    pub draw_behind: Bool,
    /// Translucent status bar
    pub translucent: Bool,
    /// Background color
    pub background_color: Colour,
    /// Content style
    pub style: Param<StatusBarStyle>,
}

impl_merge!(StatusBarOptions { visible, draw_behind, translucent, background_color, style });

impl StatusBarOptions {
    /// Whether the status bar takes no vertical space from the screen
    pub fn is_hidden_or_draw_behind(&self) -> bool {
        self.visible.is_false() || self.draw_behind.is_true()
    }
}

/// System navigation bar options
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationBarOptions {
    /// Whether the navigation bar is shown
    pub visible: Bool,
    /// Background color
    pub background_color: Colour,
}

impl_merge!(NavigationBarOptions { visible, background_color });

// =============================================================================
// Tabs
// =============================================================================

/// Options of a bottom tabs container
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BottomTabsOptions {
    /// Whether the tab bar is shown
    pub visible: Bool,
    /// Animate visibility changes
    pub animate: Bool,
    /// Draw screen content behind the tab bar
    pub draw_behind: Bool,
    /// Selected tab by index
    pub current_tab_index: Number,
    /// Selected tab by controller id
    pub current_tab_id: Text,
    /// Background color
    pub background_color: Colour,
    /// Test identifier
    #[serde(rename = "testID")]
    pub test_id: Text,
}

impl_merge!(BottomTabsOptions {
    visible,
    animate,
    draw_behind,
    current_tab_index,
    current_tab_id,
    background_color,
    test_id
});

/// Options of a single bottom tab
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BottomTabOptions {
    /// Tab title
    pub text: Text,
    /// Badge text
    pub badge: Text,
    /// Icon
    pub icon: Param<ImageSource>,
    /// Icon when selected
    pub selected_icon: Param<ImageSource>,
    /// Select the tab when pressed
    pub select_tab_on_press: Bool,
    /// Test identifier
    #[serde(rename = "testID")]
    pub test_id: Text,
}

impl_merge!(BottomTabOptions { text, badge, icon, selected_icon, select_tab_on_press, test_id });

/// Options of a top tabs container
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopTabsOptions {
    /// Whether the tab strip is shown
    pub visible: Bool,
    /// Strip height
    pub height: Number,
    /// Selected tab text color
    pub selected_tab_color: Colour,
    /// Unselected tab text color
    pub unselected_tab_color: Colour,
}

impl_merge!(TopTabsOptions { visible, height, selected_tab_color, unselected_tab_color });

/// Options of a single top tab
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopTabOptions {
    /// Tab title
    pub title: Text,
}

impl_merge!(TopTabOptions { title });

// =============================================================================
// Layout & modal
// =============================================================================

/// Root layout options
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Window background color
    pub background_color: Colour,
    /// Screen background color
    pub component_background_color: Colour,
    /// Extra top margin
    pub top_margin: Number,
    /// Allowed orientations
    pub orientation: Param<Vec<String>>,
}

impl_merge!(LayoutOptions { background_color, component_background_color, top_margin, orientation });

/// How a modal is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModalPresentationStyle {
    /// Platform default
    None,
    /// Covers the whole screen; the screen below is detached once shown
    FullScreen,
    /// Covers the whole screen; the screen below stays attached
    OverFullScreen,
    /// Drawn over the current content, which stays visible
    OverCurrentContext,
    /// Page sheet
    PageSheet,
    /// Form sheet
    FormSheet,
    /// Popover
    Popover,
}

/// Modal behavior options
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModalOptions {
    /// Allow dismissing by swiping down
    pub swipe_to_dismiss: Bool,
}

impl_merge!(ModalOptions { swipe_to_dismiss });

/// Hardware back button behavior
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HardwareBackButtonOptions {
    /// Dismiss the top modal on back press
    pub dismiss_modal_on_press: Bool,
    /// Pop the stack on back press
    pub pop_stack_on_press: Bool,
}

impl_merge!(HardwareBackButtonOptions { dismiss_modal_on_press, pop_stack_on_press });

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_bar_draw_behind() {
        let status_bar: StatusBarOptions =
            serde_json::from_value(json!({ "drawBehind": true, "style": "light" })).unwrap();
        assert!(status_bar.is_hidden_or_draw_behind());
        assert_eq!(status_bar.style, Param::Set(StatusBarStyle::Light));

        let hidden: StatusBarOptions = serde_json::from_value(json!({ "visible": false })).unwrap();
        assert!(hidden.is_hidden_or_draw_behind());

        assert!(!StatusBarOptions::default().is_hidden_or_draw_behind());
    }

    #[test]
    fn test_unknown_enum_value_is_unset() {
        let status_bar: StatusBarOptions =
            serde_json::from_value(json!({ "style": "purple" })).unwrap();
        assert!(status_bar.style.is_unset());
    }

    #[test]
    fn test_bottom_tab_icons() {
        let tab: BottomTabOptions = serde_json::from_value(json!({
            "text": "Home",
            "icon": { "uri": "home.png", "width": 24, "height": 24, "scale": 2 },
            "selectTabOnPress": false
        }))
        .unwrap();
        assert_eq!(tab.icon.get().map(ImageSource::uri), Some("home.png"));
        assert!(tab.select_tab_on_press.is_false());
    }
}
