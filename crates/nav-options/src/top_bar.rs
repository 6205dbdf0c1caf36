//! Top bar options

use serde::Deserialize;

use crate::buttons::{ComponentOptions, TopBarButtons};
use crate::merge::impl_merge;
use crate::params::{lenient, Bool, Colour, Fraction, Number, Text};

/// Title of the top bar
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TitleOptions {
    /// Title text
    pub text: Text,
    /// Text color
    pub color: Colour,
    /// Font size
    pub font_size: Fraction,
    /// Alignment (`center` or `fill`)
    pub alignment: Text,
    /// Custom title component
    #[serde(deserialize_with = "lenient")]
    pub component: ComponentOptions,
}

impl_merge!(TitleOptions { text, color, font_size, alignment, component });

/// Subtitle of the top bar
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubtitleOptions {
    /// Subtitle text
    pub text: Text,
    /// Text color
    pub color: Colour,
    /// Font size
    pub font_size: Fraction,
}

impl_merge!(SubtitleOptions { text, color, font_size });

/// Background of the top bar
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopBarBackgroundOptions {
    /// Background color
    pub color: Colour,
    /// Translucent background
    pub translucent: Bool,
    /// Blurred background
    pub blur: Bool,
    /// Custom background component
    #[serde(deserialize_with = "lenient")]
    pub component: ComponentOptions,
}

impl_merge!(TopBarBackgroundOptions { color, translucent, blur, component });

/// Search bar embedded in the top bar
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchBarOptions {
    /// Whether the search bar is shown
    pub visible: Bool,
    /// Hide the search bar when scrolling
    pub hide_on_scroll: Bool,
    /// Hide the top bar while the search bar is focused
    pub hide_top_bar_on_focus: Bool,
    /// Dim the content while searching
    pub obscures_background_during_presentation: Bool,
    /// Background color
    pub background_color: Colour,
    /// Tint color
    pub tint_color: Colour,
    /// Placeholder text
    pub placeholder: Text,
}

impl_merge!(SearchBarOptions {
    visible,
    hide_on_scroll,
    hide_top_bar_on_focus,
    obscures_background_during_presentation,
    background_color,
    tint_color,
    placeholder
});

/// Options of a stack's top bar
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopBarOptions {
    /// Whether the top bar is shown
    pub visible: Bool,
    /// Animate visibility changes
    pub animate: Bool,
    /// Draw screen content behind the top bar
    pub draw_behind: Bool,
    /// Hide the top bar when scrolling
    pub hide_on_scroll: Bool,
    /// Height override
    pub height: Number,
    /// Elevation (shadow depth)
    pub elevation: Fraction,
    /// Test identifier
    #[serde(rename = "testID")]
    pub test_id: Text,
    /// Title
    #[serde(deserialize_with = "lenient")]
    pub title: TitleOptions,
    /// Subtitle
    #[serde(deserialize_with = "lenient")]
    pub subtitle: SubtitleOptions,
    /// Background
    #[serde(deserialize_with = "lenient")]
    pub background: TopBarBackgroundOptions,
    /// Search bar
    #[serde(deserialize_with = "lenient")]
    pub search_bar: SearchBarOptions,
    /// Left, right and back buttons
    #[serde(flatten)]
    pub buttons: TopBarButtons,
}

impl_merge!(TopBarOptions {
    visible,
    animate,
    draw_behind,
    hide_on_scroll,
    height,
    elevation,
    test_id,
    title,
    subtitle,
    background,
    search_bar,
    buttons
});

impl TopBarOptions {
    /// Whether the top bar is hidden or drawn over the content
    pub fn is_hidden_or_draw_behind(&self) -> bool {
        self.visible.is_false() || self.draw_behind.is_true()
    }
}
