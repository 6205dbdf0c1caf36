//! Top bar buttons and embedded component descriptors

use serde::Deserialize;

use crate::merge::{impl_merge, Merge, MergeMode};
use crate::params::{lenient, Bool, Colour, ImageSource, Number, Param, Text};

/// Reference to a host-rendered component embedded in the options
/// (custom titles, backgrounds, buttons)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentOptions {
    /// Registered component name
    pub name: Text,
    /// Instance id, generated by the options processor when absent
    pub component_id: Text,
    /// Alignment inside the bar
    pub alignment: Text,
    /// Wait for the component to render before showing it
    pub wait_for_render: Bool,
}

impl_merge!(ComponentOptions { name, component_id, alignment, wait_for_render });

impl ComponentOptions {
    /// Whether a component is declared
    pub fn has_value(&self) -> bool {
        self.name.has_value()
    }
}

/// A single top bar button
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonOptions {
    /// Button id, reported back on press
    pub id: Text,
    /// Title text
    pub text: Text,
    /// Whether the button is enabled
    pub enabled: Bool,
    /// Keep the icon's own colors
    pub disable_icon_tint: Bool,
    /// Tint color
    pub color: Colour,
    /// Tint color while disabled
    pub disabled_color: Colour,
    /// Icon
    pub icon: Param<ImageSource>,
    /// Menu placement hint
    pub show_as_action: Number,
    /// Custom component rendered instead of text or icon
    #[serde(deserialize_with = "lenient")]
    pub component: ComponentOptions,
    /// Accessibility label
    pub accessibility_label: Text,
    /// Test identifier
    #[serde(rename = "testID")]
    pub test_id: Text,
}

impl_merge!(ButtonOptions {
    id,
    text,
    enabled,
    disable_icon_tint,
    color,
    disabled_color,
    icon,
    show_as_action,
    component,
    accessibility_label,
    test_id
});

impl ButtonOptions {
    /// Create a button with an id
    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: Param::Set(id.into()), ..Default::default() }
    }

    /// Whether the button renders a custom component
    pub fn has_component(&self) -> bool {
        self.component.has_value()
    }

    /// Whether the button is enabled (enabled unless explicitly disabled)
    pub fn is_enabled(&self) -> bool {
        !self.enabled.is_false()
    }

    /// Fill unset styling from a default button. Identity and content are
    /// never taken from the default.
    fn fill_style(&mut self, defaults: &ButtonOptions) {
        self.color.merge_with_default(&defaults.color);
        self.disabled_color.merge_with_default(&defaults.disabled_color);
        self.disable_icon_tint.merge_with_default(&defaults.disable_icon_tint);
        self.show_as_action.merge_with_default(&defaults.show_as_action);
    }
}

/// Back button of a stack's top bar
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackButton {
    /// Whether the back button is shown
    pub visible: Bool,
    /// Title text
    pub title: Text,
    /// Whether the title is shown
    pub show_title: Bool,
    /// Tint color
    pub color: Colour,
    /// Icon
    pub icon: Param<ImageSource>,
    /// Test identifier
    #[serde(rename = "testID")]
    pub test_id: Text,
}

impl_merge!(BackButton { visible, title, show_title, color, icon, test_id });

/// Buttons of a top bar
///
/// An overlay replaces a button list wholesale. Filling defaults takes the
/// default list when none is set, otherwise styles every existing button
/// after the first default button.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopBarButtons {
    /// Buttons on the leading side
    #[serde(rename = "leftButtons")]
    pub left: Param<Vec<ButtonOptions>>,
    /// Buttons on the trailing side
    #[serde(rename = "rightButtons")]
    pub right: Param<Vec<ButtonOptions>>,
    /// Back button
    #[serde(rename = "backButton", deserialize_with = "lenient")]
    pub back: BackButton,
}

impl Merge for TopBarButtons {
    fn merge(&mut self, other: &Self, mode: MergeMode) {
        merge_buttons(&mut self.left, &other.left, mode);
        merge_buttons(&mut self.right, &other.right, mode);
        self.back.merge(&other.back, mode);
    }
}

fn merge_buttons(
    buttons: &mut Param<Vec<ButtonOptions>>,
    other: &Param<Vec<ButtonOptions>>,
    mode: MergeMode,
) {
    if mode == MergeMode::Overlay || buttons.is_unset() {
        buttons.merge(other, mode);
        return;
    }
    let Some(style) = other.get().and_then(|defaults| defaults.first()) else {
        return;
    };
    if let Param::Set(list) | Param::Inherited(list) = buttons {
        list.iter_mut().for_each(|button| button.fill_style(style));
    }
}

impl TopBarButtons {
    /// Whether a leading button with an id is declared
    pub fn has_left_buttons(&self) -> bool {
        self.left
            .get()
            .and_then(|buttons| buttons.first())
            .is_some_and(|button| button.id.has_value())
    }

    /// Find a button on either side by id
    pub fn find(&self, id: &str) -> Option<&ButtonOptions> {
        self.left
            .get()
            .into_iter()
            .chain(self.right.get())
            .flatten()
            .find(|button| button.id.get().map(String::as_str) == Some(id))
    }
}
