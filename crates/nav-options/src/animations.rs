//! Transition animation options
//!
//! Mirrors the current (structured) payload shape produced by the options
//! processor: stack commands animate `content`, `topBar` and `bottomTabs`
//! separately with `enter`/`exit` halves, modal commands animate the screen
//! as a whole with `enter`/`exit`.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::merge::{impl_merge, Merge, MergeMode};
use crate::params::{lenient, Bool, Fraction, Number, Param, Text};

/// Duration of the canned fade animation, in milliseconds
pub const FADE_DURATION_MS: i32 = 300;

// =============================================================================
// Value animations
// =============================================================================

/// Range animation of a single view property (`alpha`, `translationY`, ...)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValueAnimationOptions {
    /// Start value
    pub from: Fraction,
    /// End value
    pub to: Fraction,
    /// Duration in milliseconds
    pub duration: Number,
    /// Delay before starting, in milliseconds
    pub start_delay: Number,
    /// Interpolator name
    pub interpolation: Text,
}

impl_merge!(ValueAnimationOptions { from, to, duration, start_delay, interpolation });

impl ValueAnimationOptions {
    /// Create a fully specified range animation
    pub fn new(from: f64, to: f64, duration: i32) -> Self {
        Self {
            from: Param::Set(from),
            to: Param::Set(to),
            duration: Param::Set(duration),
            ..Default::default()
        }
    }

    /// Total running time including the start delay
    pub fn total_duration(&self) -> i32 {
        self.duration.get_or(0) + self.start_delay.get_or(0)
    }
}

/// Property animations keyed by property name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimatedValues(pub BTreeMap<String, ValueAnimationOptions>);

impl AnimatedValues {
    /// Animation of one property
    pub fn get(&self, property: &str) -> Option<&ValueAnimationOptions> {
        self.0.get(property)
    }

    /// Whether no property is animated
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Merge for AnimatedValues {
    fn merge(&mut self, other: &Self, mode: MergeMode) {
        self.0.merge(&other.0, mode);
    }
}

impl<'de> Deserialize<'de> for AnimatedValues {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Leftover keys of an animation object; only object-valued keys are
        // property animations.
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let values = raw
            .into_iter()
            .filter(|(_, value)| value.is_object())
            .filter_map(|(key, value)| {
                serde_json::from_value::<ValueAnimationOptions>(value).ok().map(|v| (key, v))
            })
            .collect();
        Ok(AnimatedValues(values))
    }
}

// =============================================================================
// Element transitions
// =============================================================================

/// A shared element animated between the source and destination screens
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SharedElementTransitionOptions {
    /// Element id on the source screen
    pub from_id: Text,
    /// Element id on the destination screen
    pub to_id: Text,
    /// Duration in milliseconds
    pub duration: Number,
    /// Interpolator name
    pub interpolation: Text,
}

/// Shared element transitions (replaced wholesale on merge)
pub type SharedElements = Param<Vec<SharedElementTransitionOptions>>;

/// Per-element transitions (replaced wholesale on merge)
pub type ElementTransitions = Param<Vec<AnimationOptions>>;

// =============================================================================
// Animation options
// =============================================================================

/// Animation of a single view, or of a single element when used as an
/// element transition
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationOptions {
    /// Element id, used by element transitions
    pub id: Text,
    /// Whether the animation runs at all
    #[serde(alias = "enable")]
    pub enabled: Bool,
    /// Wait for the destination to render before animating
    pub wait_for_render: Bool,
    /// Shared element transitions
    #[serde(rename = "sharedElementTransitions")]
    pub shared_elements: SharedElements,
    /// Element transitions
    pub element_transitions: ElementTransitions,
    /// Property animations
    #[serde(flatten)]
    pub values: AnimatedValues,
}

impl_merge!(AnimationOptions {
    id,
    enabled,
    wait_for_render,
    shared_elements,
    element_transitions,
    values
});

impl AnimationOptions {
    /// The canned fade-in animation
    pub fn fade() -> Self {
        let mut values = BTreeMap::new();
        values.insert("alpha".to_string(), ValueAnimationOptions::new(0.0, 1.0, FADE_DURATION_MS));
        Self { values: AnimatedValues(values), ..Default::default() }
    }

    /// Whether this animation is enabled (enabled unless explicitly disabled)
    pub fn is_enabled(&self) -> bool {
        !self.enabled.is_false()
    }

    /// Whether anything at all was specified
    pub fn has_value(&self) -> bool {
        self.id.has_value()
            || self.enabled.has_value()
            || self.wait_for_render.has_value()
            || !self.values.is_empty()
            || self.has_element_transitions()
    }

    /// Whether shared elements or element transitions are declared
    pub fn has_element_transitions(&self) -> bool {
        has_entries(&self.shared_elements) || has_entries(&self.element_transitions)
    }

    /// Longest property animation, in milliseconds
    pub fn duration(&self) -> i32 {
        self.values.0.values().map(ValueAnimationOptions::total_duration).max().unwrap_or(0)
    }
}

fn has_entries<T>(list: &Param<Vec<T>>) -> bool {
    list.get().is_some_and(|items| !items.is_empty())
}

/// Enter and exit halves of a view's animation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewAnimationOptions {
    /// Animation of the appearing view
    #[serde(deserialize_with = "lenient")]
    pub enter: AnimationOptions,
    /// Animation of the disappearing view
    #[serde(deserialize_with = "lenient")]
    pub exit: AnimationOptions,
}

impl_merge!(ViewAnimationOptions { enter, exit });

impl ViewAnimationOptions {
    /// Whether either half was specified
    pub fn has_value(&self) -> bool {
        self.enter.has_value() || self.exit.has_value()
    }
}

/// Animation of a stack command (push, pop, setStackRoot)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StackAnimationOptions {
    /// Whether the transition is animated
    #[serde(alias = "enable")]
    pub enabled: Bool,
    /// Wait for the destination to render before animating
    pub wait_for_render: Bool,
    /// Screen content animation
    #[serde(deserialize_with = "lenient")]
    pub content: ViewAnimationOptions,
    /// Top bar animation
    #[serde(deserialize_with = "lenient")]
    pub top_bar: ViewAnimationOptions,
    /// Bottom tabs animation
    #[serde(deserialize_with = "lenient")]
    pub bottom_tabs: ViewAnimationOptions,
    /// Shared element transitions
    #[serde(rename = "sharedElementTransitions")]
    pub shared_elements: SharedElements,
    /// Element transitions
    pub element_transitions: ElementTransitions,
}

impl_merge!(StackAnimationOptions {
    enabled,
    wait_for_render,
    content,
    top_bar,
    bottom_tabs,
    shared_elements,
    element_transitions
});

impl StackAnimationOptions {
    /// Whether the transition is animated (enabled unless explicitly disabled)
    pub fn is_enabled(&self) -> bool {
        !self.enabled.is_false()
    }

    /// Whether shared elements or element transitions are declared
    pub fn has_element_transitions(&self) -> bool {
        has_entries(&self.shared_elements) || has_entries(&self.element_transitions)
    }

    /// Whether anything at all was specified
    pub fn has_value(&self) -> bool {
        self.enabled.has_value()
            || self.wait_for_render.has_value()
            || self.content.has_value()
            || self.top_bar.has_value()
            || self.bottom_tabs.has_value()
            || self.has_element_transitions()
    }
}

/// Animation of a modal command (showModal, dismissModal)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModalAnimationOptions {
    /// Animation of the appearing screen
    #[serde(deserialize_with = "lenient")]
    pub enter: AnimationOptions,
    /// Animation of the disappearing screen
    #[serde(deserialize_with = "lenient")]
    pub exit: AnimationOptions,
    /// Shared element transitions
    #[serde(rename = "sharedElementTransitions")]
    pub shared_elements: SharedElements,
    /// Element transitions
    pub element_transitions: ElementTransitions,
}

impl_merge!(ModalAnimationOptions { enter, exit, shared_elements, element_transitions });

impl ModalAnimationOptions {
    /// Whether showing is animated
    pub fn is_enter_enabled(&self) -> bool {
        self.enter.is_enabled()
    }

    /// Whether dismissing is animated
    pub fn is_exit_enabled(&self) -> bool {
        self.exit.is_enabled()
    }

    /// Whether shared elements or element transitions are declared
    pub fn has_element_transitions(&self) -> bool {
        has_entries(&self.shared_elements) || has_entries(&self.element_transitions)
    }
}

/// All command animations of a screen
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationsOptions {
    /// Push onto a stack
    #[serde(deserialize_with = "lenient")]
    pub push: StackAnimationOptions,
    /// Pop from a stack
    #[serde(deserialize_with = "lenient")]
    pub pop: StackAnimationOptions,
    /// Replace a stack's children
    #[serde(deserialize_with = "lenient")]
    pub set_stack_root: StackAnimationOptions,
    /// Replace the application root
    #[serde(deserialize_with = "lenient")]
    pub set_root: AnimationOptions,
    /// Show a modal
    #[serde(deserialize_with = "lenient")]
    pub show_modal: ModalAnimationOptions,
    /// Dismiss a modal
    #[serde(deserialize_with = "lenient")]
    pub dismiss_modal: ModalAnimationOptions,
}

impl_merge!(AnimationsOptions { push, pop, set_stack_root, set_root, show_modal, dismiss_modal });
