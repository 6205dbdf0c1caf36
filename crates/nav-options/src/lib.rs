//! Navigation options for Waypoint
//!
//! This crate provides the typed, partially-specified configuration tree that
//! describes how a screen, stack, tab or modal looks and animates, together
//! with the merge engine that decides which value wins.
//!
//! # Merging
//!
//! Every leaf is a [`Param`] which is either unset, explicitly set, or
//! inherited from a default. Two merge modes exist:
//!
//! - [`MergeMode::Overlay`] - values set in the source overwrite the receiver
//!   (`mergeOptions` commands).
//! - [`MergeMode::FillDefaults`] - only unset receiver values are filled
//!   (default options, ancestor options).
//!
//! # Example
//!
//! ```rust
//! use nav_options::{Merge, Options, Param};
//! use serde_json::json;
//!
//! let mut options = Options::parse(&json!({ "topBar": { "visible": false } }));
//! let defaults = Options::parse(&json!({ "topBar": { "visible": true, "drawBehind": true } }));
//!
//! options.merge_with_default(&defaults);
//! assert_eq!(options.top_bar.visible, Param::Set(false));
//! assert!(options.top_bar.draw_behind.is_true());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod animations;
pub mod buttons;
pub mod merge;
pub mod options;
pub mod params;
pub mod sections;
pub mod top_bar;

pub use animations::{
    AnimationOptions, AnimationsOptions, ElementTransitions, ModalAnimationOptions,
    SharedElementTransitionOptions, SharedElements, StackAnimationOptions, ValueAnimationOptions,
    ViewAnimationOptions,
};
pub use buttons::{BackButton, ButtonOptions, ComponentOptions, TopBarButtons};
pub use merge::{Merge, MergeMode};
pub use options::Options;
pub use params::{Bool, Color, Colour, Fraction, ImageSource, Number, Param, ResolvedAsset, Text};
pub use sections::{
    BottomTabOptions, BottomTabsOptions, HardwareBackButtonOptions, LayoutOptions,
    ModalOptions, ModalPresentationStyle, NavigationBarOptions, StatusBarOptions,
    StatusBarStyle, TopTabOptions, TopTabsOptions,
};
pub use top_bar::{
    SearchBarOptions, SubtitleOptions, TitleOptions, TopBarBackgroundOptions, TopBarOptions,
};
