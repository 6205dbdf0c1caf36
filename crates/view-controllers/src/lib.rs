//! View controllers for Waypoint
//!
//! This crate provides the controller hierarchy of the navigator: host
//! screens, stacks, tabs and the modal stack, their lifecycle, the events they
//! emit and the command boundary that drives them.
//!
//! # Threading
//!
//! Controllers live on a single UI task. They are shared as
//! `Rc<dyn ViewController>` with weak parent links, and every asynchronous
//! operation (animations, element lookups) is awaited on that task. Other
//! threads send commands through a [`NavigatorHandle`].
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use view_controllers::{
//!     ComponentViewController, InstantAnimator, NavigationConfig, NavigationContext,
//!     StackController, ViewController,
//! };
//! use nav_options::Options;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let context = Rc::new(NavigationContext::headless(NavigationConfig::default()));
//! let home = ComponentViewController::new("home", "Home", Options::empty(), context.clone());
//! let stack = StackController::new(
//!     "stack",
//!     vec![home as Rc<dyn ViewController>],
//!     Options::empty(),
//!     Rc::new(InstantAnimator),
//!     context.clone(),
//! );
//! stack.on_view_will_appear();
//! stack.on_view_did_appear();
//!
//! let details = ComponentViewController::new("details", "Details", Options::empty(), context);
//! assert_eq!(stack.push(details).await, Ok("details".to_string()));
//! assert_eq!(stack.child_ids(), vec!["home", "details"]);
//! # });
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod animator;
pub mod component;
pub mod config;
pub mod context;
pub mod controller;
pub mod errors;
pub mod events;
pub mod external;
pub mod lifecycle;
pub mod listener;
pub mod modal;
pub mod navigator;
pub mod registry;
pub mod stack;
pub mod tabs;
pub mod top_bar_component;
pub mod transition;
pub mod view;

#[cfg(any(test, feature = "test-util"))]
pub mod test_utils;

pub use animator::{AnimationRequest, AnimationSpec, Animator, InstantAnimator, TransitionKind};
pub use component::{ComponentPresenter, ComponentViewController};
pub use config::NavigationConfig;
pub use context::NavigationContext;
pub use controller::{ComponentType, ControllerBase, ViewController};
pub use errors::{EmitError, NavigationError, Result};
pub use events::{AppearState, EventEmitter, EventSink};
pub use external::ExternalComponentViewController;
pub use lifecycle::{Lifecycle, LifecycleState};
pub use listener::{CommandListener, CommandListenerAdapter};
pub use modal::ModalStack;
pub use navigator::{remote_channel, Navigator, NavigatorHandle, RemoteCommand, RemoteReceiver};
pub use registry::ChildControllersRegistry;
pub use stack::StackController;
pub use tabs::{BottomTabsController, TabsCore, TopTabsController};
pub use top_bar_component::{TopBarComponentController, TopBarComponentRole};
pub use transition::{ElementTransition, SharedElementTransition, TransitionSet, TransitionSetCreator};
pub use view::{ElementRef, NoopView, NoopViewCreator, View, ViewCreator, ViewSpec};
