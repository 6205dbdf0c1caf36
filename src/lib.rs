//! Waypoint: the view controller layer of a mobile navigation library
//!
//! The workspace is split into three crates, re-exported here:
//!
//! - [`nav_options`]: the typed options tree and its merge engine,
//! - [`options_processor`]: normalization of raw option payloads,
//! - [`view_controllers`]: controllers, the modal stack, element transitions
//!   and the command boundary.
//!
//! [`logging`] installs a `tracing` subscriber for hosts.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod logging;

pub use nav_options;
pub use options_processor;
pub use view_controllers;

pub use logging::LogConfig;
pub use nav_options::Options;
pub use options_processor::{CommandName, OptionsProcessor};
pub use view_controllers::{CommandListener, Navigator, NavigatorHandle, ViewController};
