//! Options payload processing for Waypoint
//!
//! Raw option payloads arrive with navigation commands as JSON. Before they
//! are parsed into [`nav_options::Options`] they are normalized in place:
//!
//! - legacy animation shapes are migrated to `enter`/`exit` halves,
//! - color tokens and image handles are resolved through injected services,
//! - embedded components get ids and their props are delivered to the store,
//! - shorthand forms (`searchBar: true`) are expanded,
//! - processors registered for a dotted option path are applied.
//!
//! Processing never fails. Values that cannot be resolved are left alone or
//! nulled, and deprecated usages are logged and reported.
//!
//! # Example
//!
//! ```rust
//! use options_processor::{
//!     AssetResolver, ColorService, CommandName, OptionProcessorsStore, OptionsProcessor,
//!     ProcessorConfig, SequentialIdProvider, Store,
//! };
//! use nav_options::ResolvedAsset;
//! use serde_json::{json, Value};
//! use std::sync::Arc;
//!
//! struct NoStore;
//! impl Store for NoStore {
//!     fn update_props(&self, _: &str, _: &Value) {}
//!     fn ensure_class_for_name(&self, _: &str) {}
//! }
//!
//! struct Hex;
//! impl ColorService for Hex {
//!     fn to_native_color(&self, color: &str) -> Option<u32> {
//!         u32::from_str_radix(color.strip_prefix('#')?, 16).ok()
//!     }
//! }
//!
//! struct NoAssets;
//! impl AssetResolver for NoAssets {
//!     fn resolve_from_require(&self, _: u64) -> Option<ResolvedAsset> {
//!         None
//!     }
//! }
//!
//! let processor = OptionsProcessor::new(
//!     ProcessorConfig::default(),
//!     Arc::new(NoStore),
//!     Arc::new(SequentialIdProvider::new()),
//!     OptionProcessorsStore::new(),
//!     Arc::new(Hex),
//!     Arc::new(NoAssets),
//! );
//!
//! let mut options = json!({ "topBar": { "background": { "color": "#ff00ff00" } } });
//! processor.process_options(&mut options, CommandName::SetRoot, None);
//! assert_eq!(options["topBar"]["background"]["color"], json!(0xff00ff00u32));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod command;
pub mod config;
pub mod deprecations;
pub mod error;
mod legacy;
pub mod processor;
pub mod registry;
mod search_bar;

pub use adapters::{AssetResolver, ColorService, SequentialIdProvider, Store, UniqueIdProvider};
pub use command::CommandName;
pub use config::{Platform, ProcessorConfig};
pub use deprecations::Deprecation;
pub use error::{ProcessorError, Result};
pub use processor::{OptionsProcessor, ProcessReport};
pub use registry::{OptionProcessor, OptionProcessorsStore, ProcessorSubscription};
