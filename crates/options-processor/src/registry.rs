//! Registry of option processors keyed by dotted option path
//!
//! Processors registered for the same path run in registration order, each
//! receiving the previous one's output. Registration may happen from any
//! thread; processing only reads a snapshot of the list.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use crate::command::CommandName;
use crate::error::{ProcessorError, Result};

/// A processor: `(current value, command, passProps) -> new value`
pub type OptionProcessor = Arc<dyn Fn(&Value, CommandName, Option<&Value>) -> Value + Send + Sync>;

type Entries = HashMap<String, Vec<(u64, OptionProcessor)>>;

/// Shared registry of option processors
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct OptionProcessorsStore {
    entries: Arc<RwLock<Entries>>,
    next_id: Arc<AtomicU64>,
}

impl OptionProcessorsStore {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a processor for a dotted option path such as `topBar.visible`
    pub fn add_processor<F>(&self, path: impl Into<String>, processor: F) -> Result<ProcessorSubscription>
    where
        F: Fn(&Value, CommandName, Option<&Value>) -> Value + Send + Sync + 'static,
    {
        let path = path.into();
        if path.is_empty() || path.split('.').any(str::is_empty) {
            return Err(ProcessorError::InvalidPath(path));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.write().entry(path.clone()).or_default().push((id, Arc::new(processor)));

        Ok(ProcessorSubscription { path, id, entries: Arc::downgrade(&self.entries) })
    }

    /// Processors registered for a path, in registration order
    pub fn processors_for(&self, path: &str) -> Vec<OptionProcessor> {
        self.entries
            .read()
            .get(path)
            .map(|list| list.iter().map(|(_, processor)| Arc::clone(processor)).collect())
            .unwrap_or_default()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Handle returned by [`OptionProcessorsStore::add_processor`]
#[derive(Debug)]
pub struct ProcessorSubscription {
    path: String,
    id: u64,
    entries: Weak<RwLock<Entries>>,
}

impl ProcessorSubscription {
    /// Path the processor was registered for
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Unregister the processor
    pub fn remove(self) {
        let Some(entries) = self.entries.upgrade() else {
            return;
        };
        let mut entries = entries.write();
        if let Some(list) = entries.get_mut(&self.path) {
            list.retain(|(id, _)| *id != self.id);
            if list.is_empty() {
                entries.remove(&self.path);
            }
        }
    }
}
