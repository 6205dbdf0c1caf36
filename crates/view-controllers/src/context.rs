//! Shared navigation context
//!
//! One context is built per navigator and handed to every controller by
//! reference, replacing process-wide singletons for the event emitter and the
//! default options.

use nav_options::Options;
use std::cell::RefCell;
use std::rc::Rc;

use crate::config::NavigationConfig;
use crate::events::EventEmitter;
use crate::registry::ChildControllersRegistry;
use crate::view::{NoopViewCreator, ViewCreator};

/// Collaborators shared by all controllers of a navigator
pub struct NavigationContext {
    emitter: EventEmitter,
    children: ChildControllersRegistry,
    config: NavigationConfig,
    view_creator: Rc<dyn ViewCreator>,
    default_options: RefCell<Options>,
}

impl NavigationContext {
    /// Create a context
    pub fn new(config: NavigationConfig, emitter: EventEmitter, view_creator: Rc<dyn ViewCreator>) -> Self {
        Self {
            emitter,
            children: ChildControllersRegistry::new(),
            config,
            view_creator,
            default_options: RefCell::new(Options::empty()),
        }
    }

    /// Create a headless context that drops events and renders nothing
    pub fn headless(config: NavigationConfig) -> Self {
        Self::new(config, EventEmitter::new(), Rc::new(NoopViewCreator))
    }

    /// Event emitter
    pub fn emitter(&self) -> &EventEmitter {
        &self.emitter
    }

    /// Registry of appeared leaf controllers
    pub fn children(&self) -> &ChildControllersRegistry {
        &self.children
    }

    /// Configuration
    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// View factory
    pub fn view_creator(&self) -> &dyn ViewCreator {
        self.view_creator.as_ref()
    }

    /// Global default options
    pub fn default_options(&self) -> Options {
        self.default_options.borrow().clone()
    }

    /// Replace the global default options
    pub fn set_default_options(&self, options: Options) {
        *self.default_options.borrow_mut() = options;
    }
}
