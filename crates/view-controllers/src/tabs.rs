//! Tab containers
//!
//! [`BottomTabsController`] and [`TopTabsController`] share the selection
//! logic in [`TabsCore`]. Only the selected tab is visible while the
//! container is; switching tabs reports the old tab's did-disappear before
//! the new tab's will-appear and did-appear.

use async_trait::async_trait;
use nav_options::{Merge, Options};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::context::NavigationContext;
use crate::controller::{adopt, ComponentType, ControllerBase, ViewController};
use crate::errors::{NavigationError, Result};

// =============================================================================
// Shared selection logic
// =============================================================================

/// Tab list and selection shared by both tab containers
pub struct TabsCore {
    tabs: Vec<Rc<dyn ViewController>>,
    selected: Cell<usize>,
    own_options: RefCell<Options>,
}

impl TabsCore {
    fn new(tabs: Vec<Rc<dyn ViewController>>, options: &Options) -> Self {
        Self { tabs, selected: Cell::new(0), own_options: RefCell::new(options.clone()) }
    }

    /// Index of the selected tab
    pub fn selected_index(&self) -> usize {
        self.selected.get()
    }

    /// The selected tab
    pub fn selected(&self) -> Option<Rc<dyn ViewController>> {
        self.tabs.get(self.selected.get()).cloned()
    }

    /// Number of tabs
    pub fn size(&self) -> usize {
        self.tabs.len()
    }

    /// Index of the tab with this controller id
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id() == id)
    }

    fn tab(&self, index: usize) -> Result<Rc<dyn ViewController>> {
        self.tabs
            .get(index)
            .cloned()
            .ok_or(NavigationError::InvalidTab { index, count: self.tabs.len() })
    }

    /// Switch tabs; returns the previously selected index when the selection changed
    fn select(&self, base: &ControllerBase, index: usize) -> Result<Option<usize>> {
        let next = self.tab(index)?;
        let previous_index = self.selected.get();
        if previous_index == index {
            return Ok(None);
        }
        let previous = self.tab(previous_index)?;
        self.selected.set(index);
        self.apply_child_options(base, &next);
        if base.lifecycle().is_visible() {
            previous.on_view_disappear();
            next.on_view_will_appear();
            next.on_view_did_appear();
        }
        Ok(Some(previous_index))
    }

    /// Container options become its own options overlaid with the selected tab's
    fn apply_child_options(&self, base: &ControllerBase, child: &Rc<dyn ViewController>) {
        let mut options = self.own_options.borrow().clone();
        options.merge_with(&child.options());
        base.set_options(options);
    }

    fn merge_own_options(&self, base: &ControllerBase, options: &Options) {
        self.own_options.borrow_mut().merge_with(options);
        if let Some(selected) = self.selected() {
            self.apply_child_options(base, &selected);
        }
    }

    /// Tab requested by `currentTabIndex` / `currentTabId`, if any
    fn requested_tab(&self, options: &Options) -> Option<usize> {
        let by_index = options.bottom_tabs.current_tab_index.get().and_then(|index| usize::try_from(*index).ok());
        by_index.or_else(|| options.bottom_tabs.current_tab_id.get().and_then(|id| self.index_of(id)))
    }

    fn will_appear(&self) {
        if let Some(tab) = self.selected() {
            tab.on_view_will_appear();
        }
    }

    fn did_appear(&self) {
        if let Some(tab) = self.selected() {
            tab.on_view_did_appear();
        }
    }

    fn disappear(&self) {
        if let Some(tab) = self.selected() {
            tab.on_view_disappear();
        }
    }
}

fn build_tabs<T>(
    tabs: Vec<Rc<dyn ViewController>>,
    options: &Options,
    make: impl FnOnce(std::rc::Weak<dyn ViewController>, TabsCore) -> T,
) -> Rc<T>
where
    T: ViewController + 'static,
{
    let core = TabsCore::new(tabs.clone(), options);
    let container = Rc::new_cyclic(|this: &std::rc::Weak<T>| {
        let this: std::rc::Weak<dyn ViewController> = this.clone();
        make(this, core)
    });
    let parent: Rc<dyn ViewController> = container.clone();
    adopt(&parent, &tabs);
    container
}

// =============================================================================
// Bottom tabs
// =============================================================================

/// Bottom tab bar container
pub struct BottomTabsController {
    base: ControllerBase,
    tabs: TabsCore,
}

impl BottomTabsController {
    /// Create a bottom tabs container
    pub fn new(
        id: impl Into<String>,
        tabs: Vec<Rc<dyn ViewController>>,
        options: Options,
        context: Rc<NavigationContext>,
    ) -> Rc<Self> {
        let id = id.into();
        let initial = options.clone();
        let container = build_tabs(tabs, &initial, |this, core| Self {
            base: ControllerBase::new(id, this, options, context),
            tabs: core,
        });
        let first = container.tabs.requested_tab(&initial).filter(|index| *index < container.tabs.size()).unwrap_or(0);
        container.tabs.selected.set(first);
        if let Some(selected) = container.tabs.selected() {
            container.tabs.apply_child_options(&container.base, &selected);
        }
        container
    }

    /// Tab state
    pub fn tabs(&self) -> &TabsCore {
        &self.tabs
    }

    /// Select a tab by index and report `bottomTabSelected`
    pub fn select_tab(&self, index: usize) -> Result<()> {
        if let Some(previous) = self.tabs.select(&self.base, index)? {
            self.base.context().emitter().bottom_tab_selected(previous, index);
        }
        Ok(())
    }

    /// A tab was pressed; selects it unless the tab opts out
    pub fn on_tab_pressed(&self, index: usize) -> Result<()> {
        let tab = self.tabs.tab(index)?;
        self.base.context().emitter().bottom_tab_pressed(index);
        if tab.resolve_current_options().bottom_tab.select_tab_on_press.is_false() {
            return Ok(());
        }
        self.select_tab(index)
    }
}

#[async_trait(?Send)]
impl ViewController for BottomTabsController {
    fn base(&self) -> &ControllerBase {
        &self.base
    }

    fn component_type(&self) -> ComponentType {
        ComponentType::BottomTabs
    }

    fn can_send_lifecycle_events(&self) -> bool {
        false
    }

    fn current_component_name(&self) -> Option<String> {
        self.tabs.selected().and_then(|tab| tab.current_component_name())
    }

    fn children(&self) -> Vec<Rc<dyn ViewController>> {
        self.tabs.tabs.clone()
    }

    fn will_appear_hook(&self) {
        self.tabs.will_appear();
    }

    fn did_appear_hook(&self) {
        self.tabs.did_appear();
    }

    fn disappear_hook(&self) {
        self.tabs.disappear();
    }

    fn options_for_children(&self) -> Options {
        self.tabs.own_options.borrow().clone()
    }

    fn merge_options(&self, options: &Options) {
        if options.is_empty() {
            return;
        }
        self.tabs.merge_own_options(&self.base, options);
        if let Some(index) = self.tabs.requested_tab(options) {
            if let Err(e) = self.select_tab(index) {
                tracing::warn!(tabs = %self.id(), error = %e, "Ignoring tab selection");
            }
        }
    }

    async fn handle_back(&self) -> bool {
        match self.tabs.selected() {
            Some(tab) => tab.handle_back().await,
            None => false,
        }
    }
}

// =============================================================================
// Top tabs
// =============================================================================

/// Top tab strip container
pub struct TopTabsController {
    base: ControllerBase,
    tabs: TabsCore,
}

impl TopTabsController {
    /// Create a top tabs container; the first tab is selected
    pub fn new(
        id: impl Into<String>,
        tabs: Vec<Rc<dyn ViewController>>,
        options: Options,
        context: Rc<NavigationContext>,
    ) -> Rc<Self> {
        let id = id.into();
        let initial = options.clone();
        let container = build_tabs(tabs, &initial, |this, core| Self {
            base: ControllerBase::new(id, this, options, context),
            tabs: core,
        });
        if let Some(selected) = container.tabs.selected() {
            container.tabs.apply_child_options(&container.base, &selected);
        }
        container
    }

    /// Tab state
    pub fn tabs(&self) -> &TabsCore {
        &self.tabs
    }

    /// Select a tab by index
    pub fn switch_to_tab(&self, index: usize) -> Result<()> {
        self.tabs.select(&self.base, index).map(|_| ())
    }
}

#[async_trait(?Send)]
impl ViewController for TopTabsController {
    fn base(&self) -> &ControllerBase {
        &self.base
    }

    fn component_type(&self) -> ComponentType {
        ComponentType::TopTabs
    }

    fn can_send_lifecycle_events(&self) -> bool {
        false
    }

    fn current_component_name(&self) -> Option<String> {
        self.tabs.selected().and_then(|tab| tab.current_component_name())
    }

    fn children(&self) -> Vec<Rc<dyn ViewController>> {
        self.tabs.tabs.clone()
    }

    fn will_appear_hook(&self) {
        self.tabs.will_appear();
    }

    fn did_appear_hook(&self) {
        self.tabs.did_appear();
    }

    fn disappear_hook(&self) {
        self.tabs.disappear();
    }

    fn options_for_children(&self) -> Options {
        self.tabs.own_options.borrow().clone()
    }

    fn merge_options(&self, options: &Options) {
        if options.is_empty() {
            return;
        }
        self.tabs.merge_own_options(&self.base, options);
    }

    async fn handle_back(&self) -> bool {
        match self.tabs.selected() {
            Some(tab) => tab.handle_back().await,
            None => false,
        }
    }
}
