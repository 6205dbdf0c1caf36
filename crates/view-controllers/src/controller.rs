//! View-controller capability interface
//!
//! Every controller variant (component, external component, top bar
//! decoration, stack, tabs) embeds a [`ControllerBase`] and implements
//! [`ViewController`]. The trait's provided methods drive the lifecycle state
//! machine and event emission; variants customise behavior through the small
//! `*_hook` methods and by overriding [`ViewController::children`].
//!
//! Controllers own their children through `Rc`. The parent link and the
//! controller's own handle are weak, so dropping a root releases the tree.

use async_trait::async_trait;
use nav_options::{Merge, Options};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::context::NavigationContext;
use crate::events::AppearState;
use crate::lifecycle::Lifecycle;
use crate::stack::StackController;
use crate::view::{View, ViewSpec};

// =============================================================================
// Component type
// =============================================================================

/// Kind of a controller, reported in lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// Host-rendered screen
    Component,
    /// Natively created screen
    ExternalComponent,
    /// Top bar title, background or button component
    TopBarComponent,
    /// Stack container
    Stack,
    /// Bottom tabs container
    BottomTabs,
    /// Top tabs container
    TopTabs,
}

impl ComponentType {
    /// Name used in event payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Component => "Component",
            ComponentType::ExternalComponent => "ExternalComponent",
            ComponentType::TopBarComponent => "TopBarComponent",
            ComponentType::Stack => "Stack",
            ComponentType::BottomTabs => "BottomTabs",
            ComponentType::TopTabs => "TopTabs",
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Controller base
// =============================================================================

/// State shared by every controller variant
pub struct ControllerBase {
    id: String,
    this: Weak<dyn ViewController>,
    parent: RefCell<Option<Weak<dyn ViewController>>>,
    options: RefCell<Options>,
    initial_options: Options,
    view: RefCell<Option<Box<dyn View>>>,
    lifecycle: Lifecycle,
    context: Rc<NavigationContext>,
}

impl ControllerBase {
    /// Create the base of a controller
    ///
    /// `this` is the controller's own weak handle, obtained from
    /// [`Rc::new_cyclic`].
    pub fn new(
        id: impl Into<String>,
        this: Weak<dyn ViewController>,
        options: Options,
        context: Rc<NavigationContext>,
    ) -> Self {
        Self {
            id: id.into(),
            this,
            parent: RefCell::new(None),
            initial_options: options.clone(),
            options: RefCell::new(options),
            view: RefCell::new(None),
            lifecycle: Lifecycle::default(),
            context,
        }
    }

    /// Controller id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Strong handle to the owning controller
    pub fn this(&self) -> Option<Rc<dyn ViewController>> {
        self.this.upgrade()
    }

    /// Parent controller, if attached and still alive
    pub fn parent(&self) -> Option<Rc<dyn ViewController>> {
        self.parent.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// Attach to a parent
    pub fn set_parent(&self, parent: &Rc<dyn ViewController>) {
        *self.parent.borrow_mut() = Some(Rc::downgrade(parent));
    }

    /// Detach from the parent
    pub fn clear_parent(&self) {
        self.parent.borrow_mut().take();
    }

    /// Shared navigation context
    pub fn context(&self) -> &Rc<NavigationContext> {
        &self.context
    }

    /// Lifecycle tracker
    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Copy of the controller's own options
    pub fn options(&self) -> Options {
        self.options.borrow().clone()
    }

    /// Options the controller was created with
    pub fn initial_options(&self) -> &Options {
        &self.initial_options
    }

    /// Replace the controller's own options
    pub fn set_options(&self, options: Options) {
        *self.options.borrow_mut() = options;
    }

    /// Overlay an options delta onto the controller's own options
    pub fn overlay_options(&self, options: &Options) {
        self.options.borrow_mut().merge_with(options);
    }

    /// Whether the view was created and not yet torn down
    pub fn has_view(&self) -> bool {
        self.view.borrow().is_some()
    }

    /// Run `f` against the view, if there is one
    pub fn with_view<R>(&self, f: impl FnOnce(&mut dyn View) -> R) -> Option<R> {
        let mut view = self.view.borrow_mut();
        view.as_mut().map(|view| f(view.as_mut()))
    }

    fn install_view(&self, view: Box<dyn View>) {
        *self.view.borrow_mut() = Some(view);
    }

    fn destroy_view(&self) {
        let view = self.view.borrow_mut().take();
        if let Some(mut view) = view {
            view.destroy();
        }
    }
}

// =============================================================================
// ViewController
// =============================================================================

/// Capability interface of all controller variants
#[async_trait(?Send)]
pub trait ViewController {
    /// Shared controller state
    fn base(&self) -> &ControllerBase;

    /// Kind of controller
    fn component_type(&self) -> ComponentType;

    /// Controller id
    fn id(&self) -> &str {
        self.base().id()
    }

    /// Whether this controller reports its own lifecycle events
    fn can_send_lifecycle_events(&self) -> bool {
        true
    }

    /// Name of the component currently shown by this controller
    fn current_component_name(&self) -> Option<String> {
        None
    }

    /// Owned child controllers, in registration order
    fn children(&self) -> Vec<Rc<dyn ViewController>> {
        Vec::new()
    }

    /// Build the host view
    fn create_view(&self) -> Box<dyn View> {
        let spec = ViewSpec::new(self.id(), self.component_type());
        self.base().context().view_creator().create(&spec)
    }

    /// Downcast to a stack
    fn as_stack(&self) -> Option<&StackController> {
        None
    }

    /// Called once, right after the view was created
    fn on_view_created(&self) {}

    /// Called after a will-appear transition
    fn will_appear_hook(&self) {}

    /// Called after a did-appear transition
    fn did_appear_hook(&self) {}

    /// Called after a did-disappear transition
    fn disappear_hook(&self) {}

    /// Called while destroying, after the children and before the view
    fn destroy_hook(&self) {}

    /// Create the view unless it already exists
    fn ensure_view_created(&self) {
        let base = self.base();
        if base.has_view() || base.lifecycle().is_destroyed() {
            return;
        }
        base.install_view(self.create_view());
        base.lifecycle().view_created();
        self.on_view_created();
    }

    /// The controller is about to appear
    fn on_view_will_appear(&self) {
        self.ensure_view_created();
        if !self.base().lifecycle().will_appear() {
            return;
        }
        self.emit_appear_state(AppearState::WillAppear);
        self.will_appear_hook();
    }

    /// The controller appeared; suppressed when already appeared
    fn on_view_did_appear(&self) {
        self.ensure_view_created();
        if !self.base().lifecycle().did_appear() {
            return;
        }
        self.emit_appear_state(AppearState::DidAppear);
        self.did_appear_hook();
    }

    /// The controller disappeared; ignored unless it appeared
    fn on_view_disappear(&self) {
        if !self.base().lifecycle().disappear() {
            return;
        }
        self.emit_appear_state(AppearState::DidDisappear);
        self.disappear_hook();
    }

    /// Tear down the children, then this controller; runs at most once
    fn destroy(&self) {
        let base = self.base();
        if base.lifecycle().is_destroyed() {
            return;
        }
        self.on_view_disappear();
        for child in self.children() {
            child.destroy();
        }
        self.destroy_hook();
        base.destroy_view();
        base.lifecycle().destroy();
        base.context().children().on_disappeared(self.id());
    }

    /// Emit an appearance event if this variant reports lifecycle events
    fn emit_appear_state(&self, state: AppearState) {
        if !self.can_send_lifecycle_events() {
            return;
        }
        let name = self.current_component_name();
        self.base().context().emitter().component_appear_state(
            state,
            self.id(),
            name.as_deref(),
            self.component_type().as_str(),
        );
    }

    /// Whether the controller is appearing or appeared
    fn is_visible(&self) -> bool {
        self.base().lifecycle().is_visible()
    }

    /// Copy of the controller's own options
    fn options(&self) -> Options {
        self.base().options()
    }

    /// Options this controller passes down as defaults to its children
    fn options_for_children(&self) -> Options {
        self.base().options()
    }

    /// Overlay an options delta; empty deltas are ignored
    fn merge_options(&self, options: &Options) {
        if options.is_empty() {
            return;
        }
        self.base().overlay_options(options);
    }

    /// Effective options: own options, filled from the nearest ancestor
    /// outward, then from the global defaults
    fn resolve_current_options(&self) -> Options {
        let base = self.base();
        let mut resolved = base.options();
        let mut ancestor = base.parent();
        while let Some(parent) = ancestor {
            resolved.merge_with_default(&parent.options_for_children());
            ancestor = parent.base().parent();
        }
        resolved.merge_with_default(&base.context().default_options());
        resolved
    }

    /// Find this controller or a descendant by id
    fn find_controller(&self, id: &str) -> Option<Rc<dyn ViewController>> {
        if self.id() == id {
            return self.base().this();
        }
        self.children().iter().find_map(|child| child.find_controller(id))
    }

    /// Space a child must leave at the top for bars drawn by its ancestors
    fn top_inset_for_child(&self, _child_id: &str) -> f64 {
        self.base().parent().map(|parent| parent.top_inset_for_child(self.id())).unwrap_or(0.0)
    }

    /// A top bar button of this controller was pressed
    fn send_on_navigation_button_pressed(&self, button_id: &str) {
        self.base().context().emitter().navigation_button_pressed(self.id(), button_id);
    }

    /// Handle a hardware back press; `true` when consumed
    async fn handle_back(&self) -> bool {
        false
    }
}

/// Attach each child to `parent`
pub(crate) fn adopt(parent: &Rc<dyn ViewController>, children: &[Rc<dyn ViewController>]) {
    for child in children {
        child.base().set_parent(parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentViewController;
    use crate::lifecycle::LifecycleState;
    use crate::test_utils::Harness;
    use nav_options::Param;
    use serde_json::json;

    #[test]
    fn test_view_created_once() {
        let harness = Harness::new();
        let screen = harness.component("c1", "Inbox");
        screen.ensure_view_created();
        screen.ensure_view_created();
        screen.on_view_will_appear();
        assert_eq!(harness.views.created("c1"), 1);
        assert_eq!(screen.base().lifecycle().state(), LifecycleState::WillAppear);
    }

    #[test]
    fn test_appear_events_deduplicated() {
        let harness = Harness::new();
        let screen = harness.component("c1", "Inbox");
        screen.on_view_will_appear();
        screen.on_view_did_appear();
        screen.on_view_did_appear();
        screen.on_view_disappear();
        screen.on_view_disappear();

        assert_eq!(
            harness.sink.appear_events(),
            vec![
                ("Navigation.ComponentWillAppear".to_string(), "c1".to_string()),
                ("Navigation.ComponentDidAppear".to_string(), "c1".to_string()),
                ("Navigation.ComponentDidDisappear".to_string(), "c1".to_string()),
            ]
        );
    }

    #[test]
    fn test_destroy_tears_view_down_once() {
        let harness = Harness::new();
        let screen = harness.component("c1", "Inbox");
        screen.on_view_will_appear();
        screen.on_view_did_appear();
        screen.destroy();
        screen.destroy();

        assert_eq!(harness.views.destroyed(), vec!["c1".to_string()]);
        assert!(screen.base().lifecycle().is_destroyed());
        assert_eq!(harness.sink.appear_events().len(), 3);
    }

    #[test]
    fn test_destroy_children_first_in_order() {
        let harness = Harness::new();
        let a: Rc<dyn ViewController> = harness.component("a", "A");
        let b: Rc<dyn ViewController> = harness.component("b", "B");
        a.ensure_view_created();
        b.ensure_view_created();
        let stack = harness.stack("stack", vec![a, b]);
        stack.destroy();

        assert_eq!(harness.views.destroyed(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_resolve_prefers_nearest_scope() {
        let harness = Harness::new();
        harness.context.set_default_options(Options::parse(&json!({
            "topBar": { "visible": true, "drawBehind": true, "animate": true }
        })));
        let screen = ComponentViewController::new(
            "c1",
            "Inbox",
            Options::parse(&json!({ "topBar": { "visible": false } })),
            harness.context.clone(),
        );
        let child: Rc<dyn ViewController> = screen.clone();
        let _stack = harness.stack_with_options(
            "stack",
            vec![child],
            Options::parse(&json!({ "topBar": { "drawBehind": false } })),
        );

        let resolved = screen.resolve_current_options();
        assert_eq!(resolved.top_bar.visible, Param::Set(false));
        assert_eq!(resolved.top_bar.draw_behind, Param::Inherited(false));
        assert_eq!(resolved.top_bar.animate, Param::Inherited(true));
        // own options are not modified by resolving
        assert!(screen.options().top_bar.draw_behind.is_unset());
    }

    #[test]
    fn test_find_controller_in_descendants() {
        let harness = Harness::new();
        let a: Rc<dyn ViewController> = harness.component("a", "A");
        let stack = harness.stack("stack", vec![a]);

        assert_eq!(stack.find_controller("a").map(|c| c.id().to_string()), Some("a".to_string()));
        assert!(stack.find_controller("missing").is_none());
    }
}
