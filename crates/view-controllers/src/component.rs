//! Host-rendered screens

use async_trait::async_trait;
use nav_options::Options;
use std::cell::RefCell;
use std::rc::Rc;

use crate::context::NavigationContext;
use crate::controller::{adopt, ComponentType, ControllerBase, ViewController};
use crate::top_bar_component::{TopBarComponentController, TopBarComponentRole};
use crate::view::{View, ViewSpec};

// =============================================================================
// Presenter
// =============================================================================

/// Applies options to a screen's view
#[derive(Debug, Default, Clone, Copy)]
pub struct ComponentPresenter {
    status_bar_height: f64,
}

impl ComponentPresenter {
    /// Create a presenter for a status bar height
    pub fn new(status_bar_height: f64) -> Self {
        Self { status_bar_height }
    }

    /// Apply fully resolved options
    pub fn apply_options(&self, view: &mut dyn View, options: &Options) {
        view.apply_options(options);
    }

    /// Apply an options delta to a shown view
    pub fn merge_options(&self, view: &mut dyn View, options: &Options) {
        view.merge_options(options);
    }

    /// Top inset of a screen: the status bar, unless hidden or drawn behind,
    /// plus whatever the ancestors draw above the screen
    pub fn top_inset(&self, resolved: &Options, inset_from_parent: f64) -> f64 {
        let status_bar = if resolved.status_bar.is_hidden_or_draw_behind() { 0.0 } else { self.status_bar_height };
        status_bar + inset_from_parent
    }
}

// =============================================================================
// Component view controller
// =============================================================================

/// Screen rendered by a registered host component
pub struct ComponentViewController {
    base: ControllerBase,
    name: String,
    presenter: ComponentPresenter,
    decorations: RefCell<Vec<Rc<TopBarComponentController>>>,
}

impl ComponentViewController {
    /// Create a screen for the component `name`
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        options: Options,
        context: Rc<NavigationContext>,
    ) -> Rc<Self> {
        let presenter = ComponentPresenter::new(context.config().status_bar_height);
        let id = id.into();
        Rc::new_cyclic(|this: &std::rc::Weak<Self>| {
            let this: std::rc::Weak<dyn ViewController> = this.clone();
            Self {
                base: ControllerBase::new(id, this, options, context),
                name: name.into(),
                presenter,
                decorations: RefCell::new(Vec::new()),
            }
        })
    }

    /// Registered component name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current top inset of the screen
    pub fn top_inset(&self) -> f64 {
        let parent_inset = self
            .base
            .parent()
            .map(|parent| parent.top_inset_for_child(self.id()))
            .unwrap_or(0.0);
        self.presenter.top_inset(&self.resolve_current_options(), parent_inset)
    }

    /// Top bar components of this screen
    pub fn decorations(&self) -> Vec<Rc<TopBarComponentController>> {
        self.decorations.borrow().clone()
    }

    fn apply_resolved(&self) {
        let resolved = self.resolve_current_options();
        let inset = self.top_inset();
        self.base.with_view(|view| {
            self.presenter.apply_options(view, &resolved);
            view.set_top_inset(inset);
        });
    }

    fn create_decorations(&self, resolved: &Options) -> Vec<Rc<TopBarComponentController>> {
        let context = self.base.context();
        let top_bar = &resolved.top_bar;
        let mut declared = Vec::new();
        if top_bar.title.component.has_value() {
            declared.push((&top_bar.title.component, TopBarComponentRole::Title));
        }
        if top_bar.background.component.has_value() {
            declared.push((&top_bar.background.component, TopBarComponentRole::Background));
        }
        for button in top_bar.buttons.left.get().into_iter().chain(top_bar.buttons.right.get()).flatten() {
            let Some(button_id) = button.id.get().filter(|_| button.has_component()) else {
                continue;
            };
            declared.push((&button.component, TopBarComponentRole::Button { button_id: button_id.clone() }));
        }

        declared
            .into_iter()
            .filter_map(|(component, role)| {
                let name = component.name.get()?;
                let id = component.component_id.get().cloned().unwrap_or_else(|| format!("{}.{}", self.id(), name));
                Some(TopBarComponentController::new(id, name.clone(), role, context.clone()))
            })
            .collect()
    }
}

#[async_trait(?Send)]
impl ViewController for ComponentViewController {
    fn base(&self) -> &ControllerBase {
        &self.base
    }

    fn component_type(&self) -> ComponentType {
        ComponentType::Component
    }

    fn current_component_name(&self) -> Option<String> {
        Some(self.name.clone())
    }

    fn children(&self) -> Vec<Rc<dyn ViewController>> {
        self.decorations.borrow().iter().map(|d| d.clone() as Rc<dyn ViewController>).collect()
    }

    fn create_view(&self) -> Box<dyn View> {
        let spec = ViewSpec::new(self.id(), ComponentType::Component).name(self.name.clone());
        self.base.context().view_creator().create(&spec)
    }

    fn on_view_created(&self) {
        let decorations = self.create_decorations(&self.resolve_current_options());
        if let Some(this) = self.base.this() {
            let children: Vec<Rc<dyn ViewController>> =
                decorations.iter().map(|d| d.clone() as Rc<dyn ViewController>).collect();
            adopt(&this, &children);
        }
        *self.decorations.borrow_mut() = decorations;
        self.apply_resolved();
    }

    fn will_appear_hook(&self) {
        self.base.context().children().on_appeared(self.id());
        let inset = self.top_inset();
        self.base.with_view(|view| view.set_top_inset(inset));
        for decoration in self.decorations() {
            decoration.on_view_will_appear();
        }
    }

    fn did_appear_hook(&self) {
        for decoration in self.decorations() {
            decoration.on_view_did_appear();
        }
    }

    fn disappear_hook(&self) {
        self.base.context().children().on_disappeared(self.id());
        for decoration in self.decorations() {
            decoration.on_view_disappear();
        }
    }

    fn merge_options(&self, options: &Options) {
        if options.is_empty() {
            return;
        }
        self.base.overlay_options(options);
        if self.is_visible() {
            let inset = self.top_inset();
            self.base.with_view(|view| {
                self.presenter.merge_options(view, options);
                view.set_top_inset(inset);
            });
        }
    }

    fn send_on_navigation_button_pressed(&self, button_id: &str) {
        self.base.context().emitter().navigation_button_pressed(self.id(), button_id);
        self.base.with_view(|view| view.send_navigation_button_pressed(button_id));
    }
}
