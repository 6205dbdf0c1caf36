//! Components embedded in a screen's top bar

use async_trait::async_trait;
use nav_options::Options;
use std::rc::Rc;

use crate::context::NavigationContext;
use crate::controller::{ComponentType, ControllerBase, ViewController};
use crate::view::{View, ViewSpec};

/// Where in the top bar a component is rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopBarComponentRole {
    /// Custom title
    Title,
    /// Custom background
    Background,
    /// Custom button
    Button {
        /// Id of the button the component renders
        button_id: String,
    },
}

/// Decoration controller for a title, background or button component
///
/// Follows the owning screen's lifecycle but never reports lifecycle events
/// of its own.
pub struct TopBarComponentController {
    base: ControllerBase,
    name: String,
    role: TopBarComponentRole,
}

impl TopBarComponentController {
    /// Create a decoration for the component `name`
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: TopBarComponentRole,
        context: Rc<NavigationContext>,
    ) -> Rc<Self> {
        let id = id.into();
        Rc::new_cyclic(|this: &std::rc::Weak<Self>| {
            let this: std::rc::Weak<dyn ViewController> = this.clone();
            Self { base: ControllerBase::new(id, this, Options::empty(), context), name: name.into(), role }
        })
    }

    /// Role in the top bar
    pub fn role(&self) -> &TopBarComponentRole {
        &self.role
    }

    /// The rendered component was pressed; buttons report the press for the
    /// owning screen
    pub fn on_press(&self) {
        let TopBarComponentRole::Button { button_id } = &self.role else {
            return;
        };
        match self.base.parent() {
            Some(screen) => screen.send_on_navigation_button_pressed(button_id),
            None => tracing::warn!(button_id = %button_id, "Button component pressed without a screen"),
        }
    }
}

#[async_trait(?Send)]
impl ViewController for TopBarComponentController {
    fn base(&self) -> &ControllerBase {
        &self.base
    }

    fn component_type(&self) -> ComponentType {
        ComponentType::TopBarComponent
    }

    fn can_send_lifecycle_events(&self) -> bool {
        false
    }

    fn current_component_name(&self) -> Option<String> {
        Some(self.name.clone())
    }

    fn create_view(&self) -> Box<dyn View> {
        let spec = ViewSpec::new(self.id(), ComponentType::TopBarComponent).name(self.name.clone());
        self.base.context().view_creator().create(&spec)
    }
}
