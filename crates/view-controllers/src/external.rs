//! Natively created screens

use async_trait::async_trait;
use nav_options::Options;
use serde_json::Value;
use std::rc::Rc;

use crate::context::NavigationContext;
use crate::controller::{ComponentType, ControllerBase, ViewController};
use crate::view::{View, ViewSpec};

/// Screen whose view is built natively from `passProps`
///
/// External views are shown synchronously, so will-appear is immediately
/// followed by did-appear.
pub struct ExternalComponentViewController {
    base: ControllerBase,
    name: String,
    pass_props: Value,
}

impl ExternalComponentViewController {
    /// Create a screen for the external component `name`
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        pass_props: Value,
        options: Options,
        context: Rc<NavigationContext>,
    ) -> Rc<Self> {
        let id = id.into();
        Rc::new_cyclic(|this: &std::rc::Weak<Self>| {
            let this: std::rc::Weak<dyn ViewController> = this.clone();
            Self { base: ControllerBase::new(id, this, options, context), name: name.into(), pass_props }
        })
    }

    /// Props the view was created with
    pub fn pass_props(&self) -> &Value {
        &self.pass_props
    }
}

#[async_trait(?Send)]
impl ViewController for ExternalComponentViewController {
    fn base(&self) -> &ControllerBase {
        &self.base
    }

    fn component_type(&self) -> ComponentType {
        ComponentType::ExternalComponent
    }

    fn current_component_name(&self) -> Option<String> {
        Some(self.name.clone())
    }

    fn create_view(&self) -> Box<dyn View> {
        let spec = ViewSpec::new(self.id(), ComponentType::ExternalComponent)
            .name(self.name.clone())
            .props(self.pass_props.clone());
        self.base.context().view_creator().create(&spec)
    }

    fn on_view_created(&self) {
        let resolved = self.resolve_current_options();
        self.base.with_view(|view| view.apply_options(&resolved));
    }

    fn will_appear_hook(&self) {
        self.base.context().children().on_appeared(self.id());
        self.on_view_did_appear();
    }

    fn disappear_hook(&self) {
        self.base.context().children().on_disappeared(self.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Harness;
    use serde_json::json;

    #[test]
    fn test_will_appear_also_reports_did_appear() {
        let harness = Harness::new();
        let screen = ExternalComponentViewController::new(
            "e1",
            "NativeMap",
            json!({ "zoom": 3 }),
            Options::empty(),
            harness.context.clone(),
        );
        screen.on_view_will_appear();
        screen.on_view_did_appear();

        assert_eq!(
            harness.sink.appear_events(),
            vec![
                ("Navigation.ComponentWillAppear".to_string(), "e1".to_string()),
                ("Navigation.ComponentDidAppear".to_string(), "e1".to_string()),
            ]
        );
        assert_eq!(harness.views.record("e1").props, Some(json!({ "zoom": 3 })));
        assert_eq!(harness.sink.events()[0].1["componentType"], json!("ExternalComponent"));
    }
}
