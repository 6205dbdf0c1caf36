//! Host view abstraction
//!
//! Controllers never render anything themselves. Each controller owns at
//! most one [`View`], created through the [`ViewCreator`] of its context the
//! first time it is needed, and torn down at most once.

use nav_options::Options;
use serde_json::Value;

use crate::controller::ComponentType;

/// Host view backing a controller
///
/// All methods have no-op defaults so hosts only implement what they render.
pub trait View {
    /// Apply fully resolved options
    fn apply_options(&mut self, _options: &Options) {}

    /// Apply an options delta to a view that is already shown
    fn merge_options(&mut self, _options: &Options) {}

    /// Whether the view hierarchy contains an element with this id
    fn has_element(&self, _element_id: &str) -> bool {
        false
    }

    /// Set the distance between the top of the window and the content
    fn set_top_inset(&mut self, _inset: f64) {}

    /// A top bar button was pressed
    fn send_navigation_button_pressed(&mut self, _button_id: &str) {}

    /// Show or hide the view
    fn set_visible(&mut self, _visible: bool) {}

    /// Tear the view down; called at most once
    fn destroy(&mut self) {}
}

/// What a [`ViewCreator`] needs to build a view
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSpec {
    /// Id of the owning controller
    pub id: String,
    /// Registered component name, for host components
    pub name: Option<String>,
    /// Kind of the owning controller
    pub kind: ComponentType,
    /// Initial props of external components
    pub props: Option<Value>,
}

impl ViewSpec {
    /// Spec of a view without a component name
    pub fn new(id: impl Into<String>, kind: ComponentType) -> Self {
        Self { id: id.into(), name: None, kind, props: None }
    }

    /// Set the component name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the initial props
    pub fn props(mut self, props: Value) -> Self {
        self.props = Some(props);
        self
    }
}

/// Factory for host views
pub trait ViewCreator {
    /// Create the view for a controller
    fn create(&self, spec: &ViewSpec) -> Box<dyn View>;
}

/// View that renders nothing
#[derive(Debug, Default)]
pub struct NoopView;

impl View for NoopView {}

/// Creator of [`NoopView`]s, for headless use
#[derive(Debug, Default)]
pub struct NoopViewCreator;

impl ViewCreator for NoopViewCreator {
    fn create(&self, _spec: &ViewSpec) -> Box<dyn View> {
        Box::new(NoopView)
    }
}

/// A located element of a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef {
    /// Element id
    pub element_id: String,
    /// Id of the screen controller the element belongs to
    pub screen_id: String,
}
