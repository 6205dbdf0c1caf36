//! Test utilities
//!
//! Recording fakes for the host side of the navigator: an event sink, a view
//! creator whose views remember what was applied to them, an animator that
//! remembers its requests and a command listener. [`Harness`] wires them into
//! a [`NavigationContext`] and builds controllers on top of it.
//!
//! Available to unit tests and, through the `test-util` feature, to
//! integration tests.

use async_trait::async_trait;
use nav_options::{Options, ResolvedAsset};
use options_processor::{
    AssetResolver, ColorService, OptionProcessorsStore, OptionsProcessor, ProcessorConfig, SequentialIdProvider,
    Store,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use crate::animator::{AnimationRequest, Animator};
use crate::component::ComponentViewController;
use crate::config::NavigationConfig;
use crate::context::NavigationContext;
use crate::controller::ViewController;
use crate::errors::EmitError;
use crate::events::{names, EventEmitter, EventSink};
use crate::listener::CommandListener;
use crate::modal::ModalStack;
use crate::navigator::Navigator;
use crate::stack::StackController;
use crate::view::{View, ViewCreator, ViewSpec};

// =============================================================================
// Events
// =============================================================================

/// Event sink keeping every event in order
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: RefCell<Vec<(String, Value)>>,
}

impl RecordingEventSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All events as `(name, payload)`
    pub fn events(&self) -> Vec<(String, Value)> {
        self.events.borrow().clone()
    }

    /// Names of all events
    pub fn names(&self) -> Vec<String> {
        self.events.borrow().iter().map(|(name, _)| name.clone()).collect()
    }

    /// Component lifecycle events as `(name, componentId)`
    pub fn appear_events(&self) -> Vec<(String, String)> {
        self.events
            .borrow()
            .iter()
            .filter(|(name, _)| {
                matches!(
                    name.as_str(),
                    names::COMPONENT_WILL_APPEAR | names::COMPONENT_DID_APPEAR | names::COMPONENT_DID_DISAPPEAR
                )
            })
            .map(|(name, payload)| {
                let id = payload["componentId"].as_str().unwrap_or_default().to_string();
                (name.clone(), id)
            })
            .collect()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event_name: &str, payload: Value) -> Result<(), EmitError> {
        self.events.borrow_mut().push((event_name.to_string(), payload));
        Ok(())
    }
}

// =============================================================================
// Views
// =============================================================================

/// What happened to the view of one controller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewRecord {
    /// Resolved options applied, in order
    pub applied: Vec<Options>,
    /// Option deltas merged, in order
    pub merged: Vec<Options>,
    /// Last top inset
    pub top_inset: Option<f64>,
    /// Pressed button ids, in order
    pub button_presses: Vec<String>,
    /// Last visibility change
    pub visible: Option<bool>,
    /// Props the view was created with
    pub props: Option<Value>,
}

#[derive(Debug, Default)]
struct ViewLog {
    records: HashMap<String, ViewRecord>,
    created: HashMap<String, usize>,
    destroyed: Vec<String>,
    elements: HashMap<String, Vec<String>>,
}

/// View creator whose views write into a shared log
#[derive(Debug, Default)]
pub struct TestViewCreator {
    log: Rc<RefCell<ViewLog>>,
}

impl TestViewCreator {
    /// Create a creator with an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare elements the view of `id` contains
    pub fn add_elements(&self, id: &str, elements: &[&str]) {
        self.log
            .borrow_mut()
            .elements
            .entry(id.to_string())
            .or_default()
            .extend(elements.iter().map(|element| element.to_string()));
    }

    /// How often a view was created for `id`
    pub fn created(&self, id: &str) -> usize {
        self.log.borrow().created.get(id).copied().unwrap_or(0)
    }

    /// Ids of destroyed views, in destruction order
    pub fn destroyed(&self) -> Vec<String> {
        self.log.borrow().destroyed.clone()
    }

    /// Record of the view of `id`; empty when none was created
    pub fn record(&self, id: &str) -> ViewRecord {
        self.log.borrow().records.get(id).cloned().unwrap_or_default()
    }
}

impl ViewCreator for TestViewCreator {
    fn create(&self, spec: &ViewSpec) -> Box<dyn View> {
        {
            let mut log = self.log.borrow_mut();
            *log.created.entry(spec.id.clone()).or_insert(0) += 1;
            log.records.insert(spec.id.clone(), ViewRecord { props: spec.props.clone(), ..Default::default() });
        }
        Box::new(TestView { id: spec.id.clone(), log: self.log.clone() })
    }
}

struct TestView {
    id: String,
    log: Rc<RefCell<ViewLog>>,
}

impl TestView {
    fn update(&self, f: impl FnOnce(&mut ViewRecord)) {
        f(self.log.borrow_mut().records.entry(self.id.clone()).or_default());
    }
}

impl View for TestView {
    fn apply_options(&mut self, options: &Options) {
        self.update(|record| record.applied.push(options.clone()));
    }

    fn merge_options(&mut self, options: &Options) {
        self.update(|record| record.merged.push(options.clone()));
    }

    fn has_element(&self, element_id: &str) -> bool {
        self.log
            .borrow()
            .elements
            .get(&self.id)
            .is_some_and(|elements| elements.iter().any(|element| element == element_id))
    }

    fn set_top_inset(&mut self, inset: f64) {
        self.update(|record| record.top_inset = Some(inset));
    }

    fn send_navigation_button_pressed(&mut self, button_id: &str) {
        self.update(|record| record.button_presses.push(button_id.to_string()));
    }

    fn set_visible(&mut self, visible: bool) {
        self.update(|record| record.visible = Some(visible));
    }

    fn destroy(&mut self) {
        self.log.borrow_mut().destroyed.push(self.id.clone());
    }
}

// =============================================================================
// Animator and listener
// =============================================================================

/// Animator keeping every request; completes after one scheduler turn
#[derive(Debug, Default)]
pub struct RecordingAnimator {
    requests: RefCell<Vec<AnimationRequest>>,
}

impl RecordingAnimator {
    /// Create an animator without requests
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests so far, in order
    pub fn requests(&self) -> Vec<AnimationRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Animator for RecordingAnimator {
    async fn run(&self, request: AnimationRequest) {
        self.requests.borrow_mut().push(request);
        tokio::task::yield_now().await;
    }
}

/// Listener keeping both outcomes
#[derive(Debug, Default)]
pub struct RecordingListener {
    successes: RefCell<Vec<String>>,
    errors: RefCell<Vec<String>>,
}

impl RecordingListener {
    /// Ids passed to `on_success`, in order
    pub fn successes(&self) -> Vec<String> {
        self.successes.borrow().clone()
    }

    /// Messages passed to `on_error`, in order
    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }
}

impl CommandListener for RecordingListener {
    fn on_success(&self, child_id: &str) {
        self.successes.borrow_mut().push(child_id.to_string());
    }

    fn on_error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

// =============================================================================
// Processor collaborators
// =============================================================================

/// Store keeping the props it was handed
#[derive(Debug, Default)]
pub struct RecordingStore {
    props: Mutex<Vec<(String, Value)>>,
    names: Mutex<Vec<String>>,
}

impl RecordingStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Props as `(componentId, props)`, in order
    pub fn props(&self) -> Vec<(String, Value)> {
        self.props.lock().clone()
    }

    /// Component names registered, in order
    pub fn names(&self) -> Vec<String> {
        self.names.lock().clone()
    }
}

impl Store for RecordingStore {
    fn update_props(&self, component_id: &str, props: &Value) {
        self.props.lock().push((component_id.to_string(), props.clone()));
    }

    fn ensure_class_for_name(&self, name: &str) {
        self.names.lock().push(name.to_string());
    }
}

/// Colors written as `#aarrggbb`
#[derive(Debug, Default)]
pub struct HexColors;

impl ColorService for HexColors {
    fn to_native_color(&self, color: &str) -> Option<u32> {
        u32::from_str_radix(color.strip_prefix('#')?, 16).ok()
    }
}

/// Resolver knowing no assets
#[derive(Debug, Default)]
pub struct NoAssets;

impl AssetResolver for NoAssets {
    fn resolve_from_require(&self, _handle: u64) -> Option<ResolvedAsset> {
        None
    }
}

/// Processor over the fake collaborators
pub fn test_processor(store: Arc<dyn Store>) -> OptionsProcessor {
    OptionsProcessor::new(
        ProcessorConfig::default(),
        store,
        Arc::new(SequentialIdProvider::new()),
        OptionProcessorsStore::new(),
        Arc::new(HexColors),
        Arc::new(NoAssets),
    )
}

// =============================================================================
// Harness
// =============================================================================

/// Context wired to recording fakes
pub struct Harness {
    /// Shared context
    pub context: Rc<NavigationContext>,
    /// Emitted events
    pub sink: Rc<RecordingEventSink>,
    /// Created views
    pub views: Rc<TestViewCreator>,
    /// Requested animations
    pub animator: Rc<RecordingAnimator>,
    /// Props forwarded by the options processor
    pub store: Arc<RecordingStore>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// Harness with the default configuration
    pub fn new() -> Self {
        Self::with_config(NavigationConfig::default())
    }

    /// Harness with a custom configuration
    pub fn with_config(config: NavigationConfig) -> Self {
        let sink = Rc::new(RecordingEventSink::new());
        let views = Rc::new(TestViewCreator::new());
        let emitter = EventEmitter::with_sink(sink.clone());
        let context = Rc::new(NavigationContext::new(config, emitter, views.clone()));
        Self {
            context,
            sink,
            views,
            animator: Rc::new(RecordingAnimator::new()),
            store: Arc::new(RecordingStore::new()),
        }
    }

    /// Screen without options
    pub fn component(&self, id: &str, name: &str) -> Rc<ComponentViewController> {
        self.component_with_options(id, name, Options::empty())
    }

    /// Screen with options
    pub fn component_with_options(&self, id: &str, name: &str, options: Options) -> Rc<ComponentViewController> {
        ComponentViewController::new(id, name, options, self.context.clone())
    }

    /// Stack without options
    pub fn stack(&self, id: &str, children: Vec<Rc<dyn ViewController>>) -> Rc<StackController> {
        self.stack_with_options(id, children, Options::empty())
    }

    /// Stack with options
    pub fn stack_with_options(
        &self,
        id: &str,
        children: Vec<Rc<dyn ViewController>>,
        options: Options,
    ) -> Rc<StackController> {
        StackController::new(id, children, options, self.animator.clone(), self.context.clone())
    }

    /// Modal stack using the recording animator
    pub fn modal_stack(&self) -> ModalStack {
        ModalStack::new(self.context.clone(), self.animator.clone())
    }

    /// Navigator using the recording animator and [`test_processor`]
    pub fn navigator(&self) -> Navigator {
        Navigator::new(self.context.clone(), test_processor(self.store.clone()), self.animator.clone())
    }
}
