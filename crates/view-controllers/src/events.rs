//! Outgoing navigation events
//!
//! The [`EventEmitter`] is created once per navigator and shared through the
//! [`NavigationContext`](crate::NavigationContext). Events are fire-and-forget:
//! a missing or failing sink is logged and otherwise ignored.

use options_processor::CommandName;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::EmitError;

/// Event names
pub mod names {
    /// A component is about to appear
    pub const COMPONENT_WILL_APPEAR: &str = "Navigation.ComponentWillAppear";
    /// A component appeared
    pub const COMPONENT_DID_APPEAR: &str = "Navigation.ComponentDidAppear";
    /// A component disappeared
    pub const COMPONENT_DID_DISAPPEAR: &str = "Navigation.ComponentDidDisappear";
    /// The navigator is ready for commands
    pub const APP_LAUNCHED: &str = "Navigation.AppLaunched";
    /// A command finished successfully
    pub const COMMAND_COMPLETED: &str = "Navigation.CommandCompleted";
    /// The selected bottom tab changed
    pub const BOTTOM_TAB_SELECTED: &str = "Navigation.BottomTabSelected";
    /// A bottom tab was pressed
    pub const BOTTOM_TAB_PRESSED: &str = "Navigation.BottomTabPressed";
    /// A top bar button was pressed
    pub const NAVIGATION_BUTTON_PRESSED: &str = "Navigation.NavigationButtonPressed";
    /// One or more modals were dismissed
    pub const MODAL_DISMISSED: &str = "Navigation.ModalDismissed";
    /// A screen was popped off a stack
    pub const SCREEN_POPPED: &str = "Navigation.ScreenPopped";
}

/// Receiver of emitted events, typically a bridge to the host runtime
pub trait EventSink {
    /// Deliver one event
    fn emit(&self, event_name: &str, payload: Value) -> Result<(), EmitError>;
}

/// Lifecycle appearance transitions reported for components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppearState {
    /// About to appear
    WillAppear,
    /// Appeared
    DidAppear,
    /// Disappeared
    DidDisappear,
}

impl AppearState {
    /// Event name for this transition
    pub fn event_name(&self) -> &'static str {
        match self {
            AppearState::WillAppear => names::COMPONENT_WILL_APPEAR,
            AppearState::DidAppear => names::COMPONENT_DID_APPEAR,
            AppearState::DidDisappear => names::COMPONENT_DID_DISAPPEAR,
        }
    }
}

/// Typed front end over an [`EventSink`]
#[derive(Default)]
pub struct EventEmitter {
    sink: RefCell<Option<Rc<dyn EventSink>>>,
}

impl EventEmitter {
    /// Create an emitter without a sink; events are dropped until one is attached
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an emitter delivering to `sink`
    pub fn with_sink(sink: Rc<dyn EventSink>) -> Self {
        Self { sink: RefCell::new(Some(sink)) }
    }

    /// Attach or replace the sink
    pub fn attach(&self, sink: Rc<dyn EventSink>) {
        *self.sink.borrow_mut() = Some(sink);
    }

    /// Detach the sink
    pub fn detach(&self) {
        self.sink.borrow_mut().take();
    }

    /// Report that the navigator is ready
    pub fn app_launched(&self) {
        self.emit(names::APP_LAUNCHED, json!({}));
    }

    /// Report a component appearance transition
    pub fn component_appear_state(
        &self,
        state: AppearState,
        component_id: &str,
        component_name: Option<&str>,
        component_type: &str,
    ) {
        self.emit(
            state.event_name(),
            json!({
                "componentId": component_id,
                "componentName": component_name,
                "componentType": component_type,
            }),
        );
    }

    /// Report a top bar button press
    pub fn navigation_button_pressed(&self, component_id: &str, button_id: &str) {
        self.emit(
            names::NAVIGATION_BUTTON_PRESSED,
            json!({ "componentId": component_id, "buttonId": button_id }),
        );
    }

    /// Report a bottom tab selection change
    pub fn bottom_tab_selected(&self, unselected_tab_index: usize, selected_tab_index: usize) {
        self.emit(
            names::BOTTOM_TAB_SELECTED,
            json!({ "unselectedTabIndex": unselected_tab_index, "selectedTabIndex": selected_tab_index }),
        );
    }

    /// Report a bottom tab press
    pub fn bottom_tab_pressed(&self, tab_index: usize) {
        self.emit(names::BOTTOM_TAB_PRESSED, json!({ "tabIndex": tab_index }));
    }

    /// Report a successfully completed command
    pub fn command_completed(&self, command: CommandName, command_id: &str, completion_time_ms: i64) {
        self.emit(
            names::COMMAND_COMPLETED,
            json!({
                "commandName": command.as_str(),
                "commandId": command_id,
                "completionTime": completion_time_ms,
            }),
        );
    }

    /// Report dismissed modals
    pub fn modal_dismissed(&self, component_id: &str, component_name: Option<&str>, modals_dismissed: usize) {
        self.emit(
            names::MODAL_DISMISSED,
            json!({
                "componentId": component_id,
                "componentName": component_name,
                "modalsDismissed": modals_dismissed,
            }),
        );
    }

    /// Report a popped screen
    pub fn screen_popped(&self, component_id: &str) {
        self.emit(names::SCREEN_POPPED, json!({ "componentId": component_id }));
    }

    fn emit(&self, event_name: &str, payload: Value) {
        // Clone the sink out so a sink may call back into the emitter.
        let sink = self.sink.borrow().clone();
        let result = match sink {
            Some(sink) => sink.emit(event_name, payload),
            None => Err(EmitError::NoListener),
        };
        if let Err(e) = result {
            tracing::error!("Could not send event {}: {}", event_name, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collect {
        events: RefCell<Vec<(String, Value)>>,
    }

    impl EventSink for Collect {
        fn emit(&self, event_name: &str, payload: Value) -> Result<(), EmitError> {
            self.events.borrow_mut().push((event_name.to_string(), payload));
            Ok(())
        }
    }

    struct Failing;

    impl EventSink for Failing {
        fn emit(&self, _: &str, _: Value) -> Result<(), EmitError> {
            Err(EmitError::Delivery("bridge torn down".to_string()))
        }
    }

    #[test]
    fn test_payloads() {
        let sink = Rc::new(Collect::default());
        let emitter = EventEmitter::with_sink(sink.clone());

        emitter.component_appear_state(AppearState::WillAppear, "c1", Some("Inbox"), "Component");
        emitter.modal_dismissed("m1", None, 2);
        emitter.command_completed(CommandName::ShowModal, "cmd", 42);

        let events = sink.events.borrow();
        assert_eq!(events[0].0, names::COMPONENT_WILL_APPEAR);
        assert_eq!(
            events[0].1,
            json!({ "componentId": "c1", "componentName": "Inbox", "componentType": "Component" })
        );
        assert_eq!(events[1].1, json!({ "componentId": "m1", "componentName": null, "modalsDismissed": 2 }));
        assert_eq!(events[2].1["commandName"], json!("showModal"));
    }

    #[test]
    fn test_missing_or_failing_sink_is_swallowed() {
        let emitter = EventEmitter::new();
        emitter.screen_popped("c1");

        emitter.attach(Rc::new(Failing));
        emitter.bottom_tab_pressed(1);

        let sink = Rc::new(Collect::default());
        emitter.attach(sink.clone());
        emitter.detach();
        emitter.app_launched();
        assert!(sink.events.borrow().is_empty());
    }
}
