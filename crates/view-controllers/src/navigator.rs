//! Command boundary
//!
//! The [`Navigator`] owns the application root, the modal stack and the
//! options processor. Every command runs raw options through the processor,
//! performs the operation, and reports the outcome through exactly one
//! [`CommandListener`] callback. Successful commands also emit
//! `commandCompleted`.
//!
//! The navigator lives on the UI task. Other threads reach it through a
//! [`NavigatorHandle`], whose commands are executed by
//! [`Navigator::run_remote`].

use chrono::Utc;
use nav_options::Options;
use options_processor::{CommandName, OptionsProcessor};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::animator::{AnimationRequest, AnimationSpec, Animator, TransitionKind};
use crate::context::NavigationContext;
use crate::controller::ViewController;
use crate::errors::{NavigationError, Result};
use crate::listener::CommandListener;
use crate::modal::ModalStack;
use crate::transition::{TransitionSet, TransitionSetCreator};

// =============================================================================
// Navigator
// =============================================================================

/// Entry point for navigation commands
pub struct Navigator {
    context: Rc<NavigationContext>,
    processor: OptionsProcessor,
    animator: Rc<dyn Animator>,
    modals: ModalStack,
    transitions: TransitionSetCreator,
    root: RefCell<Option<Rc<dyn ViewController>>>,
}

impl Navigator {
    /// Create a navigator without a root
    pub fn new(context: Rc<NavigationContext>, processor: OptionsProcessor, animator: Rc<dyn Animator>) -> Self {
        let modals = ModalStack::new(context.clone(), animator.clone());
        Self {
            context,
            processor,
            animator,
            modals,
            transitions: TransitionSetCreator::default(),
            root: RefCell::new(None),
        }
    }

    /// Shared navigation context
    pub fn context(&self) -> &Rc<NavigationContext> {
        &self.context
    }

    /// Options processor
    pub fn processor(&self) -> &OptionsProcessor {
        &self.processor
    }

    /// Modal stack
    pub fn modals(&self) -> &ModalStack {
        &self.modals
    }

    /// Current application root
    pub fn root(&self) -> Option<Rc<dyn ViewController>> {
        self.root.borrow().clone()
    }

    /// Report that the navigator accepts commands
    pub fn on_host_ready(&self) {
        self.context.emitter().app_launched();
    }

    /// Normalize a raw payload and parse it
    pub fn parse_options(&self, raw: &mut Value, command: CommandName) -> Options {
        let report = self.processor.process_options(raw, command, None);
        if !report.unresolved_colors.is_empty() {
            tracing::debug!(command = %command, colors = ?report.unresolved_colors, "Unresolved colors dropped");
        }
        Options::parse(raw)
    }

    /// Normalize the options payload of an incoming layout and overlay it
    /// onto the controller before it is attached
    fn apply_layout_options(&self, controller: &dyn ViewController, raw: &mut Value, command: CommandName) {
        let options = self.parse_options(raw, command);
        controller.merge_options(&options);
    }

    /// Find a controller in the modals or under the root
    pub fn find_controller(&self, id: &str) -> Option<Rc<dyn ViewController>> {
        self.modals
            .find_controller_by_id(id)
            .or_else(|| self.root().and_then(|root| root.find_controller(id)))
    }

    /// Like [`Navigator::find_controller`], failing with
    /// [`NavigationError::NoRoot`] while nothing is shown at all
    fn require_controller(&self, id: &str) -> Result<Rc<dyn ViewController>> {
        if self.root().is_none() && self.modals.is_empty() {
            return Err(NavigationError::NoRoot);
        }
        self.find_controller(id).ok_or_else(|| NavigationError::NotFound(id.to_string()))
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Replace the application root, overlaying the processed `raw` options
    /// onto it first
    ///
    /// Modals queued before the first root are revealed on top of it; shown
    /// modals are destroyed.
    pub async fn set_root(&self, root: Rc<dyn ViewController>, raw: &mut Value, listener: &dyn CommandListener) {
        self.apply_layout_options(root.as_ref(), raw, CommandName::SetRoot);
        let result = self.replace_root(root).await;
        self.complete(CommandName::SetRoot, result, listener);
    }

    /// Replace the global default options
    pub fn set_default_options(&self, raw: &mut Value, listener: &dyn CommandListener) {
        let options = self.parse_options(raw, CommandName::SetDefaultOptions);
        self.context.set_default_options(options);
        self.complete(CommandName::SetDefaultOptions, Ok(String::new()), listener);
    }

    /// Merge options into a controller
    pub fn merge_options(&self, component_id: &str, raw: &mut Value, listener: &dyn CommandListener) {
        let result = self.merge_into(component_id, raw);
        self.complete(CommandName::MergeOptions, result, listener);
    }

    /// Show a modal, overlaying the processed `raw` options onto it first
    pub async fn show_modal(&self, modal: Rc<dyn ViewController>, raw: &mut Value, listener: &dyn CommandListener) {
        self.apply_layout_options(modal.as_ref(), raw, CommandName::ShowModal);
        let result = self.modals.show_modal(modal, self.root()).await;
        self.complete(CommandName::ShowModal, result, listener);
    }

    /// Dismiss a modal, merging `raw` options into it first
    pub async fn dismiss_modal(&self, component_id: &str, raw: &mut Value, listener: &dyn CommandListener) {
        let result = self.dismiss(component_id, raw).await;
        self.complete(CommandName::DismissModal, result, listener);
    }

    /// Dismiss every modal
    pub async fn dismiss_all_modals(&self, raw: &mut Value, listener: &dyn CommandListener) {
        let options = self.parse_options(raw, CommandName::DismissAllModals);
        let result = self.modals.dismiss_all_modals(self.root(), &options).await;
        self.complete(CommandName::DismissAllModals, result, listener);
    }

    /// Push onto the stack containing `on_component_id`, overlaying the
    /// processed `raw` options onto the child first
    pub async fn push(
        &self,
        on_component_id: &str,
        child: Rc<dyn ViewController>,
        raw: &mut Value,
        listener: &dyn CommandListener,
    ) {
        self.apply_layout_options(child.as_ref(), raw, CommandName::Push);
        let result = match self.find_stack(on_component_id) {
            Ok(holder) => match holder.as_stack() {
                Some(stack) => stack.push(child).await,
                None => Err(NavigationError::NotFound(on_component_id.to_string())),
            },
            Err(e) => Err(e),
        };
        self.complete(CommandName::Push, result, listener);
    }

    /// Pop the stack containing `component_id`
    pub async fn pop(&self, component_id: &str, raw: &mut Value, listener: &dyn CommandListener) {
        let result = self.pop_command(component_id, raw).await;
        self.complete(CommandName::Pop, result, listener);
    }

    /// Pop the containing stack down to `component_id`
    pub async fn pop_to(&self, component_id: &str, raw: &mut Value, listener: &dyn CommandListener) {
        let options = self.parse_options(raw, CommandName::PopTo);
        let result = match self.find_stack(component_id) {
            Ok(holder) => match holder.as_stack() {
                Some(stack) => stack.pop_to(component_id, &options).await,
                None => Err(NavigationError::NotFound(component_id.to_string())),
            },
            Err(e) => Err(e),
        };
        self.complete(CommandName::PopTo, result, listener);
    }

    /// Pop the stack containing `component_id` down to its root
    pub async fn pop_to_root(&self, component_id: &str, raw: &mut Value, listener: &dyn CommandListener) {
        let result = self.pop_to_root_command(component_id, raw).await;
        self.complete(CommandName::PopToRoot, result, listener);
    }

    /// Replace the children of the stack containing `on_component_id`
    ///
    /// The processed `raw` options are overlaid onto the new top child.
    pub async fn set_stack_root(
        &self,
        on_component_id: &str,
        children: Vec<Rc<dyn ViewController>>,
        raw: &mut Value,
        listener: &dyn CommandListener,
    ) {
        let options = self.parse_options(raw, CommandName::SetStackRoot);
        if let Some(top) = children.last() {
            top.merge_options(&options);
        }
        let result = match self.find_stack(on_component_id) {
            Ok(holder) => match holder.as_stack() {
                Some(stack) => stack.set_stack_root(children).await,
                None => Err(NavigationError::NotFound(on_component_id.to_string())),
            },
            Err(e) => Err(e),
        };
        self.complete(CommandName::SetStackRoot, result, listener);
    }

    /// Handle a hardware back press; modals first, then the root
    pub async fn handle_back(&self) -> bool {
        if !self.modals.is_empty() {
            return self.modals.handle_back(self.root()).await;
        }
        match self.root() {
            Some(root) => root.handle_back().await,
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    async fn replace_root(&self, root: Rc<dyn ViewController>) -> Result<String> {
        let previous = self.root.replace(Some(root.clone()));
        if self.modals.has_queued() {
            root.ensure_view_created();
            self.modals.reveal_queued(&root);
        } else {
            self.modals.destroy();
            let animation = root.resolve_current_options().animations.set_root;
            if let Some(previous) = previous.as_ref().filter(|_| animation.has_value() && animation.is_enabled()) {
                let transitions = if animation.has_element_transitions() {
                    self.transitions
                        .create_for_screen(
                            root.as_ref(),
                            animation.shared_elements.get().map(Vec::as_slice).unwrap_or_default(),
                            animation.element_transitions.get().map(Vec::as_slice).unwrap_or_default(),
                        )
                        .await
                } else {
                    TransitionSet::default()
                };
                let request = AnimationRequest::new(TransitionKind::SetRoot, AnimationSpec::View(animation))
                    .appearing(root.id())
                    .disappearing(previous.id())
                    .transitions(transitions);
                self.animator.run(request).await;
            }
            root.on_view_will_appear();
            root.on_view_did_appear();
        }
        if let Some(previous) = previous.filter(|previous| previous.id() != root.id()) {
            previous.destroy();
        }
        Ok(root.id().to_string())
    }

    fn merge_into(&self, component_id: &str, raw: &mut Value) -> Result<String> {
        let options = self.parse_options(raw, CommandName::MergeOptions);
        let controller = self.require_controller(component_id)?;
        controller.merge_options(&options);
        Ok(component_id.to_string())
    }

    async fn dismiss(&self, component_id: &str, raw: &mut Value) -> Result<String> {
        let options = self.parse_options(raw, CommandName::DismissModal);
        if let Some(modal) = self.modals.modal_containing(component_id) {
            modal.merge_options(&options);
        }
        self.modals.dismiss_modal(component_id, self.root()).await
    }

    async fn pop_command(&self, component_id: &str, raw: &mut Value) -> Result<String> {
        let options = self.parse_options(raw, CommandName::Pop);
        let holder = self.find_stack(component_id)?;
        match holder.as_stack() {
            Some(stack) => stack.pop(&options).await,
            None => Err(NavigationError::NotFound(component_id.to_string())),
        }
    }

    async fn pop_to_root_command(&self, component_id: &str, raw: &mut Value) -> Result<String> {
        let options = self.parse_options(raw, CommandName::PopToRoot);
        let holder = self.find_stack(component_id)?;
        match holder.as_stack() {
            Some(stack) => stack.pop_to_root(&options).await,
            None => Err(NavigationError::NotFound(component_id.to_string())),
        }
    }

    /// The nearest stack at or above `component_id`
    fn find_stack(&self, component_id: &str) -> Result<Rc<dyn ViewController>> {
        let mut current = Some(self.require_controller(component_id)?);
        while let Some(controller) = current {
            if controller.as_stack().is_some() {
                return Ok(controller);
            }
            current = controller.base().parent();
        }
        Err(NavigationError::NotFound(component_id.to_string()))
    }

    fn report(&self, command: CommandName, result: &Result<String>) {
        match result {
            Ok(_) => {
                let command_id = Uuid::new_v4().to_string();
                self.context.emitter().command_completed(command, &command_id, Utc::now().timestamp_millis());
            }
            Err(e) => tracing::warn!(command = %command, error = %e, "Navigation command failed"),
        }
    }

    fn complete(&self, command: CommandName, result: Result<String>, listener: &dyn CommandListener) {
        self.report(command, &result);
        match result {
            Ok(id) => listener.on_success(&id),
            Err(e) => listener.on_error(&e.to_string()),
        }
    }

    // -------------------------------------------------------------------------
    // Remote commands
    // -------------------------------------------------------------------------

    /// Execute commands sent through [`NavigatorHandle`]s until every handle
    /// was dropped
    pub async fn run_remote(&self, mut commands: RemoteReceiver) {
        while let Some(command) = commands.recv().await {
            self.execute_remote(command).await;
        }
        tracing::debug!("All navigator handles dropped");
    }

    async fn execute_remote(&self, command: RemoteCommand) {
        // A dropped reply receiver means the caller stopped waiting.
        match command {
            RemoteCommand::MergeOptions { component_id, mut options, reply } => {
                let result = self.merge_into(&component_id, &mut options);
                self.report(CommandName::MergeOptions, &result);
                let _ = reply.send(result);
            }
            RemoteCommand::DismissModal { component_id, mut options, reply } => {
                let result = self.dismiss(&component_id, &mut options).await;
                self.report(CommandName::DismissModal, &result);
                let _ = reply.send(result);
            }
            RemoteCommand::DismissAllModals { mut options, reply } => {
                let options = self.parse_options(&mut options, CommandName::DismissAllModals);
                let result = self.modals.dismiss_all_modals(self.root(), &options).await;
                self.report(CommandName::DismissAllModals, &result);
                let _ = reply.send(result);
            }
            RemoteCommand::Pop { component_id, mut options, reply } => {
                let result = self.pop_command(&component_id, &mut options).await;
                self.report(CommandName::Pop, &result);
                let _ = reply.send(result);
            }
            RemoteCommand::PopToRoot { component_id, mut options, reply } => {
                let result = self.pop_to_root_command(&component_id, &mut options).await;
                self.report(CommandName::PopToRoot, &result);
                let _ = reply.send(result);
            }
            RemoteCommand::HandleBack { reply } => {
                let _ = reply.send(self.handle_back().await);
            }
        }
    }
}

// =============================================================================
// Remote handle
// =============================================================================

/// Id-addressed command sent from another thread
#[derive(Debug)]
pub enum RemoteCommand {
    /// Merge options into a controller
    MergeOptions {
        /// Target controller
        component_id: String,
        /// Raw options
        options: Value,
        /// Outcome
        reply: oneshot::Sender<Result<String>>,
    },
    /// Dismiss a modal
    DismissModal {
        /// Modal or controller inside it
        component_id: String,
        /// Raw options merged before dismissing
        options: Value,
        /// Outcome
        reply: oneshot::Sender<Result<String>>,
    },
    /// Dismiss every modal
    DismissAllModals {
        /// Raw options merged into the top modal
        options: Value,
        /// Outcome
        reply: oneshot::Sender<Result<String>>,
    },
    /// Pop a stack
    Pop {
        /// Controller inside the stack
        component_id: String,
        /// Raw options merged into the popped screen
        options: Value,
        /// Outcome
        reply: oneshot::Sender<Result<String>>,
    },
    /// Pop a stack to its root
    PopToRoot {
        /// Controller inside the stack
        component_id: String,
        /// Raw options merged into the top screen
        options: Value,
        /// Outcome
        reply: oneshot::Sender<Result<String>>,
    },
    /// Hardware back press
    HandleBack {
        /// Whether the press was consumed
        reply: oneshot::Sender<bool>,
    },
}

/// Receiving end of the remote command channel
pub type RemoteReceiver = mpsc::UnboundedReceiver<RemoteCommand>;

/// Create a handle and the receiver to pass to [`Navigator::run_remote`]
pub fn remote_channel() -> (NavigatorHandle, RemoteReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (NavigatorHandle { tx }, rx)
}

/// Thread-safe handle sending commands to the UI task
#[derive(Debug, Clone)]
pub struct NavigatorHandle {
    tx: mpsc::UnboundedSender<RemoteCommand>,
}

impl NavigatorHandle {
    /// Merge options into a controller
    pub async fn merge_options(&self, component_id: impl Into<String>, options: Value) -> Result<String> {
        let (reply, rx) = oneshot::channel();
        self.send(RemoteCommand::MergeOptions { component_id: component_id.into(), options, reply })?;
        rx.await.map_err(|_| NavigationError::Disconnected)?
    }

    /// Dismiss a modal
    pub async fn dismiss_modal(&self, component_id: impl Into<String>, options: Value) -> Result<String> {
        let (reply, rx) = oneshot::channel();
        self.send(RemoteCommand::DismissModal { component_id: component_id.into(), options, reply })?;
        rx.await.map_err(|_| NavigationError::Disconnected)?
    }

    /// Dismiss every modal
    pub async fn dismiss_all_modals(&self, options: Value) -> Result<String> {
        let (reply, rx) = oneshot::channel();
        self.send(RemoteCommand::DismissAllModals { options, reply })?;
        rx.await.map_err(|_| NavigationError::Disconnected)?
    }

    /// Pop a stack
    pub async fn pop(&self, component_id: impl Into<String>, options: Value) -> Result<String> {
        let (reply, rx) = oneshot::channel();
        self.send(RemoteCommand::Pop { component_id: component_id.into(), options, reply })?;
        rx.await.map_err(|_| NavigationError::Disconnected)?
    }

    /// Pop a stack to its root
    pub async fn pop_to_root(&self, component_id: impl Into<String>, options: Value) -> Result<String> {
        let (reply, rx) = oneshot::channel();
        self.send(RemoteCommand::PopToRoot { component_id: component_id.into(), options, reply })?;
        rx.await.map_err(|_| NavigationError::Disconnected)?
    }

    /// Forward a hardware back press
    pub async fn handle_back(&self) -> Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(RemoteCommand::HandleBack { reply })?;
        rx.await.map_err(|_| NavigationError::Disconnected)
    }

    fn send(&self, command: RemoteCommand) -> Result<()> {
        self.tx.send(command).map_err(|_| NavigationError::Disconnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Harness, RecordingListener};
    use serde_json::json;

    #[tokio::test]
    async fn test_set_root_shows_root() {
        let harness = Harness::new();
        let navigator = harness.navigator();
        let listener = RecordingListener::default();

        navigator.set_root(harness.component("root", "Home"), &mut json!({}), &listener).await;

        assert_eq!(listener.successes(), vec!["root".to_string()]);
        assert!(navigator.root().is_some_and(|root| root.is_visible()));
        let completed = harness
            .sink
            .events()
            .into_iter()
            .filter(|(name, _)| name == "Navigation.CommandCompleted")
            .count();
        assert_eq!(completed, 1);
    }

    #[tokio::test]
    async fn test_replacing_root_destroys_previous_and_modals() {
        let harness = Harness::new();
        let navigator = harness.navigator();
        let listener = RecordingListener::default();
        navigator.set_root(harness.component("first", "Home"), &mut json!({}), &listener).await;
        navigator.show_modal(harness.component("m1", "Modal"), &mut json!({}), &listener).await;

        navigator.set_root(harness.component("second", "Home"), &mut json!({}), &listener).await;

        assert!(navigator.modals().is_empty());
        assert_eq!(harness.views.destroyed(), vec!["m1", "first"]);
    }

    #[tokio::test]
    async fn test_merge_options_processes_payload() {
        let harness = Harness::new();
        let navigator = harness.navigator();
        let listener = RecordingListener::default();
        navigator.set_root(harness.component("root", "Home"), &mut json!({}), &listener).await;

        navigator.merge_options("root", &mut json!({ "topBar": { "searchBar": true } }), &listener);
        navigator.merge_options("missing", &mut json!({}), &listener);

        let root = navigator.root().expect("root");
        assert!(root.options().top_bar.search_bar.visible.is_true());
        assert_eq!(listener.errors(), vec!["Controller not found: missing".to_string()]);
    }

    #[tokio::test]
    async fn test_set_default_options() {
        let harness = Harness::new();
        let navigator = harness.navigator();
        let listener = RecordingListener::default();
        navigator.set_default_options(&mut json!({ "topBar": { "visible": false } }), &listener);
        assert!(harness.context.default_options().top_bar.visible.is_false());
        assert_eq!(listener.successes(), vec![String::new()]);
    }

    #[tokio::test]
    async fn test_stack_commands_find_enclosing_stack() {
        let harness = Harness::new();
        let navigator = harness.navigator();
        let listener = RecordingListener::default();
        let stack = harness.stack("stack", vec![harness.component("a", "A") as Rc<dyn ViewController>]);
        navigator.set_root(stack.clone(), &mut json!({}), &listener).await;

        navigator.push("a", harness.component("b", "B"), &mut json!({}), &listener).await;
        navigator.push("c", harness.component("d", "D"), &mut json!({}), &listener).await;
        navigator.pop("b", &mut json!({}), &listener).await;
        navigator.pop("a", &mut json!({}), &listener).await;
        let children = vec![harness.component("x", "X") as Rc<dyn ViewController>];
        navigator.set_stack_root("stack", children, &mut json!({}), &listener).await;
        navigator.pop_to("x", &mut json!({}), &listener).await;
        navigator.pop_to_root("x", &mut json!({}), &listener).await;

        assert_eq!(listener.successes(), vec!["stack", "b", "b", "x", "x", "x"]);
        assert_eq!(listener.errors(), vec!["Controller not found: c", "Cannot pop a: only the root is left"]);
        assert_eq!(stack.child_ids(), vec!["x"]);
    }

    #[tokio::test]
    async fn test_handle_back_prefers_modals() {
        let harness = Harness::new();
        let navigator = harness.navigator();
        let listener = RecordingListener::default();
        assert!(!navigator.handle_back().await);

        let stack = harness.stack(
            "stack",
            vec![
                harness.component("a", "A") as Rc<dyn ViewController>,
                harness.component("b", "B") as Rc<dyn ViewController>,
            ],
        );
        navigator.set_root(stack.clone(), &mut json!({}), &listener).await;
        navigator.show_modal(harness.component("m1", "Modal"), &mut json!({}), &listener).await;

        assert!(navigator.handle_back().await);
        assert!(navigator.modals().is_empty());
        assert_eq!(stack.size(), 2);

        assert!(navigator.handle_back().await);
        assert_eq!(stack.size(), 1);
    }

    #[tokio::test]
    async fn test_remote_commands_run_on_ui_task() {
        let harness = Harness::new();
        let navigator = harness.navigator();
        let listener = RecordingListener::default();
        navigator.set_root(harness.component("root", "Home"), &mut json!({}), &listener).await;
        navigator.show_modal(harness.component("m1", "Modal"), &mut json!({}), &listener).await;
        let (handle, commands) = remote_channel();

        let client = async move {
            let merged = handle.merge_options("root", json!({ "topBar": { "visible": false } })).await;
            let dismissed = handle.dismiss_modal("m1", json!({})).await;
            let missing = handle.pop("nowhere", json!({})).await;
            let back = handle.handle_back().await;
            (merged, dismissed, missing, back)
        };
        let ((merged, dismissed, missing, back), ()) = tokio::join!(client, navigator.run_remote(commands));

        assert_eq!(merged, Ok("root".to_string()));
        assert_eq!(dismissed, Ok("m1".to_string()));
        assert_eq!(missing, Err(NavigationError::NotFound("nowhere".into())));
        assert_eq!(back, Ok(false));
        assert!(navigator.root().is_some_and(|root| root.options().top_bar.visible.is_false()));
    }

    #[tokio::test]
    async fn test_handle_after_navigator_stopped() {
        let (handle, commands) = remote_channel();
        drop(commands);
        assert_eq!(handle.dismiss_all_modals(json!({})).await, Err(NavigationError::Disconnected));
    }
}
