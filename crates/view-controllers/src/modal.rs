//! Modal stack coordinator
//!
//! Modals are kept bottom to top, each paired with the controller that was
//! visible below it when it was shown. Show and dismiss operations are
//! serialized behind one lock, so a show issued while another is animating
//! waits for it and the newest modal always ends up on top.
//!
//! Event order:
//!
//! - show: new will-appear, new did-appear, previous did-disappear
//! - dismiss: removed did-disappear, revealed will-appear, revealed did-appear
//!
//! Modals shown before the application root exists are queued and revealed
//! once the root is set.

use nav_options::{ModalAnimationOptions, ModalPresentationStyle, Options, Param};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tokio::sync::Mutex;

use crate::animator::{AnimationRequest, AnimationSpec, Animator, TransitionKind};
use crate::context::NavigationContext;
use crate::controller::ViewController;
use crate::errors::{NavigationError, Result};
use crate::transition::{TransitionSet, TransitionSetCreator};

struct ModalEntry {
    controller: Rc<dyn ViewController>,
    previous: Option<Rc<dyn ViewController>>,
}

/// Ordered stack of modals shown above the root
pub struct ModalStack {
    context: Rc<NavigationContext>,
    animator: Rc<dyn Animator>,
    transitions: TransitionSetCreator,
    entries: RefCell<Vec<ModalEntry>>,
    lock: Mutex<()>,
    queued: Cell<bool>,
}

impl ModalStack {
    /// Create an empty modal stack
    pub fn new(context: Rc<NavigationContext>, animator: Rc<dyn Animator>) -> Self {
        Self {
            context,
            animator,
            transitions: TransitionSetCreator::default(),
            entries: RefCell::new(Vec::new()),
            lock: Mutex::new(()),
            queued: Cell::new(false),
        }
    }

    /// Number of modals
    pub fn size(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether no modal is shown
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Top modal
    pub fn peek(&self) -> Result<Rc<dyn ViewController>> {
        self.top().ok_or(NavigationError::EmptyStack)
    }

    /// Ids of the modals, bottom first
    pub fn ids(&self) -> Vec<String> {
        self.entries.borrow().iter().map(|entry| entry.controller.id().to_string()).collect()
    }

    /// Whether modals are waiting for the root to be set
    pub fn has_queued(&self) -> bool {
        self.queued.get() && !self.is_empty()
    }

    /// Find a modal, or a controller inside one, by id
    pub fn find_controller_by_id(&self, id: &str) -> Option<Rc<dyn ViewController>> {
        let modals: Vec<_> = self.entries.borrow().iter().map(|entry| entry.controller.clone()).collect();
        modals.iter().find_map(|modal| modal.find_controller(id))
    }

    /// The modal whose hierarchy contains `id`
    pub fn modal_containing(&self, id: &str) -> Option<Rc<dyn ViewController>> {
        let modals: Vec<_> = self.entries.borrow().iter().map(|entry| entry.controller.clone()).collect();
        modals.into_iter().find(|modal| modal.find_controller(id).is_some())
    }

    fn top(&self) -> Option<Rc<dyn ViewController>> {
        self.entries.borrow().last().map(|entry| entry.controller.clone())
    }

    /// Show a modal above the current top; resolves with the modal's id
    pub async fn show_modal(
        &self,
        modal: Rc<dyn ViewController>,
        root: Option<Rc<dyn ViewController>>,
    ) -> Result<String> {
        let _guard = self.lock.lock().await;
        let id = modal.id().to_string();
        let below = self.top();

        let Some(root) = root else {
            self.entries.borrow_mut().push(ModalEntry { controller: modal, previous: below });
            self.queued.set(true);
            tracing::debug!(modal = %id, "No root yet, modal queued");
            return Ok(id);
        };
        let previous = below.unwrap_or(root);
        self.entries
            .borrow_mut()
            .push(ModalEntry { controller: modal.clone(), previous: Some(previous.clone()) });

        let resolved = modal.resolve_current_options();
        let animation = resolved.animations.show_modal.clone();
        if animation.is_enter_enabled() {
            let transitions = self.match_transitions(&animation, previous.as_ref(), modal.as_ref()).await;
            let request = AnimationRequest::new(TransitionKind::ShowModal, AnimationSpec::Modal(animation))
                .appearing(modal.id())
                .disappearing(previous.id())
                .transitions(transitions);
            self.animator.run(request).await;
        }

        modal.on_view_will_appear();
        modal.on_view_did_appear();
        if !keeps_previous_visible(&resolved) {
            previous.on_view_disappear();
            previous.base().with_view(|view| view.set_visible(false));
        }
        Ok(id)
    }

    /// Reveal modals queued before the root existed
    pub fn reveal_queued(&self, root: &Rc<dyn ViewController>) {
        if !self.queued.replace(false) {
            return;
        }
        let top = {
            let mut entries = self.entries.borrow_mut();
            if let Some(first) = entries.first_mut() {
                first.previous.get_or_insert_with(|| root.clone());
            }
            entries.last().map(|entry| entry.controller.clone())
        };
        if let Some(top) = top {
            tracing::debug!(modal = %top.id(), "Revealing queued modals");
            top.on_view_will_appear();
            top.on_view_did_appear();
        }
    }

    /// Dismiss the modal with this id, or the modal containing it
    ///
    /// Resolves with the dismissed modal's id.
    pub async fn dismiss_modal(&self, id: &str, root: Option<Rc<dyn ViewController>>) -> Result<String> {
        let _guard = self.lock.lock().await;
        let (index, matched) = {
            let entries = self.entries.borrow();
            entries
                .iter()
                .enumerate()
                .find_map(|(index, entry)| entry.controller.find_controller(id).map(|matched| (index, matched)))
                .ok_or_else(|| NavigationError::NotFound(id.to_string()))?
        };

        let (entry, is_top) = {
            let mut entries = self.entries.borrow_mut();
            let is_top = index + 1 == entries.len();
            let entry = entries.remove(index);
            if !is_top {
                entries[index].previous = entry.previous.clone();
            }
            (entry, is_top)
        };
        let modal = entry.controller;

        if is_top {
            let revealed = entry.previous.or(root);
            let animation = modal.resolve_current_options().animations.dismiss_modal;
            if let Some(revealed) = revealed.as_ref().filter(|_| animation.is_exit_enabled() && !self.queued.get()) {
                let transitions = self.match_transitions(&animation, modal.as_ref(), revealed.as_ref()).await;
                let request = AnimationRequest::new(TransitionKind::DismissModal, AnimationSpec::Modal(animation))
                    .appearing(revealed.id())
                    .disappearing(modal.id())
                    .transitions(transitions);
                self.animator.run(request).await;
            }
            modal.on_view_disappear();
            if let Some(revealed) = revealed.filter(|_| !self.queued.get()) {
                revealed.base().with_view(|view| view.set_visible(true));
                revealed.on_view_will_appear();
                revealed.on_view_did_appear();
            }
        } else {
            modal.on_view_disappear();
        }
        modal.destroy();
        if self.is_empty() {
            self.queued.set(false);
        }

        let name = matched.current_component_name();
        self.context.emitter().modal_dismissed(modal.id(), name.as_deref(), 1);
        Ok(modal.id().to_string())
    }

    /// Dismiss every modal
    ///
    /// `merge_options` is merged into the top modal only, and only the top
    /// modal's dismissal is animated. Resolves with the revealed root's id, or
    /// an empty string when there is no root.
    pub async fn dismiss_all_modals(
        &self,
        root: Option<Rc<dyn ViewController>>,
        merge_options: &Options,
    ) -> Result<String> {
        let _guard = self.lock.lock().await;
        let root_id = root.as_ref().map(|root| root.id().to_string()).unwrap_or_default();
        let mut entries = self.entries.take();
        let was_queued = self.queued.replace(false);
        let Some(top) = entries.pop().map(|entry| entry.controller) else {
            return Ok(root_id);
        };
        let count = entries.len() + 1;

        top.merge_options(merge_options);
        for entry in entries {
            entry.controller.on_view_disappear();
            entry.controller.destroy();
        }

        let animation = top.resolve_current_options().animations.dismiss_modal;
        if let Some(root) = root.as_ref().filter(|_| animation.is_exit_enabled() && !was_queued) {
            let request = AnimationRequest::new(TransitionKind::DismissModal, AnimationSpec::Modal(animation))
                .appearing(root.id())
                .disappearing(top.id());
            self.animator.run(request).await;
        }
        top.on_view_disappear();
        if let Some(root) = root.as_ref().filter(|_| !was_queued) {
            root.base().with_view(|view| view.set_visible(true));
            root.on_view_will_appear();
            root.on_view_did_appear();
        }
        top.destroy();

        let name = top.current_component_name();
        self.context.emitter().modal_dismissed(top.id(), name.as_deref(), count);
        Ok(root_id)
    }

    /// Handle a back press; `false` when there is no modal
    ///
    /// The top modal handles the press first. Otherwise it is dismissed,
    /// unless its options disable dismissing on back press.
    pub async fn handle_back(&self, root: Option<Rc<dyn ViewController>>) -> bool {
        let Some(top) = self.top() else {
            return false;
        };
        if top.handle_back().await {
            return true;
        }
        if top.resolve_current_options().hardware_back_button.dismiss_modal_on_press.is_false() {
            return true;
        }
        if let Err(e) = self.dismiss_modal(top.id(), root).await {
            tracing::warn!(modal = %top.id(), error = %e, "Back press could not dismiss modal");
        }
        true
    }

    /// Destroy every modal without animation
    pub fn destroy(&self) {
        let entries = self.entries.take();
        self.queued.set(false);
        for entry in entries.into_iter().rev() {
            entry.controller.destroy();
        }
    }

    async fn match_transitions(
        &self,
        animation: &ModalAnimationOptions,
        from: &dyn ViewController,
        to: &dyn ViewController,
    ) -> TransitionSet {
        if !animation.has_element_transitions() {
            return TransitionSet::default();
        }
        self.transitions
            .create(
                from,
                to,
                animation.shared_elements.get().map(Vec::as_slice).unwrap_or_default(),
                animation.element_transitions.get().map(Vec::as_slice).unwrap_or_default(),
            )
            .await
    }
}

fn keeps_previous_visible(resolved: &Options) -> bool {
    matches!(
        resolved.modal_presentation_style,
        Param::Set(ModalPresentationStyle::OverCurrentContext)
            | Param::Inherited(ModalPresentationStyle::OverCurrentContext)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Harness;
    use serde_json::json;

    fn modal(harness: &Harness, id: &str) -> Rc<dyn ViewController> {
        harness.component(id, "Modal")
    }

    fn shown_root(harness: &Harness) -> Rc<dyn ViewController> {
        let root: Rc<dyn ViewController> = harness.component("root", "Root");
        root.on_view_will_appear();
        root.on_view_did_appear();
        harness.sink.clear();
        root
    }

    #[tokio::test]
    async fn test_show_order() {
        let harness = Harness::new();
        let modals = harness.modal_stack();
        let root = shown_root(&harness);

        modals.show_modal(modal(&harness, "m1"), Some(root.clone())).await.unwrap();
        modals.show_modal(modal(&harness, "m2"), Some(root.clone())).await.unwrap();

        assert_eq!(
            harness.sink.appear_events(),
            vec![
                ("Navigation.ComponentWillAppear".to_string(), "m1".to_string()),
                ("Navigation.ComponentDidAppear".to_string(), "m1".to_string()),
                ("Navigation.ComponentDidDisappear".to_string(), "root".to_string()),
                ("Navigation.ComponentWillAppear".to_string(), "m2".to_string()),
                ("Navigation.ComponentDidAppear".to_string(), "m2".to_string()),
                ("Navigation.ComponentDidDisappear".to_string(), "m1".to_string()),
            ]
        );
        assert_eq!(harness.views.record("root").visible, Some(false));
        assert_eq!(modals.peek().map(|m| m.id().to_string()), Ok("m2".to_string()));
    }

    #[tokio::test]
    async fn test_peek_empty() {
        let harness = Harness::new();
        assert_eq!(harness.modal_stack().peek().err(), Some(NavigationError::EmptyStack));
    }

    #[tokio::test]
    async fn test_over_current_context_keeps_previous() {
        let harness = Harness::new();
        let modals = harness.modal_stack();
        let root = shown_root(&harness);
        let overlay = harness.component_with_options(
            "m1",
            "Sheet",
            Options::parse(&json!({ "modalPresentationStyle": "overCurrentContext" })),
        );

        modals.show_modal(overlay, Some(root.clone())).await.unwrap();
        assert!(root.is_visible());
    }

    #[tokio::test]
    async fn test_dismiss_top_reveals_previous() {
        let harness = Harness::new();
        let modals = harness.modal_stack();
        let root = shown_root(&harness);
        modals.show_modal(modal(&harness, "m1"), Some(root.clone())).await.unwrap();
        modals.show_modal(modal(&harness, "m2"), Some(root.clone())).await.unwrap();
        harness.sink.clear();

        let id = modals.dismiss_modal("m2", Some(root.clone())).await.unwrap();

        assert_eq!(id, "m2");
        let events = harness.sink.events();
        assert_eq!(
            events.iter().map(|(name, p)| (name.as_str(), p["componentId"].clone())).collect::<Vec<_>>(),
            vec![
                ("Navigation.ComponentDidDisappear", json!("m2")),
                ("Navigation.ComponentWillAppear", json!("m1")),
                ("Navigation.ComponentDidAppear", json!("m1")),
                ("Navigation.ModalDismissed", json!("m2")),
            ]
        );
        assert_eq!(events[3].1["modalsDismissed"], json!(1));
        assert_eq!(harness.views.destroyed(), vec!["m2".to_string()]);
    }

    #[tokio::test]
    async fn test_dismiss_middle_keeps_others() {
        let harness = Harness::new();
        let modals = harness.modal_stack();
        let root = shown_root(&harness);
        for id in ["m1", "m2", "m3"] {
            modals.show_modal(modal(&harness, id), Some(root.clone())).await.unwrap();
        }
        let animations = harness.animator.requests().len();
        harness.sink.clear();

        modals.dismiss_modal("m2", Some(root.clone())).await.unwrap();

        assert_eq!(modals.ids(), vec!["m1", "m3"]);
        assert_eq!(harness.animator.requests().len(), animations);
        assert!(harness.sink.appear_events().is_empty());
        assert!(modals.find_controller_by_id("m3").is_some_and(|m| m.is_visible()));
        assert!(!modals.find_controller_by_id("m1").is_some_and(|m| m.is_visible()));

        // m3 now reveals m1
        harness.sink.clear();
        modals.dismiss_modal("m3", Some(root.clone())).await.unwrap();
        assert_eq!(harness.sink.appear_events()[1], ("Navigation.ComponentWillAppear".to_string(), "m1".to_string()));
    }

    #[tokio::test]
    async fn test_dismiss_by_descendant_id() {
        let harness = Harness::new();
        let modals = harness.modal_stack();
        let root = shown_root(&harness);
        let inner = harness.component("inner", "Compose") as Rc<dyn ViewController>;
        let stack = harness.stack("modalStack", vec![inner]);
        modals.show_modal(stack, Some(root.clone())).await.unwrap();

        assert_eq!(modals.dismiss_modal("inner", Some(root)).await.unwrap(), "modalStack");
        let dismissed = harness.sink.events().into_iter().find(|(name, _)| name == "Navigation.ModalDismissed");
        assert_eq!(
            dismissed.map(|(_, payload)| payload),
            Some(json!({ "componentId": "modalStack", "componentName": "Compose", "modalsDismissed": 1 }))
        );
    }

    #[tokio::test]
    async fn test_dismiss_unknown_fails() {
        let harness = Harness::new();
        let modals = harness.modal_stack();
        assert_eq!(modals.dismiss_modal("nope", None).await, Err(NavigationError::NotFound("nope".into())));
    }

    #[tokio::test]
    async fn test_dismiss_all() {
        let harness = Harness::new();
        let modals = harness.modal_stack();
        let root = shown_root(&harness);
        for id in ["m1", "m2", "m3"] {
            modals.show_modal(modal(&harness, id), Some(root.clone())).await.unwrap();
        }
        let shown = harness.animator.requests().len();
        let merge = Options::parse(&json!({ "topBar": { "visible": false } }));

        let id = modals.dismiss_all_modals(Some(root.clone()), &merge).await.unwrap();

        assert_eq!(id, "root");
        assert!(modals.is_empty());
        let requests = harness.animator.requests();
        assert_eq!(requests.len(), shown + 1);
        assert_eq!(requests[shown].disappearing.as_deref(), Some("m3"));
        assert!(root.is_visible());
        assert_eq!(harness.views.destroyed(), vec!["m1", "m2", "m3"]);
        let merged = harness.views.record("m3").merged;
        assert_eq!(merged.len(), 1);
        assert!(harness.views.record("m1").merged.is_empty());
        assert!(harness.views.record("m2").merged.is_empty());
    }

    #[tokio::test]
    async fn test_dismiss_all_when_empty() {
        let harness = Harness::new();
        let modals = harness.modal_stack();
        let root = shown_root(&harness);
        assert_eq!(modals.dismiss_all_modals(Some(root), &Options::empty()).await.unwrap(), "root");
        assert_eq!(modals.dismiss_all_modals(None, &Options::empty()).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_show_before_root_is_queued() {
        let harness = Harness::new();
        let modals = harness.modal_stack();

        assert_eq!(modals.show_modal(modal(&harness, "m1"), None).await.unwrap(), "m1");
        assert!(modals.has_queued());
        assert!(harness.sink.appear_events().is_empty());

        let root: Rc<dyn ViewController> = harness.component("root", "Root");
        modals.reveal_queued(&root);
        assert!(!modals.has_queued());
        assert_eq!(harness.sink.appear_events().len(), 2);

        modals.dismiss_modal("m1", Some(root.clone())).await.unwrap();
        assert!(root.is_visible());
    }

    #[tokio::test]
    async fn test_handle_back() {
        let harness = Harness::new();
        let modals = harness.modal_stack();
        let root = shown_root(&harness);
        assert!(!modals.handle_back(Some(root.clone())).await);

        modals.show_modal(modal(&harness, "m1"), Some(root.clone())).await.unwrap();
        assert!(modals.handle_back(Some(root.clone())).await);
        assert!(modals.is_empty());

        let guarded = harness.component_with_options(
            "m2",
            "Modal",
            Options::parse(&json!({ "hardwareBackButton": { "dismissModalOnPress": false } })),
        );
        modals.show_modal(guarded, Some(root.clone())).await.unwrap();
        assert!(modals.handle_back(Some(root.clone())).await);
        assert_eq!(modals.size(), 1);
    }

    #[tokio::test]
    async fn test_modal_back_handler_takes_precedence() {
        let harness = Harness::new();
        let modals = harness.modal_stack();
        let root = shown_root(&harness);
        let inner = vec![
            harness.component("a", "A") as Rc<dyn ViewController>,
            harness.component("b", "B") as Rc<dyn ViewController>,
        ];
        let stack = harness.stack("modalStack", inner);
        modals.show_modal(stack.clone(), Some(root.clone())).await.unwrap();

        assert!(modals.handle_back(Some(root.clone())).await);
        assert_eq!(modals.size(), 1);
        assert_eq!(stack.size(), 1);
    }

    #[tokio::test]
    async fn test_destroy() {
        let harness = Harness::new();
        let modals = harness.modal_stack();
        let root = shown_root(&harness);
        modals.show_modal(modal(&harness, "m1"), Some(root.clone())).await.unwrap();
        modals.show_modal(modal(&harness, "m2"), Some(root.clone())).await.unwrap();

        modals.destroy();
        assert!(modals.is_empty());
        assert_eq!(harness.views.destroyed(), vec!["m2", "m1"]);
    }
}
