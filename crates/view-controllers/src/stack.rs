//! Stack container
//!
//! Children are ordered bottom to top; only the top child is visible while
//! the stack is. Stack operations are serialized: an operation issued while
//! another one is animating waits for it to finish.
//!
//! Lifecycle order of every visible transition is: appearing will-appear,
//! appearing did-appear, then disappearing did-disappear.

use async_trait::async_trait;
use nav_options::{Options, StackAnimationOptions};
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::Mutex;

use crate::animator::{AnimationRequest, AnimationSpec, Animator, TransitionKind};
use crate::context::NavigationContext;
use crate::controller::{adopt, ComponentType, ControllerBase, ViewController};
use crate::errors::{NavigationError, Result};
use crate::transition::{TransitionSet, TransitionSetCreator};

/// Stack of screens with a shared top bar
pub struct StackController {
    base: ControllerBase,
    children: RefCell<Vec<Rc<dyn ViewController>>>,
    animator: Rc<dyn Animator>,
    transitions: TransitionSetCreator,
    lock: Mutex<()>,
}

impl StackController {
    /// Create a stack; the last child is the top
    pub fn new(
        id: impl Into<String>,
        children: Vec<Rc<dyn ViewController>>,
        options: Options,
        animator: Rc<dyn Animator>,
        context: Rc<NavigationContext>,
    ) -> Rc<Self> {
        let id = id.into();
        let stack = Rc::new_cyclic(|this: &std::rc::Weak<Self>| {
            let this: std::rc::Weak<dyn ViewController> = this.clone();
            Self {
                base: ControllerBase::new(id, this, options, context),
                children: RefCell::new(Vec::new()),
                animator,
                transitions: TransitionSetCreator::default(),
                lock: Mutex::new(()),
            }
        });
        let parent: Rc<dyn ViewController> = stack.clone();
        adopt(&parent, &children);
        *stack.children.borrow_mut() = children;
        stack
    }

    /// Top child
    pub fn peek(&self) -> Option<Rc<dyn ViewController>> {
        self.children.borrow().last().cloned()
    }

    /// Number of children
    pub fn size(&self) -> usize {
        self.children.borrow().len()
    }

    /// Whether the stack has no children
    pub fn is_empty(&self) -> bool {
        self.children.borrow().is_empty()
    }

    /// Ids of the children, bottom first
    pub fn child_ids(&self) -> Vec<String> {
        self.children.borrow().iter().map(|child| child.id().to_string()).collect()
    }

    /// Push a child on top; resolves with the pushed id
    pub async fn push(&self, child: Rc<dyn ViewController>) -> Result<String> {
        let _guard = self.lock.lock().await;
        let this = self.this()?;
        let previous = self.peek();
        child.base().set_parent(&this);
        self.children.borrow_mut().push(child.clone());

        let animation = child.resolve_current_options().animations.push;
        self.transition(TransitionKind::Push, &child, previous.as_ref(), animation).await;
        Ok(child.id().to_string())
    }

    /// Pop the top child; resolves with the popped id
    pub async fn pop(&self, merge_options: &Options) -> Result<String> {
        let _guard = self.lock.lock().await;
        let (disappearing, appearing) = {
            let mut children = self.children.borrow_mut();
            match children.len() {
                0 => return Err(NavigationError::EmptyStack),
                1 => return Err(NavigationError::CannotPop(children[0].id().to_string())),
                _ => {}
            }
            let disappearing = children.pop().ok_or(NavigationError::EmptyStack)?;
            let appearing = children.last().cloned().ok_or(NavigationError::EmptyStack)?;
            (disappearing, appearing)
        };

        disappearing.merge_options(merge_options);
        let animation = disappearing.resolve_current_options().animations.pop;
        self.transition(TransitionKind::Pop, &appearing, Some(&disappearing), animation).await;
        self.release(vec![disappearing.clone()]);
        Ok(disappearing.id().to_string())
    }

    /// Pop everything above `id`; resolves with `id`
    pub async fn pop_to(&self, id: &str, merge_options: &Options) -> Result<String> {
        let _guard = self.lock.lock().await;
        let (appearing, popped) = {
            let mut children = self.children.borrow_mut();
            let index = children
                .iter()
                .position(|child| child.id() == id)
                .ok_or_else(|| NavigationError::NotFound(id.to_string()))?;
            let popped: Vec<_> = children.drain(index + 1..).collect();
            (children[index].clone(), popped)
        };
        let Some(top) = popped.last().cloned() else {
            return Ok(appearing.id().to_string());
        };

        top.merge_options(merge_options);
        let animation = top.resolve_current_options().animations.pop;
        self.transition(TransitionKind::Pop, &appearing, Some(&top), animation).await;
        self.release(popped.into_iter().rev().collect());
        Ok(appearing.id().to_string())
    }

    /// Pop everything above the root child; resolves with the root id
    pub async fn pop_to_root(&self, merge_options: &Options) -> Result<String> {
        let root_id = self
            .children
            .borrow()
            .first()
            .map(|root| root.id().to_string())
            .ok_or(NavigationError::EmptyStack)?;
        self.pop_to(&root_id, merge_options).await
    }

    /// Replace all children; resolves with the new top id
    pub async fn set_stack_root(&self, children: Vec<Rc<dyn ViewController>>) -> Result<String> {
        let appearing = children.last().cloned().ok_or(NavigationError::EmptyStack)?;
        let _guard = self.lock.lock().await;
        let this = self.this()?;
        adopt(&this, &children);
        let previous = self.children.replace(children);

        let disappearing = previous.last().filter(|old| old.id() != appearing.id()).cloned();
        let animation = appearing.resolve_current_options().animations.set_stack_root;
        self.transition(TransitionKind::SetStackRoot, &appearing, disappearing.as_ref(), animation).await;

        let kept = self.child_ids();
        let removed = previous.into_iter().rev().filter(|old| !kept.iter().any(|id| id == old.id()));
        for old in removed {
            old.destroy();
            old.base().clear_parent();
        }
        Ok(appearing.id().to_string())
    }

    fn this(&self) -> Result<Rc<dyn ViewController>> {
        if self.base.lifecycle().is_destroyed() {
            return Err(NavigationError::Destroyed(self.id().to_string()));
        }
        self.base.this().ok_or_else(|| NavigationError::Destroyed(self.id().to_string()))
    }

    async fn transition(
        &self,
        kind: TransitionKind,
        appearing: &Rc<dyn ViewController>,
        disappearing: Option<&Rc<dyn ViewController>>,
        animation: StackAnimationOptions,
    ) {
        if !self.is_visible() {
            return;
        }
        if let Some(disappearing) = disappearing {
            if animation.is_enabled() {
                let transitions = if animation.has_element_transitions() {
                    self.transitions
                        .create(
                            disappearing.as_ref(),
                            appearing.as_ref(),
                            animation.shared_elements.get().map(Vec::as_slice).unwrap_or_default(),
                            animation.element_transitions.get().map(Vec::as_slice).unwrap_or_default(),
                        )
                        .await
                } else {
                    TransitionSet::default()
                };
                let request = AnimationRequest::new(kind, AnimationSpec::Stack(animation))
                    .appearing(appearing.id())
                    .disappearing(disappearing.id())
                    .transitions(transitions);
                self.animator.run(request).await;
            }
        }
        appearing.on_view_will_appear();
        appearing.on_view_did_appear();
        if let Some(disappearing) = disappearing {
            disappearing.on_view_disappear();
        }
    }

    fn release(&self, popped: Vec<Rc<dyn ViewController>>) {
        for child in popped {
            child.destroy();
            child.base().clear_parent();
            self.base.context().emitter().screen_popped(child.id());
        }
    }
}

#[async_trait(?Send)]
impl ViewController for StackController {
    fn base(&self) -> &ControllerBase {
        &self.base
    }

    fn component_type(&self) -> ComponentType {
        ComponentType::Stack
    }

    fn can_send_lifecycle_events(&self) -> bool {
        false
    }

    fn current_component_name(&self) -> Option<String> {
        self.peek().and_then(|top| top.current_component_name())
    }

    fn children(&self) -> Vec<Rc<dyn ViewController>> {
        self.children.borrow().clone()
    }

    fn as_stack(&self) -> Option<&StackController> {
        Some(self)
    }

    fn will_appear_hook(&self) {
        if let Some(top) = self.peek() {
            top.on_view_will_appear();
        }
    }

    fn did_appear_hook(&self) {
        if let Some(top) = self.peek() {
            top.on_view_did_appear();
        }
    }

    fn disappear_hook(&self) {
        if let Some(top) = self.peek() {
            top.on_view_disappear();
        }
    }

    fn top_inset_for_child(&self, child_id: &str) -> f64 {
        let child = self.children.borrow().iter().find(|child| child.id() == child_id).cloned();
        let top_bar = match child {
            Some(child) => {
                let top_bar = child.resolve_current_options().top_bar;
                if top_bar.is_hidden_or_draw_behind() {
                    0.0
                } else {
                    top_bar
                        .height
                        .get()
                        .map(|height| f64::from(*height))
                        .unwrap_or(self.base.context().config().top_bar_height)
                }
            }
            None => 0.0,
        };
        let above = self.base.parent().map(|parent| parent.top_inset_for_child(self.id())).unwrap_or(0.0);
        top_bar + above
    }

    async fn handle_back(&self) -> bool {
        let Some(top) = self.peek() else {
            return false;
        };
        if top.handle_back().await {
            return true;
        }
        if self.size() < 2 || top.resolve_current_options().hardware_back_button.pop_stack_on_press.is_false() {
            return false;
        }
        match self.pop(&Options::empty()).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(stack = %self.id(), error = %e, "Back press could not pop");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Harness;
    use serde_json::json;

    fn shown_stack(harness: &Harness, ids: &[&str]) -> Rc<StackController> {
        let children = ids.iter().map(|id| harness.component(id, "Screen") as Rc<dyn ViewController>).collect();
        let stack = harness.stack("stack", children);
        stack.on_view_will_appear();
        stack.on_view_did_appear();
        harness.sink.clear();
        stack
    }

    #[tokio::test]
    async fn test_push_event_order() {
        let harness = Harness::new();
        let stack = shown_stack(&harness, &["a"]);

        let id = stack.push(harness.component("b", "Screen")).await.unwrap();

        assert_eq!(id, "b");
        assert_eq!(stack.child_ids(), vec!["a", "b"]);
        assert_eq!(
            harness.sink.appear_events(),
            vec![
                ("Navigation.ComponentWillAppear".to_string(), "b".to_string()),
                ("Navigation.ComponentDidAppear".to_string(), "b".to_string()),
                ("Navigation.ComponentDidDisappear".to_string(), "a".to_string()),
            ]
        );
        assert_eq!(harness.animator.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_push_to_hidden_stack_is_silent() {
        let harness = Harness::new();
        let a = harness.component("a", "Screen") as Rc<dyn ViewController>;
        let stack = harness.stack("stack", vec![a]);

        stack.push(harness.component("b", "Screen")).await.unwrap();
        assert!(harness.sink.appear_events().is_empty());
        assert!(harness.animator.requests().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_push_animation_is_skipped() {
        let harness = Harness::new();
        let stack = shown_stack(&harness, &["a"]);
        let child = harness.component_with_options(
            "b",
            "Screen",
            Options::parse(&json!({ "animations": { "push": { "enabled": false } } })),
        );
        stack.push(child).await.unwrap();
        assert!(harness.animator.requests().is_empty());
    }

    #[tokio::test]
    async fn test_pop_destroys_and_reports() {
        let harness = Harness::new();
        let stack = shown_stack(&harness, &["a", "b"]);

        let popped = stack.pop(&Options::empty()).await.unwrap();

        assert_eq!(popped, "b");
        assert_eq!(stack.size(), 1);
        assert_eq!(harness.views.destroyed(), vec!["b".to_string()]);
        let names: Vec<_> = harness.sink.events().into_iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![
                "Navigation.ComponentWillAppear",
                "Navigation.ComponentDidAppear",
                "Navigation.ComponentDidDisappear",
                "Navigation.ScreenPopped",
            ]
        );
    }

    #[tokio::test]
    async fn test_pop_root_fails() {
        let harness = Harness::new();
        let stack = shown_stack(&harness, &["a"]);
        assert_eq!(stack.pop(&Options::empty()).await, Err(NavigationError::CannotPop("a".into())));
    }

    #[tokio::test]
    async fn test_pop_to_and_pop_to_root() {
        let harness = Harness::new();
        let stack = shown_stack(&harness, &["a", "b", "c", "d"]);

        assert_eq!(stack.pop_to("b", &Options::empty()).await.unwrap(), "b");
        assert_eq!(stack.child_ids(), vec!["a", "b"]);
        assert_eq!(harness.views.destroyed(), vec!["d".to_string()]);
        assert_eq!(harness.animator.requests().len(), 1);

        assert_eq!(
            stack.pop_to("missing", &Options::empty()).await,
            Err(NavigationError::NotFound("missing".into()))
        );
        assert_eq!(stack.pop_to_root(&Options::empty()).await.unwrap(), "a");
        assert_eq!(stack.pop_to_root(&Options::empty()).await.unwrap(), "a");
        assert_eq!(stack.size(), 1);
    }

    #[tokio::test]
    async fn test_set_stack_root() {
        let harness = Harness::new();
        let stack = shown_stack(&harness, &["a", "b"]);

        assert_eq!(stack.set_stack_root(Vec::new()).await, Err(NavigationError::EmptyStack));

        let id = stack
            .set_stack_root(vec![
                harness.component("x", "Screen") as Rc<dyn ViewController>,
                harness.component("y", "Screen") as Rc<dyn ViewController>,
            ])
            .await
            .unwrap();

        assert_eq!(id, "y");
        assert_eq!(stack.child_ids(), vec!["x", "y"]);
        assert!(harness.context.children().contains("y"));
        assert!(!harness.context.children().contains("b"));
        assert_eq!(harness.views.destroyed(), vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn test_shared_elements_matched_on_push() {
        let harness = Harness::new();
        harness.views.add_elements("a", &["avatar"]);
        harness.views.add_elements("b", &["hero"]);
        let stack = shown_stack(&harness, &["a"]);
        let child = harness.component_with_options(
            "b",
            "Screen",
            Options::parse(&json!({
                "animations": { "push": {
                    "sharedElementTransitions": [{ "fromId": "avatar", "toId": "hero" }]
                } }
            })),
        );

        stack.push(child).await.unwrap();

        let requests = harness.animator.requests();
        assert_eq!(requests[0].transitions.shared_elements.len(), 1);
        assert_eq!(requests[0].disappearing.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_back_pops_unless_disabled() {
        let harness = Harness::new();
        let stack = shown_stack(&harness, &["a", "b"]);
        assert!(stack.handle_back().await);
        assert_eq!(stack.size(), 1);
        assert!(!stack.handle_back().await);

        let guarded = harness.component_with_options(
            "c",
            "Screen",
            Options::parse(&json!({ "hardwareBackButton": { "popStackOnPress": false } })),
        );
        stack.push(guarded).await.unwrap();
        assert!(!stack.handle_back().await);
        assert_eq!(stack.size(), 2);
    }

    #[tokio::test]
    async fn test_top_inset_respects_top_bar_options() {
        let harness = Harness::new();
        let a = harness.component_with_options("a", "Screen", Options::parse(&json!({ "topBar": { "height": 40 } })));
        let hidden = Options::parse(&json!({ "topBar": { "visible": false } }));
        let b = harness.component_with_options("b", "Screen", hidden);
        let stack = harness.stack("stack", vec![a as Rc<dyn ViewController>, b as Rc<dyn ViewController>]);

        assert_eq!(stack.top_inset_for_child("a"), 40.0);
        assert_eq!(stack.top_inset_for_child("b"), 0.0);
        assert_eq!(stack.top_inset_for_child("missing"), 0.0);
    }
}
