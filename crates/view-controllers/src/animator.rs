//! Transition animators
//!
//! Coordinators hand an [`AnimationRequest`] to an [`Animator`] and await it.
//! Lifecycle events for the transition are only emitted once the animation
//! completed, so the await is the suspension point between the visual change
//! and the events.

use async_trait::async_trait;
use nav_options::{AnimationOptions, ModalAnimationOptions, StackAnimationOptions};

use crate::transition::TransitionSet;

/// Navigation operation being animated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// A modal is shown
    ShowModal,
    /// A modal is dismissed
    DismissModal,
    /// A screen is pushed onto a stack
    Push,
    /// Screens are popped off a stack
    Pop,
    /// A stack's children are replaced
    SetStackRoot,
    /// The application root is replaced
    SetRoot,
}

/// Resolved animation options of a transition
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationSpec {
    /// Modal show or dismiss
    Modal(ModalAnimationOptions),
    /// Stack push, pop or setStackRoot
    Stack(StackAnimationOptions),
    /// Single view animation (setRoot)
    View(AnimationOptions),
}

/// One animated transition
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRequest {
    /// Operation being animated
    pub kind: TransitionKind,
    /// Id of the controller becoming visible
    pub appearing: Option<String>,
    /// Id of the controller going away
    pub disappearing: Option<String>,
    /// Animation options
    pub animation: AnimationSpec,
    /// Matched element and shared element transitions
    pub transitions: TransitionSet,
}

impl AnimationRequest {
    /// Create a request without element transitions
    pub fn new(kind: TransitionKind, animation: AnimationSpec) -> Self {
        Self { kind, appearing: None, disappearing: None, animation, transitions: TransitionSet::default() }
    }

    /// Set the appearing controller
    pub fn appearing(mut self, id: impl Into<String>) -> Self {
        self.appearing = Some(id.into());
        self
    }

    /// Set the disappearing controller
    pub fn disappearing(mut self, id: impl Into<String>) -> Self {
        self.disappearing = Some(id.into());
        self
    }

    /// Attach matched element transitions
    pub fn transitions(mut self, transitions: TransitionSet) -> Self {
        self.transitions = transitions;
        self
    }
}

/// Runs transition animations on the UI task
#[async_trait(?Send)]
pub trait Animator {
    /// Run the animation; resolves when it completed
    async fn run(&self, request: AnimationRequest);
}

/// Animator that completes immediately
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantAnimator;

#[async_trait(?Send)]
impl Animator for InstantAnimator {
    async fn run(&self, request: AnimationRequest) {
        tracing::debug!(kind = ?request.kind, "Skipping animation");
    }
}
