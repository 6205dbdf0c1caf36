//! Controller lifecycle state machine
//!
//! ```text
//! Created -> ViewCreated -> WillAppear -> DidAppear -> DidDisappear
//!                               ^                           |
//!                               +---------------------------+
//! any -> Destroyed (terminal)
//! ```
//!
//! Only an appeared controller can disappear; a controller still in
//! `WillAppear` ignores disappearance.
//!
//! Each transition method returns whether the transition happened, so callers
//! emit events only for real transitions.

use std::cell::Cell;

/// Lifecycle state of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Constructed, no view yet
    Created,
    /// View created, never shown
    ViewCreated,
    /// About to appear
    WillAppear,
    /// Visible
    DidAppear,
    /// Hidden after having been visible
    DidDisappear,
    /// Torn down
    Destroyed,
}

/// Lifecycle tracker owned by every controller
#[derive(Debug)]
pub struct Lifecycle {
    state: Cell<LifecycleState>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self { state: Cell::new(LifecycleState::Created) }
    }
}

impl Lifecycle {
    /// Current state
    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    /// Whether the controller is appearing or appeared
    pub fn is_visible(&self) -> bool {
        matches!(self.state(), LifecycleState::WillAppear | LifecycleState::DidAppear)
    }

    /// Whether the controller was destroyed
    pub fn is_destroyed(&self) -> bool {
        self.state() == LifecycleState::Destroyed
    }

    pub(crate) fn view_created(&self) -> bool {
        self.transition(|state| (state == LifecycleState::Created).then_some(LifecycleState::ViewCreated))
    }

    pub(crate) fn will_appear(&self) -> bool {
        self.transition(|state| match state {
            LifecycleState::WillAppear | LifecycleState::DidAppear | LifecycleState::Destroyed => None,
            _ => Some(LifecycleState::WillAppear),
        })
    }

    pub(crate) fn did_appear(&self) -> bool {
        self.transition(|state| match state {
            LifecycleState::DidAppear | LifecycleState::Destroyed => None,
            _ => Some(LifecycleState::DidAppear),
        })
    }

    pub(crate) fn disappear(&self) -> bool {
        self.transition(|state| (state == LifecycleState::DidAppear).then_some(LifecycleState::DidDisappear))
    }

    pub(crate) fn destroy(&self) -> bool {
        self.transition(|state| (state != LifecycleState::Destroyed).then_some(LifecycleState::Destroyed))
    }

    fn transition(&self, next: impl FnOnce(LifecycleState) -> Option<LifecycleState>) -> bool {
        match next(self.state()) {
            Some(state) => {
                self.state.set(state);
                true
            }
            None => false,
        }
    }
}
