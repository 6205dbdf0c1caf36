//! Navigation error types

use thiserror::Error;

/// Navigation error types
///
/// All of these are reported through the command listener at the command
/// boundary; none of them are fatal to the controller hierarchy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NavigationError {
    /// No controller with this id in the relevant collection
    #[error("Controller not found: {0}")]
    NotFound(String),

    /// Operation needs a non-empty stack
    #[error("Stack is empty")]
    EmptyStack,

    /// Stack cannot pop any further
    #[error("Cannot pop {0}: only the root is left")]
    CannotPop(String),

    /// Operation needs an application root
    #[error("No root has been set")]
    NoRoot,

    /// Controller was already destroyed
    #[error("Controller already destroyed: {0}")]
    Destroyed(String),

    /// Tab index outside of the tab list
    #[error("Invalid tab index {index} (tab count {count})")]
    InvalidTab {
        /// Requested index
        index: usize,
        /// Number of tabs
        count: usize,
    },

    /// The navigator behind a remote handle is gone
    #[error("Navigator is no longer running")]
    Disconnected,
}

/// Result type for navigation operations
pub type Result<T> = std::result::Result<T, NavigationError>;

/// Event delivery error types
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmitError {
    /// No sink is attached to the emitter
    #[error("No event listener attached")]
    NoListener,

    /// The sink refused the event
    #[error("Event delivery failed: {0}")]
    Delivery(String),
}
