//! Processor error types

use thiserror::Error;

/// Options processor error types
///
/// Processing a payload never fails; errors only come from misuse of the
/// processor registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProcessorError {
    /// Option path is empty or has an empty segment
    #[error("Invalid option path: {0:?}")]
    InvalidPath(String),
}

/// Result type for processor operations
pub type Result<T> = std::result::Result<T, ProcessorError>;
