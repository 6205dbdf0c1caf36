//! Command completion callbacks

/// Completion callbacks of a navigation command
///
/// Exactly one of the two is called per command.
pub trait CommandListener {
    /// The command succeeded; `child_id` is the id the command resolved with
    fn on_success(&self, child_id: &str);

    /// The command failed
    fn on_error(&self, message: &str);
}

/// Listener that ignores both outcomes
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandListenerAdapter;

impl CommandListener for CommandListenerAdapter {
    fn on_success(&self, _child_id: &str) {}

    fn on_error(&self, _message: &str) {}
}
