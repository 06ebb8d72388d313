//! User interface abstraction.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUi`] for interactive terminal usage
//! - [`MockUi`] for tests
//!
//! Steps talk to the operator only through this trait (e.g. the offline
//! backup's accessibility confirmation), so scenario runs are fully
//! scriptable in tests and in `--assume-yes` automation.

pub mod mock;
pub mod terminal;

pub use mock::MockUi;
pub use terminal::TerminalUi;

use crate::error::Result;

/// Output verbosity for terminal rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Normal,
    Quiet,
    Verbose,
}

/// Trait for user interface interactions.
pub trait UserInterface {
    /// Current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a plain message.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Ask a yes/no question. Non-interactive implementations resolve to
    /// `default` without blocking.
    ///
    /// `key` identifies the question for mocking and logging; it is not
    /// shown to the user.
    fn confirm(&mut self, key: &str, question: &str, default: bool) -> Result<bool>;

    /// Whether a human is attached.
    fn is_interactive(&self) -> bool;
}
