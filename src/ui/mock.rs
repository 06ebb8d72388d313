//! Mock UI implementation for testing.
//!
//! `MockUi` implements the `UserInterface` trait and captures all
//! interactions for later assertion. Confirmations can be pre-configured
//! per key, with a fallback default response.

use std::collections::HashMap;

use crate::error::Result;

use super::{OutputMode, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUi {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    confirm_responses: HashMap<String, bool>,
    confirms_asked: Vec<String>,
    default_confirm: Option<bool>,
}

impl MockUi {
    /// Create a new MockUi with Normal output mode.
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            interactive: true,
            ..Default::default()
        }
    }

    /// Set the response for a confirmation key.
    pub fn set_confirm_response(&mut self, key: &str, response: bool) {
        self.confirm_responses.insert(key.to_string(), response);
    }

    /// Set a fallback response for any confirmation key not explicitly
    /// configured. Without one, unconfigured confirms resolve to the
    /// prompt's own default.
    pub fn set_default_confirm(&mut self, response: bool) {
        self.default_confirm = Some(response);
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Captured plain messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Captured warnings.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Captured errors.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Keys of confirmations that were asked, in order.
    pub fn confirms_asked(&self) -> &[String] {
        &self.confirms_asked
    }
}

impl UserInterface for MockUi {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn confirm(&mut self, key: &str, _question: &str, default: bool) -> Result<bool> {
        self.confirms_asked.push(key.to_string());
        Ok(self
            .confirm_responses
            .get(key)
            .copied()
            .or(self.default_confirm)
            .unwrap_or(default))
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}
