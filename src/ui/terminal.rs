//! Terminal UI implementation.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use crate::error::{Result, UpkeepError};

use super::{OutputMode, UserInterface};

/// UI backed by the real terminal.
///
/// When stdin is not a TTY (CI, piped invocation) or `--assume-yes` is in
/// effect, confirmations resolve to their default without prompting.
pub struct TerminalUi {
    term: Term,
    mode: OutputMode,
    interactive: bool,
    assume_default: bool,
}

impl TerminalUi {
    /// Create a terminal UI.
    pub fn new(mode: OutputMode, assume_default: bool) -> Self {
        let term = Term::stderr();
        let interactive = term.is_term() && !assume_default;
        Self {
            term,
            mode,
            interactive,
            assume_default,
        }
    }

    fn theme() -> ColorfulTheme {
        ColorfulTheme {
            prompt_prefix: style("".to_string()),
            ..ColorfulTheme::default()
        }
    }

    fn write(&self, msg: &str) {
        if self.mode != OutputMode::Quiet {
            let _ = self.term.write_line(msg);
        }
    }
}

impl UserInterface for TerminalUi {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.write(msg);
    }

    fn success(&mut self, msg: &str) {
        self.write(&format!("{} {}", style("✓").green(), msg));
    }

    fn warning(&mut self, msg: &str) {
        self.write(&format!("{} {}", style("!").yellow(), msg));
    }

    fn error(&mut self, msg: &str) {
        // Errors are shown even in quiet mode.
        let _ = self
            .term
            .write_line(&format!("{} {}", style("✗").red(), msg));
    }

    fn confirm(&mut self, _key: &str, question: &str, default: bool) -> Result<bool> {
        if !self.interactive {
            if !self.assume_default && self.mode != OutputMode::Quiet {
                self.write(&format!(
                    "{} (non-interactive, assuming {})",
                    question,
                    if default { "yes" } else { "no" }
                ));
            }
            return Ok(default);
        }

        Confirm::with_theme(&Self::theme())
            .with_prompt(question)
            .default(default)
            .interact_on(&self.term)
            .map_err(|e| UpkeepError::Io(e.into()))
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}
