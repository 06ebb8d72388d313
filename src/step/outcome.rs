//! Per-step execution outcomes.

use serde::Serialize;

/// Outcome of running a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    /// The step did its work.
    Success,
    /// The step finished but something deserves operator attention.
    Warning(String),
    /// The step failed; the detail is surfaced in the run report.
    Failure(String),
    /// The step had nothing to do for this invocation (filtered out,
    /// feature absent, not an incremental run).
    Skipped(String),
}

impl Outcome {
    /// Whether this outcome counts against the scenario's overall result.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// Short lowercase label for display and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Warning(_) => "warning",
            Outcome::Failure(_) => "failure",
            Outcome::Skipped(_) => "skipped",
        }
    }

    /// Display character for run summaries.
    pub fn display_char(&self) -> char {
        match self {
            Outcome::Success => '✓',
            Outcome::Warning(_) => '!',
            Outcome::Failure(_) => '✗',
            Outcome::Skipped(_) => '⊘',
        }
    }

    /// Outcome detail, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Outcome::Success => None,
            Outcome::Warning(d) | Outcome::Failure(d) | Outcome::Skipped(d) => Some(d),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.detail() {
            Some(detail) => write!(f, "{} ({})", self.label(), detail),
            None => write!(f, "{}", self.label()),
        }
    }
}
