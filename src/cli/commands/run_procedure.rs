//! Run-procedure command implementation.
//!
//! `upkeep run-procedure <id>` constructs and runs a single step type
//! outside any scenario, with its arguments supplied directly on the
//! command line.

use crate::cli::args::RunProcedureArgs;
use crate::context::{Context, ResolvedArgs};
use crate::definitions::find_procedure;
use crate::error::{Result, UpkeepError};
use crate::runtime::{IdleTaskQueue, Runtime, SystemdServiceManager};
use crate::step::Outcome;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::parse_param_values;
use super::run::MANAGED_SERVICES;

/// The run-procedure command implementation.
pub struct RunProcedureCommand {
    args: RunProcedureArgs,
}

impl RunProcedureCommand {
    /// Create a new run-procedure command.
    pub fn new(args: RunProcedureArgs) -> Self {
        Self { args }
    }
}

impl Command for RunProcedureCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let def = find_procedure(&self.args.id)?;

        let values = parse_param_values(&self.args.params)?;
        let mut args = ResolvedArgs::default();
        for (name, value) in &values {
            args.insert(name, value.clone());
        }
        for key in def.required_keys {
            if !args.contains(key) {
                return Err(UpkeepError::validation(
                    def.id,
                    format!("missing required key '{}'", key),
                ));
            }
        }

        let step = (def.build)(&args)?;
        let services =
            SystemdServiceManager::new(MANAGED_SERVICES.iter().map(|s| s.to_string()).collect());
        let tasks = IdleTaskQueue::new();
        let mut ctx = Context::new();

        let outcome = {
            let mut rt = Runtime::new(ui, &services, &tasks);
            match step.run(&mut rt, &mut ctx) {
                Ok(outcome) => outcome,
                Err(e) => Outcome::Failure(e.to_string()),
            }
        };

        let line = format!("{} {}", outcome.display_char(), step.info().label);
        if outcome.is_failure() {
            ui.error(&line);
            if let Some(detail) = outcome.detail() {
                ui.error(detail);
            }
            Ok(CommandResult::failure(1))
        } else {
            ui.success(&line);
            Ok(CommandResult::success())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUi;

    #[test]
    fn unknown_procedure_is_an_error() {
        let mut ui = MockUi::new();
        let err = RunProcedureCommand::new(RunProcedureArgs {
            id: "no.such".to_string(),
            params: Vec::new(),
        })
        .execute(&mut ui)
        .unwrap_err();

        assert!(matches!(err, UpkeepError::UnknownProcedure { .. }));
    }

    #[test]
    fn missing_required_key_fails_before_running() {
        let mut ui = MockUi::new();
        let err = RunProcedureCommand::new(RunProcedureArgs {
            id: "backup.clean".to_string(),
            params: Vec::new(),
        })
        .execute(&mut ui)
        .unwrap_err();

        assert!(matches!(err, UpkeepError::Validation { .. }));
    }
}
