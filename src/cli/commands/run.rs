//! Run command implementation.
//!
//! `upkeep run <scenario>` composes the scenario against the detected
//! system capabilities and executes it, dispatching the paired rescue
//! scenario when the run fails.

use tracing::info;

use crate::cli::args::RunArgs;
use crate::definitions::capabilities::detect_system;
use crate::definitions::find_scenario;
use crate::error::Result;
use crate::executor::{ExecutionReport, RescueDispatcher};
use crate::runtime::{IdleTaskQueue, Runtime, SystemdServiceManager};
use crate::scenario::{compose, Trigger};
use crate::step::Outcome;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::parse_param_values;

/// Managed service units, in stop order. Start order is the reverse.
pub(crate) const MANAGED_SERVICES: &[&str] = &[
    "httpd",
    "foreman",
    "dynflow-sidekiq@orchestrator",
    "pulpcore-api",
    "pulpcore-content",
    "redis",
    "postgresql",
];

/// The run command implementation.
pub struct RunCommand {
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(args: RunArgs) -> Self {
        Self { args }
    }

    fn print_report(&self, ui: &mut dyn UserInterface, report: &ExecutionReport) {
        for step in &report.steps {
            let line = step.summary_line();
            match &step.outcome {
                Outcome::Failure(_) => ui.error(&line),
                Outcome::Warning(_) => ui.warning(&line),
                _ => ui.message(&line),
            }
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let values = parse_param_values(&self.args.params)?;
        let scenario = find_scenario(&self.args.scenario)?;
        let capabilities = detect_system();

        let mut composed = compose(scenario.as_ref(), &values, &capabilities, Trigger::Manual)?;
        info!(
            "composed scenario '{}' with {} step(s)",
            composed.name,
            composed.steps.len()
        );

        let services =
            SystemdServiceManager::new(MANAGED_SERVICES.iter().map(|s| s.to_string()).collect());
        let tasks = IdleTaskQueue::new();

        ui.message(&format!("Running {}", composed.description));
        let report = {
            let mut rt = Runtime::new(ui, &services, &tasks);
            composed.execute(&mut rt)
        };
        self.print_report(ui, &report);

        if self.args.json {
            let json = serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?;
            println!("{}", json);
        }

        if report.success() {
            ui.success(&format!("Scenario '{}' finished successfully", report.scenario));
            return Ok(CommandResult::success());
        }

        ui.error(&format!("Scenario '{}' failed", report.scenario));

        if !self.args.no_rescue {
            if let Some(rescue) = scenario.rescue() {
                let wanted = ui.confirm(
                    "run-rescue",
                    &format!(
                        "Run the '{}' scenario to clean up?",
                        rescue.metadata().name
                    ),
                    true,
                )?;
                if wanted {
                    let rescue_report = {
                        let mut rt = Runtime::new(ui, &services, &tasks);
                        RescueDispatcher::new(&capabilities).dispatch(
                            rescue.as_ref(),
                            &composed.context,
                            &mut rt,
                        )?
                    };
                    self.print_report(ui, &rescue_report);
                }
            }
        }

        Ok(CommandResult::failure(1))
    }
}
