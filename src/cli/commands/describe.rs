//! Describe command implementation.

use console::style;

use crate::cli::args::DescribeArgs;
use crate::definitions::find_scenario;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The describe command implementation.
pub struct DescribeCommand {
    args: DescribeArgs,
}

impl DescribeCommand {
    /// Create a new describe command.
    pub fn new(args: DescribeArgs) -> Self {
        Self { args }
    }
}

impl Command for DescribeCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let scenario = find_scenario(&self.args.scenario)?;
        let metadata = scenario.metadata();

        ui.message(&format!("{}", style(metadata.name).bold()));
        ui.message(&format!("  {}", metadata.description));
        ui.message(&format!("  strategy: {}", metadata.strategy));
        ui.message(&format!("  tags: {}", metadata.tags.join(", ")));
        if metadata.manual_only {
            ui.message("  manual invocation only");
        }

        if !metadata.params.is_empty() {
            ui.message("");
            ui.message(&format!("{}", style("Parameters:").bold()));
            for param in &metadata.params {
                let mut traits = Vec::new();
                if param.required {
                    traits.push("required");
                }
                if param.array {
                    traits.push("list");
                }
                let suffix = if traits.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", traits.join(", "))
                };
                ui.message(&format!(
                    "  {}{}",
                    style(param.name).cyan(),
                    style(suffix).dim()
                ));
                ui.message(&format!("      {}", style(param.description).dim()));
            }
        }

        Ok(CommandResult::success())
    }
}
