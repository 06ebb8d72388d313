//! List command implementation.

use console::style;

use crate::cli::args::ListArgs;
use crate::definitions::{scenarios, standalone_procedures};
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(args: ListArgs) -> Self {
        Self { args }
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.message(&format!("{}", style("Scenarios:").bold()));
        for scenario in scenarios() {
            let metadata = scenario.metadata();
            if let Some(tag) = &self.args.tag {
                if !metadata.tags.contains(&tag.as_str()) {
                    continue;
                }
            }
            ui.message(&format!(
                "  {} [{}]",
                style(metadata.name).cyan(),
                metadata.strategy
            ));
            ui.message(&format!("      {}", style(metadata.description).dim()));
        }

        if self.args.tag.is_none() {
            ui.message("");
            ui.message(&format!("{}", style("Standalone procedures:").bold()));
            for def in standalone_procedures() {
                ui.message(&format!("  {}", style(def.id).cyan()));
            }
        }

        Ok(CommandResult::success())
    }
}
