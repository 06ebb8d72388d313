//! Report command implementation.

use anyhow::Context as _;

use crate::cli::args::ReportArgs;
use crate::error::Result;
use crate::report::{InventoryReport, PsqlSource, Report};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The report command implementation.
pub struct ReportCommand {
    args: ReportArgs,
}

impl ReportCommand {
    /// Create a new report command.
    pub fn new(args: ReportArgs) -> Self {
        Self { args }
    }
}

impl Command for ReportCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let source = PsqlSource::new(self.args.database.clone());
        let report = InventoryReport;

        ui.message(&format!("Generating {} report", report.name()));
        let data = report.run(&source)?;
        let json = serde_json::to_string_pretty(&data)
            .context("serializing report data")
            .map_err(crate::error::UpkeepError::Other)?;
        println!("{}", json);

        Ok(CommandResult::success())
    }
}
