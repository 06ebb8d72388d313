//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};

/// Upkeep - maintenance scenario runner.
#[derive(Debug, Parser)]
#[command(name = "upkeep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Answer every confirmation with its default
    #[arg(short = 'y', long, global = true)]
    pub assume_yes: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a maintenance scenario
    Run(RunArgs),

    /// List available scenarios and standalone procedures
    List(ListArgs),

    /// Show a scenario's parameters and metadata
    Describe(DescribeArgs),

    /// Run a single procedure outside any scenario
    RunProcedure(RunProcedureArgs),

    /// Generate the inventory report
    Report(ReportArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Scenario name
    pub scenario: String,

    /// Scenario parameter as name=value (repeatable)
    #[arg(short, long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// Print the execution report as JSON
    #[arg(long)]
    pub json: bool,

    /// Skip the rescue scenario when the run fails
    #[arg(long)]
    pub no_rescue: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Only scenarios carrying this tag
    #[arg(long)]
    pub tag: Option<String>,
}

/// Arguments for the `describe` command.
#[derive(Debug, Clone, clap::Args)]
pub struct DescribeArgs {
    /// Scenario name
    pub scenario: String,
}

/// Arguments for the `run-procedure` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunProcedureArgs {
    /// Procedure id, e.g. kb.article
    pub id: String,

    /// Procedure argument as name=value (repeatable)
    #[arg(short, long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,
}

/// Arguments for the `report` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ReportArgs {
    /// Database to query
    #[arg(long, default_value = "foreman")]
    pub database: String,
}
