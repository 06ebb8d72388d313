//! Maintenance scenario orchestration.
//!
//! Upkeep composes parameterized maintenance workflows (scenarios) out of
//! reusable steps, propagates scenario parameters into step constructors
//! through a declared context mapping, executes the composed sequence under
//! a fail-fast or fail-slow strategy, and dispatches a paired rescue
//! scenario when a run fails.
//!
//! # Architecture
//!
//! - [`context`] - shared parameter context, values, and the mapping table
//! - [`step`] - check/procedure step types and their static definitions
//! - [`scenario`] - scenario declarations, parameter binding, composition
//! - [`executor`] - ordered execution under a run strategy, rescue dispatch
//! - [`capability`] - detected system capabilities for conditional branches
//! - [`runtime`] - service, task queue, and UI collaborators steps run with
//! - [`definitions`] - the concrete checks, procedures, and scenarios
//! - [`report`] - read-only reports generated outside the step machinery
//! - [`cli`] - the `upkeep` binary's argument parsing and commands

pub mod capability;
pub mod cli;
pub mod context;
pub mod definitions;
pub mod error;
pub mod executor;
pub mod report;
pub mod runtime;
pub mod scenario;
pub mod shell;
pub mod step;
pub mod ui;

pub use error::{Result, UpkeepError};
