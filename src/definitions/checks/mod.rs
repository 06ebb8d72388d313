//! Read-only precondition checks.

pub mod incremental;
pub mod tasks;

pub use incremental::IncrementalParentType;
pub use tasks::TasksNotRunning;
