//! Scenario definitions.

pub mod backup;

pub use backup::{Backup, BackupRescueCleanup};
