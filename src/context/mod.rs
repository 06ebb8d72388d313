//! Shared parameter context for one scenario run.
//!
//! This module provides:
//!
//! - [`Context`] - the key-value store of resolved parameter values, created
//!   at invocation time and discarded when the run completes
//! - [`ParamValue`] - the tagged value type parameters are carried as
//! - [`ContextMapping`] - the static scenario-param → step-key table
//! - [`ResolvedArgs`] - a step's constructor arguments after mapping

pub mod mapping;
pub mod value;

pub use mapping::{ContextMapping, ResolvedArgs};
pub use value::ParamValue;

use std::collections::BTreeMap;

/// Mutable store of resolved parameter values for one scenario run.
///
/// Steps may publish derived values (e.g. a resolved backup path) to make
/// them visible to later steps in the same run. Execution is strictly
/// sequential, so the context needs no interior locking.
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: BTreeMap<String, ParamValue>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a parameter value.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Set or overwrite a parameter value.
    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Whether a value is bound under this name.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// String accessor shorthand.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    /// Boolean accessor shorthand; unset or non-boolean reads as `false`.
    pub fn get_bool(&self, name: &str) -> bool {
        self.get(name).and_then(ParamValue::as_bool).unwrap_or(false)
    }

    /// Iterate over bound names and values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_round_trip() {
        let mut ctx = Context::new();
        ctx.set("backup_dir", "/var/backup");
        assert_eq!(ctx.get_str("backup_dir"), Some("/var/backup"));
        assert!(ctx.contains("backup_dir"));
        assert!(!ctx.contains("preserve_dir"));
    }

    #[test]
    fn later_set_overwrites_earlier_value() {
        let mut ctx = Context::new();
        ctx.set("backup_dir", "/var/backup");
        ctx.set("backup_dir", "/var/backup/2026-08-30");
        assert_eq!(ctx.get_str("backup_dir"), Some("/var/backup/2026-08-30"));
    }

    #[test]
    fn get_bool_defaults_to_false() {
        let mut ctx = Context::new();
        assert!(!ctx.get_bool("wait_for_tasks"));
        ctx.set("wait_for_tasks", true);
        assert!(ctx.get_bool("wait_for_tasks"));
    }
}
