//! Scenario-parameter to step-argument mapping.
//!
//! Each scenario declares, once, how its parameters fan out into the steps
//! it composes: one scenario parameter may feed several step types, and one
//! step type may receive values fanned in from several parameters plus
//! composer-supplied literal flags. The table is static per scenario type;
//! resolution is dynamic, so the same declared mapping yields different
//! bound values across invocations, or after an earlier step mutates the
//! context.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::context::{Context, ParamValue};
use crate::error::{Result, UpkeepError};
use crate::step::StepDef;

#[derive(Debug, Clone)]
struct MapEntry {
    param: &'static str,
    step: &'static str,
    key: &'static str,
}

/// The static mapping table declared by a scenario.
#[derive(Debug, Clone, Default)]
pub struct ContextMapping {
    entries: Vec<MapEntry>,
}

impl ContextMapping {
    /// Create an empty mapping table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that scenario parameter `param` is delivered to each listed
    /// step type under the given step-level key.
    pub fn map(&mut self, param: &'static str, targets: &[(&StepDef, &'static str)]) {
        for (def, key) in targets {
            self.entries.push(MapEntry {
                param,
                step: def.id,
                key,
            });
        }
    }

    /// Whether any declared entry delivers `key` to the given step type.
    pub fn supplies(&self, def: &StepDef, key: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.step == def.id && e.key == key)
    }

    /// Resolve the mapped arguments for one step type against the current
    /// context. Parameters without a bound value are simply absent from the
    /// result; required-key enforcement happens in the composer.
    pub fn resolve(&self, def: &StepDef, ctx: &Context) -> ResolvedArgs {
        let mut args = ResolvedArgs::default();
        for entry in self.entries.iter().filter(|e| e.step == def.id) {
            if let Some(value) = ctx.get(entry.param) {
                args.insert(entry.key, value.clone());
            }
        }
        args
    }
}

/// Fully resolved constructor arguments for one step instance: mapped
/// context values merged with composer-supplied literal flags.
#[derive(Debug, Clone, Default)]
pub struct ResolvedArgs {
    values: BTreeMap<String, ParamValue>,
}

impl ResolvedArgs {
    /// Insert or overwrite an argument.
    pub fn insert(&mut self, key: &str, value: impl Into<ParamValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Whether an argument is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Raw accessor.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    /// String accessor.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_str)
    }

    /// Boolean accessor; absent or non-boolean reads as `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(ParamValue::as_bool).unwrap_or(false)
    }

    /// List accessor; absent reads as an empty list.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(ParamValue::as_list)
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    /// Path accessor.
    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get_str(key).map(PathBuf::from)
    }

    /// String accessor that fails with a validation error when absent.
    /// Step constructors use this for their declared required keys.
    pub fn require_str(&self, step: &str, key: &str) -> Result<&str> {
        self.get_str(key)
            .ok_or_else(|| UpkeepError::validation(step, format!("missing required key '{}'", key)))
    }

    /// Path accessor that fails with a validation error when absent.
    pub fn require_path(&self, step: &str, key: &str) -> Result<PathBuf> {
        self.require_str(step, key).map(PathBuf::from)
    }
}
