//! Scenario parameter declarations and binding.
//!
//! Each scenario declares its parameters once; whatever invokes the
//! scenario (the CLI, an automation caller) binds concrete values against
//! those declarations before composition. A missing required parameter is a
//! configuration failure, never a runtime step failure.

use std::collections::BTreeMap;

use crate::context::{Context, ParamValue};
use crate::error::{Result, UpkeepError};

/// Declaration of one scenario parameter.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    /// Scenario-level parameter name.
    pub name: &'static str,
    /// Help text shown by `upkeep describe`.
    pub description: &'static str,
    /// Whether binding must supply a value (or a default must exist).
    pub required: bool,
    /// Whether the value is a list; string bindings are split on commas.
    pub array: bool,
    /// Value used when the caller binds nothing.
    pub default: Option<ParamValue>,
}

impl ParameterSpec {
    /// Declare an optional scalar parameter.
    pub fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            required: false,
            array: false,
            default: None,
        }
    }

    /// Mark the parameter required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the parameter array-valued.
    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    /// Attach a default value.
    pub fn default_value(mut self, value: impl Into<ParamValue>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Values supplied by the caller, keyed by parameter name.
pub type ParamValues = BTreeMap<String, ParamValue>;

/// Validate supplied values against the declared specs and produce the
/// run's initial [`Context`].
///
/// Fails with [`UpkeepError::Configuration`] on an unknown parameter name,
/// a missing required parameter, or a scalar binding for an array
/// parameter that cannot be coerced.
pub fn bind_params(specs: &[ParameterSpec], values: &ParamValues) -> Result<Context> {
    for name in values.keys() {
        if !specs.iter().any(|s| s.name == name) {
            return Err(UpkeepError::configuration(format!(
                "unknown parameter '{}'",
                name
            )));
        }
    }

    let mut ctx = Context::new();
    for spec in specs {
        let bound = values.get(spec.name).cloned().or_else(|| spec.default.clone());
        match bound {
            Some(value) => {
                let value = coerce(spec, value)?;
                ctx.set(spec.name, value);
            }
            None if spec.required => {
                return Err(UpkeepError::configuration(format!(
                    "missing required parameter '{}'",
                    spec.name
                )));
            }
            None => {}
        }
    }
    Ok(ctx)
}

fn coerce(spec: &ParameterSpec, value: ParamValue) -> Result<ParamValue> {
    match (spec.array, value) {
        (true, ParamValue::Str(s)) => Ok(ParamValue::List(
            s.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        )),
        (true, ParamValue::List(items)) => Ok(ParamValue::List(items)),
        (true, other) => Err(UpkeepError::configuration(format!(
            "parameter '{}' expects a list, got '{}'",
            spec.name, other
        ))),
        (false, ParamValue::List(_)) => Err(UpkeepError::configuration(format!(
            "parameter '{}' does not accept a list",
            spec.name
        ))),
        (false, value) => Ok(value),
    }
}
