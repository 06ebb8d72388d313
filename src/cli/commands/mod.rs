//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands are
//! dispatched via [`CommandDispatcher`], which routes CLI subcommands to
//! their implementations.

pub mod describe;
pub mod dispatcher;
pub mod list;
pub mod report;
pub mod run;
pub mod run_procedure;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

use crate::context::ParamValue;
use crate::error::{Result, UpkeepError};
use crate::scenario::ParamValues;

/// Parse repeated `--param name=value` pairs into bound parameter values.
///
/// `true`/`false` become booleans; everything else stays a string and is
/// coerced against the parameter's declaration at binding time.
pub(crate) fn parse_param_values(pairs: &[String]) -> Result<ParamValues> {
    let mut values = ParamValues::new();
    for pair in pairs {
        let (name, raw) = pair.split_once('=').ok_or_else(|| {
            UpkeepError::configuration(format!("invalid parameter '{}', expected name=value", pair))
        })?;
        let value = match raw {
            "true" => ParamValue::Bool(true),
            "false" => ParamValue::Bool(false),
            other => ParamValue::from(other),
        };
        values.insert(name.to_string(), value);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_strings_and_booleans() {
        let values = parse_param_values(&[
            "strategy=offline".to_string(),
            "skip_pulp_content=true".to_string(),
        ])
        .unwrap();

        assert_eq!(
            values.get("strategy").and_then(ParamValue::as_str),
            Some("offline")
        );
        assert_eq!(
            values.get("skip_pulp_content").and_then(ParamValue::as_bool),
            Some(true)
        );
    }

    #[test]
    fn rejects_pairs_without_equals() {
        let err = parse_param_values(&["strategy".to_string()]).unwrap_err();
        assert!(matches!(err, UpkeepError::Configuration { .. }));
    }

    #[test]
    fn value_may_contain_equals() {
        let values = parse_param_values(&["backup_dir=/var/b=ackup".to_string()]).unwrap();
        assert_eq!(
            values.get("backup_dir").and_then(ParamValue::as_str),
            Some("/var/b=ackup")
        );
    }
}
