//! Rescue dispatch: best-effort cleanup after a failed scenario run.

use tracing::debug;

use crate::capability::CapabilityRegistry;
use crate::context::Context;
use crate::error::Result;
use crate::runtime::Runtime;
use crate::scenario::{compose, ParamValues, Scenario, Trigger};

use super::{ExecutionReport, RunStrategy};

/// Runs a paired rescue scenario after a primary scenario fails.
///
/// The rescue scenario receives only the context subset named by its own
/// parameter declarations, not the failed scenario's full context, and is
/// always executed under fail_slow: every cleanup action is attempted even
/// if an earlier one failed, and a context that a failed run only partially
/// populated must be tolerated.
pub struct RescueDispatcher<'a> {
    capabilities: &'a CapabilityRegistry,
}

impl<'a> RescueDispatcher<'a> {
    pub fn new(capabilities: &'a CapabilityRegistry) -> Self {
        Self { capabilities }
    }

    /// Compose and run `rescue`, binding its parameters from whatever the
    /// failed run's context holds for them.
    pub fn dispatch(
        &self,
        rescue: &dyn Scenario,
        failed_context: &Context,
        rt: &mut Runtime<'_>,
    ) -> Result<ExecutionReport> {
        let metadata = rescue.metadata();

        let mut values = ParamValues::new();
        for spec in &metadata.params {
            if let Some(value) = failed_context.get(spec.name) {
                values.insert(spec.name.to_string(), value.clone());
            }
        }
        debug!(
            "dispatching rescue scenario '{}' with {} bound parameter(s)",
            metadata.name,
            values.len()
        );

        let mut composed = compose(rescue, &values, self.capabilities, Trigger::Manual)?;
        composed.strategy = RunStrategy::FailSlow;
        Ok(composed.execute(rt))
    }
}
