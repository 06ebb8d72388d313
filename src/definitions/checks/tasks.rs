//! Background task queue idle check.

use crate::context::Context;
use crate::error::Result;
use crate::runtime::Runtime;
use crate::step::{Check, Outcome, Step, StepDef, StepInfo};

/// Verifies the background task queue is empty before a backup starts.
///
/// With `wait_for_tasks` the check blocks until the queue drains instead of
/// failing; how long to wait is the task queue collaborator's decision.
pub struct TasksNotRunning {
    wait_for_tasks: bool,
}

impl TasksNotRunning {
    pub const DEF: StepDef = StepDef {
        id: "check.tasks-not-running",
        required_keys: &[],
        build: |args| {
            Ok(Step::check(TasksNotRunning {
                wait_for_tasks: args.get_bool("wait_for_tasks"),
            }))
        },
    };
}

impl Check for TasksNotRunning {
    fn info(&self) -> StepInfo {
        StepInfo::new(Self::DEF.id, "Check for running background tasks")
    }

    fn run(&self, rt: &mut Runtime<'_>, _ctx: &Context) -> Result<Outcome> {
        let active = rt.tasks.active_count()?;
        if active == 0 {
            return Ok(Outcome::Success);
        }

        if self.wait_for_tasks {
            rt.ui
                .message(&format!("Waiting for {} task(s) to complete", active));
            rt.tasks.wait_until_idle()?;
            return Ok(Outcome::Success);
        }

        Ok(Outcome::Failure(format!(
            "{} task(s) are still running; re-run with wait_for_tasks or let them finish",
            active
        )))
    }
}
