//! Step execution under a scenario's run strategy.
//!
//! The executor runs a composed step list strictly in order, single
//! threaded, awaiting each step's completion before the next begins. It
//! provides no timeout of its own: bounded-wait behavior belongs to the
//! individual step. Its only failure-handling knobs are the two run
//! strategies and the rescue dispatch in [`rescue`].

pub mod rescue;

pub use rescue::RescueDispatcher;

use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::warn;

use crate::context::Context;
use crate::error::UpkeepError;
use crate::runtime::Runtime;
use crate::step::{Outcome, Step};

/// Failure policy for a scenario's step sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStrategy {
    /// Halt at the first failing step; later steps assume earlier success.
    FailFast,
    /// Invoke every composed step exactly once regardless of earlier
    /// outcomes. Ordering is still preserved, so a step may run after a
    /// predecessor it depends on has failed; cleanup flows rely on this.
    FailSlow,
}

impl FromStr for RunStrategy {
    type Err = UpkeepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail_fast" => Ok(RunStrategy::FailFast),
            "fail_slow" => Ok(RunStrategy::FailSlow),
            other => Err(UpkeepError::configuration(format!(
                "unsupported run strategy '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for RunStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStrategy::FailFast => write!(f, "fail_fast"),
            RunStrategy::FailSlow => write!(f, "fail_slow"),
        }
    }
}

fn serialize_duration<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Outcome of one invoked step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// Step-type id.
    pub id: String,
    /// Instance label.
    pub label: String,
    /// The step's outcome.
    pub outcome: Outcome,
    /// Time spent in the step's `run`.
    #[serde(serialize_with = "serialize_duration", rename = "duration_secs")]
    pub duration: Duration,
}

impl StepReport {
    /// One-line summary for run output.
    pub fn summary_line(&self) -> String {
        match self.outcome.detail() {
            Some(detail) => format!(
                "{} {} - {}",
                self.outcome.display_char(),
                self.label,
                detail
            ),
            None => format!("{} {}", self.outcome.display_char(), self.label),
        }
    }
}

/// Result of running a composed scenario.
#[derive(Debug, Serialize)]
pub struct ExecutionReport {
    /// Scenario name.
    pub scenario: String,
    /// Strategy the run was executed under.
    pub strategy: RunStrategy,
    /// Per-step outcomes, in execution order. Under fail_fast, steps after
    /// the halting step were never invoked and are not listed.
    pub steps: Vec<StepReport>,
    /// Step id that halted a fail_fast run, if any.
    pub halted_on: Option<String>,
    /// Total wall-clock duration.
    #[serde(serialize_with = "serialize_duration", rename = "duration_secs")]
    pub duration: Duration,
}

impl ExecutionReport {
    /// Whether the scenario as a whole succeeded.
    pub fn success(&self) -> bool {
        self.halted_on.is_none() && !self.steps.iter().any(|s| s.outcome.is_failure())
    }

    /// Reports of failed steps.
    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|s| s.outcome.is_failure())
    }
}

/// Execute `steps` strictly in composed order under `strategy`.
///
/// A step's `run` returning an error is folded into a failure outcome, so
/// every invoked step appears in the report with an outcome and no failure
/// is ever silently discarded.
pub fn execute(
    scenario: &str,
    strategy: RunStrategy,
    steps: &[Step],
    ctx: &mut Context,
    rt: &mut Runtime<'_>,
) -> ExecutionReport {
    let start = Instant::now();
    let mut reports = Vec::with_capacity(steps.len());
    let mut halted_on = None;

    for step in steps {
        let info = step.info();
        let step_start = Instant::now();

        let outcome = match step.run(rt, ctx) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("step '{}' errored: {}", info.id, e);
                Outcome::Failure(e.to_string())
            }
        };

        let failed = outcome.is_failure();
        reports.push(StepReport {
            id: info.id.to_string(),
            label: info.label,
            outcome,
            duration: step_start.elapsed(),
        });

        if failed && strategy == RunStrategy::FailFast {
            halted_on = Some(info.id.to_string());
            break;
        }
    }

    ExecutionReport {
        scenario: scenario.to_string(),
        strategy,
        steps: reports,
        halted_on,
        duration: start.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::testing::{RecordingServiceManager, StaticTaskQueue};
    use crate::ui::MockUi;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn counting_step(
        id: &'static str,
        outcome: Outcome,
        calls: &Rc<RefCell<Vec<&'static str>>>,
    ) -> Step {
        let calls = Rc::clone(calls);
        Step::procedure_fn(id, move |_rt, _ctx| {
            calls.borrow_mut().push(id);
            Ok(outcome.clone())
        })
    }

    fn run(strategy: RunStrategy, steps: &[Step]) -> ExecutionReport {
        let mut ui = MockUi::new();
        let services = RecordingServiceManager::new(Vec::<String>::new());
        let tasks = StaticTaskQueue::default();
        let mut rt = Runtime::new(&mut ui, &services, &tasks);
        let mut ctx = Context::new();
        execute("test", strategy, steps, &mut ctx, &mut rt)
    }

    #[test]
    fn fail_fast_halts_after_first_failure() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let steps = vec![
            counting_step("a", Outcome::Success, &calls),
            counting_step("b", Outcome::Failure("boom".into()), &calls),
            counting_step("c", Outcome::Success, &calls),
        ];

        let report = run(RunStrategy::FailFast, &steps);

        assert_eq!(*calls.borrow(), ["a", "b"]);
        assert!(!report.success());
        assert_eq!(report.halted_on.as_deref(), Some("b"));
        assert_eq!(report.steps.len(), 2);
    }

    #[test]
    fn fail_slow_invokes_every_step_exactly_once() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let steps = vec![
            counting_step("a", Outcome::Failure("first".into()), &calls),
            counting_step("b", Outcome::Failure("second".into()), &calls),
            counting_step("c", Outcome::Success, &calls),
        ];

        let report = run(RunStrategy::FailSlow, &steps);

        assert_eq!(*calls.borrow(), ["a", "b", "c"]);
        assert!(!report.success());
        assert!(report.halted_on.is_none());
        assert_eq!(report.failures().count(), 2);
        assert_eq!(report.steps.len(), 3);
    }

    #[test]
    fn warnings_and_skips_do_not_fail_the_run() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let steps = vec![
            counting_step("a", Outcome::Warning("changed files".into()), &calls),
            counting_step("b", Outcome::Skipped("filtered".into()), &calls),
        ];

        let report = run(RunStrategy::FailFast, &steps);
        assert!(report.success());
        assert_eq!(report.steps.len(), 2);
    }

    #[test]
    fn step_error_is_folded_into_failure_outcome() {
        let steps = vec![Step::procedure_fn("erroring", |_rt, _ctx| {
            Err(UpkeepError::StepExecution {
                step: "erroring".into(),
                message: "disk full".into(),
            })
        })];

        let report = run(RunStrategy::FailFast, &steps);
        assert!(!report.success());
        assert!(report.steps[0].outcome.is_failure());
        assert!(report.steps[0]
            .outcome
            .detail()
            .unwrap()
            .contains("disk full"));
    }

    #[test]
    fn context_mutation_is_visible_to_later_steps() {
        let steps = vec![
            Step::procedure_fn("writer", |_rt, ctx| {
                ctx.set("backup_dir", "/var/backup/resolved");
                Ok(Outcome::Success)
            }),
            Step::check_fn("reader", |_rt, ctx| {
                if ctx.get_str("backup_dir") == Some("/var/backup/resolved") {
                    Ok(Outcome::Success)
                } else {
                    Ok(Outcome::Failure("derived value not visible".into()))
                }
            }),
        ];

        let report = run(RunStrategy::FailFast, &steps);
        assert!(report.success());
    }

    #[test]
    fn strategy_parses_known_values_only() {
        assert_eq!(
            "fail_fast".parse::<RunStrategy>().unwrap(),
            RunStrategy::FailFast
        );
        assert_eq!(
            "fail_slow".parse::<RunStrategy>().unwrap(),
            RunStrategy::FailSlow
        );
        assert!(matches!(
            "fail_sometimes".parse::<RunStrategy>(),
            Err(UpkeepError::Configuration { .. })
        ));
    }

    #[test]
    fn summary_line_includes_outcome_detail() {
        let report = StepReport {
            id: "backup.pulp".into(),
            label: "Backup Pulp content".into(),
            outcome: Outcome::Skipped("pulp content skipped".into()),
            duration: Duration::ZERO,
        };
        let line = report.summary_line();
        assert!(line.contains('⊘'));
        assert!(line.contains("pulp content skipped"));
    }

    #[test]
    fn report_serializes_to_json() {
        let report = run(RunStrategy::FailFast, &[]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["scenario"], "test");
        assert_eq!(json["strategy"], "fail_fast");
        assert!(json["steps"].as_array().unwrap().is_empty());
    }
}
