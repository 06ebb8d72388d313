//! Service stop/start procedures.
//!
//! Both operate on the runtime's [`ServiceManager`](crate::runtime::ServiceManager)
//! and accept a [`StepFilter`] so the composer can narrow them to a subset,
//! e.g. starting only the local postgresql or stopping only the online
//! worker services.

use tracing::debug;

use crate::context::Context;
use crate::error::Result;
use crate::runtime::Runtime;
use crate::step::{Outcome, Procedure, Step, StepDef, StepFilter, StepInfo};

/// Stops managed services, in the manager's stop order.
#[derive(Debug, Default)]
pub struct ServiceStop {
    filter: StepFilter,
}

impl ServiceStop {
    pub const DEF: StepDef = StepDef {
        id: "service.stop",
        required_keys: &[],
        build: |_args| Ok(Step::procedure(ServiceStop::default())),
    };

    /// Stop only the named services.
    pub fn only<I, S>(names: I) -> Step
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Step::procedure(ServiceStop {
            filter: StepFilter::only(names),
        })
    }
}

impl Procedure for ServiceStop {
    fn info(&self) -> StepInfo {
        StepInfo::new(Self::DEF.id, filtered_label("Stop services", &self.filter))
    }

    fn run(&self, rt: &mut Runtime<'_>, _ctx: &mut Context) -> Result<Outcome> {
        apply(rt, &self.filter, Action::Stop)
    }
}

/// Starts managed services, in reverse stop order.
#[derive(Debug, Default)]
pub struct ServiceStart {
    filter: StepFilter,
}

impl ServiceStart {
    pub const DEF: StepDef = StepDef {
        id: "service.start",
        required_keys: &[],
        build: |_args| Ok(Step::procedure(ServiceStart::default())),
    };

    /// Start only the named services.
    pub fn only<I, S>(names: I) -> Step
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Step::procedure(ServiceStart {
            filter: StepFilter::only(names),
        })
    }
}

impl Procedure for ServiceStart {
    fn info(&self) -> StepInfo {
        StepInfo::new(Self::DEF.id, filtered_label("Start services", &self.filter))
    }

    fn run(&self, rt: &mut Runtime<'_>, _ctx: &mut Context) -> Result<Outcome> {
        apply(rt, &self.filter, Action::Start)
    }
}

#[derive(Clone, Copy)]
enum Action {
    Stop,
    Start,
}

fn filtered_label(base: &str, filter: &StepFilter) -> String {
    if filter.is_unrestricted() {
        base.to_string()
    } else {
        let names: Vec<&str> = filter.only_names().collect();
        format!("{} ({})", base, names.join(", "))
    }
}

fn apply(rt: &mut Runtime<'_>, filter: &StepFilter, action: Action) -> Result<Outcome> {
    let mut targets: Vec<String> = rt
        .services
        .list()
        .into_iter()
        .filter(|name| filter.allows(name))
        .collect();
    if let Action::Start = action {
        targets.reverse();
    }
    if targets.is_empty() {
        return Ok(Outcome::Skipped("no services match the filter".into()));
    }

    let mut failed = Vec::new();
    for name in &targets {
        let result = match action {
            Action::Stop => rt.services.stop(name),
            Action::Start => rt.services.start(name),
        };
        if let Err(e) = result {
            debug!("service {} failed: {}", name, e);
            failed.push(format!("{}: {}", name, e));
        }
    }

    if failed.is_empty() {
        Ok(Outcome::Success)
    } else {
        Ok(Outcome::Failure(failed.join("; ")))
    }
}
