//! Steps: the polymorphic units of work scenarios are composed from.
//!
//! A step is either a [`Check`] (read-only precondition) or a [`Procedure`]
//! (has side effects and may publish derived context values). The two are
//! held behind the two-variant [`Step`] wrapper so the composer and executor
//! never care which kind they are holding, while the run contract still
//! encodes the read-only nature of checks in its signature.
//!
//! Every step *type* also carries a static [`StepDef`]: its identity, the
//! context keys it cannot be constructed without, and its constructor. The
//! [`ContextMapping`](crate::context::ContextMapping) table targets
//! `StepDef`s, so mapping declarations are checkable against each step
//! type's declared key set at composition time.

pub mod outcome;

pub use outcome::Outcome;

use std::collections::BTreeSet;

use crate::context::{Context, ResolvedArgs};
use crate::error::Result;
use crate::runtime::Runtime;

/// Identity and display label of one composed step instance.
#[derive(Debug, Clone)]
pub struct StepInfo {
    /// Stable step-type id, e.g. `backup.prepare-directory`.
    pub id: &'static str,
    /// Human-readable label for run output.
    pub label: String,
}

impl StepInfo {
    pub fn new(id: &'static str, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// A read-only precondition check.
pub trait Check {
    /// Identity and label of this instance.
    fn info(&self) -> StepInfo;

    /// Evaluate the precondition. Checks observe the context but never
    /// mutate it.
    fn run(&self, rt: &mut Runtime<'_>, ctx: &Context) -> Result<Outcome>;
}

/// A unit of work with side effects.
pub trait Procedure {
    /// Identity and label of this instance.
    fn info(&self) -> StepInfo;

    /// Carry out the work. Procedures may publish derived values (e.g. a
    /// resolved backup path) for later steps to consume.
    fn run(&self, rt: &mut Runtime<'_>, ctx: &mut Context) -> Result<Outcome>;
}

/// A composed step: exactly a check or a procedure.
pub enum Step {
    Check(Box<dyn Check>),
    Procedure(Box<dyn Procedure>),
}

impl Step {
    /// Wrap a check.
    pub fn check(check: impl Check + 'static) -> Self {
        Step::Check(Box::new(check))
    }

    /// Wrap a procedure.
    pub fn procedure(procedure: impl Procedure + 'static) -> Self {
        Step::Procedure(Box::new(procedure))
    }

    /// Build a closure-backed check. Useful for tests and one-off probes.
    pub fn check_fn(
        id: &'static str,
        run: impl Fn(&mut Runtime<'_>, &Context) -> Result<Outcome> + 'static,
    ) -> Self {
        struct FnCheck<F> {
            id: &'static str,
            run: F,
        }
        impl<F> Check for FnCheck<F>
        where
            F: Fn(&mut Runtime<'_>, &Context) -> Result<Outcome>,
        {
            fn info(&self) -> StepInfo {
                StepInfo::new(self.id, self.id)
            }
            fn run(&self, rt: &mut Runtime<'_>, ctx: &Context) -> Result<Outcome> {
                (self.run)(rt, ctx)
            }
        }
        Step::Check(Box::new(FnCheck { id, run }))
    }

    /// Build a closure-backed procedure. Useful for tests.
    pub fn procedure_fn(
        id: &'static str,
        run: impl Fn(&mut Runtime<'_>, &mut Context) -> Result<Outcome> + 'static,
    ) -> Self {
        struct FnProcedure<F> {
            id: &'static str,
            run: F,
        }
        impl<F> Procedure for FnProcedure<F>
        where
            F: Fn(&mut Runtime<'_>, &mut Context) -> Result<Outcome>,
        {
            fn info(&self) -> StepInfo {
                StepInfo::new(self.id, self.id)
            }
            fn run(&self, rt: &mut Runtime<'_>, ctx: &mut Context) -> Result<Outcome> {
                (self.run)(rt, ctx)
            }
        }
        Step::Procedure(Box::new(FnProcedure { id, run }))
    }

    /// Identity and label of this instance.
    pub fn info(&self) -> StepInfo {
        match self {
            Step::Check(c) => c.info(),
            Step::Procedure(p) => p.info(),
        }
    }

    /// Run the step. Checks receive a shared view of the context.
    pub fn run(&self, rt: &mut Runtime<'_>, ctx: &mut Context) -> Result<Outcome> {
        match self {
            Step::Check(c) => c.run(rt, ctx),
            Step::Procedure(p) => p.run(rt, ctx),
        }
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Step::Check(_) => "Check",
            Step::Procedure(_) => "Procedure",
        };
        let info = self.info();
        f.debug_struct("Step")
            .field("kind", &kind)
            .field("id", &info.id)
            .finish()
    }
}

/// Static description of a step type: identity, the step-level keys it
/// cannot be constructed without, and its constructor.
#[derive(Debug, Clone, Copy)]
pub struct StepDef {
    /// Stable step-type id.
    pub id: &'static str,
    /// Step-level keys that must be supplied by a mapping entry or a
    /// composer literal flag. Keys with sensible absent-behavior (optional
    /// flags, optional paths) are not listed here.
    pub required_keys: &'static [&'static str],
    /// Construct an instance from resolved arguments.
    pub build: fn(&ResolvedArgs) -> Result<Step>,
}

/// Restriction of a step to a named subset of its sub-operations, set by
/// the composer (e.g. stop only the online worker services).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepFilter {
    only: BTreeSet<String>,
    skip: BTreeSet<String>,
}

impl StepFilter {
    /// Unrestricted filter: every sub-operation is allowed.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to the named sub-operations.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            only: names.into_iter().map(Into::into).collect(),
            skip: BTreeSet::new(),
        }
    }

    /// Exclude the named sub-operations.
    pub fn skip<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            only: BTreeSet::new(),
            skip: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the named sub-operation is performed under this filter.
    pub fn allows(&self, name: &str) -> bool {
        if self.skip.contains(name) {
            return false;
        }
        self.only.is_empty() || self.only.contains(name)
    }

    /// Whether this filter restricts anything at all.
    pub fn is_unrestricted(&self) -> bool {
        self.only.is_empty() && self.skip.is_empty()
    }

    /// Names listed in the `only` set, for display.
    pub fn only_names(&self) -> impl Iterator<Item = &str> {
        self.only.iter().map(String::as_str)
    }
}
