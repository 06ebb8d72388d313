//! Scenario definitions and composition.
//!
//! A scenario is a named, parameterized maintenance workflow: it declares
//! its metadata and parameters once, a static context mapping, and a
//! `compose` routine that emits the ordered step list for one invocation.
//!
//! - [`Scenario`] - the definition trait
//! - [`ScenarioMetadata`] - identity, tags, parameters, run strategy
//! - [`Composer`] / [`compose`] - turns a definition plus bound parameters
//!   into a [`ComposedScenario`]

pub mod composer;
pub mod params;

pub use composer::{compose, ComposedScenario, Composer};
pub use params::{bind_params, ParamValues, ParameterSpec};

use crate::context::ContextMapping;
use crate::error::Result;
use crate::executor::RunStrategy;

/// How a scenario invocation was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// An operator asked for this scenario by name.
    Manual,
    /// An automated detection pass wants to run the scenario.
    Automatic,
}

/// Declared identity of a scenario type.
#[derive(Debug, Clone)]
pub struct ScenarioMetadata {
    /// Registry name, e.g. `backup`.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Classification tags.
    pub tags: &'static [&'static str],
    /// Failure policy for the composed step sequence.
    pub strategy: RunStrategy,
    /// Whether the scenario may only be invoked by an operator, never by
    /// automatic detection.
    pub manual_only: bool,
    /// Declared parameters.
    pub params: Vec<ParameterSpec>,
}

/// A scenario definition.
pub trait Scenario {
    /// Declared metadata. Cheap to call; composition calls it once.
    fn metadata(&self) -> ScenarioMetadata;

    /// The static parameter → step-key mapping table for this scenario.
    fn context_mapping(&self) -> ContextMapping;

    /// Emit the ordered step list for one invocation. Branching decisions
    /// read bound parameters and the capability registry through the
    /// composer.
    fn compose(&self, composer: &mut Composer<'_>) -> Result<()>;

    /// Paired rescue scenario to attempt best-effort cleanup when a run of
    /// this scenario fails.
    fn rescue(&self) -> Option<Box<dyn Scenario>> {
        None
    }
}
