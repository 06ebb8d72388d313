//! Scenario composition.
//!
//! Builds the ordered, conditionally-branched step list for one scenario
//! invocation. All parameter validation happens before the first step is
//! constructed; mapping gaps surface as validation errors during
//! composition, before anything executes.

use crate::capability::CapabilityRegistry;
use crate::context::{Context, ContextMapping, ParamValue};
use crate::error::{Result, UpkeepError};
use crate::executor::{execute, ExecutionReport, RunStrategy};
use crate::runtime::Runtime;
use crate::step::{Step, StepDef};

use super::{bind_params, ParamValues, Scenario, Trigger};

/// Step-list builder handed to a scenario's `compose`.
pub struct Composer<'a> {
    context: Context,
    mapping: ContextMapping,
    capabilities: &'a CapabilityRegistry,
    steps: Vec<Step>,
}

impl<'a> Composer<'a> {
    fn new(context: Context, mapping: ContextMapping, capabilities: &'a CapabilityRegistry) -> Self {
        Self {
            context,
            mapping,
            capabilities,
            steps: Vec::new(),
        }
    }

    /// Bound value of a scenario parameter.
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.context.get(name)
    }

    /// String parameter shorthand.
    pub fn param_str(&self, name: &str) -> Option<&str> {
        self.context.get_str(name)
    }

    /// Boolean parameter shorthand; unset reads as `false`.
    pub fn param_bool(&self, name: &str) -> bool {
        self.context.get_bool(name)
    }

    /// The injected capability registry, for conditional branching.
    pub fn capabilities(&self) -> &CapabilityRegistry {
        self.capabilities
    }

    /// Append a pre-built step (e.g. one carrying an only/skip filter).
    pub fn add_step(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Construct and append a step with its arguments resolved from the
    /// declared context mapping.
    pub fn add_step_with_context(&mut self, def: &StepDef) -> Result<()> {
        self.add_step_with_flags(def, &[])
    }

    /// Construct and append a step, merging mapping-resolved arguments with
    /// composer-supplied literal flags. Literals win on key collision.
    pub fn add_step_with_flags(
        &mut self,
        def: &StepDef,
        flags: &[(&str, ParamValue)],
    ) -> Result<()> {
        let mut args = self.mapping.resolve(def, &self.context);
        for (key, value) in flags {
            args.insert(key, value.clone());
        }

        for key in def.required_keys {
            if args.contains(key) {
                continue;
            }
            let message = if self.mapping.supplies(def, key) {
                format!(
                    "required key '{}' maps to a parameter with no bound value and no default",
                    key
                )
            } else {
                format!("required key '{}' has no mapping entry and no default", key)
            };
            return Err(UpkeepError::validation(def.id, message));
        }

        self.steps.push((def.build)(&args)?);
        Ok(())
    }

    /// Construct and append several step types in declaration order, each
    /// with mapping-resolved arguments.
    pub fn add_steps_with_context(&mut self, defs: &[&StepDef]) -> Result<()> {
        for def in defs {
            self.add_step_with_context(def)?;
        }
        Ok(())
    }
}

/// A scenario instance ready to execute: the ordered step list plus the
/// context the steps will share.
#[derive(Debug)]
pub struct ComposedScenario {
    /// Scenario name.
    pub name: &'static str,
    /// Scenario description.
    pub description: &'static str,
    /// Failure policy the executor applies.
    pub strategy: RunStrategy,
    /// Ordered steps. The executor never reorders them.
    pub steps: Vec<Step>,
    /// Shared parameter context for this run.
    pub context: Context,
}

impl ComposedScenario {
    /// Execute the composed steps under the scenario's run strategy.
    pub fn execute(&mut self, rt: &mut Runtime<'_>) -> ExecutionReport {
        execute(self.name, self.strategy, &self.steps, &mut self.context, rt)
    }

    /// Step ids in composed order, for assertions and display.
    pub fn step_ids(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.info().id).collect()
    }
}

/// Validate parameters, evaluate branches, and build the ordered step list
/// for one invocation of `scenario`.
///
/// Parameter binding failures (including a manual-only scenario invoked
/// with [`Trigger::Automatic`]) are configuration errors raised before any
/// step is constructed.
pub fn compose(
    scenario: &dyn Scenario,
    values: &ParamValues,
    capabilities: &CapabilityRegistry,
    trigger: Trigger,
) -> Result<ComposedScenario> {
    let metadata = scenario.metadata();

    if metadata.manual_only && trigger == Trigger::Automatic {
        return Err(UpkeepError::configuration(format!(
            "scenario '{}' can only be triggered manually",
            metadata.name
        )));
    }

    let context = bind_params(&metadata.params, values)?;
    let mapping = scenario.context_mapping();

    let mut composer = Composer::new(context, mapping, capabilities);
    scenario.compose(&mut composer)?;

    Ok(ComposedScenario {
        name: metadata.name,
        description: metadata.description,
        strategy: metadata.strategy,
        steps: composer.steps,
        context: composer.context,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ResolvedArgs;
    use crate::step::Outcome;

    struct Recorded {
        id: &'static str,
    }

    impl crate::step::Procedure for Recorded {
        fn info(&self) -> crate::step::StepInfo {
            crate::step::StepInfo::new(self.id, self.id)
        }
        fn run(&self, _rt: &mut Runtime<'_>, _ctx: &mut Context) -> Result<Outcome> {
            Ok(Outcome::Success)
        }
    }

    const PREPARE: StepDef = StepDef {
        id: "test.prepare",
        required_keys: &["backup_dir"],
        build: |args| {
            args.require_str("test.prepare", "backup_dir")?;
            Ok(Step::procedure(Recorded { id: "test.prepare" }))
        },
    };

    const OPTIONAL: StepDef = StepDef {
        id: "test.optional",
        required_keys: &[],
        build: |_args: &ResolvedArgs| Ok(Step::procedure(Recorded { id: "test.optional" })),
    };

    struct OneStep {
        manual_only: bool,
    }

    impl Scenario for OneStep {
        fn metadata(&self) -> crate::scenario::ScenarioMetadata {
            crate::scenario::ScenarioMetadata {
                name: "one-step",
                description: "test scenario",
                tags: &["test"],
                strategy: RunStrategy::FailFast,
                manual_only: self.manual_only,
                params: vec![
                    crate::scenario::ParameterSpec::new("backup_dir", "dir").required(),
                ],
            }
        }

        fn context_mapping(&self) -> ContextMapping {
            let mut mapping = ContextMapping::new();
            mapping.map("backup_dir", &[(&PREPARE, "backup_dir")]);
            mapping
        }

        fn compose(&self, composer: &mut Composer<'_>) -> Result<()> {
            composer.add_step_with_context(&PREPARE)
        }
    }

    fn bound_values() -> ParamValues {
        let mut values = ParamValues::new();
        values.insert("backup_dir".into(), "/var/backup".into());
        values
    }

    #[test]
    fn compose_builds_steps_in_order() {
        let caps = CapabilityRegistry::new();
        let composed = compose(
            &OneStep { manual_only: true },
            &bound_values(),
            &caps,
            Trigger::Manual,
        )
        .unwrap();
        assert_eq!(composed.step_ids(), ["test.prepare"]);
        assert_eq!(composed.context.get_str("backup_dir"), Some("/var/backup"));
    }

    #[test]
    fn manual_only_scenario_rejects_automatic_trigger() {
        let caps = CapabilityRegistry::new();
        let err = compose(
            &OneStep { manual_only: true },
            &bound_values(),
            &caps,
            Trigger::Automatic,
        )
        .unwrap_err();
        assert!(matches!(err, UpkeepError::Configuration { .. }));
    }

    #[test]
    fn non_manual_scenario_accepts_automatic_trigger() {
        let caps = CapabilityRegistry::new();
        assert!(compose(
            &OneStep { manual_only: false },
            &bound_values(),
            &caps,
            Trigger::Automatic,
        )
        .is_ok());
    }

    #[test]
    fn missing_mapping_entry_is_validation_error() {
        struct Unmapped;
        impl Scenario for Unmapped {
            fn metadata(&self) -> crate::scenario::ScenarioMetadata {
                crate::scenario::ScenarioMetadata {
                    name: "unmapped",
                    description: "",
                    tags: &[],
                    strategy: RunStrategy::FailFast,
                    manual_only: false,
                    params: vec![],
                }
            }
            fn context_mapping(&self) -> ContextMapping {
                ContextMapping::new()
            }
            fn compose(&self, composer: &mut Composer<'_>) -> Result<()> {
                composer.add_step_with_context(&PREPARE)
            }
        }

        let caps = CapabilityRegistry::new();
        let err = compose(&Unmapped, &ParamValues::new(), &caps, Trigger::Manual).unwrap_err();
        assert!(matches!(err, UpkeepError::Validation { .. }));
        assert!(err.to_string().contains("no mapping entry"));
    }

    #[test]
    fn literal_flags_satisfy_required_keys() {
        struct Flagged;
        impl Scenario for Flagged {
            fn metadata(&self) -> crate::scenario::ScenarioMetadata {
                crate::scenario::ScenarioMetadata {
                    name: "flagged",
                    description: "",
                    tags: &[],
                    strategy: RunStrategy::FailFast,
                    manual_only: false,
                    params: vec![],
                }
            }
            fn context_mapping(&self) -> ContextMapping {
                ContextMapping::new()
            }
            fn compose(&self, composer: &mut Composer<'_>) -> Result<()> {
                composer.add_step_with_flags(&PREPARE, &[("backup_dir", "/tmp/b".into())])
            }
        }

        let caps = CapabilityRegistry::new();
        let composed = compose(&Flagged, &ParamValues::new(), &caps, Trigger::Manual).unwrap();
        assert_eq!(composed.step_ids(), ["test.prepare"]);
    }

    #[test]
    fn grouped_inclusion_preserves_declaration_order() {
        struct Grouped;
        impl Scenario for Grouped {
            fn metadata(&self) -> crate::scenario::ScenarioMetadata {
                crate::scenario::ScenarioMetadata {
                    name: "grouped",
                    description: "",
                    tags: &[],
                    strategy: RunStrategy::FailSlow,
                    manual_only: false,
                    params: vec![
                        crate::scenario::ParameterSpec::new("backup_dir", "dir").required(),
                    ],
                }
            }
            fn context_mapping(&self) -> ContextMapping {
                let mut mapping = ContextMapping::new();
                mapping.map("backup_dir", &[(&PREPARE, "backup_dir")]);
                mapping
            }
            fn compose(&self, composer: &mut Composer<'_>) -> Result<()> {
                composer.add_steps_with_context(&[&OPTIONAL, &PREPARE, &OPTIONAL])
            }
        }

        let caps = CapabilityRegistry::new();
        let composed = compose(&Grouped, &bound_values(), &caps, Trigger::Manual).unwrap();
        assert_eq!(
            composed.step_ids(),
            ["test.optional", "test.prepare", "test.optional"]
        );
    }

    #[test]
    fn no_steps_constructed_when_binding_fails() {
        let caps = CapabilityRegistry::new();
        let err = compose(
            &OneStep { manual_only: false },
            &ParamValues::new(),
            &caps,
            Trigger::Manual,
        )
        .unwrap_err();
        assert!(matches!(err, UpkeepError::Configuration { .. }));
    }
}
