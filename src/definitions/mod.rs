//! Concrete checks, procedures, scenarios, and capability probes.
//!
//! Everything above this module is definition-agnostic machinery; this
//! module is where the actual maintenance content lives and is looked up
//! by name.

pub mod capabilities;
pub mod checks;
pub mod procedures;
pub mod scenarios;

use crate::error::{Result, UpkeepError};
use crate::scenario::Scenario;
use crate::step::StepDef;

/// All registered scenarios, in display order.
pub fn scenarios() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(scenarios::Backup),
        Box::new(scenarios::BackupRescueCleanup),
    ]
}

/// Look a scenario up by its registry name.
pub fn find_scenario(name: &str) -> Result<Box<dyn Scenario>> {
    scenarios()
        .into_iter()
        .find(|s| s.metadata().name == name)
        .ok_or_else(|| UpkeepError::UnknownScenario {
            name: name.to_string(),
        })
}

/// Step types that can be run standalone, outside any scenario.
pub fn standalone_procedures() -> Vec<&'static StepDef> {
    vec![
        &procedures::KnowledgeBaseArticle::DEF,
        &procedures::ServiceStop::DEF,
        &procedures::ServiceStart::DEF,
        &procedures::Clean::DEF,
    ]
}

/// Look a standalone step type up by id.
pub fn find_procedure(id: &str) -> Result<&'static StepDef> {
    standalone_procedures()
        .into_iter()
        .find(|def| def.id == id)
        .ok_or_else(|| UpkeepError::UnknownProcedure {
            name: id.to_string(),
        })
}
