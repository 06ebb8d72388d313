//! Verifies that an incremental backup's parent was taken with the same
//! strategy as the current run.

use std::path::PathBuf;

use crate::context::Context;
use crate::definitions::procedures::backup::BackupMetadata;
use crate::error::Result;
use crate::runtime::Runtime;
use crate::step::{Check, Outcome, Step, StepDef, StepInfo};

pub struct IncrementalParentType {
    online_backup: bool,
    incremental_dir: Option<PathBuf>,
}

impl IncrementalParentType {
    pub const DEF: StepDef = StepDef {
        id: "backup.incremental-parent",
        required_keys: &[],
        build: |args| {
            Ok(Step::check(IncrementalParentType {
                online_backup: args.get_bool("online_backup"),
                incremental_dir: args.get_path("incremental_dir"),
            }))
        },
    };
}

impl Check for IncrementalParentType {
    fn info(&self) -> StepInfo {
        StepInfo::new(Self::DEF.id, "Check incremental parent backup type")
    }

    fn run(&self, _rt: &mut Runtime<'_>, _ctx: &Context) -> Result<Outcome> {
        let Some(parent) = &self.incremental_dir else {
            return Ok(Outcome::Skipped("not an incremental backup".into()));
        };

        let metadata = match BackupMetadata::read_from(parent) {
            Ok(metadata) => metadata,
            Err(e) => {
                return Ok(Outcome::Failure(format!(
                    "cannot read metadata of '{}': {}",
                    parent.display(),
                    e
                )))
            }
        };

        if metadata.online_backup != self.online_backup {
            let kind = |online: bool| if online { "online" } else { "offline" };
            return Ok(Outcome::Failure(format!(
                "parent backup in '{}' is {} but this backup is {}",
                parent.display(),
                kind(metadata.online_backup),
                kind(self.online_backup)
            )));
        }

        Ok(Outcome::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ResolvedArgs;
    use crate::runtime::testing::{RecordingServiceManager, StaticTaskQueue};
    use crate::ui::MockUi;
    use chrono::Utc;

    fn run(step: &Step) -> Outcome {
        let mut ui = MockUi::new();
        let services = RecordingServiceManager::default();
        let tasks = StaticTaskQueue::default();
        let mut rt = Runtime::new(&mut ui, &services, &tasks);
        step.run(&mut rt, &mut Context::new()).unwrap()
    }

    fn write_parent(dir: &std::path::Path, online: bool) {
        BackupMetadata {
            online_backup: online,
            incremental_of: None,
            started_at: Utc::now(),
        }
        .write_to(dir)
        .unwrap();
    }

    fn build(online: bool, parent: Option<&std::path::Path>) -> Step {
        let mut args = ResolvedArgs::default();
        args.insert("online_backup", online);
        if let Some(parent) = parent {
            args.insert("incremental_dir", parent.to_string_lossy().to_string());
        }
        (IncrementalParentType::DEF.build)(&args).unwrap()
    }

    #[test]
    fn skips_when_not_incremental() {
        let outcome = run(&build(true, None));
        assert_eq!(outcome, Outcome::Skipped("not an incremental backup".into()));
    }

    #[test]
    fn accepts_matching_parent_strategy() {
        let temp = tempfile::TempDir::new().unwrap();
        write_parent(temp.path(), true);

        let outcome = run(&build(true, Some(temp.path())));
        assert_eq!(outcome, Outcome::Success);
    }

    #[test]
    fn rejects_mismatched_parent_strategy() {
        let temp = tempfile::TempDir::new().unwrap();
        write_parent(temp.path(), true);

        let outcome = run(&build(false, Some(temp.path())));
        assert!(outcome.is_failure());
        assert!(outcome.detail().unwrap().contains("online"));
    }

    #[test]
    fn fails_on_unreadable_parent_metadata() {
        let temp = tempfile::TempDir::new().unwrap();

        let outcome = run(&build(true, Some(temp.path())));
        assert!(outcome.is_failure());
        assert!(outcome.detail().unwrap().contains("metadata"));
    }
}
