//! The backup scenario and its rescue cleanup.

use crate::capability::CapabilityRegistry;
use crate::context::ContextMapping;
use crate::definitions::capabilities::{InstanceInfo, PulpcoreWorkers, SidekiqWorkers};
use crate::definitions::checks::{IncrementalParentType, TasksNotRunning};
use crate::definitions::procedures::{
    AccessibilityConfirmation, Clean, CompressData, ConfigFiles, DatabaseDump, Metadata,
    PrepareDirectory, Pulp, ServiceStart, ServiceStop,
};
use crate::error::{Result, UpkeepError};
use crate::executor::RunStrategy;
use crate::scenario::{Composer, ParameterSpec, Scenario, ScenarioMetadata};

/// How the backup reads data: with services running or fully stopped.
/// Distinct from the run strategy, which is the executor's failure policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackupStrategy {
    Online,
    Offline,
}

/// Full backup of the instance.
pub struct Backup;

impl Backup {
    fn backup_strategy(&self, composer: &Composer<'_>) -> Result<BackupStrategy> {
        match composer.param_str("strategy") {
            Some("online") => Ok(BackupStrategy::Online),
            Some("offline") => Ok(BackupStrategy::Offline),
            other => Err(UpkeepError::configuration(format!(
                "unsupported strategy '{}', expected one of [online, offline]",
                other.unwrap_or("")
            ))),
        }
    }

    fn online_workers(capabilities: &CapabilityRegistry) -> Vec<String> {
        let mut workers = Vec::new();
        if let Some(sidekiq) = capabilities.get::<SidekiqWorkers>("sidekiq") {
            workers.extend(sidekiq.workers.iter().cloned());
        }
        if let Some(pulpcore) = capabilities.get::<PulpcoreWorkers>("pulpcore") {
            workers.extend(pulpcore.workers.iter().cloned());
        }
        workers
    }

    fn add_database_steps(&self, composer: &mut Composer<'_>) -> Result<()> {
        composer.add_steps_with_context(&[
            &DatabaseDump::CANDLEPIN,
            &DatabaseDump::FOREMAN,
            &DatabaseDump::PULPCORE,
        ])
    }

    fn add_online_steps(&self, composer: &mut Composer<'_>) -> Result<()> {
        let workers = Self::online_workers(composer.capabilities());

        if !workers.is_empty() {
            composer.add_step(ServiceStop::only(workers.clone()));
        }

        composer.add_step_with_flags(
            &ConfigFiles::DEF,
            &[("ignore_changed_files", true.into()), ("online_backup", true.into())],
        )?;
        composer.add_step_with_flags(&Pulp::DEF, &[("ensure_unchanged", true.into())])?;
        self.add_database_steps(composer)?;

        if !workers.is_empty() {
            composer.add_step(ServiceStart::only(workers));
        }
        Ok(())
    }

    fn add_offline_steps(&self, composer: &mut Composer<'_>) -> Result<()> {
        composer.add_steps_with_context(&[
            &ServiceStop::DEF,
            &ConfigFiles::DEF,
            &Pulp::DEF,
        ])?;

        // The dumps need a running database even though everything else
        // stays down.
        let postgresql_local = composer
            .capabilities()
            .get::<InstanceInfo>("instance")
            .is_some_and(|info| info.postgresql_local);
        if postgresql_local {
            composer.add_step(ServiceStart::only(["postgresql"]));
        }

        self.add_database_steps(composer)?;
        composer.add_steps_with_context(&[&ServiceStart::DEF])
    }
}

impl Scenario for Backup {
    fn metadata(&self) -> ScenarioMetadata {
        ScenarioMetadata {
            name: "backup",
            description: "Backup the instance",
            tags: &["backup"],
            strategy: RunStrategy::FailFast,
            manual_only: true,
            params: vec![
                ParameterSpec::new("strategy", "Backup strategy. One of [online, offline]")
                    .required(),
                ParameterSpec::new("backup_dir", "Directory where to backup to").required(),
                ParameterSpec::new("preserve_dir", "Directory to keep on cleanup"),
                ParameterSpec::new("incremental_dir", "Changes since specified backup only"),
                ParameterSpec::new("proxy_features", "List of proxy features to backup").array(),
                ParameterSpec::new("skip_pulp_content", "Skip Pulp content during backup")
                    .default_value(false),
                ParameterSpec::new("tar_volume_size", "Size of tar volume (indicates splitting)"),
                ParameterSpec::new(
                    "wait_for_tasks",
                    "Wait for running tasks to complete instead of aborting",
                )
                .default_value(false),
            ],
        }
    }

    fn context_mapping(&self) -> ContextMapping {
        let mut mapping = ContextMapping::new();
        mapping.map(
            "backup_dir",
            &[
                (&PrepareDirectory::DEF, "backup_dir"),
                (&Metadata::DEF, "backup_dir"),
                (&ConfigFiles::DEF, "backup_dir"),
                (&CompressData::DEF, "backup_dir"),
                (&Pulp::DEF, "backup_dir"),
                (&DatabaseDump::CANDLEPIN, "backup_dir"),
                (&DatabaseDump::FOREMAN, "backup_dir"),
                (&DatabaseDump::PULPCORE, "backup_dir"),
            ],
        );
        mapping.map("preserve_dir", &[(&PrepareDirectory::DEF, "preserve_dir")]);
        mapping.map(
            "incremental_dir",
            &[
                (&IncrementalParentType::DEF, "incremental_dir"),
                (&PrepareDirectory::DEF, "incremental_dir"),
                (&Metadata::DEF, "incremental_dir"),
            ],
        );
        mapping.map("proxy_features", &[(&ConfigFiles::DEF, "proxy_features")]);
        mapping.map("skip_pulp_content", &[(&Pulp::DEF, "skip")]);
        mapping.map("tar_volume_size", &[(&Pulp::DEF, "tar_volume_size")]);
        mapping.map("wait_for_tasks", &[(&TasksNotRunning::DEF, "wait_for_tasks")]);
        mapping
    }

    fn compose(&self, composer: &mut Composer<'_>) -> Result<()> {
        let strategy = self.backup_strategy(composer)?;
        let online = strategy == BackupStrategy::Online;

        composer.add_step_with_flags(
            &IncrementalParentType::DEF,
            &[("online_backup", online.into())],
        )?;
        composer.add_step_with_context(&TasksNotRunning::DEF)?;
        if strategy == BackupStrategy::Offline {
            composer.add_step_with_context(&AccessibilityConfirmation::DEF)?;
        }
        composer.add_step_with_context(&PrepareDirectory::DEF)?;
        composer.add_step_with_flags(&Metadata::DEF, &[("online_backup", online.into())])?;

        match strategy {
            BackupStrategy::Online => self.add_online_steps(composer)?,
            BackupStrategy::Offline => self.add_offline_steps(composer)?,
        }

        composer.add_step_with_context(&CompressData::DEF)
    }

    fn rescue(&self) -> Option<Box<dyn Scenario>> {
        Some(Box::new(BackupRescueCleanup))
    }
}

/// Restores services and removes partial artifacts after a failed backup.
pub struct BackupRescueCleanup;

impl Scenario for BackupRescueCleanup {
    fn metadata(&self) -> ScenarioMetadata {
        ScenarioMetadata {
            name: "backup-cleanup",
            description: "Failed backup cleanup",
            tags: &["backup"],
            strategy: RunStrategy::FailSlow,
            manual_only: true,
            params: vec![
                ParameterSpec::new("backup_dir", "Directory where to backup to").required(),
                ParameterSpec::new("preserve_dir", "Directory to keep on cleanup"),
            ],
        }
    }

    fn context_mapping(&self) -> ContextMapping {
        let mut mapping = ContextMapping::new();
        mapping.map("backup_dir", &[(&Clean::DEF, "backup_dir")]);
        mapping.map("preserve_dir", &[(&Clean::DEF, "preserve_dir")]);
        mapping
    }

    fn compose(&self, composer: &mut Composer<'_>) -> Result<()> {
        composer.add_step_with_context(&ServiceStart::DEF)?;
        composer.add_step_with_context(&Clean::DEF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{compose, ParamValues, Trigger};

    fn params(strategy: &str) -> ParamValues {
        let mut values = ParamValues::new();
        values.insert("strategy".into(), strategy.into());
        values.insert("backup_dir".into(), "/var/backup".into());
        values
    }

    fn worker_registry() -> CapabilityRegistry {
        let mut caps = CapabilityRegistry::new();
        caps.register(SidekiqWorkers {
            workers: vec!["sidekiq-worker-1".into()],
        });
        caps.register(PulpcoreWorkers {
            workers: vec!["pulpcore-worker@1".into()],
        });
        caps
    }

    #[test]
    fn offline_compose_includes_accessibility_confirmation() {
        let caps = CapabilityRegistry::new();
        let composed = compose(&Backup, &params("offline"), &caps, Trigger::Manual).unwrap();
        let ids = composed.step_ids();

        assert!(ids.contains(&"backup.accessibility-confirmation"));
        let stop = ids.iter().position(|id| *id == "service.stop").unwrap();
        let config = ids.iter().position(|id| *id == "backup.config-files").unwrap();
        let pulp = ids.iter().position(|id| *id == "backup.pulp").unwrap();
        let foreman_db = ids.iter().position(|id| *id == "backup.foreman-db").unwrap();
        let start = ids.iter().rposition(|id| *id == "service.start").unwrap();
        assert!(stop < config && config < pulp && pulp < foreman_db && foreman_db < start);
    }

    #[test]
    fn online_compose_never_asks_for_accessibility() {
        let caps = CapabilityRegistry::new();
        let composed = compose(&Backup, &params("online"), &caps, Trigger::Manual).unwrap();

        assert!(!composed
            .step_ids()
            .contains(&"backup.accessibility-confirmation"));
    }

    #[test]
    fn online_without_workers_skips_service_steps() {
        let caps = CapabilityRegistry::new();
        let composed = compose(&Backup, &params("online"), &caps, Trigger::Manual).unwrap();
        let ids = composed.step_ids();

        assert!(!ids.contains(&"service.stop"));
        assert!(!ids.contains(&"service.start"));
    }

    #[test]
    fn online_with_workers_brackets_database_dumps() {
        let composed =
            compose(&Backup, &params("online"), &worker_registry(), Trigger::Manual).unwrap();
        let ids = composed.step_ids();

        let stop = ids.iter().position(|id| *id == "service.stop").unwrap();
        let first_db = ids.iter().position(|id| *id == "backup.candlepin-db").unwrap();
        let last_db = ids.iter().position(|id| *id == "backup.pulpcore-db").unwrap();
        let start = ids.iter().position(|id| *id == "service.start").unwrap();
        assert!(stop < first_db && last_db < start);
    }

    #[test]
    fn offline_with_local_postgresql_restarts_it_before_dumps() {
        let mut caps = CapabilityRegistry::new();
        caps.register(InstanceInfo {
            postgresql_local: true,
        });
        let composed = compose(&Backup, &params("offline"), &caps, Trigger::Manual).unwrap();
        let ids = composed.step_ids();

        let starts: Vec<usize> = ids
            .iter()
            .enumerate()
            .filter(|(_, id)| **id == "service.start")
            .map(|(i, _)| i)
            .collect();
        let first_db = ids.iter().position(|id| *id == "backup.candlepin-db").unwrap();
        assert_eq!(starts.len(), 2);
        assert!(starts[0] < first_db && first_db < starts[1]);
    }

    #[test]
    fn unknown_strategy_fails_before_any_step_is_built() {
        let caps = CapabilityRegistry::new();
        let err = compose(&Backup, &params("sideways"), &caps, Trigger::Manual).unwrap_err();

        assert!(matches!(err, UpkeepError::Configuration { .. }));
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn backup_rejects_automatic_trigger() {
        let caps = CapabilityRegistry::new();
        let err = compose(&Backup, &params("online"), &caps, Trigger::Automatic).unwrap_err();
        assert!(matches!(err, UpkeepError::Configuration { .. }));
    }

    #[test]
    fn cleanup_composes_start_before_clean() {
        let caps = CapabilityRegistry::new();
        let mut values = ParamValues::new();
        values.insert("backup_dir".into(), "/var/backup".into());
        let composed =
            compose(&BackupRescueCleanup, &values, &caps, Trigger::Manual).unwrap();

        assert_eq!(composed.step_ids(), ["service.start", "backup.clean"]);
    }
}
