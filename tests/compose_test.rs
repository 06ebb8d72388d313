//! Integration tests for scenario composition and execution.

use upkeep::capability::CapabilityRegistry;
use upkeep::context::ContextMapping;
use upkeep::definitions::capabilities::{InstanceInfo, PulpcoreWorkers, SidekiqWorkers};
use upkeep::definitions::scenarios::Backup;
use upkeep::error::Result;
use upkeep::executor::RunStrategy;
use upkeep::runtime::testing::{RecordingServiceManager, StaticTaskQueue};
use upkeep::runtime::Runtime;
use upkeep::scenario::{
    compose, Composer, ParamValues, ParameterSpec, Scenario, ScenarioMetadata, Trigger,
};
use upkeep::step::{Outcome, Step, StepDef};
use upkeep::ui::MockUi;

fn backup_params(strategy: &str, backup_dir: &str) -> ParamValues {
    let mut values = ParamValues::new();
    values.insert("strategy".into(), strategy.into());
    values.insert("backup_dir".into(), backup_dir.into());
    values
}

#[test]
fn offline_backup_orders_stop_archive_dump_start() {
    let caps = CapabilityRegistry::new();
    let composed = compose(
        &Backup,
        &backup_params("offline", "/var/backup"),
        &caps,
        Trigger::Manual,
    )
    .unwrap();
    let ids = composed.step_ids();

    let pos = |id: &str| ids.iter().position(|s| *s == id).unwrap();
    assert!(ids.contains(&"backup.accessibility-confirmation"));
    assert!(pos("service.stop") < pos("backup.config-files"));
    assert!(pos("backup.config-files") < pos("backup.pulp"));
    assert!(pos("backup.pulp") < pos("backup.candlepin-db"));
    assert!(pos("backup.candlepin-db") < pos("backup.foreman-db"));
    assert!(pos("backup.foreman-db") < pos("backup.pulpcore-db"));
    assert!(pos("backup.pulpcore-db") < ids.iter().rposition(|s| *s == "service.start").unwrap());
    assert_eq!(*ids.last().unwrap(), "backup.compress-data");
}

#[test]
fn online_backup_with_workers_stops_them_around_the_dumps() {
    let mut caps = CapabilityRegistry::new();
    caps.register(SidekiqWorkers {
        workers: vec!["sidekiq-worker-1".into(), "sidekiq-worker-2".into()],
    });
    caps.register(PulpcoreWorkers {
        workers: vec!["pulpcore-worker@1".into()],
    });

    let composed = compose(
        &Backup,
        &backup_params("online", "/var/backup"),
        &caps,
        Trigger::Manual,
    )
    .unwrap();
    let ids = composed.step_ids();

    assert!(!ids.contains(&"backup.accessibility-confirmation"));
    let stop = ids.iter().position(|s| *s == "service.stop").unwrap();
    let start = ids.iter().position(|s| *s == "service.start").unwrap();
    for db in ["backup.candlepin-db", "backup.foreman-db", "backup.pulpcore-db"] {
        let dump = ids.iter().position(|s| *s == db).unwrap();
        assert!(stop < dump && dump < start);
    }
}

#[test]
fn offline_backup_restarts_a_local_postgresql_for_the_dumps() {
    let mut caps = CapabilityRegistry::new();
    caps.register(InstanceInfo {
        postgresql_local: true,
    });

    let composed = compose(
        &Backup,
        &backup_params("offline", "/var/backup"),
        &caps,
        Trigger::Manual,
    )
    .unwrap();
    let ids = composed.step_ids();

    let starts: Vec<usize> = ids
        .iter()
        .enumerate()
        .filter(|(_, s)| **s == "service.start")
        .map(|(i, _)| i)
        .collect();
    let first_dump = ids.iter().position(|s| *s == "backup.candlepin-db").unwrap();
    assert_eq!(starts.len(), 2);
    assert!(starts[0] < first_dump);
    assert!(first_dump < starts[1]);
}

#[test]
fn invalid_strategy_aborts_before_composition() {
    let caps = CapabilityRegistry::new();
    let err = compose(
        &Backup,
        &backup_params("eventually", "/var/backup"),
        &caps,
        Trigger::Manual,
    )
    .unwrap_err();

    assert!(matches!(err, upkeep::UpkeepError::Configuration { .. }));
}

#[test]
fn missing_required_parameter_aborts_before_composition() {
    let caps = CapabilityRegistry::new();
    let mut values = ParamValues::new();
    values.insert("strategy".into(), "online".into());

    let err = compose(&Backup, &values, &caps, Trigger::Manual).unwrap_err();
    assert!(err.to_string().contains("backup_dir"));
}

// A step type whose instances remember the value they were constructed
// with, by writing it back into the context when run.
const CAPTURE: StepDef = StepDef {
    id: "test.capture",
    required_keys: &["dir"],
    build: |args| {
        let bound = args.get_str("dir").unwrap_or_default().to_string();
        Ok(Step::procedure_fn("test.capture", move |_rt, ctx| {
            ctx.set("captured", bound.clone());
            Ok(Outcome::Success)
        }))
    },
};

struct Capturing;

impl Scenario for Capturing {
    fn metadata(&self) -> ScenarioMetadata {
        ScenarioMetadata {
            name: "capturing",
            description: "records its bound parameter",
            tags: &[],
            strategy: RunStrategy::FailFast,
            manual_only: false,
            params: vec![ParameterSpec::new("target", "target directory").required()],
        }
    }

    fn context_mapping(&self) -> ContextMapping {
        let mut mapping = ContextMapping::new();
        mapping.map("target", &[(&CAPTURE, "dir")]);
        mapping
    }

    fn compose(&self, composer: &mut Composer<'_>) -> Result<()> {
        composer.add_step_with_context(&CAPTURE)
    }
}

#[test]
fn mapping_binds_the_current_value_at_each_composition() {
    let caps = CapabilityRegistry::new();
    let services = RecordingServiceManager::default();
    let tasks = StaticTaskQueue::default();

    let mut captured = Vec::new();
    for target in ["/var/backup/a", "/var/backup/b"] {
        let mut values = ParamValues::new();
        values.insert("target".into(), target.into());
        let mut composed = compose(&Capturing, &values, &caps, Trigger::Manual).unwrap();

        let mut ui = MockUi::new();
        let mut rt = Runtime::new(&mut ui, &services, &tasks);
        let report = composed.execute(&mut rt);
        assert!(report.success());
        captured.push(composed.context.get_str("captured").unwrap().to_string());
    }

    assert_eq!(captured, ["/var/backup/a", "/var/backup/b"]);
}
