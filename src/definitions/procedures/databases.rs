//! Database dump procedures.
//!
//! One shared procedure type parameterized by database name; each database
//! gets its own `StepDef` so scenarios compose and map them individually.

use std::path::PathBuf;

use tracing::debug;

use crate::context::{Context, ResolvedArgs};
use crate::error::Result;
use crate::runtime::Runtime;
use crate::shell::{execute, CommandOptions};
use crate::step::{Outcome, Procedure, Step, StepDef, StepInfo};

/// Dumps one PostgreSQL database into the backup directory.
pub struct DatabaseDump {
    id: &'static str,
    database: &'static str,
    backup_dir: PathBuf,
}

impl DatabaseDump {
    pub const CANDLEPIN: StepDef = StepDef {
        id: "backup.candlepin-db",
        required_keys: &["backup_dir"],
        build: |args| DatabaseDump::build("backup.candlepin-db", "candlepin", args),
    };

    pub const FOREMAN: StepDef = StepDef {
        id: "backup.foreman-db",
        required_keys: &["backup_dir"],
        build: |args| DatabaseDump::build("backup.foreman-db", "foreman", args),
    };

    pub const PULPCORE: StepDef = StepDef {
        id: "backup.pulpcore-db",
        required_keys: &["backup_dir"],
        build: |args| DatabaseDump::build("backup.pulpcore-db", "pulpcore", args),
    };

    fn build(id: &'static str, database: &'static str, args: &ResolvedArgs) -> Result<Step> {
        Ok(Step::procedure(DatabaseDump {
            id,
            database,
            backup_dir: args.require_path(id, "backup_dir")?,
        }))
    }
}

impl Procedure for DatabaseDump {
    fn info(&self) -> StepInfo {
        StepInfo::new(self.id, format!("Backup {} database", self.database))
    }

    fn run(&self, _rt: &mut Runtime<'_>, ctx: &mut Context) -> Result<Outcome> {
        let dir = ctx
            .get_str("backup_dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| self.backup_dir.clone());
        let target = dir.join(format!("{}.dump", self.database));

        let command = format!(
            "pg_dump --format=custom --file {} {}",
            target.display(),
            self.database
        );
        debug!("running {}", command);
        let result = execute(
            &command,
            &CommandOptions {
                capture_stdout: true,
                capture_stderr: true,
                ..Default::default()
            },
        )?;

        if result.success {
            Ok(Outcome::Success)
        } else {
            Ok(Outcome::Failure(format!(
                "pg_dump of {} exited with {:?}: {}",
                self.database,
                result.exit_code,
                result.stderr.trim()
            )))
        }
    }
}
