//! Backup procedures: directory preparation, metadata, config files, Pulp
//! content, compression, and the cleanup used by the rescue scenario.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::Context;
use crate::error::{Result, UpkeepError};
use crate::runtime::Runtime;
use crate::shell::{execute, CommandOptions};
use crate::step::{Outcome, Procedure, Step, StepDef, StepInfo};

/// File name of the metadata document written into every backup directory.
pub const METADATA_FILE: &str = "metadata.json";

/// Configuration paths swept into the config-files archive when present.
const CONFIG_PATHS: &[&str] = &["/etc/foreman", "/etc/foreman-proxy", "/etc/httpd", "/etc/pulp"];

/// Metadata document describing one backup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupMetadata {
    /// Whether the backup was taken with the online strategy.
    pub online_backup: bool,
    /// Parent backup directory for incremental backups.
    pub incremental_of: Option<String>,
    /// When the backup started.
    pub started_at: DateTime<Utc>,
}

impl BackupMetadata {
    /// Read the metadata document from a backup directory.
    pub fn read_from(dir: &Path) -> Result<Self> {
        let raw = fs::read_to_string(dir.join(METADATA_FILE))?;
        serde_json::from_str(&raw).map_err(|e| UpkeepError::StepExecution {
            step: "backup.metadata".into(),
            message: format!("invalid metadata in {}: {}", dir.display(), e),
        })
    }

    /// Write the metadata document into a backup directory.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self).map_err(|e| UpkeepError::StepExecution {
            step: "backup.metadata".into(),
            message: format!("cannot serialize metadata: {}", e),
        })?;
        fs::write(dir.join(METADATA_FILE), raw)?;
        Ok(())
    }
}

/// Asks the operator to confirm the backup directory is reachable before an
/// offline backup shuts services down.
pub struct AccessibilityConfirmation;

impl AccessibilityConfirmation {
    pub const DEF: StepDef = StepDef {
        id: "backup.accessibility-confirmation",
        required_keys: &[],
        build: |_args| Ok(Step::procedure(AccessibilityConfirmation)),
    };
}

impl Procedure for AccessibilityConfirmation {
    fn info(&self) -> StepInfo {
        StepInfo::new(Self::DEF.id, "Confirm backup directory is accessible")
    }

    fn run(&self, rt: &mut Runtime<'_>, _ctx: &mut Context) -> Result<Outcome> {
        let confirmed = rt.ui.confirm(
            "accessibility-confirmation",
            "An offline backup stops all services. The backup directory must stay \
             accessible from this host for the whole run. Proceed?",
            true,
        )?;
        if confirmed {
            Ok(Outcome::Success)
        } else {
            Ok(Outcome::Failure("offline backup was not confirmed".into()))
        }
    }
}

/// Creates the backup directory and publishes its resolved path for later
/// steps.
pub struct PrepareDirectory {
    backup_dir: PathBuf,
    incremental_dir: Option<PathBuf>,
}

impl PrepareDirectory {
    pub const DEF: StepDef = StepDef {
        id: "backup.prepare-directory",
        required_keys: &["backup_dir"],
        build: |args| {
            Ok(Step::procedure(PrepareDirectory {
                backup_dir: args.require_path("backup.prepare-directory", "backup_dir")?,
                incremental_dir: args.get_path("incremental_dir"),
            }))
        },
    };
}

impl Procedure for PrepareDirectory {
    fn info(&self) -> StepInfo {
        StepInfo::new(Self::DEF.id, "Prepare backup directory")
    }

    fn run(&self, _rt: &mut Runtime<'_>, ctx: &mut Context) -> Result<Outcome> {
        if let Some(parent) = &self.incremental_dir {
            if !parent.is_dir() {
                return Ok(Outcome::Failure(format!(
                    "incremental parent '{}' does not exist",
                    parent.display()
                )));
            }
        }

        fs::create_dir_all(&self.backup_dir)?;

        // Later steps and the rescue scenario see the resolved path.
        let resolved = self.backup_dir.canonicalize()?;
        ctx.set("backup_dir", resolved.to_string_lossy().to_string());
        Ok(Outcome::Success)
    }
}

/// Writes the backup's metadata document.
pub struct Metadata {
    backup_dir: PathBuf,
    online_backup: bool,
    incremental_dir: Option<PathBuf>,
}

impl Metadata {
    pub const DEF: StepDef = StepDef {
        id: "backup.metadata",
        required_keys: &["backup_dir"],
        build: |args| {
            Ok(Step::procedure(Metadata {
                backup_dir: args.require_path("backup.metadata", "backup_dir")?,
                online_backup: args.get_bool("online_backup"),
                incremental_dir: args.get_path("incremental_dir"),
            }))
        },
    };
}

impl Procedure for Metadata {
    fn info(&self) -> StepInfo {
        StepInfo::new(Self::DEF.id, "Write backup metadata")
    }

    fn run(&self, _rt: &mut Runtime<'_>, ctx: &mut Context) -> Result<Outcome> {
        let dir = ctx
            .get_str("backup_dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| self.backup_dir.clone());
        let metadata = BackupMetadata {
            online_backup: self.online_backup,
            incremental_of: self
                .incremental_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            started_at: Utc::now(),
        };
        metadata.write_to(&dir)?;
        Ok(Outcome::Success)
    }
}

/// Archives configuration files into the backup directory.
pub struct ConfigFiles {
    backup_dir: PathBuf,
    proxy_features: Vec<String>,
    ignore_changed_files: bool,
}

impl ConfigFiles {
    pub const DEF: StepDef = StepDef {
        id: "backup.config-files",
        required_keys: &["backup_dir"],
        build: |args| {
            Ok(Step::procedure(ConfigFiles {
                backup_dir: args.require_path("backup.config-files", "backup_dir")?,
                proxy_features: args.get_list("proxy_features"),
                ignore_changed_files: args.get_bool("ignore_changed_files"),
            }))
        },
    };

    fn archive_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = CONFIG_PATHS.iter().map(|p| p.to_string()).collect();
        for feature in &self.proxy_features {
            paths.push(format!("/etc/foreman-proxy/settings.d/{}.yml", feature));
        }
        paths.retain(|p| Path::new(p).exists());
        paths
    }
}

impl Procedure for ConfigFiles {
    fn info(&self) -> StepInfo {
        StepInfo::new(Self::DEF.id, "Backup config files")
    }

    fn run(&self, _rt: &mut Runtime<'_>, _ctx: &mut Context) -> Result<Outcome> {
        let paths = self.archive_paths();
        if paths.is_empty() {
            return Ok(Outcome::Skipped("no config paths present".into()));
        }

        let archive = self.backup_dir.join("config_files.tar.gz");
        let command = format!("tar czf {} {}", archive.display(), paths.join(" "));
        debug!("running {}", command);
        let result = execute(
            &command,
            &CommandOptions {
                capture_stdout: true,
                capture_stderr: true,
                ..Default::default()
            },
        )?;

        match result.exit_code {
            Some(0) => Ok(Outcome::Success),
            // tar exits 1 when files changed while being read
            Some(1) if self.ignore_changed_files => Ok(Outcome::Warning(
                "some config files changed during the online backup".into(),
            )),
            code => Ok(Outcome::Failure(format!(
                "tar exited with {:?}: {}",
                code,
                result.stderr.trim()
            ))),
        }
    }
}

/// Archives Pulp content, honoring the skip and volume-splitting options.
pub struct Pulp {
    backup_dir: PathBuf,
    skip: bool,
    ensure_unchanged: bool,
    tar_volume_size: Option<String>,
}

impl Pulp {
    /// Content directory archived by this procedure.
    const PULP_DATA_DIR: &'static str = "/var/lib/pulp";

    pub const DEF: StepDef = StepDef {
        id: "backup.pulp",
        required_keys: &["backup_dir"],
        build: |args| {
            Ok(Step::procedure(Pulp {
                backup_dir: args.require_path("backup.pulp", "backup_dir")?,
                skip: args.get_bool("skip"),
                ensure_unchanged: args.get_bool("ensure_unchanged"),
                tar_volume_size: args.get_str("tar_volume_size").map(str::to_string),
            }))
        },
    };
}

impl Procedure for Pulp {
    fn info(&self) -> StepInfo {
        StepInfo::new(Self::DEF.id, "Backup Pulp content")
    }

    fn run(&self, _rt: &mut Runtime<'_>, _ctx: &mut Context) -> Result<Outcome> {
        if self.skip {
            return Ok(Outcome::Skipped("pulp content skipped".into()));
        }
        if !Path::new(Self::PULP_DATA_DIR).is_dir() {
            return Ok(Outcome::Skipped("no pulp content directory".into()));
        }

        let archive = self.backup_dir.join("pulp_data.tar");
        let mut command = format!(
            "tar cf {} -C {} .",
            archive.display(),
            Self::PULP_DATA_DIR
        );
        if let Some(size) = &self.tar_volume_size {
            command.push_str(&format!(" --multi-volume --tape-length {}", size));
        }

        let result = execute(
            &command,
            &CommandOptions {
                capture_stdout: true,
                capture_stderr: true,
                ..Default::default()
            },
        )?;

        match result.exit_code {
            Some(0) => Ok(Outcome::Success),
            Some(1) if !self.ensure_unchanged => Ok(Outcome::Warning(
                "pulp content changed while being archived".into(),
            )),
            code => Ok(Outcome::Failure(format!(
                "tar exited with {:?}: {}",
                code,
                result.stderr.trim()
            ))),
        }
    }
}

/// Compresses the database dumps left in the backup directory.
pub struct CompressData {
    backup_dir: PathBuf,
}

impl CompressData {
    pub const DEF: StepDef = StepDef {
        id: "backup.compress-data",
        required_keys: &["backup_dir"],
        build: |args| {
            Ok(Step::procedure(CompressData {
                backup_dir: args.require_path("backup.compress-data", "backup_dir")?,
            }))
        },
    };
}

impl Procedure for CompressData {
    fn info(&self) -> StepInfo {
        StepInfo::new(Self::DEF.id, "Compress backup data")
    }

    fn run(&self, _rt: &mut Runtime<'_>, ctx: &mut Context) -> Result<Outcome> {
        // Prefer the path resolved by the prepare step.
        let dir = ctx
            .get_str("backup_dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| self.backup_dir.clone());

        let mut dumps = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "dump") {
                dumps.push(path);
            }
        }
        if dumps.is_empty() {
            return Ok(Outcome::Skipped("no database dumps to compress".into()));
        }

        for dump in dumps {
            let command = format!("gzip -f {}", dump.display());
            let result = execute(
                &command,
                &CommandOptions {
                    capture_stdout: true,
                    capture_stderr: true,
                    ..Default::default()
                },
            )?;
            if !result.success {
                return Ok(Outcome::Failure(format!(
                    "gzip exited with {:?}: {}",
                    result.exit_code,
                    result.stderr.trim()
                )));
            }
        }
        Ok(Outcome::Success)
    }
}

/// Deletes a failed backup's partial artifacts, honoring a preserved
/// directory. Used by the rescue scenario, so it tolerates a context that
/// was never fully populated.
pub struct Clean {
    backup_dir: PathBuf,
    preserve_dir: Option<PathBuf>,
}

impl Clean {
    pub const DEF: StepDef = StepDef {
        id: "backup.clean",
        required_keys: &["backup_dir"],
        build: |args| {
            Ok(Step::procedure(Clean {
                backup_dir: args.require_path("backup.clean", "backup_dir")?,
                preserve_dir: args.get_path("preserve_dir"),
            }))
        },
    };
}

impl Procedure for Clean {
    fn info(&self) -> StepInfo {
        StepInfo::new(Self::DEF.id, "Clean up failed backup")
    }

    fn run(&self, rt: &mut Runtime<'_>, _ctx: &mut Context) -> Result<Outcome> {
        if !self.backup_dir.exists() {
            return Ok(Outcome::Skipped("nothing to clean".into()));
        }
        if self
            .preserve_dir
            .as_ref()
            .is_some_and(|p| p == &self.backup_dir)
        {
            return Ok(Outcome::Skipped("backup directory is preserved".into()));
        }

        fs::remove_dir_all(&self.backup_dir)?;
        rt.ui
            .message(&format!("Removed {}", self.backup_dir.display()));
        Ok(Outcome::Success)
    }
}
