//! System-backed collaborator implementations.

use std::path::PathBuf;

use tracing::debug;

use crate::error::{Result, UpkeepError};
use crate::shell::{execute, execute_check, CommandOptions};

use super::{ServiceManager, TaskQueue};

/// Service manager backed by systemd.
#[derive(Debug, Clone)]
pub struct SystemdServiceManager {
    services: Vec<String>,
}

impl SystemdServiceManager {
    /// Manage the given units, listed in stop order.
    pub fn new(services: Vec<String>) -> Self {
        Self { services }
    }

    /// Whether a unit is currently active.
    pub fn is_active(name: &str) -> bool {
        execute_check(&format!("systemctl is-active --quiet {}", name), None)
    }

    fn systemctl(&self, verb: &str, name: &str) -> Result<()> {
        let command = format!("systemctl {} {}", verb, name);
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
            Ok(())
        } else {
            Err(UpkeepError::CommandFailed {
                command,
                code: result.exit_code,
            })
        }
    }
}

impl ServiceManager for SystemdServiceManager {
    fn list(&self) -> Vec<String> {
        self.services.clone()
    }

    fn stop(&self, name: &str) -> Result<()> {
        self.systemctl("stop", name)
    }

    fn start(&self, name: &str) -> Result<()> {
        self.systemctl("start", name)
    }
}

/// Task queue that reports a spool directory's entry count as the number of
/// active tasks. An absent spool reads as idle.
#[derive(Debug, Clone)]
pub struct IdleTaskQueue {
    spool: Option<PathBuf>,
}

impl IdleTaskQueue {
    /// Queue with no spool: always idle.
    pub fn new() -> Self {
        Self { spool: None }
    }

    /// Queue watching a spool directory.
    pub fn with_spool(spool: PathBuf) -> Self {
        Self { spool: Some(spool) }
    }
}

impl Default for IdleTaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue for IdleTaskQueue {
    fn active_count(&self) -> Result<usize> {
        match &self.spool {
            None => Ok(0),
            Some(dir) if !dir.exists() => Ok(0),
            Some(dir) => Ok(std::fs::read_dir(dir)?.count()),
        }
    }

    fn wait_until_idle(&self) -> Result<()> {
        use std::time::Duration;
        while self.active_count()? > 0 {
            std::thread::sleep(Duration::from_secs(1));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_queue_without_spool_is_empty() {
        let queue = IdleTaskQueue::new();
        assert_eq!(queue.active_count().unwrap(), 0);
        queue.wait_until_idle().unwrap();
    }

    #[test]
    fn spool_queue_counts_entries() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("task-1"), "").unwrap();
        std::fs::write(temp.path().join("task-2"), "").unwrap();

        let queue = IdleTaskQueue::with_spool(temp.path().to_path_buf());
        assert_eq!(queue.active_count().unwrap(), 2);
    }

    #[test]
    fn missing_spool_reads_as_idle() {
        let queue = IdleTaskQueue::with_spool(PathBuf::from("/nonexistent/spool"));
        assert_eq!(queue.active_count().unwrap(), 0);
    }
}
