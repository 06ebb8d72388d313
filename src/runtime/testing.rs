//! Collaborator test doubles.
//!
//! Public (not `cfg(test)`) so integration tests under `tests/` can drive
//! scenario runs without touching systemd or a real task queue.

use std::cell::RefCell;
use std::collections::BTreeSet;

use crate::error::{Result, UpkeepError};

use super::{ServiceManager, TaskQueue};

/// Service manager that records every stop/start call.
#[derive(Debug, Default)]
pub struct RecordingServiceManager {
    services: Vec<String>,
    failing: BTreeSet<String>,
    actions: RefCell<Vec<(String, String)>>,
}

impl RecordingServiceManager {
    /// Manage the given service names.
    pub fn new<I, S>(services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            services: services.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Make stop/start of one service fail.
    pub fn fail_on(&mut self, name: &str) {
        self.failing.insert(name.to_string());
    }

    /// Recorded `(verb, service)` pairs, in call order.
    pub fn actions(&self) -> Vec<(String, String)> {
        self.actions.borrow().clone()
    }

    fn record(&self, verb: &str, name: &str) -> Result<()> {
        self.actions
            .borrow_mut()
            .push((verb.to_string(), name.to_string()));
        if self.failing.contains(name) {
            return Err(UpkeepError::CommandFailed {
                command: format!("systemctl {} {}", verb, name),
                code: Some(1),
            });
        }
        Ok(())
    }
}

impl ServiceManager for RecordingServiceManager {
    fn list(&self) -> Vec<String> {
        self.services.clone()
    }

    fn stop(&self, name: &str) -> Result<()> {
        self.record("stop", name)
    }

    fn start(&self, name: &str) -> Result<()> {
        self.record("start", name)
    }
}

/// Task queue with a fixed active count. `wait_until_idle` drains it.
#[derive(Debug, Default)]
pub struct StaticTaskQueue {
    active: RefCell<usize>,
    waited: RefCell<bool>,
}

impl StaticTaskQueue {
    /// Queue reporting `active` running tasks.
    pub fn with_active(active: usize) -> Self {
        Self {
            active: RefCell::new(active),
            waited: RefCell::new(false),
        }
    }

    /// Whether `wait_until_idle` was called.
    pub fn waited(&self) -> bool {
        *self.waited.borrow()
    }
}

impl TaskQueue for StaticTaskQueue {
    fn active_count(&self) -> Result<usize> {
        Ok(*self.active.borrow())
    }

    fn wait_until_idle(&self) -> Result<()> {
        *self.waited.borrow_mut() = true;
        *self.active.borrow_mut() = 0;
        Ok(())
    }
}
