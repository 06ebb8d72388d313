//! External collaborators handed to running steps.
//!
//! The orchestration core never touches services, task queues, or the
//! terminal directly; steps reach them through the narrow traits bundled in
//! [`Runtime`]. Real implementations live in [`system`], test doubles in
//! [`testing`].

pub mod system;
pub mod testing;

pub use system::{IdleTaskQueue, SystemdServiceManager};

use crate::error::Result;
use crate::ui::UserInterface;

/// Collaborator bundle available to a step's `run`.
pub struct Runtime<'a> {
    /// Operator interaction surface.
    pub ui: &'a mut dyn UserInterface,
    /// Service lifecycle control.
    pub services: &'a dyn ServiceManager,
    /// Background task queue visibility.
    pub tasks: &'a dyn TaskQueue,
}

impl<'a> Runtime<'a> {
    pub fn new(
        ui: &'a mut dyn UserInterface,
        services: &'a dyn ServiceManager,
        tasks: &'a dyn TaskQueue,
    ) -> Self {
        Self {
            ui,
            services,
            tasks,
        }
    }
}

/// Lifecycle control over the managed services.
pub trait ServiceManager {
    /// All managed service names, in stop order. Start order is the
    /// reverse.
    fn list(&self) -> Vec<String>;

    /// Stop one service.
    fn stop(&self, name: &str) -> Result<()>;

    /// Start one service.
    fn start(&self, name: &str) -> Result<()>;
}

/// Visibility into the background task queue.
pub trait TaskQueue {
    /// Number of currently active tasks.
    fn active_count(&self) -> Result<usize>;

    /// Block until the queue drains. Bounded-wait behavior is the
    /// implementation's responsibility; the executor only sees the eventual
    /// outcome.
    fn wait_until_idle(&self) -> Result<()>;
}
