//! Concrete capability types the backup scenario branches on.

use std::any::Any;

use crate::capability::{Capability, CapabilityRegistry};
use crate::runtime::SystemdServiceManager;

/// Facts about the instance this host runs.
#[derive(Debug, Clone)]
pub struct InstanceInfo {
    /// Whether the PostgreSQL server lives on this host.
    pub postgresql_local: bool,
}

impl Capability for InstanceInfo {
    fn name(&self) -> &'static str {
        "instance"
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Sidekiq-style background worker units configured on this host.
#[derive(Debug, Clone)]
pub struct SidekiqWorkers {
    pub workers: Vec<String>,
}

impl Capability for SidekiqWorkers {
    fn name(&self) -> &'static str {
        "sidekiq"
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Pulpcore content worker units configured on this host.
#[derive(Debug, Clone)]
pub struct PulpcoreWorkers {
    pub workers: Vec<String>,
}

impl Capability for PulpcoreWorkers {
    fn name(&self) -> &'static str {
        "pulpcore"
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Probe the local system and build the capability registry the CLI
/// composes scenarios against.
pub fn detect_system() -> CapabilityRegistry {
    let mut registry = CapabilityRegistry::new();

    registry.register(InstanceInfo {
        postgresql_local: SystemdServiceManager::is_active("postgresql"),
    });

    let sidekiq: Vec<String> = (1..=2)
        .map(|n| format!("sidekiq-worker-{}", n))
        .filter(|unit| SystemdServiceManager::is_active(unit))
        .collect();
    if !sidekiq.is_empty() {
        registry.register(SidekiqWorkers { workers: sidekiq });
    }

    let pulpcore: Vec<String> = (1..=2)
        .map(|n| format!("pulpcore-worker@{}", n))
        .filter(|unit| SystemdServiceManager::is_active(unit))
        .collect();
    if !pulpcore.is_empty() {
        registry.register(PulpcoreWorkers { workers: pulpcore });
    }

    registry
}
