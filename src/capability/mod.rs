//! Runtime capability probes used for conditional composition.
//!
//! The composer branches on what the host actually has (a local database,
//! configured background workers) through an explicitly injected
//! [`CapabilityRegistry`] rather than ambient process-wide state,
//! so composition stays deterministic and testable without global
//! setup/teardown.

use std::any::Any;
use std::collections::BTreeMap;

/// One detected capability of the host system.
///
/// Concrete capability types carry their own data (worker lists, locality
/// flags) and are recovered by type through [`CapabilityRegistry::get`].
pub trait Capability: Any {
    /// Registry name this capability is looked up under.
    fn name(&self) -> &'static str;

    /// Upcast for typed downcasting in `get`.
    fn as_any(&self) -> &dyn Any;
}

/// Registry of detected capabilities, injected into scenario composition.
#[derive(Default)]
pub struct CapabilityRegistry {
    capabilities: BTreeMap<&'static str, Box<dyn Capability>>,
}

impl CapabilityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a detected capability, replacing any previous entry with
    /// the same name.
    pub fn register(&mut self, capability: impl Capability + 'static) {
        self.capabilities
            .insert(capability.name(), Box::new(capability));
    }

    /// Whether a capability is present.
    pub fn has(&self, name: &str) -> bool {
        self.capabilities.contains_key(name)
    }

    /// Typed lookup. Returns `None` when the capability is absent or
    /// registered under a different concrete type.
    pub fn get<T: Capability>(&self, name: &str) -> Option<&T> {
        self.capabilities
            .get(name)
            .and_then(|c| c.as_any().downcast_ref::<T>())
    }

    /// Names of all registered capabilities.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.capabilities.keys().copied()
    }
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("names", &self.capabilities.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Workers {
        services: Vec<String>,
    }

    impl Capability for Workers {
        fn name(&self) -> &'static str {
            "workers"
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct Locality {
        local: bool,
    }

    impl Capability for Locality {
        fn name(&self) -> &'static str {
            "instance"
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn registered_capability_is_found_by_name_and_type() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Workers {
            services: vec!["sidekiq-worker-1".into()],
        });

        assert!(registry.has("workers"));
        let workers: &Workers = registry.get("workers").unwrap();
        assert_eq!(workers.services, vec!["sidekiq-worker-1".to_string()]);
    }

    #[test]
    fn missing_capability_is_absent() {
        let registry = CapabilityRegistry::new();
        assert!(!registry.has("instance"));
        assert!(registry.get::<Locality>("instance").is_none());
    }

    #[test]
    fn lookup_under_wrong_type_returns_none() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Locality { local: true });

        assert!(registry.get::<Workers>("instance").is_none());
        assert!(registry.get::<Locality>("instance").is_some_and(|l| l.local));
    }

    #[test]
    fn re_registration_replaces_entry() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Locality { local: false });
        registry.register(Locality { local: true });

        assert!(registry.get::<Locality>("instance").unwrap().local);
        assert_eq!(registry.names().count(), 1);
    }
}
