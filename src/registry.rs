use std::{collections::HashMap, sync::RwLock};

use crate::{ComponentId, ComponentType};

/// Process-lifetime map from component identity to its declared type.
///
/// Written during the bounded, startup-time construction phase (one
/// [`record`](ManagedTypeRegistry::record) per component, from whichever
/// thread constructs it) and read at wrap time. Entries are never removed;
/// re-recording the same identity is an idempotent overwrite.
#[derive(Debug, Default)]
pub struct ManagedTypeRegistry {
    entries: RwLock<HashMap<ComponentId, ComponentType>>,
}

impl ManagedTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the mapping, but only when the declared type carries the
    /// profiling marker. Recording an unmarked type is a silent no-op, not
    /// an error.
    pub fn record(&self, id: &ComponentId, declared: ComponentType) {
        if !declared.is_managed() {
            return;
        }
        let mut entries = self.entries.write().expect("registry lock poisoned");
        entries.insert(id.clone(), declared);
    }

    /// Pure read; absent when the identity was never recorded or its type
    /// was not managed.
    pub fn lookup(&self, id: &ComponentId) -> Option<ComponentType> {
        let entries = self.entries.read().expect("registry lock poisoned");
        entries.get(id).copied()
    }

    /// Number of managed identities recorded so far.
    pub fn len(&self) -> usize {
        self.entries.read().expect("registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::WrapFn;

    fn managed(name: &'static str) -> ComponentType {
        let wrap: WrapFn = |target, _| Ok(target);
        ComponentType::managed(name, &[], wrap)
    }

    #[test]
    fn test_record_and_lookup() {
        let registry = ManagedTypeRegistry::new();
        let id = ComponentId::from("exchange");
        registry.record(&id, managed("Exchange"));

        let declared = registry.lookup(&id).expect("entry missing");
        assert_eq!(declared.name(), "Exchange");
    }

    #[test]
    fn test_unmarked_type_is_not_recorded() {
        let registry = ManagedTypeRegistry::new();
        let id = ComponentId::from("plain");
        registry.record(&id, ComponentType::plain("Plain"));

        assert!(registry.lookup(&id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup_of_unknown_identity() {
        let registry = ManagedTypeRegistry::new();
        assert!(registry.lookup(&ComponentId::from("ghost")).is_none());
    }

    #[test]
    fn test_concurrent_record_loses_no_entries() {
        let registry = Arc::new(ManagedTypeRegistry::new());
        let mut handles = Vec::new();

        for worker in 0..8 {
            let registry = registry.clone();
            handles.push(std::thread::spawn(move || {
                for n in 0..50 {
                    let id = ComponentId::from(format!("component-{worker}-{n}"));
                    registry.record(&id, managed("Exchange"));
                }
            }));
        }
        for handle in handles {
            handle.join().expect("record thread panicked");
        }

        assert_eq!(registry.len(), 8 * 50);
    }
}
