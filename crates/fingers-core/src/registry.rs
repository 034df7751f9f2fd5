//! Fingers shared between instances.

use crate::finger::{FingerId, FingerRef};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Map from contact id to the live finger for that contact.
///
/// Every instance built with clones of the same registry observes the same
/// finger for a given id. An entry exists from the first contact start on any
/// of those instances until the last of them releases it.
#[derive(Debug, Clone, Default)]
pub struct FingerRegistry {
    fingers: Rc<RefCell<HashMap<FingerId, FingerRef>>>,
}

impl FingerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Live finger for `id`, if any instance tracks it.
    pub fn get(&self, id: FingerId) -> Option<FingerRef> {
        self.fingers.borrow().get(&id).cloned()
    }

    /// Check if a live finger exists for `id`.
    pub fn contains(&self, id: FingerId) -> bool {
        self.fingers.borrow().contains_key(&id)
    }

    /// Number of live fingers.
    pub fn len(&self) -> usize {
        self.fingers.borrow().len()
    }

    /// Check if no finger is live.
    pub fn is_empty(&self) -> bool {
        self.fingers.borrow().is_empty()
    }

    /// Live fingers sorted by id.
    pub fn fingers(&self) -> Vec<FingerRef> {
        let mut fingers: Vec<FingerRef> = self.fingers.borrow().values().cloned().collect();
        fingers.sort_by_key(|f| f.id());
        fingers
    }

    /// Whether two handles share the same underlying map.
    pub fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.fingers, &other.fingers)
    }

    pub(crate) fn insert(&self, finger: FingerRef) {
        self.fingers.borrow_mut().insert(finger.id(), finger);
    }

    pub(crate) fn remove(&self, id: FingerId) -> Option<FingerRef> {
        self.fingers.borrow_mut().remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finger::Finger;

    #[test]
    fn test_registry_clones_share_state() {
        let registry = FingerRegistry::new();
        let other = registry.clone();
        registry.insert(Rc::new(Finger::new(FingerId(4), 0.0, 0.0, 0.0)));

        assert!(other.contains(FingerId(4)));
        assert_eq!(other.len(), 1);
        assert!(registry.same_as(&other));
        assert!(!registry.same_as(&FingerRegistry::new()));
    }

    #[test]
    fn test_registry_remove() {
        let registry = FingerRegistry::new();
        registry.insert(Rc::new(Finger::new(FingerId(1), 0.0, 0.0, 0.0)));
        assert!(registry.remove(FingerId(1)).is_some());
        assert!(registry.remove(FingerId(1)).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registry_fingers_sorted() {
        let registry = FingerRegistry::new();
        for id in [5, 2, 9] {
            registry.insert(Rc::new(Finger::new(FingerId(id), 0.0, 0.0, 0.0)));
        }
        let ids: Vec<u32> = registry.fingers().iter().map(|f| f.id().0).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }
}
