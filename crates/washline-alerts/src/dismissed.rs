//! Operator-local, non-durable alert dismissals.

use std::collections::HashSet;

/// Ids the operator has hidden.
///
/// Insert-only: there is no removal API, so the set only grows for the
/// lifetime of its owner. Nothing is persisted or sent upstream.
#[derive(Debug, Clone, Default)]
pub struct DismissedSet {
    ids: HashSet<String>,
}

impl DismissedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide `id`. Returns `true` if it was not dismissed before.
    pub fn dismiss(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dismiss_is_idempotent() {
        let mut once = DismissedSet::new();
        once.dismiss("a");

        let mut twice = DismissedSet::new();
        assert!(twice.dismiss("a"));
        assert!(!twice.dismiss("a"));

        assert_eq!(once.len(), twice.len());
        assert!(twice.contains("a"));
    }

    #[test]
    fn test_size_never_decreases() {
        let mut set = DismissedSet::new();
        let mut last = set.len();
        for id in ["a", "b", "a", "c", "b", "d"] {
            set.dismiss(id);
            assert!(set.len() >= last);
            last = set.len();
        }
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_empty() {
        let set = DismissedSet::new();
        assert!(set.is_empty());
        assert!(!set.contains("anything"));
    }
}
