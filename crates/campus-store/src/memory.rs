use std::collections::BTreeMap;

use crate::{SessionStore, StoreError};

/// Ephemeral store; contents are lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_clear_cycle() {
        let mut store = MemoryStore::new();
        store.set("quizCompleted", "true").unwrap();
        assert_eq!(store.get("quizCompleted").unwrap().as_deref(), Some("true"));

        store.clear("quizCompleted").unwrap();
        store.clear("quizCompleted").unwrap();
        assert!(store.get("quizCompleted").unwrap().is_none());
        assert!(store.is_empty());
    }
}
