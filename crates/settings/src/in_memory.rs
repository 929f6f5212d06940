use std::collections::HashMap;

use crate::errors::StoreError;
use crate::source::{SnapshotStore, StoreKind};

/// MemoryStore: process-local store, mainly for tests and headless runs.
///
/// An optional byte quota (sum of key and value lengths across all entries)
/// makes it behave like a browser store that is close to full.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
    quota: Option<usize>,
    available: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            quota: None,
            available: true,
        }
    }

    /// Store that rejects writes once the total stored bytes would exceed `quota`.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::new()
        }
    }

    /// Store for environments without any durable storage.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Seed an entry without quota checks (simulates data left by an earlier session).
    pub fn seed(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.items.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for MemoryStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Memory
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        if !self.available {
            return Err(StoreError::Unavailable(self.kind()));
        }
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if !self.available {
            return Err(StoreError::Unavailable(self.kind()));
        }
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StoreError::QuotaExceeded { needed });
            }
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        if !self.available {
            return Err(StoreError::Unavailable(self.kind()));
        }
        self.items.remove(key);
        Ok(())
    }
}
