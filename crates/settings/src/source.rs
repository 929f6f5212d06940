use crate::errors::StoreError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Memory,
    File,
    Browser,
}

/// A single durable key/value backend.
///
/// Mirrors the shape of the web storage API so native and browser backends
/// are interchangeable behind the persistence adapter.
pub trait SnapshotStore {
    fn kind(&self) -> StoreKind;

    /// Capability check. An unavailable store is skipped entirely by callers.
    fn is_available(&self) -> bool {
        true
    }

    /// Read the raw value stored under `key`, `None` if absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove_item(&mut self, key: &str) -> Result<(), StoreError>;
}
