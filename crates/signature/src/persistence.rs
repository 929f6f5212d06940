//! Durable snapshot of the form, kept under a single store key.
//!
//! All failures are absorbed here and logged. Corrupt or oversized data is
//! removed so the next session starts clean.

use serde_json::Value;
use settings::SnapshotStore;

use crate::form::{FormState, Snapshot};

/// Key the serialized form lives under.
pub const STORAGE_KEY: &str = "signatureBuilderState";

/// Snapshots larger than this are neither read nor written.
pub const MAX_SNAPSHOT_BYTES: usize = 1024 * 1024;

pub struct PersistenceAdapter<S> {
    store: S,
    key: String,
    max_bytes: usize,
}

impl<S: SnapshotStore> PersistenceAdapter<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: STORAGE_KEY.to_string(),
            max_bytes: MAX_SNAPSHOT_BYTES,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Load the stored snapshot. Missing, oversized or corrupt data yields an
    /// empty snapshot.
    pub fn read(&mut self) -> Snapshot {
        if !self.store.is_available() {
            return Snapshot::new();
        }

        let raw = match self.store.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Snapshot::new(),
            Err(err) => {
                tracing::warn!("unable to read stored form state: {err}");
                self.clear();
                return Snapshot::new();
            }
        };

        if raw.len() > self.max_bytes {
            tracing::warn!(
                "stored form state is {} bytes (limit {}), clearing",
                raw.len(),
                self.max_bytes
            );
            self.clear();
            return Snapshot::new();
        }

        match parse_snapshot(&raw) {
            Some(snapshot) => snapshot,
            None => {
                tracing::warn!("stored form state is not a JSON object, clearing");
                self.clear();
                Snapshot::new()
            }
        }
    }

    /// Persist `state`. On a full store the old entry is dropped and the
    /// write retried once.
    pub fn write(&mut self, state: &FormState) {
        if !self.store.is_available() {
            return;
        }

        let serialized = match serde_json::to_string(state) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!("unable to serialize form state: {err}");
                return;
            }
        };

        if serialized.len() > self.max_bytes {
            tracing::warn!(
                "form state is {} bytes (limit {}), skipping save",
                serialized.len(),
                self.max_bytes
            );
            return;
        }

        match self.store.set_item(&self.key, &serialized) {
            Ok(()) => {}
            Err(err) if err.is_quota_exceeded() => {
                tracing::warn!("store quota exceeded, clearing old form state and retrying");
                self.clear();
                if let Err(err) = self.store.set_item(&self.key, &serialized) {
                    tracing::warn!("unable to persist form state after cleanup: {err}");
                }
            }
            Err(err) => tracing::warn!("unable to persist form state: {err}"),
        }
    }

    pub fn clear(&mut self) {
        if !self.store.is_available() {
            return;
        }
        if let Err(err) = self.store.remove_item(&self.key) {
            tracing::warn!("unable to clear stored form state: {err}");
        }
    }
}

/// Object of strings; non-string members are dropped.
fn parse_snapshot(raw: &str) -> Option<Snapshot> {
    match serde_json::from_str::<Value>(raw).ok()? {
        Value::Object(map) => Some(
            map.into_iter()
                .filter_map(|(k, v)| match v {
                    Value::String(s) => Some((k, s)),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldId;
    use pretty_assertions::assert_eq;
    use settings::{MemoryStore, StoreError};

    fn adapter(store: MemoryStore) -> PersistenceAdapter<MemoryStore> {
        PersistenceAdapter::new(store)
    }

    #[test]
    fn missing_entry_reads_empty() {
        let mut p = adapter(MemoryStore::new());
        assert!(p.read().is_empty());
    }

    #[test]
    fn write_then_read() {
        let mut p = adapter(MemoryStore::new());
        let mut state = FormState::empty();
        state.set(FieldId::Name, "Ada");
        p.write(&state);

        let snapshot = p.read();
        assert_eq!(snapshot.get("input-naam").map(String::as_str), Some("Ada"));
        assert_eq!(FormState::from_snapshot(&snapshot), state);
    }

    #[test]
    fn non_string_members_are_dropped() {
        let mut store = MemoryStore::new();
        store.seed(STORAGE_KEY, r#"{"input-naam":"Ada","input-gsm":42,"extra":"kept"}"#);
        let mut p = adapter(store);

        let snapshot = p.read();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["extra"], "kept");
        assert!(p.store().contains_key(STORAGE_KEY));
    }

    #[test]
    fn corrupt_entry_is_cleared() {
        for raw in ["{not json", "[1,2,3]", "\"text\""] {
            let mut store = MemoryStore::new();
            store.seed(STORAGE_KEY, raw);
            let mut p = adapter(store);

            assert!(p.read().is_empty());
            assert!(!p.store().contains_key(STORAGE_KEY), "{raw} was kept");
        }
    }

    #[test]
    fn oversized_entry_is_cleared() {
        let mut store = MemoryStore::new();
        store.seed(STORAGE_KEY, format!(r#"{{"input-naam":"{}"}}"#, "a".repeat(64)));
        let mut p = adapter(store).with_max_bytes(32);

        assert!(p.read().is_empty());
        assert!(p.store().is_empty());
    }

    #[test]
    fn oversized_state_is_not_written() {
        let mut p = adapter(MemoryStore::new()).with_max_bytes(16);
        p.write(&FormState::defaults());
        assert!(p.store().is_empty());
    }

    #[test]
    fn quota_exceeded_clears_and_retries() {
        let mut state = FormState::empty();
        state.set(FieldId::Name, "Ada");
        let needed = STORAGE_KEY.len() + serde_json::to_string(&state).unwrap().len();

        let mut store = MemoryStore::with_quota(needed + 8);
        store.seed("other", "x".repeat(16));
        store.seed(STORAGE_KEY, "{}");
        let mut p = adapter(store);

        // The old entry is replaced in place, but `other` still crowds it out.
        p.write(&state);
        assert!(!p.store().contains_key(STORAGE_KEY));
        assert!(p.store().contains_key("other"));
    }

    /// Rejects the first write with a quota error, like a browser store that
    /// only has room once the previous snapshot is gone.
    #[derive(Default)]
    struct FullOnce {
        inner: MemoryStore,
        rejected: bool,
        removals: usize,
    }

    impl SnapshotStore for FullOnce {
        fn kind(&self) -> settings::StoreKind {
            settings::StoreKind::Browser
        }

        fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get_item(key)
        }

        fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            if !self.rejected {
                self.rejected = true;
                return Err(StoreError::QuotaExceeded { needed: value.len() });
            }
            self.inner.set_item(key, value)
        }

        fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
            self.removals += 1;
            self.inner.remove_item(key)
        }
    }

    #[test]
    fn retry_succeeds_after_clearing() {
        let mut state = FormState::empty();
        state.set(FieldId::Name, "Ada");

        let mut p = PersistenceAdapter::new(FullOnce::default());
        p.write(&state);

        assert_eq!(p.store().removals, 1);
        assert_eq!(p.read()["input-naam"], "Ada");
    }

    #[test]
    fn unavailable_store_is_a_no_op() {
        let mut p = adapter(MemoryStore::unavailable());
        p.write(&FormState::defaults());
        p.clear();
        assert!(p.read().is_empty());
    }
}
