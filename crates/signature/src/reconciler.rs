//! Form state reconciler.
//!
//! Owns the authoritative `FormState` and keeps three sources in agreement:
//! the query string, the persisted snapshot and the static defaults. Every
//! edit after hydration is pushed to both adapters; adapter failures are
//! logged by the adapters themselves and never roll back state.
//!
//! Lifecycle:
//!   Uninitialized --hydrate--> Hydrating --> Ready
//!   any --reset--> Ready

use settings::SnapshotStore;

use crate::form::{ErrorMap, FieldId, FormState, Snapshot, TouchedSet, TrimmedValues};
use crate::persistence::PersistenceAdapter;
use crate::url_state::{LocationHost, UrlStateAdapter};
use crate::validation::{validate_field, validate_form, FormValidation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Hydrating,
    Ready,
}

/// Per field: URL value > stored value > prefill > empty.
///
/// Empty strings never count as present, so a blank parameter falls through
/// to the next source.
pub fn merge_sources(url: &Snapshot, stored: &Snapshot) -> FormState {
    let mut state = FormState::empty();
    for id in FieldId::all() {
        let present = |snapshot: &Snapshot| {
            snapshot
                .get(id.as_str())
                .filter(|v| !v.is_empty())
                .cloned()
        };
        let value = present(url)
            .or_else(|| present(stored))
            .or_else(|| id.prefill().map(str::to_string))
            .unwrap_or_default();
        state.set(id, value);
    }
    state
}

pub struct FormReconciler<S, L> {
    state: FormState,
    errors: ErrorMap,
    touched: TouchedSet,
    phase: Phase,
    persistence: PersistenceAdapter<S>,
    url: UrlStateAdapter<L>,
}

impl<S: SnapshotStore, L: LocationHost> FormReconciler<S, L> {
    /// Start from the static defaults. No external source is read yet.
    pub fn new(store: S, location: L) -> Self {
        Self::from_parts(PersistenceAdapter::new(store), UrlStateAdapter::new(location))
    }

    pub fn from_parts(persistence: PersistenceAdapter<S>, url: UrlStateAdapter<L>) -> Self {
        Self {
            state: FormState::defaults(),
            errors: ErrorMap::new(),
            touched: TouchedSet::new(),
            phase: Phase::Uninitialized,
            persistence,
            url,
        }
    }

    /// Merge URL, stored and default values, then mirror the result back to
    /// both adapters. Runs once; later calls are ignored.
    pub fn hydrate(&mut self) {
        if self.phase != Phase::Uninitialized {
            tracing::warn!("form already hydrated ({:?}), ignoring", self.phase);
            return;
        }

        self.phase = Phase::Hydrating;
        let from_url = self.url.read();
        let stored = self.persistence.read();
        self.state = merge_sources(&from_url, &stored);
        self.phase = Phase::Ready;

        tracing::debug!(
            "hydrated form from {} url and {} stored values",
            from_url.len(),
            stored.len()
        );
        self.sync();
    }

    /// Replace a field's raw value. Touched fields are revalidated.
    pub fn update_field(&mut self, id: FieldId, value: impl Into<String>) {
        self.state.set(id, value);
        if self.touched.contains(&id) {
            self.revalidate(id);
        }
        self.sync();
    }

    /// Record that the user left `id`, and validate it.
    pub fn set_field_touched(&mut self, id: FieldId) {
        self.touched.insert(id);
        self.revalidate(id);
    }

    /// Back to defaults with every trace removed from both adapters.
    pub fn reset(&mut self) {
        self.state = FormState::defaults();
        self.errors.clear();
        self.touched.clear();
        self.persistence.clear();
        self.url.clear();
        self.phase = Phase::Ready;
    }

    fn revalidate(&mut self, id: FieldId) {
        match validate_field(id, self.state.get(id)) {
            Some(message) => {
                self.errors.insert(id, message.to_string());
            }
            None => {
                self.errors.remove(&id);
            }
        }
    }

    fn sync(&mut self) {
        if self.phase != Phase::Ready {
            return;
        }
        self.url.write(&self.state);
        self.persistence.write(&self.state);
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn value(&self, id: FieldId) -> &str {
        self.state.get(id)
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn error(&self, id: FieldId) -> Option<&str> {
        self.errors.get(&id).map(String::as_str)
    }

    pub fn touched(&self) -> &TouchedSet {
        &self.touched
    }

    pub fn is_touched(&self, id: FieldId) -> bool {
        self.touched.contains(&id)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_hydrated(&self) -> bool {
        self.phase == Phase::Ready
    }

    pub fn trimmed_values(&self) -> TrimmedValues {
        self.state.trimmed()
    }

    /// Whole-form verdict, independent of which fields were touched.
    pub fn validation(&self) -> FormValidation {
        validate_form(&self.state)
    }

    pub fn is_valid(&self) -> bool {
        self.validation().is_valid
    }

    pub fn persistence(&self) -> &PersistenceAdapter<S> {
        &self.persistence
    }

    pub fn url_state(&self) -> &UrlStateAdapter<L> {
        &self.url
    }
}
