//! Form runtime values.
//!
//! This module contains only the data structures and lightweight helpers
//! representing the *current* values of the form:
//!   * `FormState`: raw value per known field (always complete)
//!   * `Snapshot`: partial raw mapping as read from a query string or a store
//!   * `TrimmedValues`: display-ready projection of a `FormState`
//!
//! Validation, touched tracking and synchronization live in the reconciler.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::FieldId;

/// Partial, untyped mapping of field key to raw value.
///
/// Keys are kept as found (unknown keys included) until merged into a
/// `FormState`.
pub type Snapshot = BTreeMap<String, String>;

/// Fields the user has left at least once.
pub type TouchedSet = BTreeSet<FieldId>;

/// Visible validation messages. A missing key means "no error".
pub type ErrorMap = BTreeMap<FieldId, String>;

/// Raw value for every known field.
///
/// Invariant: holds exactly one entry per `FieldId`; unset fields are empty
/// strings. There is no way to insert an unknown key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormState {
    values: BTreeMap<FieldId, String>,
}

impl FormState {
    /// Every field empty.
    pub fn empty() -> Self {
        Self {
            values: FieldId::all().map(|id| (id, String::new())).collect(),
        }
    }

    /// Static default: prefill values where defined, empty otherwise.
    pub fn defaults() -> Self {
        Self {
            values: FieldId::all()
                .map(|id| (id, id.prefill().unwrap_or_default().to_string()))
                .collect(),
        }
    }

    /// Take known keys from a snapshot, missing ones become empty.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut state = Self::empty();
        for id in FieldId::all() {
            if let Some(value) = snapshot.get(id.as_str()) {
                state.set(id, value.clone());
            }
        }
        state
    }

    pub fn get(&self, id: FieldId) -> &str {
        self.values.get(&id).map(String::as_str).unwrap_or_default()
    }

    /// Set (or replace) the raw value of a field.
    pub fn set(&mut self, id: FieldId, value: impl Into<String>) {
        self.values.insert(id, value.into());
    }

    /// Iterate in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &str)> {
        self.values.iter().map(|(id, v)| (*id, v.as_str()))
    }

    pub fn to_snapshot(&self) -> Snapshot {
        self.iter()
            .map(|(id, v)| (id.as_str().to_string(), v.to_string()))
            .collect()
    }

    /// Display-ready projection, see [`TrimmedValues`].
    pub fn trimmed(&self) -> TrimmedValues {
        TrimmedValues::from_state(self)
    }
}

impl<'de> Deserialize<'de> for FormState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let snapshot = Snapshot::deserialize(deserializer)?;
        Ok(Self::from_snapshot(&snapshot))
    }
}

/// Whitespace-trimmed view of a `FormState`, recomputed on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrimmedValues {
    pub name: String,
    pub role: String,
    pub phone: String,
    pub email: String,
    pub location1: String,
    pub location2: String,
    pub website_url: String,
    /// Website without a leading `http://` / `https://`.
    pub website_label: String,
    pub facebook: String,
    pub linkedin: String,
    pub instagram: String,
    pub logo_url: String,
}

impl TrimmedValues {
    pub fn from_state(state: &FormState) -> Self {
        let get = |id: FieldId| state.get(id).trim().to_string();
        let website_url = get(FieldId::Website);
        let website_label = strip_http_prefix(&website_url).to_string();
        Self {
            name: get(FieldId::Name),
            role: get(FieldId::Role),
            phone: get(FieldId::Phone),
            email: get(FieldId::Email),
            location1: get(FieldId::Location1),
            location2: get(FieldId::Location2),
            website_url,
            website_label,
            facebook: get(FieldId::Facebook),
            linkedin: get(FieldId::Linkedin),
            instagram: get(FieldId::Instagram),
            logo_url: get(FieldId::LogoUrl),
        }
    }
}

/// Drop one leading `http://` or `https://`.
fn strip_http_prefix(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}
