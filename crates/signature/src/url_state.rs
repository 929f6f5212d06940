//! Mirrors the form into the page's query string.
//!
//! The query is rewritten in place on every sync so a link to the page always
//! reproduces the current form, without piling up history entries.

use thiserror::Error;
use url::form_urlencoded;

use crate::form::{FormState, Snapshot};

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("location is not available")]
    Unavailable,
    #[error("history update rejected: {0}")]
    Rejected(String),
}

/// Access to the current location of the hosting page.
pub trait LocationHost {
    fn is_available(&self) -> bool {
        true
    }

    /// Path component, e.g. `/signature/`.
    fn path(&self) -> String;

    /// Raw query string without the leading `?`.
    fn query(&self) -> String;

    /// Replace the current history entry with `url` (path plus optional query).
    fn replace(&mut self, url: &str) -> Result<(), LocationError>;
}

/// In-process location, used natively and in tests.
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    path: String,
    query: String,
    available: bool,
    replacements: usize,
}

impl MemoryLocation {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: String::new(),
            available: true,
            replacements: 0,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = query.strip_prefix('?').unwrap_or(&query).to_string();
        self
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new("/")
        }
    }

    /// Path plus query, as the address bar would show it.
    pub fn href(&self) -> String {
        join(&self.path, &self.query)
    }

    /// How many times the entry was replaced.
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new("/")
    }
}

impl LocationHost for MemoryLocation {
    fn is_available(&self) -> bool {
        self.available
    }

    fn path(&self) -> String {
        self.path.clone()
    }

    fn query(&self) -> String {
        self.query.clone()
    }

    fn replace(&mut self, url: &str) -> Result<(), LocationError> {
        if !self.available {
            return Err(LocationError::Unavailable);
        }
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        self.path = path.to_string();
        self.query = query.to_string();
        self.replacements += 1;
        Ok(())
    }
}

fn join(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

pub struct UrlStateAdapter<L> {
    host: L,
}

impl<L: LocationHost> UrlStateAdapter<L> {
    pub fn new(host: L) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &L {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut L {
        &mut self.host
    }

    /// Decode the current query. Unknown keys are kept, the last duplicate wins.
    pub fn read(&self) -> Snapshot {
        if !self.host.is_available() {
            return Snapshot::new();
        }
        let query = self.host.query();
        form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
            .into_owned()
            .collect()
    }

    /// Install the query for `state` without adding a history entry.
    pub fn write(&mut self, state: &FormState) {
        let query = self.share_query(state);
        self.replace_with(&query);
    }

    /// Drop every parameter, keeping the path.
    pub fn clear(&mut self) {
        self.replace_with("");
    }

    /// Query `write` would install: non-empty trimmed values in field order.
    pub fn share_query(&self, state: &FormState) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (id, value) in state.iter() {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                serializer.append_pair(id.as_str(), trimmed);
            }
        }
        serializer.finish()
    }

    fn replace_with(&mut self, query: &str) {
        if !self.host.is_available() {
            return;
        }
        let next = join(&self.host.path(), query);
        if let Err(err) = self.host.replace(&next) {
            tracing::warn!("unable to update the page url: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldId;
    use pretty_assertions::assert_eq;

    #[test]
    fn read_decodes_and_keeps_unknown_keys() {
        let location = MemoryLocation::new("/")
            .with_query("?input-naam=Ada+Lovelace&utm_source=mail&input-naam=Ada&input-email=a%40b.co");
        let snapshot = UrlStateAdapter::new(location).read();

        assert_eq!(snapshot["input-naam"], "Ada");
        assert_eq!(snapshot["input-email"], "a@b.co");
        assert_eq!(snapshot["utm_source"], "mail");
    }

    #[test]
    fn write_skips_blank_values_and_trims() {
        let mut state = FormState::empty();
        state.set(FieldId::Name, "  Ada  ");
        state.set(FieldId::Role, "   ");
        state.set(FieldId::Website, "https://example.com/?a=1&b=2");

        let mut adapter = UrlStateAdapter::new(MemoryLocation::new("/builder"));
        adapter.write(&state);

        assert_eq!(
            adapter.host().href(),
            "/builder?input-naam=Ada&input-website=https%3A%2F%2Fexample.com%2F%3Fa%3D1%26b%3D2"
        );
        assert_eq!(adapter.host().replacements(), 1);
    }

    #[test]
    fn empty_state_leaves_bare_path() {
        let mut adapter = UrlStateAdapter::new(MemoryLocation::new("/").with_query("input-naam=x"));
        adapter.write(&FormState::empty());
        assert_eq!(adapter.host().href(), "/");
    }

    #[test]
    fn clear_keeps_path() {
        let mut adapter =
            UrlStateAdapter::new(MemoryLocation::new("/builder").with_query("input-naam=Ada"));
        adapter.clear();
        assert_eq!(adapter.host().href(), "/builder");
        assert!(adapter.read().is_empty());
    }

    #[test]
    fn unavailable_host_is_a_no_op() {
        let mut adapter = UrlStateAdapter::new(MemoryLocation::unavailable());
        adapter.write(&FormState::defaults());
        adapter.clear();
        assert!(adapter.read().is_empty());
        assert_eq!(adapter.host().replacements(), 0);
    }
}
