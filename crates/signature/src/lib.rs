//! Email signature builder core.
//!
//! Pipeline, leaf to root: [`sanitize`] → [`validation`] → [`persistence`]
//! and [`url_state`] → [`reconciler`] → [`render`] / [`markup`] →
//! [`clipboard`]. Browser adapters live in `web` behind the `web` feature.

pub mod clipboard;
pub mod form;
pub mod markup;
pub mod persistence;
pub mod reconciler;
pub mod render;
pub mod sanitize;
pub mod url_state;
pub mod validation;
#[cfg(feature = "web")]
pub mod web;

pub use clipboard::{
    ClipboardExporter, ClipboardPayload, ClipboardStrategy, CopyError, CopyStatus, MemoryClipboard,
    SelectionCopy, SelectionHost,
};
pub use form::{
    ErrorMap, FieldDefinition, FieldGroup, FieldId, FieldKind, FormState, Snapshot, TouchedSet,
    TrimmedValues, FIELDS, GROUPS,
};
pub use markup::{to_html, to_plain_text};
pub use persistence::{PersistenceAdapter, MAX_SNAPSHOT_BYTES, STORAGE_KEY};
pub use reconciler::{merge_sources, FormReconciler, Phase};
pub use render::{render, Branding, SignatureModel, DEFAULT_LOGO_URL, RAW_ASSET_BASE};
pub use url_state::{LocationError, LocationHost, MemoryLocation, UrlStateAdapter};
pub use validation::{validate_field, validate_field_key, validate_form, FormValidation};

/// Version shown in the UI footer.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
