//! Field catalogue for the signature form.
//!
//! This module defines the declarative pieces of the form:
//! - `FieldId`: closed set of field identifiers (their string form is the wire id
//!   used in query strings and the persisted snapshot)
//! - `FieldKind`: the input flavour, which also selects the validation rule
//! - `FieldDefinition`: label / placeholder / hint metadata for a single field
//!
//! Everything here is static. Mutable values live in `state.rs`.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::render::DEFAULT_LOGO_URL;

/// Identifier of a known form field.
///
/// Declaration order is the catalogue order, so ordered maps keyed by
/// `FieldId` iterate fields the way the form presents them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum FieldId {
    #[strum(serialize = "input-naam")]
    #[serde(rename = "input-naam")]
    Name,
    #[strum(serialize = "input-functie")]
    #[serde(rename = "input-functie")]
    Role,
    #[strum(serialize = "input-logo-url")]
    #[serde(rename = "input-logo-url")]
    LogoUrl,
    #[strum(serialize = "input-gsm")]
    #[serde(rename = "input-gsm")]
    Phone,
    #[strum(serialize = "input-email")]
    #[serde(rename = "input-email")]
    Email,
    #[strum(serialize = "input-locatie-1")]
    #[serde(rename = "input-locatie-1")]
    Location1,
    #[strum(serialize = "input-locatie-2")]
    #[serde(rename = "input-locatie-2")]
    Location2,
    #[strum(serialize = "input-facebook")]
    #[serde(rename = "input-facebook")]
    Facebook,
    #[strum(serialize = "input-linkedin")]
    #[serde(rename = "input-linkedin")]
    Linkedin,
    #[strum(serialize = "input-instagram")]
    #[serde(rename = "input-instagram")]
    Instagram,
    #[strum(serialize = "input-website")]
    #[serde(rename = "input-website")]
    Website,
}

impl FieldId {
    /// Wire id, e.g. `input-email`.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// All fields in catalogue order.
    pub fn all() -> impl Iterator<Item = FieldId> {
        FieldId::iter()
    }

    /// Static metadata for this field.
    pub fn definition(self) -> &'static FieldDefinition {
        &FIELDS[self as usize]
    }

    /// Value the field starts with before the user (or any stored state) sets it.
    pub fn prefill(self) -> Option<&'static str> {
        match self {
            FieldId::Facebook => Some("https://www.facebook.com/upshiftbe"),
            FieldId::Linkedin => Some("https://www.linkedin.com/company/upshift-be"),
            FieldId::LogoUrl => Some(DEFAULT_LOGO_URL),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Input flavour of a field.
///
/// Notes:
/// - Text covers names, roles, phone numbers, e-mail and address lines
/// - Url fields are optional and must use an allowed scheme once set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Url,
}

/// Declarative description of a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub id: FieldId,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub kind: FieldKind,
    pub hint: Option<&'static str>,
}

impl FieldDefinition {
    const fn text(id: FieldId, label: &'static str, placeholder: &'static str) -> Self {
        Self {
            id,
            label,
            placeholder,
            kind: FieldKind::Text,
            hint: None,
        }
    }

    const fn url(id: FieldId, label: &'static str, placeholder: &'static str) -> Self {
        Self {
            id,
            label,
            placeholder,
            kind: FieldKind::Url,
            hint: None,
        }
    }

    const fn with_hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }

    /// Return true if the field only accepts links.
    pub fn is_url(&self) -> bool {
        matches!(self.kind, FieldKind::Url)
    }
}

/// Catalogue, indexed by `FieldId as usize`.
pub static FIELDS: [FieldDefinition; 11] = [
    FieldDefinition::text(FieldId::Name, "Name", "Final boss"),
    FieldDefinition::text(FieldId::Role, "Role", "Chiefest of chiefs"),
    FieldDefinition::url(
        FieldId::LogoUrl,
        "Logo URL",
        "https://assets.example.com/logo.png",
    )
    .with_hint("Optional HTTPS image that appears next to your info."),
    FieldDefinition::text(FieldId::Phone, "Phone", "+32 470 01 23 45"),
    FieldDefinition::text(FieldId::Email, "Email", "hello@upshift.be"),
    FieldDefinition::text(FieldId::Location1, "Location", "Antwerpen"),
    FieldDefinition::text(FieldId::Location2, "Location", "België")
        .with_hint("Optional extra address line."),
    FieldDefinition::url(
        FieldId::Facebook,
        "Facebook URL",
        "https://www.facebook.com/upshiftbe",
    )
    .with_hint("Optional, the Facebook icon only appears once this is set."),
    FieldDefinition::url(
        FieldId::Linkedin,
        "LinkedIn URL",
        "https://www.linkedin.com/company/upshift-be",
    )
    .with_hint("Optional, the LinkedIn icon only appears once this is set."),
    FieldDefinition::url(
        FieldId::Instagram,
        "Instagram URL",
        "https://instagram.com/company",
    )
    .with_hint("Optional, the Instagram icon only appears once this is set."),
    FieldDefinition::url(FieldId::Website, "Website URL", "https://company.com"),
];
