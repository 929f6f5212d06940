//! Presentation grouping of the field catalogue.
//!
//! Groups carry a title and description for the UI layer and reference fields
//! by id. They play no part in validation or state handling.

use super::{FieldDefinition, FieldId};

/// A titled block of related fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroup {
    pub title: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldId],
}

impl FieldGroup {
    /// Definitions of the grouped fields, in display order.
    pub fn definitions(&self) -> impl Iterator<Item = &'static FieldDefinition> + '_ {
        self.fields.iter().map(|id| id.definition())
    }
}

pub static GROUPS: [FieldGroup; 5] = [
    FieldGroup {
        title: "Identity",
        description: "Capture the name and role that appear directly under your signature.",
        fields: &[FieldId::Name, FieldId::Role],
    },
    FieldGroup {
        title: "Branding",
        description: "A hosted logo is required so it's not sent as an attachment each time.",
        fields: &[FieldId::LogoUrl],
    },
    FieldGroup {
        title: "Contact",
        description: "Phone, email and website links are clickable for recipients.",
        fields: &[FieldId::Phone, FieldId::Email, FieldId::Website],
    },
    FieldGroup {
        title: "Location",
        description: "Add primary and optional secondary offices or departments.",
        fields: &[FieldId::Location1, FieldId::Location2],
    },
    FieldGroup {
        title: "Social",
        description: "Optional public handles to share in your footer.",
        fields: &[FieldId::Facebook, FieldId::Linkedin, FieldId::Instagram],
    },
];

/// Find the group a field is presented in.
pub fn group_of(id: FieldId) -> Option<&'static FieldGroup> {
    GROUPS.iter().find(|g| g.fields.contains(&id))
}
