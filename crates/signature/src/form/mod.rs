//! Declarative field catalogue plus the value containers the reconciler mutates.

mod field;
mod schema;
mod state;

pub use field::{FieldDefinition, FieldId, FieldKind, FIELDS};
pub use schema::{group_of, FieldGroup, GROUPS};
pub use state::{ErrorMap, FormState, Snapshot, TouchedSet, TrimmedValues};

