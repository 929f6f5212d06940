//! Snapshot stores: the durable, per-user key/value backends behind the
//! signature form's persistence.
//!
//! A store behaves like browser `localStorage`: string keys, string values,
//! and a size quota that may reject writes. Policy (size caps, corruption
//! handling, retry on quota) lives in the caller; stores only report what
//! happened.

mod errors;
mod file_store;
mod in_memory;
mod source;

pub use errors::StoreError;
pub use file_store::FileStore;
pub use in_memory::MemoryStore;
pub use source::{SnapshotStore, StoreKind};
