//! profile_storage - Local persistence for briefs and feedback
//!
//! The storage collaborator behind the generation core: three flat JSON lists
//! (guided profiles, automation profiles, feedback examples) with fixed caps
//! and identity-based de-duplication on save.

pub mod error;
pub mod snapshot;
pub mod store;

// Re-exports
pub use error::StorageError;
pub use snapshot::build_output_snapshot;
pub use store::{FileProfileStore, NewFeedback, ProfileStore};
