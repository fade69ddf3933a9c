//! Upload slot for the source document.
//!
//! The staging directory holds zero or one document. Every accepted upload
//! first deletes whatever document-type files are already present (not only
//! same-named ones), then writes the new content under its original name.
//! The directory is plain filesystem state, so [`UploadSlot::current_document`]
//! still reports [`StagingError::AmbiguousState`] if something else drops a
//! second document next to ours.

mod error;
mod slot;
mod types;

pub use error::StagingError;
pub use slot::UploadSlot;
pub use types::StagedDocument;
