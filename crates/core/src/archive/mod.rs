//! Archive builder for downloading every artifact at once.
//!
//! Bundles are flat zip files (entries named by file name only) written to a
//! temporary file. The temporary file is removed when the [`Bundle`], or the
//! [`BundleReader`] it turns into, is dropped, which covers a completed
//! download, a client disconnect, and an error while building.
//!
//! The artifact set is not snapshotted: files added or removed while the
//! bundle is being written may or may not be included.

mod builder;
mod bundle;
mod error;

pub use builder::ArchiveBuilder;
pub use bundle::{Bundle, BundleReader};
pub use error::ArchiveError;
