//! # Object Store Collaborator
//!
//! The album layer never talks to a storage backend directly. It goes through
//! the [`ObjectStore`] trait, a small synchronous API covering the three
//! calls it needs: list a prefix, fetch an object, check an object exists.
//!
//! ## Implementations
//!
//! - **`MemoryStore`**: buckets held in memory. Used by the tests and by
//!   embedders that already have their listing at hand. It counts calls and
//!   can be told to fail, which makes cache behavior observable.
//! - **`DirectoryStore`**: one directory per bucket on the local disk, used by
//!   the `album-order` binary to preview an album before uploading it.
//!
//! Backends for real object stores implement the same trait in the
//! application that owns the credentials.

mod directory;
mod memory;

pub use directory::DirectoryStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// One entry of a prefix listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    /// Full key in the bucket.
    pub key: String,
    /// Whether the entry is a zero-byte "folder" placeholder.
    pub is_folder_marker: bool,
}

impl ObjectEntry {
    pub fn object(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            is_folder_marker: false,
        }
    }

    pub fn folder(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            is_folder_marker: true,
        }
    }
}

/// Trait for object store access - allows swapping backends and mocking in tests
pub trait ObjectStore: Send + Sync {
    /// Lists the objects directly under `prefix`, in the order the store
    /// returns them. Nested "sub-folders" are not descended into.
    fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectEntry>>;

    /// Reads an object's bytes.
    ///
    /// A missing object must be reported as `Error::NotFound` so callers can
    /// tell it apart from transport failures.
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Checks whether an object exists.
    fn head_object(&self, bucket: &str, key: &str) -> Result<bool>;
}
