//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = AlbumFixture::new("photos").with_images(&["a.jpg"]);
//!     // ... test code
//! }
//! ```

#![allow(dead_code)]

use std::sync::Arc;

use assert_fs::prelude::*;
use assert_fs::TempDir;

use album_order::album::{Album, AlbumLocation, AlbumSettings};
use album_order::store::MemoryStore;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::Command;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::{album_order_cmd, AlbumFixture};
}

/// Bucket used by the in-memory helpers
pub const BUCKET: &str = "photos";

/// Get a Command for the album-order binary, isolated from the caller's
/// environment.
pub fn album_order_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("album-order").unwrap();
    cmd.env_remove("ALBUM_ORDER_ROOT")
        .env_remove("ALBUM_ORDER_BUCKET")
        .env_remove("RUST_LOG");
    cmd
}

/// A memory store holding `keys` in [`BUCKET`], each with dummy content
pub fn store_with(keys: &[&str]) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for key in keys {
        store.put_object(BUCKET, key, "jpeg bytes").unwrap();
    }
    store
}

/// An album whose path mirrors its prefix
pub fn album(store: &Arc<MemoryStore>, prefix: &str, settings: AlbumSettings) -> Album {
    let location = AlbumLocation::new(&format!("/{}", prefix), BUCKET, prefix).unwrap();
    Album::new(store.clone(), location, settings)
}

/// Strings from string slices
pub fn keys(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A bucket directory tree for exercising the CLI.
///
/// The temporary directory is the store root, with one sub-directory for
/// the bucket.
pub struct AlbumFixture {
    pub temp: TempDir,
    pub bucket: String,
}

impl AlbumFixture {
    pub fn new(bucket: &str) -> Self {
        let temp = TempDir::new().unwrap();
        temp.child(bucket).create_dir_all().unwrap();
        Self {
            temp,
            bucket: bucket.to_string(),
        }
    }

    /// Add images, keyed relative to the bucket
    pub fn with_images(self, images: &[&str]) -> Self {
        for image in images {
            self.temp
                .child(format!("{}/{}", self.bucket, image))
                .write_str("jpeg bytes")
                .unwrap();
        }
        self
    }

    /// Write an object with the given content, keyed relative to the bucket
    pub fn with_object(self, key: &str, content: &str) -> Self {
        self.temp
            .child(format!("{}/{}", self.bucket, key))
            .write_str(content)
            .unwrap();
        self
    }

    /// Command pre-configured with `--root` and `--bucket`
    pub fn cmd(&self, subcommand: &str) -> assert_cmd::Command {
        let mut cmd = album_order_cmd();
        cmd.arg(subcommand)
            .arg("--root")
            .arg(self.temp.path())
            .arg("--bucket")
            .arg(&self.bucket);
        cmd
    }
}
