//! # CLI Command Implementations
//!
//! Each subcommand of the `album-order` tool lives in its own file with an
//! `Args` struct derived using `clap` and an `execute` function that calls
//! into the `album_order` library.
//!
//! All commands read albums from a [`DirectoryStore`]: one directory per
//! bucket under `--root`, objects as files.

pub mod exists;
pub mod keys;
pub mod resolve;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use album_order::album::{Album, AlbumLocation, AlbumSettings};
use album_order::defaults::DEFAULT_ORDERING_FILE;
use album_order::store::DirectoryStore;

/// Options locating an album on disk
#[derive(Args, Debug)]
pub struct AlbumArgs {
    /// Directory holding one sub-directory per bucket.
    #[arg(long, value_name = "DIR", env = "ALBUM_ORDER_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Bucket (sub-directory of the root) the album lives in.
    #[arg(long, value_name = "NAME", env = "ALBUM_ORDER_BUCKET")]
    pub bucket: String,

    /// Key prefix of the album inside the bucket, e.g. `vacation/`.
    #[arg(long, value_name = "PREFIX", default_value = "")]
    pub prefix: String,

    /// Logical album path. Defaults to the prefix.
    #[arg(long, value_name = "PATH")]
    pub path: Option<String>,

    /// Name of the ordering document inside the album.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_ORDERING_FILE)]
    pub ordering_file: String,
}

impl AlbumArgs {
    /// Build the album these options point at
    pub fn open(&self) -> Result<Album> {
        let path = self.path.clone().unwrap_or_else(|| format!("/{}", self.prefix));
        let location = AlbumLocation::new(&path, &self.bucket, &self.prefix)
            .with_context(|| format!("Invalid album {} in bucket {}", path, self.bucket))?;
        let store = Arc::new(DirectoryStore::new(&self.root));
        let settings = AlbumSettings::default().with_ordering_file(&self.ordering_file);
        Ok(Album::new(store, location, settings))
    }
}
