//! Default values for album settings.
//!
//! Centralized here so the library, the CLI and the tests agree on them.

use std::time::Duration;

/// How long a cached listing or ordering document is served before a
/// background refresh is started.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Name of the per-album ordering document, relative to the album prefix.
pub const DEFAULT_ORDERING_FILE: &str = "ordering.yaml";

/// Maximum number of thumbnails shown for an album.
pub const DEFAULT_THUMBNAIL_LIMIT: usize = 5;

/// Path separator used by object keys.
pub const KEY_SEPARATOR: char = '/';
