//! # Albums
//!
//! An album is a logical photo collection mapped onto a prefix of a bucket.
//! It owns the two cache slots its pages read through: the key listing and
//! the ordering document.
//!
//! ## Key Spaces
//!
//! Keys exist in two spellings:
//!
//! - **Bucket keys** are what the store lists: `<prefix><name>`.
//! - **Logical keys** live under the album path: `<path><name>` without the
//!   leading separator. Ordering documents are written against this space.
//!
//! When the album path mirrors the bucket prefix, which is the usual layout,
//! the two spellings are identical. [`AlbumLocation`] converts between them.

use std::sync::Arc;
use std::time::Duration;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::cache::CachedValue;
use crate::defaults::{
    DEFAULT_ORDERING_FILE, DEFAULT_REFRESH_INTERVAL, DEFAULT_THUMBNAIL_LIMIT, KEY_SEPARATOR,
};
use crate::error::{Error, Result};
use crate::keys::KeyCache;
use crate::ordering::{OrderingCache, OrderingConfig};
use crate::path::normalize_key;
use crate::store::ObjectStore;

/// Synthetic origin that album paths are resolved under.
const REFERENCE_ORIGIN: &str = "http://album.invalid/";

/// The path of a URL with percent-encoding undone
pub(crate) fn decoded_path(url: &Url) -> String {
    percent_decode_str(url.path()).decode_utf8_lossy().into_owned()
}

/// Where an album lives, both logically and in the bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumLocation {
    path: String,
    bucket: String,
    prefix: String,
    base: Url,
}

impl AlbumLocation {
    /// Validate and canonicalize an album location.
    ///
    /// `path` is required and gains a leading and trailing separator.
    /// A non-empty `prefix` gains a trailing separator.
    pub fn new(path: &str, bucket: &str, prefix: &str) -> Result<Self> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidAlbum {
                message: "'path' is a required parameter that must have a valid value".to_string(),
            });
        }
        if bucket.trim().is_empty() {
            return Err(Error::InvalidAlbum {
                message: format!("album {} has no bucket", trimmed),
            });
        }

        let mut path = String::with_capacity(trimmed.len() + 2);
        if !trimmed.starts_with(KEY_SEPARATOR) {
            path.push(KEY_SEPARATOR);
        }
        path.push_str(trimmed);
        if !path.ends_with(KEY_SEPARATOR) {
            path.push(KEY_SEPARATOR);
        }

        let mut prefix = prefix.trim_start_matches(KEY_SEPARATOR).to_string();
        if !prefix.is_empty() && !prefix.ends_with(KEY_SEPARATOR) {
            prefix.push(KEY_SEPARATOR);
        }

        let base = Url::parse(REFERENCE_ORIGIN)?.join(&path)?;
        if decoded_path(&base) != path {
            return Err(Error::InvalidAlbum {
                message: format!("album path {} is not a plain path", path),
            });
        }

        Ok(Self {
            path,
            bucket: bucket.to_string(),
            prefix,
            base,
        })
    }

    /// Canonical album path, e.g. `/vacation/`
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Canonical bucket prefix, e.g. `vacation/` (may be empty)
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The album path as a URL that relative references resolve against
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Logical spelling of `<path><name>`
    fn logical_root(&self) -> &str {
        normalize_key(&self.path)
    }

    /// Bucket key of an object stored directly in the album
    pub fn object_key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, normalize_key(name))
    }

    /// Convert a listed bucket key to its logical key.
    ///
    /// Returns `None` for keys outside the album prefix.
    pub fn logical_key(&self, bucket_key: &str) -> Option<String> {
        bucket_key
            .strip_prefix(self.prefix.as_str())
            .map(|name| format!("{}{}", self.logical_root(), name))
    }

    /// Convert a logical key back to the bucket key it was listed as
    pub fn bucket_key(&self, logical_key: &str) -> String {
        match normalize_key(logical_key).strip_prefix(self.logical_root()) {
            Some(name) => format!("{}{}", self.prefix, name),
            None => normalize_key(logical_key).to_string(),
        }
    }
}

/// Per-album tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumSettings {
    /// Age after which a cached listing or ordering document is refreshed.
    pub refresh_interval: Duration,
    /// Name of the ordering document inside the album prefix.
    pub ordering_file: String,
    /// Maximum number of thumbnails.
    pub thumbnail_limit: usize,
}

impl Default for AlbumSettings {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            ordering_file: DEFAULT_ORDERING_FILE.to_string(),
            thumbnail_limit: DEFAULT_THUMBNAIL_LIMIT,
        }
    }
}

impl AlbumSettings {
    pub fn with_refresh_interval(mut self, refresh_interval: Duration) -> Self {
        self.refresh_interval = refresh_interval;
        self
    }

    pub fn with_ordering_file(mut self, ordering_file: impl Into<String>) -> Self {
        self.ordering_file = ordering_file.into();
        self
    }

    pub fn with_thumbnail_limit(mut self, thumbnail_limit: usize) -> Self {
        self.thumbnail_limit = thumbnail_limit;
        self
    }
}

/// A photo album and its cache slots.
///
/// Share one `Album` (for example behind an `Arc`) between all requests for
/// that album so they share its caches.
pub struct Album {
    location: AlbumLocation,
    settings: AlbumSettings,
    store: Arc<dyn ObjectStore>,
    keys: KeyCache,
    ordering: OrderingCache,
}

impl std::fmt::Debug for Album {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Album")
            .field("location", &self.location)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Album {
    pub fn new(store: Arc<dyn ObjectStore>, location: AlbumLocation, settings: AlbumSettings) -> Self {
        let keys = KeyCache::new(Arc::clone(&store), location.clone(), settings.refresh_interval);
        let ordering = OrderingCache::new(
            Arc::clone(&store),
            location.clone(),
            &settings.ordering_file,
            settings.refresh_interval,
        );
        Self {
            location,
            settings,
            store,
            keys,
            ordering,
        }
    }

    pub fn location(&self) -> &AlbumLocation {
        &self.location
    }

    pub fn settings(&self) -> &AlbumSettings {
        &self.settings
    }

    /// Cached logical keys, as listed by the store
    pub fn keys(&self) -> Result<Arc<CachedValue<Vec<String>>>> {
        self.keys.get()
    }

    /// Cached ordering document, possibly negative
    pub fn ordering(&self) -> Result<Arc<CachedValue<OrderingConfig>>> {
        self.ordering.get()
    }

    pub fn key_cache(&self) -> &KeyCache {
        &self.keys
    }

    pub fn ordering_cache(&self) -> &OrderingCache {
        &self.ordering
    }

    /// Logical key of the album's own ordering document
    pub fn ordering_key(&self) -> String {
        format!("{}{}", self.location.logical_root(), self.settings.ordering_file)
    }

    /// Check whether an image exists in the album, bypassing the caches.
    ///
    /// Any store failure counts as "does not exist".
    pub fn image_exists(&self, slug: &str) -> bool {
        let key = self.location.object_key(slug);
        self.store
            .head_object(self.location.bucket(), &key)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_location_canonicalizes_path_and_prefix() {
        let location = AlbumLocation::new("vacation", "photos", "/vacation").unwrap();
        assert_eq!(location.path(), "/vacation/");
        assert_eq!(location.prefix(), "vacation/");
        assert_eq!(location.base_url().as_str(), "http://album.invalid/vacation/");

        let root = AlbumLocation::new("/", "photos", "").unwrap();
        assert_eq!(root.path(), "/");
        assert_eq!(root.prefix(), "");
    }

    #[test]
    fn test_location_requires_path_and_bucket() {
        assert!(matches!(
            AlbumLocation::new("  ", "photos", "x/"),
            Err(Error::InvalidAlbum { .. })
        ));
        assert!(matches!(
            AlbumLocation::new("/x/", "", "x/"),
            Err(Error::InvalidAlbum { .. })
        ));
    }

    #[test]
    fn test_location_rejects_paths_that_are_not_plain() {
        assert!(AlbumLocation::new("/a?b/", "photos", "").is_err());
        assert!(AlbumLocation::new("/a/../b/", "photos", "").is_err());
        assert!(AlbumLocation::new("/summer trip/", "photos", "").is_ok());
    }

    #[test]
    fn test_key_mapping_when_path_mirrors_prefix() {
        let location = AlbumLocation::new("/vacation/", "photos", "vacation/").unwrap();
        assert_eq!(
            location.logical_key("vacation/a.jpg").as_deref(),
            Some("vacation/a.jpg")
        );
        assert_eq!(location.bucket_key("/vacation/a.jpg"), "vacation/a.jpg");
        assert_eq!(location.logical_key("other/a.jpg"), None);
    }

    #[test]
    fn test_key_mapping_with_distinct_prefix() {
        let location = AlbumLocation::new("/trips/2019/", "photos", "uploads/2019-trip/").unwrap();
        assert_eq!(
            location.logical_key("uploads/2019-trip/a.jpg").as_deref(),
            Some("trips/2019/a.jpg")
        );
        assert_eq!(location.bucket_key("trips/2019/a.jpg"), "uploads/2019-trip/a.jpg");
        assert_eq!(location.object_key("a.jpg"), "uploads/2019-trip/a.jpg");
    }

    #[test]
    fn test_settings_builders() {
        let settings = AlbumSettings::default()
            .with_refresh_interval(Duration::from_secs(5))
            .with_ordering_file("order.yml")
            .with_thumbnail_limit(3);
        assert_eq!(settings.refresh_interval, Duration::from_secs(5));
        assert_eq!(settings.ordering_file, "order.yml");
        assert_eq!(settings.thumbnail_limit, 3);
        assert_eq!(AlbumSettings::default().thumbnail_limit, DEFAULT_THUMBNAIL_LIMIT);
    }

    #[test]
    fn test_ordering_key_and_image_exists() {
        let store = Arc::new(MemoryStore::new());
        store.put_object("photos", "vacation/a.jpg", "x").unwrap();
        let location = AlbumLocation::new("/vacation/", "photos", "vacation/").unwrap();
        let album = Album::new(store, location, AlbumSettings::default());

        assert_eq!(album.ordering_key(), "vacation/ordering.yaml");
        assert!(album.image_exists("a.jpg"));
        assert!(!album.image_exists("b.jpg"));
    }
}
