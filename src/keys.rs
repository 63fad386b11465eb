//! Cached bucket listing of an album

use std::sync::Arc;
use std::time::Duration;

use crate::album::AlbumLocation;
use crate::cache::{CacheState, CachedValue, Fetch, RevalidatingCache};
use crate::defaults::KEY_SEPARATOR;
use crate::error::Result;
use crate::store::ObjectStore;

/// List an album's objects and return their logical keys.
///
/// Folder placeholders are dropped. The store's listing order is kept as is.
pub fn fetch_keys(store: &dyn ObjectStore, location: &AlbumLocation) -> Result<Vec<String>> {
    let entries = store.list_objects(location.bucket(), location.prefix())?;
    Ok(entries
        .into_iter()
        .filter(|entry| !entry.is_folder_marker && !entry.key.ends_with(KEY_SEPARATOR))
        .filter_map(|entry| location.logical_key(&entry.key))
        .collect())
}

/// The album's key listing behind a [`RevalidatingCache`]
#[derive(Clone)]
pub struct KeyCache {
    cache: RevalidatingCache<Vec<String>>,
    store: Arc<dyn ObjectStore>,
    location: AlbumLocation,
}

impl KeyCache {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        location: AlbumLocation,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            cache: RevalidatingCache::new(format!("keys {}", location.path()), refresh_interval),
            store,
            location,
        }
    }

    /// Cached keys; lists the bucket on first use. Listing failures on
    /// first use are returned and nothing is cached.
    pub fn get(&self) -> Result<Arc<CachedValue<Vec<String>>>> {
        let store = Arc::clone(&self.store);
        let location = self.location.clone();
        self.cache
            .get(move || fetch_keys(store.as_ref(), &location).map(Fetch::Found))
    }

    pub fn state(&self) -> Result<CacheState> {
        self.cache.state()
    }
}
