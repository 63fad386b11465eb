//! # Ordering Resolution
//!
//! Combines an album's cached key listing with its cached ordering document
//! into the three things a page shows: a cover, a short row of thumbnails and
//! the full ordered listing.
//!
//! ## Rules
//!
//! 1. A missing, broken or unreachable ordering document behaves exactly
//!    like an album without one. It never stops the album from rendering.
//! 2. A key listing failure aborts resolution. Without keys nothing can be
//!    shown.
//! 3. The ordering document's own key is removed from the listing first.
//! 4. Configured keys that are not in the listing are silently dropped,
//!    except a missing cover, which is logged before falling back to the
//!    first image.
//! 5. Configured keys come first and the rest of the listing follows in
//!    listing order (see [`merge_list`]).

use std::sync::Arc;
use std::thread;

use log::{debug, warn};
use serde::Serialize;

use crate::album::Album;
use crate::cache::{CacheState, CachedValue};
use crate::error::{Error, Result};
use crate::ordering::OrderingConfig;
use crate::path::{find_path, merge_list, normalize_key};
use crate::render::Renderer;

/// Cover, thumbnails and full ordering of an album
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedOrdering<T> {
    pub cover: T,
    pub thumbnails: Vec<T>,
    pub ordering: Vec<T>,
}

impl<T> ResolvedOrdering<T> {
    /// Convert every entry, keeping positions
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> ResolvedOrdering<U> {
        ResolvedOrdering {
            cover: f(self.cover),
            thumbnails: self.thumbnails.into_iter().map(&mut f).collect(),
            ordering: self.ordering.into_iter().map(&mut f).collect(),
        }
    }
}

/// Drop the ordering document's own key from a listing
pub fn clean_keys(keys: &[String], ordering_key: &str) -> Vec<String> {
    let ordering_key = normalize_key(ordering_key);
    keys.iter()
        .filter(|key| normalize_key(key) != ordering_key)
        .cloned()
        .collect()
}

/// Pick the cover, thumbnails and ordering from a cleaned listing.
///
/// - Cover: the configured cover if listed, otherwise the first key.
/// - Thumbnails: configured thumbnails merged into the listing and capped at
///   `thumbnail_limit`; without configured thumbnails, the keys following
///   the first one.
/// - Ordering: the configured ordering merged into the full listing.
pub fn select(
    album: &str,
    keys: &[String],
    config: &OrderingConfig,
    thumbnail_limit: usize,
) -> Result<ResolvedOrdering<String>> {
    let Some(first) = keys.first() else {
        return Err(Error::EmptyAlbum {
            album: album.to_string(),
        });
    };

    let cover = match config.cover.as_deref() {
        Some(wanted) => match find_path(keys, wanted) {
            Some(found) => found.clone(),
            None => {
                warn!(
                    "Cover photo {} specified in the ordering file of album {} not found in bucket, falling back to first photo",
                    wanted, album
                );
                first.clone()
            }
        },
        None => first.clone(),
    };

    let thumbnails = if config.thumbnails.is_empty() {
        keys.iter().skip(1).take(thumbnail_limit).cloned().collect()
    } else {
        let mut merged = merge_list(keys, &config.thumbnails);
        merged.truncate(thumbnail_limit);
        merged
    };

    let ordering = merge_list(keys, &config.ordering);

    Ok(ResolvedOrdering {
        cover,
        thumbnails,
        ordering,
    })
}

type Snapshot<T> = Result<Arc<CachedValue<T>>>;

/// Read both cache slots of an album.
///
/// Warm slots answer without blocking, so they are read in place. When
/// either slot is empty its first fetch blocks, and the two reads run on
/// scoped threads so the listing and the document are fetched in parallel.
fn read_slots(album: &Album) -> (Snapshot<OrderingConfig>, Snapshot<Vec<String>>) {
    let is_empty = |state: Result<CacheState>| matches!(state, Ok(CacheState::Empty));
    let cold = is_empty(album.ordering_cache().state()) || is_empty(album.key_cache().state());
    if !cold {
        return (album.ordering(), album.keys());
    }

    thread::scope(|scope| {
        let ordering = scope.spawn(|| album.ordering());
        let keys = album.keys();
        let ordering = ordering
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        (ordering, keys)
    })
}

/// Resolve an album to logical keys.
///
/// The listing and the ordering document are read in parallel on a cold
/// album.
pub fn resolve_keys(album: &Album) -> Result<ResolvedOrdering<String>> {
    let path = album.location().path();
    let (ordering, keys) = read_slots(album);

    let ordering = match ordering {
        Ok(snapshot) => {
            if let Some(cause) = &snapshot.cause {
                debug!("Album {} has no usable ordering document: {}", path, cause);
            }
            Some(snapshot)
        }
        Err(e) => {
            warn!("Unable to pick up album ordering for album {}: {}", path, e);
            None
        }
    };
    let fallback = OrderingConfig::negative();
    let config = ordering.as_deref().map(|s| &s.value).unwrap_or(&fallback);

    let keys = keys?;
    let cleaned = clean_keys(&keys.value, &album.ordering_key());

    select(path, &cleaned, config, album.settings().thumbnail_limit)
}

/// Resolves albums and renders the chosen keys
#[derive(Debug, Clone)]
pub struct OrderingResolver<R> {
    renderer: R,
}

impl<R: Renderer> OrderingResolver<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Resolve an album into rendered items.
    ///
    /// Items are rendered from bucket keys, the spelling the store serves
    /// them under.
    pub fn resolve(&self, album: &Album) -> Result<ResolvedOrdering<R::Item>> {
        let location = album.location();
        let resolved = resolve_keys(album)?;
        Ok(resolved.map(|key| self.renderer.render(&location.bucket_key(&key))))
    }

    pub fn cover(&self, album: &Album) -> Result<R::Item> {
        Ok(self.resolve(album)?.cover)
    }

    pub fn thumbnails(&self, album: &Album) -> Result<Vec<R::Item>> {
        Ok(self.resolve(album)?.thumbnails)
    }
}
