//! # Ordering Documents
//!
//! Each album may carry a small YAML document (`ordering.yaml` by default)
//! that picks a cover, a set of thumbnails and a preferred order:
//!
//! ```yaml
//! cover: beach.jpg
//! thumbnails:
//!   - beach.jpg
//!   - sunset.jpg
//! ordering:
//!   - arrival.jpg
//!   - ../shared/map.jpg
//! ```
//!
//! Every field is optional. Values are relative references resolved against
//! the album path, so `beach.jpg` in album `/vacation/` becomes
//! `/vacation/beach.jpg`. Resolution happens once, when the document is
//! fetched, so cached configurations are already normalized.
//!
//! ## Negative Caching
//!
//! A missing document and a malformed document are both cached as a
//! negative [`OrderingConfig`] for a full refresh interval, so neither is
//! retried on every page view. Only transport failures are left uncached.

use std::sync::Arc;
use std::time::Duration;

use log::warn;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use serde_yaml::Value as YamlValue;
use url::Url;

use crate::album::{decoded_path, AlbumLocation};
use crate::cache::{CacheState, CachedValue, Fetch, RevalidatingCache};
use crate::error::{Error, Result};
use crate::store::ObjectStore;

/// The ordering preferences of one album
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingConfig {
    /// Preferred cover image.
    pub cover: Option<String>,
    /// Preferred thumbnails, in display order.
    pub thumbnails: Vec<String>,
    /// Preferred overall order.
    pub ordering: Vec<String>,
    /// Set when no usable document exists.
    #[serde(skip)]
    pub negative: bool,
}

impl OrderingConfig {
    /// The configuration used when the album has no usable document
    pub fn negative() -> Self {
        Self {
            negative: true,
            ..Self::default()
        }
    }

    /// Parse an ordering document.
    ///
    /// An empty document, or one holding only comments, is a valid
    /// configuration with every field unset.
    pub fn parse(document: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let mut value: YamlValue = serde_yaml::from_str(document)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        if let YamlValue::Mapping(fields) = &mut value {
            for (name, field) in fields.iter_mut() {
                match name.as_str() {
                    Some("cover") => scalar_to_key(field),
                    Some("thumbnails") | Some("ordering") => {
                        if let YamlValue::Sequence(items) = field {
                            items.iter_mut().for_each(scalar_to_key);
                        }
                    }
                    _ => {}
                }
            }
        }
        let mut config: Self = serde_yaml::from_value(value)?;
        if config.cover.as_deref().is_some_and(|c| c.trim().is_empty()) {
            config.cover = None;
        }
        Ok(config)
    }

    /// Resolve every reference against `base`, producing a new configuration.
    ///
    /// References that cannot be resolved to a path under the album's origin
    /// are dropped with a warning.
    pub fn resolved_against(&self, base: &Url) -> Self {
        let resolve_all = |references: &[String]| -> Vec<String> {
            references
                .iter()
                .filter_map(|reference| resolve_reference(base, reference))
                .collect()
        };

        Self {
            cover: self
                .cover
                .as_deref()
                .and_then(|cover| resolve_reference(base, cover)),
            thumbnails: resolve_all(&self.thumbnails),
            ordering: resolve_all(&self.ordering),
            negative: self.negative,
        }
    }
}

/// Numeric and boolean scalars name files too, e.g. `cover: 2019`
fn scalar_to_key(value: &mut YamlValue) {
    let key = match value {
        YamlValue::Number(number) => number.to_string(),
        YamlValue::Bool(flag) => flag.to_string(),
        _ => return,
    };
    *value = YamlValue::String(key);
}

/// Characters the URL parser would strip from a reference rather than keep.
const STRIPPED_BY_PARSER: &AsciiSet = &CONTROLS.add(b' ');

/// Resolve one relative reference against the album base URL.
///
/// Returns the decoded absolute path, e.g. `/vacation/beach.jpg`. Query and
/// fragment parts are ignored. Whitespace is part of the key, including at
/// either end.
pub fn resolve_reference(base: &Url, reference: &str) -> Option<String> {
    let escaped = utf8_percent_encode(reference, STRIPPED_BY_PARSER).to_string();
    match base.join(&escaped) {
        Ok(resolved) if resolved.origin() == base.origin() => Some(decoded_path(&resolved)),
        Ok(resolved) => {
            warn!(
                "Ordering reference {} points outside the album store ({}), ignoring it",
                reference, resolved
            );
            None
        }
        Err(e) => {
            warn!("Ordering reference {} cannot be resolved: {}", reference, e);
            None
        }
    }
}

/// Fetch and preprocess an album's ordering document.
///
/// - Missing document: negative, with `Error::NotFound` as the cause.
/// - Malformed document: negative, with `Error::OrderingParse` as the cause.
/// - Any other store failure: returned as an error.
pub fn fetch_ordering(
    store: &dyn ObjectStore,
    location: &AlbumLocation,
    ordering_file: &str,
) -> Result<Fetch<OrderingConfig>> {
    let key = location.object_key(ordering_file);
    let bytes = match store.get_object(location.bucket(), &key) {
        Ok(bytes) => bytes,
        Err(e) if e.is_not_found() => {
            return Ok(Fetch::Negative {
                value: OrderingConfig::negative(),
                cause: e,
            })
        }
        Err(e) => return Err(e),
    };

    let parsed = String::from_utf8(bytes)
        .map_err(|e| e.to_string())
        .and_then(|document| OrderingConfig::parse(&document).map_err(|e| e.to_string()));

    match parsed {
        Ok(config) => Ok(Fetch::Found(config.resolved_against(location.base_url()))),
        Err(message) => {
            warn!(
                "Could not parse ordering document for album {}, it's likely malformed: {}",
                location.path(),
                message
            );
            Ok(Fetch::Negative {
                value: OrderingConfig::negative(),
                cause: Error::OrderingParse { key, message },
            })
        }
    }
}

/// The album's ordering document behind a [`RevalidatingCache`]
#[derive(Clone)]
pub struct OrderingCache {
    cache: RevalidatingCache<OrderingConfig>,
    store: Arc<dyn ObjectStore>,
    location: AlbumLocation,
    ordering_file: String,
}

impl OrderingCache {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        location: AlbumLocation,
        ordering_file: &str,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            cache: RevalidatingCache::new(format!("ordering {}", location.path()), refresh_interval),
            store,
            location,
            ordering_file: ordering_file.to_string(),
        }
    }

    /// Cached configuration. Negative snapshots carry their cause; only
    /// transport failures on first use come back as `Err`.
    pub fn get(&self) -> Result<Arc<CachedValue<OrderingConfig>>> {
        let store = Arc::clone(&self.store);
        let location = self.location.clone();
        let ordering_file = self.ordering_file.clone();
        self.cache
            .get(move || fetch_ordering(store.as_ref(), &location, &ordering_file))
    }

    pub fn state(&self) -> Result<CacheState> {
        self.cache.state()
    }
}
