//! # Album Ordering Library
//!
//! This library serves photo albums whose images live in an object store. It
//! caches each album's key listing and ordering document in process, and
//! merges the two into a cover photo, a row of thumbnails and a full ordering.
//! It is used by the `album-order` command-line tool and is meant to sit
//! behind a page-rendering layer.
//!
//! ## Quick Example
//!
//! ```
//! use std::sync::Arc;
//! use album_order::album::{Album, AlbumLocation, AlbumSettings};
//! use album_order::resolver::OrderingResolver;
//! use album_order::store::MemoryStore;
//!
//! let store = Arc::new(MemoryStore::new());
//! for key in ["vacation/a.jpg", "vacation/b.jpg", "vacation/c.jpg"] {
//!     store.put_object("photos", key, "jpeg bytes").unwrap();
//! }
//! store
//!     .put_object("photos", "vacation/ordering.yaml", "cover: c.jpg\nordering: [b.jpg]")
//!     .unwrap();
//!
//! let location = AlbumLocation::new("/vacation/", "photos", "vacation/").unwrap();
//! let album = Album::new(store, location, AlbumSettings::default());
//!
//! let resolver = OrderingResolver::new(|key: &str| key.to_string());
//! let resolved = resolver.resolve(&album).unwrap();
//! assert_eq!(resolved.cover, "vacation/c.jpg");
//! assert_eq!(resolved.ordering, vec!["vacation/b.jpg", "vacation/a.jpg", "vacation/c.jpg"]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Revalidating cache (`cache`)**: A single-value stale-while-revalidate
//!   cache. The first read fetches; later reads never wait on the network and
//!   concurrent stale reads collapse into one background refresh.
//! - **Albums (`album`, `keys`, `ordering`)**: An album owns two cache slots,
//!   its key listing and its ordering document. A missing or malformed
//!   document is cached negatively.
//! - **Merging (`path`)**: Pure functions that compare keys and merge a
//!   preferred ordering into the authoritative listing.
//! - **Resolution (`resolver`, `render`)**: Picks cover, thumbnails and
//!   ordering, then renders each key through a caller-supplied renderer.
//! - **Storage (`store`)**: The object store collaborator trait with an
//!   in-memory and a directory-backed implementation.
//!
//! ## Execution Flow
//!
//! A call to `OrderingResolver::resolve`:
//!
//! 1.  **Fetch**: Reads the ordering document and the key listing, in
//!     parallel when either is not cached yet, each through its cache slot.
//! 2.  **Clean**: Removes the ordering document's own key from the listing.
//! 3.  **Select**: Picks the cover, merges thumbnails and the full ordering.
//! 4.  **Render**: Converts each chosen key into a displayable item.

pub mod album;
pub mod cache;
pub mod defaults;
pub mod error;
pub mod keys;
pub mod ordering;
pub mod path;
pub mod render;
pub mod resolver;
pub mod store;

#[cfg(test)]
mod path_proptest;
