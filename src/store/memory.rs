//! In-memory object store

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use super::{ObjectEntry, ObjectStore};
use crate::defaults::KEY_SEPARATOR;
use crate::error::{Error, Result};

/// Buckets kept in memory, listed in lexicographic key order like a real
/// object store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    buckets: RwLock<HashMap<String, BTreeMap<String, Vec<u8>>>>,
    fail_listing: AtomicBool,
    fail_gets: AtomicBool,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an object
    pub fn put_object(&self, bucket: &str, key: &str, content: impl Into<Vec<u8>>) -> Result<()> {
        let mut buckets = self.buckets.write().map_err(|_| Error::LockPoisoned {
            context: "memory store".to_string(),
        })?;
        buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), content.into());
        Ok(())
    }

    /// Remove an object, returning whether it existed
    pub fn delete_object(&self, bucket: &str, key: &str) -> Result<bool> {
        let mut buckets = self.buckets.write().map_err(|_| Error::LockPoisoned {
            context: "memory store".to_string(),
        })?;
        Ok(buckets
            .get_mut(bucket)
            .and_then(|objects| objects.remove(key))
            .is_some())
    }

    /// Make every listing fail with a transport error
    pub fn set_fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    /// Make every object fetch fail with a transport error
    pub fn set_fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    /// Number of `list_objects` calls so far
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of `get_object` calls so far
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    fn read<T>(&self, f: impl FnOnce(&HashMap<String, BTreeMap<String, Vec<u8>>>) -> T) -> Result<T> {
        let buckets = self.buckets.read().map_err(|_| Error::LockPoisoned {
            context: "memory store".to_string(),
        })?;
        Ok(f(&buckets))
    }
}

impl ObjectStore for MemoryStore {
    fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectEntry>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(Error::transport("list", prefix, "simulated listing failure"));
        }

        self.read(|buckets| {
            let Some(objects) = buckets.get(bucket) else {
                return Vec::new();
            };
            objects
                .range(prefix.to_string()..)
                .take_while(|(key, _)| key.starts_with(prefix))
                .filter_map(|(key, _)| {
                    let rest = &key[prefix.len()..];
                    if rest.is_empty() && key.ends_with(KEY_SEPARATOR) {
                        Some(ObjectEntry::folder(key.clone()))
                    } else if rest.contains(KEY_SEPARATOR) {
                        // Nested objects are rolled up by the delimiter
                        None
                    } else {
                        Some(ObjectEntry::object(key.clone()))
                    }
                })
                .collect()
        })
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(Error::transport("get", key, "simulated fetch failure"));
        }

        self.read(|buckets| {
            buckets
                .get(bucket)
                .and_then(|objects| objects.get(key))
                .cloned()
        })?
        .ok_or_else(|| Error::NotFound {
            key: key.to_string(),
        })
    }

    fn head_object(&self, bucket: &str, key: &str) -> Result<bool> {
        self.read(|buckets| {
            buckets
                .get(bucket)
                .is_some_and(|objects| objects.contains_key(key))
        })
    }
}
