//! In-process stale-while-revalidate caching of a single value
//!
//! A [`RevalidatingCache`] holds at most one value. The first read fetches
//! synchronously; later reads return the cached snapshot immediately and, once
//! it is older than the refresh interval, start one detached refresh on its
//! own thread. Readers never wait for a refresh, and a refresh that never
//! returns only ever holds its own thread.
//!
//! Snapshots are immutable `Arc<CachedValue<T>>`s swapped in whole, so a
//! reader sees either the previous value or the new one, never a mix.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::error::{Error, Result};

/// Outcome of a fetch that produced something worth caching
#[derive(Debug)]
pub enum Fetch<T> {
    /// The resource exists and was read.
    Found(T),
    /// The resource is absent or unusable. `value` is cached for the full
    /// refresh interval and `cause` is kept for diagnostics.
    Negative { value: T, cause: Error },
}

/// One cached snapshot
#[derive(Debug)]
pub struct CachedValue<T> {
    pub value: T,
    pub refreshed_at: Instant,
    /// Why the value is negative, if it is.
    pub cause: Option<Arc<Error>>,
}

impl<T> CachedValue<T> {
    fn new(fetched: Fetch<T>) -> Self {
        let (value, cause) = match fetched {
            Fetch::Found(value) => (value, None),
            Fetch::Negative { value, cause } => (value, Some(Arc::new(cause))),
        };
        Self {
            value,
            refreshed_at: Instant::now(),
            cause,
        }
    }

    /// Whether this snapshot records the absence of the resource
    pub fn is_negative(&self) -> bool {
        self.cause.is_some()
    }

    pub fn age(&self) -> Duration {
        self.refreshed_at.elapsed()
    }

    pub fn is_stale(&self, refresh_interval: Duration) -> bool {
        self.age() > refresh_interval
    }
}

/// Observable state of a cache slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Nothing fetched yet.
    Empty,
    /// Holding a value younger than the refresh interval.
    Fresh,
    /// Holding a value past the refresh interval, no refresh running.
    Stale,
    /// A background refresh is in flight; readers get the previous value.
    Refreshing,
}

#[derive(Debug)]
struct Slot<T> {
    name: String,
    refresh_interval: Duration,
    current: RwLock<Option<Arc<CachedValue<T>>>>,
    fetch_lock: Mutex<()>,
    refreshing: AtomicBool,
}

impl<T> Slot<T> {
    fn snapshot(&self) -> Result<Option<Arc<CachedValue<T>>>> {
        let current = self.current.read().map_err(|_| Error::LockPoisoned {
            context: format!("cache slot {}", self.name),
        })?;
        Ok(current.clone())
    }

    /// Run `fetch` and publish its result. Callers hold `fetch_lock`.
    fn fetch_and_store<F>(&self, fetch: F) -> Result<Arc<CachedValue<T>>>
    where
        F: FnOnce() -> Result<Fetch<T>>,
    {
        let cached = Arc::new(CachedValue::new(fetch()?));
        let mut current = self.current.write().map_err(|_| Error::LockPoisoned {
            context: format!("cache slot {}", self.name),
        })?;
        *current = Some(Arc::clone(&cached));
        Ok(cached)
    }

    /// Double-checked refresh: only fetch if the value is still stale once
    /// the lock is held.
    fn refresh<F>(&self, fetch: F) -> Result<()>
    where
        F: FnOnce() -> Result<Fetch<T>>,
    {
        let _guard = self.fetch_lock.lock().map_err(|_| Error::LockPoisoned {
            context: format!("cache slot {} fetch lock", self.name),
        })?;

        if let Some(cached) = self.snapshot()? {
            if !cached.is_stale(self.refresh_interval) {
                debug!("{}: already refreshed by another reader", self.name);
                return Ok(());
            }
        }

        self.fetch_and_store(fetch).map(|_| ())
    }
}

/// A single-value cache with stale-while-revalidate semantics.
///
/// Cloning is cheap and clones share the same slot.
#[derive(Debug)]
pub struct RevalidatingCache<T> {
    slot: Arc<Slot<T>>,
}

impl<T> Clone for RevalidatingCache<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: Send + Sync + 'static> RevalidatingCache<T> {
    /// Create an empty cache. `name` only appears in log lines.
    pub fn new(name: impl Into<String>, refresh_interval: Duration) -> Self {
        Self {
            slot: Arc::new(Slot {
                name: name.into(),
                refresh_interval,
                current: RwLock::new(None),
                fetch_lock: Mutex::new(()),
                refreshing: AtomicBool::new(false),
            }),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        self.slot.refresh_interval
    }

    /// Current snapshot without fetching or refreshing
    pub fn peek(&self) -> Result<Option<Arc<CachedValue<T>>>> {
        self.slot.snapshot()
    }

    pub fn state(&self) -> Result<CacheState> {
        let state = match self.slot.snapshot()? {
            None => CacheState::Empty,
            Some(_) if self.slot.refreshing.load(Ordering::Acquire) => CacheState::Refreshing,
            Some(cached) if cached.is_stale(self.slot.refresh_interval) => CacheState::Stale,
            Some(_) => CacheState::Fresh,
        };
        Ok(state)
    }

    /// Get the cached value, fetching it if the cache is empty.
    ///
    /// - Empty: `fetch` runs on the calling thread under the fetch lock. A
    ///   failure is returned and nothing is cached. Concurrent cold readers
    ///   wait for the first fetch and share its result.
    /// - Cached: the snapshot is returned at once. If it is stale, a refresh
    ///   is spawned unless one is already running. A failed refresh keeps the
    ///   old value and is only logged.
    pub fn get<F>(&self, fetch: F) -> Result<Arc<CachedValue<T>>>
    where
        F: FnOnce() -> Result<Fetch<T>> + Send + 'static,
    {
        if let Some(cached) = self.slot.snapshot()? {
            if cached.is_stale(self.slot.refresh_interval) {
                self.spawn_refresh(fetch);
            }
            return Ok(cached);
        }

        let _guard = self.slot.fetch_lock.lock().map_err(|_| Error::LockPoisoned {
            context: format!("cache slot {} fetch lock", self.slot.name),
        })?;

        // Another cold reader may have filled the slot while we waited
        if let Some(cached) = self.slot.snapshot()? {
            return Ok(cached);
        }

        debug!("{}: cache miss, fetching", self.slot.name);
        self.slot.fetch_and_store(fetch)
    }

    fn spawn_refresh<F>(&self, fetch: F)
    where
        F: FnOnce() -> Result<Fetch<T>> + Send + 'static,
    {
        if self
            .slot
            .refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        debug!("{}: value is stale, refreshing in background", self.slot.name);
        let slot = Arc::clone(&self.slot);
        let spawned = thread::Builder::new()
            .name("album-refresh".to_string())
            .spawn(move || {
                if let Err(e) = slot.refresh(fetch) {
                    warn!("{}: background refresh failed, keeping cached value: {}", slot.name, e);
                }
                slot.refreshing.store(false, Ordering::Release);
            });

        if let Err(e) = spawned {
            warn!("{}: could not start background refresh: {}", self.slot.name, e);
            self.slot.refreshing.store(false, Ordering::Release);
        }
    }
}
