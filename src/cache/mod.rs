//! Memoization of extraction results
//!
//! Results are stored per (kind, key), the key being the product's article
//! number. Every kind has its own freshness policy: prices go stale after
//! thirty seconds, everything else is kept for the life of the process.
//!
//! Expiry is lazy. An expired entry reads as a miss and is dropped on that
//! read; nothing sweeps the map in the background. Two callers missing on
//! the same key at once will both fetch, and the later write wins.

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use crate::extract::{ImageBlob, ProductIdentity, SpecificationTable};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// How long prices stay fresh
pub const PRICE_TTL_SECS: i64 = 30;

/// Partition of the cache key space by data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Identity,
    Price,
    Meta,
    Image,
}

impl CacheKind {
    /// The policy entries of this kind are stored with
    pub fn expiry(&self) -> Expiry {
        match self {
            Self::Price => Expiry::After(Duration::seconds(PRICE_TTL_SECS)),
            Self::Identity | Self::Meta | Self::Image => Expiry::Never,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Price => "price",
            Self::Meta => "meta",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifetime of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    Never,
    After(Duration),
}

/// A memoized extraction result
#[derive(Debug, Clone)]
pub enum CachedValue {
    Identity(ProductIdentity),
    Price(f32),
    Meta(Arc<SpecificationTable>),
    Image(Arc<ImageBlob>),
}

impl CachedValue {
    pub fn kind(&self) -> CacheKind {
        match self {
            Self::Identity(_) => CacheKind::Identity,
            Self::Price(_) => CacheKind::Price,
            Self::Meta(_) => CacheKind::Meta,
            Self::Image(_) => CacheKind::Image,
        }
    }
}

/// A stored value with its absolute expiration instant
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub kind: CacheKind,
    pub key: String,
    pub value: CachedValue,
    /// `None` means the entry never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    /// An entry is expired from its expiration instant onwards
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

type EntryKey = (CacheKind, String);

/// Process-wide memoization store
///
/// Created once at startup and handed to its users as an `Arc`. Safe to
/// share across threads; reads only take the shared lock.
pub struct MemoStore {
    entries: RwLock<HashMap<EntryKey, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoStore")
            .field("entries", &self.len())
            .finish()
    }
}

impl MemoStore {
    /// A store reading time from the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// A store reading time from `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Looks up a fresh entry
    ///
    /// Returns `None` on a miss or when the entry has expired, in which
    /// case the entry is removed.
    pub fn get(&self, kind: CacheKind, key: &str) -> Option<CachedValue> {
        let now = self.clock.now();
        let lookup = (kind, key.to_string());

        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(&lookup) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // A writer may have refreshed the entry between the two locks
        if entries.get(&lookup).is_some_and(|entry| entry.is_expired(now)) {
            tracing::trace!("Dropping expired {} entry {}", kind, key);
            entries.remove(&lookup);
        }
        None
    }

    /// Stores `value` under its kind and `key`, replacing any previous entry
    pub fn put(&self, key: impl Into<String>, value: CachedValue, expiry: Expiry) {
        let kind = value.kind();
        let key = key.into();
        let expires_at = match expiry {
            Expiry::Never => None,
            Expiry::After(ttl) => Some(self.clock.now() + ttl),
        };

        let entry = CacheEntry {
            kind,
            key: key.clone(),
            value,
            expires_at,
        };

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((kind, key), entry);
    }

    /// Stores `value` with its kind's default policy
    pub fn insert(&self, key: impl Into<String>, value: CachedValue) {
        let expiry = value.kind().expiry();
        self.put(key, value, expiry);
    }

    /// Number of stored entries, expired ones not yet dropped included
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
