// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The core trait for cache storage backends.
//!
//! [`CacheTier`] defines the interface that all stash storage backends must
//! implement. This trait is designed for composition: implement the storage
//! operations, then let the pool layer tagging, expiration policy, and
//! serialization on top.

use std::collections::HashMap;

use crate::{CacheRecord, Error, TierStats};

/// The maximum number of keys a tier returns from an unfiltered enumeration.
///
/// Bounds memory and response size when a pool asks for every key; backends
/// apply it as a query limit, not a post-filter.
pub const MAX_KEY_LIST: usize = 9999;

/// Trait for cache tier implementations.
///
/// Implement this trait to plug a storage backend into the stash cache pool.
/// A tier is stateless with respect to pool logic: each method maps one
/// normalized operation onto the native store and back, with no caching,
/// batching, or retries of its own. Absent keys are normal empty results,
/// never errors; write-path failures are wrapped and surfaced so the pool can
/// decide retry policy.
///
/// The only ordering guarantee a tier provides is per-key atomicity of
/// [`insert`](CacheTier::insert) — safe to invoke concurrently across
/// independent keys.
///
/// Only `len` and `is_empty` have default implementations:
/// - `len`: Returns `None` (not all tiers track size)
/// - `is_empty`: Delegates to `len`
#[cfg_attr(
    any(test, feature = "dynamic-tier"),
    dynosaur::dynosaur(pub(crate) DynCacheTier = dyn(box) CacheTier, bridge(none))
)]
pub trait CacheTier: Send + Sync {
    /// Gets the record stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<CacheRecord>, Error>> + Send;

    /// Gets the records stored under `keys` in one batched lookup.
    ///
    /// The result maps each found key to its record; keys with no match are
    /// simply absent.
    fn get_many(
        &self,
        keys: &[&str],
    ) -> impl Future<Output = Result<HashMap<String, CacheRecord>, Error>> + Send;

    /// Enumerates stored keys matching `pattern`.
    ///
    /// An empty pattern returns all keys, capped at [`MAX_KEY_LIST`]. In a
    /// non-empty pattern, `*` matches any run of characters and every other
    /// character matches literally, anywhere in the key. Each call re-runs
    /// the query; no cursor is held open between calls.
    fn keys(&self, pattern: &str) -> impl Future<Output = Result<Vec<String>, Error>> + Send;

    /// Upserts a record by its key, atomically with respect to concurrent
    /// writers on the same key.
    ///
    /// Returns `true` when the backend acknowledged the write; an error means
    /// the round trip itself failed.
    fn insert(&self, record: &CacheRecord) -> impl Future<Output = Result<bool, Error>> + Send;

    /// Deletes the record stored under `key`.
    ///
    /// Idempotent: deleting an absent key is still an acknowledged success.
    fn invalidate(&self, key: &str) -> impl Future<Output = Result<bool, Error>> + Send;

    /// Deletes every record in the tier, unconditionally.
    ///
    /// Any scoping (e.g. a namespace prefix) is the caller's to impose.
    fn clear(&self) -> impl Future<Output = Result<bool, Error>> + Send;

    /// Collects a diagnostics snapshot from the backing store.
    ///
    /// Best-effort and read-only: failures surface as
    /// [`ErrorKind::Stats`](crate::ErrorKind::Stats) and never affect cache
    /// correctness.
    fn stats(&self) -> impl Future<Output = Result<TierStats, Error>> + Send;

    /// Returns the number of entries, if supported.
    ///
    /// Returns `None` for implementations that don't track size.
    fn len(&self) -> Option<u64> {
        None
    }

    /// Returns `true` if the tier contains no entries.
    ///
    /// Returns `None` for implementations that don't track size.
    fn is_empty(&self) -> Option<bool> {
        self.len().map(|len| len == 0)
    }
}
