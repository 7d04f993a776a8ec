// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Dynamic cache tier wrapper for type erasure.

use std::{collections::HashMap, fmt::Debug, sync::Arc};

use crate::{CacheRecord, CacheTier, Error, TierStats, tier::DynCacheTier};

/// Extension trait for converting any `CacheTier` into a `DynamicTier`.
///
/// This trait is automatically implemented for all types that implement `CacheTier`.
///
/// # Examples
///
/// ```
/// use stash_tier::{CacheTier, DynamicTier, DynamicTierExt};
///
/// fn erase<T>(tier: T) -> DynamicTier
/// where
///     T: CacheTier + 'static,
/// {
///     tier.into_dynamic()
/// }
/// ```
pub trait DynamicTierExt: Sized {
    /// Converts this cache tier into a `DynamicTier`.
    fn into_dynamic(self) -> DynamicTier;
}

impl<T> DynamicTierExt for T
where
    T: CacheTier + 'static,
{
    fn into_dynamic(self) -> DynamicTier {
        DynamicTier::new(self)
    }
}

/// A clonable dynamic cache tier with type erasure.
///
/// `DynamicTier` wraps a trait object in an `Arc` to enable cloning while
/// maintaining dynamic dispatch. Use this when a pool needs to hold storage
/// backends without naming their concrete types.
///
/// # Examples
///
/// ```ignore
/// let dynamic: DynamicTier = some_tier.into_dynamic();
///
/// // DynamicTier is Clone
/// let clone = dynamic.clone();
/// ```
pub struct DynamicTier(Arc<DynCacheTier<'static>>);

impl DynamicTier {
    /// Creates a new dynamic tier from any `CacheTier` implementation.
    pub(crate) fn new<T>(tier: T) -> Self
    where
        T: CacheTier + Send + Sync + 'static,
    {
        Self(DynCacheTier::new_arc(tier))
    }
}

impl Debug for DynamicTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicTier").finish()
    }
}

impl Clone for DynamicTier {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl CacheTier for DynamicTier {
    async fn get(&self, key: &str) -> Result<Option<CacheRecord>, Error> {
        self.0.get(key).await
    }

    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, CacheRecord>, Error> {
        self.0.get_many(keys).await
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, Error> {
        self.0.keys(pattern).await
    }

    async fn insert(&self, record: &CacheRecord) -> Result<bool, Error> {
        self.0.insert(record).await
    }

    async fn invalidate(&self, key: &str) -> Result<bool, Error> {
        self.0.invalidate(key).await
    }

    async fn clear(&self) -> Result<bool, Error> {
        self.0.clear().await
    }

    async fn stats(&self) -> Result<TierStats, Error> {
        self.0.stats().await
    }

    fn len(&self) -> Option<u64> {
        self.0.len()
    }

    fn is_empty(&self) -> Option<bool> {
        self.0.is_empty()
    }
}
