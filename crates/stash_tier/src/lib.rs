// Copyright (c) Microsoft Corporation.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Core storage abstractions for building stash cache backends.
//!
//! This crate defines the [`CacheTier`] trait that all storage backends must satisfy,
//! along with [`CacheRecord`] for the persisted value shape, [`TierStats`] for
//! diagnostic snapshots, and [`Error`] for fallible operations.
//!
//! # Overview
//!
//! The tier abstraction separates persistence concerns from caching features. The
//! stash cache pool owns the item life cycle (tag index, expiration policy,
//! serialization format) and delegates persistence to a tier. A tier maps each
//! normalized operation onto its native store and back; it never interprets the
//! payload and never evaluates expiry on its own.
//!
//! # Implementing a Cache Tier
//!
//! Implement all required methods of [`CacheTier`]:
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::RwLock;
//!
//! use stash_tier::{CacheRecord, CacheTier, Error, TierStats, MAX_KEY_LIST};
//!
//! struct SimpleTier(RwLock<HashMap<String, CacheRecord>>);
//!
//! impl CacheTier for SimpleTier {
//!     async fn get(&self, key: &str) -> Result<Option<CacheRecord>, Error> {
//!         Ok(self.0.read().unwrap().get(key).cloned())
//!     }
//!
//!     async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, CacheRecord>, Error> {
//!         let data = self.0.read().unwrap();
//!         Ok(keys
//!             .iter()
//!             .filter_map(|key| data.get(*key).map(|record| ((*key).to_string(), record.clone())))
//!             .collect())
//!     }
//!
//!     async fn keys(&self, _pattern: &str) -> Result<Vec<String>, Error> {
//!         Ok(self.0.read().unwrap().keys().take(MAX_KEY_LIST).cloned().collect())
//!     }
//!
//!     async fn insert(&self, record: &CacheRecord) -> Result<bool, Error> {
//!         self.0.write().unwrap().insert(record.key().to_string(), record.clone());
//!         Ok(true)
//!     }
//!
//!     async fn invalidate(&self, key: &str) -> Result<bool, Error> {
//!         self.0.write().unwrap().remove(key);
//!         Ok(true)
//!     }
//!
//!     async fn clear(&self) -> Result<bool, Error> {
//!         self.0.write().unwrap().clear();
//!         Ok(true)
//!     }
//!
//!     async fn stats(&self) -> Result<TierStats, Error> {
//!         Ok(TierStats::default())
//!     }
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! Enable the `dynamic-tier` feature for [`DynamicTier`], which wraps any `CacheTier`
//! in a type-erased container. This is how a pool composes heterogeneous storage
//! backends without naming their concrete types.

pub mod error;
mod record;
mod stats;
#[cfg(any(feature = "test-util", test))]
pub mod testing;
pub(crate) mod tier;

#[cfg(any(test, feature = "dynamic-tier"))]
mod dynamic;

#[cfg(any(test, feature = "dynamic-tier"))]
#[doc(inline)]
pub use dynamic::{DynamicTier, DynamicTierExt};
#[doc(inline)]
pub use error::{Error, ErrorKind, Result};
#[doc(inline)]
pub use record::CacheRecord;
#[doc(inline)]
pub use stats::TierStats;
#[doc(inline)]
pub use tier::{CacheTier, MAX_KEY_LIST};
