// Copyright (c) Microsoft Corporation.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! MongoDB-backed cache tier for the stash caching framework.
//!
//! This crate provides [`MongoTier`], a persistent storage backend that maps
//! the stash [`CacheTier`](stash_tier::CacheTier) contract onto a MongoDB
//! collection through the official `mongodb` driver. Use [`MongoConfigBuilder`]
//! to configure the connection without touching driver types directly.
//!
//! Connection pooling, the wire protocol, and failover all belong to the
//! driver; this crate is the translation layer in between. Each operation is
//! a single round trip — no adapter-level caching, batching, or retries.
//!
//! # Quick Start
//!
//! ```no_run
//! use chrono::{TimeDelta, Utc};
//! use stash_mongodb::MongoTier;
//! use stash_tier::{CacheRecord, CacheTier};
//!
//! # async fn example() -> stash_tier::Result<()> {
//! let tier = MongoTier::builder()
//!     .host("127.0.0.1")
//!     .port(27017)
//!     .database_name("app_cache")
//!     .collection_name("app_cache")
//!     .connect()
//!     .await?;
//!
//! let record = CacheRecord::new("greeting", b"hello".to_vec(), Utc::now() + TimeDelta::seconds(60));
//! tier.insert(&record).await?;
//! let found = tier.get("greeting").await?;
//! assert_eq!(found.map(CacheRecord::into_payload), Some(b"hello".to_vec()));
//! # Ok(())
//! # }
//! ```
//!
//! # Persisted Layout
//!
//! One collection per cache namespace. Each record is a single document keyed
//! by the prefixed cache key, carrying the opaque payload as BSON binary, the
//! tag list, and an `expires_at` date. Two indexes are provisioned when the
//! collection is first created: a unique index on the key field and a TTL
//! index on `expires_at` with no grace period, so the server purges expired
//! records on its own. The `expires_at` value itself is the pool's to
//! interpret; this crate only persists and returns it.

pub mod config;
mod document;
mod stats;
pub mod tier;

#[doc(inline)]
pub use config::{MongoConfig, MongoConfigBuilder, ServerEndpoint};
#[doc(inline)]
pub use tier::MongoTier;
