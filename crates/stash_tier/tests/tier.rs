// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for `CacheTier` trait default implementations.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{TimeDelta, Utc};
use stash_tier::{CacheRecord, CacheTier, Error, TierStats};

/// Minimal implementation that only provides required methods
struct MinimalTier {
    data: Mutex<HashMap<String, CacheRecord>>,
}

impl MinimalTier {
    fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
        }
    }
}

impl CacheTier for MinimalTier {
    async fn get(&self, key: &str) -> Result<Option<CacheRecord>, Error> {
        Ok(self.data.lock().expect("lock poisoned").get(key).cloned())
    }

    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, CacheRecord>, Error> {
        let data = self.data.lock().expect("lock poisoned");
        Ok(keys
            .iter()
            .filter_map(|key| data.get(*key).map(|record| ((*key).to_string(), record.clone())))
            .collect())
    }

    async fn keys(&self, _pattern: &str) -> Result<Vec<String>, Error> {
        Ok(self.data.lock().expect("lock poisoned").keys().cloned().collect())
    }

    async fn insert(&self, record: &CacheRecord) -> Result<bool, Error> {
        self.data
            .lock()
            .expect("lock poisoned")
            .insert(record.key().to_string(), record.clone());
        Ok(true)
    }

    async fn invalidate(&self, key: &str) -> Result<bool, Error> {
        self.data.lock().expect("lock poisoned").remove(key);
        Ok(true)
    }

    async fn clear(&self) -> Result<bool, Error> {
        self.data.lock().expect("lock poisoned").clear();
        Ok(true)
    }

    async fn stats(&self) -> Result<TierStats, Error> {
        Ok(TierStats::default())
    }
}

fn record(key: &str, payload: &[u8]) -> CacheRecord {
    CacheRecord::new(key, payload.to_vec(), Utc::now() + TimeDelta::seconds(60))
}

#[tokio::test]
async fn minimal_tier_get_miss() {
    let tier = MinimalTier::new();
    let result = tier.get("key").await.expect("error on get");
    assert!(result.is_none());
}

#[tokio::test]
async fn minimal_tier_get_hit() {
    let tier = MinimalTier::new();
    let written = record("key", b"v1").with_tags(["t1"]);
    assert!(tier.insert(&written).await.expect("error on insert"));

    let read = tier.get("key").await.expect("error on get").expect("record should exist");
    assert_eq!(read, written);
}

#[tokio::test]
async fn minimal_tier_upsert_overwrites() {
    let tier = MinimalTier::new();
    tier.insert(&record("key", b"v1")).await.expect("error on insert");
    tier.insert(&record("key", b"v2")).await.expect("error on insert");

    let read = tier.get("key").await.expect("error on get").expect("record should exist");
    assert_eq!(read.payload(), b"v2");
    assert_eq!(tier.keys("").await.expect("error on keys").len(), 1, "upsert must not duplicate");
}

#[tokio::test]
async fn minimal_tier_get_many_omits_misses() {
    let tier = MinimalTier::new();
    tier.insert(&record("a", b"1")).await.expect("error on insert");
    tier.insert(&record("b", b"2")).await.expect("error on insert");

    let found = tier.get_many(&["a", "b", "c"]).await.expect("error on get_many");
    assert_eq!(found.len(), 2);
    assert!(!found.contains_key("c"));
}

#[tokio::test]
async fn minimal_tier_invalidate_is_idempotent() {
    let tier = MinimalTier::new();
    tier.insert(&record("key", b"v")).await.expect("error on insert");

    assert!(tier.invalidate("key").await.expect("error on invalidate"));
    // Absent key is still an acknowledged success.
    assert!(tier.invalidate("key").await.expect("error on invalidate"));
}

#[tokio::test]
async fn minimal_tier_clear_empties_listing() {
    let tier = MinimalTier::new();
    tier.insert(&record("a", b"")).await.expect("error on insert");
    tier.insert(&record("b", b"")).await.expect("error on insert");

    assert!(tier.clear().await.expect("error on clear"));
    assert!(tier.keys("").await.expect("error on keys").is_empty());
}

#[test]
fn default_len_reports_untracked_size() {
    let tier = MinimalTier::new();
    assert_eq!(tier.len(), None);
    assert_eq!(tier.is_empty(), None);
}

#[tokio::test]
async fn dynamic_tier_delegates_to_wrapped_tier() {
    use stash_tier::DynamicTierExt;

    let tier = MinimalTier::new().into_dynamic();
    let cloned = tier.clone();

    cloned.insert(&record("key", b"v")).await.expect("error on insert");
    let read = tier.get("key").await.expect("error on get").expect("record should exist");
    assert_eq!(read.payload(), b"v");
    assert_eq!(tier.len(), None, "delegates the default len");
}
