// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mock tier implementation for testing.
//!
//! This module provides `MockTier`, a configurable in-memory tier that
//! records all operations and supports failure injection for testing error paths.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;

use crate::{CacheRecord, CacheTier, Error, TierStats, tier::MAX_KEY_LIST};

/// Recorded tier operation with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierOp {
    /// A get operation was performed with the given key.
    Get(String),
    /// A batched get operation was performed with the given keys.
    GetMany(Vec<String>),
    /// A key enumeration was performed with the given pattern.
    Keys(String),
    /// An insert operation was performed with the given record.
    Insert {
        /// The record that was upserted.
        record: CacheRecord,
    },
    /// An invalidate operation was performed with the given key.
    Invalidate(String),
    /// A clear operation was performed.
    Clear,
    /// A statistics snapshot was requested.
    Stats,
}

type FailPredicate = Box<dyn Fn(&TierOp) -> bool + Send + Sync>;

/// A configurable mock tier for testing.
///
/// This tier stores records in memory and can be configured to fail
/// operations on demand, making it useful for testing error handling paths.
/// All operations are recorded for later verification. Key enumeration
/// honors the same wildcard and [`MAX_KEY_LIST`] semantics as real backends,
/// so contract-level tests observe accurate behavior.
///
/// # Examples
///
/// ```no_run
/// use chrono::Utc;
/// use stash_tier::{CacheRecord, CacheTier, testing::{MockTier, TierOp}};
///
/// # async fn example() {
/// let tier = MockTier::new();
/// let record = CacheRecord::new("key", b"v".to_vec(), Utc::now());
///
/// // Insert and retrieve
/// tier.insert(&record).await.unwrap();
/// let found = tier.get("key").await.unwrap();
/// assert_eq!(found.unwrap().payload(), b"v");
///
/// // Verify operations
/// assert_eq!(tier.operations(), vec![
///     TierOp::Insert { record },
///     TierOp::Get("key".to_string()),
/// ]);
/// # }
/// ```
///
/// # Failure Injection
///
/// ```no_run
/// use stash_tier::{CacheTier, testing::{MockTier, TierOp}};
///
/// # async fn example() {
/// let tier = MockTier::new();
///
/// // Fail all get operations
/// tier.fail_when(|op| matches!(op, TierOp::Get(_)));
/// assert!(tier.get("key").await.is_err());
///
/// // Fail only specific keys
/// tier.fail_when(|op| matches!(op, TierOp::Get(k) if k == "forbidden"));
/// assert!(tier.get("forbidden").await.is_err());
/// assert!(tier.get("allowed").await.is_ok());
/// # }
/// ```
#[derive(Default)]
pub struct MockTier {
    data: Arc<Mutex<HashMap<String, CacheRecord>>>,
    operations: Arc<Mutex<Vec<TierOp>>>,
    fail_when: Arc<Mutex<Option<FailPredicate>>>,
}

impl std::fmt::Debug for MockTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTier")
            .field("data", &self.data)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish()
    }
}

impl Clone for MockTier {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
        }
    }
}

impl MockTier {
    /// Creates a new empty mock tier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock tier with pre-populated records.
    #[must_use]
    pub fn with_data(records: impl IntoIterator<Item = CacheRecord>) -> Self {
        let data = records
            .into_iter()
            .map(|record| (record.key().to_string(), record))
            .collect();
        Self {
            data: Arc::new(Mutex::new(data)),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the number of records in the tier.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.data.lock().len()
    }

    /// Returns true if the tier contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.lock().contains_key(key)
    }

    /// Sets a predicate that determines when operations should fail.
    ///
    /// The predicate receives the operation and returns `true` if it should fail.
    ///
    /// # Examples
    ///
    /// ```
    /// use stash_tier::testing::{MockTier, TierOp};
    ///
    /// let tier = MockTier::new();
    ///
    /// // Fail all operations
    /// tier.fail_when(|_| true);
    ///
    /// // Fail only clears
    /// tier.fail_when(|op| matches!(op, TierOp::Clear));
    ///
    /// // Fail gets for a specific key
    /// tier.fail_when(|op| matches!(op, TierOp::Get(k) if k == "bad_key"));
    /// ```
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&TierOp) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, allowing all operations to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<TierOp> {
        self.operations.lock().clone()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    fn record(&self, op: TierOp) {
        self.operations.lock().push(op);
    }

    fn should_fail(&self, op: &TierOp) -> bool {
        self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(op))
    }
}

/// Unanchored wildcard match: `*` matches any run of characters, every other
/// character matches literally, anywhere in the candidate.
fn wildcard_matches(pattern: &str, candidate: &str) -> bool {
    let mut position = 0;
    for segment in pattern.split('*') {
        match candidate[position..].find(segment) {
            Some(offset) => position += offset + segment.len(),
            None => return false,
        }
    }
    true
}

impl CacheTier for MockTier {
    async fn get(&self, key: &str) -> Result<Option<CacheRecord>, Error> {
        let op = TierOp::Get(key.to_string());
        if self.should_fail(&op) {
            self.record(op);
            return Err(Error::unavailable("mock: get failed"));
        }
        self.record(op);
        Ok(self.data.lock().get(key).cloned())
    }

    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, CacheRecord>, Error> {
        let op = TierOp::GetMany(keys.iter().map(ToString::to_string).collect());
        if self.should_fail(&op) {
            self.record(op);
            return Err(Error::unavailable("mock: get_many failed"));
        }
        self.record(op);
        let data = self.data.lock();
        Ok(keys
            .iter()
            .filter_map(|key| data.get(*key).map(|record| ((*key).to_string(), record.clone())))
            .collect())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, Error> {
        let op = TierOp::Keys(pattern.to_string());
        if self.should_fail(&op) {
            self.record(op);
            return Err(Error::unavailable("mock: keys failed"));
        }
        self.record(op);
        // Sorted for determinism; real backends return store order.
        let mut keys: Vec<String> = self
            .data
            .lock()
            .keys()
            .filter(|key| pattern.is_empty() || wildcard_matches(pattern, key))
            .cloned()
            .collect();
        keys.sort_unstable();
        keys.truncate(MAX_KEY_LIST);
        Ok(keys)
    }

    async fn insert(&self, record: &CacheRecord) -> Result<bool, Error> {
        let op = TierOp::Insert {
            record: record.clone(),
        };
        if self.should_fail(&op) {
            self.record(op);
            return Err(Error::write("mock: insert failed"));
        }
        self.record(op);
        self.data.lock().insert(record.key().to_string(), record.clone());
        Ok(true)
    }

    async fn invalidate(&self, key: &str) -> Result<bool, Error> {
        let op = TierOp::Invalidate(key.to_string());
        if self.should_fail(&op) {
            self.record(op);
            return Err(Error::write("mock: invalidate failed"));
        }
        self.record(op);
        self.data.lock().remove(key);
        Ok(true)
    }

    async fn clear(&self) -> Result<bool, Error> {
        let op = TierOp::Clear;
        if self.should_fail(&op) {
            self.record(op);
            return Err(Error::write("mock: clear failed"));
        }
        self.record(op);
        self.data.lock().clear();
        Ok(true)
    }

    async fn stats(&self) -> Result<TierStats, Error> {
        let op = TierOp::Stats;
        if self.should_fail(&op) {
            self.record(op);
            return Err(Error::stats("mock: stats failed"));
        }
        self.record(op);
        let data = self.data.lock();
        let size: u64 = data.values().map(|record| record.payload().len() as u64).sum();
        let raw = serde_json::json!({ "entry_count": data.len() });
        Ok(TierStats::new("mock tier", size, raw))
    }

    fn len(&self) -> Option<u64> {
        Some(self.data.lock().len() as u64)
    }
}
