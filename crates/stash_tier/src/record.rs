// Copyright (c) Microsoft Corporation.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

/// The persisted shape of a cached item.
///
/// `CacheRecord` carries everything a storage backend writes for one key: the
/// opaque serialized payload, the tag set, and the expiration instant. The
/// payload bytes belong to the cache pool — a tier stores and returns them
/// without ever decoding them, and `expires_at` is persisted verbatim as the
/// sole expiration authority.
///
/// # Examples
///
/// ```
/// use chrono::{TimeDelta, Utc};
/// use stash_tier::CacheRecord;
///
/// let record = CacheRecord::new("user:42", b"payload".to_vec(), Utc::now() + TimeDelta::seconds(60))
///     .with_tags(["session"]);
/// assert_eq!(record.key(), "user:42");
/// assert_eq!(record.payload(), b"payload");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheRecord {
    key: String,
    payload: Vec<u8>,
    tags: BTreeSet<String>,
    expires_at: DateTime<Utc>,
    created_at: Option<DateTime<Utc>>,
    modified_at: Option<DateTime<Utc>>,
}

impl CacheRecord {
    /// Creates a new record with the given key, payload, and expiration instant.
    ///
    /// The record starts with no tags and no detailed timestamps.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use stash_tier::CacheRecord;
    ///
    /// let record = CacheRecord::new("key", vec![1, 2, 3], Utc::now());
    /// assert!(record.tags().is_empty());
    /// assert!(record.created_at().is_none());
    /// ```
    pub fn new(key: impl Into<String>, payload: Vec<u8>, expires_at: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            payload,
            tags: BTreeSet::new(),
            expires_at,
            created_at: None,
            modified_at: None,
        }
    }

    /// Replaces the tag set, consuming and returning the record.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use stash_tier::CacheRecord;
    ///
    /// let record = CacheRecord::new("key", vec![], Utc::now()).with_tags(["a", "b"]);
    /// assert_eq!(record.tags().len(), 2);
    /// ```
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the detailed timestamps, consuming and returning the record.
    ///
    /// Backends populate these only when detailed timestamp tracking is
    /// enabled; records read back from storage that predate the feature get
    /// both defaulted independently to the read time.
    #[must_use]
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, modified_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self.modified_at = Some(modified_at);
        self
    }

    /// Returns the cache key this record is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the opaque serialized payload.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consumes the record and returns the payload bytes.
    #[must_use]
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Returns the tags attached to this record.
    #[must_use]
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Returns the instant at which the record expires.
    ///
    /// A tier persists and returns this value; evaluating it is the pool's job.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Sets the expiration instant.
    pub fn set_expires_at(&mut self, expires_at: DateTime<Utc>) {
        self.expires_at = expires_at;
    }

    /// Returns the creation timestamp, if detailed tracking recorded one.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns the last-modification timestamp, if detailed tracking recorded one.
    #[must_use]
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }
}
