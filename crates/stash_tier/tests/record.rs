// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for `CacheRecord`.

use chrono::{TimeDelta, Utc};
use stash_tier::CacheRecord;

#[test]
fn new_creates_record_without_tags_or_timestamps() {
    let expires = Utc::now();
    let record = CacheRecord::new("key", b"value".to_vec(), expires);
    assert_eq!(record.key(), "key");
    assert_eq!(record.payload(), b"value");
    assert!(record.tags().is_empty());
    assert_eq!(record.expires_at(), expires);
    assert!(record.created_at().is_none());
    assert!(record.modified_at().is_none());
}

#[test]
fn with_tags_replaces_tag_set() {
    let record = CacheRecord::new("key", vec![], Utc::now()).with_tags(["b", "a", "b"]);
    let tags: Vec<&str> = record.tags().iter().map(String::as_str).collect();
    assert_eq!(tags, vec!["a", "b"], "tags should be deduplicated and ordered");
}

#[test]
fn with_timestamps_sets_both_dates_independently() {
    let created = Utc::now() - TimeDelta::seconds(120);
    let modified = Utc::now() - TimeDelta::seconds(30);
    let record = CacheRecord::new("key", vec![], Utc::now()).with_timestamps(created, modified);
    assert_eq!(record.created_at(), Some(created));
    assert_eq!(record.modified_at(), Some(modified));
}

#[test]
fn set_expires_at_updates_expiry() {
    let mut record = CacheRecord::new("key", vec![], Utc::now());
    let later = Utc::now() + TimeDelta::seconds(300);
    record.set_expires_at(later);
    assert_eq!(record.expires_at(), later);
}

#[test]
fn into_payload_returns_bytes() {
    let record = CacheRecord::new("key", vec![1, 2, 3], Utc::now());
    assert_eq!(record.into_payload(), vec![1, 2, 3]);
}
