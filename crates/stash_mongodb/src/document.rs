// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The BSON document shape one cache record is stored as.

use bson::spec::BinarySubtype;
use bson::{Binary, Document, doc};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use stash_tier::CacheRecord;

/// One cache record as persisted in the collection.
///
/// `_id` is the prefixed cache key, which makes the natural primary index the
/// per-key atomicity point for upserts. `key` holds the unprefixed pool key —
/// the field enumeration and pattern matching run against, covered by the
/// unique key index. `expires_at` is covered by the TTL index; the server
/// deletes due documents on its own, with no grace period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RecordDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub key: String,
    pub payload: Binary,
    pub tags: Vec<String>,
    pub expires_at: bson::DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<bson::DateTime>,
}

/// Key-only projection used by key enumeration.
#[derive(Debug, Deserialize)]
pub(crate) struct KeyDocument {
    pub key: String,
}

impl RecordDocument {
    /// Unwraps the document back into the pool-facing record.
    ///
    /// Detailed timestamps are surfaced only when tracking is enabled.
    /// Records written before tracking was switched on lack the fields;
    /// each one then defaults to the read time, independently.
    pub(crate) fn into_record(self, detailed_timestamps: bool) -> CacheRecord {
        let mut record = CacheRecord::new(self.key, self.payload.bytes, self.expires_at.to_chrono())
            .with_tags(self.tags);
        if detailed_timestamps {
            let now = Utc::now();
            let created_at = self.created_at.map_or(now, bson::DateTime::to_chrono);
            let modified_at = self.modified_at.map_or(now, bson::DateTime::to_chrono);
            record = record.with_timestamps(created_at, modified_at);
        }
        record
    }
}

/// Builds the `$set` payload for an upsert of `record`.
///
/// `_id` stays out of the update document; the upsert filter carries it.
/// Timestamp fields are written only when tracking is enabled, defaulting to
/// the write time when the pool did not supply them.
pub(crate) fn set_fields(record: &CacheRecord, detailed_timestamps: bool) -> Document {
    let mut set = doc! {
        "key": record.key(),
        "payload": Binary {
            subtype: BinarySubtype::Generic,
            bytes: record.payload().to_vec(),
        },
        "tags": record.tags().iter().map(String::as_str).collect::<Vec<_>>(),
        "expires_at": bson::DateTime::from_chrono(record.expires_at()),
    };
    if detailed_timestamps {
        let now = bson::DateTime::now();
        set.insert(
            "created_at",
            record.created_at().map_or(now, bson::DateTime::from_chrono),
        );
        set.insert(
            "modified_at",
            record.modified_at().map_or(now, bson::DateTime::from_chrono),
        );
    }
    set
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeDelta, Utc};

    use super::*;

    /// Chrono time truncated to the millisecond precision BSON dates carry.
    fn bson_now() -> DateTime<Utc> {
        bson::DateTime::now().to_chrono()
    }

    fn stored(set: Document, id: &str) -> RecordDocument {
        let mut full = set;
        full.insert("_id", id);
        bson::from_document(full).expect("stored document should deserialize")
    }

    #[test]
    fn set_fields_round_trips_record() {
        let written = CacheRecord::new("alpha", b"v1".to_vec(), bson_now() + TimeDelta::seconds(60))
            .with_tags(["t1", "t2"]);

        let read = stored(set_fields(&written, false), "stash_alpha").into_record(false);
        assert_eq!(read, written);
    }

    #[test]
    fn set_fields_omits_timestamps_when_tracking_is_off() {
        let record = CacheRecord::new("alpha", vec![], Utc::now());
        let set = set_fields(&record, false);
        assert!(!set.contains_key("created_at"));
        assert!(!set.contains_key("modified_at"));
    }

    #[test]
    fn detailed_timestamps_round_trip() {
        let created = bson_now() - TimeDelta::seconds(120);
        let modified = bson_now() - TimeDelta::seconds(30);
        let written = CacheRecord::new("alpha", vec![], bson_now()).with_timestamps(created, modified);

        let read = stored(set_fields(&written, true), "stash_alpha").into_record(true);
        assert_eq!(read.created_at(), Some(created));
        assert_eq!(read.modified_at(), Some(modified));
    }

    #[test]
    fn legacy_records_default_each_timestamp_independently() {
        let before = Utc::now();
        let read = stored(set_fields(&CacheRecord::new("alpha", vec![], bson_now()), false), "stash_alpha")
            .into_record(true);
        let after = Utc::now();

        let created = read.created_at().expect("created_at should be defaulted");
        let modified = read.modified_at().expect("modified_at should be defaulted");
        assert!(created >= before - TimeDelta::seconds(1) && created <= after + TimeDelta::seconds(1));
        assert!(modified >= before - TimeDelta::seconds(1) && modified <= after + TimeDelta::seconds(1));
    }

    #[test]
    fn timestamps_stay_hidden_when_tracking_is_off() {
        let written = CacheRecord::new("alpha", vec![], bson_now())
            .with_timestamps(bson_now(), bson_now());

        let read = stored(set_fields(&written, true), "stash_alpha").into_record(false);
        assert!(read.created_at().is_none());
        assert!(read.modified_at().is_none());
    }
}
