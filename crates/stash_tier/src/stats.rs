// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Diagnostic snapshot returned by a tier's statistics path.

/// A point-in-time statistics snapshot from a storage backend.
///
/// `TierStats` is purely diagnostic: a human-readable summary line, the
/// storage footprint in bytes, and the raw (already sanitized) backend
/// snapshots for consumers that want the details.
///
/// # Examples
///
/// ```
/// use stash_tier::TierStats;
///
/// let stats = TierStats::new("backend v1.2", 4096, serde_json::json!({"uptime": 12}));
/// assert_eq!(stats.size_bytes(), 4096);
/// assert_eq!(stats.raw()["uptime"], 12);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TierStats {
    info: String,
    size_bytes: u64,
    raw: serde_json::Value,
}

impl TierStats {
    /// Creates a snapshot from its three parts.
    pub fn new(info: impl Into<String>, size_bytes: u64, raw: serde_json::Value) -> Self {
        Self {
            info: info.into(),
            size_bytes,
            raw,
        }
    }

    /// Returns the human-readable summary line.
    #[must_use]
    pub fn info(&self) -> &str {
        &self.info
    }

    /// Returns the storage footprint in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Returns the raw sanitized backend snapshot.
    #[must_use]
    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }

    /// Consumes the snapshot and returns the raw value.
    #[must_use]
    pub fn into_raw(self) -> serde_json::Value {
        self.raw
    }
}
