// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The diagnostics path: server and collection statistics.
//!
//! Read-only and best-effort. Failures here wrap as
//! [`ErrorKind::Stats`](stash_tier::ErrorKind) and never reach the
//! correctness paths.

use bson::{Bson, doc};
use mongodb::Database;
use stash_tier::{Error, Result, TierStats};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Collects a [`TierStats`] snapshot from two administrative queries.
pub(crate) async fn collect(database: &Database, collection_name: &str) -> Result<TierStats> {
    let server_status = database
        .run_command(doc! {
            "serverStatus": 1,
            // The bulky sections are noise for a cache diagnostic.
            "recordStats": 0,
            "repl": 0,
            "metrics": 0,
        })
        .await
        .map_err(Error::stats)?;
    let collection_stats = database
        .run_command(doc! { "collStats": collection_name, "verbose": true })
        .await
        .map_err(Error::stats)?;

    let version = server_status.get_str("version").unwrap_or("unknown").to_string();
    let uptime_days = number(server_status.get("uptime")).unwrap_or(0.0) / SECONDS_PER_DAY;
    let size_bytes = number(collection_stats.get("size")).unwrap_or(0.0);

    let info = format!(
        "MongoDB version {version}, adapter version {}. Uptime (in days): {uptime_days:.2}",
        env!("CARGO_PKG_VERSION"),
    );

    let server_status = sanitize(Bson::Document(server_status), &stringify_datetimes);
    let collection_stats = sanitize(Bson::Document(collection_stats), &stringify_datetimes);
    let raw = serde_json::json!({
        "serverStatus": server_status.into_relaxed_extjson(),
        "collStats": collection_stats.into_relaxed_extjson(),
    });

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "collection sizes fit u64")]
    let size_bytes = size_bytes.max(0.0) as u64;
    Ok(TierStats::new(info, size_bytes, raw))
}

/// Walks a BSON tree, passing every non-container node through `transform`.
///
/// Documents and arrays are recursed into; everything else is a leaf. The
/// transform decides what survives into the diagnostics output, so callers
/// can strip or re-shape values their consumers cannot represent.
pub(crate) fn sanitize<F>(value: Bson, transform: &F) -> Bson
where
    F: Fn(Bson) -> Bson,
{
    match value {
        Bson::Document(document) => Bson::Document(
            document
                .into_iter()
                .map(|(key, value)| (key, sanitize(value, transform)))
                .collect(),
        ),
        Bson::Array(items) => {
            Bson::Array(items.into_iter().map(|item| sanitize(item, transform)).collect())
        }
        leaf => transform(leaf),
    }
}

/// Leaf transform used by the stats path: BSON date-times become their
/// RFC 3339 string form; every other leaf passes through untouched.
fn stringify_datetimes(leaf: Bson) -> Bson {
    match leaf {
        Bson::DateTime(datetime) => Bson::String(
            datetime
                .try_to_rfc3339_string()
                .unwrap_or_else(|_| datetime.timestamp_millis().to_string()),
        ),
        other => other,
    }
}

fn number(value: Option<&Bson>) -> Option<f64> {
    match value {
        Some(Bson::Double(double)) => Some(*double),
        Some(Bson::Int32(int)) => Some(f64::from(*int)),
        #[expect(clippy::cast_precision_loss, reason = "diagnostic figure, precision is cosmetic")]
        Some(Bson::Int64(int)) => Some(*int as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_converts_nested_datetimes_to_strings() {
        let tree = Bson::Document(doc! {
            "started": bson::DateTime::from_millis(0),
            "nested": { "backup": { "at": bson::DateTime::from_millis(86_400_000) } },
            "history": [ bson::DateTime::from_millis(1_000), 42 ],
        });

        let Bson::Document(sanitized) = sanitize(tree, &stringify_datetimes) else {
            unreachable!("document in, document out");
        };

        assert_eq!(sanitized.get_str("started").expect("string"), "1970-01-01T00:00:00Z");
        let nested = sanitized
            .get_document("nested")
            .and_then(|nested| nested.get_document("backup"))
            .expect("nested documents survive");
        assert_eq!(nested.get_str("at").expect("string"), "1970-01-02T00:00:00Z");

        let history = sanitized.get_array("history").expect("array survives");
        assert!(matches!(&history[0], Bson::String(_)));
        assert_eq!(history[1], Bson::Int32(42));
    }

    #[test]
    fn sanitize_applies_a_pluggable_transform() {
        let tree = Bson::Document(doc! { "keep": 1, "secret": "hunter2" });
        let redact = |leaf: Bson| match leaf {
            Bson::String(_) => Bson::String("***".to_string()),
            other => other,
        };

        let Bson::Document(sanitized) = sanitize(tree, &redact) else {
            unreachable!("document in, document out");
        };
        assert_eq!(sanitized.get_str("secret").expect("string"), "***");
        assert_eq!(sanitized.get_i32("keep").expect("int"), 1);
    }

    #[test]
    fn number_reads_all_numeric_widths() {
        assert_eq!(number(Some(&Bson::Double(1.5))), Some(1.5));
        assert_eq!(number(Some(&Bson::Int32(7))), Some(7.0));
        assert_eq!(number(Some(&Bson::Int64(9))), Some(9.0));
        assert_eq!(number(Some(&Bson::String("x".to_string()))), None);
        assert_eq!(number(None), None);
    }
}
