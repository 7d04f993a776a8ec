// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! MongoDB implementation of the stash cache tier contract.

use std::collections::HashMap;

use bson::{Bson, Regex, doc};
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use stash_tier::{CacheRecord, CacheTier, Error, MAX_KEY_LIST, Result, TierStats};
use tracing::debug;

use crate::config::{MongoConfig, MongoConfigBuilder};
use crate::document::{KeyDocument, RecordDocument};
use crate::{document, stats};

/// Oldest wire version this tier accepts; the driver's own floor (server 4.0).
const MIN_WIRE_VERSION: i64 = 7;

const UNIQUE_KEY_INDEX: &str = "unique_key_index";
const AUTO_EXPIRE_INDEX: &str = "auto_expire_index";

/// A persistent cache tier backed by a MongoDB collection.
///
/// Holds one driver client for its lifetime and maps every
/// [`CacheTier`] operation onto a single native call. The driver owns
/// pooling, the wire protocol, and failover; this type owns nothing but the
/// translation. Cheap to clone — clones share the connection.
///
/// # Examples
///
/// ```no_run
/// use stash_mongodb::MongoTier;
/// use stash_tier::CacheTier;
///
/// # async fn example() -> stash_tier::Result<()> {
/// let tier = MongoTier::builder()
///     .database_name("app_cache")
///     .collection_name("app_cache")
///     .connect()
///     .await?;
///
/// let keys = tier.keys("user_*").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MongoTier {
    client: Client,
    database: Database,
    collection: Collection<RecordDocument>,
    config: MongoConfig,
}

impl std::fmt::Debug for MongoTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoTier")
            .field("database", &self.database.name())
            .field("collection", &self.collection.name())
            .finish_non_exhaustive()
    }
}

impl MongoTier {
    /// Creates a new builder for configuring a MongoDB tier.
    #[must_use]
    pub fn builder() -> MongoConfigBuilder {
        MongoConfigBuilder::new()
    }

    /// Connects to the deployment described by `config`.
    ///
    /// Builds the connection URI, verifies the deployment is reachable and
    /// recent enough, and provisions the cache collection with its unique
    /// key index and TTL expiry index when it does not exist yet. Existing
    /// collections are left exactly as found.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InvalidConfiguration`](stash_tier::ErrorKind) when the
    /// composed URI does not parse; [`ErrorKind::Unavailable`](stash_tier::ErrorKind)
    /// when the deployment cannot be reached or set up;
    /// [`ErrorKind::DriverCheck`](stash_tier::ErrorKind) when the deployment
    /// is older than the driver supports.
    pub async fn connect(config: MongoConfig) -> Result<Self> {
        let uri = config.connection_uri();
        let mut options = ClientOptions::parse(&uri).await.map_err(Error::invalid_configuration)?;
        options.connect_timeout = Some(config.timeout());
        options.server_selection_timeout = Some(config.timeout());
        config.apply_driver_options(&mut options);

        let client = Client::with_options(options).map_err(Error::unavailable)?;
        let database = client.database(config.database_name());

        check_deployment(&database).await?;
        provision_collection(&database, config.collection_name()).await?;
        let collection = database.collection::<RecordDocument>(config.collection_name());

        debug!(
            database = config.database_name(),
            collection = config.collection_name(),
            "connected mongodb cache tier"
        );

        Ok(Self {
            client,
            database,
            collection,
            config,
        })
    }

    /// Returns the underlying driver client.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Returns the configuration this tier was connected with.
    #[must_use]
    pub fn config(&self) -> &MongoConfig {
        &self.config
    }

    /// The stored document id: the configured prefix plus the cache key.
    fn document_id(&self, key: &str) -> String {
        format!("{}{}", self.config.key_prefix(), key)
    }
}

impl CacheTier for MongoTier {
    async fn get(&self, key: &str) -> Result<Option<CacheRecord>> {
        let found = self
            .collection
            .find_one(doc! { "_id": self.document_id(key) })
            .await
            .map_err(Error::unavailable)?;
        Ok(found.map(|stored| stored.into_record(self.config.detailed_timestamps())))
    }

    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, CacheRecord>> {
        let ids: Vec<String> = keys.iter().map(|key| self.document_id(key)).collect();
        let mut cursor = self
            .collection
            .find(doc! { "_id": { "$in": ids } })
            .await
            .map_err(Error::unavailable)?;

        let mut found = HashMap::with_capacity(keys.len());
        while let Some(stored) = cursor.try_next().await.map_err(Error::unavailable)? {
            let record = stored.into_record(self.config.detailed_timestamps());
            found.insert(record.key().to_string(), record);
        }
        Ok(found)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let filter = if pattern.is_empty() {
            doc! {}
        } else {
            doc! { "key": Bson::RegularExpression(Regex {
                pattern: wildcard_to_regex(pattern),
                options: String::new(),
            }) }
        };

        let mut cursor = self
            .collection
            .clone_with_type::<KeyDocument>()
            .find(filter)
            .projection(doc! { "_id": 0, "key": 1 })
            .limit(i64::try_from(MAX_KEY_LIST).unwrap_or(i64::MAX))
            .await
            .map_err(Error::unavailable)?;

        let mut keys = Vec::new();
        while let Some(stored) = cursor.try_next().await.map_err(Error::unavailable)? {
            keys.push(stored.key);
        }
        Ok(keys)
    }

    async fn insert(&self, record: &CacheRecord) -> Result<bool> {
        let update = doc! { "$set": document::set_fields(record, self.config.detailed_timestamps()) };
        self.collection
            .update_one(doc! { "_id": self.document_id(record.key()) }, update)
            .upsert(true)
            .await
            .map_err(Error::write)?;
        Ok(true)
    }

    async fn invalidate(&self, key: &str) -> Result<bool> {
        // A zero delete count is still an acknowledged success.
        self.collection
            .delete_one(doc! { "_id": self.document_id(key) })
            .await
            .map_err(Error::write)?;
        Ok(true)
    }

    async fn clear(&self) -> Result<bool> {
        self.collection.delete_many(doc! {}).await.map_err(Error::write)?;
        debug!(collection = self.collection.name(), "cleared cache collection");
        Ok(true)
    }

    async fn stats(&self) -> Result<TierStats> {
        stats::collect(&self.database, self.config.collection_name()).await
    }
}

impl MongoConfigBuilder {
    /// Builds the config and connects in one step.
    ///
    /// # Errors
    ///
    /// Everything [`build`](MongoConfigBuilder::build) and
    /// [`MongoTier::connect`] can return.
    pub async fn connect(self) -> Result<MongoTier> {
        MongoTier::connect(self.build()?).await
    }
}

/// Verifies the deployment answers `hello` and speaks a supported wire version.
async fn check_deployment(database: &Database) -> Result<()> {
    let reply = database.run_command(doc! { "hello": 1 }).await.map_err(Error::unavailable)?;

    let wire_version = reply
        .get_i32("maxWireVersion")
        .map(i64::from)
        .or_else(|_| reply.get_i64("maxWireVersion"))
        .unwrap_or(MIN_WIRE_VERSION);
    if wire_version < MIN_WIRE_VERSION {
        return Err(Error::driver_check(format!(
            "deployment reports wire version {wire_version}, need at least {MIN_WIRE_VERSION}"
        )));
    }
    Ok(())
}

/// Creates the cache collection and its two indexes if the collection does
/// not exist yet. Idempotent by way of the existence check — collections
/// that already exist are never re-indexed.
async fn provision_collection(database: &Database, collection_name: &str) -> Result<()> {
    let existing = database.list_collection_names().await.map_err(Error::unavailable)?;
    if existing.iter().any(|name| name == collection_name) {
        return Ok(());
    }

    database.create_collection(collection_name).await.map_err(Error::unavailable)?;
    let collection = database.collection::<RecordDocument>(collection_name);

    collection
        .create_index(
            IndexModel::builder()
                .keys(doc! { "key": 1 })
                .options(IndexOptions::builder().unique(true).name(UNIQUE_KEY_INDEX.to_string()).build())
                .build(),
        )
        .await
        .map_err(Error::unavailable)?;
    collection
        .create_index(
            IndexModel::builder()
                .keys(doc! { "expires_at": 1 })
                .options(
                    IndexOptions::builder()
                        // Zero grace: the server purges a record the moment it is due.
                        .expire_after(std::time::Duration::ZERO)
                        .name(AUTO_EXPIRE_INDEX.to_string())
                        .build(),
                )
                .build(),
        )
        .await
        .map_err(Error::unavailable)?;

    debug!(collection = collection_name, "created cache collection and indexes");
    Ok(())
}

/// Translates the contract's `*` wildcard into the server's regex syntax.
///
/// Mirrors the pool's pattern grammar: `*` becomes `(.*)` and the result is
/// matched unanchored against the stored key field.
fn wildcard_to_regex(pattern: &str) -> String {
    pattern.replace('*', "(.*)")
}
