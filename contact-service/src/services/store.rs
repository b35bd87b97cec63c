use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    options::{FindOptions, IndexOptions},
    Client as MongoClient, Database, IndexModel,
};
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::{StorageBackend, StorageConfig};
use crate::models::COLLECTION;

/// Document store the service persists into.
///
/// Implementations own their concurrency safety; callers issue one operation
/// per request and never retry.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert `data` into `collection` and return it with its generated `_id`.
    async fn create_document(&self, collection: &str, data: Document)
        -> Result<Document, AppError>;

    /// Fetch up to `limit` records matching `filter`.
    async fn get_documents(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>, AppError>;
}

/// Render a generated `_id` the way it is reported back to callers.
pub fn document_id(document: &Document) -> String {
    match document.get("_id") {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

#[derive(Clone)]
pub struct MongoDocumentStore {
    db: Database,
}

impl MongoDocumentStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "MongoDB client ready");
        Ok(Self { db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for contact-service");

        let created_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_idx".to_string())
                    .build(),
            )
            .build();

        self.db
            .collection::<Document>(COLLECTION)
            .create_index(created_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create created_at index: {}", e);
                AppError::from(e)
            })?;

        tracing::info!("Created index on {}.created_at", COLLECTION);
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn create_document(
        &self,
        collection: &str,
        mut data: Document,
    ) -> Result<Document, AppError> {
        let result = self
            .db
            .collection::<Document>(collection)
            .insert_one(&data, None)
            .await?;

        data.insert("_id", result.inserted_id);
        Ok(data)
    }

    async fn get_documents(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>, AppError> {
        let find_options = FindOptions::builder().limit(limit).build();

        let cursor = self
            .db
            .collection::<Document>(collection)
            .find(filter, find_options)
            .await?;

        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }
}

/// Process-local store for development and tests.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<Mutex<HashMap<String, Vec<Document>>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything stored in `collection`, in insertion order.
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.lock().get(collection).cloned().unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Document>>> {
        // A panic while holding the lock cannot leave a half-written Vec behind.
        self.collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create_document(
        &self,
        collection: &str,
        mut data: Document,
    ) -> Result<Document, AppError> {
        if !data.contains_key("_id") {
            data.insert("_id", ObjectId::new());
        }

        self.lock()
            .entry(collection.to_string())
            .or_default()
            .push(data.clone());

        Ok(data)
    }

    async fn get_documents(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>, AppError> {
        // Mongo treats a limit of 0 as "no limit" and a negative one by magnitude.
        let limit = match limit.unsigned_abs() {
            0 => usize::MAX,
            n => usize::try_from(n).unwrap_or(usize::MAX),
        };

        let documents = self
            .lock()
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| filter.iter().all(|(k, v)| d.get(k) == Some(v)))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(documents)
    }
}

/// Pick the store for this deployment. A missing or broken store is a
/// configuration state, never a startup failure.
pub async fn resolve_store(config: &StorageConfig) -> Option<Arc<dyn DocumentStore>> {
    match config.backend {
        StorageBackend::Disabled => {
            tracing::warn!("Storage disabled; contact messages will not be persisted");
            None
        }
        StorageBackend::Memory => {
            tracing::info!("Using in-memory document store");
            Some(Arc::new(InMemoryDocumentStore::new()))
        }
        StorageBackend::MongoDb => {
            let Some(mongo) = config.mongodb.as_ref() else {
                tracing::warn!("MONGODB_URI not set; contact messages will not be persisted");
                return None;
            };

            let store = match MongoDocumentStore::connect(&mongo.uri, &mongo.database).await {
                Ok(store) => store,
                Err(e) => {
                    tracing::error!(
                        "MongoDB unavailable, continuing without persistence: {}",
                        e
                    );
                    return None;
                }
            };

            if let Err(e) = store.initialize_indexes().await {
                tracing::warn!("Could not initialize indexes, continuing: {}", e);
            }

            Some(Arc::new(store))
        }
    }
}
