#![allow(dead_code)]

use async_trait::async_trait;
use contact_service::config::{ContactConfig, StorageBackend, StorageConfig};
use contact_service::services::{DocumentStore, InMemoryDocumentStore};
use contact_service::startup::Application;
use mongodb::bson::Document;
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

/// Store whose every operation fails, counting write attempts.
#[derive(Default)]
pub struct FailingStore {
    pub create_calls: AtomicUsize,
}

impl FailingStore {
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn create_document(
        &self,
        _collection: &str,
        _data: Document,
    ) -> Result<Document, AppError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Err(AppError::DatabaseError(anyhow::anyhow!(
            "E11000 duplicate key error collection: contact_db.contactmessage"
        )))
    }

    async fn get_documents(
        &self,
        _collection: &str,
        _filter: Document,
        _limit: i64,
    ) -> Result<Vec<Document>, AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!(
            "Server selection timeout: No available servers"
        )))
    }
}

fn test_config(backend: StorageBackend) -> ContactConfig {
    ContactConfig {
        // Use random port for testing (port 0)
        common: CoreConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
        },
        service_name: "contact-service".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        storage: StorageConfig {
            backend,
            mongodb: None,
        },
    }
}

impl TestApp {
    /// Spawn with no document store configured.
    pub async fn spawn() -> Self {
        Self::spawn_with_store(None).await
    }

    /// Spawn backed by a fresh in-memory store, returned for inspection.
    pub async fn spawn_with_memory_store() -> (Self, InMemoryDocumentStore) {
        let store = InMemoryDocumentStore::new();
        let app = Self::spawn_with_store(Some(Arc::new(store.clone()))).await;
        (app, store)
    }

    pub async fn spawn_with_store(store: Option<Arc<dyn DocumentStore>>) -> Self {
        let backend = if store.is_some() {
            StorageBackend::Memory
        } else {
            StorageBackend::Disabled
        };

        let app = Application::build_with_store(test_config(backend), store)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn post_contact(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/contact", self.address))
            .header("User-Agent", "contact-test/1.0")
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
