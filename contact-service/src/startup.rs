//! Application startup and lifecycle management.

use crate::config::ContactConfig;
use crate::handlers;
use crate::services::{resolve_store, ContactIntake, DocumentStore};
use axum::{
    extract::Request,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ContactConfig,
    pub intake: ContactIntake,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/test", get(handlers::test_storage))
        .route("/contact", post(handlers::submit_contact))
        .route("/robots.txt", get(handlers::robots_txt))
        .route("/sitemap.txt", get(handlers::sitemap_txt))
        .route("/metrics", get(handlers::metrics_endpoint))
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");

            tracing::info_span!(
                "http_request",
                request_id = %request_id,
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        }))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        // Public marketing site: any origin may post the form, with credentials.
        .layer(CorsLayer::very_permissive())
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    /// Build the application, resolving the document store from configuration.
    pub async fn build(config: ContactConfig) -> Result<Self, AppError> {
        let store = resolve_store(&config.storage).await;
        Self::build_with_store(config, store).await
    }

    /// Build the application around an explicitly supplied store (or none).
    pub async fn build_with_store(
        config: ContactConfig,
        store: Option<Arc<dyn DocumentStore>>,
    ) -> Result<Self, AppError> {
        let state = AppState {
            config: config.clone(),
            intake: ContactIntake::new(store),
        };

        if !state.intake.storage_configured() {
            tracing::warn!(
                "Running without a document store; submissions are acknowledged but not saved"
            );
        }

        let app = build_router(state.clone());

        // Port 0 binds a random port for testing
        let addr = config.common.bind_address();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "Contact service listening");

        let server = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StorageBackend, StorageConfig};
    use crate::models::COLLECTION;
    use crate::services::InMemoryDocumentStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, StatusCode};
    use service_core::config::Config;
    use tower::ServiceExt;

    fn state(store: Option<Arc<dyn DocumentStore>>) -> AppState {
        AppState {
            config: ContactConfig {
                common: Config::default(),
                service_name: "contact-service".to_string(),
                log_level: "info".to_string(),
                otlp_endpoint: None,
                storage: StorageConfig {
                    backend: StorageBackend::Memory,
                    mongodb: None,
                },
            },
            intake: ContactIntake::new(store),
        }
    }

    fn contact_request(body: serde_json::Value) -> Request {
        Request::builder()
            .method("POST")
            .uri("/contact")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, "router-test")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn contact_route_stores_submission() {
        let store = InMemoryDocumentStore::new();
        let app = build_router(state(Some(Arc::new(store.clone()))));

        let response = app
            .oneshot(contact_request(serde_json::json!({
                "name": "Juan Perez",
                "phone": "+34600000000",
                "message": "Necesito presupuesto"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        let body = body_json(response).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["stored"], true);

        let docs = store.documents(COLLECTION);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get_str("user_agent").unwrap(), "router-test");
    }

    #[tokio::test]
    async fn contact_route_rejects_dotless_email_domain() {
        let store = InMemoryDocumentStore::new();
        let app = build_router(state(Some(Arc::new(store.clone()))));

        let response = app
            .oneshot(contact_request(serde_json::json!({
                "name": "Juan Perez",
                "phone": "+34600000000",
                "email": "juan@localhost",
                "message": "Necesito presupuesto"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(store.documents(COLLECTION).is_empty());
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = build_router(state(None));

        let response = app
            .oneshot(Request::builder().uri("/admin").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
