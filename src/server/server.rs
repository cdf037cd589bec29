//! Sentinel server implementation
//!
//! Assembles the application state (catalog, fetcher, chatter source) and
//! runs the axum HTTP server with optional CORS and request tracing.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use chrono::Duration;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::chatter::{ChatterSource, MockChatter};
use crate::config::DiseaseCatalog;
use crate::trends::{HttpTrendProvider, TrendCache, TrendFetcher};

use super::api::create_router;
use super::config::ServerConfig;

// ============================================================================
// App State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Disease catalog
    pub catalog: Arc<DiseaseCatalog>,

    /// Trend cache + fetcher
    pub fetcher: Arc<TrendFetcher>,

    /// Social-chatter source
    pub chatter: Arc<dyn ChatterSource>,

    /// Server start time
    pub start_time: Instant,

    /// Configuration
    pub config: ServerConfig,
}

// ============================================================================
// Sentinel Server
// ============================================================================

/// Main sentinel HTTP server
pub struct SentinelServer {
    config: ServerConfig,
    state: AppState,
}

impl SentinelServer {
    /// Create a server from config with the default component wiring
    pub fn new(config: ServerConfig, catalog: DiseaseCatalog) -> Result<Self, ServerError> {
        config
            .validate()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let provider = HttpTrendProvider::new(&config.provider_url, config.provider_rate_limit)
            .map_err(|e| ServerError::Init(e.to_string()))?;

        let cache = TrendCache::with_ttl(Duration::minutes(config.cache_ttl_minutes));
        let fetcher = Arc::new(TrendFetcher::new(cache, Arc::new(provider)));

        let chatter: Arc<dyn ChatterSource> = match config.chatter_seed {
            Some(seed) => Arc::new(MockChatter::with_seed(seed)),
            None => Arc::new(MockChatter::new()),
        };

        Ok(Self::with_components(config, catalog, fetcher, chatter))
    }

    /// Create a server with injected components (tests swap the provider
    /// and chatter source here)
    pub fn with_components(
        config: ServerConfig,
        catalog: DiseaseCatalog,
        fetcher: Arc<TrendFetcher>,
        chatter: Arc<dyn ChatterSource>,
    ) -> Self {
        let state = AppState {
            catalog: Arc::new(catalog),
            fetcher,
            chatter,
            start_time: Instant::now(),
            config: config.clone(),
        };

        Self { config, state }
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes and layers
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.config.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Start the server
    pub async fn start(&self) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address;

        tracing::info!("Starting sentinel server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        Ok(())
    }

    /// Start with graceful shutdown
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address;

        tracing::info!("Starting sentinel server on {} (with graceful shutdown)", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        tracing::info!("Sentinel server shutdown complete");
        Ok(())
    }
}

// ============================================================================
// Server Errors
// ============================================================================

/// Server errors
#[derive(Debug, Clone, Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),

    /// Failed to bind to address
    #[error("Failed to bind: {0}")]
    Bind(String),

    /// Server error
    #[error("Server error: {0}")]
    Serve(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_creation() {
        let config = ServerConfig::default();
        let server = SentinelServer::new(config, DiseaseCatalog::default());
        assert!(server.is_ok());
    }

    #[test]
    fn test_state_carries_catalog() {
        let config = ServerConfig::default();
        let server = SentinelServer::new(config, DiseaseCatalog::default()).unwrap();
        let state = server.state();

        assert!(state.catalog.contains("dengue"));
        assert_eq!(state.catalog.len(), 3);
    }

    #[test]
    fn test_server_with_custom_config() {
        let config = ServerConfig::builder()
            .cache_ttl_minutes(2)
            .enable_cors(false)
            .build()
            .unwrap();

        let server = SentinelServer::new(config, DiseaseCatalog::default()).unwrap();
        assert_eq!(server.state().config.cache_ttl_minutes, 2);
        assert!(!server.state().config.enable_cors);
    }

    #[tokio::test]
    async fn test_new_server_cache_is_empty() {
        let config = ServerConfig::default();
        let server = SentinelServer::new(config, DiseaseCatalog::default()).unwrap();
        assert!(server.state().fetcher.cache().is_empty().await);
    }
}
