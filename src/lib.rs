//! sentinel - Disease outbreak early-warning service
//!
//! Combines search-interest trends for disease-related keywords with a
//! social-chatter signal into a composite threat score, served over HTTP.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Disease catalog (keywords, baseline factors)
//! - [`models`] - Core data structures and types
//! - [`trends`] - Trend provider client, TTL cache and fetcher
//! - [`chatter`] - Social-chatter signal (mocked)
//! - [`scoring`] - Composite threat score computation
//! - [`server`] - Axum HTTP API layer
//! - [`metrics`] - Prometheus metrics
//!
//! # Example
//!
//! ```no_run
//! use sentinel::config::DiseaseCatalog;
//! use sentinel::server::{SentinelServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::default();
//!     let server = SentinelServer::new(config, DiseaseCatalog::default())?;
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

pub mod chatter;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod scoring;
pub mod server;
pub mod trends;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::chatter::{ChatterSource, MockChatter};
    pub use crate::config::{DiseaseCatalog, DiseaseConfig};
    pub use crate::error::{Error, FetchError, Result};
    pub use crate::models::{
        ChartPayload, ThreatAssessment, ThreatLevel, ThreatReport, TimeSeries, TrendRow,
    };
    pub use crate::server::{SentinelServer, ServerConfig};
    pub use crate::trends::{TrendCache, TrendFetcher, TrendProvider};
}

// Direct re-exports for convenience
pub use models::{ThreatAssessment, ThreatLevel, ThreatReport, TimeSeries};
