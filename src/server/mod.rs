//! HTTP API layer for the sentinel service
//!
//! This module wires the trend fetcher, chatter source and scorer behind
//! an axum server with CORS and request tracing.

pub mod api;
pub mod config;
pub mod server;

pub use api::create_router;
pub use config::ServerConfig;
pub use server::{AppState, SentinelServer, ServerError};
