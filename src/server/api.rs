//! REST API handlers for the sentinel server

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::metrics;
use crate::models::ThreatReport;
use crate::scoring;

use super::server::AppState;

/// Default disease when the query omits one
const DEFAULT_DISEASE: &str = "dengue";

/// Default city when the query omits one
const DEFAULT_CITY: &str = "kanpur";

/// Default geography when the query omits one
const DEFAULT_GEO: &str = "IN-UP";

// ============================================================================
// API Types
// ============================================================================

/// Query parameters for `/api/threat`
#[derive(Debug, Deserialize)]
pub struct ThreatQuery {
    pub disease: Option<String>,
    pub city: Option<String>,
    pub geo: Option<String>,
}

/// Simple error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Configured disease listing
#[derive(Debug, Serialize)]
pub struct DiseasesResponse {
    pub diseases: Vec<String>,
}

// ============================================================================
// Router
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/threat", get(threat_analysis))
        .route("/api/health", get(health_check))
        .route("/api/diseases", get(list_diseases))
        .route("/metrics", get(metrics_exposition))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Run the fetch-then-score pipeline for the requested disease/city/geo
async fn threat_analysis(
    State(state): State<AppState>,
    Query(params): Query<ThreatQuery>,
) -> axum::response::Response {
    let disease_id = params.disease.as_deref().unwrap_or(DEFAULT_DISEASE);
    let city = params.city.as_deref().unwrap_or(DEFAULT_CITY);
    let geo = params.geo.as_deref().unwrap_or(DEFAULT_GEO);

    tracing::info!(disease = %disease_id, city = %city, geo = %geo, "Threat analysis request");

    let Some(disease_config) = state.catalog.get(disease_id) else {
        metrics::record_api_request("/api/threat", 400);
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Disease not configured")),
        )
            .into_response();
    };

    let (series, chart) = state.fetcher.fetch(disease_config, geo).await;
    let social_score = state.chatter.chatter_score(disease_config, city);
    let assessment = scoring::score(series.as_ref(), social_score, disease_config);

    tracing::info!(
        level = %assessment.level,
        score = assessment.score,
        "Threat analysis complete"
    );
    metrics::record_api_request("/api/threat", 200);

    let report = ThreatReport {
        city: capitalize(city),
        disease: capitalize(disease_id),
        geo: geo.to_string(),
        threat_score: assessment.score,
        threat_level: assessment.level,
        action_item: assessment.action,
        chart_data: chart,
    };

    (StatusCode::OK, Json(report)).into_response()
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// List configured disease ids
async fn list_diseases(State(state): State<AppState>) -> impl IntoResponse {
    Json(DiseasesResponse {
        diseases: state.catalog.ids().iter().map(|s| s.to_string()).collect(),
    })
}

/// Prometheus text exposition
async fn metrics_exposition() -> impl IntoResponse {
    metrics::gather()
}

/// Uppercase the first character, lowercase the rest
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("kanpur"), "Kanpur");
        assert_eq!(capitalize("DELHI"), "Delhi");
        assert_eq!(capitalize("dengue"), "Dengue");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_error_response_shape() {
        let response = ErrorResponse::new("Disease not configured");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"], "Disease not configured");
    }

    #[test]
    fn test_threat_query_all_optional() {
        let query: ThreatQuery = serde_json::from_str("{}").unwrap();
        assert!(query.disease.is_none());
        assert!(query.city.is_none());
        assert!(query.geo.is_none());
    }
}
