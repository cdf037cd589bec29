//! Trend provider client with rate limiting
//!
//! Wraps the external search-interest API behind the [`TrendProvider`]
//! trait so the fetcher (and tests) can swap implementations. The HTTP
//! implementation rate-limits outbound calls with governor and bounds
//! worst-case latency with explicit connect/read timeouts.

use crate::error::FetchError;
use crate::models::{TimeSeries, TrendRow};
use async_trait::async_trait;
use chrono::NaiveDate;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::time::Duration;

/// Connect timeout for provider requests
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Read timeout for provider requests
const READ_TIMEOUT: Duration = Duration::from_secs(25);

/// Query window: trailing one month, daily granularity
const TIMEFRAME: &str = "today 1-m";

/// Category filter: 0 selects all categories
const CATEGORY_ALL: u32 = 0;

/// Source of search-interest time series
#[async_trait]
pub trait TrendProvider: Send + Sync {
    /// Query interest-over-time for a keyword set within a geography
    ///
    /// Returns `Ok(None)` when the provider has no data for the query;
    /// errors indicate transport or protocol failures.
    async fn interest_over_time(
        &self,
        keywords: &[String],
        geo: &str,
    ) -> Result<Option<TimeSeries>, FetchError>;
}

/// Request body for the interest-over-time endpoint
#[derive(Debug, Serialize)]
struct InterestQuery<'a> {
    keywords: &'a [String],
    category: u32,
    timeframe: &'a str,
    geo: &'a str,
    search_property: &'a str,
}

/// One observation row in the provider's response
#[derive(Debug, Deserialize)]
struct InterestRow {
    date: NaiveDate,
    values: HashMap<String, u64>,
}

/// Provider response shape
#[derive(Debug, Deserialize)]
struct InterestResponse {
    rows: Vec<InterestRow>,
}

/// HTTP trend provider client
///
/// Calls are serialized through a direct rate limiter so bursts of cache
/// misses cannot trip the provider's request quota.
pub struct HttpTrendProvider {
    /// HTTP client with configured timeouts and compression
    client: Client,

    /// Rate limiter controlling outbound request frequency
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// Provider base URL (overridable for mock-server tests)
    base_url: String,
}

impl HttpTrendProvider {
    /// Create a provider client
    ///
    /// # Arguments
    ///
    /// * `base_url` - Provider base URL, no trailing slash
    /// * `requests_per_minute` - Maximum outbound request rate
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(base_url: &str, requests_per_minute: u32) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(READ_TIMEOUT)
            .gzip(true)
            .build()?;

        let rate = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::new(1).unwrap());
        let rate_limiter = RateLimiter::direct(Quota::per_minute(rate));

        Ok(Self {
            client,
            rate_limiter,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Provider base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/api/v1/interest_over_time", self.base_url)
    }
}

#[async_trait]
impl TrendProvider for HttpTrendProvider {
    async fn interest_over_time(
        &self,
        keywords: &[String],
        geo: &str,
    ) -> Result<Option<TimeSeries>, FetchError> {
        self.rate_limiter.until_ready().await;

        let query = InterestQuery {
            keywords,
            category: CATEGORY_ALL,
            timeframe: TIMEFRAME,
            geo,
            search_property: "",
        };

        tracing::debug!(geo = %geo, keywords = keywords.len(), "Querying trend provider");

        let response = self
            .client
            .post(self.endpoint())
            .json(&query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ServerError(status.as_u16()));
        }

        let body: InterestResponse = response
            .json()
            .await
            .map_err(|e| FetchError::InvalidResponse(e.to_string()))?;

        if body.rows.is_empty() {
            return Ok(None);
        }

        let mut rows: Vec<TrendRow> = body
            .rows
            .into_iter()
            .map(|r| TrendRow::new(r.date, r.values))
            .collect();
        rows.sort_by_key(|r| r.date);

        Ok(Some(TimeSeries::new(rows)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = HttpTrendProvider::new("http://localhost:9000", 10);
        assert!(provider.is_ok());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let provider = HttpTrendProvider::new("http://localhost:9000/", 10).unwrap();
        assert_eq!(provider.base_url(), "http://localhost:9000");
        assert_eq!(
            provider.endpoint(),
            "http://localhost:9000/api/v1/interest_over_time"
        );
    }

    #[test]
    fn test_zero_rate_falls_back_to_one() {
        // NonZeroU32 guard keeps the limiter constructible
        let provider = HttpTrendProvider::new("http://localhost:9000", 0);
        assert!(provider.is_ok());
    }

    #[test]
    fn test_query_serialization() {
        let keywords = vec!["dengue symptoms".to_string()];
        let query = InterestQuery {
            keywords: &keywords,
            category: CATEGORY_ALL,
            timeframe: TIMEFRAME,
            geo: "IN-UP",
            search_property: "",
        };

        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["timeframe"], "today 1-m");
        assert_eq!(json["category"], 0);
        assert_eq!(json["search_property"], "");
        assert_eq!(json["geo"], "IN-UP");
    }

    #[test]
    fn test_response_rows_deserialize() {
        let json = r#"{"rows": [{"date": "2024-06-01", "values": {"flu symptoms": 42}}]}"#;
        let response: InterestResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.rows.len(), 1);
        assert_eq!(response.rows[0].values["flu symptoms"], 42);
    }
}
