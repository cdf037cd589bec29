//! Cache-guarded trend resolution
//!
//! [`TrendFetcher`] is the pipeline's view of trend data: it consults the
//! TTL cache first and only queries the provider on a miss or stale entry.
//! Provider failures are absorbed here and surface to the caller only as an
//! absent series; data unavailability is a valid low-confidence outcome.

use crate::config::DiseaseConfig;
use crate::metrics;
use crate::models::{ChartDataset, ChartPayload, TimeSeries};
use crate::trends::cache::{CacheKey, TrendCache};
use crate::trends::provider::TrendProvider;
use std::sync::Arc;

/// Resolves trend series through the cache, falling back to the provider
pub struct TrendFetcher {
    cache: TrendCache,
    provider: Arc<dyn TrendProvider>,
}

impl TrendFetcher {
    /// Create a fetcher over a cache and provider
    pub fn new(cache: TrendCache, provider: Arc<dyn TrendProvider>) -> Self {
        Self { cache, provider }
    }

    /// Access the underlying cache (introspection and tests)
    pub fn cache(&self) -> &TrendCache {
        &self.cache
    }

    /// Resolve the trend series and chart payload for a disease/geography
    ///
    /// Returns `(None, None)` both for a recorded "no data" outcome and for
    /// a failed provider call; the two are indistinguishable to the caller.
    /// Failed calls do not update the cache, so the next request retries.
    pub async fn fetch(
        &self,
        disease: &DiseaseConfig,
        geo: &str,
    ) -> (Option<TimeSeries>, Option<ChartPayload>) {
        let key = CacheKey::new(geo, &disease.keywords);

        if let Some(entry) = self.cache.get(&key).await {
            metrics::record_cache_hit();
            return (entry.series, entry.chart);
        }
        metrics::record_cache_miss();

        tracing::info!(geo = %geo, key = %key, "Fetching live trend data");
        metrics::record_provider_call();

        match self.provider.interest_over_time(&disease.keywords, geo).await {
            Ok(Some(series)) => {
                let chart = build_chart_payload(&series, &disease.keywords);
                self.cache
                    .put(key, Some(series.clone()), Some(chart.clone()))
                    .await;
                (Some(series), Some(chart))
            }
            Ok(None) => {
                tracing::info!(geo = %geo, "Provider returned no data; caching empty outcome");
                self.cache.put(key, None, None).await;
                (None, None)
            }
            Err(e) => {
                // Cache untouched: the next request gets a fresh attempt.
                metrics::record_provider_error();
                tracing::warn!(geo = %geo, error = %e, "Trend provider call failed");
                (None, None)
            }
        }
    }
}

/// Shape a series into date labels plus per-keyword datasets
///
/// Datasets follow the configured keyword order; keywords absent from the
/// series are skipped entirely rather than emitted as all-zero columns.
pub fn build_chart_payload(series: &TimeSeries, keywords: &[String]) -> ChartPayload {
    let labels = series
        .rows
        .iter()
        .map(|r| r.date.format("%Y-%m-%d").to_string())
        .collect();

    let present = series.keywords();
    let datasets = keywords
        .iter()
        .filter(|kw| present.contains(kw.as_str()))
        .map(|kw| ChartDataset {
            label: kw.clone(),
            data: series.column(kw),
        })
        .collect();

    ChartPayload { labels, datasets }
}
