//! In-memory TTL cache for trend query results
//!
//! Entries are keyed by (geography, keyword list) and held for the process
//! lifetime; staleness is checked lazily on read against an injected clock.
//! A recorded "provider returned nothing" outcome is a valid entry, so
//! repeated empty results do not re-trigger provider calls within the TTL.

use crate::models::{ChartPayload, TimeSeries};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

/// Default cache validity window
pub const DEFAULT_TTL_MINUTES: i64 = 10;

/// Separator used when deriving a key from geo and keywords
///
/// Not collision-safe against keywords containing the separator; accepted
/// limitation inherited from the key scheme.
const KEY_SEPARATOR: &str = "_";

// ============================================================================
// Clock
// ============================================================================

/// Time source injected into the cache so TTL checks are testable
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time source
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for tests
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at the given instant
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// ============================================================================
// Cache Key & Entry
// ============================================================================

/// Cache key derived from geography and the ordered keyword list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key: `{geo}_{kw1}_{kw2}_...` (keyword order matters)
    pub fn new(geo: &str, keywords: &[String]) -> Self {
        Self(format!("{}{}{}", geo, KEY_SEPARATOR, keywords.join(KEY_SEPARATOR)))
    }

    /// Key as string, for logging
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored fetch outcome
///
/// `series`/`chart` are both `None` when the provider returned no data for
/// the query; that outcome is served from cache like any other.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// When this entry was stored
    pub fetched_at: DateTime<Utc>,

    /// Resolved time series, if the provider had data
    pub series: Option<TimeSeries>,

    /// Display payload shaped from the series
    pub chart: Option<ChartPayload>,
}

// ============================================================================
// Trend Cache
// ============================================================================

/// Process-lifetime cache of trend query results
///
/// Entries are overwritten on every completed fetch and never evicted;
/// growth is bounded in practice by the configured disease/geo space.
pub struct TrendCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TrendCache {
    /// Create a cache with the default 10 minute TTL and wall clock
    pub fn new() -> Self {
        Self::with_ttl(Duration::minutes(DEFAULT_TTL_MINUTES))
    }

    /// Create a cache with a custom TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source (used by tests to control staleness)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Configured TTL
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a fresh entry, if one exists
    ///
    /// Stale entries are treated as absent; they are not removed here, the
    /// next `put` for the key overwrites them.
    pub async fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if self.clock.now() - entry.fetched_at < self.ttl => {
                tracing::debug!(key = %key, "Cache hit");
                Some(entry.clone())
            }
            Some(_) => {
                tracing::debug!(key = %key, "Cache entry stale");
                None
            }
            None => {
                tracing::debug!(key = %key, "Cache miss");
                None
            }
        }
    }

    /// Store a fetch outcome, stamping it with the current time
    ///
    /// Concurrent writers for the same key race benignly; last writer wins.
    pub async fn put(
        &self,
        key: CacheKey,
        series: Option<TimeSeries>,
        chart: Option<ChartPayload>,
    ) {
        let entry = CacheEntry {
            fetched_at: self.clock.now(),
            series,
            chart,
        };
        let mut entries = self.entries.write().await;
        entries.insert(key, entry);
    }

    /// Number of stored entries (fresh and stale)
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check whether the cache holds no entries
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for TrendCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrendRow;
    use chrono::NaiveDate;

    fn sample_series() -> TimeSeries {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        TimeSeries::new(vec![TrendRow::new(date, HashMap::new())])
    }

    fn start_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_key_is_deterministic() {
        let keywords = vec!["a".to_string(), "b".to_string()];
        assert_eq!(CacheKey::new("IN-UP", &keywords), CacheKey::new("IN-UP", &keywords));
        assert_eq!(CacheKey::new("IN-UP", &keywords).as_str(), "IN-UP_a_b");
    }

    #[test]
    fn test_key_order_matters() {
        let forward = vec!["a".to_string(), "b".to_string()];
        let reversed = vec!["b".to_string(), "a".to_string()];
        assert_ne!(CacheKey::new("IN-UP", &forward), CacheKey::new("IN-UP", &reversed));
    }

    #[tokio::test]
    async fn test_fresh_entry_served() {
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = TrendCache::new().with_clock(clock);
        let key = CacheKey::new("IN-UP", &["kw".to_string()]);

        cache.put(key.clone(), Some(sample_series()), None).await;

        let entry = cache.get(&key).await.expect("entry should be fresh");
        assert!(entry.series.is_some());
    }

    #[tokio::test]
    async fn test_stale_entry_treated_as_absent() {
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = TrendCache::new().with_clock(clock.clone());
        let key = CacheKey::new("IN-UP", &["kw".to_string()]);

        cache.put(key.clone(), Some(sample_series()), None).await;

        clock.advance(Duration::minutes(9));
        assert!(cache.get(&key).await.is_some(), "still fresh at 9 minutes");

        clock.advance(Duration::minutes(2));
        assert!(cache.get(&key).await.is_none(), "stale past the 10 minute TTL");
    }

    #[tokio::test]
    async fn test_ttl_boundary_is_exclusive() {
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = TrendCache::new().with_clock(clock.clone());
        let key = CacheKey::new("IN-UP", &["kw".to_string()]);

        cache.put(key.clone(), Some(sample_series()), None).await;

        // now - fetched_at < TTL is the freshness test; exactly TTL is stale
        clock.advance(Duration::minutes(10));
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_none_outcome_is_cacheable() {
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = TrendCache::new().with_clock(clock);
        let key = CacheKey::new("IN-UP", &["kw".to_string()]);

        cache.put(key.clone(), None, None).await;

        let entry = cache.get(&key).await.expect("no-data outcome is a valid entry");
        assert!(entry.series.is_none());
        assert!(entry.chart.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = TrendCache::new().with_clock(clock);
        let key = CacheKey::new("IN-UP", &["kw".to_string()]);

        cache.put(key.clone(), None, None).await;
        cache.put(key.clone(), Some(sample_series()), None).await;

        assert_eq!(cache.len().await, 1);
        assert!(cache.get(&key).await.unwrap().series.is_some());
    }
}
