//! Search-trend acquisition: provider client, TTL cache and fetcher
//!
//! The [`fetcher::TrendFetcher`] is the entry point used by the pipeline;
//! it resolves a series from the [`cache::TrendCache`] when fresh and falls
//! back to the [`provider::TrendProvider`] otherwise.

pub mod cache;
pub mod fetcher;
pub mod provider;

pub use cache::{CacheEntry, CacheKey, Clock, ManualClock, SystemClock, TrendCache};
pub use fetcher::TrendFetcher;
pub use provider::{HttpTrendProvider, TrendProvider};
