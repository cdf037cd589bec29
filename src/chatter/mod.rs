//! Social-chatter signal
//!
//! Stand-in for a social-media scanner. The [`ChatterSource`] trait fixes
//! the contract real implementations must keep: an integer score in
//! `[5, 50]`. The mock returns a pseudo-random value so repeated requests
//! stay dynamic; a seeded variant keeps tests deterministic.

use crate::config::DiseaseConfig;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Mutex;

/// Minimum chatter score
pub const CHATTER_MIN: i64 = 5;

/// Maximum chatter score
pub const CHATTER_MAX: i64 = 50;

/// Supplier of the auxiliary social-chatter score
pub trait ChatterSource: Send + Sync {
    /// Score social chatter for a disease in a city, in `[5, 50]`
    fn chatter_score(&self, disease: &DiseaseConfig, city: &str) -> i64;
}

/// Mocked chatter scanner returning pseudo-random scores
pub struct MockChatter {
    rng: Mutex<ChaCha8Rng>,
}

impl MockChatter {
    /// Create a mock seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::from_entropy()),
        }
    }

    /// Create a mock with a fixed seed (deterministic sequences for tests)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl Default for MockChatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatterSource for MockChatter {
    fn chatter_score(&self, _disease: &DiseaseConfig, city: &str) -> i64 {
        let score = self.rng.lock().unwrap().gen_range(CHATTER_MIN..=CHATTER_MAX);
        tracing::debug!(city = %city, score = score, "Simulated social chatter scan");
        score
    }
}

/// Chatter source returning a constant score (test fixture)
pub struct FixedChatter(pub i64);

impl ChatterSource for FixedChatter {
    fn chatter_score(&self, _disease: &DiseaseConfig, _city: &str) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiseaseCatalog;

    #[test]
    fn test_mock_stays_in_range() {
        let catalog = DiseaseCatalog::default();
        let dengue = catalog.get("dengue").unwrap();
        let chatter = MockChatter::new();

        for _ in 0..200 {
            let score = chatter.chatter_score(dengue, "kanpur");
            assert!((CHATTER_MIN..=CHATTER_MAX).contains(&score));
        }
    }

    #[test]
    fn test_seeded_mock_is_reproducible() {
        let catalog = DiseaseCatalog::default();
        let flu = catalog.get("flu").unwrap();

        let a = MockChatter::with_seed(7);
        let b = MockChatter::with_seed(7);
        for _ in 0..10 {
            assert_eq!(a.chatter_score(flu, "delhi"), b.chatter_score(flu, "delhi"));
        }
    }

    #[test]
    fn test_fixed_chatter() {
        let catalog = DiseaseCatalog::default();
        let covid = catalog.get("covid").unwrap();
        let chatter = FixedChatter(20);
        assert_eq!(chatter.chatter_score(covid, "kanpur"), 20);
    }
}
