//! Core data structures shared across the sentinel pipeline
//!
//! The central types are [`TimeSeries`] (per-keyword search-interest counts
//! over a trailing window of days), [`ChartPayload`] (a display-ready
//! projection of a series) and [`ThreatAssessment`] (the scorer's verdict).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

// ============================================================================
// Time Series
// ============================================================================

/// One day of search-interest counts, keyed by keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRow {
    /// Calendar date of this observation
    pub date: NaiveDate,

    /// Interest count per keyword for this date
    pub counts: HashMap<String, u64>,
}

impl TrendRow {
    /// Create a new row
    pub fn new(date: NaiveDate, counts: HashMap<String, u64>) -> Self {
        Self { date, counts }
    }

    /// Sum the counts for the given keywords (missing keywords count as 0)
    pub fn sum_for(&self, keywords: &[String]) -> u64 {
        keywords.iter().filter_map(|k| self.counts.get(k)).sum()
    }
}

/// Chronologically ordered search-interest observations
///
/// Produced by the trend provider; rows cover roughly the trailing 30 days
/// at daily granularity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Observation rows, oldest first
    pub rows: Vec<TrendRow>,
}

impl TimeSeries {
    /// Create a series from pre-sorted rows
    pub fn new(rows: Vec<TrendRow>) -> Self {
        Self { rows }
    }

    /// Number of observation rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the series has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All keywords that appear in at least one row, sorted
    pub fn keywords(&self) -> BTreeSet<&str> {
        self.rows
            .iter()
            .flat_map(|r| r.counts.keys().map(String::as_str))
            .collect()
    }

    /// Counts for a single keyword across all rows, in date order
    ///
    /// Dates where the keyword is absent contribute 0.
    pub fn column(&self, keyword: &str) -> Vec<u64> {
        self.rows
            .iter()
            .map(|r| r.counts.get(keyword).copied().unwrap_or(0))
            .collect()
    }
}

// ============================================================================
// Chart Payload
// ============================================================================

/// Value series for one keyword, aligned with the payload's labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    /// Keyword this dataset belongs to
    pub label: String,

    /// One value per date label
    pub data: Vec<u64>,
}

/// Display-ready chart structure: ISO date labels plus per-keyword datasets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    /// X-axis labels, ISO `YYYY-MM-DD`
    pub labels: Vec<String>,

    /// One dataset per keyword present in the source series
    pub datasets: Vec<ChartDataset>,
}

// ============================================================================
// Threat Assessment
// ============================================================================

/// Discrete threat level derived from the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreatLevel {
    Low,
    Guarded,
    Elevated,
    High,
}

impl ThreatLevel {
    /// Map a composite score to its level (strict `>` comparisons)
    pub fn from_score(score: i64) -> Self {
        if score > 80 {
            Self::High
        } else if score > 50 {
            Self::Elevated
        } else if score > 25 {
            Self::Guarded
        } else {
            Self::Low
        }
    }

    /// Level name as used in API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Guarded => "Guarded",
            Self::Elevated => "Elevated",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the threat scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatAssessment {
    /// Composite score, always >= 0
    pub score: i64,

    /// Categorical level derived from the score
    pub level: ThreatLevel,

    /// Canned recommended action for this level
    pub action: String,
}

// ============================================================================
// Threat Report (API response shape)
// ============================================================================

/// Full analysis result returned by `GET /api/threat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatReport {
    /// City name, capitalized
    pub city: String,

    /// Disease identifier, capitalized
    pub disease: String,

    /// Geography code, verbatim as requested
    pub geo: String,

    /// Composite threat score
    pub threat_score: i64,

    /// Threat level label
    pub threat_level: ThreatLevel,

    /// Recommended action for the level
    pub action_item: String,

    /// Chart payload, or null when no trend data was available
    pub chart_data: Option<ChartPayload>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_row_sum_ignores_missing_keywords() {
        let mut counts = HashMap::new();
        counts.insert("flu symptoms".to_string(), 40);
        counts.insert("fever and cough".to_string(), 10);
        let row = TrendRow::new(date(1), counts);

        let keywords = vec![
            "flu symptoms".to_string(),
            "fever and cough".to_string(),
            "influenza treatment".to_string(),
        ];
        assert_eq!(row.sum_for(&keywords), 50);
    }

    #[test]
    fn test_series_column_fills_gaps_with_zero() {
        let mut c1 = HashMap::new();
        c1.insert("dengue symptoms".to_string(), 7);
        let c2 = HashMap::new();

        let series = TimeSeries::new(vec![TrendRow::new(date(1), c1), TrendRow::new(date(2), c2)]);
        assert_eq!(series.column("dengue symptoms"), vec![7, 0]);
    }

    #[test]
    fn test_series_keywords_union() {
        let mut c1 = HashMap::new();
        c1.insert("a".to_string(), 1);
        let mut c2 = HashMap::new();
        c2.insert("b".to_string(), 2);

        let series = TimeSeries::new(vec![TrendRow::new(date(1), c1), TrendRow::new(date(2), c2)]);
        let keywords: Vec<_> = series.keywords().into_iter().collect();
        assert_eq!(keywords, vec!["a", "b"]);
    }

    #[test]
    fn test_level_boundaries_are_strict() {
        assert_eq!(ThreatLevel::from_score(80), ThreatLevel::Elevated);
        assert_eq!(ThreatLevel::from_score(81), ThreatLevel::High);
        assert_eq!(ThreatLevel::from_score(50), ThreatLevel::Guarded);
        assert_eq!(ThreatLevel::from_score(51), ThreatLevel::Elevated);
        assert_eq!(ThreatLevel::from_score(25), ThreatLevel::Low);
        assert_eq!(ThreatLevel::from_score(26), ThreatLevel::Guarded);
        assert_eq!(ThreatLevel::from_score(0), ThreatLevel::Low);
    }

    #[test]
    fn test_level_serializes_as_plain_name() {
        let json = serde_json::to_string(&ThreatLevel::Elevated).unwrap();
        assert_eq!(json, "\"Elevated\"");
    }
}
