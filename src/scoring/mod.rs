//! Threat score computation
//!
//! Blends search-trend growth (70%) with a social-chatter score (30%) into
//! a composite integer, then maps it to a categorical level with a canned
//! recommended action.
//!
//! The trend component is the percent increase of the trailing 7-day window
//! over the preceding baseline window, floored at zero so decreasing
//! interest never subtracts from the composite. A zero baseline scores any
//! current volume as double its raw value instead of dividing.

use crate::config::DiseaseConfig;
use crate::models::{ThreatAssessment, ThreatLevel, TimeSeries};

/// Rows in the trailing "current" window
const CURRENT_WINDOW_DAYS: usize = 7;

/// Baseline average substituted when the baseline window is empty
const DEFAULT_BASELINE_AVG: f64 = 10.0;

/// Weight of the trend component in the composite
const TREND_WEIGHT: f64 = 0.7;

/// Weight of the social-chatter component in the composite
const SOCIAL_WEIGHT: f64 = 0.3;

/// Multiplier applied to current volume when the baseline is zero
const ZERO_BASELINE_MULTIPLIER: f64 = 2.0;

/// Action message when no series is available
pub const ACTION_NO_DATA: &str = "No trend data available for calculation.";

/// Action message when scoring itself fails
pub const ACTION_CALC_ERROR: &str = "Error in calculation logic.";

/// Action message for the High level
pub const ACTION_HIGH: &str = "ACTION: High threat detected. Recommend immediate public advisory and resource mobilization to hospitals.";

/// Action message for the Elevated level
pub const ACTION_ELEVATED: &str = "ALERT: Elevated search interest. Recommend alerting clinics and launching a preventative awareness campaign.";

/// Action message for the Guarded level
pub const ACTION_GUARDED: &str = "WATCH: Search interest is above baseline. Monitor data daily and check pharmacy supplies.";

/// Action message for the Low level
pub const ACTION_LOW: &str = "INFO: Normal background chatter. No immediate action required.";

/// Recommended action for a threat level
pub fn action_for(level: ThreatLevel) -> &'static str {
    match level {
        ThreatLevel::High => ACTION_HIGH,
        ThreatLevel::Elevated => ACTION_ELEVATED,
        ThreatLevel::Guarded => ACTION_GUARDED,
        ThreatLevel::Low => ACTION_LOW,
    }
}

/// Compute the threat assessment for a series and social-chatter score
///
/// An absent or empty series yields the degenerate `(0, Low)` result.
/// Internal computation failures never propagate; they degrade to a fixed
/// `(0, Low)` result with an error action message.
pub fn score(
    series: Option<&TimeSeries>,
    social_score: i64,
    disease: &DiseaseConfig,
) -> ThreatAssessment {
    let series = match series {
        Some(s) if !s.is_empty() => s,
        _ => {
            return ThreatAssessment {
                score: 0,
                level: ThreatLevel::Low,
                action: ACTION_NO_DATA.to_string(),
            }
        }
    };

    match try_score(series, social_score, disease) {
        Ok(assessment) => assessment,
        Err(reason) => {
            tracing::error!(reason = %reason, "Threat score computation failed");
            ThreatAssessment {
                score: 0,
                level: ThreatLevel::Low,
                action: ACTION_CALC_ERROR.to_string(),
            }
        }
    }
}

fn try_score(
    series: &TimeSeries,
    social_score: i64,
    disease: &DiseaseConfig,
) -> Result<ThreatAssessment, String> {
    let split = series.len().saturating_sub(CURRENT_WINDOW_DAYS);
    let (baseline_rows, current_rows) = series.rows.split_at(split);

    let baseline_avg = if baseline_rows.is_empty() {
        DEFAULT_BASELINE_AVG
    } else {
        window_average(baseline_rows, &disease.keywords)
    };
    let current_avg = window_average(current_rows, &disease.keywords);

    let trend_score = if baseline_avg > 0.0 {
        let percentage_increase = (current_avg - baseline_avg) / baseline_avg * 100.0;
        percentage_increase.max(0.0)
    } else {
        current_avg * ZERO_BASELINE_MULTIPLIER
    };

    let composite = trend_score * TREND_WEIGHT + social_score as f64 * SOCIAL_WEIGHT;
    if !composite.is_finite() {
        return Err(format!(
            "non-finite composite (trend={trend_score}, social={social_score})"
        ));
    }

    // Truncation toward zero, matching integer conversion semantics.
    let score = composite as i64;
    let level = ThreatLevel::from_score(score);

    Ok(ThreatAssessment {
        score,
        level,
        action: action_for(level).to_string(),
    })
}

/// Average of per-row keyword sums over a window
fn window_average(rows: &[crate::models::TrendRow], keywords: &[String]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let total: u64 = rows.iter().map(|r| r.sum_for(keywords)).sum();
    total as f64 / rows.len() as f64
}
