use crate::types::RiskTier;

/// Highest score still classified as [`RiskTier::Low`].
pub const LOW_CEILING: f64 = 40.0;
/// Highest score still classified as [`RiskTier::Medium`].
pub const MEDIUM_CEILING: f64 = 70.0;

pub fn classify(score: f64) -> RiskTier {
    if score <= LOW_CEILING {
        RiskTier::Low
    } else if score <= MEDIUM_CEILING {
        RiskTier::Medium
    } else {
        RiskTier::High
    }
}
