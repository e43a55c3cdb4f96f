//! Explanation and recommendation text.
//!
//! Both lists come from fixed, ordered rule tables so the output order never
//! depends on evaluation order elsewhere in the pipeline.

use crate::sector::{display_name, Sector};
use crate::types::{RiskFactors, RiskTier};

/// Leverage becomes notable at a debt-to-equity ratio of 2.0.
pub const LEVERAGE_NOTABLE: f64 = 0.8;
pub const NEWS_NOTABLE: f64 = 0.5;
pub const LATE_PAYMENTS_NOTABLE: f64 = 0.1;
/// Scores above this also get the external expertise recommendation.
pub const ESCALATION_SCORE: f64 = 85.0;

pub const MSG_LEVERAGE: &str = "High debt-to-equity ratio increases financial risk";
pub const MSG_PROFITABILITY: &str = "Negative net profit shows concerning financial performance";
pub const MSG_REPUTATION: &str = "High negative news coverage suggests significant reputational risk";
pub const MSG_CASH_FLOW: &str = "Elevated late payments rate may indicate cash flow issues";

pub const REC_COMPREHENSIVE_REVIEW: &str = "Conduct immediate comprehensive financial review";
pub const REC_DEBT_REDUCTION: &str = "Develop debt reduction strategy";
pub const REC_RECEIVABLES: &str = "Implement stricter accounts receivable policies";
pub const REC_INVENTORY: &str = "Review inventory management to improve cash flow";
pub const REC_EXTERNAL_EXPERTISE: &str = "Consider external financial expertise/restructuring";
pub const REC_QUARTERLY_MONITORING: &str = "Quarterly financial health monitoring recommended";
pub const REC_ACTION_PLAN: &str = "Develop action plan for identified risk areas";
pub const REC_COMPETITIVE_POSITIONING: &str =
    "Evaluate competitive positioning in volatile market";
pub const REC_MAINTAIN_PRACTICES: &str = "Maintain current financial practices";
pub const REC_ANNUAL_REASSESSMENT: &str = "Annual risk reassessment recommended";

struct ExplanationRule {
    applies: fn(&RiskFactors) -> bool,
    message: &'static str,
}

static EXPLANATION_RULES: [ExplanationRule; 4] = [
    ExplanationRule {
        applies: |f| f.debt_to_equity >= LEVERAGE_NOTABLE,
        message: MSG_LEVERAGE,
    },
    ExplanationRule {
        applies: |f| f.net_profit > 0.0,
        message: MSG_PROFITABILITY,
    },
    ExplanationRule {
        applies: |f| f.negative_news > NEWS_NOTABLE,
        message: MSG_REPUTATION,
    },
    ExplanationRule {
        applies: |f| f.late_payments > LATE_PAYMENTS_NOTABLE,
        message: MSG_CASH_FLOW,
    },
];

pub fn explain(factors: &RiskFactors, sector_name: &str) -> Vec<String> {
    let mut out: Vec<String> = EXPLANATION_RULES
        .iter()
        .filter(|rule| (rule.applies)(factors))
        .map(|rule| rule.message.to_string())
        .collect();
    out.push(sector_sentence(sector_name));
    out
}

pub fn sector_sentence(sector_name: &str) -> String {
    let multiplier = Sector::from_name(sector_name).multiplier();
    let baseline = if multiplier > 1.0 {
        "higher than average"
    } else if multiplier < 1.0 {
        "lower than average"
    } else {
        "moderate"
    };
    format!("{} sector has {baseline} baseline risk", display_name(sector_name))
}

struct RecommendationRule {
    /// `None` applies to every tier.
    tier: Option<RiskTier>,
    applies: fn(Sector, f64) -> bool,
    message: &'static str,
}

static RECOMMENDATION_RULES: [RecommendationRule; 10] = [
    RecommendationRule {
        tier: Some(RiskTier::High),
        applies: |_, _| true,
        message: REC_COMPREHENSIVE_REVIEW,
    },
    RecommendationRule {
        tier: Some(RiskTier::High),
        applies: |_, _| true,
        message: REC_DEBT_REDUCTION,
    },
    RecommendationRule {
        tier: Some(RiskTier::High),
        applies: |_, _| true,
        message: REC_RECEIVABLES,
    },
    RecommendationRule {
        tier: Some(RiskTier::High),
        applies: |sector, _| matches!(sector, Sector::Retail | Sector::Manufacturing),
        message: REC_INVENTORY,
    },
    RecommendationRule {
        tier: Some(RiskTier::Medium),
        applies: |_, _| true,
        message: REC_QUARTERLY_MONITORING,
    },
    RecommendationRule {
        tier: Some(RiskTier::Medium),
        applies: |_, _| true,
        message: REC_ACTION_PLAN,
    },
    RecommendationRule {
        tier: Some(RiskTier::Medium),
        applies: |sector, _| matches!(sector, Sector::Technology | Sector::Finance),
        message: REC_COMPETITIVE_POSITIONING,
    },
    RecommendationRule {
        tier: Some(RiskTier::Low),
        applies: |_, _| true,
        message: REC_MAINTAIN_PRACTICES,
    },
    RecommendationRule {
        tier: Some(RiskTier::Low),
        applies: |_, _| true,
        message: REC_ANNUAL_REASSESSMENT,
    },
    RecommendationRule {
        tier: None,
        applies: |_, score| score > ESCALATION_SCORE,
        message: REC_EXTERNAL_EXPERTISE,
    },
];

pub fn recommend(tier: RiskTier, score: f64, sector: Sector) -> Vec<String> {
    RECOMMENDATION_RULES
        .iter()
        .filter(|rule| rule.tier.map_or(true, |t| t == tier))
        .filter(|rule| (rule.applies)(sector, score))
        .map(|rule| rule.message.to_string())
        .collect()
}
