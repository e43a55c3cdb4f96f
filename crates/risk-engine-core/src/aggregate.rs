use crate::sector::Sector;
use crate::types::RiskFactors;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorWeights {
    pub debt_to_equity: f64,
    pub net_profit: f64,
    pub negative_news: f64,
    pub late_payments: f64,
}

impl FactorWeights {
    pub fn total(&self) -> f64 {
        self.debt_to_equity + self.net_profit + self.negative_news + self.late_payments
    }
}

pub const WEIGHTS: FactorWeights = FactorWeights {
    debt_to_equity: 0.30,
    net_profit: 0.25,
    negative_news: 0.20,
    late_payments: 0.25,
};

pub const MAX_SCORE: f64 = 100.0;

/// Weighted factor average on the 0-100 scale, before sector adjustment.
pub fn base_score(factors: &RiskFactors) -> f64 {
    let w = WEIGHTS;
    let weighted = w.debt_to_equity * factors.debt_to_equity
        + w.net_profit * factors.net_profit
        + w.negative_news * factors.negative_news
        + w.late_payments * factors.late_payments;
    MAX_SCORE * weighted / w.total()
}

pub fn apply_sector(base: f64, sector: Sector) -> f64 {
    let adjusted = base * sector.multiplier();
    if adjusted > MAX_SCORE {
        tracing::debug!(adjusted, "score capped at {MAX_SCORE}");
    }
    adjusted.clamp(0.0, MAX_SCORE)
}
