//! Raw metric to `[0, 1]` factor mapping. Higher always means riskier.

use crate::types::{RiskFactors, RiskInput};

/// Debt-to-equity ratio at which leverage risk saturates.
pub const D_MAX: f64 = 2.5;

/// Loss magnitude at which profitability risk saturates.
pub const P_MAX: f64 = 1_000.0;

fn c01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

pub fn debt_to_equity_factor(debt_to_equity: f64) -> f64 {
    c01(debt_to_equity / D_MAX)
}

pub fn net_profit_factor(net_profit: f64) -> f64 {
    if net_profit >= 0.0 {
        0.0
    } else {
        c01(-net_profit / P_MAX)
    }
}

pub fn negative_news_factor(negative_news_score: f64) -> f64 {
    c01(negative_news_score)
}

pub fn late_payments_factor(late_payments_rate: f64) -> f64 {
    c01(late_payments_rate)
}

pub fn normalize(input: &RiskInput) -> RiskFactors {
    RiskFactors {
        debt_to_equity: debt_to_equity_factor(input.debt_to_equity),
        net_profit: net_profit_factor(input.net_profit),
        negative_news: negative_news_factor(input.negative_news_score),
        late_payments: late_payments_factor(input.late_payments_rate),
    }
}

/// Names of the metrics that sit outside their declared range and will be
/// clamped.
pub fn out_of_range_fields(input: &RiskInput) -> Vec<&'static str> {
    let unit = 0.0..=1.0;
    let mut fields = Vec::new();
    if input.debt_to_equity < 0.0 {
        fields.push("debtToEquity");
    }
    if !unit.contains(&input.negative_news_score) {
        fields.push("negativeNewsScore");
    }
    if !unit.contains(&input.late_payments_rate) {
        fields.push("latePaymentsRate");
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leverage_saturates_at_ceiling() {
        assert_eq!(debt_to_equity_factor(D_MAX), 1.0);
        assert_eq!(debt_to_equity_factor(1000.0), debt_to_equity_factor(D_MAX));
        assert_eq!(debt_to_equity_factor(-3.0), 0.0);
        assert!((debt_to_equity_factor(1.25) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn profit_only_counts_losses() {
        assert_eq!(net_profit_factor(250_000.0), 0.0);
        assert_eq!(net_profit_factor(0.0), 0.0);
        assert!((net_profit_factor(-500.0) - 0.5).abs() < 1e-12);
        assert_eq!(net_profit_factor(-5_000_000.0), 1.0);
    }

    #[test]
    fn unit_metrics_are_clamped() {
        assert_eq!(negative_news_factor(1.7), 1.0);
        assert_eq!(negative_news_factor(-0.2), 0.0);
        assert_eq!(late_payments_factor(0.35), 0.35);
        assert_eq!(late_payments_factor(4.0), 1.0);
    }

    #[test]
    fn reports_out_of_range_metrics() {
        let mut input = RiskInput::new("Acme");
        assert!(out_of_range_fields(&input).is_empty());

        input.debt_to_equity = -1.0;
        input.negative_news_score = 1.5;
        input.late_payments_rate = 0.5;
        assert_eq!(
            out_of_range_fields(&input),
            vec!["debtToEquity", "negativeNewsScore"]
        );
    }
}
