use serde::{Deserialize, Serialize};

/// Raw metrics submitted for one counterparty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskInput {
    pub company_name: String,
    pub debt_to_equity: f64,
    pub net_profit: f64,
    pub negative_news_score: f64,
    #[serde(default)]
    pub late_payments_rate: f64,
    #[serde(default = "default_sector")]
    pub sector: String,
}

fn default_sector() -> String {
    "general".to_string()
}

impl RiskInput {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            debt_to_equity: 0.0,
            net_profit: 0.0,
            negative_news_score: 0.0,
            late_payments_rate: 0.0,
            sector: default_sector(),
        }
    }
}

/// Per-metric risk contributions, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskFactors {
    pub debt_to_equity: f64,
    pub net_profit: f64,
    pub negative_news: f64,
    pub late_payments: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskResult {
    pub score: f64,
    pub tier: RiskTier,
    pub explanations: Vec<String>,
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_deserializes_with_defaults() {
        let input: RiskInput = serde_json::from_str(
            r#"{"companyName":"Acme","debtToEquity":1.0,"netProfit":5.0,"negativeNewsScore":0.1}"#,
        )
        .expect("parse input");
        assert_eq!(input.company_name, "Acme");
        assert_eq!(input.late_payments_rate, 0.0);
        assert_eq!(input.sector, "general");
    }

    #[test]
    fn tier_serializes_as_bare_name() {
        let raw = serde_json::to_string(&RiskTier::Medium).expect("serialize");
        assert_eq!(raw, "\"Medium\"");
        assert_eq!(RiskTier::Medium.label(), "Medium Risk");
    }
}
