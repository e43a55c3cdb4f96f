use crate::aggregate::{apply_sector, base_score};
use crate::classify::classify;
use crate::error::RiskError;
use crate::narrate::{explain, recommend};
use crate::normalize::{normalize, out_of_range_fields};
use crate::sector::Sector;
use crate::types::{RiskInput, RiskResult};

/// Rejects the inputs that cannot be clamped into something meaningful.
pub fn validate(input: &RiskInput) -> Result<(), RiskError> {
    if input.company_name.trim().is_empty() {
        return Err(RiskError::InvalidInput(
            "companyName cannot be empty".to_string(),
        ));
    }
    let numeric = [
        ("debtToEquity", input.debt_to_equity),
        ("netProfit", input.net_profit),
        ("negativeNewsScore", input.negative_news_score),
        ("latePaymentsRate", input.late_payments_rate),
    ];
    if let Some((name, _)) = numeric.iter().find(|(_, v)| !v.is_finite()) {
        return Err(RiskError::InvalidInput(format!("{name} must be a finite number")));
    }
    Ok(())
}

pub fn evaluate(input: &RiskInput) -> Result<RiskResult, RiskError> {
    validate(input)?;
    tracing::info!(company = %input.company_name, "computing risk score");

    let clamped = out_of_range_fields(input);
    if !clamped.is_empty() {
        tracing::warn!(
            company = %input.company_name,
            fields = ?clamped,
            "metrics outside declared range were clamped"
        );
    }

    let sector = Sector::from_name(&input.sector);
    let factors = normalize(input);
    let base = base_score(&factors);
    let score = apply_sector(base, sector);
    let tier = classify(score);
    let explanations = explain(&factors, &input.sector);
    let recommendations = recommend(tier, score, sector);

    tracing::info!(
        company = %input.company_name,
        score,
        tier = tier.label(),
        "risk calculation completed"
    );

    Ok(RiskResult {
        score,
        tier,
        explanations,
        recommendations,
    })
}
