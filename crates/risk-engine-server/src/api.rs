use risk_engine_core::{recommend, RiskError, RiskInput, RiskResult, RiskTier, Sector};
use risk_engine_storage::EvaluationRecord;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::http::{HttpReadError, HttpResponse};

/// Body of `POST /api/evaluate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRequest {
    #[serde(rename = "user_id")]
    pub user_id: String,
    pub company_name: String,
    pub debt_to_equity: f64,
    pub net_profit: f64,
    pub negative_news_score: f64,
    #[serde(default)]
    pub late_payments_rate: f64,
    #[serde(default = "default_sector")]
    pub sector: String,
    #[serde(default)]
    pub additional_factors: Map<String, Value>,
}

fn default_sector() -> String {
    "general".to_string()
}

impl RiskRequest {
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        serde_json::from_slice(body)
            .map_err(|err| ApiError::Validation(format!("invalid request body: {err}")))
    }

    /// Checks the request-level bounds and hands back the scoring input.
    pub fn validate(&self) -> Result<RiskInput, ApiError> {
        if self.user_id.trim().is_empty() {
            return Err(ApiError::Validation("user_id cannot be empty".to_string()));
        }
        if self.company_name.trim().is_empty() {
            return Err(ApiError::Validation(
                "companyName cannot be empty".to_string(),
            ));
        }
        if self.debt_to_equity < 0.0 {
            return Err(ApiError::Validation(
                "debtToEquity must be greater than or equal to 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.negative_news_score) {
            return Err(ApiError::Validation(
                "negativeNewsScore must be between 0 and 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.late_payments_rate) {
            return Err(ApiError::Validation(
                "latePaymentsRate must be between 0 and 1".to_string(),
            ));
        }

        Ok(RiskInput {
            company_name: self.company_name.clone(),
            debt_to_equity: self.debt_to_equity,
            net_profit: self.net_profit,
            negative_news_score: self.negative_news_score,
            late_payments_rate: self.late_payments_rate,
            sector: self.sector.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskResponse {
    pub score: f64,
    pub tier: RiskTier,
    pub recommendation: &'static str,
    pub explanations: Vec<String>,
    pub recommendations: Vec<String>,
    pub evaluation_id: Option<u64>,
}

impl RiskResponse {
    pub fn new(result: RiskResult, evaluation_id: Option<u64>) -> Self {
        Self {
            score: result.score,
            tier: result.tier,
            recommendation: result.tier.label(),
            explanations: result.explanations,
            recommendations: result.recommendations,
            evaluation_id,
        }
    }
}

/// A stored record as returned by `GET /api/evaluations/{id}`.
///
/// Recommendations are not persisted; they are rebuilt from the stored tier,
/// score and sector so that they track the current rule set.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationDetail {
    #[serde(flatten)]
    pub record: EvaluationRecord,
    pub recommendation: &'static str,
    pub recommendations: Vec<String>,
}

impl From<EvaluationRecord> for EvaluationDetail {
    fn from(record: EvaluationRecord) -> Self {
        let recommendations = recommend(
            record.tier,
            record.risk_score,
            Sector::from_name(&record.sector),
        );
        Self {
            recommendation: record.tier.label(),
            recommendations,
            record,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("Error calculating risk score: {0}")]
    Scoring(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Validation(_) => 422,
            Self::NotFound(_) => 404,
            Self::MethodNotAllowed => 405,
            Self::PayloadTooLarge(_) => 413,
            Self::Scoring(_) | Self::Internal(_) => 500,
        }
    }

    pub fn into_response(self) -> HttpResponse {
        HttpResponse::json(self.status(), json!({ "detail": self.to_string() }))
    }
}

impl From<HttpReadError> for ApiError {
    fn from(err: HttpReadError) -> Self {
        match err {
            HttpReadError::BodyTooLarge(_) => Self::PayloadTooLarge(err.to_string()),
            HttpReadError::Malformed(_) => Self::BadRequest(err.to_string()),
            HttpReadError::Io(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<RiskError> for ApiError {
    fn from(err: RiskError) -> Self {
        match err {
            RiskError::InvalidInput(message) => Self::Validation(message),
        }
    }
}
