use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RiskError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
