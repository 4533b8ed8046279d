use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecommendError {
    #[error("budget amount must be a finite number greater than 0 (got {amount})")]
    InvalidBudget { amount: f64 },
    #[error("item {id} has no price")]
    MissingPrice { id: String },
    #[error("item {id} is malformed: {reason}")]
    MalformedItem { id: String, reason: String },
}

pub type RecommendResult<T> = std::result::Result<T, RecommendError>;
