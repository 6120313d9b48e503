use thiserror::Error;

/// Errors surfaced by the label predictors and the classification facade.
///
/// Text content never produces an error. Every artifact problem (missing
/// file, malformed JSON, shape mismatch) collapses into `ModelUnavailable`
/// with a reason naming the offending artifact.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// The predictors cannot be used. Startup-fatal; not retryable.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
    /// Settings or normalizer configuration are inconsistent.
    #[error("invalid classifier config: {0}")]
    InvalidConfig(String),
}

impl From<features::FeatureError> for ClassifyError {
    fn from(err: features::FeatureError) -> Self {
        ClassifyError::ModelUnavailable(err.to_string())
    }
}

impl From<normalize::NormalizeError> for ClassifyError {
    fn from(err: normalize::NormalizeError) -> Self {
        ClassifyError::InvalidConfig(err.to_string())
    }
}
