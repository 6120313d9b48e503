use thiserror::Error;

/// Errors that can occur during normalization.
///
/// Text content never produces an error: empty or fully filtered input yields
/// an empty token sequence. Only a malformed configuration is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
