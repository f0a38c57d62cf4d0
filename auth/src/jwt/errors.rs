use thiserror::Error;

/// Error type for token operations.
///
/// Verification failures carry no detail beyond their kind; the reason is
/// meant for internal logs only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Token is malformed")]
    Malformed,
}
