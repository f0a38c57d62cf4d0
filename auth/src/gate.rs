use std::sync::Arc;

use thiserror::Error;

use crate::jwt::TokenError;
use crate::token::TokenService;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity resolved from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub email: String,
}

/// Reasons a request is rejected by the gate.
///
/// Callers must collapse every variant into one uniform "unauthorized"
/// response; the variants exist for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Authorization header is not of the form 'Bearer <token>'")]
    MalformedHeader,

    #[error("Token rejected: {0}")]
    InvalidToken(#[from] TokenError),
}

/// Maps an `Authorization` header value to an authenticated identity.
#[derive(Clone)]
pub struct AuthGate {
    token_service: Arc<TokenService>,
}

impl AuthGate {
    pub fn new(token_service: Arc<TokenService>) -> Self {
        Self { token_service }
    }

    /// Extract the token from a `Bearer <token>` header value.
    ///
    /// # Errors
    /// * `MalformedHeader` - Prefix missing or token empty
    pub fn bearer_token(header_value: &str) -> Result<&str, GateError> {
        match header_value.strip_prefix(BEARER_PREFIX) {
            Some(token) if !token.trim().is_empty() => Ok(token.trim()),
            _ => Err(GateError::MalformedHeader),
        }
    }

    /// Resolve the identity carried by an `Authorization` header.
    ///
    /// # Arguments
    /// * `header_value` - Raw header value, `None` when the header is absent
    ///
    /// # Errors
    /// * `MissingHeader` - No header supplied
    /// * `MalformedHeader` - Header is not a bearer credential
    /// * `InvalidToken` - Token failed verification
    pub fn authenticate(
        &self,
        header_value: Option<&str>,
    ) -> Result<AuthenticatedIdentity, GateError> {
        let header_value = header_value.ok_or(GateError::MissingHeader)?;
        let token = Self::bearer_token(header_value)?;
        let email = self.token_service.verify(token)?;

        Ok(AuthenticatedIdentity { email })
    }
}
