use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::jwt::TokenError;

/// JWT claims bound to a single subject.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (the email the token was issued for)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// JWT ID, unique per issued token
    pub jti: String,
}

impl Claims {
    /// Create claims for `subject`, issued at `issued_at` and valid for `lifetime`.
    ///
    /// # Errors
    /// * `EncodingFailed` - The expiry falls outside the representable time range
    pub fn new(
        subject: impl ToString,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<Self, TokenError> {
        let expires_at = issued_at.checked_add_signed(lifetime).ok_or_else(|| {
            TokenError::EncodingFailed(format!("token lifetime {} is out of range", lifetime))
        })?;

        Ok(Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        })
    }
}
