use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtHandler;
use crate::jwt::TokenError;

/// A freshly issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies signed, time-limited bearer tokens bound to a subject.
///
/// Tokens are stateless: nothing is stored server-side, so an issued token
/// stays valid until it expires.
pub struct TokenService {
    jwt_handler: JwtHandler,
    lifetime: Duration,
}

impl TokenService {
    /// Create a token service.
    ///
    /// # Arguments
    /// * `secret` - Process-wide signing secret
    /// * `lifetime` - How long an issued token stays valid
    pub fn new(secret: &[u8], lifetime: Duration) -> Self {
        Self {
            jwt_handler: JwtHandler::new(secret),
            lifetime,
        }
    }

    /// Issue a token bound to `subject`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed or the expiry is out of range
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, TokenError> {
        let claims = Claims::new(subject, Utc::now(), self.lifetime)?;
        let access_token = self.jwt_handler.encode(&claims)?;

        Ok(IssuedToken {
            access_token,
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now),
        })
    }

    /// Verify a token and recover the subject it was issued for.
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature check failed
    /// * `Expired` - Current time is past issuance plus lifetime
    /// * `Malformed` - Token cannot be parsed
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let claims: Claims = self.jwt_handler.decode(token)?;
        Ok(claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn service() -> TokenService {
        TokenService::new(SECRET, Duration::hours(1))
    }

    #[test]
    fn test_issue_and_verify() {
        let service = service();

        let issued = service.issue("a@x.com").expect("Failed to issue token");
        assert!(!issued.access_token.is_empty());
        assert!(issued.expires_at > Utc::now());

        let subject = service
            .verify(&issued.access_token)
            .expect("Failed to verify token");
        assert_eq!(subject, "a@x.com");
    }

    #[test]
    fn test_token_does_not_contain_secret() {
        let service = service();
        let issued = service.issue("a@x.com").expect("Failed to issue token");

        let secret = std::str::from_utf8(SECRET).unwrap();
        assert!(!issued.access_token.contains(secret));
    }

    #[test]
    fn test_verify_expired() {
        let service = service();
        let claims =
            Claims::new("a@x.com", Utc::now() - Duration::hours(2), Duration::hours(1)).unwrap();
        let token = service.jwt_handler.encode(&claims).unwrap();

        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_verify_with_negative_lifetime_expires() {
        let service = TokenService::new(SECRET, Duration::seconds(-1));
        let issued = service.issue("a@x.com").expect("Failed to issue token");

        assert_eq!(service.verify(&issued.access_token), Err(TokenError::Expired));
    }

    #[test]
    fn test_issue_with_out_of_range_lifetime_fails() {
        let service = TokenService::new(SECRET, Duration::seconds(10_000_000_000_000));

        assert!(matches!(
            service.issue("a@x.com"),
            Err(TokenError::EncodingFailed(_))
        ));
    }

    #[test]
    fn test_verify_tampered_payload() {
        let service = service();
        let issued = service.issue("a@x.com").expect("Failed to issue token");

        let mut parts: Vec<String> = issued.access_token.split('.').map(String::from).collect();
        let forged = service
            .jwt_handler
            .encode(&Claims::new("b@x.com", Utc::now(), Duration::hours(1)).unwrap())
            .unwrap();
        parts[1] = forged.split('.').nth(1).unwrap().to_string();
        let tampered = parts.join(".");

        assert_eq!(service.verify(&tampered), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_verify_any_single_byte_change_is_rejected() {
        let service = service();
        let token = service.issue("a@x.com").unwrap().access_token;

        for index in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            if tampered == token {
                continue;
            }

            let result = service.verify(&tampered);
            assert!(
                matches!(
                    result,
                    Err(TokenError::InvalidSignature) | Err(TokenError::Malformed)
                ),
                "byte {} accepted: {:?}",
                index,
                result
            );
        }
    }

    #[test]
    fn test_verify_with_other_secret() {
        let issuer = service();
        let verifier = TokenService::new(b"another_secret_key_at_least_32_bytes", Duration::hours(1));

        let issued = issuer.issue("a@x.com").unwrap();
        assert_eq!(
            verifier.verify(&issued.access_token),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_verify_garbage() {
        let service = service();

        assert_eq!(service.verify("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(service.verify(""), Err(TokenError::Malformed));
    }
}
