use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticatedIdentity;
use auth::IssuedToken;
use auth::PasswordHasher;
use auth::TokenService;

use crate::account::errors::AccountError;
use crate::account::models::ChangePasswordCommand;
use crate::account::models::Credentials;
use crate::account::models::EmailAddress;
use crate::account::models::RegisterCommand;
use crate::account::models::UserProfile;
use crate::account::models::UserRecord;
use crate::account::ports::AccountServicePort;
use crate::account::ports::UserStore;

/// Domain service implementation for account operations.
///
/// Collaborators are passed in explicitly; the service owns no mutable state.
pub struct AccountService<S>
where
    S: UserStore,
{
    store: Arc<S>,
    password_hasher: Arc<PasswordHasher>,
    token_service: Arc<TokenService>,
    // Verified against on unknown-email logins so both failure paths cost one hash.
    dummy_hash: String,
}

impl<S> AccountService<S>
where
    S: UserStore,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Account persistence implementation
    /// * `password_hasher` - Credential hashing
    /// * `token_service` - Bearer token issuance
    ///
    /// # Errors
    /// * `Password` - The placeholder hash for unknown-email logins could not be computed
    pub fn new(
        store: Arc<S>,
        password_hasher: Arc<PasswordHasher>,
        token_service: Arc<TokenService>,
    ) -> Result<Self, AccountError> {
        let dummy_hash = password_hasher.hash("timing-equalization-placeholder")?;

        Ok(Self {
            store,
            password_hasher,
            token_service,
            dummy_hash,
        })
    }

    async fn resolve(&self, identity: &AuthenticatedIdentity) -> Result<UserRecord, AccountError> {
        let not_found = || AccountError::NotFound(identity.email.clone());

        let email = EmailAddress::new(identity.email.clone()).map_err(|_| not_found())?;
        self.store.find_by_email(&email).await?.ok_or_else(not_found)
    }
}

#[async_trait]
impl<S> AccountServicePort for AccountService<S>
where
    S: UserStore,
{
    async fn register(&self, command: RegisterCommand) -> Result<(), AccountError> {
        let password_hash = self.password_hasher.hash(&command.password)?;

        let record = UserRecord {
            email: command.email,
            password_hash,
            profile: command.profile,
        };

        let created = self.store.insert(record).await?;
        tracing::info!(email = %created.email, "Account registered");

        Ok(())
    }

    async fn login(&self, credentials: Credentials) -> Result<IssuedToken, AccountError> {
        let record = match EmailAddress::new(credentials.email) {
            Ok(email) => self.store.find_by_email(&email).await?,
            Err(_) => None,
        };

        let record = match record {
            Some(record) => record,
            None => {
                let _ = self
                    .password_hasher
                    .verify(&credentials.password, &self.dummy_hash);
                tracing::debug!("Login rejected: unknown email");
                return Err(AccountError::InvalidCredentials);
            }
        };

        if !self
            .password_hasher
            .verify(&credentials.password, &record.password_hash)
        {
            tracing::debug!(email = %record.email, "Login rejected: password mismatch");
            return Err(AccountError::InvalidCredentials);
        }

        let issued = self.token_service.issue(record.email.as_str())?;
        tracing::info!(
            email = %record.email,
            expires_at = %issued.expires_at,
            "Access token issued"
        );

        Ok(issued)
    }

    async fn get_profile(
        &self,
        identity: &AuthenticatedIdentity,
    ) -> Result<UserProfile, AccountError> {
        self.resolve(identity).await.map(UserProfile::from)
    }

    async fn change_password(
        &self,
        identity: &AuthenticatedIdentity,
        command: ChangePasswordCommand,
    ) -> Result<(), AccountError> {
        let record = self.resolve(identity).await?;

        if !self
            .password_hasher
            .verify(&command.current_password, &record.password_hash)
        {
            tracing::debug!(email = %record.email, "Password change rejected: current password mismatch");
            return Err(AccountError::InvalidCredentials);
        }

        let new_hash = self.password_hasher.hash(&command.new_password)?;

        // Only lands if nobody changed the hash since it was verified above.
        self.store
            .replace_password_hash(&record.email, &record.password_hash, new_hash)
            .await?;

        tracing::info!(email = %record.email, "Password changed");
        Ok(())
    }

    async fn logout(&self, _token: &str) -> Result<(), AccountError> {
        // No revocation list: the client discards the token, which stays
        // cryptographically valid until it expires.
        tracing::debug!("Logout acknowledged");
        Ok(())
    }
}
