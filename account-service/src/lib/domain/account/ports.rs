use async_trait::async_trait;
use auth::AuthenticatedIdentity;
use auth::IssuedToken;

use crate::account::errors::AccountError;
use crate::account::models::ChangePasswordCommand;
use crate::account::models::Credentials;
use crate::account::models::EmailAddress;
use crate::account::models::RegisterCommand;
use crate::account::models::UserProfile;
use crate::account::models::UserRecord;

/// Port for account use cases.
///
/// Identities are only ever produced by the authorization gate; nothing here
/// trusts an identity read from a request body.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Errors
    /// * `Conflict` - Email is already registered
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<(), AccountError>;

    /// Verify credentials and issue a bearer token.
    ///
    /// Unknown email and wrong password are indistinguishable.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Email unknown or password mismatch
    /// * `Token` - Token generation failed
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, credentials: Credentials) -> Result<IssuedToken, AccountError>;

    /// Fetch the profile of the authenticated account.
    ///
    /// # Errors
    /// * `NotFound` - Token subject no longer resolves to an account
    /// * `DatabaseError` - Store operation failed
    async fn get_profile(&self, identity: &AuthenticatedIdentity)
        -> Result<UserProfile, AccountError>;

    /// Replace the password of the authenticated account.
    ///
    /// Tokens issued before the change stay valid until they expire.
    ///
    /// # Errors
    /// * `NotFound` - Token subject no longer resolves to an account
    /// * `InvalidCredentials` - Current password does not verify
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Store operation failed
    async fn change_password(
        &self,
        identity: &AuthenticatedIdentity,
        command: ChangePasswordCommand,
    ) -> Result<(), AccountError>;

    /// Log out. Tokens are stateless, so this changes nothing server-side.
    async fn logout(&self, token: &str) -> Result<(), AccountError>;
}

/// Persistence operations for account records, keyed by email.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Insert a new record.
    ///
    /// The uniqueness check and the insert are one atomic step: of two
    /// concurrent inserts for the same email, exactly one succeeds.
    ///
    /// # Errors
    /// * `Conflict` - Email is already registered
    /// * `DatabaseError` - Store operation failed
    async fn insert(&self, record: UserRecord) -> Result<UserRecord, AccountError>;

    /// Retrieve a record by email.
    ///
    /// # Returns
    /// Optional record (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<UserRecord>, AccountError>;

    /// Replace a password hash if it still equals `expected_hash`.
    ///
    /// Compare and write happen atomically; readers see either the old or the
    /// new hash, never anything in between.
    ///
    /// # Errors
    /// * `NotFound` - No record for `email`
    /// * `InvalidCredentials` - Stored hash changed since it was verified
    /// * `DatabaseError` - Store operation failed
    async fn replace_password_hash(
        &self,
        email: &EmailAddress,
        expected_hash: &str,
        new_hash: String,
    ) -> Result<(), AccountError>;
}
