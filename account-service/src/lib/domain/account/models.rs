use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::account::errors::EmailError;
use crate::account::errors::FieldError;

/// Stored account record.
///
/// The email is the unique key. `password_hash` is a PHC string and must
/// never leave the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub email: EmailAddress,
    pub password_hash: String,
    pub profile: Profile,
}

/// Public view of an account, without credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub email: EmailAddress,
    pub profile: Profile,
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        Self {
            email: record.email,
            profile: record.profile,
        }
    }
}

/// Email address type
///
/// Validated with an RFC 5322 parser and normalized (trimmed, lower-cased)
/// so that lookups and uniqueness are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated, normalized email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let normalized = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&normalized)
            .map(|_| EmailAddress(normalized))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Profile fields supplied at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub birth_date: NaiveDate,
    pub gender: String,
}

impl Profile {
    /// Validate raw profile fields.
    ///
    /// # Errors
    /// * `EmptyName` / `EmptyGender` - Field is blank
    /// * `InvalidBirthDate` - Not an ISO-8601 calendar date
    pub fn new(name: String, birth_date: &str, gender: String) -> Result<Self, FieldError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(FieldError::EmptyName);
        }

        let gender = gender.trim().to_string();
        if gender.is_empty() {
            return Err(FieldError::EmptyGender);
        }

        let birth_date = NaiveDate::parse_from_str(birth_date.trim(), "%Y-%m-%d")
            .map_err(|_| FieldError::InvalidBirthDate(birth_date.to_string()))?;

        Ok(Self {
            name,
            birth_date,
            gender,
        })
    }
}

/// Command to register a new account
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: String,
    pub profile: Profile,
}

impl RegisterCommand {
    /// # Errors
    /// * `EmptyPassword` - Password is empty
    pub fn new(
        email: EmailAddress,
        password: String,
        profile: Profile,
    ) -> Result<Self, FieldError> {
        if password.is_empty() {
            return Err(FieldError::EmptyPassword);
        }

        Ok(Self {
            email,
            password,
            profile,
        })
    }
}

impl fmt::Debug for RegisterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterCommand")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("profile", &self.profile)
            .finish()
    }
}

/// Login credentials. Request-scoped, never persisted.
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Command to replace the password of the authenticated account
pub struct ChangePasswordCommand {
    pub current_password: String,
    pub new_password: String,
}

impl ChangePasswordCommand {
    /// # Errors
    /// * `EmptyPassword` - New password is empty
    pub fn new(current_password: String, new_password: String) -> Result<Self, FieldError> {
        if new_password.is_empty() {
            return Err(FieldError::EmptyPassword);
        }

        Ok(Self {
            current_password,
            new_password,
        })
    }
}

impl fmt::Debug for ChangePasswordCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePasswordCommand").finish_non_exhaustive()
    }
}
