use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::account::errors::AccountError;
use crate::account::models::EmailAddress;
use crate::account::models::UserRecord;
use crate::account::ports::UserStore;

/// Process-local store for development and tests.
///
/// Every mutation runs inside a single write-lock scope.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<EmailAddress, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, record: UserRecord) -> Result<UserRecord, AccountError> {
        let mut users = self.users.write().await;

        match users.entry(record.email.clone()) {
            Entry::Occupied(_) => Err(AccountError::Conflict(record.email.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<UserRecord>, AccountError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn replace_password_hash(
        &self,
        email: &EmailAddress,
        expected_hash: &str,
        new_hash: String,
    ) -> Result<(), AccountError> {
        let mut users = self.users.write().await;

        let record = users
            .get_mut(email)
            .ok_or_else(|| AccountError::NotFound(email.to_string()))?;

        if record.password_hash != expected_hash {
            return Err(AccountError::InvalidCredentials);
        }

        record.password_hash = new_hash;
        Ok(())
    }
}
