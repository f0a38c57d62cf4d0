use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::account::errors::AccountError;
use crate::account::models::EmailAddress;
use crate::account::models::Profile;
use crate::account::models::UserRecord;
use crate::account::ports::UserStore;

/// `users` table backed store. Email uniqueness is the table's primary key.
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn database_error(e: sqlx::Error) -> AccountError {
    AccountError::DatabaseError(e.to_string())
}

fn record_from_row(row: PgRow) -> Result<UserRecord, AccountError> {
    let email: String = row.try_get("email").map_err(database_error)?;
    let birth_date: NaiveDate = row.try_get("birth_date").map_err(database_error)?;

    Ok(UserRecord {
        email: EmailAddress::new(email)?,
        password_hash: row.try_get("password_hash").map_err(database_error)?,
        profile: Profile {
            name: row.try_get("name").map_err(database_error)?,
            birth_date,
            gender: row.try_get("gender").map_err(database_error)?,
        },
    })
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn insert(&self, record: UserRecord) -> Result<UserRecord, AccountError> {
        sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, name, birth_date, gender)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.email.as_str())
        .bind(&record.password_hash)
        .bind(&record.profile.name)
        .bind(record.profile.birth_date)
        .bind(&record.profile.gender)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AccountError::Conflict(record.email.to_string());
                }
            }
            database_error(e)
        })?;

        Ok(record)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<UserRecord>, AccountError> {
        let row = sqlx::query(
            r#"
            SELECT email, password_hash, name, birth_date, gender
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(record_from_row).transpose()
    }

    async fn replace_password_hash(
        &self,
        email: &EmailAddress,
        expected_hash: &str,
        new_hash: String,
    ) -> Result<(), AccountError> {
        // Single conditional UPDATE: the row lock makes compare and write atomic.
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $3
            WHERE email = $1 AND password_hash = $2
            "#,
        )
        .bind(email.as_str())
        .bind(expected_hash)
        .bind(new_hash)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        let exists = sqlx::query("SELECT 1 FROM users WHERE email = $1")
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?
            .is_some();

        if exists {
            Err(AccountError::InvalidCredentials)
        } else {
            Err(AccountError::NotFound(email.to_string()))
        }
    }
}
