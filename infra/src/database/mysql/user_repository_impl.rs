//! MySQL implementation of the UserRepository trait.
//!
//! Emails are stored in their normalized form and kept unique by the
//! `uq_users_email` index; a violation surfaces as `EmailAlreadyRegistered`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use mt_core::domain::entities::user::{RegistrationProvider, User};
use mt_core::errors::{AuthError, DomainError};
use mt_core::repositories::UserRepository;

const USER_COLUMNS: &str = "id, name, email, phone, password_hash, provider, created_at, updated_at";

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::internal(format!("Failed to get id: {}", e)))?;
        let provider: String = row
            .try_get("provider")
            .map_err(|e| DomainError::internal(format!("Failed to get provider: {}", e)))?;

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::internal(format!("Invalid UUID: {}", e)))?,
            name: row
                .try_get("name")
                .map_err(|e| DomainError::internal(format!("Failed to get name: {}", e)))?,
            email: row
                .try_get("email")
                .map_err(|e| DomainError::internal(format!("Failed to get email: {}", e)))?,
            phone: row
                .try_get("phone")
                .map_err(|e| DomainError::internal(format!("Failed to get phone: {}", e)))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| DomainError::internal(format!("Failed to get password_hash: {}", e)))?,
            provider: provider
                .parse::<RegistrationProvider>()
                .map_err(DomainError::internal)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::internal(format!("Failed to get created_at: {}", e)))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| DomainError::internal(format!("Failed to get updated_at: {}", e)))?,
        })
    }
}

/// Map a write failure, turning the unique email index into a conflict
fn map_write_error(e: sqlx::Error, action: &str) -> DomainError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::EmailAlreadyRegistered.into(),
        _ => DomainError::internal(format!("Failed to {}: {}", action, e)),
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE id = ? LIMIT 1", USER_COLUMNS);

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("Database query failed: {}", e)))?;

        result.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE email = ? LIMIT 1", USER_COLUMNS);

        let result = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("Database query failed: {}", e)))?;

        result.as_ref().map(Self::row_to_user).transpose()
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (
                id, name, email, phone, password_hash, provider,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(&user.password_hash)
            .bind(user.provider.as_str())
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "create user"))?;

        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            UPDATE users SET
                name = ?,
                email = ?,
                phone = ?,
                password_hash = ?,
                updated_at = ?
            WHERE id = ?
        "#;

        let now = Utc::now();
        let result = sqlx::query(query)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(&user.password_hash)
            .bind(now)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "update user"))?;

        // updated_at always changes, so a matched row is always affected
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("User"));
        }

        let mut updated_user = user;
        updated_user.updated_at = now;
        Ok(updated_user)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("Database query failed: {}", e)))?;

        let count: i64 = row
            .try_get("count")
            .map_err(|e| DomainError::internal(format!("Failed to get count: {}", e)))?;
        Ok(count > 0)
    }
}
