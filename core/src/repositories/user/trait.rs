//! User repository trait defining the interface for user data persistence.
//!
//! The Identity Store of the system. Implementations must keep emails unique
//! and compare them in their normalized (trimmed, lowercased) form.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use uuid::Uuid;
/// use mt_core::repositories::UserRepository;
/// use mt_core::domain::entities::user::User;
/// use mt_core::errors::DomainError;
///
/// struct MySqlUserRepository {
///     // database connection pool
/// }
///
/// #[async_trait]
/// impl UserRepository for MySqlUserRepository {
///     async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
///         // Implementation here
///         Ok(None)
///     }
///
///     // ... other methods
/// #   async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> { Ok(None) }
/// #   async fn create(&self, user: User) -> Result<User, DomainError> { Ok(user) }
/// #   async fn update(&self, user: User) -> Result<User, DomainError> { Ok(user) }
/// #   async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> { Ok(false) }
/// }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user found with given ID
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user in the repository
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError::Auth(AuthError::EmailAlreadyRegistered))` - Email taken
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing user in the repository
    ///
    /// # Returns
    /// * `Ok(User)` - The updated user
    /// * `Err(DomainError::NotFound)` - No such user
    /// * `Err(DomainError::Auth(AuthError::EmailAlreadyRegistered))` - New email
    ///   belongs to another user
    async fn update(&self, user: User) -> Result<User, DomainError>;

    /// Check if any user already uses the given email
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError>;
}
