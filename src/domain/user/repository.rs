//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User, UserChanges, UserId};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Storage handle for user records
///
/// Uniqueness of nickname and email is enforced here, at write time, and
/// surfaces as `DomainError::Conflict`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Insert a new user and return it with its assigned ID
    async fn insert(&self, user: NewUser) -> Result<User, DomainError>;

    /// List up to `limit` users in insertion order
    async fn find_all(&self, limit: usize) -> Result<Vec<User>, DomainError>;

    /// Get a user by ID
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by email (for login)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Apply changes to a user, returning the number of rows affected
    async fn update(&self, id: UserId, changes: UserChanges) -> Result<u64, DomainError>;

    /// Physically delete a user, returning the number of rows affected
    async fn delete(&self, id: UserId) -> Result<u64, DomainError>;
}
