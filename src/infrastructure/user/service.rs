//! User service: persistence of registered users with hash-on-write

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::domain::post::AuthorResolver;
use crate::domain::user::{NewUser, User, UserChanges, UserId, UserInput, UserPatch, UserRepository};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Maximum number of users returned by a single listing
pub const DEFAULT_LIST_LIMIT: usize = 100;

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// User service for registration, profile management and credential checks
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher + 'static> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Hash the password and persist a new user
    ///
    /// The input is expected to be sanitized and validated already.
    pub async fn create(&self, input: UserInput) -> Result<User, DomainError> {
        debug!(nickname = %input.nickname, "Creating user");

        let password_hash = self.hash_password(input.password).await?;

        let user = self
            .repository
            .insert(NewUser {
                nickname: input.nickname,
                email: input.email,
                password_hash,
                created_at: input.created_at,
                updated_at: input.updated_at,
            })
            .await?;

        debug!(user_id = %user.id(), "User created");
        Ok(user)
    }

    /// List up to `limit` users
    pub async fn find_all(&self, limit: usize) -> Result<Vec<User>, DomainError> {
        self.repository.find_all(limit).await
    }

    /// Get a user by ID
    pub async fn find_by_id(&self, id: UserId) -> Result<User, DomainError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User {} not found", id)))
    }

    /// Apply a profile patch and return the current record
    pub async fn update(&self, id: UserId, patch: UserPatch) -> Result<User, DomainError> {
        debug!(user_id = %id, "Updating user");

        let password_hash = match patch.password {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };

        let changes = UserChanges {
            nickname: patch.nickname,
            email: patch.email,
            password_hash,
            updated_at: Utc::now(),
        };

        if self.repository.update(id, changes).await? == 0 {
            return Err(DomainError::not_found(format!("User {} not found", id)));
        }

        self.find_by_id(id).await
    }

    /// Physically delete a user, returning the number of rows removed
    pub async fn delete(&self, id: UserId) -> Result<u64, DomainError> {
        debug!(user_id = %id, "Deleting user");
        self.repository.delete(id).await
    }

    /// Check an email/password pair
    ///
    /// Unknown email and wrong password produce the same validation error.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::validation(INVALID_CREDENTIALS))?;

        if !self.verify_password(user.password_hash(), password).await? {
            debug!(user_id = %user.id(), "Password mismatch");
            return Err(DomainError::validation(INVALID_CREDENTIALS));
        }

        Ok(user)
    }

    async fn hash_password(&self, password: String) -> Result<String, DomainError> {
        let hasher = Arc::clone(&self.hasher);

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::hashing(format!("Hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, hash: &str, password: &str) -> Result<bool, DomainError> {
        let hasher = Arc::clone(&self.hasher);
        let hash = hash.to_string();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .map_err(|e| DomainError::verification(format!("Verification task failed: {}", e)))?
    }
}

#[async_trait]
impl<R: UserRepository, H: PasswordHasher + 'static> AuthorResolver for UserService<R, H> {
    async fn resolve_author(&self, id: UserId) -> Result<User, DomainError> {
        self.find_by_id(id).await
    }
}
