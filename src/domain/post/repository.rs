//! Post repository and author resolution traits

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

use super::entity::{NewPost, Post, PostChanges, PostId};
use crate::domain::user::{User, UserId};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Storage handle for post records
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PostRepository: Send + Sync + Debug {
    /// Insert a new post and return it with its assigned ID
    async fn insert(&self, post: NewPost) -> Result<Post, DomainError>;

    /// List up to `limit` posts in insertion order
    async fn find_all(&self, limit: usize) -> Result<Vec<Post>, DomainError>;

    /// Get a post by ID
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, DomainError>;

    /// Update title/content of the post matching both `id` and `author_id`
    async fn update_owned(
        &self,
        id: PostId,
        author_id: UserId,
        changes: PostChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<u64, DomainError>;

    /// Delete the post matching both `id` and `author_id`
    async fn delete_owned(&self, id: PostId, author_id: UserId) -> Result<u64, DomainError>;

    /// Delete every post written by `author_id`
    async fn delete_by_author(&self, author_id: UserId) -> Result<u64, DomainError>;
}

/// Resolves the user a post points at
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuthorResolver: Send + Sync + Debug {
    /// Look up the author; `DomainError::NotFound` when no such user exists
    async fn resolve_author(&self, id: UserId) -> Result<User, DomainError>;
}
