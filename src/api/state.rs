//! Application state for shared services

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::post::{AuthorResolver, PostChanges, PostId, PostInput, PostRepository, PostWithAuthor};
use crate::domain::user::{User, UserId, UserInput, UserPatch, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::TokenVerifier;
use crate::infrastructure::post::PostService;
use crate::infrastructure::user::{PasswordHasher, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub post_service: Arc<dyn PostServiceTrait>,
    pub token_verifier: Arc<dyn TokenVerifier>,
}

/// Trait for user service operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn create(&self, input: UserInput) -> Result<User, DomainError>;
    async fn find_all(&self, limit: usize) -> Result<Vec<User>, DomainError>;
    async fn find_by_id(&self, id: UserId) -> Result<User, DomainError>;
    async fn update(&self, id: UserId, patch: UserPatch) -> Result<User, DomainError>;
    async fn delete(&self, id: UserId) -> Result<u64, DomainError>;
}

/// Trait for post service operations
#[async_trait]
pub trait PostServiceTrait: Send + Sync {
    async fn create(&self, input: PostInput) -> Result<PostWithAuthor, DomainError>;
    async fn find_all(&self, limit: usize) -> Result<Vec<PostWithAuthor>, DomainError>;
    async fn find_by_id(&self, id: PostId) -> Result<PostWithAuthor, DomainError>;
    async fn update(
        &self,
        id: PostId,
        caller: UserId,
        changes: PostChanges,
    ) -> Result<PostWithAuthor, DomainError>;
    async fn delete(&self, id: PostId, caller: UserId) -> Result<u64, DomainError>;
    async fn delete_by_author(&self, author: UserId) -> Result<u64, DomainError>;
}

#[async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn create(&self, input: UserInput) -> Result<User, DomainError> {
        UserService::create(self, input).await
    }

    async fn find_all(&self, limit: usize) -> Result<Vec<User>, DomainError> {
        UserService::find_all(self, limit).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<User, DomainError> {
        UserService::find_by_id(self, id).await
    }

    async fn update(&self, id: UserId, patch: UserPatch) -> Result<User, DomainError> {
        UserService::update(self, id, patch).await
    }

    async fn delete(&self, id: UserId) -> Result<u64, DomainError> {
        UserService::delete(self, id).await
    }
}

#[async_trait]
impl<P, A> PostServiceTrait for PostService<P, A>
where
    P: PostRepository + 'static,
    A: AuthorResolver + 'static,
{
    async fn create(&self, input: PostInput) -> Result<PostWithAuthor, DomainError> {
        PostService::create(self, input).await
    }

    async fn find_all(&self, limit: usize) -> Result<Vec<PostWithAuthor>, DomainError> {
        PostService::find_all(self, limit).await
    }

    async fn find_by_id(&self, id: PostId) -> Result<PostWithAuthor, DomainError> {
        PostService::find_by_id(self, id).await
    }

    async fn update(
        &self,
        id: PostId,
        caller: UserId,
        changes: PostChanges,
    ) -> Result<PostWithAuthor, DomainError> {
        PostService::update(self, id, caller, changes).await
    }

    async fn delete(&self, id: PostId, caller: UserId) -> Result<u64, DomainError> {
        PostService::delete(self, id, caller).await
    }

    async fn delete_by_author(&self, author: UserId) -> Result<u64, DomainError> {
        PostService::delete_by_author(self, author).await
    }
}
