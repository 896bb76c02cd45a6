//! In-memory post repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::post::{NewPost, Post, PostChanges, PostId, PostRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct PostTable {
    rows: BTreeMap<PostId, Post>,
    last_id: u64,
}

impl PostTable {
    fn check_title(&self, title: &str, exclude: Option<PostId>) -> Result<(), DomainError> {
        let taken = self
            .rows
            .values()
            .any(|post| Some(post.id()) != exclude && post.title() == title);

        if taken {
            return Err(DomainError::conflict(format!("Title '{}' already taken", title)));
        }
        Ok(())
    }

    fn owned_mut(&mut self, id: PostId, author_id: UserId) -> Option<&mut Post> {
        self.rows
            .get_mut(&id)
            .filter(|post| post.author_id() == author_id)
    }
}

/// In-memory implementation of PostRepository
///
/// Author references are not checked here; the post service resolves the
/// author before inserting.
#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    table: Arc<RwLock<PostTable>>,
}

impl InMemoryPostRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: NewPost) -> Result<Post, DomainError> {
        let mut table = self.table.write().await;

        table.check_title(&post.title, None)?;

        let next = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| DomainError::storage("Post ID space exhausted"))?;
        let id = PostId::new(next).map_err(|e| DomainError::storage(e.to_string()))?;

        let stored = Post::restore(
            id,
            post.title,
            post.content,
            post.author_id,
            post.created_at,
            post.updated_at,
        );

        table.last_id = next;
        table.rows.insert(id, stored.clone());

        Ok(stored)
    }

    async fn find_all(&self, limit: usize) -> Result<Vec<Post>, DomainError> {
        let table = self.table.read().await;
        Ok(table.rows.values().take(limit).cloned().collect())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, DomainError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn update_owned(
        &self,
        id: PostId,
        author_id: UserId,
        changes: PostChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let mut table = self.table.write().await;

        if table.owned_mut(id, author_id).is_none() {
            return Ok(0);
        }

        table.check_title(&changes.title, Some(id))?;

        match table.owned_mut(id, author_id) {
            Some(post) => {
                post.apply(&changes, updated_at);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_owned(&self, id: PostId, author_id: UserId) -> Result<u64, DomainError> {
        let mut table = self.table.write().await;

        if table.owned_mut(id, author_id).is_none() {
            return Ok(0);
        }

        Ok(u64::from(table.rows.remove(&id).is_some()))
    }

    async fn delete_by_author(&self, author_id: UserId) -> Result<u64, DomainError> {
        let mut table = self.table.write().await;

        let before = table.rows.len();
        table.rows.retain(|_, post| post.author_id() != author_id);

        Ok((before - table.rows.len()) as u64)
    }
}
