//! Post service: ownership-checked persistence with author enrichment

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::domain::post::{
    AuthorResolver, NewPost, Post, PostChanges, PostId, PostInput, PostRepository, PostWithAuthor,
};
use crate::domain::user::{User, UserId};
use crate::domain::DomainError;

/// Maximum number of posts returned by a single listing
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Post service
///
/// Authors are looked up through the resolver on every read, so responses
/// always carry the current user record.
#[derive(Debug)]
pub struct PostService<P: PostRepository, A: AuthorResolver> {
    repository: Arc<P>,
    authors: Arc<A>,
}

impl<P: PostRepository, A: AuthorResolver> PostService<P, A> {
    /// Create a new post service
    pub fn new(repository: Arc<P>, authors: Arc<A>) -> Self {
        Self {
            repository,
            authors,
        }
    }

    /// Persist a new post after confirming its author exists
    pub async fn create(&self, input: PostInput) -> Result<PostWithAuthor, DomainError> {
        let author_id = UserId::new(input.author_id)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let author = match self.authors.resolve_author(author_id).await {
            Ok(author) => author,
            Err(e) if e.is_not_found() => {
                return Err(DomainError::validation("author not found"));
            }
            Err(e) => return Err(e),
        };

        debug!(author_id = %author_id, "Creating post");

        let post = self
            .repository
            .insert(NewPost {
                title: input.title,
                content: input.content,
                author_id,
                created_at: input.created_at,
                updated_at: input.updated_at,
            })
            .await?;

        // The author may have been deleted between the lookup and the insert.
        // Deleting a user removes the user before its posts, so a second
        // lookup after the insert sees every such delete.
        if let Err(e) = self.authors.resolve_author(author_id).await {
            if !e.is_not_found() {
                return Err(e);
            }
            debug!(post_id = %post.id(), author_id = %author_id, "Author vanished during create");
            self.repository.delete_owned(post.id(), author_id).await?;
            return Err(DomainError::validation("author not found"));
        }

        debug!(post_id = %post.id(), "Post created");
        Ok(post.with_author(author))
    }

    /// List up to `limit` posts with their authors
    ///
    /// Fails as a whole if any author cannot be resolved.
    pub async fn find_all(&self, limit: usize) -> Result<Vec<PostWithAuthor>, DomainError> {
        let posts = self.repository.find_all(limit).await?;

        let mut authors: HashMap<UserId, User> = HashMap::new();
        let mut enriched = Vec::with_capacity(posts.len());

        for post in posts {
            let author = match authors.get(&post.author_id()) {
                Some(author) => author.clone(),
                None => {
                    let author = self.author_of(&post).await?;
                    authors.insert(post.author_id(), author.clone());
                    author
                }
            };
            enriched.push(post.with_author(author));
        }

        Ok(enriched)
    }

    /// Get a post by ID
    pub async fn find_by_id(&self, id: PostId) -> Result<PostWithAuthor, DomainError> {
        let post = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Post {} not found", id)))?;

        let author = self.author_of(&post).await?;
        Ok(post.with_author(author))
    }

    /// Change title and content of a post owned by `caller`
    pub async fn update(
        &self,
        id: PostId,
        caller: UserId,
        changes: PostChanges,
    ) -> Result<PostWithAuthor, DomainError> {
        debug!(post_id = %id, caller = %caller, "Updating post");

        let rows = self
            .repository
            .update_owned(id, caller, changes, Utc::now())
            .await?;

        if rows == 0 {
            return Err(DomainError::not_found(format!("Post {} not found", id)));
        }

        self.find_by_id(id).await
    }

    /// Delete a post owned by `caller`
    ///
    /// A post that does not exist and a post owned by someone else are
    /// reported the same way.
    pub async fn delete(&self, id: PostId, caller: UserId) -> Result<u64, DomainError> {
        debug!(post_id = %id, caller = %caller, "Deleting post");

        let rows = self.repository.delete_owned(id, caller).await?;

        if rows == 0 {
            return Err(DomainError::not_found(format!("Post {} not found", id)));
        }

        Ok(rows)
    }

    /// Remove every post written by `author`
    pub async fn delete_by_author(&self, author: UserId) -> Result<u64, DomainError> {
        let rows = self.repository.delete_by_author(author).await?;
        debug!(author_id = %author, rows, "Deleted posts by author");
        Ok(rows)
    }

    async fn author_of(&self, post: &Post) -> Result<User, DomainError> {
        self.authors
            .resolve_author(post.author_id())
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    DomainError::internal(format!(
                        "Post {} references missing author {}",
                        post.id(),
                        post.author_id()
                    ))
                } else {
                    e
                }
            })
    }
}
