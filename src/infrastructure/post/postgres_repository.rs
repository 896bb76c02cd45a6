//! PostgreSQL post repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::post::{NewPost, Post, PostChanges, PostId, PostRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::{limit_param, map_write_error};

const POST_COLUMNS: &str = "id, title, content, author_id, created_at, updated_at";

/// PostgreSQL implementation of PostRepository
#[derive(Debug, Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, post: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO posts (title, content, author_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            POST_COLUMNS
        ))
        .bind(&post.title)
        .bind(&post.content)
        .bind(i64::from(post.author_id.value()))
        .bind(post.created_at)
        .bind(post.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "create post"))?;

        row_to_post(&row)
    }

    async fn find_all(&self, limit: usize) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM posts ORDER BY id LIMIT $1",
            POST_COLUMNS
        ))
        .bind(limit_param(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list posts: {}", e)))?;

        rows.iter().map(row_to_post).collect()
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS))
            .bind(post_id_param(id)?)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get post: {}", e)))?;

        row.as_ref().map(row_to_post).transpose()
    }

    async fn update_owned(
        &self,
        id: PostId,
        author_id: UserId,
        changes: PostChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = $3, content = $4, updated_at = $5
            WHERE id = $1 AND author_id = $2
            "#,
        )
        .bind(post_id_param(id)?)
        .bind(i64::from(author_id.value()))
        .bind(changes.title)
        .bind(changes.content)
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "update post"))?;

        Ok(result.rows_affected())
    }

    async fn delete_owned(&self, id: PostId, author_id: UserId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND author_id = $2")
            .bind(post_id_param(id)?)
            .bind(i64::from(author_id.value()))
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete post: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn delete_by_author(&self, author_id: UserId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM posts WHERE author_id = $1")
            .bind(i64::from(author_id.value()))
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete posts by author: {}", e)))?;

        Ok(result.rows_affected())
    }
}

fn post_id_param(id: PostId) -> Result<i64, DomainError> {
    i64::try_from(id.value())
        .map_err(|_| DomainError::not_found(format!("Post {} not found", id)))
}

fn row_to_post(row: &sqlx::postgres::PgRow) -> Result<Post, DomainError> {
    let id: i64 = row.get("id");
    let post_id = u64::try_from(id)
        .ok()
        .and_then(|raw| PostId::new(raw).ok())
        .ok_or_else(|| DomainError::storage(format!("Invalid post ID in database: {}", id)))?;

    let author: i64 = row.get("author_id");
    let author_id = u32::try_from(author)
        .ok()
        .and_then(|raw| UserId::new(raw).ok())
        .ok_or_else(|| DomainError::storage(format!("Invalid author ID in database: {}", author)))?;

    Ok(Post::restore(
        post_id,
        row.get::<String, _>("title"),
        row.get::<String, _>("content"),
        author_id,
        row.get("created_at"),
        row.get("updated_at"),
    ))
}
