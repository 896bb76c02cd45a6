//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::user::{NewUser, User, UserChanges, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::{limit_param, map_write_error};

const USER_COLUMNS: &str = "id, nickname, email, password_hash, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (nickname, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.nickname)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "create user"))?;

        row_to_user(&row)
    }

    async fn find_all(&self, limit: usize) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM users ORDER BY id LIMIT $1",
            USER_COLUMNS
        ))
        .bind(limit_param(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        let mut users = Vec::with_capacity(rows.len());

        for row in rows {
            users.push(row_to_user(&row)?);
        }

        Ok(users)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(i64::from(id.value()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET nickname = COALESCE($2, nickname),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(i64::from(id.value()))
        .bind(changes.nickname)
        .bind(changes.email)
        .bind(changes.password_hash)
        .bind(changes.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "update user"))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: UserId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(i64::from(id.value()))
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected())
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: i64 = row.get("id");
    let user_id = u32::try_from(id)
        .ok()
        .and_then(|raw| UserId::new(raw).ok())
        .ok_or_else(|| DomainError::storage(format!("Invalid user ID in database: {}", id)))?;

    Ok(User::restore(
        user_id,
        row.get::<String, _>("nickname"),
        row.get::<String, _>("email"),
        row.get::<String, _>("password_hash"),
        row.get("created_at"),
        row.get("updated_at"),
    ))
}
