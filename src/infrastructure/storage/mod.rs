//! Storage infrastructure - backend selection, pooling and schema

mod factory;
pub mod migrations;
mod postgres;

pub use factory::{StorageConfig, StorageType};
pub use migrations::{revert_latest_migration, run_storage_migrations, PostgresMigrator};
pub use postgres::{connect_pool, PostgresConfig};

use crate::domain::DomainError;

/// Convert a listing limit into a bind parameter
pub(crate) fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// Map a failed write into a domain error
///
/// Unique violations become conflicts and broken author references become
/// validation errors; everything else is a storage failure.
pub(crate) fn map_write_error(error: sqlx::Error, context: &str) -> DomainError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() {
            return conflict_for_constraint(db.constraint());
        }
        if db.is_foreign_key_violation() {
            return DomainError::validation("author not found");
        }
    }

    DomainError::storage(format!("Failed to {}: {}", context, error))
}

fn conflict_for_constraint(constraint: Option<&str>) -> DomainError {
    let field = match constraint {
        Some(name) if name.contains("nickname") => "Nickname",
        Some(name) if name.contains("email") => "Email",
        Some(name) if name.contains("title") => "Title",
        _ => "Value",
    };

    DomainError::conflict(format!("{} already taken", field))
}
