//! Post infrastructure module
//!
//! In-memory and PostgreSQL post repositories and the post service.

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresPostRepository;
pub use repository::InMemoryPostRepository;
pub use service::{PostService, DEFAULT_LIST_LIMIT};
