//! Blog API
//!
//! Users and posts behind a small JSON API:
//! - Argon2id password hashing
//! - Field validation and HTML-escaping of untrusted input
//! - In-memory or PostgreSQL storage
//! - Bearer token gate in front of every mutating endpoint

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::post::PostRepository;
use domain::user::UserRepository;
use infrastructure::{
    auth::{JwtVerifier, TokenVerifier},
    post::{InMemoryPostRepository, PostService, PostgresPostRepository},
    storage::{connect_pool, run_storage_migrations, PostgresConfig, StorageConfig, StorageType},
    user::{Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService},
};
use tracing::info;

/// Create the application state from configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    if config.auth.secret.is_empty() {
        anyhow::bail!("auth.secret must be set (APP__AUTH__SECRET)");
    }

    let verifier: Arc<dyn TokenVerifier> = Arc::new(JwtVerifier::new(&config.auth.secret));
    let hasher = Arc::new(Argon2Hasher::new());

    let storage = storage_config(config)?;
    info!(backend = ?storage.storage_type(), "Storage backend selected");

    let state = match storage {
        StorageConfig::InMemory => build_state(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
            hasher,
            verifier,
        ),
        StorageConfig::Postgres(pg_config) => {
            let pool = connect_pool(&pg_config).await?;
            run_storage_migrations(&pool).await?;

            build_state(
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresPostRepository::new(pool)),
                hasher,
                verifier,
            )
        }
    };

    Ok(state)
}

/// Resolve the storage section into a backend configuration
pub fn storage_config(config: &AppConfig) -> anyhow::Result<StorageConfig> {
    let settings = &config.storage;

    let storage = match settings.backend.parse::<StorageType>()? {
        StorageType::InMemory => StorageConfig::in_memory(),
        StorageType::Postgres => StorageConfig::Postgres(
            PostgresConfig::new(&settings.url)
                .with_max_connections(settings.max_connections)
                .with_min_connections(settings.min_connections)
                .with_connect_timeout(settings.connect_timeout_secs),
        ),
    };

    Ok(storage)
}

/// Wire services over the given repositories
///
/// The post service resolves authors through the same user service the API
/// uses.
pub fn build_state<U, P>(
    user_repository: Arc<U>,
    post_repository: Arc<P>,
    hasher: Arc<Argon2Hasher>,
    verifier: Arc<dyn TokenVerifier>,
) -> AppState
where
    U: UserRepository + 'static,
    P: PostRepository + 'static,
{
    let user_service = Arc::new(UserService::new(user_repository, hasher));
    let post_service = Arc::new(PostService::new(post_repository, user_service.clone()));

    AppState {
        user_service,
        post_service,
        token_verifier: verifier,
    }
}
