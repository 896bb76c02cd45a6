//! Migrate command - manages the PostgreSQL schema

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::storage::{
    connect_pool, revert_latest_migration, run_storage_migrations, PostgresMigrator, StorageConfig,
};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Revert the most recently applied migration instead
    #[arg(long)]
    pub revert: bool,
}

/// Run the migrate command
pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let StorageConfig::Postgres(pg_config) = crate::storage_config(&config)? else {
        anyhow::bail!("migrate needs storage.backend = postgres");
    };

    let pool = connect_pool(&pg_config).await?;

    if args.revert {
        match revert_latest_migration(&pool).await? {
            Some(version) => info!(version, "Reverted migration"),
            None => info!("No migration to revert"),
        }
    } else {
        run_storage_migrations(&pool).await?;
    }

    let version = PostgresMigrator::new(pool).current_version().await?;
    info!(version = ?version, "Schema version");

    Ok(())
}
