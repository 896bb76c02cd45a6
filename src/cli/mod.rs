//! CLI module for the blog API
//!
//! - `serve`: run the HTTP server
//! - `migrate`: apply (or revert) the PostgreSQL schema

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Blog API - users, posts and token-gated writes
#[derive(Parser)]
#[command(name = "blog-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Apply pending migrations to the configured PostgreSQL database
    Migrate(migrate::MigrateArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["blog-api", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));
    }

    #[test]
    fn test_parse_migrate_revert() {
        let cli = Cli::try_parse_from(["blog-api", "migrate", "--revert"]).unwrap();

        match cli.command {
            Command::Migrate(args) => assert!(args.revert),
            _ => panic!("expected migrate"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["blog-api"]).is_err());
    }
}
