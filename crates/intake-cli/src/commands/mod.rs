//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use intake_core::config::IntakeConfig;
use intake_core::store::RedisStore;
use intake_redis::RedisPool;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod catalog;
pub mod config;
pub mod portal;
pub mod questionnaire;

/// Intake - client portal and intake questionnaire
#[derive(Parser)]
#[command(name = "intake")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory (defaults to current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage client portal access
    #[command(subcommand)]
    Portal(portal::PortalCommands),

    /// Print the intake questionnaire sections and questions
    Catalog,

    /// Fill in and review intake questionnaires
    #[command(subcommand)]
    Questionnaire(questionnaire::QuestionnaireCommands),

    /// Show the resolved configuration
    Config,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let project_dir = match self.project {
            Some(dir) => dir,
            None => std::env::current_dir().context("Failed to resolve current directory")?,
        };

        match self.command {
            Commands::Portal(cmd) => portal::execute(cmd, &project_dir).await,
            Commands::Catalog => catalog::execute(),
            Commands::Questionnaire(cmd) => questionnaire::execute(cmd, &project_dir).await,
            Commands::Config => config::execute(&project_dir),
        }
    }
}

/// Load the project config and connect to Redis.
pub(crate) async fn connect(project_dir: &Path) -> Result<(IntakeConfig, RedisPool)> {
    let config = IntakeConfig::load(project_dir)?;
    debug!(project = %project_dir.display(), redis_url = %config.redis_url, "Loaded configuration");
    let pool = intake_redis::init_pool(&config.redis_url)
        .await
        .with_context(|| format!("Failed to connect to Redis at {}", config.redis_url))?;
    Ok((config, pool))
}

pub(crate) async fn connect_store(project_dir: &Path) -> Result<(IntakeConfig, RedisStore)> {
    let (config, pool) = connect(project_dir).await?;
    Ok((config, RedisStore::new(pool)))
}
