mod brand;
mod db;
mod diagnostic;
mod score;
mod strategy;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::{
    brand::BrandCommands, db::DbCommands, diagnostic::DiagnosticCommands,
    strategy::StrategyCommands,
};

#[derive(Debug, Parser)]
#[command(name = "brandmirror-cli")]
#[command(about = "BrandMirror command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database connectivity and migrations
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Register and list brands
    Brand {
        #[command(subcommand)]
        command: BrandCommands,
    },
    /// Record strategy milestones (UVP, buyer journey)
    Strategy {
        #[command(subcommand)]
        command: StrategyCommands,
    },
    /// Run, refresh, and inspect mirror diagnostics
    Diagnostic {
        #[command(subcommand)]
        command: DiagnosticCommands,
    },
    /// Compute a brand health score from an analysis file without touching the database
    Score {
        /// Path to a JSON-encoded complete brand analysis
        analysis: PathBuf,
        /// Optional JSON array of earlier `{score, calculated_at}` snapshots
        #[arg(long)]
        history: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("brandmirror-cli ready; run with --help for commands");
        return Ok(());
    };

    match command {
        Commands::Score { analysis, history } => score::run_score(&analysis, history.as_deref()),
        Commands::Db { command } => {
            let (_, pool) = connect().await?;
            db::run(&pool, command).await
        }
        Commands::Brand { command } => {
            let (_, pool) = connect().await?;
            brand::run(&pool, command).await
        }
        Commands::Strategy { command } => {
            let (_, pool) = connect().await?;
            strategy::run(&pool, command).await
        }
        Commands::Diagnostic { command } => {
            let (config, pool) = connect().await?;
            diagnostic::run(&config, pool, command).await
        }
    }
}

async fn connect() -> anyhow::Result<(brandmirror_core::AppConfig, sqlx::PgPool)> {
    let config = brandmirror_core::load_app_config()?;
    let pool_config = brandmirror_db::PoolConfig::from_app_config(&config);
    let pool = brandmirror_db::connect_pool(&config.database_url, pool_config).await?;
    Ok((config, pool))
}

/// Resolve a brand slug, failing with a readable error when it is unknown.
pub(crate) async fn require_brand(
    pool: &sqlx::PgPool,
    slug: &str,
) -> anyhow::Result<brandmirror_db::BrandRow> {
    brandmirror_db::get_brand_by_slug(pool, slug)
        .await?
        .ok_or_else(|| anyhow::anyhow!("brand '{slug}' not found; register it with `brand add`"))
}
