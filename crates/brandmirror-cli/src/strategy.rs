//! Strategy milestone commands.
//!
//! The diagnostic only reads these as booleans, so the CLI is the simplest
//! way to flip them while the strategy tooling lives elsewhere.

use clap::Subcommand;

use crate::require_brand;

/// Sub-commands available under `strategy`.
#[derive(Debug, Subcommand)]
pub enum StrategyCommands {
    /// Record the brand's unique value proposition
    Uvp {
        /// Brand slug
        #[arg(long)]
        brand: String,
        #[arg(long)]
        statement: String,
        /// Save the statement without marking it complete
        #[arg(long)]
        draft: bool,
    },
    /// Mark the brand's buyer journey as complete
    BuyerJourney {
        /// Brand slug
        #[arg(long)]
        brand: String,
    },
}

pub(crate) async fn run(pool: &sqlx::PgPool, command: StrategyCommands) -> anyhow::Result<()> {
    match command {
        StrategyCommands::Uvp {
            brand,
            statement,
            draft,
        } => {
            let statement = statement.trim();
            if statement.is_empty() {
                anyhow::bail!("--statement must not be blank");
            }
            let row = require_brand(pool, &brand).await?;
            let saved =
                brandmirror_db::upsert_value_proposition(pool, row.id, statement, !draft).await?;
            let state = if saved.is_complete { "complete" } else { "draft" };
            println!("value proposition for '{brand}' saved ({state})");
        }
        StrategyCommands::BuyerJourney { brand } => {
            let row = require_brand(pool, &brand).await?;
            brandmirror_db::complete_buyer_journey(pool, row.id).await?;
            println!("buyer journey for '{brand}' marked complete");
        }
    }
    Ok(())
}
