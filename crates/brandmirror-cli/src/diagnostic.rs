//! Mirror diagnostic commands.
//!
//! Every command prints the resulting diagnostic as pretty JSON on stdout.

use brandmirror_core::{AppConfig, MirrorDiagnostic};
use brandmirror_diagnostic::DiagnosticOrchestrator;
use clap::Subcommand;

use crate::require_brand;

/// Sub-commands available under `diagnostic`.
#[derive(Debug, Subcommand)]
pub enum DiagnosticCommands {
    /// Run the three sub-analyses and store the result
    Run {
        /// Brand slug
        #[arg(long)]
        brand: String,
    },
    /// Re-run the diagnostic, overwriting the stored one
    Refresh {
        /// Brand slug
        #[arg(long)]
        brand: String,
    },
    /// Print the stored diagnostic
    Show {
        /// Brand slug
        #[arg(long)]
        brand: String,
    },
    /// Attach a UVP delivery analysis to the stored diagnostic
    EnhanceUvp {
        /// Brand slug
        #[arg(long)]
        brand: String,
    },
}

pub(crate) async fn run(
    config: &AppConfig,
    pool: sqlx::PgPool,
    command: DiagnosticCommands,
) -> anyhow::Result<()> {
    let orchestrator = DiagnosticOrchestrator::from_config(config, pool.clone())?;

    let diagnostic = match command {
        DiagnosticCommands::Run { brand } => {
            let row = require_brand(&pool, &brand).await?;
            Some(
                orchestrator
                    .run_full_diagnostic(row.id, &row.brand_data())
                    .await?,
            )
        }
        DiagnosticCommands::Refresh { brand } => {
            let row = require_brand(&pool, &brand).await?;
            Some(
                orchestrator
                    .refresh_diagnostic(row.id, &row.brand_data())
                    .await?,
            )
        }
        DiagnosticCommands::Show { brand } => {
            let row = require_brand(&pool, &brand).await?;
            let found = orchestrator.load_latest_diagnostic(row.id).await?;
            if found.is_none() {
                println!("brand '{brand}' has no diagnostic yet; run `diagnostic run` first");
            }
            found
        }
        DiagnosticCommands::EnhanceUvp { brand } => {
            let row = require_brand(&pool, &brand).await?;
            let found = orchestrator.enhance_with_uvp(row.id).await?;
            if found.is_none() {
                anyhow::bail!(
                    "brand '{brand}' has no diagnostic to enhance; run `diagnostic run` first"
                );
            }
            found
        }
    };

    if let Some(diagnostic) = diagnostic {
        print_diagnostic(&diagnostic)?;
    }
    Ok(())
}

fn print_diagnostic(diagnostic: &MirrorDiagnostic) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(diagnostic)?);
    Ok(())
}
