use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

pub(crate) async fn run(pool: &sqlx::PgPool, command: DbCommands) -> anyhow::Result<()> {
    match command {
        DbCommands::Ping => {
            brandmirror_db::ping(pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = brandmirror_db::run_migrations(pool).await?;
            tracing::info!(applied, "migrations complete");
            println!("migrations up to date ({applied} applied)");
        }
    }
    Ok(())
}
