mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use brandmirror_diagnostic::DiagnosticOrchestrator;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(brandmirror_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::info!(config = ?config, "starting brandmirror-server");

    let pool_config = brandmirror_db::PoolConfig::from_app_config(&config);
    let pool = brandmirror_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = brandmirror_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let orchestrator = DiagnosticOrchestrator::from_config(&config, pool.clone())?;
    let state = AppState { pool, orchestrator };

    let _scheduler = scheduler::build_scheduler(state.clone(), &config.refresh_cron).await?;

    let auth = AuthState::from_env(matches!(
        config.env,
        brandmirror_core::Environment::Development
    ))?;
    let app = build_app(state, auth);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
