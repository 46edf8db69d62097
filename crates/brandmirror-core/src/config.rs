use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_ANALYZER_USER_AGENT: &str = "brandmirror/0.1 (diagnostics)";
const DEFAULT_REFRESH_CRON: &str = "0 0 3 * * SUN";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Parse and validate configuration through an arbitrary env-var lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as unset so `.env` templates can leave endpoints empty.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("BRANDMIRROR_ENV", "development"))?;
    let bind_addr = parse_addr("BRANDMIRROR_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("BRANDMIRROR_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("BRANDMIRROR_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("BRANDMIRROR_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("BRANDMIRROR_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let analyzer_timeout_secs = parse_u64("BRANDMIRROR_ANALYZER_TIMEOUT_SECS", "60")?;
    if analyzer_timeout_secs == 0 {
        return Err(invalid(
            "BRANDMIRROR_ANALYZER_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let analyzer_user_agent = or_default(
        "BRANDMIRROR_ANALYZER_USER_AGENT",
        DEFAULT_ANALYZER_USER_AGENT,
    );

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        analyzer_timeout_secs,
        analyzer_user_agent,
        market_position_url: optional("BRANDMIRROR_MARKET_POSITION_URL"),
        customer_truth_url: optional("BRANDMIRROR_CUSTOMER_TRUTH_URL"),
        brand_fit_url: optional("BRANDMIRROR_BRAND_FIT_URL"),
        refresh_cron: or_default("BRANDMIRROR_REFRESH_CRON", DEFAULT_REFRESH_CRON),
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "BRANDMIRROR_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
