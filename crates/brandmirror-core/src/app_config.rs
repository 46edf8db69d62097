use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Upper bound on a single sub-analyzer call before its fallback is used.
    pub analyzer_timeout_secs: u64,
    pub analyzer_user_agent: String,
    pub market_position_url: Option<String>,
    pub customer_truth_url: Option<String>,
    pub brand_fit_url: Option<String>,
    pub refresh_cron: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("analyzer_timeout_secs", &self.analyzer_timeout_secs)
            .field("analyzer_user_agent", &self.analyzer_user_agent)
            .field("market_position_url", &self.market_position_url)
            .field("customer_truth_url", &self.customer_truth_url)
            .field("brand_fit_url", &self.brand_fit_url)
            .field("refresh_cron", &self.refresh_cron)
            .finish()
    }
}
