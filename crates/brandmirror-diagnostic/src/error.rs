use thiserror::Error;

/// Why a single sub-analyzer call produced no result.
///
/// These never leave the orchestrator; every variant is replaced by the
/// analyzer's fallback payload.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{analyzer} returned HTTP {status}")]
    UnexpectedStatus {
        analyzer: &'static str,
        status: u16,
    },

    #[error("no endpoint configured for {0}")]
    NotConfigured(&'static str),

    #[error("could not decode {analyzer} response: {source}")]
    Decode {
        analyzer: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{analyzer} did not answer within {timeout_secs}s")]
    Timeout {
        analyzer: &'static str,
        timeout_secs: u64,
    },
}

/// Errors surfaced by [`crate::DiagnosticOrchestrator`].
#[derive(Debug, Error)]
pub enum DiagnosticError {
    /// The computed diagnostic could not be written. Fatal for the run.
    #[error("failed to persist diagnostic for brand {brand_id}: {source}")]
    Persistence {
        brand_id: i64,
        #[source]
        source: StoreError,
    },

    /// A read or non-run update against the diagnostic store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure inside a [`crate::DiagnosticStore`] or [`crate::StrategyStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] brandmirror_db::DbError),

    /// Used by non-Postgres stores.
    #[error("{0}")]
    Backend(String),
}
