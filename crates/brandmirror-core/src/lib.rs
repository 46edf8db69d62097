pub mod analysis;
pub mod app_config;
pub mod brand;
pub mod config;
pub mod diagnostic;

use thiserror::Error;

pub use analysis::{
    BrandFitData, CompetitorSnapshot, CustomerTruthData, MarketPositionData, SubAnalysisResult,
    FALLBACK_SCORE,
};
pub use app_config::{AppConfig, Environment};
pub use brand::BrandData;
pub use config::{load_app_config, load_app_config_from_env};
pub use diagnostic::{
    overall_health_score, CriticalGap, MirrorDiagnostic, MirrorDiagnosticDraft, UvpDeliveryAnalysis,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
