//! Mirror diagnostic orchestration.
//!
//! [`DiagnosticOrchestrator`] consults three [`SubAnalyzer`]s concurrently,
//! replaces any failed or slow result with a neutral fallback, derives the
//! critical gaps and writes one [`brandmirror_core::MirrorDiagnostic`] per
//! brand through a [`DiagnosticStore`].

pub mod analyzer;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod store;
pub mod uvp;

pub use analyzer::SubAnalyzer;
pub use error::{AnalyzerError, DiagnosticError, StoreError};
pub use http::HttpSubAnalyzer;
pub use orchestrator::{Analyzers, DiagnosticOrchestrator};
pub use store::{DiagnosticStore, PgDiagnosticStore, PgStrategyStore, StrategyStore};
pub use uvp::neutral_delivery_analysis;
