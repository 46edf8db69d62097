//! HTTP-backed sub-analyzer.
//!
//! Each analyzer is a remote service that accepts `POST {brand_id, brand}` and
//! answers `{score, data}`. The payload type is fixed per instance.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use brandmirror_core::{
    AppConfig, BrandData, BrandFitData, CustomerTruthData, MarketPositionData, SubAnalysisResult,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::analyzer::SubAnalyzer;
use crate::error::AnalyzerError;

pub const MARKET_POSITION: &str = "market_position";
pub const CUSTOMER_TRUTH: &str = "customer_truth";
pub const BRAND_FIT: &str = "brand_fit";

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    brand_id: i64,
    brand: &'a BrandData,
}

/// Client for one remote analyzer endpoint.
///
/// An instance without an endpoint is valid and fails every call with
/// [`AnalyzerError::NotConfigured`], which the orchestrator turns into a
/// fallback.
pub struct HttpSubAnalyzer<T> {
    name: &'static str,
    endpoint: Option<String>,
    client: Client,
    _payload: PhantomData<fn() -> T>,
}

impl<T> HttpSubAnalyzer<T> {
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        name: &'static str,
        endpoint: Option<String>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, AnalyzerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            name,
            endpoint,
            client,
            _payload: PhantomData,
        })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }
}

impl HttpSubAnalyzer<MarketPositionData> {
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Http`] if the client cannot be built.
    pub fn market_position(config: &AppConfig) -> Result<Self, AnalyzerError> {
        Self::new(
            MARKET_POSITION,
            config.market_position_url.clone(),
            config.analyzer_timeout_secs,
            &config.analyzer_user_agent,
        )
    }
}

impl HttpSubAnalyzer<CustomerTruthData> {
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Http`] if the client cannot be built.
    pub fn customer_truth(config: &AppConfig) -> Result<Self, AnalyzerError> {
        Self::new(
            CUSTOMER_TRUTH,
            config.customer_truth_url.clone(),
            config.analyzer_timeout_secs,
            &config.analyzer_user_agent,
        )
    }
}

impl HttpSubAnalyzer<BrandFitData> {
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Http`] if the client cannot be built.
    pub fn brand_fit(config: &AppConfig) -> Result<Self, AnalyzerError> {
        Self::new(
            BRAND_FIT,
            config.brand_fit_url.clone(),
            config.analyzer_timeout_secs,
            &config.analyzer_user_agent,
        )
    }
}

#[async_trait]
impl<T> SubAnalyzer for HttpSubAnalyzer<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Data = T;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn analyze(
        &self,
        brand_id: i64,
        brand: &BrandData,
    ) -> Result<SubAnalysisResult<T>, AnalyzerError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(AnalyzerError::NotConfigured(self.name))?;

        let response = self
            .client
            .post(endpoint)
            .json(&AnalyzeRequest { brand_id, brand })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalyzerError::UnexpectedStatus {
                analyzer: self.name,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| AnalyzerError::Decode {
            analyzer: self.name,
            source,
        })
    }
}
