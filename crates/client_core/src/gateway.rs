use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::{SearchResultItem, Translation},
    error::ApiError,
    fhir::Bundle,
    protocol::{SearchQuery, SearchResponse, SubmitResponse, TranslateQuery},
};
use tracing::{debug, info, warn};

use crate::error::{GatewayError, SUBMIT_FALLBACK_DETAIL};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub source: Vec<SearchResultItem>,
    pub target: Vec<SearchResultItem>,
}

impl From<SearchResponse> for SearchResults {
    fn from(value: SearchResponse) -> Self {
        Self {
            source: value.namaste_ayush_results,
            target: value.icd11_biomedical_results,
        }
    }
}

/// The three backend round trips the workflow depends on. Implementations hold no state
/// between calls and never retry.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResults, GatewayError>;
    /// `None` on any failure; the caller cannot proceed with the selection.
    async fn translate(&self, code: &str) -> Option<Translation>;
    async fn submit(&self, bundle: &Bundle) -> Result<SubmitResponse, GatewayError>;
}

pub struct HttpGateway {
    http: Client,
    base_url: String,
    bearer_token: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            bearer_token: bearer_token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn try_translate(&self, code: &str) -> Result<Translation, GatewayError> {
        let res = self
            .http
            .get(format!("{}/api/translate", self.base_url))
            .query(&TranslateQuery {
                code: code.to_string(),
            })
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(GatewayError::BadResponse {
                status: res.status().as_u16(),
            });
        }
        Ok(res.json().await?)
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn search(&self, query: &str) -> Result<SearchResults, GatewayError> {
        debug!(query, "gateway: search");
        let res = self
            .http
            .get(format!("{}/api/search", self.base_url))
            .query(&SearchQuery {
                query: query.to_string(),
            })
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(GatewayError::BadResponse {
                status: res.status().as_u16(),
            });
        }
        let body: SearchResponse = res.json().await?;
        Ok(body.into())
    }

    async fn translate(&self, code: &str) -> Option<Translation> {
        debug!(code, "gateway: translate");
        match self.try_translate(code).await {
            Ok(translation) => Some(translation),
            Err(err) => {
                warn!(code, error = %err, "gateway: translate failed");
                None
            }
        }
    }

    async fn submit(&self, bundle: &Bundle) -> Result<SubmitResponse, GatewayError> {
        let res = self
            .http
            .post(format!("{}/api/bundle", self.base_url))
            .bearer_auth(&self.bearer_token)
            .json(bundle)
            .send()
            .await?;

        let status = res.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("gateway: bundle submission rejected credential");
            return Err(GatewayError::Auth);
        }
        if !status.is_success() {
            let body: ApiError = res.json().await.unwrap_or_default();
            return Err(GatewayError::Submit {
                status: status.as_u16(),
                detail: body.detail_or(SUBMIT_FALLBACK_DETAIL),
            });
        }

        let body: SubmitResponse = res.json().await?;
        info!(status = status.as_u16(), "gateway: bundle accepted");
        Ok(body)
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
