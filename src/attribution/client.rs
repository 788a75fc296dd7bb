use super::MetricsResponse;
use crate::error::AttributionError;
use async_trait::async_trait;
use md5::{Digest, Md5};
use reqwest::Client;
use std::time::Duration;

/// Lowercase MD5 hex digest over `salt:bundle_id`, sent as the `t` query
/// parameter so the metrics endpoint can reject unsalted callers.
pub fn request_token(salt: &str, bundle_id: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(bundle_id.as_bytes());
    hex::encode(hasher.finalize())
}

/// The single attribution call. One request, no retries; every failure is
/// reported distinctly and the caller degrades to the plain app.
#[async_trait]
pub trait MetricsClient: Send + Sync {
    async fn fetch_metrics(&self, bundle_id: &str) -> Result<MetricsResponse, AttributionError>;
}

pub struct HttpMetricsClient {
    client: Client,
    base_url: String,
    salt: String,
}

impl HttpMetricsClient {
    pub fn new(base_url: &str, salt: &str, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
            salt: salt.to_string(),
        }
    }
}

#[async_trait]
impl MetricsClient for HttpMetricsClient {
    async fn fetch_metrics(&self, bundle_id: &str) -> Result<MetricsResponse, AttributionError> {
        let token = request_token(&self.salt, bundle_id);
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("b", bundle_id), ("t", token.as_str())])
            .send()
            .await
            .map_err(|e| AttributionError::Network(e.to_string()))?
            .error_for_status()
            .map_err(|e| AttributionError::Network(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| AttributionError::Network(e.to_string()))?;
        MetricsResponse::parse(&body)
    }
}
