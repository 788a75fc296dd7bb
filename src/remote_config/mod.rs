//! Remote feature flag.
//!
//! One boolean, fetched once per cold start from a flat JSON document. What
//! happens when the fetch fails is the coordinator's business (persisted
//! value, else fail-open); this module only reports distinct failures.

use crate::error::RemoteConfigError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

#[async_trait]
pub trait FlagSource: Send + Sync {
    async fn fetch_flag(&self, key: &str) -> Result<bool, RemoteConfigError>;
}

/// Fetches `GET <endpoint>` and reads a boolean at the given key.
pub struct HttpFlagSource {
    client: Client,
    endpoint: String,
}

impl HttpFlagSource {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl FlagSource for HttpFlagSource {
    async fn fetch_flag(&self, key: &str) -> Result<bool, RemoteConfigError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| RemoteConfigError::Unreachable(e.to_string()))?
            .error_for_status()
            .map_err(|e| RemoteConfigError::Unreachable(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| RemoteConfigError::MalformedBody(e.to_string()))?;

        body.get(key)
            .and_then(Value::as_bool)
            .ok_or_else(|| RemoteConfigError::MissingKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn flag_server(body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/app/config"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn reads_boolean_at_key() {
        let server = flag_server(json!({"chick": true, "other": 3})).await;
        let source = HttpFlagSource::new(&format!("{}/app/config", server.uri()), 5);
        assert!(source.fetch_flag("chick").await.expect("flag"));
    }

    #[tokio::test]
    async fn reads_false_flag() {
        let server = flag_server(json!({"chick": false})).await;
        let source = HttpFlagSource::new(&format!("{}/app/config", server.uri()), 5);
        assert!(!source.fetch_flag("chick").await.expect("flag"));
    }

    #[tokio::test]
    async fn missing_key_is_distinct_error() {
        let server = flag_server(json!({"unrelated": true})).await;
        let source = HttpFlagSource::new(&format!("{}/app/config", server.uri()), 5);
        let err = source.fetch_flag("chick").await.expect_err("err");
        assert!(matches!(err, RemoteConfigError::MissingKey(k) if k == "chick"));
    }

    #[tokio::test]
    async fn non_boolean_value_counts_as_missing() {
        let server = flag_server(json!({"chick": "yes"})).await;
        let source = HttpFlagSource::new(&format!("{}/app/config", server.uri()), 5);
        let err = source.fetch_flag("chick").await.expect_err("err");
        assert!(matches!(err, RemoteConfigError::MissingKey(_)));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/app/config"))
            .respond_with(ResponseTemplate::new(200).set_body_string("chick=true"))
            .mount(&server)
            .await;

        let source = HttpFlagSource::new(&format!("{}/app/config", server.uri()), 5);
        let err = source.fetch_flag("chick").await.expect_err("err");
        assert!(matches!(err, RemoteConfigError::MalformedBody(_)));
    }

    #[tokio::test]
    async fn server_error_is_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/app/config"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let source = HttpFlagSource::new(&format!("{}/app/config", server.uri()), 5);
        let err = source.fetch_flag("chick").await.expect_err("err");
        assert!(matches!(err, RemoteConfigError::Unreachable(_)));
    }

    #[tokio::test]
    async fn dead_endpoint_is_unreachable() {
        let uri = {
            let server = MockServer::start().await;
            format!("{}/app/config", server.uri())
        };

        let source = HttpFlagSource::new(&uri, 5);
        let err = source.fetch_flag("chick").await.expect_err("err");
        assert!(matches!(err, RemoteConfigError::Unreachable(_)));
    }
}
