//! GraphQL transport trait and the blocking HTTP implementation.
//!
//! The trait abstracts the remote execute(query, variables) call so the retry
//! and pagination layers can be driven by scripted stubs in tests. The HTTP
//! implementation posts to the configured endpoint with the auth token and
//! unwraps the outer GraphQL framing (`data` / `errors`).

use crate::config::ApiConfig;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Transport-level failure. Every variant is treated as transient and retried
/// identically by the caller, matching the upstream API's guidance that
/// rate-limit and gateway hiccups clear on their own.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP status {status}")]
    Http { status: u16 },

    #[error("GraphQL query error: {0}")]
    Query(String),

    #[error("protocol error: {0}")]
    Protocol(String),
}

/// A single remote execute call. Implementations return the GraphQL `data`
/// object; failures surface as `TransportError`.
pub trait GraphqlTransport {
    fn execute(&self, query: &str, variables: &Value) -> Result<Value, TransportError>;
}

/// Outer framing of a GraphQL HTTP response.
#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<Value>,
    errors: Option<Vec<Value>>,
}

/// Blocking HTTP transport for the upstream GraphQL API.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    endpoint: String,
    auth_token: String,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            auth_token: config.auth_token.clone(),
        })
    }
}

impl GraphqlTransport for HttpTransport {
    fn execute(&self, query: &str, variables: &Value) -> Result<Value, TransportError> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", &self.auth_token)
            .json(&body)
            .send()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Http {
                status: status.as_u16(),
            });
        }

        let parsed: GraphqlResponse = response
            .json()
            .map_err(|e| TransportError::Protocol(format!("response body is not JSON: {e}")))?;

        if let Some(errors) = parsed.errors {
            if !errors.is_empty() {
                return Err(TransportError::Query(
                    serde_json::to_string(&errors).unwrap_or_else(|_| "unprintable".into()),
                ));
            }
        }

        parsed
            .data
            .ok_or_else(|| TransportError::Protocol("response carried no data object".into()))
    }
}
