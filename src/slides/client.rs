use std::time::Duration;
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::errors::RemoteServiceError;
use crate::translation::batch::ReplacementRequest;

use super::model::Presentation;

/// Default Slides API endpoint
pub const DEFAULT_SLIDES_ENDPOINT: &str = "https://slides.googleapis.com";

/// Outcome of one `batchUpdate` call
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    /// Number of requests in the submitted chunk
    pub request_count: usize,

    /// Raw response body returned by the service
    pub response: Value,
}

impl BatchResult {
    /// Create a batch result from a chunk size and a response body
    pub fn new(request_count: usize, response: Value) -> Self {
        Self { request_count, response }
    }

    /// Total occurrences changed, summed over `replaceAllText` replies
    pub fn occurrences_changed(&self) -> u64 {
        self.response
            .get("replies")
            .and_then(Value::as_array)
            .map(|replies| {
                replies
                    .iter()
                    .filter_map(|reply| {
                        reply
                            .get("replaceAllText")
                            .and_then(|r| r.get("occurrencesChanged"))
                            .and_then(Value::as_u64)
                    })
                    .sum()
            })
            .unwrap_or(0)
    }
}

/// Access to a hosted presentation: read a snapshot, apply replacements
#[async_trait]
pub trait DocumentBatchClient: Send + Sync {
    /// Fetch the presentation snapshot
    async fn fetch_presentation(&self, presentation_id: &str) -> Result<Presentation, RemoteServiceError>;

    /// Apply an ordered list of replacements as one batch
    async fn batch_replace(
        &self,
        presentation_id: &str,
        requests: &[ReplacementRequest],
    ) -> Result<BatchResult, RemoteServiceError>;
}

#[derive(Serialize)]
struct BatchUpdateBody<'a> {
    requests: &'a [ReplacementRequest],
}

/// Google Slides REST client authenticated with a bearer token
pub struct SlidesClient {
    /// HTTP client for API requests
    client: Client,
    /// OAuth access token
    access_token: String,
    /// API base URL
    endpoint: String,
}

impl SlidesClient {
    /// Create a new Slides client
    pub fn new(access_token: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            access_token: access_token.into(),
            endpoint: if endpoint.is_empty() {
                DEFAULT_SLIDES_ENDPOINT.to_string()
            } else {
                endpoint.trim_end_matches('/').to_string()
            },
        }
    }

    /// URL of a presentation resource
    pub fn presentation_url(&self, presentation_id: &str) -> String {
        format!("{}/v1/presentations/{}", self.endpoint, presentation_id)
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, RemoteServiceError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Slides API error ({}): {}", status, message);
            return Err(RemoteServiceError::Api {
                status_code: status.as_u16(),
                message,
            });
        }

        response.json::<Value>().await
            .map_err(|e| RemoteServiceError::Parse(e.to_string()))
    }
}

#[async_trait]
impl DocumentBatchClient for SlidesClient {
    async fn fetch_presentation(&self, presentation_id: &str) -> Result<Presentation, RemoteServiceError> {
        let url = self.presentation_url(presentation_id);
        debug!("Fetching presentation {}", presentation_id);

        let response = self.client.get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| RemoteServiceError::Transport(e.to_string()))?;

        let body = Self::read_json(response).await?;
        serde_json::from_value(body).map_err(|e| RemoteServiceError::Parse(e.to_string()))
    }

    async fn batch_replace(
        &self,
        presentation_id: &str,
        requests: &[ReplacementRequest],
    ) -> Result<BatchResult, RemoteServiceError> {
        let url = format!("{}:batchUpdate", self.presentation_url(presentation_id));

        let response = self.client.post(&url)
            .bearer_auth(&self.access_token)
            .json(&BatchUpdateBody { requests })
            .send()
            .await
            .map_err(|e| RemoteServiceError::Transport(e.to_string()))?;

        let body = Self::read_json(response).await?;
        Ok(BatchResult::new(requests.len(), body))
    }
}
