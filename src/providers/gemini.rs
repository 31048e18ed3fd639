use std::time::Duration;
use serde::{Serialize, Deserialize};
use reqwest::{Client, StatusCode};
use async_trait::async_trait;
use log::{debug, error};

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Default Gemini API endpoint
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default Gemini model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Gemini client for interacting with the Generative Language API
#[derive(Debug)]
pub struct Gemini {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL
    endpoint: String,
    /// Model used for generation
    model: String,
    /// Sampling temperature, provider default when unset
    temperature: Option<f32>,
    /// Output token cap, provider default when unset
    max_output_tokens: Option<u32>,
}

/// Gemini content generation request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation turns
    contents: Vec<GeminiContent>,

    /// Sampling parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// A conversation turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    /// Role of the author (user, model)
    #[serde(default)]
    pub role: String,

    /// Content parts
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// A single content part
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
    /// Text of the part; absent for non-text parts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Sampling parameters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// One streamed chunk of a Gemini response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Candidate completions
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,

    /// Token usage, reported on the final chunk
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

/// A candidate completion
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    /// Generated content
    #[serde(default)]
    pub content: Option<GeminiContent>,

    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage information
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Number of prompt tokens
    #[serde(default)]
    pub prompt_token_count: u32,
    /// Number of generated tokens
    #[serde(default)]
    pub candidates_token_count: u32,
}

/// The only finish reason that means the answer is complete
const FINISH_REASON_STOP: &str = "STOP";

impl GeminiResponse {
    /// Text of the first candidate; `None` when the chunk carries no content
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        Some(content.parts.iter()
            .filter_map(|part| part.text.as_deref())
            .collect())
    }

    /// Finish reason of the first candidate when it is anything but `STOP`
    pub fn early_finish_reason(&self) -> Option<&str> {
        self.candidates.first()?
            .finish_reason
            .as_deref()
            .filter(|reason| *reason != FINISH_REASON_STOP)
    }
}

/// Reject a stream whose generation was cut short.
///
/// `SAFETY`, `RECITATION`, `OTHER` and `MAX_TOKENS` all leave a partial
/// answer behind, which must never be written into the deck.
pub fn ensure_complete(chunks: &[GeminiResponse]) -> Result<(), ProviderError> {
    match chunks.iter().find_map(GeminiResponse::early_finish_reason) {
        Some(reason) => Err(ProviderError::IncompleteResponse(format!(
            "finish reason {}",
            reason
        ))),
        None => Ok(()),
    }
}

impl GeminiRequest {
    /// Create a request with a single user prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart { text: Some(prompt.into()) }],
            }],
            generation_config: None,
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.generation_config
            .get_or_insert(GenerationConfig { temperature: None, max_output_tokens: None })
            .temperature = Some(temperature);
        self
    }

    /// Set the maximum number of output tokens
    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.generation_config
            .get_or_insert(GenerationConfig { temperature: None, max_output_tokens: None })
            .max_output_tokens = Some(max_output_tokens);
        self
    }
}

/// Join streamed chunk texts: every chunk followed by a line break, then the
/// whole output trimmed.
pub fn join_stream_chunks<I, S>(chunks: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for chunk in chunks {
        joined.push_str(chunk.as_ref());
        joined.push('\n');
    }
    joined.trim().to_string()
}

impl Gemini {
    /// Create a new Gemini client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        let endpoint = endpoint.into();
        let model = model.into();
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: if endpoint.is_empty() {
                DEFAULT_GEMINI_ENDPOINT.to_string()
            } else {
                endpoint.trim_end_matches('/').to_string()
            },
            model: if model.is_empty() { DEFAULT_GEMINI_MODEL.to_string() } else { model },
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Cap the number of generated tokens
    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Sampling temperature, if one was set
    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    /// Output token cap, if one was set
    pub fn max_output_tokens(&self) -> Option<u32> {
        self.max_output_tokens
    }

    /// Build the request for one prompt with this client's generation settings
    pub fn request(&self, prompt: impl Into<String>) -> GeminiRequest {
        let mut request = GeminiRequest::new(prompt);
        if let Some(temperature) = self.temperature {
            request = request.temperature(temperature);
        }
        if let Some(max_output_tokens) = self.max_output_tokens {
            request = request.max_output_tokens(max_output_tokens);
        }
        request
    }

    /// The model this client generates with
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Streaming endpoint URL, without the key
    pub fn stream_url(&self) -> String {
        format!("{}/v1beta/models/{}:streamGenerateContent", self.endpoint, self.model)
    }

    fn map_status(status: StatusCode, message: String) -> ProviderError {
        match status {
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(message),
            _ => ProviderError::ApiError { status_code: status.as_u16(), message },
        }
    }
}

#[async_trait]
impl Provider for Gemini {
    type Request = GeminiRequest;
    type Response = Vec<GeminiResponse>;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let response = self.client.post(self.stream_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Gemini API error ({}): {}", status, error_text);
            return Err(Self::map_status(status, error_text));
        }

        // Without `alt=sse` the stream arrives as one JSON array of chunks
        let chunks = response.json::<Vec<GeminiResponse>>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        debug!("Gemini returned {} chunk(s)", chunks.len());
        if let Some(usage) = chunks.iter().rev().find_map(|chunk| chunk.usage_metadata.as_ref()) {
            debug!(
                "Gemini token usage: {} prompt, {} generated",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        ensure_complete(&chunks)?;
        Ok(chunks)
    }

    fn extract_text(response: &Self::Response) -> String {
        join_stream_chunks(response.iter().filter_map(GeminiResponse::text))
    }
}
