/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds with translated text
 * - `MockProvider::intermittent(n)` - Fails every n-th request
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::failing_on(text)` - Fails only for one source text
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::{ProviderError, TranslationError};
use crate::providers::Provider;
use crate::translation::core::TextTranslator;

/// What a mock provider is asked to translate
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// Instruction preceding the text
    pub instruction: String,
    /// Text run to translate
    pub text: String,
}

/// What a mock provider answers
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Output text, translated or not
    pub text: String,
}

/// How a mock provider answers
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Prefixes every text with `[TRANSLATED] `
    Working,
    /// Every `fail_every`-th call fails with a 503
    Intermittent { fail_every: usize },
    /// Every call fails with a 500
    Failing,
    /// Fails only when asked to translate this exact text
    FailOn { text: String },
    /// Answers with nothing
    Empty,
    /// Simulates slow response, then succeeds
    Slow { delay_ms: u64 },
}

/// Deterministic stand-in for Gemini
#[derive(Debug)]
pub struct MockProvider {
    /// How to answer
    behavior: MockBehavior,
    /// Calls made, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Texts received, in call order
    received: Arc<Mutex<Vec<String>>>,
    /// Calls currently awaiting an answer
    in_flight: Arc<AtomicUsize>,
    /// Highest `in_flight` value observed
    peak_in_flight: Arc<AtomicUsize>,
    /// Replaces the `[TRANSLATED] ` output when set
    custom_response: Option<fn(&MockRequest) -> String>,
}

impl MockProvider {
    /// Mock with the given behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// Mock that translates everything
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Mock failing every n-th call
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Mock failing every call
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that fails for one specific text only
    pub fn failing_on(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::FailOn { text: text.into() })
    }

    /// Mock answering with empty text
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that waits before answering
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Derive answers from the request instead
    pub fn with_custom_response(mut self, generator: fn(&MockRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Texts received so far, in call order
    pub fn received_texts(&self) -> Vec<String> {
        self.received.lock().clone()
    }

    /// Most calls that were ever awaiting an answer at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn translated(&self, request: &MockRequest) -> String {
        match self.custom_response {
            Some(generator) => generator(request),
            None => format!("[TRANSLATED] {}", request.text),
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior.clone(),
            request_count: Arc::clone(&self.request_count),
            received: Arc::clone(&self.received),
            in_flight: Arc::clone(&self.in_flight),
            peak_in_flight: Arc::clone(&self.peak_in_flight),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.received.lock().push(request.text.clone());

        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        let response = self.respond(count, &request).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        response
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.clone()
    }
}

impl MockProvider {
    async fn respond(&self, count: usize, request: &MockRequest) -> Result<MockResponse, ProviderError> {
        match &self.behavior {
            MockBehavior::Working => Ok(MockResponse { text: self.translated(request) }),

            MockBehavior::Intermittent { fail_every } => {
                if *fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(MockResponse { text: self.translated(request) })
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::FailOn { text } => {
                if *text == request.text {
                    Err(ProviderError::RequestFailed(format!("Simulated failure for '{}'", text)))
                } else {
                    Ok(MockResponse { text: self.translated(request) })
                }
            }

            MockBehavior::Empty => Ok(MockResponse { text: String::new() }),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(*delay_ms)).await;
                Ok(MockResponse { text: self.translated(request) })
            }
        }
    }
}

#[async_trait]
impl TextTranslator for MockProvider {
    async fn translate(&self, instruction: &str, text: &str) -> Result<String, TranslationError> {
        let request = MockRequest {
            instruction: instruction.to_string(),
            text: text.to_string(),
        };
        let response = self.complete(request).await?;
        let translated = Self::extract_text(&response).trim().to_string();
        if translated.is_empty() {
            return Err(TranslationError::EmptyResponse);
        }
        Ok(translated)
    }
}
