/*!
 * Replacement batches.
 *
 * Translations are written back as `replaceAllText` operations. Each one
 * replaces every exact-case occurrence of its original text in the whole
 * presentation, so the order in which operations are applied matters: a long
 * text must be replaced before any shorter text it contains, or the shorter
 * replacement would consume part of it first. Batches are therefore sorted by
 * descending original length before they are split into chunks.
 */

use log::{debug, info};
use serde::{Serialize, Serializer};

use crate::errors::RemoteServiceError;
use crate::slides::client::{BatchResult, DocumentBatchClient};

/// Minimum length, in characters, of a run worth translating
pub const MIN_TRANSLATABLE_CHARS: usize = 5;

/// Runs starting with this prefix are links and stay untouched
const LINK_PREFIX: &str = "https:";

/// Caption label left untranslated
const SOURCE_LABEL: &str = "Source: ";

/// Whether a text run should be sent for translation
pub fn is_translatable(text: &str) -> bool {
    text.chars().count() >= MIN_TRANSLATABLE_CHARS
        && !text.starts_with(LINK_PREFIX)
        && text != SOURCE_LABEL
}

/// A replace-all-occurrences operation with exact-case matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementRequest {
    /// Text to search for
    pub original_text: String,

    /// Text every occurrence is replaced with
    pub replacement_text: String,
}

impl ReplacementRequest {
    /// Create a new replacement request
    pub fn new(original_text: impl Into<String>, replacement_text: impl Into<String>) -> Self {
        Self {
            original_text: original_text.into(),
            replacement_text: replacement_text.into(),
        }
    }

    /// Length of the original text in characters
    pub fn original_len(&self) -> usize {
        self.original_text.chars().count()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    replace_all_text: WireReplaceAllText<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireReplaceAllText<'a> {
    replace_text: &'a str,
    contains_text: WireSubstringMatch<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireSubstringMatch<'a> {
    text: &'a str,
    match_case: bool,
}

impl Serialize for ReplacementRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireRequest {
            replace_all_text: WireReplaceAllText {
                replace_text: &self.replacement_text,
                contains_text: WireSubstringMatch {
                    text: &self.original_text,
                    match_case: true,
                },
            },
        }
        .serialize(serializer)
    }
}

/// Replacement requests accumulated over one pipeline run
#[derive(Debug, Clone, Default)]
pub struct TranslationBatch {
    requests: Vec<ReplacementRequest>,
}

impl TranslationBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a request
    pub fn push(&mut self, request: ReplacementRequest) {
        self.requests.push(request);
    }

    /// Number of requests
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether the batch holds no requests
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Requests in insertion order
    pub fn requests(&self) -> &[ReplacementRequest] {
        &self.requests
    }

    /// Sort by descending original length, keeping insertion order on ties
    pub fn finalize(mut self) -> Vec<ReplacementRequest> {
        self.requests
            .sort_by_key(|request| std::cmp::Reverse(request.original_len()));
        self.requests
    }

    /// Sort, chunk and submit every request in order.
    ///
    /// Returns one result per chunk. An empty batch makes no remote call.
    /// Chunks already applied stay applied when a later chunk fails.
    pub async fn submit<D>(
        self,
        client: &D,
        presentation_id: &str,
        max_request: usize,
    ) -> Result<Vec<BatchResult>, RemoteServiceError>
    where
        D: DocumentBatchClient + ?Sized,
    {
        let requests = self.finalize();
        info!("Request size: {}", requests.len());

        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let chunks = chunk_requests(&requests, max_request);
        let total_chunks = chunks.len();
        let mut results = Vec::with_capacity(total_chunks);

        for (index, chunk) in chunks.into_iter().enumerate() {
            debug!(
                "Submitting batch {}/{} ({} requests)",
                index + 1,
                total_chunks,
                chunk.len()
            );

            match client.batch_replace(presentation_id, chunk).await {
                Ok(result) => results.push(result),
                Err(e) if total_chunks > 1 => {
                    return Err(RemoteServiceError::PartialBatch {
                        failed_chunk: index + 1,
                        total_chunks,
                        applied_chunks: index,
                        source: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(results)
    }
}

/// Split sorted requests into consecutive chunks of at most `max_request`
pub fn chunk_requests(requests: &[ReplacementRequest], max_request: usize) -> Vec<&[ReplacementRequest]> {
    requests.chunks(max_request.max(1)).collect()
}
