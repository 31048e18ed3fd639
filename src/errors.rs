/*!
 * Error types for the slidelingo application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Generation stopped before the model finished its answer
    #[error("Generation stopped early: {0}")]
    IncompleteResponse(String),
}

/// Malformed user input, rejected before any remote call
#[derive(Error, Debug, PartialEq)]
pub enum InvalidInputError {
    /// The URL does not point to a hosted presentation
    #[error("Invalid presentation URL: {0}")]
    InvalidUrl(String),

    /// The URL matched the prefix but carried no presentation ID
    #[error("Missing presentation ID in URL: {0}")]
    MissingPresentationId(String),
}

/// Errors that can occur while translating a single text run
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The model answered but produced no text
    #[error("Provider returned an empty translation")]
    EmptyResponse,
}

/// Errors from the presentation-hosting service
#[derive(Error, Debug)]
pub enum RemoteServiceError {
    /// The service answered with a non-success status
    #[error("Slides API error ({status_code}): {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error body returned by the service
        message: String,
    },

    /// The request never got a response
    #[error("Slides API transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded
    #[error("Failed to parse Slides API response: {0}")]
    Parse(String),

    /// A chunk failed after earlier chunks were already applied
    #[error("Batch {failed_chunk} of {total_chunks} failed after {applied_chunks} applied: {source}")]
    PartialBatch {
        /// 1-based index of the failing chunk
        failed_chunk: usize,
        /// Number of chunks in the submission
        total_chunks: usize,
        /// Chunks that were applied and are not rolled back
        applied_chunks: usize,
        /// The underlying failure
        #[source]
        source: Box<RemoteServiceError>,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from user input
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Error from the presentation service
    #[error("Remote service error: {0}")]
    Remote(#[from] RemoteServiceError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
