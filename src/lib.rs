/*!
 * # slidelingo - translate hosted slide decks with AI
 *
 * A Rust library for translating the text of a Google Slides presentation
 * in place using Gemini.
 *
 * ## Features
 *
 * - Extract text runs from slides, including shapes nested in groups
 * - Translate each eligible run with a configurable instruction template
 * - Write translations back as batched `replaceAllText` operations,
 *   longest texts first so shorter matches never clobber longer ones
 * - Record per-run failures without aborting the run
 * - Optional deduplication, slide cap and bounded concurrency
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `slides`: Presentation model, text extraction, URL parsing and the Slides API client
 * - `translation`: Translation capability, prompts, batches and the pipeline
 * - `providers`: Client implementations for LLM providers:
 *   - `providers::gemini`: Gemini API client
 *   - `providers::mock`: Mock providers for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod providers;
pub mod slides;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, InvalidInputError, ProviderError, RemoteServiceError, TranslationError};
pub use slides::{DocumentBatchClient, PageElement, Presentation, Slide};
pub use translation::{PipelineOptions, PipelineReport, TextTranslator, TranslationPipeline};
