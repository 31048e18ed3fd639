/*!
 * Translation of presentation text using AI providers.
 *
 * - `core`: the `TextTranslator` capability and its Gemini implementation
 * - `prompts`: instruction templates
 * - `batch`: eligibility rules, replacement requests, sorting and chunked submission
 * - `pipeline`: the end-to-end presentation translation run
 */

// Re-export main types for easier usage
pub use self::batch::{is_translatable, ReplacementRequest, TranslationBatch};
pub use self::core::TextTranslator;
pub use self::pipeline::{FailedRun, PipelineOptions, PipelineReport, TranslationPipeline};
pub use self::prompts::PromptTemplate;

// Submodules
pub mod batch;
pub mod core;
pub mod pipeline;
pub mod prompts;
