/*!
 * Presentation translation pipeline.
 *
 * One run goes through these steps:
 * 1. Fetch the presentation snapshot
 * 2. For each slide (optionally capped), extract its text runs, drop the
 *    ineligible ones and, if enabled, the texts already seen
 * 3. Translate the remaining runs of all slides in one bounded pool,
 *    recording failures without aborting
 * 4. Sort, chunk and submit the accumulated replacements
 *
 * Everything accumulated during a run is returned in a [`PipelineReport`];
 * nothing outlives the call.
 */

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fmt;
use std::pin::pin;
use std::time::Instant;

use crate::errors::{RemoteServiceError, TranslationError};
use crate::slides::client::{BatchResult, DocumentBatchClient};
use crate::slides::extract::extract_slide_runs;
use crate::slides::model::Presentation;

use super::batch::{is_translatable, ReplacementRequest, TranslationBatch};
use super::core::TextTranslator;
use super::prompts::PromptTemplate;

/// Default number of replacements per `batchUpdate` call
pub const DEFAULT_MAX_REQUEST: usize = 30;

/// Options for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Language the slides are written in
    pub source_language: String,

    /// Language to translate into
    pub target_language: String,

    /// Subject-matter domain hint passed to the model
    pub major: String,

    /// Maximum replacements per batch submission
    pub max_request: usize,

    /// Process only the first N slides; all slides when unset
    pub max_slides: Option<usize>,

    /// Translate each distinct text once
    pub deduplicate: bool,

    /// Maximum translation calls in flight
    pub concurrent_requests: usize,

    /// Instruction template
    pub prompt: PromptTemplate,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            source_language: "English".to_string(),
            target_language: "Vietnamese".to_string(),
            major: "IT".to_string(),
            max_request: DEFAULT_MAX_REQUEST,
            max_slides: None,
            deduplicate: true,
            concurrent_requests: 1,
            prompt: PromptTemplate::default(),
        }
    }
}

impl PipelineOptions {
    /// Create options for a language pair
    pub fn new(source_language: &str, target_language: &str) -> Self {
        Self {
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            ..Default::default()
        }
    }

    /// Set the subject-matter domain hint
    pub fn with_major(mut self, major: &str) -> Self {
        self.major = major.to_string();
        self
    }

    /// Set the batch size
    pub fn with_max_request(mut self, max_request: usize) -> Self {
        self.max_request = max_request;
        self
    }

    /// Cap the number of processed slides
    pub fn with_max_slides(mut self, max_slides: Option<usize>) -> Self {
        self.max_slides = max_slides;
        self
    }

    /// Enable or disable deduplication by original text
    pub fn with_deduplicate(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    /// Set how many translation calls may run at once
    pub fn with_concurrent_requests(mut self, concurrent_requests: usize) -> Self {
        self.concurrent_requests = concurrent_requests;
        self
    }

    /// Use a custom instruction template
    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    /// Instruction rendered for these options
    pub fn instruction(&self) -> String {
        self.prompt.render(&self.source_language, &self.target_language, &self.major)
    }
}

/// A run whose translation failed
#[derive(Debug, Clone, PartialEq)]
pub struct FailedRun {
    /// 1-based slide number the run was first seen on
    pub slide_number: usize,

    /// Original text of the run
    pub text: String,

    /// Why the translation failed
    pub error: String,
}

/// Everything one pipeline run produced
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    /// Runs that could not be translated
    pub exceptions: Vec<FailedRun>,

    /// One result per submitted chunk, in submission order
    pub submissions: Vec<BatchResult>,

    /// Slides in the presentation
    pub slides_total: usize,

    /// Slides actually processed
    pub slides_processed: usize,

    /// Text runs extracted from processed slides
    pub runs_seen: usize,

    /// Runs rejected by the validity predicate
    pub runs_skipped: usize,

    /// Eligible runs merged into an earlier identical text
    pub duplicates_merged: usize,

    /// Replacement requests built
    pub requests_built: usize,
}

impl PipelineReport {
    /// Whether every eligible run was translated
    pub fn is_complete(&self) -> bool {
        self.exceptions.is_empty()
    }

    /// Occurrences changed across all submissions
    pub fn occurrences_changed(&self) -> u64 {
        self.submissions.iter().map(BatchResult::occurrences_changed).sum()
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Slides processed: {}/{}", self.slides_processed, self.slides_total)?;
        writeln!(
            f,
            "Text runs: {} seen, {} skipped, {} duplicates merged",
            self.runs_seen, self.runs_skipped, self.duplicates_merged
        )?;
        writeln!(
            f,
            "Replacements: {} in {} batch(es), {} occurrence(s) changed",
            self.requests_built,
            self.submissions.len(),
            self.occurrences_changed()
        )?;
        write!(f, "Failed runs: {}", self.exceptions.len())?;
        for failed in &self.exceptions {
            write!(f, "\n  slide {}: {:?} ({})", failed.slide_number, failed.text, failed.error)?;
        }
        Ok(())
    }
}

/// A run waiting for translation
struct PendingRun {
    slide_number: usize,
    text: String,
}

/// Translates a hosted presentation in place
pub struct TranslationPipeline<T, D> {
    translator: T,
    client: D,
    options: PipelineOptions,
}

impl<T, D> TranslationPipeline<T, D>
where
    T: TextTranslator,
    D: DocumentBatchClient,
{
    /// Create a new pipeline
    pub fn new(translator: T, client: D, options: PipelineOptions) -> Self {
        Self { translator, client, options }
    }

    /// Options in use
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// The translator in use
    pub fn translator(&self) -> &T {
        &self.translator
    }

    /// The document client in use
    pub fn client(&self) -> &D {
        &self.client
    }

    /// Translate a presentation and write the results back
    pub async fn translate_presentation(
        &self,
        presentation_id: &str,
    ) -> Result<PipelineReport, RemoteServiceError> {
        self.translate_presentation_with_progress(presentation_id, |_, _| {}).await
    }

    /// Translate a presentation, reporting `(slides done, slides to process)` after each slide
    pub async fn translate_presentation_with_progress(
        &self,
        presentation_id: &str,
        progress_callback: impl Fn(usize, usize),
    ) -> Result<PipelineReport, RemoteServiceError> {
        let start_time = Instant::now();
        let presentation = self.client.fetch_presentation(presentation_id).await?;
        info!(
            "Fetched presentation {} ({} slides)",
            presentation.title.as_deref().unwrap_or(presentation_id),
            presentation.slides.len()
        );

        let (batch, mut report) = self.build_batch(&presentation, progress_callback).await;

        report.submissions = batch
            .submit(&self.client, presentation_id, self.options.max_request)
            .await?;

        info!(
            "Translation finished in {:?}: {} replacement(s), {} failure(s)",
            start_time.elapsed(),
            report.requests_built,
            report.exceptions.len()
        );
        Ok(report)
    }

    /// Translate every eligible run of a presentation without submitting anything
    pub async fn build_batch(
        &self,
        presentation: &Presentation,
        progress_callback: impl Fn(usize, usize),
    ) -> (TranslationBatch, PipelineReport) {
        let instruction = self.options.instruction();
        let slide_limit = self
            .options
            .max_slides
            .unwrap_or(presentation.slides.len())
            .min(presentation.slides.len());

        let mut report = PipelineReport {
            slides_total: presentation.slides.len(),
            ..Default::default()
        };
        let mut seen: HashSet<String> = HashSet::new();
        let mut pending = Vec::new();
        let mut runs_per_slide = vec![0usize; slide_limit];

        for (index, slide) in presentation.slides.iter().take(slide_limit).enumerate() {
            let slide_number = index + 1;
            debug!("Extracting slide {}/{}", slide_number, slide_limit);

            let runs = extract_slide_runs(slide);
            report.runs_seen += runs.len();

            for text in runs {
                if !is_translatable(&text) {
                    report.runs_skipped += 1;
                    continue;
                }
                if self.options.deduplicate && !seen.insert(text.clone()) {
                    report.duplicates_merged += 1;
                    continue;
                }
                runs_per_slide[index] += 1;
                pending.push(PendingRun { slide_number, text });
            }
        }
        report.slides_processed = slide_limit;
        debug!("Translating {} run(s) from {} slide(s)", pending.len(), slide_limit);

        let mut batch = TranslationBatch::new();
        let results = self
            .translate_runs(&instruction, pending, runs_per_slide, &progress_callback)
            .await;
        for (run, result) in results {
            match result {
                Ok(translated) => batch.push(ReplacementRequest::new(run.text, translated)),
                Err(e) => {
                    warn!("Failed to translate run on slide {}: {}", run.slide_number, e);
                    report.exceptions.push(FailedRun {
                        slide_number: run.slide_number,
                        text: run.text,
                        error: e.to_string(),
                    });
                }
            }
        }

        report.requests_built = batch.len();
        (batch, report)
    }

    /// Translate runs of every slide with bounded concurrency, returning results in input order.
    ///
    /// `remaining` holds the number of runs per slide; the callback fires each
    /// time a slide has all of its runs answered.
    async fn translate_runs(
        &self,
        instruction: &str,
        runs: Vec<PendingRun>,
        mut remaining: Vec<usize>,
        progress_callback: &impl Fn(usize, usize),
    ) -> Vec<(PendingRun, Result<String, TranslationError>)> {
        let total_slides = remaining.len();
        let mut slides_done = remaining.iter().filter(|count| **count == 0).count();
        if slides_done > 0 {
            progress_callback(slides_done, total_slides);
        }

        let translator = &self.translator;
        let mut results = Vec::with_capacity(runs.len());
        let mut completed = pin!(
            stream::iter(runs.into_iter().enumerate())
                .map(|(index, run)| async move {
                    let result = translator.translate(instruction, &run.text).await;
                    (index, run, result)
                })
                .buffer_unordered(self.options.concurrent_requests.max(1))
        );

        while let Some((index, run, result)) = completed.next().await {
            if let Some(count) = remaining.get_mut(run.slide_number - 1) {
                *count -= 1;
                if *count == 0 {
                    slides_done += 1;
                    progress_callback(slides_done, total_slides);
                }
            }
            results.push((index, run, result));
        }

        // Completion order is arbitrary; restore document order
        results.sort_by_key(|(index, _, _)| *index);
        results.into_iter().map(|(_, run, result)| (run, result)).collect()
    }
}
