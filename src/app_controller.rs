use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use crate::app_config::Config;
use crate::providers::gemini::Gemini;
use crate::slides::client::{DocumentBatchClient, SlidesClient};
use crate::slides::url::parse_presentation_id;
use crate::translation::{PipelineReport, TextTranslator, TranslationPipeline};

// @module: Application controller for presentation translation

/// Main application controller for presentation translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the Gemini and Slides backed pipeline described by the configuration
    pub fn build_pipeline(&self) -> Result<TranslationPipeline<Gemini, SlidesClient>> {
        let translation = &self.config.translation;
        let api_key = translation.resolve_api_key()?;

        let translator = Gemini::new(
            api_key,
            translation.endpoint.clone(),
            translation.model.clone(),
            translation.timeout_secs,
        )
        .with_temperature(translation.temperature)
        .with_max_output_tokens(translation.max_output_tokens);

        let slides = &self.config.slides;
        let client = SlidesClient::new(
            slides.access_token.clone(),
            slides.endpoint.clone(),
            slides.timeout_secs,
        );

        Ok(TranslationPipeline::new(translator, client, self.config.pipeline_options()))
    }

    /// Translate the presentation behind `url`
    pub async fn run(&self, url: &str) -> Result<PipelineReport> {
        let presentation_id = parse_presentation_id(url)?;
        let pipeline = self.build_pipeline()?;
        info!(
            "Translating {} from {} to {} with {}",
            presentation_id,
            self.config.source_language,
            self.config.target_language,
            pipeline.translator().model()
        );
        self.run_pipeline(&pipeline, &presentation_id).await
    }

    /// Run a pipeline with progress reporting and a final summary
    pub async fn run_pipeline<T, D>(
        &self,
        pipeline: &TranslationPipeline<T, D>,
        presentation_id: &str,
    ) -> Result<PipelineReport>
    where
        T: TextTranslator,
        D: DocumentBatchClient,
    {
        let progress_bar = ProgressBar::new(0);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} slides ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");

        let result = pipeline
            .translate_presentation_with_progress(presentation_id, |done, total| {
                progress_bar.set_length(total as u64);
                progress_bar.set_position(done as u64);
            })
            .await;

        progress_bar.finish_and_clear();

        let report = result.with_context(|| format!("Failed to translate presentation {}", presentation_id))?;

        info!("{}", report);
        if !report.is_complete() {
            warn!(
                "{} text run(s) were left untranslated, see the list above",
                report.exceptions.len()
            );
        }

        Ok(report)
    }
}
