/*!
 * Core translation capability.
 *
 * The pipeline only needs "instruction and text in, translated text out".
 * [`TextTranslator`] is that seam; [`Gemini`] implements it against the
 * Generative Language API and the mock providers implement it for tests.
 */

use async_trait::async_trait;
use log::trace;
use std::sync::Arc;

use crate::errors::TranslationError;
use crate::providers::Provider;
use crate::providers::gemini::Gemini;
use super::prompts::compose_prompt;

/// Translate one text run following an instruction
#[async_trait]
pub trait TextTranslator: Send + Sync {
    /// Translate `text`, guided by `instruction`
    async fn translate(&self, instruction: &str, text: &str) -> Result<String, TranslationError>;
}

#[async_trait]
impl<T: TextTranslator + ?Sized> TextTranslator for Arc<T> {
    async fn translate(&self, instruction: &str, text: &str) -> Result<String, TranslationError> {
        (**self).translate(instruction, text).await
    }
}

#[async_trait]
impl TextTranslator for Gemini {
    async fn translate(&self, instruction: &str, text: &str) -> Result<String, TranslationError> {
        let request = self.request(compose_prompt(instruction, text));
        let chunks = self.complete(request).await?;
        let translated = Self::extract_text(&chunks);
        trace!("Translated {:?} -> {:?}", text, translated);

        if translated.is_empty() {
            return Err(TranslationError::EmptyResponse);
        }
        Ok(translated)
    }
}
