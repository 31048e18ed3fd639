use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs;
use std::path::Path;

use crate::providers::gemini::{DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL};
use crate::slides::client::DEFAULT_SLIDES_ENDPOINT;
use crate::translation::{PipelineOptions, PromptTemplate};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Language the presentation is written in
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Language to translate into
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Subject-matter domain of the presentation, passed to the model
    #[serde(default = "default_major")]
    pub major: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Presentation service config
    #[serde(default)]
    pub slides: SlidesConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Gemini translation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    // @field: Model name
    #[serde(default = "default_gemini_model")]
    pub model: String,

    // @field: API key, takes precedence over the key file
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: JSON file holding {"GeminiKey": "..."}
    #[serde(default = "default_key_file")]
    pub key_file: String,

    // @field: Service URL
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_translation_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Sampling temperature, model default when unset
    #[serde(default)]
    pub temperature: Option<f32>,

    // @field: Output token cap, model default when unset
    #[serde(default)]
    pub max_output_tokens: Option<u32>,

    // @field: Max concurrent requests
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    // @field: Translate each distinct text once
    #[serde(default = "default_true")]
    pub deduplicate: bool,

    /// Instruction template
    /// Placeholders: {src_language}, {target_language}, {major}
    #[serde(default = "default_prompt_template")]
    pub prompt_template: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_key: String::new(),
            key_file: default_key_file(),
            endpoint: default_gemini_endpoint(),
            timeout_secs: default_translation_timeout_secs(),
            temperature: None,
            max_output_tokens: None,
            concurrent_requests: default_concurrent_requests(),
            deduplicate: true,
            prompt_template: default_prompt_template(),
        }
    }
}

/// Slides API settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SlidesConfig {
    // @field: OAuth bearer token
    #[serde(default = "String::new")]
    pub access_token: String,

    // @field: Service URL
    #[serde(default = "default_slides_endpoint")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_slides_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Max replacements per batchUpdate call
    #[serde(default = "default_max_request")]
    pub max_request: usize,

    // @field: Only process the first N slides
    #[serde(default)]
    pub max_slides: Option<usize>,
}

impl Default for SlidesConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            endpoint: default_slides_endpoint(),
            timeout_secs: default_slides_timeout_secs(),
            max_request: default_max_request(),
            max_slides: None,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Shape of the key file
#[derive(Debug, Deserialize)]
struct KeyFile {
    #[serde(rename = "GeminiKey")]
    gemini_key: String,
}

fn default_source_language() -> String {
    "English".to_string()
}

fn default_target_language() -> String {
    "Vietnamese".to_string()
}

fn default_major() -> String {
    "IT".to_string()
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_gemini_endpoint() -> String {
    DEFAULT_GEMINI_ENDPOINT.to_string()
}

fn default_slides_endpoint() -> String {
    DEFAULT_SLIDES_ENDPOINT.to_string()
}

fn default_key_file() -> String {
    "Data/Key.json".to_string()
}

fn default_translation_timeout_secs() -> u64 {
    60
}

fn default_slides_timeout_secs() -> u64 {
    30
}

fn default_concurrent_requests() -> usize {
    1
}

fn default_max_request() -> usize {
    100
}

fn default_true() -> bool {
    true
}

fn default_prompt_template() -> String {
    PromptTemplate::SLIDE_TRANSLATOR.to_string()
}

/// Read the Gemini key from a key file
pub fn load_key_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read key file: {}", path.display()))?;
    let key_file: KeyFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse key file: {}", path.display()))?;

    let key = key_file.gemini_key.trim().to_string();
    if key.is_empty() {
        return Err(anyhow!("Key file {} has an empty GeminiKey", path.display()));
    }
    Ok(key)
}

impl TranslationConfig {
    /// Resolve the API key: explicit value first, then the key file
    pub fn resolve_api_key(&self) -> Result<String> {
        if !self.api_key.trim().is_empty() {
            return Ok(self.api_key.trim().to_string());
        }
        if self.key_file.is_empty() {
            return Err(anyhow!("Gemini API key is required (set translation.api_key or translation.key_file)"));
        }
        load_key_file(&self.key_file)
            .context("Gemini API key is required (set translation.api_key or translation.key_file)")
    }
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.source_language.trim().is_empty() {
            return Err(anyhow!("Source language must not be empty"));
        }
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language must not be empty"));
        }
        if self.slides.max_request == 0 {
            return Err(anyhow!("slides.max_request must be at least 1"));
        }
        if self.slides.max_slides == Some(0) {
            return Err(anyhow!("slides.max_slides must be at least 1 when set"));
        }
        if self.translation.concurrent_requests == 0 {
            return Err(anyhow!("translation.concurrent_requests must be at least 1"));
        }
        if self.slides.access_token.trim().is_empty() {
            return Err(anyhow!("Slides access token is required"));
        }
        self.translation.resolve_api_key()?;

        Ok(())
    }

    /// Pipeline options derived from this configuration
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions::new(&self.source_language, &self.target_language)
            .with_major(&self.major)
            .with_max_request(self.slides.max_request)
            .with_max_slides(self.slides.max_slides)
            .with_deduplicate(self.translation.deduplicate)
            .with_concurrent_requests(self.translation.concurrent_requests)
            .with_prompt(PromptTemplate::new(&self.translation.prompt_template))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            major: default_major(),
            translation: TranslationConfig::default(),
            slides: SlidesConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
