// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::Path;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use dialoguer::{theme::ColorfulTheme, Input};

use slidelingo::app_config::{self, Config};
use slidelingo::app_controller::Controller;
use slidelingo::slides::parse_presentation_id;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a presentation (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for slidelingo
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug, Clone)]
struct TranslateArgs {
    /// Presentation URL; prompted for when omitted
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Target language (e.g. 'French', 'Vietnamese'); prompted for when omitted
    #[arg(short, long)]
    target_language: Option<String>,

    /// Source language of the slides
    #[arg(short, long)]
    source_language: Option<String>,

    /// Subject-matter domain of the slides (e.g. 'IT', 'Medicine')
    #[arg(long)]
    major: Option<String>,

    /// Gemini model name
    #[arg(short, long)]
    model: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Slides API OAuth access token
    #[arg(long, env = "GOOGLE_SLIDES_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Maximum replacements per batch update
    #[arg(long)]
    max_request: Option<usize>,

    /// Only translate the first N slides
    #[arg(long)]
    max_slides: Option<usize>,

    /// Maximum translation requests in flight
    #[arg(long)]
    concurrency: Option<usize>,

    /// Translate repeated texts every time they occur
    #[arg(long)]
    no_dedupe: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// slidelingo - translate Google Slides presentations with Gemini
///
/// Extracts the text of every slide, translates it, and writes the
/// translations back into the presentation.
#[derive(Parser, Debug)]
#[command(name = "slidelingo")]
#[command(version)]
#[command(about = "AI-powered slide deck translation tool")]
#[command(long_about = "slidelingo translates the text of a Google Slides presentation in place using Gemini.

EXAMPLES:
    slidelingo                                                   # Prompt for URL and language
    slidelingo -t French https://docs.google.com/presentation/d/ID/edit
    slidelingo -t German --major Medicine --max-slides 5 URL     # First 5 slides only
    slidelingo --concurrency 4 --log-level debug -t Spanish URL
    slidelingo completions bash > slidelingo.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one is created. The Gemini key is read from --api-key,
    GOOGLE_API_KEY, translation.api_key or the key file (Data/Key.json,
    {\"GeminiKey\": \"...\"}). The Slides token is read from --access-token,
    GOOGLE_SLIDES_TOKEN or slides.access_token.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Accept everything here, the effective level is set once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "slidelingo", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => run_translate(cli.translate).await,
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = load_or_create_config(&options.config_path)?;
    apply_overrides(&mut config, &options);

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    // Prompt for whatever the command line left out
    let url = match &options.url {
        Some(url) => url.clone(),
        None => prompt("Enter your Google Slides presentation URL (Google Slides format only)")?,
    };
    parse_presentation_id(&url)?;
    if options.target_language.is_none() {
        config.target_language = prompt("Which language do you want to translate to?")?;
    }

    let controller = Controller::with_config(config)?;
    let report = controller.run(&url).await?;

    println!("{}", report);
    println!("Finished! Your slides have been translated.");
    Ok(())
}

fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        return Config::from_file(config_path);
    }

    warn!("Config file not found at '{}', creating default config.", config_path);
    let config = Config::default();
    config.save(config_path)?;
    Ok(config)
}

fn apply_overrides(config: &mut Config, options: &TranslateArgs) {
    if let Some(source_language) = &options.source_language {
        config.source_language = source_language.clone();
    }
    if let Some(target_language) = &options.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(major) = &options.major {
        config.major = major.clone();
    }
    if let Some(model) = &options.model {
        config.translation.model = model.clone();
    }
    if let Some(api_key) = &options.api_key {
        config.translation.api_key = api_key.clone();
    }
    if let Some(access_token) = &options.access_token {
        config.slides.access_token = access_token.clone();
    }
    if let Some(max_request) = options.max_request {
        config.slides.max_request = max_request;
    }
    if let Some(max_slides) = options.max_slides {
        config.slides.max_slides = Some(max_slides);
    }
    if let Some(concurrency) = options.concurrency {
        config.translation.concurrent_requests = concurrency;
    }
    if options.no_dedupe {
        config.translation.deduplicate = false;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

fn prompt(question: &str) -> Result<String> {
    let answer: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(question)
        .interact_text()
        .with_context(|| format!("Failed to read answer to: {}", question))?;

    let answer = answer.trim().to_string();
    if answer.is_empty() {
        return Err(anyhow!("No answer given to: {}", question));
    }
    info!("Using '{}'", answer);
    Ok(answer)
}
