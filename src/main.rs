// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, info, warn};
use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hanzi_gloss::app_config::{self, Config, TranslationProvider};
use hanzi_gloss::phonetic::{DictionaryLookup, ToneStyle};
use hanzi_gloss::render::{OutputFormat, render};
use hanzi_gloss::translation::{GlossSession, SessionConfig, TranslationService};
use hanzi_gloss::{OrchestrationError, TargetLanguage};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "mymemory")]
    MyMemory,
    Mock,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::MyMemory => TranslationProvider::MyMemory,
            CliTranslationProvider::Mock => TranslationProvider::Mock,
        }
    }
}

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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Gloss Chinese text (default command)
    Gloss(GlossArgs),

    /// Generate shell completions for hanzi-gloss
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug, Clone)]
struct GlossArgs {
    /// Text to gloss; read from --input-file or stdin when omitted
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Read the text from a file
    #[arg(short, long, conflicts_with = "text")]
    input_file: Option<PathBuf>,

    /// Target language code ('es' or 'en')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Largest phrase group before a forced break
    #[arg(long)]
    max_group_size: Option<usize>,

    /// Extra reading dictionary (character<TAB>reading per line)
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Tone style of readings: marks, numbers or none
    #[arg(long)]
    tone_style: Option<ToneStyle>,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: OutputFormat,
}

/// hanzi-gloss - Interlinear glosses for Chinese text
///
/// Splits Chinese text into short phrase groups, shows the pinyin reading of
/// every character and translates the whole text and every group.
#[derive(Parser, Debug)]
#[command(name = "hanzi-gloss")]
#[command(version)]
#[command(about = "Pinyin and phrase-by-phrase translation of Chinese text")]
#[command(long_about = "hanzi-gloss annotates Chinese text with pinyin and translates it \
phrase by phrase.

EXAMPLES:
    hanzi-gloss 你好。再见！                    # Gloss into Spanish (default)
    hanzi-gloss -t en 我们今天去学校            # Gloss into English
    hanzi-gloss -i story.txt --format json      # Gloss a file, JSON output
    cat story.txt | hanzi-gloss                 # Read the text from stdin
    hanzi-gloss --tone-style numbers 你好       # Readings as hao3 instead of hǎo
    hanzi-gloss completions bash > hanzi-gloss.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    mymemory - MyMemory public translation API (default)
    mock     - Offline provider that echoes the text with a language tag")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    gloss: GlossArgs,
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

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
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
            let (color, tag) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color,
                now,
                tag,
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
    // Most verbose level accepted by the logger; the effective level is set
    // through set_max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "hanzi-gloss", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Gloss(args)) => run_gloss(args).await,
        None => run_gloss(cli.gloss).await,
    }
}

/// Load the config file, or write a default one when it is missing
fn load_or_create_config(options: &GlossArgs) -> Result<Config> {
    let config_path = Path::new(&options.config_path);

    let mut config = if config_path.exists() {
        Config::load_from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", options.config_path);
        let config = Config::default();
        config.save_to_file(config_path)?;
        config
    };

    // Override config with CLI options if provided
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(target) = &options.target_language {
        config.target_language = target
            .parse::<TargetLanguage>()
            .with_context(|| format!("Unsupported target language: {}", target))?;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(size) = options.max_group_size {
        config.grouping.max_group_size = size;
    }
    if let Some(path) = &options.dictionary {
        config.phonetic.dictionary_path = Some(path.clone());
    }
    if let Some(style) = options.tone_style {
        config.phonetic.tone_style = style;
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn build_dictionary(config: &Config) -> Result<DictionaryLookup> {
    let mut dictionary = DictionaryLookup::embedded();
    if let Some(path) = &config.phonetic.dictionary_path {
        dictionary.extend_with(DictionaryLookup::from_file(path)?);
    }
    debug!("Reading dictionary holds {} characters", dictionary.len());
    Ok(dictionary.with_tone_style(config.phonetic.tone_style))
}

fn read_input(options: &GlossArgs) -> Result<String> {
    if let Some(text) = &options.text {
        return Ok(text.clone());
    }
    if let Some(path) = &options.input_file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {:?}", path));
    }
    if std::io::stdin().is_terminal() {
        return Err(anyhow!(
            "TEXT is required when no --input-file is given and stdin is a terminal"
        ));
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read text from stdin")?;
    Ok(text)
}

fn progress_bar() -> ProgressBar {
    let progress_bar = ProgressBar::new(100);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
        .or_else(|_| {
            ProgressStyle::default_bar()
                .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}% {msg}")
        })
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style.progress_chars("#>-"));
    progress_bar
}

async fn run_gloss(options: GlossArgs) -> Result<()> {
    // Command line level applies before the config is read
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let config = load_or_create_config(&options)?;
    log::set_max_level(level_filter(&config.log_level));

    let text = read_input(&options)?;
    let lookup = Arc::new(build_dictionary(&config)?);
    let service = Arc::new(TranslationService::new(&config.translation));
    info!(
        "Using {} provider, target language {}",
        service.provider_name(),
        config.target_language.name()
    );

    let session = GlossSession::new(service, lookup, SessionConfig::from(&config));
    session.set_target_language(config.target_language);
    session.set_input_text(text);

    let progress_bar = progress_bar();
    let mut updates = session.subscribe();
    let bar = progress_bar.clone();
    let watcher = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            bar.set_position(u64::from(snapshot.progress));
            bar.set_message(format!("{} groups", snapshot.groups.len()));
        }
    });

    let run = session.run_orchestration();
    tokio::pin!(run);
    let result = loop {
        tokio::select! {
            result = &mut run => break result,
            Ok(()) = tokio::signal::ctrl_c() => session.cancel(),
        }
    };
    watcher.abort();
    progress_bar.finish_and_clear();

    let snapshot = session.snapshot();
    match result {
        Ok(outcome) => debug!("Run outcome: {:?}", outcome),
        Err(OrchestrationError::AlreadyRunning) => {
            return Err(anyhow!("A translation run is already in progress"));
        }
        Err(_) => {}
    }

    let output = render(&snapshot, options.format)?;
    print!("{}", output);

    match &snapshot.error {
        Some(message) => Err(anyhow!("{}", message)),
        None => Ok(()),
    }
}
