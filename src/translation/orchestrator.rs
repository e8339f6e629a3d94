/*!
 * Gloss orchestration.
 *
 * A `GlossSession` owns the input text and target language and drives one
 * run at a time:
 * 1. Tokenize and group the input
 * 2. Translate the whole text
 * 3. Translate each phrase group in order, skipping punctuation-only groups
 *
 * Intermediate results live in a run-local accumulator and reach observers
 * only through `GlossSnapshot` values published on a watch channel.
 */

use log::{debug, error, info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, watch};

use crate::app_config::Config;
use crate::errors::OrchestrationError;
use crate::grouping::{DEFAULT_MAX_GROUP_SIZE, PhraseGroup, annotate};
use crate::language_utils::TargetLanguage;
use crate::phonetic::PhoneticLookup;
use crate::punctuation::is_pure_punctuation;

use super::Translator;

/// Progress published when a run starts
pub const START_PROGRESS: u8 = 5;

/// Progress once tokens and groups exist
pub const GROUPED_PROGRESS: u8 = 15;

/// Progress once the whole-text translation is in
pub const MAIN_TRANSLATION_PROGRESS: u8 = 30;

/// Share of the bar covered by group translations
const GROUP_PROGRESS_SPAN: usize = 70;

/// Overall progress after `completed` of `total` groups.
///
/// Runs from 30 to exactly 100; an empty group list counts as done.
pub fn progress(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let completed = completed.min(total);
    let percent = MAIN_TRANSLATION_PROGRESS as usize + completed * GROUP_PROGRESS_SPAN / total;
    percent as u8
}

/// Lifecycle of the session's current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// How a call to [`GlossSession::run_orchestration`] ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every group was processed
    Completed,
    /// The input was blank, nothing ran
    SkippedEmptyInput,
}

/// Observable state of a session
#[derive(Debug, Clone, Default, Serialize)]
pub struct GlossSnapshot {
    pub input_text: String,
    pub target_language: TargetLanguage,
    /// Translation of the whole input
    pub main_translation: Option<String>,
    pub groups: Vec<PhraseGroup>,
    /// 0 to 100
    pub progress: u8,
    pub is_loading: bool,
    /// User-facing message of the last failed run
    pub error: Option<String>,
    pub state: RunState,
}

/// Tunables of a session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub max_group_size: usize,
    /// How long the final progress stays visible after a run
    pub progress_reset_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_group_size: DEFAULT_MAX_GROUP_SIZE,
            progress_reset_delay: Duration::from_millis(1000),
        }
    }
}

impl From<&Config> for SessionConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_group_size: config.grouping.max_group_size,
            progress_reset_delay: config.display.progress_reset_delay(),
        }
    }
}

/// Results built up by one run
#[derive(Debug, Default)]
struct RunAccumulator {
    main_translation: Option<String>,
    groups: Vec<PhraseGroup>,
}

/// Drives gloss runs and publishes their state
pub struct GlossSession {
    translator: Arc<dyn Translator>,
    lookup: Arc<dyn PhoneticLookup>,
    config: SessionConfig,
    state: Arc<watch::Sender<GlossSnapshot>>,
    run_guard: Mutex<()>,
    /// Bumped by every run that starts; stale progress resets compare against it
    generation: Arc<AtomicU64>,
    cancel_requested: AtomicBool,
}

impl GlossSession {
    pub fn new(
        translator: Arc<dyn Translator>,
        lookup: Arc<dyn PhoneticLookup>,
        config: SessionConfig,
    ) -> Self {
        let (state, _) = watch::channel(GlossSnapshot::default());
        Self {
            translator,
            lookup,
            config,
            state: Arc::new(state),
            run_guard: Mutex::new(()),
            generation: Arc::new(AtomicU64::new(0)),
            cancel_requested: AtomicBool::new(false),
        }
    }

    /// Receiver that sees every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<GlossSnapshot> {
        self.state.subscribe()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> GlossSnapshot {
        self.state.borrow().clone()
    }

    pub fn set_input_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_modify(|s| s.input_text = text);
    }

    pub fn set_target_language(&self, target_language: TargetLanguage) {
        self.state.send_modify(|s| s.target_language = target_language);
    }

    /// Reset input, translations and error, whatever the run state
    pub fn clear(&self) {
        self.state.send_modify(|s| {
            s.input_text.clear();
            s.main_translation = None;
            s.groups.clear();
            s.error = None;
        });
    }

    /// Ask the in-flight run to stop before its next translation request
    pub fn cancel(&self) {
        if self.is_running() {
            info!("Cancellation requested");
            self.cancel_requested.store(true, Ordering::SeqCst);
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().state == RunState::Running
    }

    /// Tokenize, group and translate the current input.
    ///
    /// Only one run may be in flight; a second call while one is running is
    /// rejected with [`OrchestrationError::AlreadyRunning`] and changes nothing.
    pub async fn run_orchestration(&self) -> Result<RunOutcome, OrchestrationError> {
        let _guard = self.run_guard.try_lock().map_err(|_| {
            warn!("Rejecting translation run: another run is in progress");
            OrchestrationError::AlreadyRunning
        })?;

        let (text, target_language) = {
            let snapshot = self.state.borrow();
            (snapshot.input_text.clone(), snapshot.target_language)
        };

        if text.trim().is_empty() {
            debug!("Input is blank, nothing to translate");
            return Ok(RunOutcome::SkippedEmptyInput);
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.cancel_requested.store(false, Ordering::SeqCst);
        info!(
            "Starting gloss run #{} ({} chars, target {})",
            generation,
            text.chars().count(),
            target_language
        );

        // Results of an earlier run must not show next to this run's groups
        self.state.send_modify(|s| {
            s.state = RunState::Running;
            s.is_loading = true;
            s.progress = START_PROGRESS;
            s.error = None;
            s.main_translation = None;
            s.groups.clear();
        });

        let mut run = RunAccumulator::default();
        let result = self.execute(&text, target_language, &mut run).await;

        let translated = run.groups.iter().filter(|g| g.translation.is_some()).count();
        let error_message = match &result {
            Ok(()) => {
                info!(
                    "Gloss run #{} finished: {} groups, {} translated",
                    generation,
                    run.groups.len(),
                    translated
                );
                None
            }
            Err(OrchestrationError::Cancelled) => {
                warn!("Gloss run #{} cancelled after {} translated groups", generation, translated);
                Some(target_language.cancelled_message().to_string())
            }
            Err(e) => {
                error!("Gloss run #{} failed: {}", generation, e);
                Some(target_language.failure_message().to_string())
            }
        };

        self.state.send_modify(|s| {
            s.main_translation = run.main_translation;
            s.groups = run.groups;
            s.is_loading = false;
            match error_message {
                None => {
                    s.state = RunState::Succeeded;
                    s.progress = 100;
                }
                Some(message) => {
                    s.state = RunState::Failed;
                    s.error = Some(message);
                }
            }
        });

        self.schedule_progress_reset(generation);
        result.map(|()| RunOutcome::Completed)
    }

    async fn execute(
        &self,
        text: &str,
        target_language: TargetLanguage,
        run: &mut RunAccumulator,
    ) -> Result<(), OrchestrationError> {
        run.groups = annotate(text, self.lookup.as_ref(), self.config.max_group_size);
        let groups = run.groups.clone();
        self.state.send_modify(|s| {
            s.groups = groups;
            s.progress = s.progress.max(GROUPED_PROGRESS);
        });

        self.ensure_not_cancelled()?;
        let main = self.translator.translate(text, target_language).await?;
        run.main_translation = Some(main.text.clone());
        self.state.send_modify(|s| {
            s.main_translation = Some(main.text);
            s.progress = s.progress.max(MAIN_TRANSLATION_PROGRESS);
        });

        let total = run.groups.len();
        for index in 0..total {
            let group_text = run.groups[index].text();

            if is_pure_punctuation(&group_text) {
                debug!(
                    "Group {}/{} is punctuation only, skipping: {:?}",
                    index + 1,
                    total,
                    group_text
                );
            } else {
                self.ensure_not_cancelled()?;
                debug!("Translating group {}/{}: {:?}", index + 1, total, group_text);
                let translated = self.translator.translate(&group_text, target_language).await?;
                run.groups[index].translation = Some(translated.text);
            }

            let percent = progress(index + 1, total);
            self.state.send_modify(|s| s.progress = s.progress.max(percent));
        }

        Ok(())
    }

    fn ensure_not_cancelled(&self) -> Result<(), OrchestrationError> {
        if self.cancel_requested.swap(false, Ordering::SeqCst) {
            return Err(OrchestrationError::Cancelled);
        }
        Ok(())
    }

    /// Hide the progress bar after the display delay unless a newer run started
    fn schedule_progress_reset(&self, generation: u64) {
        let state = Arc::clone(&self.state);
        let current_generation = Arc::clone(&self.generation);
        let delay = self.config.progress_reset_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if current_generation.load(Ordering::SeqCst) != generation {
                return;
            }
            state.send_modify(|s| {
                if s.state != RunState::Running {
                    s.progress = 0;
                    s.state = RunState::Idle;
                }
            });
        });
    }
}
