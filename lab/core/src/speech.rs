//! Speech Narrator
//!
//! Reads one joke part aloud at a time and tracks progress through it.
//!
//! ```text
//!            speak(part, text)
//!   Idle ─────────────────────────▶ Speaking { part, utterance, progress }
//!    ▲                                   │
//!    └──── end / error / stop() ─────────┘
//! ```
//!
//! Engines report events tagged with the utterance they belong to. Starting
//! a new utterance cancels the previous one, and any late events from it are
//! discarded, so progress always describes what is being heard.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use crate::config::SpeechConfig;
use crate::types::JokePart;

/// Utterance identifier, unique per narrator
pub type UtteranceId = u64;

/// Something an engine observed about an utterance
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeechEventKind {
    /// A word or sentence starts at this character index
    Boundary {
        /// Index in characters from the start of the text
        char_index: usize,
    },
    /// Playback finished
    End,
    /// Playback failed
    Error(String),
}

/// An engine event tagged with its utterance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeechEvent {
    /// Utterance the event belongs to
    pub utterance: UtteranceId,
    /// What happened
    pub kind: SpeechEventKind,
}

impl SpeechEvent {
    /// Create an event
    #[must_use]
    pub fn new(utterance: UtteranceId, kind: SpeechEventKind) -> Self {
        Self { utterance, kind }
    }
}

/// Speech synthesis capability
pub trait SpeechEngine: Send + Sync {
    /// Whether the engine can speak at all
    fn is_available(&self) -> bool;

    /// Start speaking; events for `utterance` go to `events`
    fn speak(&self, utterance: UtteranceId, text: &str, events: mpsc::UnboundedSender<SpeechEvent>);

    /// Stop whatever is being spoken
    fn cancel(&self);
}

/// Narrator state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NarratorState {
    /// Nothing is being read
    #[default]
    Idle,
    /// A part is being read
    Speaking {
        /// Which part
        part: JokePart,
        /// Current utterance
        utterance: UtteranceId,
        /// Percent of the text reached, 0-100
        progress: u8,
    },
}

/// Result of a speak request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// Reading started
    Started(UtteranceId),
    /// Blank text, nothing to read; any current reading is stopped
    Ignored,
    /// No synthesizer; `notify` is true only the first time
    Unavailable {
        /// Whether the user should be told
        notify: bool,
    },
}

/// Notice shown the first time speech is unavailable
pub const SPEECH_UNAVAILABLE: &str = "Speech synthesis is not available on this system";

/// Single-flight read-aloud state machine
pub struct Narrator {
    engine: Arc<dyn SpeechEngine>,
    state: NarratorState,
    next_utterance: UtteranceId,
    text_chars: usize,
    unavailable_reported: bool,
    events_tx: mpsc::UnboundedSender<SpeechEvent>,
    events_rx: mpsc::UnboundedReceiver<SpeechEvent>,
}

impl std::fmt::Debug for Narrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Narrator")
            .field("state", &self.state)
            .field("next_utterance", &self.next_utterance)
            .finish_non_exhaustive()
    }
}

impl Narrator {
    /// Narrator over an engine
    pub fn new(engine: Arc<dyn SpeechEngine>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            engine,
            state: NarratorState::Idle,
            next_utterance: 1,
            text_chars: 0,
            unavailable_reported: false,
            events_tx,
            events_rx,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> NarratorState {
        self.state
    }

    /// Whether this part is being read
    #[must_use]
    pub fn is_speaking(&self, part: JokePart) -> bool {
        matches!(self.state, NarratorState::Speaking { part: p, .. } if p == part)
    }

    /// Progress through the current part, 0 when idle
    #[must_use]
    pub fn progress(&self) -> u8 {
        match self.state {
            NarratorState::Speaking { progress, .. } => progress,
            NarratorState::Idle => 0,
        }
    }

    /// Start reading a part, cancelling anything already being read
    pub fn speak(&mut self, part: JokePart, text: &str) -> SpeakOutcome {
        if text.trim().is_empty() {
            self.stop();
            return SpeakOutcome::Ignored;
        }
        if !self.engine.is_available() {
            let notify = !self.unavailable_reported;
            self.unavailable_reported = true;
            return SpeakOutcome::Unavailable { notify };
        }

        if let NarratorState::Speaking { utterance, .. } = self.state {
            tracing::debug!(utterance, "Cancelling utterance for a new one");
            self.engine.cancel();
        }

        let utterance = self.next_utterance;
        self.next_utterance += 1;
        self.text_chars = text.chars().count();
        self.state = NarratorState::Speaking {
            part,
            utterance,
            progress: 0,
        };
        self.engine.speak(utterance, text, self.events_tx.clone());
        SpeakOutcome::Started(utterance)
    }

    /// Stop reading
    pub fn stop(&mut self) {
        if matches!(self.state, NarratorState::Speaking { .. }) {
            self.engine.cancel();
        }
        self.state = NarratorState::Idle;
    }

    /// Apply one engine event; events for other utterances are dropped
    pub fn apply(&mut self, event: SpeechEvent) {
        let NarratorState::Speaking { part, utterance, .. } = self.state else {
            tracing::trace!(utterance = event.utterance, "Speech event while idle");
            return;
        };
        if event.utterance != utterance {
            tracing::trace!(stale = event.utterance, current = utterance, "Stale speech event");
            return;
        }

        self.state = match event.kind {
            SpeechEventKind::Boundary { char_index } => NarratorState::Speaking {
                part,
                utterance,
                progress: progress_percent(char_index, self.text_chars),
            },
            SpeechEventKind::End => NarratorState::Idle,
            SpeechEventKind::Error(message) => {
                tracing::warn!(utterance, error = %message, "Speech synthesis failed");
                NarratorState::Idle
            }
        };
    }

    /// Apply every event received so far; returns how many were processed
    pub fn poll(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            processed += 1;
        }
        processed
    }
}

/// `min(100, char_index * 100 / text_chars)`
#[must_use]
pub fn progress_percent(char_index: usize, text_chars: usize) -> u8 {
    if text_chars == 0 {
        return 0;
    }
    (char_index.saturating_mul(100) / text_chars).min(100) as u8
}

// =============================================================================
// Engines
// =============================================================================

/// Engine for systems without a synthesizer
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSpeechEngine;

impl SpeechEngine for NullSpeechEngine {
    fn is_available(&self) -> bool {
        false
    }

    fn speak(&self, _utterance: UtteranceId, _text: &str, _events: mpsc::UnboundedSender<SpeechEvent>) {}

    fn cancel(&self) {}
}

/// Runs an external synthesizer such as `espeak-ng`
///
/// The program does not report progress, so word boundaries are estimated
/// from the configured speaking rate while the process runs.
#[derive(Debug)]
pub struct CommandSpeechEngine {
    program: PathBuf,
    voice: String,
    words_per_minute: u32,
    available: bool,
    kill_switch: Mutex<Option<oneshot::Sender<()>>>,
}

impl CommandSpeechEngine {
    /// Engine for a program, voice and rate
    pub fn new(program: impl Into<PathBuf>, voice: impl Into<String>, words_per_minute: u32) -> Self {
        let program = program.into();
        let available = find_program(&program).is_some();
        if !available {
            tracing::info!(program = %program.display(), "Speech program not found");
        }
        Self {
            program,
            voice: voice.into(),
            words_per_minute: words_per_minute.max(1),
            available,
            kill_switch: Mutex::new(None),
        }
    }

    /// Engine from configuration
    #[must_use]
    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(&config.program, &config.voice, config.words_per_minute)
    }

    /// Interval between estimated word boundaries
    #[must_use]
    pub fn word_interval(&self) -> Duration {
        Duration::from_millis(60_000 / u64::from(self.words_per_minute))
    }
}

/// Character index where each word starts
#[must_use]
pub fn word_starts(text: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut in_word = false;
    for (index, ch) in text.chars().enumerate() {
        if ch.is_whitespace() {
            in_word = false;
        } else if !in_word {
            in_word = true;
            starts.push(index);
        }
    }
    starts
}

/// Resolve a program name against `PATH`
fn find_program(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 {
        return program.is_file().then(|| program.to_path_buf());
    }
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

impl SpeechEngine for CommandSpeechEngine {
    fn is_available(&self) -> bool {
        self.available
    }

    fn speak(&self, utterance: UtteranceId, text: &str, events: mpsc::UnboundedSender<SpeechEvent>) {
        let (kill_tx, mut kill_rx) = oneshot::channel();
        if let Some(previous) = self.kill_switch.lock().replace(kill_tx) {
            let _ = previous.send(());
        }

        let mut command = tokio::process::Command::new(&self.program);
        command
            .arg("-v")
            .arg(&self.voice)
            .arg("-s")
            .arg(self.words_per_minute.to_string())
            .arg(text)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true);

        let starts = word_starts(text);
        let interval = self.word_interval();

        tokio::spawn(async move {
            let mut child = match command.spawn() {
                Ok(child) => child,
                Err(e) => {
                    let _ = events.send(SpeechEvent::new(
                        utterance,
                        SpeechEventKind::Error(format!("failed to start synthesizer: {e}")),
                    ));
                    return;
                }
            };

            let mut ticker = tokio::time::interval(interval);
            let mut next_word = 0;

            loop {
                tokio::select! {
                    status = child.wait() => {
                        let kind = match status {
                            Ok(status) if status.success() => SpeechEventKind::End,
                            Ok(status) => SpeechEventKind::Error(format!("synthesizer exited with {status}")),
                            Err(e) => SpeechEventKind::Error(e.to_string()),
                        };
                        let _ = events.send(SpeechEvent::new(utterance, kind));
                        return;
                    }
                    _ = &mut kill_rx => {
                        let _ = child.kill().await;
                        return;
                    }
                    _ = ticker.tick() => {
                        if let Some(&char_index) = starts.get(next_word) {
                            next_word += 1;
                            let _ = events.send(SpeechEvent::new(
                                utterance,
                                SpeechEventKind::Boundary { char_index },
                            ));
                        }
                    }
                }
            }
        });
    }

    fn cancel(&self) {
        if let Some(kill) = self.kill_switch.lock().take() {
            let _ = kill.send(());
        }
    }
}

/// Engine selected by configuration
#[must_use]
pub fn engine_from_config(config: &SpeechConfig) -> Arc<dyn SpeechEngine> {
    if config.enabled {
        Arc::new(CommandSpeechEngine::from_config(config))
    } else {
        Arc::new(NullSpeechEngine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Records calls; events are injected by the test
    #[derive(Default)]
    struct FakeEngine {
        spoken: Mutex<Vec<(UtteranceId, String)>>,
        cancels: Mutex<usize>,
        sender: Mutex<Option<mpsc::UnboundedSender<SpeechEvent>>>,
    }

    impl FakeEngine {
        fn emit(&self, utterance: UtteranceId, kind: SpeechEventKind) {
            if let Some(tx) = self.sender.lock().as_ref() {
                tx.send(SpeechEvent::new(utterance, kind)).unwrap();
            }
        }
    }

    impl SpeechEngine for FakeEngine {
        fn is_available(&self) -> bool {
            true
        }

        fn speak(&self, utterance: UtteranceId, text: &str, events: mpsc::UnboundedSender<SpeechEvent>) {
            self.spoken.lock().push((utterance, text.to_string()));
            *self.sender.lock() = Some(events);
        }

        fn cancel(&self) {
            *self.cancels.lock() += 1;
        }
    }

    #[test]
    fn test_progress_percent_is_clamped() {
        assert_eq!(progress_percent(0, 10), 0);
        assert_eq!(progress_percent(5, 10), 50);
        assert_eq!(progress_percent(25, 10), 100);
        assert_eq!(progress_percent(3, 0), 0);
    }

    #[test]
    fn test_word_starts() {
        assert_eq!(word_starts("  one two\tthree"), vec![2, 6, 10]);
        assert!(word_starts("   ").is_empty());
        assert_eq!(word_starts("é b"), vec![0, 2]);
    }

    #[test]
    fn test_blank_text_is_ignored() {
        let mut narrator = Narrator::new(Arc::new(FakeEngine::default()));
        assert_eq!(narrator.speak(JokePart::Setup, "  "), SpeakOutcome::Ignored);
        assert_eq!(narrator.state(), NarratorState::Idle);
    }

    #[test]
    fn test_blank_text_stops_current_reading() {
        let engine = Arc::new(FakeEngine::default());
        let mut narrator = Narrator::new(engine.clone());
        narrator.speak(JokePart::Premise, "hello there");
        assert!(narrator.is_speaking(JokePart::Premise));

        assert_eq!(narrator.speak(JokePart::Setup, "   "), SpeakOutcome::Ignored);
        assert_eq!(narrator.state(), NarratorState::Idle);
        assert_eq!(*engine.cancels.lock(), 1);
        assert_eq!(engine.spoken.lock().len(), 1);
    }

    #[test]
    fn test_unavailable_notifies_once() {
        let mut narrator = Narrator::new(Arc::new(NullSpeechEngine));
        assert_eq!(
            narrator.speak(JokePart::Premise, "hello"),
            SpeakOutcome::Unavailable { notify: true }
        );
        assert_eq!(
            narrator.speak(JokePart::Premise, "hello"),
            SpeakOutcome::Unavailable { notify: false }
        );
        assert_eq!(narrator.state(), NarratorState::Idle);
    }

    #[test]
    fn test_progress_and_end() {
        let engine = Arc::new(FakeEngine::default());
        let mut narrator = Narrator::new(engine.clone());

        let SpeakOutcome::Started(id) = narrator.speak(JokePart::Punchline, "0123456789") else {
            panic!("expected speech to start");
        };
        assert!(narrator.is_speaking(JokePart::Punchline));
        assert_eq!(narrator.progress(), 0);

        engine.emit(id, SpeechEventKind::Boundary { char_index: 5 });
        narrator.poll();
        assert_eq!(narrator.progress(), 50);

        engine.emit(id, SpeechEventKind::End);
        narrator.poll();
        assert_eq!(narrator.state(), NarratorState::Idle);
        assert_eq!(narrator.progress(), 0);
    }

    #[test]
    fn test_new_utterance_cancels_and_discards_stale_events() {
        let engine = Arc::new(FakeEngine::default());
        let mut narrator = Narrator::new(engine.clone());

        let SpeakOutcome::Started(first) = narrator.speak(JokePart::Premise, "first text") else {
            panic!("expected speech to start");
        };
        let SpeakOutcome::Started(second) = narrator.speak(JokePart::Setup, "second") else {
            panic!("expected speech to start");
        };
        assert_ne!(first, second);
        assert_eq!(*engine.cancels.lock(), 1);

        engine.emit(first, SpeechEventKind::End);
        narrator.poll();
        assert!(narrator.is_speaking(JokePart::Setup));

        engine.emit(second, SpeechEventKind::Error("device busy".into()));
        narrator.poll();
        assert_eq!(narrator.state(), NarratorState::Idle);
    }

    #[test]
    fn test_stop_returns_to_idle() {
        let engine = Arc::new(FakeEngine::default());
        let mut narrator = Narrator::new(engine.clone());
        narrator.speak(JokePart::Premise, "text");
        narrator.stop();
        assert_eq!(narrator.state(), NarratorState::Idle);
        assert_eq!(*engine.cancels.lock(), 1);

        narrator.stop();
        assert_eq!(*engine.cancels.lock(), 1);
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let engine = CommandSpeechEngine::new("/definitely/not/a/synth", "pt-br", 160);
        assert!(!engine.is_available());
        assert_eq!(engine.word_interval(), Duration::from_millis(375));
    }
}
