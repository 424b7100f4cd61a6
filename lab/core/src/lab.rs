//! The Lab - headless controller for every panel
//!
//! [`Lab`] owns both stores, the draft, per-panel transient state and the
//! narrator. Surfaces render from its accessors and change it only through
//! its operations. Every store change is mirrored to persistence as an
//! ordered, fire-and-forget snapshot.
//!
//! # AI requests
//!
//! Theme, expansion and refinement requests run as spawned tasks and report
//! back on a channel. Call [`Lab::poll`] from the surface loop to apply
//! whatever has completed; [`Lab::settle`] waits for all of them.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::assistant::{assistant_from_config, ComedyAssistant, GatewayError, RefinedJoke};
use crate::config::{LabConfig, DEFAULT_SHARE_BASE_URL};
use crate::draft::{Draft, DraftField};
use crate::error::ValidationError;
use crate::filter::{filter_bits, filter_entries, DiaryQuery, LibraryQuery};
use crate::guide::GuideSection;
use crate::notice::{Notices, NotifyLevel};
use crate::persistence::{load_state, FileStore, KeyValueStore, PersistenceWriter};
use crate::share::{Clipboard, NoClipboard, NoShareSheet, ShareSheet, SharePayload};
use crate::shortcuts::{shortcut_for, KeyChord, KeyDisposition, Platform, Shortcut};
use crate::speech::{
    engine_from_config, Narrator, NarratorState, SpeakOutcome, SpeechEngine, SPEECH_UNAVAILABLE,
};
use crate::store::{imported_bit, BitStore, DiaryCommit, DiaryStore};
use crate::types::{BitId, DiaryEntry, EntryId, JokeBit, JokePart, JokeParts, Technique};

/// How long a refinement result stays on screen
pub const REFINE_STATUS_TTL: Duration = Duration::from_secs(3);

/// How long a deep-linked guide section stays highlighted
pub const HIGHLIGHT_TTL: Duration = Duration::from_secs(3);

/// How long the "copied" indicator stays on
pub const COPIED_TTL: Duration = Duration::from_secs(2);

// =============================================================================
// Panels
// =============================================================================

/// The five top-level views
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Panel {
    /// Draft editor
    #[default]
    Compose,
    /// Saved bits
    Library,
    /// AI theme ideas
    Themes,
    /// Idea diary
    Diary,
    /// Technique guide
    Guide,
}

impl Panel {
    /// All panels in shortcut order
    pub const ALL: [Panel; 5] = [
        Panel::Compose,
        Panel::Library,
        Panel::Themes,
        Panel::Diary,
        Panel::Guide,
    ];

    /// Panel bound to a digit key (1-5)
    #[must_use]
    pub fn from_number(n: u32) -> Option<Self> {
        let index = usize::try_from(n).ok()?.checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    /// Digit key for this panel
    #[must_use]
    pub fn number(self) -> u32 {
        match self {
            Self::Compose => 1,
            Self::Library => 2,
            Self::Themes => 3,
            Self::Diary => 4,
            Self::Guide => 5,
        }
    }

    /// Display name
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Compose => "Lab",
            Self::Library => "My Bits",
            Self::Themes => "Themes & Insights",
            Self::Diary => "Idea Diary",
            Self::Guide => "Technique Guide",
        }
    }
}

// =============================================================================
// Transient state
// =============================================================================

/// Refinement progress shown next to the draft
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RefineStatus {
    /// Nothing to show
    #[default]
    Idle,
    /// Request in flight
    Refining,
    /// Draft parts were replaced
    Refined {
        /// The model's note on what it changed
        explanation: Option<String>,
    },
    /// Request failed; draft untouched
    Failed,
}

/// Theme ideas and their expansions
#[derive(Clone, Debug, Default)]
pub struct ThemesState {
    /// Optional context typed by the user
    pub context: String,
    /// Theme list request in flight
    pub loading: bool,
    /// Current theme ideas
    pub themes: Vec<String>,
    /// Theme indexes with an expansion in flight
    pub expanding: HashSet<usize>,
    /// Expanded suggestions by theme index
    pub suggestions: HashMap<usize, Vec<JokeParts>>,
    generation: u64,
}

#[derive(Debug)]
enum Completion {
    Themes {
        generation: u64,
        themes: Vec<String>,
    },
    Expansion {
        generation: u64,
        index: usize,
        suggestions: Vec<JokeParts>,
    },
    Refined(Result<RefinedJoke, GatewayError>),
}

/// What sharing a guide section did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The share sheet took it
    Shared,
    /// The link was copied instead
    Copied(String),
    /// Neither facility worked
    Failed,
}

// =============================================================================
// Services
// =============================================================================

/// External collaborators the lab is built over
pub struct LabServices {
    /// AI gateway
    pub assistant: ComedyAssistant,
    /// Speech synthesis
    pub speech: Arc<dyn SpeechEngine>,
    /// Persistent key-value storage
    pub storage: Arc<dyn KeyValueStore>,
    /// Native share facility
    pub share_sheet: Box<dyn ShareSheet>,
    /// System clipboard
    pub clipboard: Box<dyn Clipboard>,
    /// Prefix of shared guide links
    pub share_base_url: String,
    /// Decides the primary shortcut modifier
    pub platform: Platform,
}

impl LabServices {
    /// Services with no share sheet or clipboard
    pub fn new(
        assistant: ComedyAssistant,
        speech: Arc<dyn SpeechEngine>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            assistant,
            speech,
            storage,
            share_sheet: Box::new(NoShareSheet),
            clipboard: Box::new(NoClipboard),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            platform: Platform::current(),
        }
    }

    /// Services described by configuration
    pub fn from_config(config: &LabConfig) -> Self {
        let mut services = Self::new(
            assistant_from_config(&config.assistant),
            engine_from_config(&config.speech),
            Arc::new(FileStore::new(config.data_dir.clone())),
        );
        services.share_base_url = config.share_base_url.clone();
        services
    }

    /// Use a share sheet
    #[must_use]
    pub fn with_share_sheet(mut self, share_sheet: Box<dyn ShareSheet>) -> Self {
        self.share_sheet = share_sheet;
        self
    }

    /// Use a clipboard
    #[must_use]
    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Force a platform
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }
}

// =============================================================================
// Lab
// =============================================================================

/// Headless state and operations for the whole application
pub struct Lab {
    bits: BitStore,
    diary: DiaryStore,
    draft: Draft,
    technique: Technique,
    panel: Panel,

    library_query: LibraryQuery,
    diary_query: DiaryQuery,
    themes: ThemesState,

    refine_status: RefineStatus,
    refine_settled_at: Option<Instant>,
    highlight: Option<(GuideSection, Instant)>,
    copied_at: Option<Instant>,

    notices: Notices,
    narrator: Narrator,

    assistant: ComedyAssistant,
    writer: PersistenceWriter,
    share_sheet: Box<dyn ShareSheet>,
    clipboard: Box<dyn Clipboard>,
    share_base_url: String,
    platform: Platform,

    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl std::fmt::Debug for Lab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lab")
            .field("panel", &self.panel)
            .field("bits", &self.bits.len())
            .field("diary", &self.diary.len())
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl Lab {
    /// Load persisted state and start the persistence writer
    ///
    /// Must be called inside a tokio runtime.
    pub async fn open(services: LabServices) -> Self {
        let state = load_state(services.storage.as_ref()).await;
        tracing::info!(
            bits = state.bits.len(),
            diary = state.diary.len(),
            backend = services.assistant.backend_name(),
            model = services.assistant.model(),
            "Lab opened"
        );

        let diary = DiaryStore::restore(state.diary, state.selected);
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        Self {
            bits: BitStore::from_bits(state.bits),
            diary,
            draft: Draft::default(),
            technique: Technique::default(),
            panel: Panel::default(),
            library_query: LibraryQuery::default(),
            diary_query: DiaryQuery::default(),
            themes: ThemesState::default(),
            refine_status: RefineStatus::Idle,
            refine_settled_at: None,
            highlight: None,
            copied_at: None,
            notices: Notices::default(),
            narrator: Narrator::new(services.speech),
            assistant: services.assistant,
            writer: PersistenceWriter::spawn(services.storage),
            share_sheet: services.share_sheet,
            clipboard: services.clipboard,
            share_base_url: services.share_base_url,
            platform: services.platform,
            completions_tx,
            completions_rx,
            in_flight: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Active panel
    #[must_use]
    pub fn panel(&self) -> Panel {
        self.panel
    }

    /// Switch panels; in-flight requests keep running
    pub fn set_panel(&mut self, panel: Panel) {
        if self.panel != panel {
            tracing::debug!(?panel, "Switching panel");
            self.panel = panel;
        }
    }

    /// Saved bits, newest first
    #[must_use]
    pub fn bits(&self) -> &[JokeBit] {
        self.bits.bits()
    }

    /// The diary store
    #[must_use]
    pub fn diary(&self) -> &DiaryStore {
        &self.diary
    }

    /// The draft
    #[must_use]
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Edit one draft field
    pub fn draft_field_mut(&mut self, field: DraftField) -> &mut String {
        self.draft.field_mut(field)
    }

    /// Technique chosen for the draft
    #[must_use]
    pub fn technique(&self) -> Technique {
        self.technique
    }

    /// Choose the draft's technique
    pub fn set_technique(&mut self, technique: Technique) {
        self.technique = technique;
    }

    /// Library search and technique filter
    #[must_use]
    pub fn library_query(&self) -> &LibraryQuery {
        &self.library_query
    }

    /// Edit the library search and filter
    pub fn library_query_mut(&mut self) -> &mut LibraryQuery {
        &mut self.library_query
    }

    /// Diary search
    #[must_use]
    pub fn diary_query(&self) -> &DiaryQuery {
        &self.diary_query
    }

    /// Edit the diary search
    pub fn diary_query_mut(&mut self) -> &mut DiaryQuery {
        &mut self.diary_query
    }

    /// Bits matching the library query, store order
    #[must_use]
    pub fn visible_bits(&self) -> Vec<&JokeBit> {
        filter_bits(self.bits.bits(), &self.library_query)
    }

    /// Diary entries matching the diary search, store order
    #[must_use]
    pub fn visible_entries(&self) -> Vec<&DiaryEntry> {
        filter_entries(self.diary.entries(), &self.diary_query)
    }

    /// Theme panel state
    #[must_use]
    pub fn themes(&self) -> &ThemesState {
        &self.themes
    }

    /// Edit the theme context text
    pub fn theme_context_mut(&mut self) -> &mut String {
        &mut self.themes.context
    }

    /// Edit the diary composer text
    pub fn diary_text_mut(&mut self) -> &mut String {
        self.diary.composer_text_mut()
    }

    /// Refinement status
    #[must_use]
    pub fn refine_status(&self) -> &RefineStatus {
        &self.refine_status
    }

    /// Narrator state
    #[must_use]
    pub fn narration(&self) -> NarratorState {
        self.narrator.state()
    }

    /// Notices still on screen
    #[must_use]
    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    /// Dismiss every notice
    pub fn dismiss_notices(&mut self) {
        self.notices.clear();
    }

    /// Guide section currently highlighted by a deep link
    #[must_use]
    pub fn highlighted_section(&self) -> Option<GuideSection> {
        self.highlight.map(|(section, _)| section)
    }

    /// Whether the "copied" indicator is on
    #[must_use]
    pub fn link_copied(&self) -> bool {
        self.copied_at.is_some()
    }

    /// Platform deciding the primary modifier
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// AI requests still running
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    // -------------------------------------------------------------------------
    // Bits
    // -------------------------------------------------------------------------

    /// Save the draft as a new bit at the front of the library
    pub fn save(&mut self) -> Result<BitId, ValidationError> {
        if !self.draft.is_saveable() {
            return Err(self.reject(ValidationError::MissingPremiseOrPunchline));
        }

        let id = self.bits.insert_from_draft(&self.draft, self.technique);
        tracing::info!(id = %id, technique = %self.technique, "Saved bit");
        self.persist_bits();
        self.draft = Draft::default();
        self.set_panel(Panel::Library);
        Ok(id)
    }

    /// Delete a bit; unknown IDs are ignored
    pub fn remove_bit(&mut self, id: &BitId) {
        if self.bits.remove(id) {
            tracing::info!(id = %id, "Removed bit");
            self.persist_bits();
        }
    }

    /// Copy a saved bit into the draft; saving again creates a new bit
    pub fn load_bit_into_draft(&mut self, id: &BitId) -> bool {
        let Some(bit) = self.bits.get(id) else {
            return false;
        };
        self.draft = Draft::from_bit(bit);
        self.technique = bit.technique;
        self.set_panel(Panel::Compose);
        true
    }

    /// Turn every selected diary entry into a draft bit
    pub fn bulk_import(&mut self) -> Result<usize, ValidationError> {
        let batch: Vec<JokeBit> = self
            .diary
            .selected_entries()
            .into_iter()
            .map(imported_bit)
            .collect();
        if batch.is_empty() {
            return Err(self.reject(ValidationError::EmptySelection));
        }

        let count = batch.len();
        self.bits.prepend(batch);
        self.diary.select_none();
        self.persist_bits();
        self.persist_selection();
        self.set_panel(Panel::Library);

        tracing::info!(count, "Imported diary entries");
        let noun = if count == 1 { "idea" } else { "ideas" };
        self.notices.post(
            NotifyLevel::Success,
            format!("{count} {noun} imported as drafts into your library"),
        );
        Ok(count)
    }

    /// Reset the library search and technique filter
    pub fn clear_library_filters(&mut self) {
        self.library_query = LibraryQuery::default();
    }

    // -------------------------------------------------------------------------
    // Diary
    // -------------------------------------------------------------------------

    /// Commit the composer as a new entry or as the edit in progress
    pub fn add_diary_entry(&mut self) -> DiaryCommit {
        let commit = self.diary.commit();
        match &commit {
            DiaryCommit::Ignored => {}
            DiaryCommit::Added(id) => {
                tracing::debug!(id = %id, "Added diary entry");
                self.persist_diary();
            }
            DiaryCommit::Updated(id) => {
                tracing::debug!(id = %id, "Updated diary entry");
                self.persist_diary();
            }
        }
        commit
    }

    /// Load an entry into the composer for editing
    pub fn begin_edit(&mut self, id: &EntryId) -> bool {
        self.diary.begin_edit(id)
    }

    /// Abandon the edit in progress
    pub fn cancel_edit(&mut self) {
        self.diary.cancel_edit();
    }

    /// Delete an entry along with its selection
    pub fn remove_diary_entry(&mut self, id: &EntryId) {
        let was_selected = self.diary.is_selected(id);
        if self.diary.remove(id) {
            self.persist_diary();
            if was_selected {
                self.persist_selection();
            }
        }
    }

    /// Flip one entry's selection
    pub fn toggle_select(&mut self, id: &EntryId) {
        self.diary.toggle_select(id);
        self.persist_selection();
    }

    /// Select every entry
    pub fn select_all(&mut self) {
        if !self.diary.all_selected() {
            self.diary.select_all();
            self.persist_selection();
        }
    }

    /// Clear the selection
    pub fn select_none(&mut self) {
        self.diary.select_none();
        self.persist_selection();
    }

    /// Select none if everything is selected, otherwise all
    pub fn toggle_select_all(&mut self) {
        self.diary.toggle_select_all();
        self.persist_selection();
    }

    /// Start a draft from a diary entry
    pub fn send_entry_to_lab(&mut self, id: &EntryId) -> bool {
        let Some(entry) = self.diary.get(id) else {
            return false;
        };
        self.draft = Draft::from_diary_entry(entry);
        self.set_panel(Panel::Compose);
        true
    }

    /// Reset the diary search
    pub fn clear_diary_search(&mut self) {
        self.diary_query = DiaryQuery::default();
    }

    // -------------------------------------------------------------------------
    // Themes
    // -------------------------------------------------------------------------

    /// Ask for fresh theme ideas; ignored while a request is running
    pub fn request_themes(&mut self) -> bool {
        if self.themes.loading {
            return false;
        }
        self.themes.loading = true;
        self.themes.generation += 1;
        self.themes.suggestions.clear();
        self.themes.expanding.clear();

        let context = Some(self.themes.context.trim().to_string()).filter(|c| !c.is_empty());
        let generation = self.themes.generation;
        let assistant = self.assistant.clone();
        self.spawn(async move {
            let themes = assistant.generate_themes(context.as_deref()).await;
            Completion::Themes { generation, themes }
        });
        true
    }

    /// Expand one theme into suggestions; one request per index at a time
    pub fn expand_theme(&mut self, index: usize) -> bool {
        let Some(theme) = self.themes.themes.get(index).cloned() else {
            return false;
        };
        if !self.themes.expanding.insert(index) {
            return false;
        }

        let generation = self.themes.generation;
        let assistant = self.assistant.clone();
        self.spawn(async move {
            let suggestions = assistant.expand_theme(&theme).await;
            Completion::Expansion {
                generation,
                index,
                suggestions,
            }
        });
        true
    }

    /// Start a draft whose premise is a theme
    pub fn use_theme(&mut self, index: usize) -> bool {
        let Some(theme) = self.themes.themes.get(index) else {
            return false;
        };
        self.draft = Draft::from_theme(theme);
        self.set_panel(Panel::Compose);
        true
    }

    /// Start a draft from an expanded suggestion
    pub fn use_suggestion(&mut self, index: usize, suggestion: usize) -> bool {
        let Some(theme) = self.themes.themes.get(index) else {
            return false;
        };
        let Some(parts) = self
            .themes
            .suggestions
            .get(&index)
            .and_then(|list| list.get(suggestion))
        else {
            return false;
        };
        self.draft = Draft::from_suggestion(theme, parts);
        self.set_panel(Panel::Compose);
        true
    }

    // -------------------------------------------------------------------------
    // Refinement
    // -------------------------------------------------------------------------

    /// Send the draft's parts to the assistant with the chosen technique
    pub fn refine(&mut self) -> Result<(), ValidationError> {
        if self.refine_status == RefineStatus::Refining {
            return Ok(());
        }
        if self.draft.premise.trim().is_empty() {
            return Err(self.reject(ValidationError::MissingPremise));
        }

        self.refine_status = RefineStatus::Refining;
        self.refine_settled_at = None;

        let parts = self.draft.parts();
        let technique = self.technique;
        let assistant = self.assistant.clone();
        tracing::info!(%technique, "Refining draft");
        self.spawn(async move {
            Completion::Refined(assistant.refine_joke(&parts, technique).await)
        });
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Speech
    // -------------------------------------------------------------------------

    /// Read one draft part aloud
    pub fn speak(&mut self, part: JokePart) {
        let text = self.draft.field(part.into()).to_string();
        if let SpeakOutcome::Unavailable { notify: true } = self.narrator.speak(part, &text) {
            self.notices.post(NotifyLevel::Warning, SPEECH_UNAVAILABLE);
        }
    }

    /// Stop reading
    pub fn stop_speaking(&mut self) {
        self.narrator.stop();
    }

    // -------------------------------------------------------------------------
    // Guide
    // -------------------------------------------------------------------------

    /// Follow a `#guide-<id>` link; anything else is ignored
    pub fn open_deep_link(&mut self, link: &str) -> bool {
        let Some(section) = GuideSection::from_link(link) else {
            tracing::debug!(link, "Ignoring unrecognised link");
            return false;
        };
        self.set_panel(Panel::Guide);
        self.highlight = Some((section, Instant::now()));
        true
    }

    /// Share a section's link, copying it when no share sheet is available
    pub fn share_guide_section(&mut self, section: GuideSection) -> ShareOutcome {
        let payload = SharePayload::for_section(section, &self.share_base_url);
        match self.share_sheet.share(&payload) {
            Ok(()) => return ShareOutcome::Shared,
            Err(e) => tracing::debug!(error = %e, "Share sheet unavailable, copying link"),
        }

        match self.clipboard.set_text(&payload.url) {
            Ok(()) => {
                self.copied_at = Some(Instant::now());
                self.notices
                    .post(NotifyLevel::Success, format!("Link copied: {}", payload.url));
                ShareOutcome::Copied(payload.url)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not copy link");
                self.notices
                    .post(NotifyLevel::Error, format!("Could not copy link: {e}"));
                ShareOutcome::Failed
            }
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard
    // -------------------------------------------------------------------------

    /// Apply a global shortcut if the chord is one
    pub fn handle_key(&mut self, chord: &KeyChord) -> KeyDisposition {
        let Some(shortcut) = shortcut_for(chord, self.panel, self.platform) else {
            return KeyDisposition::Ignored;
        };

        match shortcut {
            Shortcut::SwitchPanel(panel) => self.set_panel(panel),
            Shortcut::Save => {
                let _ = self.save();
            }
            Shortcut::Refine => {
                let _ = self.refine();
            }
            Shortcut::BulkImport => {
                if !self.diary.selection().is_empty() {
                    let _ = self.bulk_import();
                }
            }
        }
        KeyDisposition::Consumed
    }

    // -------------------------------------------------------------------------
    // Event loop plumbing
    // -------------------------------------------------------------------------

    /// Apply completed AI requests and speech events
    ///
    /// Returns true if anything changed.
    pub fn poll(&mut self) -> bool {
        let mut activity = self.narrator.poll() > 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply_completion(completion);
            activity = true;
        }
        activity
    }

    /// Wait until every AI request has completed and been applied
    pub async fn settle(&mut self) {
        self.poll();
        while self.in_flight > 0 {
            match self.completions_rx.recv().await {
                Some(completion) => self.apply_completion(completion),
                None => break,
            }
        }
    }

    /// Expire timed indicators
    pub fn tick(&mut self, now: Instant) {
        self.notices.expire(now);

        if let Some(at) = self.refine_settled_at {
            if now.saturating_duration_since(at) >= REFINE_STATUS_TTL {
                self.refine_status = RefineStatus::Idle;
                self.refine_settled_at = None;
            }
        }
        if let Some((_, at)) = self.highlight {
            if now.saturating_duration_since(at) >= HIGHLIGHT_TTL {
                self.highlight = None;
            }
        }
        if let Some(at) = self.copied_at {
            if now.saturating_duration_since(at) >= COPIED_TTL {
                self.copied_at = None;
            }
        }
    }

    /// Stop speech and wait for pending writes
    pub async fn shutdown(&mut self) {
        self.narrator.stop();
        self.writer.flush().await;
        tracing::info!(in_flight = self.in_flight, "Lab shut down");
    }

    /// Wait until every queued write has reached storage
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn spawn<F>(&mut self, request: F)
    where
        F: std::future::Future<Output = Completion> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(request.await);
        });
    }

    fn apply_completion(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match completion {
            Completion::Themes { generation, themes } => {
                if generation != self.themes.generation {
                    return;
                }
                self.themes.loading = false;
                if themes.is_empty() {
                    self.notices
                        .post(NotifyLevel::Warning, "No theme ideas came back, try again");
                }
                self.themes.themes = themes;
            }
            Completion::Expansion {
                generation,
                index,
                suggestions,
            } => {
                if generation != self.themes.generation {
                    tracing::debug!(index, "Dropping expansion for a replaced theme list");
                    return;
                }
                self.themes.expanding.remove(&index);
                if suggestions.is_empty() {
                    self.notices
                        .post(NotifyLevel::Warning, "No suggestions came back for that theme");
                    return;
                }
                self.themes.suggestions.insert(index, suggestions);
            }
            Completion::Refined(Ok(refined)) => {
                self.draft.apply_parts(refined.parts);
                self.refine_status = RefineStatus::Refined {
                    explanation: refined.explanation,
                };
                self.refine_settled_at = Some(Instant::now());
            }
            Completion::Refined(Err(e)) => {
                tracing::debug!(error = %e, "Draft left untouched");
                self.refine_status = RefineStatus::Failed;
                self.refine_settled_at = Some(Instant::now());
            }
        }
    }

    fn reject(&mut self, error: ValidationError) -> ValidationError {
        self.notices.post(NotifyLevel::Warning, error.to_string());
        error
    }

    fn persist_bits(&self) {
        self.writer.save_bits(self.bits.bits());
    }

    fn persist_diary(&self) {
        self.writer.save_diary(self.diary.entries());
    }

    fn persist_selection(&self) {
        self.writer.save_selection(self.diary.selection());
    }
}
