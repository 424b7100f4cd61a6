//! Bit and Diary Stores
//!
//! Two flat, most-recent-first collections. The diary store also owns the
//! selection set used for bulk import and the diary composer, so the
//! "no dangling selection" invariant is enforced in one place.

use std::collections::HashSet;

use crate::draft::Draft;
use crate::types::{now_millis, BitId, DiaryEntry, EntryId, JokeBit, JokeParts, Technique};

/// Title of bits created by bulk import
pub const IMPORTED_TITLE: &str = "Imported from Diary";

/// Tags seeded on bits created by bulk import
pub const IMPORTED_TAGS: [&str; 2] = ["diary", "draft"];

/// Saved joke bits, newest first
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitStore {
    bits: Vec<JokeBit>,
}

impl BitStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already ordered collection (newest first)
    #[must_use]
    pub fn from_bits(bits: Vec<JokeBit>) -> Self {
        Self { bits }
    }

    /// All bits, newest first
    #[must_use]
    pub fn bits(&self) -> &[JokeBit] {
        &self.bits
    }

    /// Number of bits
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True when nothing is saved
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Look up a bit
    #[must_use]
    pub fn get(&self, id: &BitId) -> Option<&JokeBit> {
        self.bits.iter().find(|b| &b.id == id)
    }

    /// Build a bit from a validated draft and insert it at the front
    ///
    /// The caller has already checked [`Draft::is_saveable`].
    pub fn insert_from_draft(&mut self, draft: &Draft, technique: Technique) -> BitId {
        let bit = JokeBit {
            id: BitId::generate(),
            title: draft.resolved_title(),
            parts: draft.parts(),
            technique,
            tags: draft.tag_list(),
            created_at: now_millis(),
        };
        let id = bit.id.clone();
        self.bits.insert(0, bit);
        id
    }

    /// Prepend a batch, keeping the batch's own order
    pub fn prepend(&mut self, batch: Vec<JokeBit>) {
        if batch.is_empty() {
            return;
        }
        self.bits.splice(0..0, batch);
    }

    /// Remove a bit; returns whether anything was removed
    pub fn remove(&mut self, id: &BitId) -> bool {
        let before = self.bits.len();
        self.bits.retain(|b| &b.id != id);
        self.bits.len() != before
    }
}

/// Build the draft bit that bulk import creates for a diary entry
#[must_use]
pub fn imported_bit(entry: &DiaryEntry) -> JokeBit {
    JokeBit {
        id: BitId::generate_imported(),
        title: IMPORTED_TITLE.to_string(),
        parts: JokeParts::new(entry.text.clone(), "", ""),
        technique: Technique::Misdirection,
        tags: IMPORTED_TAGS.iter().map(|t| (*t).to_string()).collect(),
        created_at: now_millis(),
    }
}

/// Text box plus edit mode for the diary panel
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiaryComposer {
    /// Current text
    pub text: String,
    /// Entry whose text will be replaced on commit
    pub editing: Option<EntryId>,
}

impl DiaryComposer {
    /// Whether an existing entry is being edited
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }
}

/// What committing the diary composer did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiaryCommit {
    /// Blank text, nothing changed
    Ignored,
    /// A new entry was inserted at the front
    Added(EntryId),
    /// An existing entry's text was replaced
    Updated(EntryId),
}

/// Diary entries (newest first), their selection, and the composer
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiaryStore {
    entries: Vec<DiaryEntry>,
    selected: HashSet<EntryId>,
    composer: DiaryComposer,
}

impl DiaryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore persisted state, pruning selections of missing entries
    #[must_use]
    pub fn restore(entries: Vec<DiaryEntry>, selected: impl IntoIterator<Item = EntryId>) -> Self {
        let known: HashSet<&EntryId> = entries.iter().map(|e| &e.id).collect();
        let selected: HashSet<EntryId> = selected
            .into_iter()
            .filter(|id| known.contains(id))
            .collect();
        Self {
            entries,
            selected,
            composer: DiaryComposer::default(),
        }
    }

    /// All entries, newest first
    #[must_use]
    pub fn entries(&self) -> &[DiaryEntry] {
        &self.entries
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the diary is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry
    #[must_use]
    pub fn get(&self, id: &EntryId) -> Option<&DiaryEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Selected entry IDs
    #[must_use]
    pub fn selection(&self) -> &HashSet<EntryId> {
        &self.selected
    }

    /// Whether an entry is selected
    #[must_use]
    pub fn is_selected(&self, id: &EntryId) -> bool {
        self.selected.contains(id)
    }

    /// Whether every entry is selected
    #[must_use]
    pub fn all_selected(&self) -> bool {
        !self.entries.is_empty() && self.selected.len() == self.entries.len()
    }

    /// The composer
    #[must_use]
    pub fn composer(&self) -> &DiaryComposer {
        &self.composer
    }

    /// Mutable access to the composer text
    pub fn composer_text_mut(&mut self) -> &mut String {
        &mut self.composer.text
    }

    /// Commit the composer: add a new entry or finish an edit
    pub fn commit(&mut self) -> DiaryCommit {
        if self.composer.text.trim().is_empty() {
            return DiaryCommit::Ignored;
        }
        let text = std::mem::take(&mut self.composer.text);

        if let Some(id) = self.composer.editing.take() {
            if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
                entry.text = text;
                return DiaryCommit::Updated(id);
            }
            // Edited entry vanished meanwhile; keep the text as a new note.
            tracing::debug!(id = %id, "Edited diary entry no longer exists");
        }

        let entry = DiaryEntry::new(text);
        let id = entry.id.clone();
        self.entries.insert(0, entry);
        DiaryCommit::Added(id)
    }

    /// Load an entry into the composer for editing
    pub fn begin_edit(&mut self, id: &EntryId) -> bool {
        match self.get(id) {
            Some(entry) => {
                self.composer.text = entry.text.clone();
                self.composer.editing = Some(id.clone());
                true
            }
            None => false,
        }
    }

    /// Drop the in-progress edit and clear the composer
    pub fn cancel_edit(&mut self) {
        self.composer.editing = None;
        self.composer.text.clear();
    }

    /// Delete an entry, its selection, and any edit of it
    pub fn remove(&mut self, id: &EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.id != id);
        self.selected.remove(id);
        if self.composer.editing.as_ref() == Some(id) {
            self.cancel_edit();
        }
        self.entries.len() != before
    }

    /// Flip one entry's selection; unknown IDs are ignored
    pub fn toggle_select(&mut self, id: &EntryId) {
        if self.selected.remove(id) {
            return;
        }
        if self.get(id).is_some() {
            self.selected.insert(id.clone());
        }
    }

    /// Select every entry
    pub fn select_all(&mut self) {
        if self.all_selected() {
            return;
        }
        self.selected = self.entries.iter().map(|e| e.id.clone()).collect();
    }

    /// Clear the selection
    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    /// Select none when everything is selected, otherwise select all
    pub fn toggle_select_all(&mut self) {
        if self.selected.len() == self.entries.len() {
            self.select_none();
        } else {
            self.select_all();
        }
    }

    /// Selected entries in store order
    #[must_use]
    pub fn selected_entries(&self) -> Vec<&DiaryEntry> {
        self.entries
            .iter()
            .filter(|e| self.selected.contains(&e.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn diary_with(texts: &[&str]) -> DiaryStore {
        let mut diary = DiaryStore::new();
        for text in texts {
            diary.composer_text_mut().push_str(text);
            diary.commit();
        }
        diary
    }

    #[test]
    fn test_insert_from_draft_goes_first() {
        let mut store = BitStore::new();
        let draft = Draft {
            premise: "first".into(),
            punchline: "x".into(),
            ..Draft::default()
        };
        store.insert_from_draft(&draft, Technique::Pun);
        let draft2 = Draft {
            premise: "second".into(),
            punchline: "y".into(),
            tags: "a, b".into(),
            ..Draft::default()
        };
        let id = store.insert_from_draft(&draft2, Technique::Irony);

        assert_eq!(store.len(), 2);
        assert_eq!(store.bits()[0].id, id);
        assert_eq!(store.bits()[0].title, "second...");
        assert_eq!(store.bits()[0].tags, vec!["a", "b"]);
        assert_eq!(store.bits()[1].parts.premise, "first");
    }

    #[test]
    fn test_remove_bit() {
        let mut store = BitStore::new();
        let draft = Draft {
            premise: "p".into(),
            punchline: "x".into(),
            ..Draft::default()
        };
        let id = store.insert_from_draft(&draft, Technique::Pun);
        assert!(!store.remove(&BitId::new("missing")));
        assert!(store.remove(&id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_prepend_keeps_batch_order() {
        let diary = diary_with(&["A", "B"]);
        let mut store = BitStore::new();
        let draft = Draft {
            premise: "old".into(),
            punchline: "x".into(),
            ..Draft::default()
        };
        store.insert_from_draft(&draft, Technique::Pun);
        store.prepend(diary.entries().iter().map(imported_bit).collect());

        let premises: Vec<_> = store.bits().iter().map(|b| b.parts.premise.as_str()).collect();
        assert_eq!(premises, vec!["B", "A", "old"]);
    }

    #[test]
    fn test_imported_bit_shape() {
        let entry = DiaryEntry::new("bus at 6am");
        let bit = imported_bit(&entry);
        assert_eq!(bit.title, IMPORTED_TITLE);
        assert_eq!(bit.parts, JokeParts::new("bus at 6am", "", ""));
        assert_eq!(bit.technique, Technique::Misdirection);
        assert_eq!(bit.tags, vec!["diary", "draft"]);
    }

    #[test]
    fn test_diary_is_newest_first() {
        let diary = diary_with(&["A", "B", "C"]);
        let texts: Vec<_> = diary.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_blank_commit_is_ignored() {
        let mut diary = DiaryStore::new();
        diary.composer_text_mut().push_str("   \n ");
        assert_eq!(diary.commit(), DiaryCommit::Ignored);
        assert!(diary.is_empty());
    }

    #[test]
    fn test_edit_replaces_in_place() {
        let mut diary = diary_with(&["A", "B"]);
        let id = diary.entries()[1].id.clone();

        assert!(diary.begin_edit(&id));
        assert_eq!(diary.composer().text, "A");
        assert_eq!(diary.len(), 2);

        diary.composer_text_mut().push_str(" revised");
        assert_eq!(diary.commit(), DiaryCommit::Updated(id.clone()));
        assert!(!diary.composer().is_editing());
        assert_eq!(diary.get(&id).map(|e| e.text.as_str()), Some("A revised"));
        assert_eq!(diary.entries()[1].id, id);
    }

    #[test]
    fn test_cancel_edit_clears_composer() {
        let mut diary = diary_with(&["A"]);
        let id = diary.entries()[0].id.clone();
        diary.begin_edit(&id);
        diary.cancel_edit();
        assert_eq!(diary.composer(), &DiaryComposer::default());
        assert_eq!(diary.entries()[0].text, "A");
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let mut diary = diary_with(&["A", "B"]);
        let id = diary.entries()[0].id.clone();
        let before = diary.selection().clone();
        diary.toggle_select(&id);
        assert!(diary.is_selected(&id));
        diary.toggle_select(&id);
        assert_eq!(diary.selection(), &before);
    }

    #[test]
    fn test_toggle_unknown_id_is_ignored() {
        let mut diary = diary_with(&["A"]);
        diary.toggle_select(&EntryId::new("ghost"));
        assert!(diary.selection().is_empty());
    }

    #[test]
    fn test_remove_clears_selection_and_edit() {
        let mut diary = diary_with(&["A", "B"]);
        let id = diary.entries()[0].id.clone();
        diary.toggle_select(&id);
        diary.begin_edit(&id);

        assert!(diary.remove(&id));
        assert!(!diary.is_selected(&id));
        assert!(diary.selection().is_empty());
        assert!(!diary.composer().is_editing());
        assert_eq!(diary.len(), 1);
    }

    #[test]
    fn test_toggle_select_all() {
        let mut diary = diary_with(&["A", "B", "C"]);
        diary.toggle_select_all();
        assert!(diary.all_selected());
        diary.toggle_select_all();
        assert!(diary.selection().is_empty());

        let first = diary.entries()[0].id.clone();
        diary.toggle_select(&first);
        diary.toggle_select_all();
        assert_eq!(diary.selection().len(), 3);
    }

    #[test]
    fn test_restore_prunes_dangling_selection() {
        let entry = DiaryEntry::new("kept");
        let kept = entry.id.clone();
        let diary = DiaryStore::restore(vec![entry], vec![kept.clone(), EntryId::new("gone")]);
        assert_eq!(diary.selection().len(), 1);
        assert!(diary.is_selected(&kept));
    }
}
