//! The owned, in-memory song collection and its durable mirror. Screens hold
//! a mutable reference to one [`SongStore`] and read it on every frame, so
//! there is no separate change-notification channel: a mutation is visible on
//! the next draw. Every mutating operation re-serializes the affected entity
//! group through [`Storage`] before returning.
//!
//! The store also owns the application's random-number source. Random panel
//! picks and freshly minted identifiers both draw from it, and because the
//! generator is seedable the whole store behaves deterministically under
//! test.

use std::collections::HashSet;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::Rng;

use crate::models::{Category, PrompterSettings, Song, SongDraft};
use crate::storage::Storage;

/// Central application state: the collection, the ephemeral selection set,
/// the prompter settings, and the random source.
pub struct SongStore {
    storage: Storage,
    songs: Vec<Song>,
    selection: HashSet<String>,
    settings: PrompterSettings,
    rng: StdRng,
}

impl SongStore {
    /// Hydrate the store from disk. A malformed blob aborts startup here
    /// rather than limping along with partial data.
    pub fn load(storage: Storage, rng: StdRng) -> Result<Self> {
        let songs = storage.load_songs()?;
        let settings = storage.load_settings()?;
        Ok(Self {
            storage,
            songs,
            selection: HashSet::new(),
            settings,
            rng,
        })
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Look up a record by identifier.
    pub fn get(&self, id: &str) -> Option<&Song> {
        self.songs.iter().find(|song| song.id == id)
    }

    /// Mint an identifier, append the record, and persist. Returns the
    /// stored record so callers can navigate straight to it.
    pub fn add_song(&mut self, draft: SongDraft) -> Result<Song> {
        let song = Song::from_draft(self.new_id(), draft);
        self.songs.push(song.clone());
        self.storage.save_songs(&self.songs)?;
        Ok(song)
    }

    /// Replace the record matching the identifier. A missing identifier is a
    /// no-op; nothing is appended and nothing is written.
    pub fn edit_song(&mut self, song: Song) -> Result<()> {
        if let Some(slot) = self.songs.iter_mut().find(|existing| existing.id == song.id) {
            *slot = song;
            self.storage.save_songs(&self.songs)?;
        }
        Ok(())
    }

    /// Remove one record and drop its identifier from the selection set.
    pub fn delete_song(&mut self, id: &str) -> Result<()> {
        self.songs.retain(|song| song.id != id);
        self.selection.remove(id);
        self.storage.save_songs(&self.songs)
    }

    /// Empty the collection and the selection set. The UI gates this behind
    /// two confirmations; the store itself asks no questions.
    pub fn delete_all_songs(&mut self) -> Result<()> {
        self.songs.clear();
        self.selection.clear();
        self.storage.save_songs(&self.songs)
    }

    /// Remove every record whose identifier is currently selected, then
    /// clear the set. Returns how many records went away.
    pub fn delete_selected_songs(&mut self) -> Result<usize> {
        let before = self.songs.len();
        let selection = std::mem::take(&mut self.selection);
        self.songs.retain(|song| !selection.contains(&song.id));
        let removed = before - self.songs.len();
        self.storage.save_songs(&self.songs)?;
        Ok(removed)
    }

    /// Append a whole batch of drafts, each with a fresh identifier, and
    /// persist once. The CSV importer hands over only fully valid batches.
    pub fn import_songs(&mut self, drafts: Vec<SongDraft>) -> Result<usize> {
        let count = drafts.len();
        for draft in drafts {
            let id = self.new_id();
            self.songs.push(Song::from_draft(id, draft));
        }
        self.storage.save_songs(&self.songs)?;
        Ok(count)
    }

    /// One record chosen uniformly at random from the subset matching the
    /// category, or `None` when the subset is empty. Successive calls are
    /// independent draws; immediate repeats are expected.
    pub fn random_song_by_category(&mut self, category: Category) -> Option<Song> {
        let matching: Vec<&Song> = self
            .songs
            .iter()
            .filter(|song| song.category == category)
            .collect();
        if matching.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..matching.len());
        Some(matching[index].clone())
    }

    pub fn selection(&self) -> &HashSet<String> {
        &self.selection
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    /// Flip one identifier in or out of the batch-deletion set. The set is
    /// ephemeral and never persisted.
    pub fn toggle_selection(&mut self, id: &str) {
        if !self.selection.remove(id) {
            self.selection.insert(id.to_string());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn settings(&self) -> &PrompterSettings {
        &self.settings
    }

    /// Replace the settings record and persist it.
    pub fn update_settings(&mut self, settings: PrompterSettings) -> Result<()> {
        self.settings = settings;
        self.storage.save_settings(&self.settings)
    }

    /// Mint a UUID-shaped identifier from the store's random source. The
    /// version and variant bits are set so the ids look like the ones older
    /// data files already contain.
    fn new_id(&mut self) -> String {
        let mut bytes: [u8; 16] = self.rng.random();
        bytes[6] = (bytes[6] & 0x0f) | 0x40;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;

        let hex = |range: std::ops::Range<usize>| {
            bytes[range]
                .iter()
                .map(|byte| format!("{byte:02x}"))
                .collect::<String>()
        };
        format!(
            "{}-{}-{}-{}-{}",
            hex(0..4),
            hex(4..6),
            hex(6..8),
            hex(8..10),
            hex(10..16)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SongStore {
        SongStore::load(
            Storage::open(dir.path()).unwrap(),
            StdRng::seed_from_u64(7),
        )
        .unwrap()
    }

    fn draft(title: &str, category: Category) -> SongDraft {
        SongDraft {
            title: title.to_string(),
            category,
            ..SongDraft::default()
        }
    }

    #[test]
    fn test_added_song_is_looked_up_equal_except_for_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        let input = SongDraft {
            mnemonic: "vou mandar".to_string(),
            lyrics: "solta a mandinga".to_string(),
            media_link: "https://example.com/m".to_string(),
            ..draft("Mandingueiro", Category::Angola)
        };
        let added = store.add_song(input.clone()).unwrap();

        let found = store.get(&added.id).unwrap();
        assert!(!found.id.is_empty());
        assert_eq!(found.draft(), input);
    }

    #[test]
    fn test_minted_ids_are_unique_and_uuid_shaped() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        let a = store.add_song(draft("A", Category::Angola)).unwrap();
        let b = store.add_song(draft("B", Category::Angola)).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 36);
        assert_eq!(a.id.matches('-').count(), 4);
    }

    #[test]
    fn test_delete_drops_record_and_its_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        let doomed = store.add_song(draft("Doomed", Category::Angola)).unwrap();
        let kept = store
            .add_song(draft("Kept", Category::SaoBentoGrande))
            .unwrap();
        store.toggle_selection(&doomed.id);
        store.toggle_selection(&kept.id);

        store.delete_song(&doomed.id).unwrap();

        assert!(store.get(&doomed.id).is_none());
        assert!(!store.is_selected(&doomed.id));
        assert!(store.is_selected(&kept.id));
    }

    #[test]
    fn test_deleting_an_unselected_song_leaves_the_selection_alone() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        let marked = store.add_song(draft("Marked", Category::Angola)).unwrap();
        let plain = store.add_song(draft("Plain", Category::Angola)).unwrap();
        store.toggle_selection(&marked.id);

        store.delete_song(&plain.id).unwrap();

        assert_eq!(store.selected_count(), 1);
        assert!(store.is_selected(&marked.id));
    }

    #[test]
    fn test_delete_all_empties_every_category() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        for category in Category::ALL {
            store.add_song(draft("Chant", category)).unwrap();
        }
        let first_id = store.songs()[0].id.clone();
        store.toggle_selection(&first_id);

        store.delete_all_songs().unwrap();

        assert!(store.is_empty());
        assert_eq!(store.selected_count(), 0);
        for category in Category::ALL {
            assert!(store.random_song_by_category(category).is_none());
        }
    }

    #[test]
    fn test_delete_selected_removes_only_marked_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        let first = store.add_song(draft("First", Category::Angola)).unwrap();
        let second = store
            .add_song(draft("Second", Category::SaoBentoPequeno))
            .unwrap();
        let third = store
            .add_song(draft("Third", Category::SaoBentoGrande))
            .unwrap();
        store.toggle_selection(&first.id);
        store.toggle_selection(&third.id);

        let removed = store.delete_selected_songs().unwrap();

        assert_eq!(removed, 2);
        assert_eq!(store.songs().len(), 1);
        assert!(store.get(&second.id).is_some());
        assert_eq!(store.selected_count(), 0);
    }

    #[test]
    fn test_import_appends_batch_with_fresh_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add_song(draft("Existing", Category::Angola)).unwrap();

        let count = store
            .import_songs(vec![
                draft("One", Category::Angola),
                draft("Two", Category::SaoBentoGrande),
            ])
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(store.songs().len(), 3);
        let mut ids: Vec<&str> = store.songs().iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_random_pick_honors_the_category_and_empty_subsets() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.add_song(draft("A1", Category::Angola)).unwrap();
        store.add_song(draft("A2", Category::Angola)).unwrap();

        for _ in 0..20 {
            let pick = store.random_song_by_category(Category::Angola).unwrap();
            assert_eq!(pick.category, Category::Angola);
        }
        assert!(store
            .random_song_by_category(Category::SaoBentoGrande)
            .is_none());
    }

    #[test]
    fn test_toggle_selection_twice_restores_the_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        let anchor = store.add_song(draft("Anchor", Category::Angola)).unwrap();
        let flipped = store.add_song(draft("Flipped", Category::Angola)).unwrap();
        store.toggle_selection(&anchor.id);
        let snapshot = store.selection().clone();

        store.toggle_selection(&flipped.id);
        store.toggle_selection(&flipped.id);

        assert_eq!(store.selection(), &snapshot);
    }

    #[test]
    fn test_edit_replaces_matching_record_and_ignores_unknown_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        let original = store.add_song(draft("Original", Category::Angola)).unwrap();
        let mut edited = original.clone();
        edited.title = "Renamed".to_string();
        edited.category = Category::SaoBentoGrande;
        store.edit_song(edited.clone()).unwrap();
        assert_eq!(store.get(&original.id), Some(&edited));

        let ghost = Song::from_draft("no-such-id".to_string(), draft("Ghost", Category::Angola));
        store.edit_song(ghost).unwrap();
        assert_eq!(store.songs().len(), 1);
    }

    #[test]
    fn test_reload_from_the_same_directory_sees_persisted_state() {
        let dir = tempfile::tempdir().unwrap();

        let added = {
            let mut store = store_in(&dir);
            store
                .update_settings(PrompterSettings {
                    rotation_interval: 60,
                    ..PrompterSettings::default()
                })
                .unwrap();
            store.add_song(draft("Durable", Category::Angola)).unwrap()
        };

        let reloaded = store_in(&dir);
        assert_eq!(reloaded.songs().len(), 1);
        assert_eq!(reloaded.get(&added.id), Some(&added));
        assert_eq!(reloaded.settings().rotation_interval, 60);
        assert_eq!(reloaded.selected_count(), 0);
    }
}
