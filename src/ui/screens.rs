use std::time::Instant;

use crate::models::{
    Category, PrompterSettings, Song, MAX_ROTATION_INTERVAL, MIN_ROTATION_INTERVAL,
    ROTATION_INTERVAL_STEP,
};
use crate::store::SongStore;

use super::scroll::ScrollTask;

/// Default reading tempo per rhythm class, in beats per minute. Seeds the
/// detail screen's tempo slider when a chant is opened.
pub(crate) fn default_bpm(category: Category) -> u16 {
    match category {
        Category::Angola => 60,
        Category::SaoBentoPequeno => 85,
        Category::SaoBentoGrande => 120,
    }
}

/// Tempo slider bounds and step for the reading mode.
pub(crate) const MIN_BPM: u16 = 25;
pub(crate) const MAX_BPM: u16 = 400;
pub(crate) const BPM_STEP: u16 = 25;

/// Blank rows appended below the lyrics so the last line scrolls up past
/// the middle of the screen before the interpolation completes.
pub(crate) const SCROLL_TRAILER_ROWS: u16 = 10;

/// The default list screen: every chant grouped under its category header,
/// filtered by an optional search query and sorted by display title.
pub(crate) struct LibraryScreen {
    pub(crate) filter: Option<String>,
    pub(crate) sections: Vec<(Category, Vec<Song>)>,
    /// Flattened section contents in render order; the selection index points
    /// into this.
    pub(crate) visible: Vec<Song>,
    pub(crate) selected: usize,
}

impl LibraryScreen {
    pub(crate) fn new(songs: &[Song]) -> Self {
        let mut screen = Self {
            filter: None,
            sections: Vec::new(),
            visible: Vec::new(),
            selected: 0,
        };
        screen.rebuild(songs);
        screen
    }

    /// Recompute the grouped view from the current collection snapshot.
    /// Called after every mutation and filter change.
    pub(crate) fn rebuild(&mut self, songs: &[Song]) {
        let query = self
            .filter
            .as_ref()
            .map(|raw| raw.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        self.sections = Category::ALL
            .into_iter()
            .map(|category| {
                let mut matching: Vec<Song> = songs
                    .iter()
                    .filter(|song| song.category == category)
                    .filter(|song| match &query {
                        None => true,
                        Some(q) => {
                            song.title.to_lowercase().contains(q)
                                || song.mnemonic.to_lowercase().contains(q)
                                || song.lyrics.to_lowercase().contains(q)
                        }
                    })
                    .cloned()
                    .collect();
                matching.sort_by(|a, b| {
                    a.display_title()
                        .to_lowercase()
                        .cmp(&b.display_title().to_lowercase())
                });
                (category, matching)
            })
            .collect();

        self.visible = self
            .sections
            .iter()
            .flat_map(|(_, songs)| songs.iter().cloned())
            .collect();

        if self.visible.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.visible.len() {
            self.selected = self.visible.len() - 1;
        }
    }

    pub(crate) fn set_filter(&mut self, filter: Option<String>, songs: &[Song]) {
        self.filter = filter;
        self.rebuild(songs);
    }

    pub(crate) fn has_filter(&self) -> bool {
        self.filter
            .as_ref()
            .map(|q| !q.trim().is_empty())
            .unwrap_or(false)
    }

    pub(crate) fn current_song(&self) -> Option<&Song> {
        self.visible.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.visible.is_empty() {
            return;
        }
        let len = self.visible.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        if !self.visible.is_empty() {
            self.selected = self.visible.len() - 1;
        }
    }
}

/// Detail screen for one chant: metadata plus the auto-scroll reading mode.
pub(crate) struct DetailScreen {
    pub(crate) song: Song,
    /// Reading tempo; seeded from the category default and adjusted in
    /// [`BPM_STEP`] increments.
    pub(crate) bpm: u16,
    /// Manual scroll offset used while not reading.
    pub(crate) manual_scroll: u16,
    /// Active interpolation task, present only while reading.
    pub(crate) task: Option<ScrollTask>,
    /// Offset computed from the task on the last tick.
    pub(crate) reading_offset: u16,
    /// Height of the lyrics viewport as of the last draw. Needed to size the
    /// scrollable distance when reading starts.
    pub(crate) viewport: u16,
}

impl DetailScreen {
    pub(crate) fn new(song: Song) -> Self {
        let bpm = default_bpm(song.category);
        Self {
            song,
            bpm,
            manual_scroll: 0,
            task: None,
            reading_offset: 0,
            viewport: 0,
        }
    }

    pub(crate) fn is_reading(&self) -> bool {
        self.task.is_some()
    }

    /// Total rows the reading view has to travel: the lyric lines plus the
    /// trailer, minus whatever fits on screen.
    pub(crate) fn scroll_distance(&self) -> u16 {
        let content = self.song.lyrics.lines().count() as u16 + SCROLL_TRAILER_ROWS;
        content.saturating_sub(self.viewport)
    }

    /// Enter reading mode and start a fresh interpolation from the top.
    pub(crate) fn start_reading(&mut self, now: Instant) {
        self.reading_offset = 0;
        self.task = Some(ScrollTask::start(self.scroll_distance(), self.bpm, now));
    }

    /// Leave reading mode, cancelling the pending interpolation.
    pub(crate) fn stop_reading(&mut self) {
        self.task = None;
        self.reading_offset = 0;
    }

    /// Step the tempo. While reading, the interpolation restarts from zero
    /// progress at the new rate; the jump back to the top is intentional.
    pub(crate) fn adjust_bpm(&mut self, forward: bool, now: Instant) {
        self.bpm = if forward {
            (self.bpm + BPM_STEP).min(MAX_BPM)
        } else {
            self.bpm.saturating_sub(BPM_STEP).max(MIN_BPM)
        };
        if let Some(task) = &self.task {
            self.reading_offset = 0;
            self.task = Some(task.restart(self.bpm, now));
        }
    }

    /// Re-evaluate the interpolated offset. Called on every tick while this
    /// screen is up; does nothing when not reading.
    pub(crate) fn advance(&mut self, now: Instant) {
        if let Some(task) = &self.task {
            self.reading_offset = task.offset_at(now);
        }
    }

    pub(crate) fn scroll_by(&mut self, delta: i32) {
        let new = i64::from(self.manual_scroll) + i64::from(delta);
        self.manual_scroll = new.clamp(0, u16::MAX.into()) as u16;
    }
}

/// Full-screen teleprompter. Two states: displaying three random picks (one
/// panel per category) with a countdown, or reading one pick's lyrics.
pub(crate) struct PrompterScreen {
    /// One pick per entry of [`Category::ALL`], `None` where the category
    /// has no chants.
    pub(crate) picks: [Option<Song>; 3],
    pub(crate) seconds_left: u32,
    /// Which panel the keyboard highlight sits on.
    pub(crate) highlighted: usize,
    /// The chant being read full-screen, if any. While this is set the
    /// countdown is paused.
    pub(crate) reading: Option<Song>,
}

impl PrompterScreen {
    pub(crate) fn new(store: &mut SongStore) -> Self {
        let mut screen = Self {
            picks: [None, None, None],
            seconds_left: store.settings().rotation_interval,
            highlighted: 0,
            reading: None,
        };
        screen.shuffle(store);
        screen
    }

    /// Draw three fresh picks, one per category, each an independent uniform
    /// draw, and reset the countdown. Repeats of the previous pick are fine.
    pub(crate) fn shuffle(&mut self, store: &mut SongStore) {
        for (slot, category) in self.picks.iter_mut().zip(Category::ALL) {
            *slot = store.random_song_by_category(category);
        }
        self.seconds_left = store.settings().rotation_interval;
    }

    /// One countdown second. At zero the panels are re-drawn and the
    /// countdown resets. Returns whether a re-draw happened so the caller
    /// can test the cadence.
    pub(crate) fn tick_second(&mut self, store: &mut SongStore) -> bool {
        if self.reading.is_some() {
            return false;
        }
        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.seconds_left == 0 {
            self.shuffle(store);
            true
        } else {
            false
        }
    }

    pub(crate) fn move_highlight(&mut self, offset: isize) {
        let len = self.picks.len() as isize;
        self.highlighted = (self.highlighted as isize + offset).rem_euclid(len) as usize;
    }

    /// Open the highlighted panel's chant full-screen. No-op when the panel
    /// is empty.
    pub(crate) fn open_reading(&mut self) {
        if let Some(song) = &self.picks[self.highlighted] {
            self.reading = Some(song.clone());
        }
    }

    pub(crate) fn close_reading(&mut self) {
        self.reading = None;
    }
}

/// The settings screen edits one field at a time; this tracks which.
pub(crate) struct SettingsScreen {
    pub(crate) selected: usize,
}

pub(crate) const SETTINGS_FIELD_COUNT: usize = 5;

impl SettingsScreen {
    pub(crate) fn new() -> Self {
        Self { selected: 0 }
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = SETTINGS_FIELD_COUNT as isize;
        self.selected = (self.selected as isize + offset).rem_euclid(len) as usize;
    }

    /// Apply one adjustment step to the focused field and return the new
    /// record. The caller persists it through the store.
    pub(crate) fn adjust(&self, settings: &PrompterSettings, forward: bool) -> PrompterSettings {
        let mut updated = *settings;
        match self.selected {
            0 => {
                updated.rotation_interval = if forward {
                    (settings.rotation_interval + ROTATION_INTERVAL_STEP).min(MAX_ROTATION_INTERVAL)
                } else {
                    settings
                        .rotation_interval
                        .saturating_sub(ROTATION_INTERVAL_STEP)
                        .max(MIN_ROTATION_INTERVAL)
                };
            }
            1 => {
                updated.font_size = if forward {
                    settings.font_size.next()
                } else {
                    settings.font_size.previous()
                };
            }
            2 => updated.dark_mode = !settings.dark_mode,
            3 => updated.high_contrast = !settings.high_contrast,
            4 => updated.upper_case = !settings.upper_case,
            _ => {}
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FontSize, SongDraft};
    use crate::storage::Storage;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;
    use tempfile::TempDir;

    fn seeded_store(dir: &TempDir) -> SongStore {
        let mut store = SongStore::load(
            Storage::open(dir.path()).unwrap(),
            StdRng::seed_from_u64(11),
        )
        .unwrap();
        for category in Category::ALL {
            store
                .add_song(SongDraft {
                    title: format!("{} chant", category.label()),
                    category,
                    ..SongDraft::default()
                })
                .unwrap();
        }
        store
    }

    #[test]
    fn test_countdown_redraws_exactly_once_per_interval() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = seeded_store(&dir);
        let mut screen = PrompterScreen::new(&mut store);
        assert_eq!(screen.seconds_left, 120);

        let redraws = (0..120)
            .filter(|_| screen.tick_second(&mut store))
            .count();

        assert_eq!(redraws, 1);
        assert_eq!(screen.seconds_left, 120);
        assert!(screen.picks.iter().all(Option::is_some));
    }

    #[test]
    fn test_manual_shuffle_resets_the_countdown() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = seeded_store(&dir);
        let mut screen = PrompterScreen::new(&mut store);

        for _ in 0..30 {
            screen.tick_second(&mut store);
        }
        assert_eq!(screen.seconds_left, 90);

        screen.shuffle(&mut store);
        assert_eq!(screen.seconds_left, 120);
    }

    #[test]
    fn test_countdown_pauses_while_reading() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = seeded_store(&dir);
        let mut screen = PrompterScreen::new(&mut store);

        screen.open_reading();
        assert!(screen.reading.is_some());
        for _ in 0..200 {
            assert!(!screen.tick_second(&mut store));
        }
        assert_eq!(screen.seconds_left, 120);

        screen.close_reading();
        assert!(screen.reading.is_none());
        screen.tick_second(&mut store);
        assert_eq!(screen.seconds_left, 119);
    }

    #[test]
    fn test_empty_categories_yield_empty_panels() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SongStore::load(
            Storage::open(dir.path()).unwrap(),
            StdRng::seed_from_u64(3),
        )
        .unwrap();
        store
            .add_song(SongDraft {
                title: "Only angola".to_string(),
                category: Category::Angola,
                ..SongDraft::default()
            })
            .unwrap();

        let mut screen = PrompterScreen::new(&mut store);
        assert!(screen.picks[0].is_some());
        assert!(screen.picks[1].is_none());
        assert!(screen.picks[2].is_none());

        // Selecting an empty panel must not enter the reading state.
        screen.highlighted = 1;
        screen.open_reading();
        assert!(screen.reading.is_none());
    }

    #[test]
    fn test_library_filter_matches_title_mnemonic_and_lyrics() {
        let songs = vec![
            Song::from_draft(
                "a".to_string(),
                SongDraft {
                    title: "Paranauê".to_string(),
                    category: Category::Angola,
                    ..SongDraft::default()
                },
            ),
            Song::from_draft(
                "b".to_string(),
                SongDraft {
                    title: "Santa Maria".to_string(),
                    category: Category::Angola,
                    lyrics: "o mar vai virar sertão".to_string(),
                    ..SongDraft::default()
                },
            ),
        ];

        let mut screen = LibraryScreen::new(&songs);
        assert_eq!(screen.visible.len(), 2);

        screen.set_filter(Some("sertão".to_string()), &songs);
        assert_eq!(screen.visible.len(), 1);
        assert_eq!(screen.visible[0].id, "b");

        screen.set_filter(None, &songs);
        assert_eq!(screen.visible.len(), 2);
    }

    #[test]
    fn test_library_sections_sort_by_display_title() {
        let songs = vec![
            Song::from_draft(
                "a".to_string(),
                SongDraft {
                    title: "zum zum zum".to_string(),
                    category: Category::Angola,
                    ..SongDraft::default()
                },
            ),
            Song::from_draft(
                "b".to_string(),
                SongDraft {
                    mnemonic: "Ai ai aidê".to_string(),
                    category: Category::Angola,
                    ..SongDraft::default()
                },
            ),
        ];

        let screen = LibraryScreen::new(&songs);
        assert_eq!(screen.visible[0].id, "b");
        assert_eq!(screen.visible[1].id, "a");
    }

    #[test]
    fn test_reading_mode_restarts_on_tempo_change() {
        let song = Song::from_draft(
            "id".to_string(),
            SongDraft {
                title: "Longa".to_string(),
                category: Category::SaoBentoGrande,
                lyrics: vec!["line"; 40].join("\n"),
                ..SongDraft::default()
            },
        );
        let mut detail = DetailScreen::new(song);
        assert_eq!(detail.bpm, 120);
        detail.viewport = 20;

        let start = Instant::now();
        detail.start_reading(start);
        assert!(detail.is_reading());

        let later = start + Duration::from_secs(60);
        detail.advance(later);
        let progressed = detail.reading_offset;
        assert!(progressed > 0);

        detail.adjust_bpm(true, later);
        assert_eq!(detail.bpm, 145);
        assert_eq!(detail.reading_offset, 0);

        detail.stop_reading();
        assert!(!detail.is_reading());
        assert_eq!(detail.reading_offset, 0);
    }

    #[test]
    fn test_settings_adjustments_clamp_and_toggle() {
        let screen = SettingsScreen { selected: 0 };
        let mut settings = PrompterSettings::default();
        settings.rotation_interval = MAX_ROTATION_INTERVAL;
        let updated = screen.adjust(&settings, true);
        assert_eq!(updated.rotation_interval, MAX_ROTATION_INTERVAL);

        settings.rotation_interval = MIN_ROTATION_INTERVAL;
        let updated = screen.adjust(&settings, false);
        assert_eq!(updated.rotation_interval, MIN_ROTATION_INTERVAL);

        let screen = SettingsScreen { selected: 4 };
        let updated = screen.adjust(&settings, true);
        assert!(updated.upper_case);

        let screen = SettingsScreen { selected: 1 };
        let updated = screen.adjust(&settings, true);
        assert_eq!(updated.font_size, FontSize::Large);
    }
}
