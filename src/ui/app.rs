use std::fs;
use std::mem;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::csv;
use crate::models::{Category, Song};
use crate::store::SongStore;
use crate::wake::WakeGuard;

use super::forms::{
    ConfirmDeleteAll, ConfirmDeleteSong, DeleteAllStage, PathForm, SongField, SongForm,
};
use super::helpers::{
    category_color, centered_rect, format_countdown, lyric_lines, sized_modifier, sized_text,
    surface_error,
};
use super::screens::{
    DetailScreen, LibraryScreen, PrompterScreen, SettingsScreen, SCROLL_TRAILER_ROWS,
};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows used by the detail header block, borders included.
const DETAIL_HEADER_HEIGHT: u16 = 4;
/// How many trailing lyric lines the song form previews.
const LYRICS_PREVIEW_ROWS: usize = 6;
/// Suggested file name for CSV export, matching what earlier exports of the
/// same collection were called.
const EXPORT_DEFAULT_PATH: &str = "chants-capoeira.csv";

/// High-level navigation states. Keeping this explicit makes it easy to
/// reason about which rendering path runs and what keyboard shortcuts do.
/// The teleprompter variant carries the stay-awake guard so entering the
/// screen acquires it and leaving releases it, wherever the exit happens.
enum Screen {
    Library(LibraryScreen),
    Detail(DetailScreen),
    Prompter(PrompterScreen, WakeGuard),
    Settings(SettingsScreen),
}

/// Fine-grained modes layered over the current screen.
enum Mode {
    Normal,
    AddingSong(SongForm),
    EditingSong { id: String, form: SongForm },
    ConfirmDeleteSong(ConfirmDeleteSong),
    ConfirmDeleteSelected { count: usize },
    ConfirmDeleteAll(ConfirmDeleteAll),
    Searching(SearchState),
    Importing(PathForm),
    Exporting(PathForm),
}

/// State for an active inline search over the library.
struct SearchState {
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    store: SongStore,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
    last_tick: Instant,
}

impl App {
    pub fn new(store: SongStore) -> Self {
        let library = LibraryScreen::new(store.songs());
        Self {
            store,
            screen: Screen::Library(library),
            mode: Mode::Normal,
            status: None,
            last_tick: Instant::now(),
        }
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingSong(form) => self.handle_add_song(code, form)?,
            Mode::EditingSong { id, form } => self.handle_edit_song(code, id, form)?,
            Mode::ConfirmDeleteSong(confirm) => self.handle_confirm_delete_song(code, confirm)?,
            Mode::ConfirmDeleteSelected { count } => {
                self.handle_confirm_delete_selected(code, count)?
            }
            Mode::ConfirmDeleteAll(confirm) => self.handle_confirm_delete_all(code, confirm)?,
            Mode::Searching(state) => self.handle_search(code, state)?,
            Mode::Importing(form) => self.handle_import(code, form)?,
            Mode::Exporting(form) => self.handle_export(code, form)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    /// Advance time-driven state: the rotation countdown in whole-second
    /// steps and the reading-mode interpolation continuously. Called from
    /// the event loop after every poll timeout.
    pub(crate) fn on_tick(&mut self, now: Instant) -> Result<()> {
        // After a long suspend, resynchronize instead of replaying a backlog
        // of countdown seconds.
        if now.duration_since(self.last_tick) > Duration::from_secs(60) {
            self.last_tick = now;
        }

        while now.duration_since(self.last_tick) >= Duration::from_secs(1) {
            self.last_tick += Duration::from_secs(1);
            if let Screen::Prompter(prompter, _) = &mut self.screen {
                prompter.tick_second(&mut self.store);
            }
        }

        if let Screen::Detail(detail) = &mut self.screen {
            detail.advance(now);
        }
        Ok(())
    }

    /// Ctrl+S saves the song form regardless of which field has focus. This
    /// is the only way to save while the cursor sits in the lyrics field,
    /// where Enter inserts a newline instead.
    pub(crate) fn handle_ctrl_s(&mut self) -> Result<()> {
        let mode = mem::replace(&mut self.mode, Mode::Normal);
        self.mode = match mode {
            Mode::AddingSong(form) => self.save_new_song(form)?,
            Mode::EditingSong { id, form } => self.save_edited_song(id, form)?,
            other => other,
        };
        Ok(())
    }

    /// Ctrl+D from the edit form asks to delete the chant being edited.
    pub(crate) fn handle_ctrl_d(&mut self) -> Result<()> {
        let mode = mem::replace(&mut self.mode, Mode::Normal);
        self.mode = match mode {
            Mode::EditingSong { id, form } => match self.store.get(&id).cloned() {
                Some(song) => Mode::ConfirmDeleteSong(ConfirmDeleteSong { song }),
                None => Mode::EditingSong { id, form },
            },
            other => other,
        };
        Ok(())
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match &self.screen {
            Screen::Library(_) => self.handle_library_key(code, exit),
            Screen::Detail(_) => self.handle_detail_key(code, exit),
            Screen::Prompter(..) => self.handle_prompter_key(code, exit),
            Screen::Settings(_) => self.handle_settings_key(code, exit),
        }
    }

    fn handle_library_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc => {
                let filtered = matches!(&self.screen, Screen::Library(lib) if lib.has_filter());
                if filtered {
                    if let Screen::Library(library) = &mut self.screen {
                        library.set_filter(None, self.store.songs());
                    }
                    self.clear_status();
                } else {
                    *exit = true;
                }
            }
            KeyCode::Up => self.move_library_selection(-1),
            KeyCode::Down => self.move_library_selection(1),
            KeyCode::PageUp => self.move_library_selection(-5),
            KeyCode::PageDown => self.move_library_selection(5),
            KeyCode::Home => {
                if let Screen::Library(library) = &mut self.screen {
                    library.select_first();
                }
            }
            KeyCode::End => {
                if let Screen::Library(library) = &mut self.screen {
                    library.select_last();
                }
            }
            KeyCode::Enter => {
                if let Some(song) = self.library_current_song() {
                    self.clear_status();
                    self.screen = Screen::Detail(DetailScreen::new(song));
                } else {
                    self.set_status("No chant selected.", StatusKind::Error);
                }
            }
            KeyCode::Char(' ') => {
                if let Some(song) = self.library_current_song() {
                    self.store.toggle_selection(&song.id);
                }
            }
            KeyCode::Char('c') => {
                if self.store.selected_count() > 0 {
                    self.store.clear_selection();
                    self.set_status("Selection cleared.", StatusKind::Info);
                }
            }
            KeyCode::Char('+') | KeyCode::Char('a') => {
                self.clear_status();
                return Ok(Mode::AddingSong(SongForm::default()));
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(song) = self.library_current_song() {
                    self.clear_status();
                    return Ok(Mode::EditingSong {
                        id: song.id.clone(),
                        form: SongForm::from_song(&song),
                    });
                } else {
                    self.set_status("No chant selected to edit.", StatusKind::Error);
                }
            }
            KeyCode::Char('-') => {
                if let Some(song) = self.library_current_song() {
                    self.clear_status();
                    return Ok(Mode::ConfirmDeleteSong(ConfirmDeleteSong { song }));
                } else {
                    self.set_status("No chant selected to delete.", StatusKind::Error);
                }
            }
            KeyCode::Char('d') => {
                let count = self.store.selected_count();
                if count > 0 {
                    self.clear_status();
                    return Ok(Mode::ConfirmDeleteSelected { count });
                } else {
                    self.set_status("No chants marked for deletion.", StatusKind::Error);
                }
            }
            KeyCode::Char('D') => {
                if self.store.is_empty() {
                    self.set_status("The collection is already empty.", StatusKind::Error);
                } else {
                    self.clear_status();
                    return Ok(Mode::ConfirmDeleteAll(ConfirmDeleteAll::new()));
                }
            }
            KeyCode::Char('f') => {
                self.clear_status();
                return Ok(Mode::Searching(SearchState {
                    query: String::new(),
                }));
            }
            KeyCode::Char('i') | KeyCode::Char('I') => {
                self.clear_status();
                return Ok(Mode::Importing(PathForm::new("")));
            }
            KeyCode::Char('x') | KeyCode::Char('X') => {
                self.clear_status();
                return Ok(Mode::Exporting(PathForm::new(EXPORT_DEFAULT_PATH)));
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.open_prompter();
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.clear_status();
                self.screen = Screen::Settings(SettingsScreen::new());
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_detail_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
                return Ok(Mode::Normal);
            }
            KeyCode::Esc => {
                self.back_to_library();
                return Ok(Mode::Normal);
            }
            _ => {}
        }

        let now = Instant::now();
        let mut status_to_set: Option<(String, StatusKind)> = None;

        if let Screen::Detail(detail) = &mut self.screen {
            match code {
                KeyCode::Up => detail.scroll_by(-1),
                KeyCode::Down => detail.scroll_by(1),
                KeyCode::PageUp => detail.scroll_by(-5),
                KeyCode::PageDown => detail.scroll_by(5),
                KeyCode::Char('r') | KeyCode::Char(' ') => {
                    if detail.song.lyrics.trim().is_empty() {
                        status_to_set = Some((
                            "This chant has no lyrics to read.".to_string(),
                            StatusKind::Error,
                        ));
                    } else if detail.is_reading() {
                        detail.stop_reading();
                    } else {
                        detail.start_reading(now);
                    }
                }
                KeyCode::Char('+') | KeyCode::Char('=') => detail.adjust_bpm(true, now),
                KeyCode::Char('-') | KeyCode::Char('_') => detail.adjust_bpm(false, now),
                KeyCode::Enter | KeyCode::Char('o') => {
                    let link = detail.song.media_link.trim().to_string();
                    let title = detail.song.display_title().to_string();
                    if link.is_empty() {
                        status_to_set = Some((
                            "This chant does not have a media link.".to_string(),
                            StatusKind::Error,
                        ));
                    } else if let Err(err) = open_link(&link) {
                        status_to_set =
                            Some((format!("Failed to open link: {err}"), StatusKind::Error));
                    } else {
                        status_to_set = Some((format!("Opened {title}."), StatusKind::Info));
                    }
                }
                KeyCode::Char('e') | KeyCode::Char('E') => {
                    let song = detail.song.clone();
                    return Ok(Mode::EditingSong {
                        id: song.id.clone(),
                        form: SongForm::from_song(&song),
                    });
                }
                _ => {}
            }
        }

        if let Some((text, kind)) = status_to_set {
            self.set_status(text, kind);
        }
        Ok(Mode::Normal)
    }

    fn handle_prompter_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let mut open_settings = false;
        let mut leave = false;

        if let Screen::Prompter(prompter, _) = &mut self.screen {
            if prompter.reading.is_some() {
                match code {
                    KeyCode::Char('q') => *exit = true,
                    KeyCode::Esc | KeyCode::Backspace => prompter.close_reading(),
                    KeyCode::Enter => {
                        if let Some(song) = &prompter.reading {
                            let link = song.media_link.trim();
                            if !link.is_empty() {
                                let _ = open_link(link);
                            }
                        }
                    }
                    _ => {}
                }
            } else {
                match code {
                    KeyCode::Char('q') => *exit = true,
                    KeyCode::Esc => leave = true,
                    KeyCode::Up | KeyCode::Left => prompter.move_highlight(-1),
                    KeyCode::Down | KeyCode::Right => prompter.move_highlight(1),
                    KeyCode::Enter => prompter.open_reading(),
                    KeyCode::Char('r') | KeyCode::Char('n') => {
                        prompter.shuffle(&mut self.store);
                    }
                    KeyCode::Char(digit @ '1'..='3') => {
                        prompter.highlighted = digit as usize - '1' as usize;
                        prompter.open_reading();
                    }
                    KeyCode::Char('s') | KeyCode::Char('S') => open_settings = true,
                    _ => {}
                }
            }
        }

        if leave {
            self.back_to_library();
        } else if open_settings {
            self.clear_status();
            self.screen = Screen::Settings(SettingsScreen::new());
        }
        Ok(Mode::Normal)
    }

    fn handle_settings_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc => {
                self.back_to_library();
            }
            KeyCode::Up => {
                if let Screen::Settings(settings) = &mut self.screen {
                    settings.move_selection(-1);
                }
            }
            KeyCode::Down | KeyCode::Tab => {
                if let Screen::Settings(settings) = &mut self.screen {
                    settings.move_selection(1);
                }
            }
            KeyCode::Left => self.adjust_settings(false),
            KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ') => self.adjust_settings(true),
            _ => {}
        }
        Ok(Mode::Normal)
    }

    /// Apply one adjustment to the focused settings field and persist it.
    fn adjust_settings(&mut self, forward: bool) {
        let updated = match &self.screen {
            Screen::Settings(settings) => settings.adjust(self.store.settings(), forward),
            _ => return,
        };
        if let Err(err) = self.store.update_settings(updated) {
            let message = surface_error(&err);
            self.set_status(message, StatusKind::Error);
        }
    }

    fn handle_add_song(&mut self, code: KeyCode, mut form: SongForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Add chant cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Left => {
                if form.active == SongField::Category {
                    form.cycle_category(false);
                }
            }
            KeyCode::Right => {
                if form.active == SongField::Category {
                    form.cycle_category(true);
                }
            }
            KeyCode::Enter => {
                if form.active == SongField::Lyrics {
                    form.push_newline();
                } else {
                    return self.save_new_song(form);
                }
            }
            KeyCode::Char(ch) => {
                if form.active == SongField::Category && ch == ' ' {
                    form.cycle_category(true);
                } else if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::AddingSong(form))
    }

    fn handle_edit_song(&mut self, code: KeyCode, id: String, mut form: SongForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Left => {
                if form.active == SongField::Category {
                    form.cycle_category(false);
                }
            }
            KeyCode::Right => {
                if form.active == SongField::Category {
                    form.cycle_category(true);
                }
            }
            KeyCode::Enter => {
                if form.active == SongField::Lyrics {
                    form.push_newline();
                } else {
                    return self.save_edited_song(id, form);
                }
            }
            KeyCode::Char(ch) => {
                if form.active == SongField::Category && ch == ' ' {
                    form.cycle_category(true);
                } else if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::EditingSong { id, form })
    }

    fn save_new_song(&mut self, mut form: SongForm) -> Result<Mode> {
        match form.parse_inputs() {
            Ok(draft) => match self.store.add_song(draft) {
                Ok(song) => {
                    self.refresh_library();
                    self.set_status(
                        format!("Added {}.", song.display_title()),
                        StatusKind::Info,
                    );
                    Ok(Mode::Normal)
                }
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                    Ok(Mode::AddingSong(form))
                }
            },
            Err(err) => {
                let message = surface_error(&err);
                form.error = Some(message.clone());
                self.set_status(message, StatusKind::Error);
                Ok(Mode::AddingSong(form))
            }
        }
    }

    fn save_edited_song(&mut self, id: String, mut form: SongForm) -> Result<Mode> {
        let draft = match form.parse_inputs() {
            Ok(draft) => draft,
            Err(err) => {
                let message = surface_error(&err);
                form.error = Some(message.clone());
                self.set_status(message, StatusKind::Error);
                return Ok(Mode::EditingSong { id, form });
            }
        };

        let updated = Song::from_draft(id.clone(), draft);
        if let Err(err) = self.store.edit_song(updated.clone()) {
            let message = surface_error(&err);
            form.error = Some(message.clone());
            self.set_status(message, StatusKind::Error);
            return Ok(Mode::EditingSong { id, form });
        }

        self.refresh_library();
        if let Screen::Detail(detail) = &mut self.screen {
            if detail.song.id == updated.id {
                detail.song = updated.clone();
            }
        }
        self.set_status("Chant updated.", StatusKind::Info);
        Ok(Mode::Normal)
    }

    fn handle_confirm_delete_song(
        &mut self,
        code: KeyCode,
        confirm: ConfirmDeleteSong,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.store.delete_song(&confirm.song.id) {
                    Ok(()) => {
                        let was_open = matches!(
                            &self.screen,
                            Screen::Detail(detail) if detail.song.id == confirm.song.id
                        );
                        if was_open {
                            self.back_to_library();
                        } else {
                            self.refresh_library();
                        }
                        self.set_status(
                            format!("Deleted {}.", confirm.song.display_title()),
                            StatusKind::Info,
                        );
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::ConfirmDeleteSong(confirm))
                    }
                }
            }
            _ => Ok(Mode::ConfirmDeleteSong(confirm)),
        }
    }

    fn handle_confirm_delete_selected(&mut self, code: KeyCode, count: usize) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.store.delete_selected_songs() {
                    Ok(removed) => {
                        self.refresh_library();
                        self.set_status(
                            format!("Deleted {removed} marked chant(s)."),
                            StatusKind::Info,
                        );
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::ConfirmDeleteSelected { count })
                    }
                }
            }
            _ => Ok(Mode::ConfirmDeleteSelected { count }),
        }
    }

    /// Deleting everything is irreversible, so confirming the first dialog
    /// only arms a second one; only confirming that second dialog mutates.
    fn handle_confirm_delete_all(
        &mut self,
        code: KeyCode,
        confirm: ConfirmDeleteAll,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => match confirm.stage {
                DeleteAllStage::First => Ok(Mode::ConfirmDeleteAll(ConfirmDeleteAll {
                    stage: DeleteAllStage::Second,
                })),
                DeleteAllStage::Second => match self.store.delete_all_songs() {
                    Ok(()) => {
                        self.refresh_library();
                        self.set_status("All chants deleted.", StatusKind::Info);
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::ConfirmDeleteAll(confirm))
                    }
                },
            },
            _ => Ok(Mode::ConfirmDeleteAll(confirm)),
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                if let Screen::Library(library) = &mut self.screen {
                    library.set_filter(None, self.store.songs());
                }
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => {
                // Keep the filter applied and drop back to normal browsing.
                return Ok(Mode::Normal);
            }
            KeyCode::Up => self.move_library_selection(-1),
            KeyCode::Down => self.move_library_selection(1),
            KeyCode::PageUp => self.move_library_selection(-5),
            KeyCode::PageDown => self.move_library_selection(5),
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    state.query.push(ch);
                }
            }
            _ => {}
        }

        let filter = if state.query.trim().is_empty() {
            None
        } else {
            Some(state.query.clone())
        };
        if let Screen::Library(library) = &mut self.screen {
            library.set_filter(filter, self.store.songs());
        }

        Ok(Mode::Searching(state))
    }

    fn handle_import(&mut self, code: KeyCode, mut form: PathForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Import cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter => self.run_import(form),
            KeyCode::Backspace => {
                form.backspace();
                Ok(Mode::Importing(form))
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
                Ok(Mode::Importing(form))
            }
            _ => Ok(Mode::Importing(form)),
        }
    }

    /// Read, parse, and commit an import batch. Any failure leaves the
    /// dialog open with the error inline and the collection untouched.
    fn run_import(&mut self, mut form: PathForm) -> Result<Mode> {
        let path = form.path.trim().to_string();
        if path.is_empty() {
            form.error = Some("A file path is required.".to_string());
            return Ok(Mode::Importing(form));
        }

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                form.error = Some(format!("Failed to read {path}: {err}"));
                return Ok(Mode::Importing(form));
            }
        };

        let drafts = match csv::parse_import(&text) {
            Ok(drafts) => drafts,
            Err(err) => {
                form.error = Some(err.to_string());
                return Ok(Mode::Importing(form));
            }
        };

        match self.store.import_songs(drafts) {
            Ok(count) => {
                self.refresh_library();
                self.set_status(format!("Imported {count} chant(s)."), StatusKind::Info);
                Ok(Mode::Normal)
            }
            Err(err) => {
                form.error = Some(surface_error(&err));
                Ok(Mode::Importing(form))
            }
        }
    }

    fn handle_export(&mut self, code: KeyCode, mut form: PathForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Export cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter => self.run_export(form),
            KeyCode::Backspace => {
                form.backspace();
                Ok(Mode::Exporting(form))
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
                Ok(Mode::Exporting(form))
            }
            _ => Ok(Mode::Exporting(form)),
        }
    }

    fn run_export(&mut self, mut form: PathForm) -> Result<Mode> {
        let path = form.path.trim().to_string();
        if path.is_empty() {
            form.error = Some("A file path is required.".to_string());
            return Ok(Mode::Exporting(form));
        }

        let text = csv::export(self.store.songs());
        if let Err(err) = fs::write(&path, text) {
            form.error = Some(format!("Failed to write {path}: {err}"));
            return Ok(Mode::Exporting(form));
        }

        self.set_status(
            format!("Exported {} chant(s) to {path}.", self.store.songs().len()),
            StatusKind::Info,
        );
        Ok(Mode::Normal)
    }

    fn open_prompter(&mut self) {
        self.clear_status();
        let prompter = PrompterScreen::new(&mut self.store);
        self.screen = Screen::Prompter(prompter, WakeGuard::acquire());
    }

    fn back_to_library(&mut self) {
        self.clear_status();
        self.screen = Screen::Library(LibraryScreen::new(self.store.songs()));
    }

    fn refresh_library(&mut self) {
        if let Screen::Library(library) = &mut self.screen {
            library.rebuild(self.store.songs());
        }
    }

    fn move_library_selection(&mut self, offset: isize) {
        if let Screen::Library(library) = &mut self.screen {
            library.move_selection(offset);
        }
    }

    fn library_current_song(&self) -> Option<Song> {
        match &self.screen {
            Screen::Library(library) => library.current_song().cloned(),
            _ => None,
        }
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // The teleprompter is deliberately chromeless: no footer, no status.
        if let Screen::Prompter(..) = &self.screen {
            self.draw_prompter(frame, area);
        } else {
            let footer_height = FOOTER_HEIGHT.min(area.height);
            let (content_area, footer_area) = if area.height > footer_height {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                    .split(area);
                (chunks[0], chunks[1])
            } else {
                (area, area)
            };

            // The reading-mode distance depends on the viewport, so record
            // it before rendering.
            if let Screen::Detail(detail) = &mut self.screen {
                detail.viewport = content_area
                    .height
                    .saturating_sub(DETAIL_HEADER_HEIGHT + 2);
            }

            match &self.screen {
                Screen::Library(library) => self.draw_library(frame, content_area, library),
                Screen::Detail(detail) => self.draw_detail(frame, content_area, detail),
                Screen::Settings(settings) => self.draw_settings(frame, content_area, settings),
                Screen::Prompter(..) => {}
            }

            if area.height >= footer_height {
                self.draw_footer(frame, footer_area);
            }
        }

        match &self.mode {
            Mode::AddingSong(form) => self.draw_song_form(frame, area, "Add Chant", form),
            Mode::EditingSong { form, .. } => self.draw_song_form(frame, area, "Edit Chant", form),
            Mode::ConfirmDeleteSong(confirm) => self.draw_confirm_delete_song(frame, area, confirm),
            Mode::ConfirmDeleteSelected { count } => {
                self.draw_confirm_delete_selected(frame, area, *count)
            }
            Mode::ConfirmDeleteAll(confirm) => self.draw_confirm_delete_all(frame, area, confirm),
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::Importing(form) => self.draw_path_form(frame, area, "Import CSV", form),
            Mode::Exporting(form) => self.draw_path_form(frame, area, "Export CSV", form),
            Mode::Normal => {}
        }
    }

    fn draw_library(&self, frame: &mut Frame, area: Rect, library: &LibraryScreen) {
        let title = match &library.filter {
            Some(query) if !query.trim().is_empty() => format!("CapoCanto (search: {query})"),
            _ => "CapoCanto".to_string(),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.store.is_empty() {
            let message = Paragraph::new("No chants yet. Press '+' to add one or 'i' to import.")
                .alignment(Alignment::Center);
            frame.render_widget(message, inner);
            return;
        }

        if library.visible.is_empty() {
            let message = Paragraph::new("No chants match the current search.")
                .alignment(Alignment::Center);
            frame.render_widget(message, inner);
            return;
        }

        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut selected_line = 0usize;
        let mut song_index = 0usize;

        for (category, songs) in &library.sections {
            if songs.is_empty() && library.has_filter() {
                continue;
            }

            lines.push(Line::from(Span::styled(
                format!("{}  ({} chants)", category.label(), songs.len()),
                Style::default()
                    .fg(category_color(*category))
                    .add_modifier(Modifier::BOLD),
            )));

            if songs.is_empty() {
                lines.push(Line::from(Span::styled(
                    "  (none yet)".to_string(),
                    Style::default().fg(Color::DarkGray),
                )));
            }

            for song in songs {
                let marker = if self.store.is_selected(&song.id) {
                    "[x] "
                } else {
                    "[ ] "
                };
                let mut text = format!("  {marker}{}", song.display_title());
                if !song.mnemonic.trim().is_empty() && !song.title.trim().is_empty() {
                    text.push_str(&format!("  ({})", song.mnemonic.trim()));
                }

                let style = if song_index == library.selected {
                    selected_line = lines.len();
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(text, style)));
                song_index += 1;
            }

            lines.push(Line::from(""));
        }

        // Keep the cursor row roughly centered once the list outgrows the
        // viewport.
        let half = usize::from(inner.height / 2);
        let scroll = selected_line.saturating_sub(half) as u16;

        let paragraph = Paragraph::new(lines).scroll((scroll, 0));
        frame.render_widget(paragraph, inner);
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect, detail: &DetailScreen) {
        let settings = self.store.settings();
        let base_style = if settings.dark_mode {
            Style::default().bg(Color::Black).fg(Color::White)
        } else {
            Style::default().bg(Color::White).fg(Color::Black)
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(DETAIL_HEADER_HEIGHT), Constraint::Min(1)])
            .split(area);

        let mut header_lines = vec![Line::from(Span::styled(
            detail.song.display_title().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        let mut info_spans = vec![Span::styled(
            detail.song.category.label().to_string(),
            Style::default().fg(category_color(detail.song.category)),
        )];
        if detail.is_reading() {
            info_spans.push(Span::raw(format!("   reading at {} BPM", detail.bpm)));
        }
        header_lines.push(Line::from(info_spans));

        let header = Paragraph::new(header_lines)
            .style(base_style)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        if detail.is_reading() {
            let mut lines = lyric_lines(
                &detail.song.lyrics,
                detail.song.category,
                settings.upper_case,
            );
            // Trailer rows let the final lines travel up before the
            // interpolation completes. Must match the distance computed in
            // [`DetailScreen::scroll_distance`].
            for _ in 0..SCROLL_TRAILER_ROWS {
                lines.push(Line::from(""));
            }
            let body = Paragraph::new(lines)
                .style(base_style)
                .block(Block::default().borders(Borders::ALL).title("Reading"))
                .scroll((detail.reading_offset, 0));
            frame.render_widget(body, chunks[1]);
            return;
        }

        let label_style = Style::default().fg(Color::DarkGray);
        let mut lines: Vec<Line<'static>> = Vec::new();

        if !detail.song.mnemonic.trim().is_empty() {
            lines.push(Line::from(Span::styled("Mnemonic", label_style)));
            lines.push(Line::from(detail.song.mnemonic.clone()));
            lines.push(Line::from(""));
        }

        if detail.song.lyrics.trim().is_empty() {
            lines.push(Line::from(Span::styled("No lyrics available.", label_style)));
        } else {
            lines.push(Line::from(Span::styled("Lyrics", label_style)));
            lines.extend(lyric_lines(
                &detail.song.lyrics,
                detail.song.category,
                settings.upper_case,
            ));
        }

        if !detail.song.media_link.trim().is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Media", label_style)));
            lines.push(Line::from(detail.song.media_link.clone()));
        }

        let body = Paragraph::new(lines)
            .style(base_style)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: false })
            .scroll((detail.manual_scroll, 0));
        frame.render_widget(body, chunks[1]);
    }

    fn draw_prompter(&self, frame: &mut Frame, area: Rect) {
        let Screen::Prompter(prompter, _) = &self.screen else {
            return;
        };
        let settings = self.store.settings();
        let base_style = if settings.dark_mode {
            Style::default().bg(Color::Black).fg(Color::White)
        } else {
            Style::default().bg(Color::White).fg(Color::Black)
        };

        if let Some(song) = &prompter.reading {
            let mut lines = vec![
                Line::from(Span::styled(
                    song.display_title().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ];
            if song.lyrics.trim().is_empty() {
                lines.push(Line::from("No lyrics available."));
            } else {
                lines.extend(lyric_lines(&song.lyrics, song.category, settings.upper_case));
            }
            lines.push(Line::from(""));
            let mut hint = String::from("[Esc] Back to prompter");
            if !song.media_link.trim().is_empty() {
                hint.push_str("   [Enter] Open media");
            }
            lines.push(Line::from(Span::styled(
                hint,
                Style::default().fg(Color::DarkGray),
            )));

            let paragraph = Paragraph::new(lines)
                .style(base_style)
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(3)])
            .split(area);

        let header = Line::from(vec![
            Span::styled(
                format_countdown(prompter.seconds_left),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "   [r] Shuffle   [1-3] Read   [s] Settings   [Esc] Back   [q] Quit",
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(header).style(base_style), chunks[0]);

        let panels = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(chunks[1]);

        for (index, panel_area) in panels.iter().enumerate() {
            self.draw_prompter_panel(frame, *panel_area, prompter, index);
        }
    }

    fn draw_prompter_panel(
        &self,
        frame: &mut Frame,
        area: Rect,
        prompter: &PrompterScreen,
        index: usize,
    ) {
        let settings = self.store.settings();
        let category = Category::ALL[index];
        let highlighted = prompter.highlighted == index;

        let mut block = Block::default()
            .style(Style::default().bg(category_color(category)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Black));
        if highlighted {
            block = block.border_style(
                Style::default()
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            );
            block = block.title(format!("> {} <", category.label()));
        } else {
            block = block.title(category.label());
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text_color = if settings.high_contrast {
            if settings.dark_mode {
                Color::White
            } else {
                Color::Black
            }
        } else {
            Color::Black
        };

        let content = match &prompter.picks[index] {
            Some(song) => {
                let mut text = song.prompt_text().to_string();
                if settings.upper_case {
                    text = text.to_uppercase();
                }
                Span::styled(
                    sized_text(&text, settings.font_size),
                    Style::default()
                        .fg(text_color)
                        .add_modifier(sized_modifier(settings.font_size)),
                )
            }
            None => Span::styled(
                format!("No chants in {}", category.label()),
                Style::default()
                    .fg(Color::Black)
                    .add_modifier(Modifier::ITALIC),
            ),
        };

        // Pad the panel so the text sits vertically centered.
        let mut lines = Vec::new();
        for _ in 0..inner.height.saturating_sub(1) / 2 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(content));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_settings(&self, frame: &mut Frame, area: Rect, settings_screen: &SettingsScreen) {
        let settings = self.store.settings();
        let block = Block::default()
            .title("Prompter Settings")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows: [(&str, String); 5] = [
            (
                "Rotation interval",
                format!("{} s", settings.rotation_interval),
            ),
            ("Font size", settings.font_size.label().to_string()),
            ("Dark mode", on_off(settings.dark_mode)),
            ("High contrast", on_off(settings.high_contrast)),
            ("Uppercase text", on_off(settings.upper_case)),
        ];

        let mut lines: Vec<Line<'static>> = vec![Line::from("")];
        for (index, (label, value)) in rows.into_iter().enumerate() {
            let selected = settings_screen.selected == index;
            let style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let value = if selected {
                format!("< {value} >")
            } else {
                value
            };
            lines.push(Line::from(Span::styled(
                format!("  {label:<18} {value}"),
                style,
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Changes are saved immediately.",
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = match (&self.screen, &self.mode) {
            (_, Mode::AddingSong(_)) => &[
                ("[Tab]", "Next Field"),
                ("[Enter]", "Save / Newline in Lyrics"),
                ("[Ctrl+S]", "Save"),
                ("[Esc]", "Cancel"),
            ],
            (_, Mode::EditingSong { .. }) => &[
                ("[Tab]", "Next Field"),
                ("[Enter]", "Save / Newline in Lyrics"),
                ("[Ctrl+S]", "Save"),
                ("[Ctrl+D]", "Delete"),
                ("[Esc]", "Cancel"),
            ],
            (_, Mode::ConfirmDeleteSong(_))
            | (_, Mode::ConfirmDeleteSelected { .. })
            | (_, Mode::ConfirmDeleteAll(_)) => &[("[Y]", "Confirm"), ("[N/Esc]", "Cancel")],
            (_, Mode::Searching(_)) => &[
                ("[Type]", "Filter"),
                ("[Up/Down]", "Move"),
                ("[Enter]", "Keep"),
                ("[Esc]", "Clear"),
            ],
            (_, Mode::Importing(_)) | (_, Mode::Exporting(_)) => {
                &[("[Enter]", "Run"), ("[Esc]", "Cancel")]
            }
            (Screen::Detail(_), _) => &[
                ("[r]", "Read"),
                ("[+/-]", "Tempo"),
                ("[Enter]", "Open Media"),
                ("[e]", "Edit"),
                ("[Up/Down]", "Scroll"),
                ("[Esc]", "Back"),
                ("[q]", "Quit"),
            ],
            (Screen::Settings(_), _) => &[
                ("[Up/Down]", "Field"),
                ("[Left/Right]", "Adjust"),
                ("[Esc]", "Back"),
                ("[q]", "Quit"),
            ],
            _ => &[
                ("[Up/Down]", "Select"),
                ("[Enter]", "Open"),
                ("[Space]", "Mark"),
                ("[+]", "Add"),
                ("[e]", "Edit"),
                ("[-]", "Delete"),
                ("[d]", "Delete Marked"),
                ("[D]", "Delete All"),
                ("[f]", "Search"),
                ("[i]", "Import"),
                ("[x]", "Export"),
                ("[p]", "Prompter"),
                ("[s]", "Settings"),
                ("[q]", "Quit"),
            ],
        };

        let mut spans = Vec::with_capacity(keys.len() * 2);
        for (index, (key, label)) in keys.iter().enumerate() {
            if index > 0 {
                spans.push(Span::raw("   "));
            }
            spans.push(Span::styled(*key, key_style));
            spans.push(Span::raw(format!(" {label}")));
        }
        Line::from(spans)
    }

    fn draw_song_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &SongForm) {
        let popup_area = centered_rect(70, 70, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut cursor: Option<(u16, u16)> = None;

        for (name, field) in [
            ("Title", SongField::Title),
            ("Category", SongField::Category),
            ("Mnemonic", SongField::Mnemonic),
        ] {
            if form.active == field {
                cursor = Some((
                    inner.x + name.len() as u16 + 2 + form.value_len(field) as u16,
                    inner.y + lines.len() as u16,
                ));
            }
            lines.push(form.build_line(name, field));
        }

        let lyrics_label_style = if form.active == SongField::Lyrics {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled("Lyrics:", lyrics_label_style)));

        let all_lines: Vec<&str> = form.lyrics.split('\n').collect();
        let first_shown = form.lyrics_line_count().saturating_sub(LYRICS_PREVIEW_ROWS);
        if first_shown > 0 {
            lines.push(Line::from(Span::styled(
                format!("  ({first_shown} earlier lines not shown)"),
                Style::default().fg(Color::DarkGray),
            )));
        }
        for (offset, text) in all_lines[first_shown..].iter().enumerate() {
            let is_last = first_shown + offset == all_lines.len() - 1;
            if is_last && form.active == SongField::Lyrics {
                cursor = Some((
                    inner.x + 2 + text.chars().count() as u16,
                    inner.y + lines.len() as u16,
                ));
            }
            lines.push(Line::from(format!("  {text}")));
        }

        if form.active == SongField::MediaLink {
            cursor = Some((
                inner.x + 12 + form.value_len(SongField::MediaLink) as u16,
                inner.y + lines.len() as u16,
            ));
        }
        lines.push(form.build_line("Media link", SongField::MediaLink));

        lines.push(Line::from(""));
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save (newline in lyrics), Ctrl+S anywhere, Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);

        if let Some((x, y)) = cursor {
            if y < inner.y + inner.height {
                frame.set_cursor_position((x.min(inner.x + inner.width), y));
            }
        }
    }

    fn draw_confirm_delete_song(
        &self,
        frame: &mut Frame,
        area: Rect,
        confirm: &ConfirmDeleteSong,
    ) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Delete Chant").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Delete '{}' permanently?",
                confirm.song.display_title()
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_confirm_delete_selected(&self, frame: &mut Frame, area: Rect, count: usize) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Delete Marked Chants")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete {count} marked chant(s)?")),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_confirm_delete_all(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDeleteAll) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let title = match confirm.stage {
            DeleteAllStage::First => "Delete All Chants",
            DeleteAllStage::Second => "Are You Sure?",
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let message = match confirm.stage {
            DeleteAllStage::First => {
                format!("Delete ALL {} chants?", self.store.songs().len())
            }
            DeleteAllStage::Second => {
                "This cannot be undone. Really delete everything?".to_string()
            }
        };

        let lines = vec![
            Line::from(message),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Search: ".len() as u16 + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_path_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &PathForm) {
        let popup_area = centered_rect(70, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![Line::from(vec![
            Span::raw("File: "),
            Span::styled(form.path.clone(), Style::default().fg(Color::Yellow)),
        ])];
        lines.push(Line::from(""));
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to run, Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let cursor_x = inner.x + "File: ".len() as u16 + form.path.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }
}

fn on_off(value: bool) -> String {
    if value { "on" } else { "off" }.to_string()
}
