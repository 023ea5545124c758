use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Category, Song, SongDraft};

/// Form state for chant creation and editing. The lyrics field is the one
/// multi-line input in the application: Enter inserts a newline there, while
/// every other field treats Enter as "save".
#[derive(Clone)]
pub(crate) struct SongForm {
    pub(crate) title: String,
    pub(crate) category: Category,
    pub(crate) mnemonic: String,
    pub(crate) lyrics: String,
    pub(crate) media_link: String,
    pub(crate) active: SongField,
    pub(crate) error: Option<String>,
}

/// Enumerates the fields within the song form to drive focus management.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum SongField {
    Title,
    Category,
    Mnemonic,
    Lyrics,
    MediaLink,
}

impl Default for SongForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            category: Category::Angola,
            mnemonic: String::new(),
            lyrics: String::new(),
            media_link: String::new(),
            active: SongField::Title,
            error: None,
        }
    }
}

impl SongForm {
    /// Populate the form from an existing chant when entering edit mode.
    pub(crate) fn from_song(song: &Song) -> Self {
        Self {
            title: song.title.clone(),
            category: song.category,
            mnemonic: song.mnemonic.clone(),
            lyrics: song.lyrics.clone(),
            media_link: song.media_link.clone(),
            active: SongField::Title,
            error: None,
        }
    }

    /// Cycle focus forward across the five fields.
    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            SongField::Title => SongField::Category,
            SongField::Category => SongField::Mnemonic,
            SongField::Mnemonic => SongField::Lyrics,
            SongField::Lyrics => SongField::MediaLink,
            SongField::MediaLink => SongField::Title,
        };
    }

    /// Cycle focus backward.
    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            SongField::Title => SongField::MediaLink,
            SongField::Category => SongField::Title,
            SongField::Mnemonic => SongField::Category,
            SongField::Lyrics => SongField::Mnemonic,
            SongField::MediaLink => SongField::Lyrics,
        };
    }

    /// Insert a character into the active text field. The category selector
    /// ignores typed characters; it is cycled instead.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            SongField::Title => self.title.push(ch),
            SongField::Category => return false,
            SongField::Mnemonic => self.mnemonic.push(ch),
            SongField::Lyrics => self.lyrics.push(ch),
            SongField::MediaLink => self.media_link.push(ch),
        }
        true
    }

    /// Remove a character (or a newline, in the lyrics field) from the
    /// active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            SongField::Title => {
                self.title.pop();
            }
            SongField::Category => {}
            SongField::Mnemonic => {
                self.mnemonic.pop();
            }
            SongField::Lyrics => {
                self.lyrics.pop();
            }
            SongField::MediaLink => {
                self.media_link.pop();
            }
        }
    }

    /// Append a newline to the lyrics. Only meaningful while the lyrics
    /// field is focused; the caller routes Enter here in that case.
    pub(crate) fn push_newline(&mut self) {
        if self.active == SongField::Lyrics {
            self.lyrics.push('\n');
        }
    }

    /// Step the category selector when it has focus.
    pub(crate) fn cycle_category(&mut self, forward: bool) {
        self.category = if forward {
            self.category.next()
        } else {
            self.category.previous()
        };
    }

    /// Validate and normalize form inputs into a draft ready for the store.
    pub(crate) fn parse_inputs(&self) -> Result<SongDraft> {
        let title = self.title.trim().to_string();
        let mnemonic = self.mnemonic.trim().to_string();
        let draft = SongDraft {
            title,
            category: self.category,
            mnemonic,
            lyrics: self.lyrics.trim_end().to_string(),
            media_link: self.media_link.trim().to_string(),
        };
        if !draft.has_required_text() {
            return Err(anyhow!("A title or a mnemonic phrase is required."));
        }
        Ok(draft)
    }

    /// Render a styled single-row line for the modal form. The lyrics field
    /// is drawn separately because it spans multiple rows.
    pub(crate) fn build_line(&self, field_name: &str, field: SongField) -> Line<'static> {
        let is_active = self.active == field;

        let (display, is_empty) = match field {
            SongField::Title => (self.title.clone(), self.title.is_empty()),
            SongField::Category => (format!("< {} >", self.category.label()), false),
            SongField::Mnemonic => (self.mnemonic.clone(), self.mnemonic.is_empty()),
            SongField::Lyrics => (self.lyrics.clone(), self.lyrics.is_empty()),
            SongField::MediaLink => (self.media_link.clone(), self.media_link.is_empty()),
        };

        let placeholder = match field {
            SongField::Title => "<title or mnemonic>",
            SongField::Mnemonic => "<title or mnemonic>",
            _ => "<optional>",
        };
        let display = if is_empty {
            placeholder.to_string()
        } else {
            display
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if is_empty {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Character count of the requested field, used to place the cursor.
    /// For the lyrics this is the length of the last line.
    pub(crate) fn value_len(&self, field: SongField) -> usize {
        match field {
            SongField::Title => self.title.chars().count(),
            SongField::Category => self.category.label().chars().count() + 4,
            SongField::Mnemonic => self.mnemonic.chars().count(),
            SongField::Lyrics => self
                .lyrics
                .rsplit('\n')
                .next()
                .map(|line| line.chars().count())
                .unwrap_or(0),
            SongField::MediaLink => self.media_link.chars().count(),
        }
    }

    /// Number of lines the lyrics input currently spans.
    pub(crate) fn lyrics_line_count(&self) -> usize {
        self.lyrics.split('\n').count()
    }
}

/// State for confirming a single-chant deletion, reachable from the library,
/// the detail screen, and the edit form.
pub(crate) struct ConfirmDeleteSong {
    pub(crate) song: Song,
}

/// Two-step confirmation for emptying the whole collection. The first
/// acknowledgement advances to [`DeleteAllStage::Second`]; only confirming
/// again actually deletes.
pub(crate) struct ConfirmDeleteAll {
    pub(crate) stage: DeleteAllStage,
}

#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum DeleteAllStage {
    First,
    Second,
}

impl ConfirmDeleteAll {
    pub(crate) fn new() -> Self {
        Self {
            stage: DeleteAllStage::First,
        }
    }
}

/// Single-field path prompt shared by the CSV import and export dialogs.
#[derive(Clone)]
pub(crate) struct PathForm {
    pub(crate) path: String,
    pub(crate) error: Option<String>,
}

impl PathForm {
    pub(crate) fn new(initial: &str) -> Self {
        Self {
            path: initial.to_string(),
            error: None,
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.path.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inputs_requires_title_or_mnemonic() {
        let mut form = SongForm::default();
        form.lyrics = "some lyrics".to_string();
        assert!(form.parse_inputs().is_err());

        form.mnemonic = "ai ai aidê".to_string();
        let draft = form.parse_inputs().unwrap();
        assert_eq!(draft.mnemonic, "ai ai aidê");
        assert!(draft.title.is_empty());
    }

    #[test]
    fn test_enter_only_feeds_the_lyrics_field() {
        let mut form = SongForm::default();
        form.push_newline();
        assert!(form.lyrics.is_empty());

        form.active = SongField::Lyrics;
        form.push_char('a');
        form.push_newline();
        form.push_char('b');
        assert_eq!(form.lyrics, "a\nb");
        assert_eq!(form.lyrics_line_count(), 2);
        assert_eq!(form.value_len(SongField::Lyrics), 1);
    }

    #[test]
    fn test_category_field_cycles_instead_of_typing() {
        let mut form = SongForm::default();
        form.active = SongField::Category;
        assert!(!form.push_char('x'));
        form.cycle_category(true);
        assert_eq!(form.category, Category::SaoBentoPequeno);
        form.cycle_category(false);
        assert_eq!(form.category, Category::Angola);
    }
}
