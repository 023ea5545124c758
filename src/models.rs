//! Domain models that mirror the on-disk JSON records and get passed
//! throughout the TUI. The intent is that these types stay light-weight data
//! holders so other layers can focus on presentation and persistence logic.
//! Serde attribute names are pinned to the historical record layout
//! (camelCase keys, lowercase category spellings) so existing data files keep
//! loading unchanged.

use serde::{Deserialize, Serialize};

/// The three fixed rhythm classes a chant can belong to. The set is closed:
/// screens, color tables, and default tempos all index off these members, so
/// adding a rhythm is a source change rather than a data change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "angola")]
    Angola,
    #[serde(rename = "saoBentoPequeno")]
    SaoBentoPequeno,
    #[serde(rename = "saoBentoGrande")]
    SaoBentoGrande,
}

impl Category {
    /// Every member in display order. The teleprompter shows one panel per
    /// entry, top to bottom.
    pub const ALL: [Category; 3] = [
        Category::Angola,
        Category::SaoBentoPequeno,
        Category::SaoBentoGrande,
    ];

    /// The spelling used in both the JSON blobs and the CSV format.
    pub fn wire_name(self) -> &'static str {
        match self {
            Category::Angola => "angola",
            Category::SaoBentoPequeno => "saoBentoPequeno",
            Category::SaoBentoGrande => "saoBentoGrande",
        }
    }

    /// Human-facing label shown in section headers and forms.
    pub fn label(self) -> &'static str {
        match self {
            Category::Angola => "Angola",
            Category::SaoBentoPequeno => "São Bento Pequeno",
            Category::SaoBentoGrande => "São Bento Grande",
        }
    }

    /// Resolve a wire spelling back to a member. Returns `None` for anything
    /// outside the three valid values; CSV import turns that into a
    /// line-numbered rejection.
    pub fn parse(raw: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|category| category.wire_name() == raw)
    }

    /// Cycle to the next member, wrapping around. Used by the category
    /// selector in the song form.
    pub fn next(self) -> Category {
        match self {
            Category::Angola => Category::SaoBentoPequeno,
            Category::SaoBentoPequeno => Category::SaoBentoGrande,
            Category::SaoBentoGrande => Category::Angola,
        }
    }

    /// Cycle to the previous member, wrapping around.
    pub fn previous(self) -> Category {
        match self {
            Category::Angola => Category::SaoBentoGrande,
            Category::SaoBentoPequeno => Category::Angola,
            Category::SaoBentoGrande => Category::SaoBentoPequeno,
        }
    }
}

/// In-memory representation of a catalogued chant. Optional text fields are
/// plain strings where the empty string means "absent"; the stored JSON may
/// omit them entirely, hence the `serde(default)` markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Generated identifier, unique within the collection. Minted by the
    /// store on creation and never edited afterwards.
    pub id: String,
    /// Title displayed in lists and the detail header.
    pub title: String,
    /// Rhythm class driving grouping, panel colors, and default tempo.
    pub category: Category,
    /// Short call-and-response cue. The teleprompter prefers this over the
    /// title when present.
    #[serde(default)]
    pub mnemonic: String,
    /// Full lyric text, possibly multi-line.
    #[serde(default)]
    pub lyrics: String,
    /// Free-text URL to a recording or video, opened via the system handler.
    #[serde(default)]
    pub media_link: String,
}

impl Song {
    /// Attach a freshly generated identifier to a draft.
    pub fn from_draft(id: String, draft: SongDraft) -> Self {
        Self {
            id,
            title: draft.title,
            category: draft.category,
            mnemonic: draft.mnemonic,
            lyrics: draft.lyrics,
            media_link: draft.media_link,
        }
    }

    /// Name shown in lists and headers. Falls back to the mnemonic because a
    /// record is guaranteed to have at least one of the two.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.mnemonic
        } else {
            &self.title
        }
    }

    /// Text shown on a teleprompter panel: the mnemonic cue when present,
    /// otherwise the title.
    pub fn prompt_text(&self) -> &str {
        if self.mnemonic.trim().is_empty() {
            &self.title
        } else {
            &self.mnemonic
        }
    }

    /// Copy of the editable fields, used to seed the edit form and to
    /// compare against re-imported rows.
    pub fn draft(&self) -> SongDraft {
        SongDraft {
            title: self.title.clone(),
            category: self.category,
            mnemonic: self.mnemonic.clone(),
            lyrics: self.lyrics.clone(),
            media_link: self.media_link.clone(),
        }
    }
}

/// A chant minus its generated identifier. Both the create form and the CSV
/// importer produce drafts; the store mints the identifier on commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongDraft {
    pub title: String,
    pub category: Category,
    pub mnemonic: String,
    pub lyrics: String,
    pub media_link: String,
}

impl Default for SongDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            category: Category::Angola,
            mnemonic: String::new(),
            lyrics: String::new(),
            media_link: String::new(),
        }
    }
}

impl SongDraft {
    /// A record must carry a title or a mnemonic; everything else is
    /// optional. Validation lives with the producers (form, CSV importer),
    /// both of which call this.
    pub fn has_required_text(&self) -> bool {
        !self.title.is_empty() || !self.mnemonic.is_empty()
    }
}

/// Display size for teleprompter panel text. The terminal cannot change the
/// glyph size, so the members map to increasing visual weight instead: plain,
/// bold, and bold with letter spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontSize {
    #[serde(rename = "small")]
    Small,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "large")]
    Large,
}

impl FontSize {
    pub fn label(self) -> &'static str {
        match self {
            FontSize::Small => "Small",
            FontSize::Medium => "Medium",
            FontSize::Large => "Large",
        }
    }

    pub fn next(self) -> FontSize {
        match self {
            FontSize::Small => FontSize::Medium,
            FontSize::Medium => FontSize::Large,
            FontSize::Large => FontSize::Small,
        }
    }

    pub fn previous(self) -> FontSize {
        match self {
            FontSize::Small => FontSize::Large,
            FontSize::Medium => FontSize::Small,
            FontSize::Large => FontSize::Medium,
        }
    }
}

/// Teleprompter display preferences. A singleton record created with
/// defaults on first run and updated in place from the settings screen.
/// Every field carries a `serde(default)` so blobs written before a field
/// existed still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrompterSettings {
    /// Seconds between automatic re-draws of the three panels.
    #[serde(default = "default_rotation_interval", rename = "rotationInterval")]
    pub rotation_interval: u32,
    #[serde(default = "default_font_size", rename = "fontSize")]
    pub font_size: FontSize,
    #[serde(default = "default_dark_mode", rename = "isDarkMode")]
    pub dark_mode: bool,
    #[serde(default, rename = "useHighContrast")]
    pub high_contrast: bool,
    #[serde(default, rename = "upperCase")]
    pub upper_case: bool,
}

/// Bounds for the rotation interval as adjusted from the settings screen.
/// Stored values outside the range are kept as-is; the bounds only constrain
/// edits.
pub const MIN_ROTATION_INTERVAL: u32 = 30;
pub const MAX_ROTATION_INTERVAL: u32 = 300;
pub const ROTATION_INTERVAL_STEP: u32 = 30;

fn default_rotation_interval() -> u32 {
    120
}

fn default_font_size() -> FontSize {
    FontSize::Medium
}

fn default_dark_mode() -> bool {
    true
}

impl Default for PrompterSettings {
    fn default() -> Self {
        Self {
            rotation_interval: default_rotation_interval(),
            font_size: default_font_size(),
            dark_mode: default_dark_mode(),
            high_contrast: false,
            upper_case: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_names_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.wire_name()), Some(category));
        }
        assert_eq!(Category::parse("samba"), None);
        assert_eq!(Category::parse("Angola"), None);
    }

    #[test]
    fn test_display_title_falls_back_to_mnemonic() {
        let song = Song::from_draft(
            "id-1".to_string(),
            SongDraft {
                mnemonic: "Paranauê".to_string(),
                ..SongDraft::default()
            },
        );
        assert_eq!(song.display_title(), "Paranauê");
        assert_eq!(song.prompt_text(), "Paranauê");
    }

    #[test]
    fn test_prompt_text_prefers_mnemonic_over_title() {
        let song = Song::from_draft(
            "id-2".to_string(),
            SongDraft {
                title: "Marinheiro Só".to_string(),
                mnemonic: "Eu não sou daqui".to_string(),
                ..SongDraft::default()
            },
        );
        assert_eq!(song.display_title(), "Marinheiro Só");
        assert_eq!(song.prompt_text(), "Eu não sou daqui");
    }

    #[test]
    fn test_settings_default_matches_first_run_record() {
        let settings = PrompterSettings::default();
        assert_eq!(settings.rotation_interval, 120);
        assert_eq!(settings.font_size, FontSize::Medium);
        assert!(settings.dark_mode);
        assert!(!settings.high_contrast);
        assert!(!settings.upper_case);
    }

    #[test]
    fn test_settings_tolerate_partial_blobs() {
        let settings: PrompterSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, PrompterSettings::default());

        let settings: PrompterSettings =
            serde_json::from_str(r#"{"rotationInterval": 60, "upperCase": true}"#).unwrap();
        assert_eq!(settings.rotation_interval, 60);
        assert!(settings.upper_case);
        assert_eq!(settings.font_size, FontSize::Medium);
    }

    #[test]
    fn test_song_serializes_with_historical_keys() {
        let song = Song::from_draft(
            "id-3".to_string(),
            SongDraft {
                title: "Zum Zum Zum".to_string(),
                category: Category::SaoBentoGrande,
                media_link: "https://example.com/zum".to_string(),
                ..SongDraft::default()
            },
        );
        let json = serde_json::to_string(&song).unwrap();
        assert!(json.contains(r#""mediaLink":"https://example.com/zum""#));
        assert!(json.contains(r#""category":"saoBentoGrande""#));
    }
}
