//! JSON-file persistence for the song collection and the prompter settings.
//! The store treats this layer as a side-effect mirror: both blobs are read
//! once at startup and rewritten in full after every mutation. The files are
//! pretty-printed so a practitioner can inspect or hand-edit their data; a
//! malformed file fails the load with a contextual error rather than being
//! silently repaired.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use tracing::debug;

use crate::models::{PrompterSettings, Song};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".capo-canto";
/// Serialized song collection, an array of song records.
const SONGS_FILE_NAME: &str = "capoeira-songs.json";
/// Serialized settings record.
const SETTINGS_FILE_NAME: &str = "prompter-settings.json";
/// Diagnostics log written next to the data files.
const LOG_FILE_NAME: &str = "capo-canto.log";

/// Handle on the data directory holding the two blobs. Tests point this at a
/// temporary directory; the binary uses [`Storage::open_default`].
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    /// Resolve the per-user data directory inside the home folder, creating
    /// it on first run.
    pub fn open_default() -> Result<Self> {
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Self::open(base_dirs.home_dir().join(DATA_DIR_NAME))
    }

    /// Open storage rooted at an arbitrary directory, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).context("failed to create data directory")?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where diagnostics go. The log is best-effort; callers ignore failures
    /// to create it.
    pub fn log_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE_NAME)
    }

    fn songs_path(&self) -> PathBuf {
        self.dir.join(SONGS_FILE_NAME)
    }

    fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE_NAME)
    }

    /// Load the whole collection. A missing file is a first run and reads as
    /// an empty collection; anything unparseable is surfaced to the caller.
    pub fn load_songs(&self) -> Result<Vec<Song>> {
        let path = self.songs_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&path).context("failed to read the song collection")?;
        let songs: Vec<Song> =
            serde_json::from_str(&text).context("the stored song collection is not valid JSON")?;
        debug!(count = songs.len(), "loaded song collection");
        Ok(songs)
    }

    /// Rewrite the collection blob in full.
    pub fn save_songs(&self, songs: &[Song]) -> Result<()> {
        let text = serde_json::to_string_pretty(songs)
            .context("failed to serialize the song collection")?;
        fs::write(self.songs_path(), text).context("failed to write the song collection")?;
        debug!(count = songs.len(), "persisted song collection");
        Ok(())
    }

    /// Load the settings record, falling back to defaults on first run.
    pub fn load_settings(&self) -> Result<PrompterSettings> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(PrompterSettings::default());
        }
        let text = fs::read_to_string(&path).context("failed to read the prompter settings")?;
        serde_json::from_str(&text).context("the stored prompter settings are not valid JSON")
    }

    /// Rewrite the settings blob in full.
    pub fn save_settings(&self, settings: &PrompterSettings) -> Result<()> {
        let text = serde_json::to_string_pretty(settings)
            .context("failed to serialize the prompter settings")?;
        fs::write(self.settings_path(), text).context("failed to write the prompter settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, SongDraft};

    #[test]
    fn test_missing_files_read_as_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        assert!(storage.load_songs().unwrap().is_empty());
        assert_eq!(storage.load_settings().unwrap(), PrompterSettings::default());
    }

    #[test]
    fn test_songs_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        let songs = vec![Song::from_draft(
            "id-1".to_string(),
            SongDraft {
                title: "Paranauê".to_string(),
                category: Category::Angola,
                lyrics: "paranauê, paraná".to_string(),
                ..SongDraft::default()
            },
        )];

        storage.save_songs(&songs).unwrap();
        assert_eq!(storage.load_songs().unwrap(), songs);
    }

    #[test]
    fn test_settings_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        let settings = PrompterSettings {
            rotation_interval: 90,
            upper_case: true,
            ..PrompterSettings::default()
        };

        storage.save_settings(&settings).unwrap();
        assert_eq!(storage.load_settings().unwrap(), settings);
    }

    #[test]
    fn test_malformed_blob_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        fs::write(storage.songs_path(), "not json at all").unwrap();
        assert!(storage.load_songs().is_err());

        fs::write(storage.settings_path(), "{\"rotationInterval\": \"soon\"}").unwrap();
        assert!(storage.load_settings().is_err());
    }
}
