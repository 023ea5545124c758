//! Core library surface for the CapoCanto chant catalogue and teleprompter.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as the test suite can reuse the same pieces: the
//! domain models, the JSON persistence layer, the owned collection store,
//! the CSV transcoder, and the interactive front-end.

pub mod csv;
pub mod models;
pub mod storage;
pub mod store;
pub mod ui;

mod wake;

/// The domain types other layers manipulate.
pub use models::{Category, FontSize, PrompterSettings, Song, SongDraft};

/// Persistence and state. `Storage` locates the data directory; `SongStore`
/// owns the in-memory collection and mirrors it through `Storage`.
pub use storage::Storage;
pub use store::SongStore;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
