//! Binary entry point that glues the JSON-backed domain model to the TUI.
//! The bootstrapping pipeline is: resolve the data directory, route
//! diagnostics to the log file beside it, hydrate the store, and drive the
//! Ratatui event loop until the user exits.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use capo_canto::{run_app, App, SongStore, Storage};

/// Initialize persistence, load cached data, and launch the event loop.
///
/// Returning a `Result` bubbles up fatal initialization problems (for
/// example a corrupted data file, which deliberately fails the load) to the
/// terminal instead of crashing silently.
fn main() -> Result<()> {
    let storage = Storage::open_default()?;
    init_diagnostics(&storage);

    let store = SongStore::load(storage, StdRng::from_os_rng())?;
    let mut app = App::new(store);
    run_app(&mut app)
}

/// Route tracing output to a file in the data directory. Diagnostics are
/// best-effort: if the file cannot be created the application simply runs
/// without a log.
fn init_diagnostics(storage: &Storage) {
    let Ok(file) = std::fs::File::create(storage.log_path()) else {
        return;
    };
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
    tracing::info!(dir = %storage.dir().display(), "diagnostics initialized");
}
