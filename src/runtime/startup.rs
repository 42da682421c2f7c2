use std::env;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::config;

use super::playback;

/// Where the folder browser starts: the loaded folder, the configured start
/// directory, or the working directory.
pub fn browse_root(app: &App, settings: &config::Settings) -> PathBuf {
    app.current_dir
        .clone()
        .or_else(|| settings.library.start_dir.clone())
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Open the browser at `start`, reporting failures on the status line.
pub fn open_browser_at(start: &Path, settings: &config::Settings, app: &mut App) {
    if let Err(e) = app.open_browser(start, settings.library.include_hidden) {
        warn!(dir = %start.display(), error = %e, "cannot browse");
        app.set_status(format!("Cannot open {}: {e}", start.display()));
    }
}

/// Load the directory given on the command line, or let the user pick one.
pub fn apply_initial_folder(
    dir: Option<PathBuf>,
    app: &mut App,
    audio_player: &AudioPlayer,
    settings: &config::Settings,
) {
    app.set_volume(settings.audio.volume);
    playback::apply_volume(app, audio_player);

    match dir {
        Some(dir) if dir.is_dir() => playback::load_folder(&dir, settings, app, audio_player),
        Some(dir) => {
            warn!(dir = %dir.display(), "not a directory");
            app.set_status(format!("Not a directory: {}", dir.display()));
            let root = browse_root(app, settings);
            open_browser_at(&root, settings, app);
        }
        None => {
            let root = browse_root(app, settings);
            open_browser_at(&root, settings, app);
        }
    }
}
