use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::logging;
use crate::mpris::{ControlCmd, MprisHandle, spawn_mpris};

mod event_loop;
mod mpris_sync;
mod playback;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_warning) = settings::load_settings();

    // The guard flushes buffered log lines on drop, so it lives until exit.
    let _log_guard = match logging::init(&settings.logging) {
        Ok(guard) => guard,
        Err(e) => {
            // The terminal is still ours at this point.
            eprintln!("chorus: {e}");
            None
        }
    };
    if let Some(msg) = &config_warning {
        warn!("{msg}");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let dir = env::args_os().nth(1).map(PathBuf::from);

    let audio_player = AudioPlayer::new(f32::from(settings.audio.volume.min(100)) / 100.0);
    let mut app = App::new();
    app.set_playback_handle(audio_player.playback_handle());

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = if settings.mpris.enabled {
        spawn_mpris(control_tx.clone())
    } else {
        MprisHandle::detached()
    };

    startup::apply_initial_folder(dir, &mut app, &audio_player, &settings);
    mpris_sync::update_mpris(&mpris, &app);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(&app, &settings);

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &audio_player,
            &mpris,
            &control_tx,
            &control_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        warn!(error = %e, "event loop failed");
    }
    info!("exiting");
    run_result
}
