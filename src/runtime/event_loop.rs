use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::app::{App, PlaybackState};
use crate::audio::AudioPlayer;
use crate::config;
use crate::mpris::ControlCmd;
use crate::mpris::MprisHandle;
use crate::runtime::mpris_sync::update_mpris;
use crate::runtime::{playback, startup};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Interval between progress/lyric refreshes.
    tick: Duration,
    last_tick: Instant,
    /// Last-known track index as emitted to MPRIS.
    pub last_mpris_index: Option<usize>,
    /// Last-known playback state as emitted to MPRIS.
    pub last_mpris_playback: PlaybackState,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from `app`.
    pub fn new(app: &App, settings: &config::Settings) -> Self {
        Self {
            tick: Duration::from_millis(settings.ui.tick_ms.max(1)),
            last_tick: Instant::now(),
            last_mpris_index: app.current,
            last_mpris_playback: app.playback,
        }
    }
}

/// What the audio thread reported since the last look.
struct AudioSnapshot {
    index: Option<usize>,
    playing: bool,
    elapsed: Duration,
    ended: bool,
    error: Option<String>,
}

fn take_snapshot(app: &App) -> Option<AudioSnapshot> {
    let handle = app.playback_handle.as_ref()?;
    let mut info = handle.lock().ok()?;
    Some(AudioSnapshot {
        index: info.index,
        playing: info.playing,
        elapsed: info.elapsed,
        ended: info.take_ended(),
        error: info.take_error(),
    })
}

/// Main terminal event loop: handles input, UI drawing, sync with the audio
/// thread and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Sync playback state from the audio thread.
        if let Some(snap) = take_snapshot(app) {
            if let Some(msg) = snap.error {
                warn!(error = %msg, "audio");
                app.set_status(msg);
            }

            app.playback = if snap.playing {
                PlaybackState::Playing
            } else if snap.index.is_none() || snap.elapsed.is_zero() {
                PlaybackState::Stopped
            } else {
                PlaybackState::Paused
            };

            if snap.ended {
                playback::end_of_media(app, audio_player);
                state.last_tick = Instant::now();
            } else if state.last_tick.elapsed() >= state.tick {
                app.refresh_progress(snap.elapsed);
                state.last_tick = Instant::now();
            }
        }

        // Keep MPRIS in sync even when playback changes come from media keys or auto-advance.
        if app.current != state.last_mpris_index || app.playback != state.last_mpris_playback {
            update_mpris(mpris, app);
            state.last_mpris_index = app.current;
            state.last_mpris_playback = app.playback;
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, app, audio_player, mpris) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let quit = if app.browser_open() {
                    handle_browser_key(key, settings, app, audio_player)
                } else {
                    handle_key_event(key, settings, app, audio_player, control_tx)
                };
                if quit {
                    audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
) -> bool {
    debug!(?cmd, "control command");
    match cmd {
        ControlCmd::Quit => {
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return true;
        }
        ControlCmd::Play => playback::play(app, audio_player),
        ControlCmd::Pause => playback::pause(app, audio_player),
        ControlCmd::PlayPause => playback::play_pause(app, audio_player),
        ControlCmd::Stop => playback::stop(app, audio_player),
        ControlCmd::Next => playback::next(app, audio_player),
    }
    update_mpris(mpris, app);

    false
}

/// Keys while the folder browser is open. Returns true to quit.
fn handle_browser_key(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
) -> bool {
    let Some(browser) = app.browser.as_mut() else {
        return false;
    };

    let chosen = match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Esc => {
            app.close_browser();
            return false;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            browser.move_down();
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            browser.move_up();
            None
        }
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => match browser.activate() {
            Ok(choice) => choice,
            Err(e) => {
                let msg = format!("Cannot open {}: {e}", browser.highlighted().display());
                app.set_status(msg);
                None
            }
        },
        KeyCode::Char('h') | KeyCode::Backspace | KeyCode::Left => {
            if let Err(e) = browser.ascend() {
                app.set_status(format!("Cannot go up: {e}"));
            }
            None
        }
        KeyCode::Char(' ') | KeyCode::Char('o') => Some(browser.highlighted().to_path_buf()),
        _ => None,
    };

    if let Some(dir) = chosen {
        app.close_browser();
        playback::load_folder(&dir, settings, app, audio_player);
    }
    false
}

/// Keys of the player view. Returns true to quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    control_tx: &mpsc::Sender<ControlCmd>,
) -> bool {
    let scrub = settings.controls.scrub_seconds.min(i32::MAX as u64) as i32;
    let step = settings.controls.volume_step;

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('o') => {
            let root = startup::browse_root(app, settings);
            startup::open_browser_at(&root, settings, app);
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('n') => {
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('L') | KeyCode::Right => playback::scrub(scrub, app, audio_player),
        KeyCode::Char('H') | KeyCode::Left => playback::scrub(-scrub, app, audio_player),
        KeyCode::Char(c @ '0'..='9') => {
            let tenth = f64::from(c.to_digit(10).unwrap_or(0)) / 10.0;
            playback::seek_fraction(tenth, app, audio_player);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            app.volume_up(step);
            playback::apply_volume(app, audio_player);
        }
        KeyCode::Char('-') => {
            app.volume_down(step);
            playback::apply_volume(app, audio_player);
        }
        _ => {}
    }

    false
}
