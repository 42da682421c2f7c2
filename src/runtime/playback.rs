//! Playback actions shared by key bindings, MPRIS commands and the
//! end-of-media handler. `App` is updated optimistically; the audio thread
//! catches up through its command queue.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::app::{App, PlaybackState};
use crate::audio::{AudioCmd, AudioPlayer, seek_by_target};
use crate::config::Settings;
use crate::library::scan;

/// Replace the playlist with the contents of `dir`.
///
/// The first track is loaded but left stopped.
pub fn load_folder(dir: &Path, settings: &Settings, app: &mut App, audio_player: &AudioPlayer) {
    let library = scan(dir, &settings.library, &settings.lyrics);
    if library.is_empty() {
        warn!(dir = %dir.display(), "no playable files");
    }
    audio_player.send(AudioCmd::SetTracks(library.tracks.clone()));
    if let Some(i) = app.load_library(library) {
        audio_player.send(AudioCmd::Load(i));
    }
}

/// Start the current track from the beginning.
pub fn play_current(app: &mut App, audio_player: &AudioPlayer) {
    let Some(i) = app.current else {
        return;
    };
    audio_player.send(AudioCmd::Play(i));
    app.playback = PlaybackState::Playing;
    app.refresh_progress(Duration::ZERO);
}

pub fn play(app: &mut App, audio_player: &AudioPlayer) {
    match app.playback {
        PlaybackState::Paused => {
            audio_player.send(AudioCmd::TogglePause);
            app.playback = PlaybackState::Playing;
        }
        PlaybackState::Stopped => play_current(app, audio_player),
        PlaybackState::Playing => {}
    }
}

pub fn pause(app: &mut App, audio_player: &AudioPlayer) {
    if app.playback == PlaybackState::Playing {
        audio_player.send(AudioCmd::TogglePause);
        app.playback = PlaybackState::Paused;
    }
}

/// No-op while nothing is loaded.
pub fn play_pause(app: &mut App, audio_player: &AudioPlayer) {
    if !app.has_tracks() {
        return;
    }
    match app.playback {
        PlaybackState::Playing => pause(app, audio_player),
        PlaybackState::Paused | PlaybackState::Stopped => play(app, audio_player),
    }
}

pub fn stop(app: &mut App, audio_player: &AudioPlayer) {
    audio_player.send(AudioCmd::Stop);
    app.playback = PlaybackState::Stopped;
    app.refresh_progress(Duration::ZERO);
}

/// Stop, move to the next track (wrapping) and play it.
pub fn next(app: &mut App, audio_player: &AudioPlayer) {
    if !app.has_tracks() {
        return;
    }
    audio_player.send(AudioCmd::Stop);
    if let Some(i) = app.advance() {
        debug!(index = i, "next track");
        play_current(app, audio_player);
    }
}

/// The loaded track ran out: continue with the next one.
pub fn end_of_media(app: &mut App, audio_player: &AudioPlayer) {
    if let Some(i) = app.advance() {
        debug!(index = i, "end of media, advancing");
        play_current(app, audio_player);
    }
}

/// Scrub by `secs` (negative goes back). Ignored while stopped.
pub fn scrub(secs: i32, app: &mut App, audio_player: &AudioPlayer) {
    if app.current_track().is_none() || app.playback == PlaybackState::Stopped {
        return;
    }
    audio_player.send(AudioCmd::SeekBy(secs));
    let target = seek_by_target(app.position, secs);
    app.refresh_progress(target);
}

/// Jump to `fraction` of the current track; ignored while the duration is
/// unknown.
pub fn seek_fraction(fraction: f64, app: &mut App, audio_player: &AudioPlayer) {
    if let Some(pos) = app.seek_target(fraction) {
        audio_player.send(AudioCmd::SeekTo(pos));
        app.refresh_progress(pos);
    }
}

/// Push the model's volume to the sink.
pub fn apply_volume(app: &App, audio_player: &AudioPlayer) {
    audio_player.send(AudioCmd::SetVolume(app.volume_gain()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{Library, Track};
    use crate::lyrics::LyricTrack;
    use std::path::PathBuf;

    fn app_with(durations: &[Option<u64>]) -> App {
        let tracks = durations
            .iter()
            .enumerate()
            .map(|(i, secs)| Track {
                duration: secs.map(Duration::from_secs),
                ..Track::from_path(format!("/music/{i}.mp3"))
            })
            .collect();
        let mut app = App::new();
        app.load_library(Library {
            root: PathBuf::from("/music"),
            tracks,
            lyrics: LyricTrack::new(),
        });
        app
    }

    #[test]
    fn actions_on_empty_folder_do_nothing() {
        let audio_player = AudioPlayer::new(1.0);
        let mut app = App::new();

        play_pause(&mut app, &audio_player);
        next(&mut app, &audio_player);
        end_of_media(&mut app, &audio_player);
        scrub(5, &mut app, &audio_player);
        seek_fraction(0.5, &mut app, &audio_player);

        assert_eq!(app.current, None);
        assert_eq!(app.playback, PlaybackState::Stopped);
        assert_eq!(app.position, Duration::ZERO);
        audio_player.quit_softly(Duration::ZERO);
    }

    #[test]
    fn play_pause_toggles_between_playing_and_paused() {
        let audio_player = AudioPlayer::new(1.0);
        let mut app = app_with(&[Some(200)]);

        play_pause(&mut app, &audio_player);
        assert_eq!(app.playback, PlaybackState::Playing);
        play_pause(&mut app, &audio_player);
        assert_eq!(app.playback, PlaybackState::Paused);
        play_pause(&mut app, &audio_player);
        assert_eq!(app.playback, PlaybackState::Playing);
        audio_player.quit_softly(Duration::ZERO);
    }

    #[test]
    fn end_of_media_wraps_to_first_track_and_plays() {
        let audio_player = AudioPlayer::new(1.0);
        let mut app = app_with(&[Some(200), Some(200)]);

        end_of_media(&mut app, &audio_player);
        assert_eq!(app.current, Some(1));
        assert_eq!(app.playback, PlaybackState::Playing);

        app.position = Duration::from_secs(199);
        end_of_media(&mut app, &audio_player);
        assert_eq!(app.current, Some(0));
        assert_eq!(app.playback, PlaybackState::Playing);
        assert_eq!(app.position, Duration::ZERO);
        audio_player.quit_softly(Duration::ZERO);
    }

    #[test]
    fn next_from_paused_plays_the_following_track() {
        let audio_player = AudioPlayer::new(1.0);
        let mut app = app_with(&[Some(200), Some(200), Some(200)]);
        app.current = Some(2);
        app.playback = PlaybackState::Paused;

        next(&mut app, &audio_player);
        assert_eq!(app.current, Some(0));
        assert_eq!(app.playback, PlaybackState::Playing);
        audio_player.quit_softly(Duration::ZERO);
    }

    #[test]
    fn unknown_duration_ignores_jumps_but_allows_scrubbing() {
        let audio_player = AudioPlayer::new(1.0);
        let mut app = app_with(&[None]);
        play_current(&mut app, &audio_player);
        app.refresh_progress(Duration::from_secs(3));

        seek_fraction(0.5, &mut app, &audio_player);
        assert_eq!(app.position, Duration::from_secs(3));

        scrub(5, &mut app, &audio_player);
        assert_eq!(app.position, Duration::from_secs(8));
        assert_eq!(app.total_ms(), -1);
        audio_player.quit_softly(Duration::ZERO);
    }

    #[test]
    fn seek_fraction_moves_to_share_of_known_duration() {
        let audio_player = AudioPlayer::new(1.0);
        let mut app = app_with(&[Some(200)]);
        play_current(&mut app, &audio_player);

        seek_fraction(0.25, &mut app, &audio_player);
        assert_eq!(app.position, Duration::from_secs(50));
        audio_player.quit_softly(Duration::ZERO);
    }

    #[test]
    fn scrub_after_stop_keeps_position_at_zero() {
        let audio_player = AudioPlayer::new(1.0);
        let mut app = app_with(&[Some(200)]);
        play_current(&mut app, &audio_player);
        app.refresh_progress(Duration::from_secs(30));

        stop(&mut app, &audio_player);
        scrub(5, &mut app, &audio_player);
        assert_eq!(app.playback, PlaybackState::Stopped);
        assert_eq!(app.position, Duration::ZERO);
        audio_player.quit_softly(Duration::ZERO);
    }
}
