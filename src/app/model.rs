//! Application model types: `App` and `PlaybackState`.
//!
//! `App` is the single owner of the loaded folder (tracks and lyric tables),
//! the current track index, playback position and volume. It is only touched
//! from the runtime's event loop.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::audio::PlaybackHandle;
use crate::library::{Library, Track};
use crate::lyrics::{LyricTable, LyricTrack};

use super::browser::DirBrowser;

/// Scale of `App::progress_permyriad`.
pub const PROGRESS_SCALE: u16 = 10_000;

/// The playback state of the application.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Stopped
    }
}

/// The main application model.
pub struct App {
    pub tracks: Vec<Track>,
    pub lyrics: LyricTrack,
    /// Index of the loaded track; `None` while idle.
    pub current: Option<usize>,
    pub playback: PlaybackState,
    pub playback_handle: Option<PlaybackHandle>,

    pub position: Duration,
    pub active_lyric: Option<String>,
    pub volume: u8,

    pub current_dir: Option<PathBuf>,
    pub browser: Option<DirBrowser>,
    /// One-line hint shown in the status box (e.g. empty folder).
    pub status: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

impl App {
    /// Create an idle `App` with nothing loaded.
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            lyrics: LyricTrack::new(),
            current: None,
            playback: PlaybackState::Stopped,
            playback_handle: None,

            position: Duration::ZERO,
            active_lyric: None,
            volume: 100,

            current_dir: None,
            browser: None,
            status: None,
        }
    }

    /// Replace the loaded folder.
    ///
    /// Tracks and lyric tables are swapped together, so nothing from the
    /// previous folder survives. Returns the index of the track that is now
    /// loaded (the first one), or `None` when the folder had no audio.
    pub fn load_library(&mut self, library: Library) -> Option<usize> {
        let Library {
            root,
            tracks,
            lyrics,
        } = library;

        self.tracks = tracks;
        self.lyrics = lyrics;
        self.current = if self.tracks.is_empty() { None } else { Some(0) };
        self.playback = PlaybackState::Stopped;
        self.position = Duration::ZERO;
        self.active_lyric = None;
        self.status = if self.tracks.is_empty() {
            Some(format!("No playable files in {}", root.display()))
        } else {
            None
        };
        self.current_dir = Some(root);
        self.current
    }

    /// Return true if the loaded folder contains any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    /// Lyric table of the current track, if it has one.
    pub fn current_lyrics(&self) -> Option<&LyricTable> {
        self.current_track().and_then(|t| self.lyrics.get(&t.lyric_key()))
    }

    /// Move to the next track, wrapping to the first after the last.
    ///
    /// A no-op returning `None` when nothing is loaded.
    pub fn advance(&mut self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(i) => (i + 1) % self.tracks.len(),
            None => 0,
        };
        self.current = Some(next);
        self.position = Duration::ZERO;
        self.active_lyric = None;
        Some(next)
    }

    /// Record the playback position and recompute the active lyric line.
    pub fn refresh_progress(&mut self, position: Duration) {
        self.position = position;
        let at = u64::try_from(position.as_millis()).unwrap_or(u64::MAX);
        self.active_lyric = self
            .current_lyrics()
            .and_then(|t| t.active_line(at))
            .map(str::to_string);
    }

    pub fn elapsed_ms(&self) -> i64 {
        millis(self.position)
    }

    /// Duration of the current track in milliseconds, `-1` when unknown.
    pub fn total_ms(&self) -> i64 {
        self.current_track()
            .and_then(|t| t.duration)
            .map(millis)
            .unwrap_or(-1)
    }

    /// Progress through the current track on a `0..=PROGRESS_SCALE` scale.
    ///
    /// `None` when the duration is unknown or zero.
    pub fn progress_permyriad(&self) -> Option<u16> {
        let total = self.total_ms();
        if total <= 0 {
            return None;
        }
        let scaled = self.elapsed_ms().saturating_mul(i64::from(PROGRESS_SCALE)) / total;
        Some(scaled.clamp(0, i64::from(PROGRESS_SCALE)) as u16)
    }

    /// Playback position for a slider at `fraction` (clamped to `0.0..=1.0`).
    ///
    /// `None` when the duration is unknown.
    pub fn seek_target(&self, fraction: f64) -> Option<Duration> {
        let total = self.total_ms();
        if total <= 0 || fraction.is_nan() {
            return None;
        }
        let ms = (total as f64 * fraction.clamp(0.0, 1.0)).round() as u64;
        Some(Duration::from_millis(ms))
    }

    pub fn set_volume(&mut self, volume: u8) -> u8 {
        self.volume = volume.min(100);
        self.volume
    }

    pub fn volume_up(&mut self, step: u8) -> u8 {
        self.set_volume(self.volume.saturating_add(step))
    }

    pub fn volume_down(&mut self, step: u8) -> u8 {
        self.set_volume(self.volume.saturating_sub(step))
    }

    /// Volume as a linear gain for the audio sink.
    pub fn volume_gain(&self) -> f32 {
        f32::from(self.volume) / 100.0
    }

    /// Attach a `PlaybackHandle` used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    /// Show the folder picker at `start`.
    pub fn open_browser(&mut self, start: &Path, include_hidden: bool) -> io::Result<()> {
        self.browser = Some(DirBrowser::open(start, include_hidden)?);
        Ok(())
    }

    pub fn close_browser(&mut self) {
        self.browser = None;
    }

    pub fn browser_open(&self) -> bool {
        self.browser.is_some()
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }
}
