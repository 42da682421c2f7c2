//! Audio-related small types and handles.
//!
//! This module defines the commands understood by the audio thread and the
//! playback snapshot it shares with the UI.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::library::Track;

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the track list (a new folder was loaded). Stops playback.
    SetTracks(Vec<Track>),
    /// Load the track at the given index, paused at the start.
    Load(usize),
    /// Load and start playing the track at the given index.
    Play(usize),
    /// Toggle pause/resume of the loaded track.
    TogglePause,
    /// Stop playback and unload the track.
    Stop,
    /// Jump to an absolute position in the loaded track.
    SeekTo(Duration),
    /// Seek by the specified number of seconds (positive or negative).
    SeekBy(i32),
    /// Linear output gain, `0.0..=1.0`.
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Clone, Default)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// Loaded track index in the current track list (if any).
    pub index: Option<usize>,
    /// Elapsed playback time for the loaded track.
    pub elapsed: Duration,
    /// Whether playback is currently active.
    pub playing: bool,
    /// Set when the loaded track played to its end; cleared by `take_ended`.
    pub ended: bool,
    /// Last playback failure, cleared by `take_error`.
    pub error: Option<String>,
}

impl PlaybackInfo {
    /// Consume the end-of-media flag.
    pub fn take_ended(&mut self) -> bool {
        std::mem::take(&mut self.ended)
    }

    pub fn take_error(&mut self) -> Option<String> {
        self.error.take()
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// Target position for a relative seek, never before the start.
pub fn seek_by_target(elapsed: Duration, secs: i32) -> Duration {
    let cur = i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX);
    let new = cur.saturating_add(i64::from(secs) * 1000).max(0);
    Duration::from_millis(new as u64)
}
