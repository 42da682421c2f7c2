use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use crate::error::Error;
use crate::library::Track;

use super::sink::create_sink_at;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo, seek_by_target};

/// How often the thread checks for end-of-media and publishes elapsed time.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    volume: f32,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                let e = Error::from(e);
                error!(error = %e, "audio disabled");
                if let Ok(mut info) = playback_info.lock() {
                    info.error = Some(e.to_string());
                }
                // Keep accepting commands so senders never block or fail.
                while let Ok(cmd) = rx.recv() {
                    if matches!(cmd, AudioCmd::Quit { .. }) {
                        break;
                    }
                }
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut engine = Engine::new(&stream, playback_info, volume);

        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    engine.quit(fade_out_ms);
                    break;
                }
                Ok(cmd) => engine.handle(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            engine.poll();
        }
    })
}

/// Playback state owned by the audio thread.
struct Engine<'a> {
    stream: &'a OutputStream,
    tracks: Vec<Track>,
    info: PlaybackHandle,
    sink: Option<Sink>,
    index: Option<usize>,
    paused: bool,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
    volume: f32,
}

impl<'a> Engine<'a> {
    fn new(stream: &'a OutputStream, info: PlaybackHandle, volume: f32) -> Self {
        Self {
            stream,
            tracks: Vec::new(),
            info,
            sink: None,
            index: None,
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    fn publish(&self, update: impl FnOnce(&mut PlaybackInfo)) {
        if let Ok(mut info) = self.info.lock() {
            update(&mut info);
        }
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::SetTracks(tracks) => {
                self.stop();
                self.tracks = tracks;
                debug!(tracks = self.tracks.len(), "track list replaced");
            }
            AudioCmd::Load(i) => self.load(i, false),
            AudioCmd::Play(i) => self.load(i, true),
            AudioCmd::TogglePause => self.toggle_pause(),
            AudioCmd::Stop => self.stop(),
            AudioCmd::SeekTo(pos) => self.seek(pos),
            AudioCmd::SeekBy(secs) => self.seek(seek_by_target(self.elapsed(), secs)),
            AudioCmd::SetVolume(v) => {
                self.volume = v.clamp(0.0, 1.0);
                if let Some(s) = &self.sink {
                    s.set_volume(self.volume);
                }
            }
            AudioCmd::Quit { fade_out_ms } => self.quit(fade_out_ms),
        }
    }

    fn load(&mut self, i: usize, play: bool) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        let Some(track) = self.tracks.get(i) else {
            warn!(index = i, "no track at index");
            return;
        };

        match create_sink_at(self.stream, track, Duration::ZERO, self.volume) {
            Ok(sink) => {
                if play {
                    sink.play();
                }
                debug!(track = %track.name, play, "loaded");
                self.sink = Some(sink);
                self.index = Some(i);
                self.paused = !play;
                self.started_at = play.then(Instant::now);
                self.accumulated = Duration::ZERO;
                self.publish(|info| {
                    info.index = Some(i);
                    info.elapsed = Duration::ZERO;
                    info.playing = play;
                    info.ended = false;
                });
            }
            Err(e) => {
                warn!(error = %e, "cannot load track");
                self.index = None;
                self.paused = true;
                self.started_at = None;
                self.accumulated = Duration::ZERO;
                self.publish(|info| {
                    info.index = None;
                    info.elapsed = Duration::ZERO;
                    info.playing = false;
                    info.ended = false;
                    info.error = Some(e.to_string());
                });
            }
        }
    }

    fn toggle_pause(&mut self) {
        let Some(s) = &self.sink else {
            return;
        };
        if self.paused {
            s.play();
            self.started_at = Some(Instant::now());
        } else {
            s.pause();
            self.accumulated = self.elapsed();
            self.started_at = None;
        }
        self.paused = !self.paused;
        let playing = !self.paused;
        let elapsed = self.elapsed();
        self.publish(|info| {
            info.playing = playing;
            info.elapsed = elapsed;
        });
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.index = None;
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.publish(|info| {
            info.index = None;
            info.elapsed = Duration::ZERO;
            info.playing = false;
            info.ended = false;
        });
    }

    /// Rebuild the current sink starting at `pos`.
    fn seek(&mut self, pos: Duration) {
        let Some(i) = self.index else {
            return;
        };
        let Some(track) = self.tracks.get(i) else {
            return;
        };

        let new_sink = match create_sink_at(self.stream, track, pos, self.volume) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "seek failed");
                return;
            }
        };
        if let Some(old) = self.sink.replace(new_sink) {
            old.stop();
        }
        if !self.paused {
            if let Some(s) = &self.sink {
                s.play();
            }
            self.started_at = Some(Instant::now());
        } else {
            self.started_at = None;
        }
        self.accumulated = pos;
        self.publish(|info| info.elapsed = pos);
    }

    /// Publish elapsed time and detect the end of the loaded track.
    fn poll(&mut self) {
        let Some(s) = &self.sink else {
            return;
        };
        if self.paused {
            return;
        }
        if s.empty() {
            self.accumulated = self.elapsed();
            self.started_at = None;
            self.paused = true;
            let elapsed = self.accumulated;
            self.publish(|info| {
                info.elapsed = elapsed;
                info.playing = false;
                info.ended = true;
            });
        } else {
            let elapsed = self.elapsed();
            self.publish(|info| info.elapsed = elapsed);
        }
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(s) = self.sink.take() {
            // Fade out gently before stopping.
            if !self.paused {
                fade_out_sink(&s, self.volume, fade_out_ms);
            }
            s.stop();
        }
        // Update shared state so UI/MPRIS don't keep showing Playing.
        self.publish(|info| info.playing = false);
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
