use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// Front end of the audio thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Spawn the audio thread with an initial linear `volume`.
    pub fn new(volume: f32) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));
        let join = spawn_audio_thread(rx, Arc::clone(&playback), volume);

        Self {
            tx,
            playback,
            join: Mutex::new(Some(join)),
        }
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        Arc::clone(&self.playback)
    }

    /// Queue a command. Commands sent after the thread exited are dropped.
    pub fn send(&self, cmd: AudioCmd) {
        if let Err(mpsc::SendError(cmd)) = self.tx.send(cmd) {
            warn!(?cmd, "audio thread has stopped, command dropped");
        }
    }

    /// Ask the thread to fade out and wait for it to finish.
    pub fn quit_softly(&self, fade_out: Duration) {
        let fade_out_ms = u64::try_from(fade_out.as_millis()).unwrap_or(u64::MAX);
        self.send(AudioCmd::Quit { fade_out_ms });

        let handle = self.join.lock().ok().and_then(|mut j| j.take());
        if let Some(h) = handle {
            let _ = h.join();
        }
    }
}
