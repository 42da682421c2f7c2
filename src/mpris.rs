//! MPRIS (D-Bus) service so desktop media keys and `playerctl` can drive the
//! player.
//!
//! Calls arrive on a dedicated thread and are forwarded to the event loop as
//! `ControlCmd`s; the event loop pushes state back through `MprisHandle`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{debug, info, warn};
use zbus::{Connection, interface};
use zvariant::{OwnedObjectPath, OwnedValue, Value};

use crate::app::PlaybackState;
use crate::library::Track;

const BUS_NAME: &str = "org.mpris.MediaPlayer2.chorus";
const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    artist: Vec<String>,
    url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<OwnedObjectPath>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    /// A handle with no bus service behind it (MPRIS disabled).
    pub fn detached() -> Self {
        Self {
            state: Arc::new(Mutex::new(SharedState::default())),
        }
    }

    pub fn set_playback(&self, playback: PlaybackState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
    }

    /// Publish the loaded track, or clear the metadata with `None`.
    pub fn set_track_metadata(&self, index: Option<usize>, track: Option<&Track>) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };

        match (index, track) {
            (Some(i), Some(t)) => {
                s.title = Some(t.title.clone().unwrap_or_else(|| t.name.clone()));
                s.artist = t.artist.iter().cloned().collect();
                s.url = Some(format!("file://{}", t.path.display()));
                s.length_micros = t
                    .duration
                    .and_then(|d| i64::try_from(d.as_micros()).ok());
                s.track_id = OwnedObjectPath::try_from(format!("{OBJECT_PATH}/track/{i}")).ok();
            }
            _ => {
                s.title = None;
                s.artist.clear();
                s.url = None;
                s.length_micros = None;
                s.track_id = None;
            }
        }
    }
}

struct MediaPlayer2 {
    tx: Sender<ControlCmd>,
}

fn forward(tx: &Sender<ControlCmd>, cmd: ControlCmd) {
    debug!(?cmd, "MPRIS call");
    // The event loop is gone once we are shutting down.
    let _ = tx.send(cmd);
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl MediaPlayer2 {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        forward(&self.tx, ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "chorus"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec!["audio/mpeg".to_string(), "audio/ogg".to_string()]
    }
}

struct Player {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

fn insert_value(map: &mut HashMap<String, OwnedValue>, key: &str, value: Value<'_>) {
    if let Ok(v) = OwnedValue::try_from(value) {
        map.insert(key.to_string(), v);
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl Player {
    fn next(&self) {
        forward(&self.tx, ControlCmd::Next);
    }

    fn previous(&self) {
        // Cycling forward is the only navigation.
    }

    fn play(&self) {
        forward(&self.tx, ControlCmd::Play);
    }

    fn pause(&self) {
        forward(&self.tx, ControlCmd::Pause);
    }

    fn play_pause(&self) {
        forward(&self.tx, ControlCmd::PlayPause);
    }

    fn stop(&self) {
        forward(&self.tx, ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let playback = self
            .state
            .lock()
            .map(|s| s.playback)
            .unwrap_or_default();
        match playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        if let Some(id) = &s.track_id {
            insert_value(&mut map, "mpris:trackid", Value::from(id.clone().into_inner()));
        }
        insert_value(
            &mut map,
            "xesam:title",
            Value::from(s.title.clone().unwrap_or_default()),
        );
        if !s.artist.is_empty() {
            insert_value(&mut map, "xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(url) = &s.url {
            insert_value(&mut map, "xesam:url", Value::from(url.clone()));
        }
        if let Some(len) = s.length_micros {
            insert_value(&mut map, "mpris:length", Value::from(len));
        }
        map
    }
}

/// Register both interfaces under the well-known name and keep serving.
async fn serve(tx: Sender<ControlCmd>, state: Arc<Mutex<SharedState>>) -> zbus::Result<()> {
    let connection = Connection::session().await?;
    connection.request_name(BUS_NAME).await?;

    let object_server = connection.object_server();
    object_server
        .at(OBJECT_PATH, MediaPlayer2 { tx: tx.clone() })
        .await?;
    object_server.at(OBJECT_PATH, Player { tx, state }).await?;
    info!(name = BUS_NAME, "MPRIS service registered");

    // The connection serves requests in the background while we hold it.
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

/// Start the MPRIS service on its own thread.
///
/// Bus failures are logged and leave the player running without media-key
/// support.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let handle = MprisHandle::detached();
    let state = Arc::clone(&handle.state);

    std::thread::spawn(move || {
        if let Err(e) = block_on(serve(tx, state)) {
            warn!(error = %e, "MPRIS unavailable");
        }
    });

    handle
}
