//! Audio subsystem: a command-driven `rodio` playback thread.
//!
//! The runtime owns an `AudioPlayer` and sends it `AudioCmd`s; the thread
//! publishes progress through a shared `PlaybackHandle`.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::*;
