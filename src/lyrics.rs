//! Time-synchronized lyrics.
//!
//! Lyric files use the bracketed `[MM:SS.hh]` timestamp form. Each file is
//! parsed once into a `LyricTable`, which answers "which line is active at
//! this playback position" on every progress tick.

mod decode;
mod parse;
mod table;

pub use parse::load_lyric_file;
pub use table::{LyricTable, LyricTrack};

#[cfg(test)]
mod tests;
