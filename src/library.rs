//! Music folder scanning.
//!
//! A scan turns one directory into a `Library`: the ordered track list plus
//! the lyric tables of every track that has a companion lyric file.

mod model;
mod scan;

pub use model::{Library, Track};
pub use scan::scan;

#[cfg(test)]
mod tests;
