//! Application module: the controller model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the loaded folder, the
//! current track and playback state. `app::browser` is the folder picker.

mod browser;
mod model;

pub use browser::DirBrowser;
pub use model::*;

#[cfg(test)]
mod tests;
