use std::path::PathBuf;
use std::time::Duration;

use crate::lyrics::LyricTrack;

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub path: PathBuf,
    /// Display name: the file name without its extension.
    pub name: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub duration: Option<Duration>,
}

impl Track {
    /// The path minus its extension; companion lyric files share it.
    pub fn lyric_key(&self) -> PathBuf {
        self.path.with_extension("")
    }

    /// A track known only by its path, without probed tags.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "UNKNOWN".to_string());
        Self {
            path,
            name,
            title: None,
            artist: None,
            duration: None,
        }
    }
}

/// Everything loaded from one folder. Replaced as a whole on the next load.
#[derive(Debug, Clone, Default)]
pub struct Library {
    pub root: PathBuf,
    pub tracks: Vec<Track>,
    pub lyrics: LyricTrack,
}

impl Library {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
