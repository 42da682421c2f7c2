use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/chorus/config.toml` or `~/.config/chorus/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CHORUS__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub library: LibrarySettings,
    pub lyrics: LyricsSettings,
    pub logging: LoggingSettings,
    pub mpris: MprisSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Initial volume, 0-100.
    pub volume: u8,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 100,
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// How elapsed/total times are rendered.
    pub time_format: TimeFormat,
    /// Interval of the progress/lyric refresh tick (milliseconds).
    pub tick_ms: u64,
    /// Lyric lines shown above and below the active one.
    pub lyric_context_lines: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ sing along ~ ".to_string(),
            time_format: TimeFormat::MinutesSeconds,
            tick_ms: 500,
            lyric_context_lines: 2,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub enum TimeFormat {
    /// `MM:SS`
    #[serde(rename = "mm-ss", alias = "mm:ss", alias = "mm_ss", alias = "minutes-seconds")]
    MinutesSeconds,
    /// `HH:MM:SS`
    #[serde(
        rename = "hh-mm-ss",
        alias = "hh:mm:ss",
        alias = "hh_mm_ss",
        alias = "hours-minutes-seconds"
    )]
    HoursMinutesSeconds,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Volume change per `+` / `-` press.
    pub volume_step: u8,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// File extensions of companion lyric files.
    pub lyric_extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Where the folder browser starts when no directory is given.
    pub start_dir: Option<PathBuf>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "ogg".into()],
            lyric_extensions: vec!["lrc".into()],
            follow_links: true,
            include_hidden: false,
            recursive: false,
            max_depth: None,
            start_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LyricsSettings {
    /// Whether companion lyric files are loaded at all.
    pub enabled: bool,
    /// How lines carrying more than one timestamp are read.
    pub multi_tag: MultiTagMode,
}

impl Default for LyricsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            multi_tag: MultiTagMode::FirstOnly,
        }
    }
}

/// Handling of lines such as `[00:12.00][01:05.50]chorus`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MultiTagMode {
    /// Every tag is a separate entry for the same text.
    Repeat,
    /// Only the first tag counts; the rest stays in the text.
    #[default]
    #[serde(alias = "first_only", alias = "first")]
    FirstOnly,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub enabled: bool,
    /// `tracing` filter directive, overridden by `CHORUS_LOG`.
    pub level: String,
    /// Log directory; defaults to the XDG state dir.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MprisSettings {
    /// Register on the session bus for media keys / `playerctl`.
    pub enabled: bool,
}

impl Default for MprisSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}
