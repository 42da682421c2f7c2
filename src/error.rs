//! Error types shared by the library scanner, lyric loader, audio engine and
//! logging setup.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Crate result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// IO failure, with the path involved when known.
    #[error("IO error at {path:?}: {source}")]
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },

    /// A file could be opened but not decoded as audio.
    #[error("failed to decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    /// No usable audio output device.
    #[error("audio output unavailable: {0}")]
    Output(#[from] rodio::StreamError),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl Error {
    /// Wrap an IO error together with the path it happened on.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: Some(path.as_ref().to_path_buf()),
        }
    }
}
