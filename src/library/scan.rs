use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::{LibrarySettings, LyricsSettings};
use crate::lyrics::{LyricTrack, load_lyric_file};

use super::model::{Library, Track};

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.'))
                .filter(|e| !e.is_empty())
                .any(|e| e.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Path with its extension removed; audio and lyric files pair up on this.
fn stem_key(path: &Path) -> PathBuf {
    path.with_extension("")
}

fn clean_tag(v: Option<Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[derive(Default)]
struct TagProbe {
    title: Option<String>,
    artist: Option<String>,
    duration: Option<Duration>,
}

fn probe_tags(path: &Path) -> TagProbe {
    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no readable tags");
            return TagProbe::default();
        }
    };

    let duration = Some(tagged.properties().duration()).filter(|d| !d.is_zero());
    let (title, artist) = match tagged.primary_tag().or_else(|| tagged.first_tag()) {
        Some(tag) => (clean_tag(tag.title()), clean_tag(tag.artist())),
        None => (None, None),
    };

    TagProbe {
        title,
        artist,
        duration,
    }
}

/// Scan `dir` for audio files and their companion lyric files.
///
/// Tracks are ordered by file name, case-insensitively. A lyric file belongs
/// to the audio file with the same name minus extension. Unreadable lyric
/// files are skipped and the track simply has no lyrics.
pub fn scan(dir: &Path, settings: &LibrarySettings, lyrics_settings: &LyricsSettings) -> Library {
    let mut tracks: Vec<Track> = Vec::new();
    let mut lyric_files: HashMap<PathBuf, PathBuf> = HashMap::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || (!settings.include_hidden && is_hidden(path)) {
            continue;
        }

        if has_extension(path, &settings.extensions) {
            let probe = probe_tags(path);
            tracks.push(Track {
                title: probe.title,
                artist: probe.artist,
                duration: probe.duration,
                ..Track::from_path(path)
            });
        } else if lyrics_settings.enabled && has_extension(path, &settings.lyric_extensions) {
            lyric_files.insert(stem_key(path), path.to_path_buf());
        }
    }

    tracks.sort_by_cached_key(|t| t.path.to_string_lossy().to_lowercase());

    let mut lyrics = LyricTrack::new();
    for track in &tracks {
        let key = track.lyric_key();
        let Some(lyric_path) = lyric_files.get(&key) else {
            continue;
        };
        match load_lyric_file(lyric_path, lyrics_settings.multi_tag) {
            Ok(table) => {
                debug!(track = %track.name, lines = table.len(), "loaded lyrics");
                lyrics.insert(key, table);
            }
            Err(e) => debug!(track = %track.name, error = %e, "skipping lyrics"),
        }
    }

    info!(
        dir = %dir.display(),
        tracks = tracks.len(),
        with_lyrics = lyrics.len(),
        "scanned folder"
    );

    Library {
        root: dir.to_path_buf(),
        tracks,
        lyrics,
    }
}
