use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::path::{Path, PathBuf};

/// Lyric lines of one track, keyed by the millisecond they become active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricTable {
    lines: BTreeMap<u64, String>,
}

/// The active line of a table together with its neighbours, oldest first.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LyricWindow<'a> {
    pub before: Vec<&'a str>,
    pub active: Option<&'a str>,
    pub after: Vec<&'a str>,
}

impl LyricTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a line, replacing whatever was stored at the same timestamp.
    pub fn insert(&mut self, time_ms: u64, text: impl Into<String>) {
        self.lines.insert(time_ms, text.into());
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, time_ms: u64) -> Option<&str> {
        self.lines.get(&time_ms).map(String::as_str)
    }

    /// The line whose timestamp is the greatest one not after `time_ms`.
    ///
    /// Returns `None` when playback is before the first line or the table is
    /// empty.
    pub fn active_line(&self, time_ms: u64) -> Option<&str> {
        self.active_entry(time_ms).map(|(_, s)| s)
    }

    fn active_entry(&self, time_ms: u64) -> Option<(u64, &str)> {
        self.lines
            .range(..=time_ms)
            .next_back()
            .map(|(&t, s)| (t, s.as_str()))
    }

    /// The active line plus up to `radius` lines on each side of it.
    ///
    /// Before the first timestamp there is no active line; the upcoming lines
    /// are still returned in `after` so the panel can preview them.
    pub fn window(&self, time_ms: u64, radius: usize) -> LyricWindow<'_> {
        let Some((at, active)) = self.active_entry(time_ms) else {
            return LyricWindow {
                before: Vec::new(),
                active: None,
                after: self.lines.values().take(radius).map(String::as_str).collect(),
            };
        };

        let mut before: Vec<&str> = self
            .lines
            .range(..at)
            .rev()
            .take(radius)
            .map(|(_, s)| s.as_str())
            .collect();
        before.reverse();

        let after = self
            .lines
            .range((Bound::Excluded(at), Bound::Unbounded))
            .take(radius)
            .map(|(_, s)| s.as_str())
            .collect();

        LyricWindow {
            before,
            active: Some(active),
            after,
        }
    }
}

impl FromIterator<(u64, String)> for LyricTable {
    fn from_iter<I: IntoIterator<Item = (u64, String)>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

/// Lyric tables of a loaded folder.
///
/// Keyed by the audio file's path without its extension, so same-named
/// tracks in different subfolders keep their own lyrics.
#[derive(Debug, Clone, Default)]
pub struct LyricTrack {
    tables: HashMap<PathBuf, LyricTable>,
}

impl LyricTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<PathBuf>, table: LyricTable) {
        self.tables.insert(key.into(), table);
    }

    pub fn get(&self, key: &Path) -> Option<&LyricTable> {
        self.tables.get(key)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
