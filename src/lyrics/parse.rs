use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::MultiTagMode;
use crate::error::{Error, Result};

use super::decode::decode_lyric_bytes;
use super::table::LyricTable;

/// `[MM:SS.hh]`: two-digit minutes, seconds and hundredths.
static TIME_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([0-9]{2}):([0-9]{2})\.([0-9]{2})\]").expect("valid regex: TIME_TAG")
});

/// Milliseconds represented by a `[MM:SS.hh]` tag.
pub fn timestamp_ms(minutes: u64, seconds: u64, hundredths: u64) -> u64 {
    minutes * 60_000 + seconds * 1_000 + hundredths * 10
}

fn captured_ms(caps: &Captures<'_>) -> Option<u64> {
    let field = |i: usize| caps.get(i)?.as_str().parse::<u64>().ok();
    Some(timestamp_ms(field(1)?, field(2)?, field(3)?))
}

/// Parse lyric file text into a table.
///
/// Lines without a timestamp tag (metadata such as `[ti:...]`, blank lines,
/// malformed tags) are skipped. A later line with the same timestamp replaces
/// an earlier one.
pub fn parse_lyrics(text: &str, mode: MultiTagMode) -> LyricTable {
    let mut table = LyricTable::new();
    for line in text.lines() {
        parse_line(line, mode, &mut table);
    }
    table
}

fn parse_line(line: &str, mode: MultiTagMode, table: &mut LyricTable) {
    match mode {
        MultiTagMode::FirstOnly => {
            let Some(caps) = TIME_TAG.captures(line) else {
                return;
            };
            let (Some(time), Some(tag)) = (captured_ms(&caps), caps.get(0)) else {
                return;
            };
            let text = format!("{}{}", &line[..tag.start()], &line[tag.end()..]);
            table.insert(time, text.trim());
        }
        MultiTagMode::Repeat => {
            let times: Vec<u64> = TIME_TAG
                .captures_iter(line)
                .filter_map(|caps| captured_ms(&caps))
                .collect();
            if times.is_empty() {
                return;
            }
            let text = TIME_TAG.replace_all(line, "");
            let text = text.trim();
            for time in times {
                table.insert(time, text);
            }
        }
    }
}

/// Read, decode and parse the lyric file at `path`.
pub fn load_lyric_file(path: &Path, mode: MultiTagMode) -> Result<LyricTable> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    let text = decode_lyric_bytes(&bytes);
    Ok(parse_lyrics(&text, mode))
}
