use super::decode::decode_lyric_bytes;
use super::parse::{parse_lyrics, timestamp_ms};
use super::*;
use crate::config::MultiTagMode;
use std::path::Path;

fn abc_table() -> LyricTable {
    [
        (1000, "a".to_string()),
        (5000, "b".to_string()),
        (9000, "c".to_string()),
    ]
    .into_iter()
    .collect()
}

#[test]
fn timestamp_tag_converts_to_milliseconds() {
    let table = parse_lyrics("[02:15.30]hello", MultiTagMode::Repeat);
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(135_300), Some("hello"));
    assert_eq!(timestamp_ms(2, 15, 30), 135_300);
    assert_eq!(timestamp_ms(0, 0, 0), 0);
    assert_eq!(timestamp_ms(99, 59, 99), 99 * 60_000 + 59_000 + 990);
}

#[test]
fn active_line_is_greatest_timestamp_not_after_position() {
    let table = abc_table();
    assert_eq!(table.active_line(0), None);
    assert_eq!(table.active_line(999), None);
    assert_eq!(table.active_line(1000), Some("a"));
    assert_eq!(table.active_line(4999), Some("a"));
    assert_eq!(table.active_line(5000), Some("b"));
    assert_eq!(table.active_line(100_000), Some("c"));
}

#[test]
fn active_line_on_empty_table_is_none() {
    assert_eq!(LyricTable::new().active_line(12_345), None);
}

#[test]
fn lines_without_tags_are_skipped() {
    let text = "[ti:Some Song]\n[ar:Someone]\nplain text\n\n[1:02.30]bad minutes\n[00:01.234]three hundredths\n[00:03.00]kept\n";
    let table = parse_lyrics(text, MultiTagMode::Repeat);
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(3000), Some("kept"));
}

#[test]
fn file_without_any_tag_yields_empty_table() {
    let table = parse_lyrics("just\nsome\nwords", MultiTagMode::FirstOnly);
    assert!(table.is_empty());
}

#[test]
fn later_line_overwrites_same_timestamp() {
    let table = parse_lyrics("[00:10.00]first\n[00:10.00]second", MultiTagMode::Repeat);
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(10_000), Some("second"));
}

#[test]
fn tag_is_removed_and_text_trimmed() {
    let table = parse_lyrics("[00:01.50]  spaced out  \r\n", MultiTagMode::FirstOnly);
    assert_eq!(table.get(1500), Some("spaced out"));
}

#[test]
fn tag_only_line_maps_to_empty_text() {
    // Common in LRC files to clear the display after a verse.
    let table = parse_lyrics("[00:04.00]verse\n[00:08.00]", MultiTagMode::Repeat);
    assert_eq!(table.active_line(8000), Some(""));
}

#[test]
fn repeat_mode_maps_every_tag_to_the_same_text() {
    let table = parse_lyrics("[00:12.00][01:05.50]chorus", MultiTagMode::Repeat);
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(12_000), Some("chorus"));
    assert_eq!(table.get(65_500), Some("chorus"));
}

#[test]
fn first_only_mode_keeps_remaining_tags_in_text() {
    let table = parse_lyrics("[00:12.00][01:05.50]chorus", MultiTagMode::FirstOnly);
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(12_000), Some("[01:05.50]chorus"));
}

#[test]
fn window_returns_neighbours_around_active_line() {
    let table: LyricTable = (1..=5).map(|i| (i * 1000, format!("l{i}"))).collect();

    let w = table.window(3500, 1);
    assert_eq!(w.before, vec!["l2"]);
    assert_eq!(w.active, Some("l3"));
    assert_eq!(w.after, vec!["l4"]);

    let w = table.window(1000, 2);
    assert!(w.before.is_empty());
    assert_eq!(w.active, Some("l1"));
    assert_eq!(w.after, vec!["l2", "l3"]);

    let w = table.window(0, 2);
    assert_eq!(w.active, None);
    assert_eq!(w.after, vec!["l1", "l2"]);
}

#[test]
fn decode_strips_utf8_bom() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice("[00:01.00]héllo".as_bytes());
    assert_eq!(decode_lyric_bytes(&bytes), "[00:01.00]héllo");
}

#[test]
fn decode_handles_utf16_with_bom() {
    let text = "[00:01.00]歌词";

    let mut le = vec![0xFF, 0xFE];
    le.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
    assert_eq!(decode_lyric_bytes(&le), text);

    let mut be = vec![0xFE, 0xFF];
    be.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
    assert_eq!(decode_lyric_bytes(&be), text);
}

#[test]
fn decode_falls_back_to_gbk_without_bom() {
    let decoded = decode_lyric_bytes(b"[00:01.00]\xB8\xE8\xB4\xCA");
    assert_eq!(decoded, "[00:01.00]歌词");
}

#[test]
fn decode_keeps_valid_utf8_without_bom() {
    let decoded = decode_lyric_bytes("[00:01.00]歌词".as_bytes());
    assert_eq!(decoded, "[00:01.00]歌词");
}

#[test]
fn decode_replaces_bytes_invalid_in_every_encoding() {
    let decoded = decode_lyric_bytes(&[b'[', 0xFF, b']']);
    assert_eq!(decoded, "[\u{FFFD}]");
}

#[test]
fn load_lyric_file_reads_and_parses() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("song.lrc");
    std::fs::write(&path, "[00:00.50]one\n[00:02.00]two\n").unwrap();

    let table = load_lyric_file(&path, MultiTagMode::Repeat).unwrap();
    assert_eq!(table.active_line(1999), Some("one"));
    assert_eq!(table.active_line(2000), Some("two"));
}

#[test]
fn load_lyric_file_reads_gbk_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("song.lrc");
    std::fs::write(&path, b"[00:01.00]\xB8\xE8\xB4\xCA\n").unwrap();

    let table = load_lyric_file(&path, MultiTagMode::FirstOnly).unwrap();
    assert_eq!(table.active_line(1000), Some("歌词"));
}

#[test]
fn load_lyric_file_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_lyric_file(&dir.path().join("nope.lrc"), MultiTagMode::Repeat).unwrap_err();
    assert!(matches!(err, crate::error::Error::Io { .. }));
}

#[test]
fn lyric_track_looks_up_by_audio_path() {
    let mut lyrics = LyricTrack::new();
    lyrics.insert("/music/a/song", abc_table());
    assert_eq!(lyrics.len(), 1);
    assert_eq!(
        lyrics
            .get(Path::new("/music/a/song"))
            .and_then(|t| t.active_line(5000)),
        Some("b")
    );
    assert!(lyrics.get(Path::new("/music/b/song")).is_none());
}
