use super::*;
use crate::library::{Library, Track};
use crate::lyrics::{LyricTable, LyricTrack};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn t(name: &str, secs: Option<u64>) -> Track {
    Track {
        duration: secs.map(Duration::from_secs),
        ..Track::from_path(format!("/music/{name}.mp3"))
    }
}

fn library(root: &str, names: &[&str]) -> Library {
    Library {
        root: PathBuf::from(root),
        tracks: names.iter().map(|n| t(n, Some(200))).collect(),
        lyrics: LyricTrack::new(),
    }
}

fn lyric_table() -> LyricTable {
    [
        (1000, "a".to_string()),
        (5000, "b".to_string()),
        (9000, "c".to_string()),
    ]
    .into_iter()
    .collect()
}

#[test]
fn new_app_is_idle() {
    let mut app = App::new();
    assert!(!app.has_tracks());
    assert_eq!(app.current, None);
    assert_eq!(app.playback, PlaybackState::Stopped);
    assert_eq!(app.advance(), None);
    assert_eq!(app.current, None);
}

#[test]
fn load_library_selects_first_track_stopped() {
    let mut app = App::new();
    assert_eq!(app.load_library(library("/a", &["one", "two"])), Some(0));
    assert_eq!(app.current_track().map(|t| t.name.as_str()), Some("one"));
    assert_eq!(app.playback, PlaybackState::Stopped);
    assert_eq!(app.position, Duration::ZERO);
    assert_eq!(app.current_dir, Some(PathBuf::from("/a")));
    assert!(app.status.is_none());
}

#[test]
fn advancing_n_times_returns_to_start() {
    let mut app = App::new();
    app.load_library(library("/a", &["one", "two", "three"]));

    assert_eq!(app.advance(), Some(1));
    assert_eq!(app.advance(), Some(2));
    assert_eq!(app.advance(), Some(0));
    assert_eq!(app.current, Some(0));
}

#[test]
fn advance_on_single_track_stays_put() {
    let mut app = App::new();
    app.load_library(library("/a", &["only"]));
    assert_eq!(app.advance(), Some(0));
}

#[test]
fn advance_resets_position_and_lyric() {
    let mut app = App::new();
    let mut lib = library("/a", &["one", "two"]);
    lib.lyrics.insert("/music/one", lyric_table());
    app.load_library(lib);

    app.refresh_progress(Duration::from_secs(6));
    assert_eq!(app.active_lyric.as_deref(), Some("b"));

    app.advance();
    assert_eq!(app.position, Duration::ZERO);
    assert_eq!(app.active_lyric, None);
}

#[test]
fn loading_empty_folder_goes_idle() {
    let mut app = App::new();
    app.load_library(library("/a", &["one"]));
    app.playback = PlaybackState::Playing;

    assert_eq!(app.load_library(library("/empty", &[])), None);
    assert!(!app.has_tracks());
    assert_eq!(app.current, None);
    assert_eq!(app.playback, PlaybackState::Stopped);
    assert!(app.status.as_deref().unwrap().contains("/empty"));
    assert_eq!(app.advance(), None);
}

#[test]
fn loading_new_folder_discards_previous_tracks_and_lyrics() {
    let mut app = App::new();
    let mut first = library("/a", &["old1", "old2"]);
    first.lyrics.insert("/music/old1", lyric_table());
    app.load_library(first);
    app.advance();
    app.refresh_progress(Duration::from_secs(2));

    app.load_library(library("/b", &["new"]));
    assert_eq!(app.tracks.len(), 1);
    assert_eq!(app.tracks[0].name, "new");
    assert!(app.lyrics.is_empty());
    assert!(app.lyrics.get(Path::new("/music/old1")).is_none());
    assert_eq!(app.current, Some(0));
    assert_eq!(app.position, Duration::ZERO);
    assert_eq!(app.active_lyric, None);
}

#[test]
fn refresh_progress_tracks_active_lyric() {
    let mut app = App::new();
    let mut lib = library("/a", &["song"]);
    lib.lyrics.insert("/music/song", lyric_table());
    app.load_library(lib);

    app.refresh_progress(Duration::ZERO);
    assert_eq!(app.active_lyric, None);
    app.refresh_progress(Duration::from_millis(1000));
    assert_eq!(app.active_lyric.as_deref(), Some("a"));
    app.refresh_progress(Duration::from_millis(4999));
    assert_eq!(app.active_lyric.as_deref(), Some("a"));
    app.refresh_progress(Duration::from_millis(5000));
    assert_eq!(app.active_lyric.as_deref(), Some("b"));
    app.refresh_progress(Duration::from_secs(100));
    assert_eq!(app.active_lyric.as_deref(), Some("c"));
}

#[test]
fn track_without_lyrics_shows_nothing() {
    let mut app = App::new();
    app.load_library(library("/a", &["song"]));
    app.refresh_progress(Duration::from_secs(10));
    assert!(app.current_lyrics().is_none());
    assert_eq!(app.active_lyric, None);
}

#[test]
fn progress_is_guarded_by_known_duration() {
    let mut app = App::new();
    assert_eq!(app.total_ms(), -1);
    assert_eq!(app.progress_permyriad(), None);
    assert_eq!(app.seek_target(0.5), None);

    app.load_library(Library {
        root: PathBuf::from("/a"),
        tracks: vec![t("unknown", None), t("zero", Some(0)), t("known", Some(200))],
        lyrics: LyricTrack::new(),
    });
    app.refresh_progress(Duration::from_secs(10));
    assert_eq!(app.total_ms(), -1);
    assert_eq!(app.progress_permyriad(), None);

    app.advance();
    assert_eq!(app.total_ms(), 0);
    assert_eq!(app.progress_permyriad(), None);

    app.advance();
    app.refresh_progress(Duration::from_secs(50));
    assert_eq!(app.total_ms(), 200_000);
    assert_eq!(app.progress_permyriad(), Some(2_500));

    app.refresh_progress(Duration::from_secs(500));
    assert_eq!(app.progress_permyriad(), Some(PROGRESS_SCALE));
}

#[test]
fn seek_target_scales_and_clamps_fraction() {
    let mut app = App::new();
    app.load_library(library("/a", &["song"]));
    assert_eq!(app.seek_target(0.0), Some(Duration::ZERO));
    assert_eq!(app.seek_target(0.5), Some(Duration::from_secs(100)));
    assert_eq!(app.seek_target(2.0), Some(Duration::from_secs(200)));
    assert_eq!(app.seek_target(-1.0), Some(Duration::ZERO));
    assert_eq!(app.seek_target(f64::NAN), None);
}

#[test]
fn volume_is_clamped() {
    let mut app = App::new();
    assert_eq!(app.volume, 100);
    assert_eq!(app.volume_up(5), 100);
    assert_eq!(app.volume_down(30), 70);
    assert_eq!(app.volume_down(250), 0);
    assert_eq!(app.set_volume(180), 100);
    app.set_volume(50);
    assert!((app.volume_gain() - 0.5).abs() < f32::EPSILON);
}

#[test]
fn browser_opens_and_closes() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::new();
    app.open_browser(dir.path(), false).unwrap();
    assert!(app.browser_open());
    app.close_browser();
    assert!(!app.browser_open());

    assert!(app.open_browser(&dir.path().join("missing"), false).is_err());
    assert!(!app.browser_open());
}

#[test]
fn same_named_tracks_do_not_share_lyrics() {
    let mut lyrics = LyricTrack::new();
    lyrics.insert("/music/a/song", lyric_table());
    let mut app = App::new();
    app.load_library(Library {
        root: PathBuf::from("/music"),
        tracks: vec![
            Track::from_path("/music/a/song.mp3"),
            Track::from_path("/music/b/song.mp3"),
        ],
        lyrics,
    });

    assert!(app.current_lyrics().is_some());
    app.advance();
    assert_eq!(app.current_track().map(|t| t.name.as_str()), Some("song"));
    assert!(app.current_lyrics().is_none());
    app.refresh_progress(Duration::from_secs(6));
    assert_eq!(app.active_lyric, None);
}
