use super::model::Track;
use std::path::Path;

#[test]
fn track_name_is_file_stem() {
    let t = Track::from_path("/music/Artist - Song.mp3");
    assert_eq!(t.name, "Artist - Song");
    assert_eq!(t.path, Path::new("/music/Artist - Song.mp3"));
    assert!(t.duration.is_none());
}

#[test]
fn track_name_keeps_inner_dots() {
    let t = Track::from_path("/music/feat. Someone.ogg");
    assert_eq!(t.name, "feat. Someone");
}
