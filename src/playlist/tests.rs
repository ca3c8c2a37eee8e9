use super::*;
use std::path::{Path, PathBuf};

#[test]
fn load_resolves_paths_against_asset_dir() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("tracks.toml");
    std::fs::write(
        &list,
        r#"
[[tracks]]
audio = "one.mp3"
image = "one.png"

[[tracks]]
audio = "two.mp3"
image = "two.png"
"#,
    )
    .unwrap();

    let playlist = Playlist::load(&list, Path::new("assets")).unwrap();
    assert_eq!(playlist.tracks.len(), 2);
    assert_eq!(playlist.tracks[0].audio, PathBuf::from("assets/one.mp3"));
    assert_eq!(playlist.tracks[0].image, PathBuf::from("assets/one.png"));
    assert_eq!(playlist.tracks[1].audio, PathBuf::from("assets/two.mp3"));
}

#[test]
fn display_falls_back_to_file_stem_for_unreadable_files() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("tracks.toml");
    std::fs::write(
        &list,
        r#"
[[tracks]]
audio = "subdir/My Song.mp3"
image = "cover.png"
"#,
    )
    .unwrap();

    let playlist = Playlist::load(&list, dir.path()).unwrap();
    assert_eq!(playlist.tracks[0].display, "My Song");
}

#[test]
fn load_rejects_empty_playlists() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("tracks.toml");
    std::fs::write(&list, "tracks = []\n").unwrap();

    let err = Playlist::load(&list, Path::new("assets")).unwrap_err();
    assert!(matches!(err, PlaylistError::Empty { .. }));
}

#[test]
fn load_reports_missing_file_and_parse_errors() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("nope.toml");
    assert!(matches!(
        Playlist::load(&missing, Path::new("assets")).unwrap_err(),
        PlaylistError::Io { .. }
    ));

    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, "tracks = not-valid").unwrap();
    assert!(matches!(
        Playlist::load(&bad, Path::new("assets")).unwrap_err(),
        PlaylistError::Parse { .. }
    ));
}
