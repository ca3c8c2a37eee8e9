use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use lofty::prelude::{ItemKey, TaggedFileExt};
use serde::Deserialize;
use thiserror::Error;

use super::model::TrackDescriptor;

/// Raw playlist document schema: `{ tracks = [{ audio, image }, ...] }`.
#[derive(Debug, Deserialize)]
struct PlaylistFile {
    tracks: Vec<TrackEntry>,
}

#[derive(Debug, Deserialize)]
struct TrackEntry {
    audio: String,
    image: String,
}

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("failed to read playlist {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse playlist {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("playlist {path} lists no tracks")]
    Empty { path: PathBuf },
}

/// The ordered track collection, fixed at startup.
#[derive(Debug)]
pub struct Playlist {
    pub tracks: Vec<TrackDescriptor>,
}

impl Playlist {
    /// Load a playlist document and resolve its entries against `asset_dir`.
    ///
    /// Guarantees at least one track on success.
    pub fn load(path: &Path, asset_dir: &Path) -> Result<Self, PlaylistError> {
        let text = fs::read_to_string(path).map_err(|source| PlaylistError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let file: PlaylistFile = toml::from_str(&text).map_err(|source| PlaylistError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if file.tracks.is_empty() {
            return Err(PlaylistError::Empty {
                path: path.to_path_buf(),
            });
        }

        let tracks = file
            .tracks
            .into_iter()
            .map(|entry| descriptor(entry, asset_dir))
            .collect();

        Ok(Self { tracks })
    }
}

fn descriptor(entry: TrackEntry, asset_dir: &Path) -> TrackDescriptor {
    let audio = asset_dir.join(&entry.audio);
    let display = display_name(&audio);
    TrackDescriptor {
        image: asset_dir.join(&entry.image),
        audio,
        display,
    }
}

/// Best-effort display name: tag metadata when the file is readable,
/// the file stem otherwise. Files are allowed to be missing at startup;
/// the load path reports that later, per track.
fn display_name(audio: &Path) -> String {
    let fallback = audio
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();

    let Ok(tagged) = lofty::read_from_path(audio) else {
        return fallback;
    };

    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        return fallback;
    };

    let title = tag
        .get_string(&ItemKey::TrackTitle)
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let artist = tag
        .get_string(&ItemKey::TrackArtist)
        .map(str::trim)
        .filter(|a| !a.is_empty());

    match (artist, title) {
        (Some(a), Some(t)) => format!("{a} - {t}"),
        (None, Some(t)) => t.to_string(),
        _ => fallback,
    }
}
