use std::path::PathBuf;

/// One playable entry: an audio resource paired with a display image.
///
/// Descriptors are immutable once the playlist is loaded; the player only
/// ever indexes into the fixed collection.
#[derive(Debug, Clone)]
pub struct TrackDescriptor {
    pub audio: PathBuf,
    pub image: PathBuf,
    pub display: String,
}
