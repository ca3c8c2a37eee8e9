use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/halo/config.toml` or `~/.config/halo/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `HALO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playlist: PlaylistSettings,
    pub visualizer: VisualizerSettings,
    pub ui: UiSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playlist: PlaylistSettings::default(),
            visualizer: VisualizerSettings::default(),
            ui: UiSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaylistSettings {
    /// Playlist file listing the tracks. A CLI argument overrides this.
    pub path: PathBuf,
    /// Directory that audio and image paths in the playlist are resolved against.
    pub asset_dir: PathBuf,
}

impl Default for PlaylistSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("tracks.toml"),
            asset_dir: PathBuf::from("assets"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisualizerSettings {
    /// Number of frequency bins in a spectrum frame. The FFT window is twice this.
    pub bins: usize,
    /// Frame-over-frame exponential smoothing factor, in `[0, 1)`.
    /// Higher values decay slower.
    pub smoothing: f32,
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            bins: 512,
            smoothing: 0.7,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header line.
    pub header_text: String,

    /// Whether to render the controls help line at the bottom.
    pub show_controls: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ halo ~ ".to_string(),
            show_controls: true,
        }
    }
}
