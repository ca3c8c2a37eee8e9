//! Playlist loading: the fixed, ordered track list the player runs over.
//!
//! Tracks come from a TOML document loaded once at startup; each entry pairs
//! an audio resource with a display image.

mod load;
mod model;

pub use load::{Playlist, PlaylistError};
pub use model::TrackDescriptor;

#[cfg(test)]
mod tests;
