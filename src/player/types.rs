//! Player-related small types and messages.
//!
//! This module defines the track slot state, the command set understood by
//! the audio backend and the events it reports back. Every event carries the
//! generation of the load it belongs to so superseded loads can be discarded.

use std::path::PathBuf;

/// Lifecycle state of the single current track slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrackState {
    /// No handle; nothing loaded or a switch just released the old handle.
    Idle,
    /// An asynchronous load is in flight.
    Loading,
    /// A decoded track is resident, paused or playing.
    Ready { playing: bool },
    /// The last load attempt failed; terminal until the next switch.
    Failed,
}

impl Default for TrackState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Progress of the in-flight load, surfaced to the UI's loading bar.
#[derive(Debug, Copy, Clone, Default)]
pub struct LoadingState {
    pub active: bool,
    /// Fraction in `[0, 1]`, monotonically non-decreasing per load.
    pub progress: f32,
}

/// Commands sent to the audio backend thread.
#[derive(Debug)]
pub enum BackendCmd {
    /// Release the current handle and load the audio resource at `path`.
    Load { generation: u64, path: PathBuf },
    /// Resume playback of the loaded track.
    Play,
    /// Pause playback, keeping the position.
    Pause,
    /// Stop playback and rewind to position zero; the track stays loaded.
    Stop,
    /// Toggle loop-on-end behavior for the current handle.
    SetLoop(bool),
    /// Quit the audio thread.
    Quit,
}

/// Asynchronous outcome reported by the backend.
#[derive(Debug)]
pub struct PlayerEvent {
    /// Generation of the load this event originated from.
    pub generation: u64,
    pub kind: PlayerEventKind,
}

#[derive(Debug)]
pub enum PlayerEventKind {
    /// Load progress fraction in `[0, 1]`.
    Progress(f32),
    /// The load completed; a paused handle is resident at position zero.
    Ready,
    /// The load failed; terminal for this attempt.
    Failed(String),
    /// The track reached its natural end without loop enabled.
    Ended,
}
