//! Track player: lifecycle state machine plus the audio backend thread.
//!
//! `TrackPlayer` owns the selection, loading and transport state; the
//! backend thread owns the rodio output stream and executes loads and
//! transport commands, reporting back over an event channel.

mod backend;
mod model;
pub mod types;

pub use backend::AudioBackend;
pub use model::{PlayerError, TrackPlayer};
pub use types::{
    BackendCmd, LoadingState, PlayerEvent, PlayerEventKind, TrackState,
};
