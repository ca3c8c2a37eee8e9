//! The `TrackPlayer` state machine.
//!
//! Owns the current track index, the slot state and the autoplay intent.
//! All asynchronous load outcomes are applied in `poll_events`, which the
//! runtime calls once per frame; events from superseded loads are dropped
//! by comparing their generation against the current one.

use std::path::Path;
use std::sync::mpsc::{Receiver, Sender};

use thiserror::Error;

use crate::playlist::TrackDescriptor;

use super::types::{BackendCmd, LoadingState, PlayerEvent, PlayerEventKind, TrackState};

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("playlist has no tracks")]
    NoTracks,
}

pub struct TrackPlayer {
    tracks: Vec<TrackDescriptor>,
    current_index: usize,
    state: TrackState,
    loading: LoadingState,
    autoplay: bool,
    looped: bool,
    /// Bumped on every load issuance; only events matching it are applied.
    generation: u64,
    load_error: Option<String>,
    cmd_tx: Sender<BackendCmd>,
    events_rx: Receiver<PlayerEvent>,
}

impl TrackPlayer {
    /// Create a player over a fixed, non-empty track collection.
    pub fn new(
        tracks: Vec<TrackDescriptor>,
        cmd_tx: Sender<BackendCmd>,
        events_rx: Receiver<PlayerEvent>,
    ) -> Result<Self, PlayerError> {
        if tracks.is_empty() {
            return Err(PlayerError::NoTracks);
        }

        Ok(Self {
            tracks,
            current_index: 0,
            state: TrackState::Idle,
            loading: LoadingState::default(),
            autoplay: false,
            looped: false,
            generation: 0,
            load_error: None,
            cmd_tx,
            events_rx,
        })
    }

    /// Begin loading the track at index 0.
    pub fn initialize(&mut self) {
        self.load_current();
    }

    /// Number of available tracks.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_track(&self) -> &TrackDescriptor {
        &self.tracks[self.current_index]
    }

    /// Image reference for the current track, updated on every switch.
    /// The UI consumes this as the background display element.
    pub fn background_image(&self) -> &Path {
        &self.tracks[self.current_index].image
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    pub fn loading(&self) -> LoadingState {
        self.loading
    }

    pub fn loop_enabled(&self) -> bool {
        self.looped
    }

    pub fn autoplay_intent(&self) -> bool {
        self.autoplay
    }

    /// Reason of the last failed load, if the current slot is `Failed`.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Whether the current track is loaded and audibly playing.
    /// Defined as `false` before any load completes.
    pub fn is_track_playing(&self) -> bool {
        matches!(self.state, TrackState::Ready { playing: true })
    }

    pub fn is_track_loading(&self) -> bool {
        self.loading.active
    }

    /// Switch to the next track, wrapping past the end.
    pub fn next_track(&mut self) {
        let next = (self.current_index + 1) % self.tracks.len();
        self.switch_to(next);
    }

    /// Switch to the previous track, wrapping past index 0.
    pub fn prev_track(&mut self) {
        let count = self.tracks.len();
        let prev = (self.current_index + count - 1) % count;
        self.switch_to(prev);
    }

    /// Resume playback of a loaded track. No-op while idle, loading, failed
    /// or already playing.
    pub fn play_track(&mut self) {
        if let TrackState::Ready { playing } = self.state {
            if !playing {
                self.send(BackendCmd::Play);
            }
            self.state = TrackState::Ready { playing: true };
        }
    }

    /// Pause a playing track. No-op in every other state.
    pub fn pause_track(&mut self) {
        if let TrackState::Ready { playing } = self.state {
            if playing {
                self.send(BackendCmd::Pause);
            }
            self.state = TrackState::Ready { playing: false };
        }
    }

    /// Stop the loaded track and rewind it to position zero.
    pub fn stop_track(&mut self) {
        if matches!(self.state, TrackState::Ready { .. }) {
            self.send(BackendCmd::Stop);
            self.state = TrackState::Ready { playing: false };
        }
    }

    /// Toggle loop-on-end for the current (and any future) handle.
    pub fn set_loop_track(&mut self, enabled: bool) {
        self.looped = enabled;
        self.send(BackendCmd::SetLoop(enabled));
    }

    /// Drain pending backend events and apply them to the slot state.
    ///
    /// Events whose generation does not match the latest issued load are
    /// from a superseded load and must not affect the current track.
    pub fn poll_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            if event.generation != self.generation {
                continue;
            }

            match event.kind {
                PlayerEventKind::Progress(fraction) => {
                    if self.state == TrackState::Loading {
                        self.loading.active = true;
                        if fraction > self.loading.progress {
                            self.loading.progress = fraction.min(1.0);
                        }
                    }
                }
                PlayerEventKind::Ready => {
                    if self.state == TrackState::Loading {
                        self.loading.active = false;
                        self.loading.progress = 1.0;
                        if self.autoplay {
                            self.autoplay = false;
                            self.send(BackendCmd::Play);
                            self.state = TrackState::Ready { playing: true };
                        } else {
                            self.state = TrackState::Ready { playing: false };
                        }
                    }
                }
                PlayerEventKind::Failed(reason) => {
                    if self.state == TrackState::Loading {
                        self.loading.active = false;
                        // The intent is consumed even when the start fails.
                        self.autoplay = false;
                        self.load_error = Some(reason);
                        self.state = TrackState::Failed;
                    }
                }
                PlayerEventKind::Ended => {
                    if self.state == (TrackState::Ready { playing: true }) {
                        self.state = TrackState::Ready { playing: false };
                    }
                }
            }
        }
    }

    fn switch_to(&mut self, index: usize) {
        if self.is_track_playing() {
            self.autoplay = true;
        }
        self.current_index = index;

        // Release the old handle before the new load is issued; the backend
        // drops its sink on Stop as well as on the Load itself.
        self.send(BackendCmd::Stop);
        self.state = TrackState::Idle;

        self.load_current();
    }

    fn load_current(&mut self) {
        self.generation += 1;
        self.state = TrackState::Loading;
        self.loading = LoadingState {
            active: true,
            progress: 0.0,
        };
        self.load_error = None;

        let track = &self.tracks[self.current_index];
        self.send(BackendCmd::Load {
            generation: self.generation,
            path: track.audio.clone(),
        });
    }

    fn send(&self, cmd: BackendCmd) {
        // A disconnected backend means we are shutting down; nothing to do.
        let _ = self.cmd_tx.send(cmd);
    }
}
