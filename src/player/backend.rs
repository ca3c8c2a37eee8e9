//! The audio backend thread.
//!
//! Owns the rodio output stream and the current sink. Loads read the whole
//! resource with chunked progress reporting, then decode it up front; the
//! decoded bytes stay resident so stop and loop can rebuild a sink at
//! position zero. Every event reported back carries the generation of the
//! load it belongs to.

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::decoder::DecoderError;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::analyzer::SampleTap;

use super::types::{BackendCmd, PlayerEvent, PlayerEventKind};

const READ_CHUNK: usize = 64 * 1024;

pub struct AudioBackend {
    cmd_tx: Sender<BackendCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioBackend {
    /// Spawn the backend thread. Returns the backend handle and the event
    /// channel the player polls.
    pub fn start(tap: SampleTap) -> (Self, Receiver<PlayerEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel::<BackendCmd>();
        let (events_tx, events_rx) = mpsc::channel::<PlayerEvent>();

        let join = spawn_backend_thread(cmd_rx, events_tx, tap);

        (
            Self {
                cmd_tx,
                join: Mutex::new(Some(join)),
            },
            events_rx,
        )
    }

    /// A sender the player uses to issue commands.
    pub fn command_sender(&self) -> Sender<BackendCmd> {
        self.cmd_tx.clone()
    }

    /// Stop playback, quit the thread and wait for it to finish.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(BackendCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

/// The decoded track resident in the backend. `generation` ties end-of-track
/// events to the load that produced them.
struct LoadedTrack {
    generation: u64,
    bytes: std::sync::Arc<[u8]>,
}

fn spawn_backend_thread(
    cmd_rx: Receiver<BackendCmd>,
    events_tx: Sender<PlayerEvent>,
    tap: SampleTap,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio prints to stderr when the OutputStream drops; that would land
        // in the middle of the terminal UI.
        stream.log_on_drop(false);

        let mut current: Option<LoadedTrack> = None;
        let mut sink: Option<Sink> = None;
        let mut playing = false;
        let mut looped = false;

        loop {
            match cmd_rx.recv_timeout(Duration::from_millis(200)) {
                Ok(BackendCmd::Load { generation, path }) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    current = None;
                    playing = false;

                    let bytes = match read_with_progress(&path, generation, &events_tx) {
                        Ok(bytes) => bytes,
                        Err(e) => {
                            let _ = events_tx.send(PlayerEvent {
                                generation,
                                kind: PlayerEventKind::Failed(format!(
                                    "failed to read {}: {e}",
                                    path.display()
                                )),
                            });
                            continue;
                        }
                    };

                    match build_sink(&stream, &bytes, &tap) {
                        Ok(new_sink) => {
                            sink = Some(new_sink);
                            current = Some(LoadedTrack { generation, bytes });
                            let _ = events_tx.send(PlayerEvent {
                                generation,
                                kind: PlayerEventKind::Ready,
                            });
                        }
                        Err(e) => {
                            let _ = events_tx.send(PlayerEvent {
                                generation,
                                kind: PlayerEventKind::Failed(format!(
                                    "failed to decode {}: {e}",
                                    path.display()
                                )),
                            });
                        }
                    }
                }

                Ok(BackendCmd::Play) => {
                    if let Some(ref s) = sink {
                        s.play();
                        playing = true;
                    }
                }

                Ok(BackendCmd::Pause) => {
                    if let Some(ref s) = sink {
                        s.pause();
                        playing = false;
                    }
                }

                Ok(BackendCmd::Stop) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    playing = false;
                    // Rewind to position zero: rebuild a paused sink from the
                    // resident bytes.
                    if let Some(ref cur) = current {
                        sink = build_sink(&stream, &cur.bytes, &tap).ok();
                    }
                }

                Ok(BackendCmd::SetLoop(enabled)) => {
                    looped = enabled;
                }

                Ok(BackendCmd::Quit) => {
                    if let Some(ref s) = sink {
                        s.stop();
                    }
                    break;
                }

                Err(RecvTimeoutError::Timeout) => {
                    // Natural end of track: restart when looping, otherwise
                    // rewind and report back.
                    let drained = playing && sink.as_ref().is_some_and(|s| s.empty());
                    if drained {
                        if let Some(ref cur) = current {
                            match build_sink(&stream, &cur.bytes, &tap) {
                                Ok(new_sink) => {
                                    if looped {
                                        new_sink.play();
                                    } else {
                                        playing = false;
                                        let _ = events_tx.send(PlayerEvent {
                                            generation: cur.generation,
                                            kind: PlayerEventKind::Ended,
                                        });
                                    }
                                    sink = Some(new_sink);
                                }
                                Err(_) => {
                                    sink = None;
                                    playing = false;
                                }
                            }
                        }
                    }
                }

                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

/// Read the whole resource, reporting a monotone progress fraction per chunk.
fn read_with_progress(
    path: &std::path::Path,
    generation: u64,
    events_tx: &Sender<PlayerEvent>,
) -> std::io::Result<std::sync::Arc<[u8]>> {
    let file = File::open(path)?;
    let total = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let mut bytes: Vec<u8> = Vec::with_capacity(total as usize);
    let mut chunk = vec![0u8; READ_CHUNK];

    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n]);

        let fraction = if total == 0 {
            1.0
        } else {
            bytes.len() as f32 / total as f32
        };
        let _ = events_tx.send(PlayerEvent {
            generation,
            kind: PlayerEventKind::Progress(fraction),
        });
    }

    Ok(bytes.into())
}

/// Create a paused sink over the decoded bytes, tapping its samples for the
/// spectrum analyzer.
fn build_sink(
    stream: &OutputStream,
    bytes: &std::sync::Arc<[u8]>,
    tap: &SampleTap,
) -> Result<Sink, DecoderError> {
    let source = Decoder::new(Cursor::new(bytes.clone()))?;

    let sink = Sink::connect_new(stream.mixer());
    sink.append(TappedSource::new(source, tap.clone()));
    sink.pause();
    Ok(sink)
}

/// Source wrapper that mirrors every sample into the shared tap buffer.
///
/// The tap observes whatever is routed to the output, so the analyzer never
/// needs a reference to the current handle.
struct TappedSource<S> {
    inner: S,
    tap: SampleTap,
}

impl<S> TappedSource<S>
where
    S: Source<Item = f32>,
{
    fn new(inner: S, tap: SampleTap) -> Self {
        Self { inner, tap }
    }
}

impl<S> Iterator for TappedSource<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let sample = self.inner.next()?;

        if let Ok(mut buf) = self.tap.try_lock() {
            if buf.len() >= crate::analyzer::TAP_CAPACITY {
                buf.pop_front();
            }
            buf.push_back(sample);
        }

        Some(sample)
    }
}

impl<S> Source for TappedSource<S>
where
    S: Source<Item = f32>,
{
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> u16 {
        self.inner.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }
}
