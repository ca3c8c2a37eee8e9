//! Spectrum analysis over the output sample tap.
//!
//! The backend mirrors every output sample into a shared ring buffer; each
//! frame the analyzer windows the most recent samples, runs a forward FFT
//! and smooths the bin magnitudes frame-over-frame. Silence (or no track)
//! yields an all-zero frame rather than an error.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::config::VisualizerSettings;

/// Ring buffer of the most recent output samples, fed by the backend.
pub type SampleTap = Arc<Mutex<VecDeque<f32>>>;

pub const TAP_CAPACITY: usize = 8192;

pub fn new_tap() -> SampleTap {
    Arc::new(Mutex::new(VecDeque::with_capacity(TAP_CAPACITY)))
}

/// One frame of frequency-bin magnitudes, each in `0..=255`.
#[derive(Debug, Clone)]
pub struct SpectrumFrame {
    bins: Box<[f32]>,
}

impl SpectrumFrame {
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Magnitude of the given frequency bin.
    ///
    /// Panics when `bin` is out of range; an out-of-range lookup is a
    /// programming error, not a recoverable condition.
    pub fn magnitude(&self, bin: usize) -> f32 {
        self.bins[bin]
    }
}

pub struct SpectrumAnalyzer {
    tap: SampleTap,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    smoothing: f32,
    smoothed: Vec<f32>,
}

impl SpectrumAnalyzer {
    pub fn new(tap: SampleTap, settings: &VisualizerSettings) -> Self {
        let bins = settings.bins;
        let fft_size = bins * 2;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        let window = (0..fft_size).map(|i| hann_window(i, fft_size)).collect();

        Self {
            tap,
            fft,
            window,
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            smoothing: settings.smoothing,
            smoothed: vec![0.0; bins],
        }
    }

    /// Produce the spectrum frame for the current output signal.
    pub fn analyze(&mut self) -> SpectrumFrame {
        let fft_size = self.window.len();

        // Most recent samples first in time order; zero-pad when short.
        for slot in self.scratch.iter_mut() {
            *slot = Complex::new(0.0, 0.0);
        }
        if let Ok(buf) = self.tap.lock() {
            let start = buf.len().saturating_sub(fft_size);
            for (i, sample) in buf.iter().skip(start).enumerate() {
                self.scratch[i] = Complex::new(sample * self.window[i], 0.0);
            }
        }

        self.fft.process(&mut self.scratch);

        for (bin, smoothed) in self.smoothed.iter_mut().enumerate() {
            let amplitude = self.scratch[bin].norm() * 2.0 / fft_size as f32;
            let level = (amplitude * 255.0).min(255.0);
            *smoothed = self.smoothing * *smoothed + (1.0 - self.smoothing) * level;
        }

        SpectrumFrame {
            bins: self.smoothed.clone().into_boxed_slice(),
        }
    }
}

fn hann_window(index: usize, size: usize) -> f32 {
    use std::f32::consts::PI;
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}
