//! Shared state for the playback chain.
//!
//! `AudioGraph` is cheap to clone; every clone sees the same state. The
//! media thread reads it when building a sink, the controller writes gain
//! changes into it, and the visualization loop samples the analyser.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::AudioSettings;

use super::analyser::Analyser;

pub const BAND_COUNT: usize = 10;

/// Center frequencies (Hz) of the fixed peaking-filter bands.
pub const FREQUENCY_BANDS: [f32; BAND_COUNT] = [
    60.0, 170.0, 310.0, 600.0, 1000.0, 3000.0, 6000.0, 12000.0, 14000.0, 16000.0,
];

/// Quality factor shared by every band.
pub const BAND_Q: f32 = 1.0;

pub type AnalyserHandle = Arc<Mutex<Analyser>>;

struct GraphState {
    initialized: AtomicBool,
    // f32 stored as bits so the audio thread can read it without locking.
    master_gain: AtomicU32,
    band_gains_db: Mutex<[f32; BAND_COUNT]>,
    // Bumped on every band edit; sink chains rebuild coefficients when it moves.
    eq_generation: AtomicU64,
    analyser: AnalyserHandle,
}

#[derive(Clone)]
pub struct AudioGraph {
    state: Arc<GraphState>,
}

impl AudioGraph {
    pub fn new(audio: &AudioSettings) -> Self {
        let analyser = Analyser::new(
            audio.fft_size,
            audio.smoothing,
            audio.min_db,
            audio.max_db,
        );
        Self {
            state: Arc::new(GraphState {
                initialized: AtomicBool::new(false),
                master_gain: AtomicU32::new(1.0f32.to_bits()),
                band_gains_db: Mutex::new([0.0; BAND_COUNT]),
                eq_generation: AtomicU64::new(0),
                analyser: Arc::new(Mutex::new(analyser)),
            }),
        }
    }

    /// Activate the processing chain. Idempotent: returns true only for the
    /// first effective call, which is the caller's cue to start the
    /// visualization loop (exactly once per session).
    pub fn initialize(&self) -> bool {
        !self.state.initialized.swap(true, Ordering::SeqCst)
    }

    pub fn is_initialized(&self) -> bool {
        self.state.initialized.load(Ordering::SeqCst)
    }

    /// Set the master gain stage. Negative values clamp to silence.
    pub fn set_master_gain(&self, value: f32) {
        let v = if value.is_finite() { value.max(0.0) } else { 1.0 };
        self.state.master_gain.store(v.to_bits(), Ordering::Relaxed);
    }

    pub fn master_gain(&self) -> f32 {
        f32::from_bits(self.state.master_gain.load(Ordering::Relaxed))
    }

    /// Set one band's gain in dB. Out-of-range band indices are ignored.
    pub fn set_band_gain(&self, band: usize, db: f32) {
        if band >= BAND_COUNT {
            return;
        }
        if let Ok(mut gains) = self.state.band_gains_db.lock() {
            gains[band] = db;
        }
        self.state.eq_generation.fetch_add(1, Ordering::Relaxed);
    }

    pub fn band_gains(&self) -> [f32; BAND_COUNT] {
        self.state
            .band_gains_db
            .lock()
            .map(|g| *g)
            .unwrap_or([0.0; BAND_COUNT])
    }

    /// Monotone counter the sink chain polls to notice band edits.
    pub fn eq_generation(&self) -> u64 {
        self.state.eq_generation.load(Ordering::Relaxed)
    }

    pub fn analyser(&self) -> AnalyserHandle {
        self.state.analyser.clone()
    }
}
