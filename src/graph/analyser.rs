use std::sync::Arc;

use rustfft::{Fft, FftPlanner, num_complex::Complex};

/// Real-time frequency analyser over the most recent `fft_size` mono
/// samples.
///
/// `byte_frequency_data` reports one byte per bin: magnitude is smoothed
/// over time with `smoothing`, converted to dB and mapped linearly from
/// `[min_db, max_db]` onto `0..=255`.
pub struct Analyser {
    fft_size: usize,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    ring: Vec<f32>,
    pos: usize,
    buf: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    smoothing: f32,
    min_db: f32,
    max_db: f32,
}

impl Analyser {
    pub fn new(fft_size: usize, smoothing: f32, min_db: f32, max_db: f32) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);
        Self {
            fft_size,
            fft,
            window: hann_window(fft_size),
            ring: vec![0.0; fft_size],
            pos: 0,
            buf: vec![Complex::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; fft_size / 2],
            smoothing,
            min_db,
            max_db,
        }
    }

    /// Number of frequency bins (half the analysis window).
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Feed mono samples into the analysis ring.
    pub fn push_samples(&mut self, samples: &[f32]) {
        for &s in samples {
            self.ring[self.pos] = s;
            self.pos = (self.pos + 1) % self.fft_size;
        }
    }

    /// Write the current byte-magnitude snapshot into `out` (one byte per
    /// bin, extra slots untouched).
    pub fn byte_frequency_data(&mut self, out: &mut [u8]) {
        // Unroll the ring chronologically and window it.
        for i in 0..self.fft_size {
            let x = self.ring[(self.pos + i) % self.fft_size];
            self.buf[i] = Complex::new(x * self.window[i], 0.0);
        }

        self.fft.process(&mut self.buf);

        let half = self.fft_size / 2;
        let range = self.max_db - self.min_db;
        for k in 0..half.min(out.len()) {
            let mag = self.buf[k].norm() / self.fft_size as f32;
            self.smoothed[k] =
                self.smoothing * self.smoothed[k] + (1.0 - self.smoothing) * mag;

            let db = if self.smoothed[k] > 0.0 {
                20.0 * self.smoothed[k].log10()
            } else {
                f32::NEG_INFINITY
            };
            let scaled = ((db - self.min_db) / range * 255.0).clamp(0.0, 255.0);
            out[k] = scaled as u8;
        }
    }
}

fn hann_window(n: usize) -> Vec<f32> {
    let mut w = vec![0.0; n];
    for (i, v) in w.iter_mut().enumerate() {
        *v = 0.5 - 0.5 * ((2.0 * std::f32::consts::PI * i as f32) / (n as f32)).cos();
    }
    w
}
