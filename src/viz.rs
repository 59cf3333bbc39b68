//! The VU needle loop.
//!
//! Once per display frame the loop samples the analyser, averages the bins
//! and maps the result onto a needle angle the UI renders. The loop is a
//! real task with a stop handle, so shutdown and tests can end it instead
//! of letting it respawn itself forever.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::graph::AnalyserHandle;

/// Angle the needle rests at while nothing plays.
pub const REST_ANGLE: f32 = -90.0;

/// Shared needle position in degrees, written by the loop, read by the UI.
pub type NeedleHandle = Arc<Mutex<f32>>;

pub fn needle_handle() -> NeedleHandle {
    Arc::new(Mutex::new(REST_ANGLE))
}

/// Map a byte-magnitude snapshot onto a needle angle.
///
/// The arithmetic mean over all bins lands in `[0, 255]` and maps linearly
/// onto `[-90°, +90°]`.
pub fn needle_angle(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return REST_ANGLE;
    }
    let sum: u32 = bins.iter().map(|&b| u32::from(b)).sum();
    let avg = sum as f32 / bins.len() as f32;
    (avg / 255.0) * 180.0 - 90.0
}

/// Paces the loop to the display.
pub trait FrameScheduler: Send + 'static {
    /// Block until the next frame should render.
    fn wait_frame(&mut self);
}

/// Fixed-rate scheduler targeting the configured refresh rate.
pub struct DisplayTicker {
    period: Duration,
    next: Instant,
}

impl DisplayTicker {
    pub fn new(refresh_hz: u32) -> Self {
        let period = Duration::from_secs(1) / refresh_hz.max(1);
        Self {
            period,
            next: Instant::now() + period,
        }
    }
}

impl FrameScheduler for DisplayTicker {
    fn wait_frame(&mut self) {
        let now = Instant::now();
        if self.next > now {
            thread::sleep(self.next - now);
        }
        self.next += self.period;
        // If we fell badly behind, skip ahead instead of spinning to catch up.
        if self.next < Instant::now() {
            self.next = Instant::now() + self.period;
        }
    }
}

/// Running visualization task. Dropping the handle stops the thread.
pub struct VizHandle {
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl VizHandle {
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

impl Drop for VizHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Start the needle loop. Called exactly once per session, when the graph
/// first initializes.
pub fn start(
    analyser: AnalyserHandle,
    mut scheduler: Box<dyn FrameScheduler>,
    needle: NeedleHandle,
) -> VizHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();

    let join = thread::spawn(move || {
        let bins = analyser.lock().map(|a| a.bin_count()).unwrap_or(0);
        let mut snapshot = vec![0u8; bins];

        while !stop_flag.load(Ordering::SeqCst) {
            scheduler.wait_frame();

            if let Ok(mut analyser) = analyser.lock() {
                analyser.byte_frequency_data(&mut snapshot);
            }
            let angle = needle_angle(&snapshot);
            if let Ok(mut n) = needle.lock() {
                *n = angle;
            }
        }
    });

    VizHandle {
        stop,
        join: Some(join),
    }
}
