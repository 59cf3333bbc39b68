//! Sink construction and the per-sink processing chain.
//!
//! While the graph is uninitialized a sink plays the bare decoder and the
//! volume fallback knob applies. Once initialized, every sink wraps its
//! decoder as decoder → analyser tap → master gain → peaking bands, all
//! stages reading the shared graph state so edits apply to the sink that is
//! already playing.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use biquad::{Biquad, Coefficients, DirectForm1, ToHertz, Type};
use rodio::{ChannelCount, Decoder, OutputStream, SampleRate, Sink, Source};

use crate::graph::{AnalyserHandle, AudioGraph, BAND_Q, FREQUENCY_BANDS};

/// Mono frames buffered before the analyser lock is taken.
const TAP_FLUSH_FRAMES: usize = 64;

/// Create a paused `Sink` playing `bytes` through the current chain.
pub(super) fn build_sink(
    stream: &OutputStream,
    bytes: Arc<[u8]>,
    graph: &AudioGraph,
    fallback_volume: f32,
) -> Result<Sink, rodio::decoder::DecoderError> {
    let decoder = Decoder::new(Cursor::new(bytes))?;
    let sink = Sink::connect_new(stream.mixer());

    if graph.is_initialized() {
        sink.append(Chain::new(decoder, graph.clone()));
        sink.set_volume(1.0);
    } else {
        sink.append(decoder);
        sink.set_volume(fallback_volume);
    }

    sink.pause();
    Ok(sink)
}

/// One peaking band: a filter per channel, all sharing the band's
/// coefficients.
struct BandStage {
    band: usize,
    filters: Vec<DirectForm1<f32>>,
}

/// `Source` adapter applying analyser tap → master gain → equalizer.
pub(super) struct Chain<S> {
    inner: S,
    graph: AudioGraph,
    analyser: AnalyserHandle,
    sample_rate: SampleRate,
    channels: usize,
    stages: Vec<BandStage>,
    chan: usize,
    frame_sum: f32,
    tap: Vec<f32>,
    seen_generation: u64,
}

impl<S> Chain<S>
where
    S: Source,
{
    pub(super) fn new(inner: S, graph: AudioGraph) -> Self {
        let sample_rate = inner.sample_rate();
        let channels = inner.channels().max(1) as usize;
        let gains = graph.band_gains();
        let stages = build_stages(&gains, sample_rate, channels);
        let seen_generation = graph.eq_generation();
        let analyser = graph.analyser();

        Self {
            inner,
            graph,
            analyser,
            sample_rate,
            channels,
            stages,
            chan: 0,
            frame_sum: 0.0,
            tap: Vec::with_capacity(TAP_FLUSH_FRAMES),
            seen_generation,
        }
    }

    fn flush_tap(&mut self) {
        // try_lock: the audio path never blocks on the viz reader; a missed
        // flush just drops a few analysis frames.
        if let Ok(mut analyser) = self.analyser.try_lock() {
            analyser.push_samples(&self.tap);
        }
        self.tap.clear();

        let generation = self.graph.eq_generation();
        if generation != self.seen_generation {
            let gains = self.graph.band_gains();
            for stage in &mut self.stages {
                let coeffs = band_coefficients(
                    FREQUENCY_BANDS[stage.band],
                    gains[stage.band],
                    self.sample_rate,
                );
                for filter in &mut stage.filters {
                    filter.update_coefficients(coeffs);
                }
            }
            self.seen_generation = generation;
        }
    }
}

impl<S> Iterator for Chain<S>
where
    S: Source,
{
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let s = self.inner.next()?;

        // The analyser sees the signal before gain and EQ.
        self.frame_sum += s;

        let mut x = s * self.graph.master_gain();
        for stage in &mut self.stages {
            x = stage.filters[self.chan].run(x);
        }

        self.chan += 1;
        if self.chan >= self.channels {
            self.chan = 0;
            self.tap.push(self.frame_sum / self.channels as f32);
            self.frame_sum = 0.0;
            if self.tap.len() >= TAP_FLUSH_FRAMES {
                self.flush_tap();
            }
        }

        Some(x)
    }
}

impl<S> Source for Chain<S>
where
    S: Source,
{
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> ChannelCount {
        self.inner.channels()
    }

    fn sample_rate(&self) -> SampleRate {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }
}

/// Build the band stages that fit under the source's Nyquist frequency.
/// Low-rate files simply lose their topmost bands.
fn build_stages(gains: &[f32], sample_rate: SampleRate, channels: usize) -> Vec<BandStage> {
    let nyquist = sample_rate as f32 / 2.0;
    FREQUENCY_BANDS
        .iter()
        .enumerate()
        .filter(|&(_, &center)| center < nyquist)
        .map(|(band, &center)| {
            let coeffs = band_coefficients(center, gains[band], sample_rate);
            BandStage {
                band,
                filters: vec![DirectForm1::<f32>::new(coeffs); channels],
            }
        })
        .collect()
}

fn band_coefficients(center: f32, gain_db: f32, sample_rate: SampleRate) -> Coefficients<f32> {
    Coefficients::<f32>::from_params(
        Type::PeakingEQ(gain_db),
        (sample_rate as f32).hz(),
        center.hz(),
        BAND_Q,
    )
    .expect("band center below nyquist")
}
