use std::time::Duration;

use rodio::{ChannelCount, SampleRate, Source};

use crate::config::AudioSettings;
use crate::graph::AudioGraph;

use super::chain::Chain;
use super::store::SourceStore;

#[test]
fn store_mints_distinct_resolvable_urls() {
    let mut store = SourceStore::new();
    let a = store.create(vec![1, 2, 3]);
    let b = store.create(vec![4, 5]);
    assert_ne!(a, b);
    assert_eq!(store.resolve(&a).unwrap().as_ref(), &[1, 2, 3]);
    assert_eq!(store.resolve(&b).unwrap().as_ref(), &[4, 5]);
    assert_eq!(store.len(), 2);
}

#[test]
fn revoke_releases_exactly_once() {
    let mut store = SourceStore::new();
    let url = store.create(vec![9]);
    assert!(store.revoke(&url).is_ok());
    assert!(store.resolve(&url).is_none());
    // Second revoke is an error the caller discards.
    assert!(store.revoke(&url).is_err());
    assert!(store.revoke("mem://track/999").is_err());
    assert!(store.is_empty());
}

/// Constant-valued source for driving the chain without a decoder.
struct TestTone {
    remaining: usize,
    channels: ChannelCount,
    sample_rate: SampleRate,
    value: f32,
}

impl TestTone {
    fn new(frames: usize, channels: ChannelCount, sample_rate: SampleRate, value: f32) -> Self {
        Self {
            remaining: frames * channels as usize,
            channels,
            sample_rate,
            value,
        }
    }
}

impl Iterator for TestTone {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.value)
    }
}

impl Source for TestTone {
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> ChannelCount {
        self.channels
    }

    fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

fn active_graph() -> AudioGraph {
    let graph = AudioGraph::new(&AudioSettings::default());
    graph.initialize();
    graph
}

#[test]
fn chain_applies_master_gain_with_flat_eq() {
    let graph = active_graph();
    graph.set_master_gain(0.5);

    // Flat EQ (0 dB everywhere) is an identity chain, so only the gain
    // stage should shape the output.
    let chain = Chain::new(TestTone::new(128, 1, 44_100, 0.8), graph);
    let out: Vec<f32> = chain.collect();
    assert_eq!(out.len(), 128);
    for s in out {
        assert!((s - 0.4).abs() < 1e-3, "sample was {s}");
    }
}

#[test]
fn chain_preserves_source_shape() {
    let graph = active_graph();
    let chain = Chain::new(TestTone::new(10, 2, 48_000, 0.1), graph);
    assert_eq!(chain.channels(), 2);
    assert_eq!(chain.sample_rate(), 48_000);
    assert_eq!(chain.count(), 20);
}

#[test]
fn chain_feeds_the_analyser() {
    let graph = active_graph();
    let analyser = graph.analyser();

    // 256 stereo frames cross the flush threshold several times.
    let chain = Chain::new(TestTone::new(256, 2, 44_100, 0.9), graph);
    let _drained: Vec<f32> = chain.collect();

    let mut out = [0u8; 128];
    analyser.lock().unwrap().byte_frequency_data(&mut out);
    // A loud DC signal shows up in the lowest bin.
    assert!(out[0] > 0, "analyser never saw the tap");
}

#[test]
fn chain_drops_bands_above_nyquist_for_low_rate_sources() {
    // 16 kHz audio cannot carry the 12/14/16 kHz bands; building the chain
    // must skip them rather than panic.
    let graph = active_graph();
    graph.set_band_gain(9, 6.0);
    let chain = Chain::new(TestTone::new(64, 1, 16_000, 0.5), graph);
    let out: Vec<f32> = chain.collect();
    assert_eq!(out.len(), 64);
    assert!(out.iter().all(|s| s.is_finite()));
}

/// Mono sine source for exercising a single band.
struct TestSine {
    remaining: usize,
    i: usize,
    freq: f32,
    sample_rate: SampleRate,
}

impl Iterator for TestSine {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let t = self.i as f32 / self.sample_rate as f32;
        self.i += 1;
        Some((2.0 * std::f32::consts::PI * self.freq * t).sin() * 0.5)
    }
}

impl Source for TestSine {
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> ChannelCount {
        1
    }

    fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

#[test]
fn band_boost_shapes_matching_frequencies() {
    let sine = || TestSine {
        remaining: 4096,
        i: 0,
        freq: 1000.0,
        sample_rate: 44_100,
    };

    let graph = active_graph();
    let flat: Vec<f32> = Chain::new(sine(), graph.clone()).collect();

    // Band 4 is centered on 1 kHz; a 12 dB boost there must raise the
    // energy of a 1 kHz tone.
    graph.set_band_gain(4, 12.0);
    let boosted: Vec<f32> = Chain::new(sine(), graph).collect();

    let energy = |v: &[f32]| v.iter().map(|s| s * s).sum::<f32>();
    assert!(energy(&boosted) > energy(&flat) * 2.0);
}
