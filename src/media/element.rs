use std::sync::Mutex;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

use crate::graph::AudioGraph;

use super::store::StoreHandle;
use super::thread::{MediaCmd, spawn_media_thread};

/// Notifications the media resource pushes at its owner.
///
/// `Play`/`Pause` fire on actual transitions, so the controller can mirror
/// the resource's real state instead of tracking its own flags. `Ended`
/// fires once per loaded source. `Unavailable` reports an output device or
/// decode failure the user can recover from by retrying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    Play,
    Pause,
    Ended,
    Unavailable(String),
}

/// The single playable resource the controller drives.
///
/// Implementations accept a source locator, expose play/pause and a volume
/// fallback knob, and emit `MediaEvent`s on a channel handed over at
/// construction.
pub trait MediaElement: Send {
    fn set_source(&mut self, url: &str);
    fn clear_source(&mut self);
    fn play(&mut self);
    fn pause(&mut self);
    /// Volume fallback used while the processing chain is not active.
    fn set_volume(&mut self, value: f32);
    /// Release the resource for good; further calls are no-ops.
    fn shutdown(&mut self) {}
}

/// rodio-backed media element. All real work happens on a dedicated audio
/// thread; this handle just forwards commands.
pub struct RodioMedia {
    tx: Sender<MediaCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioMedia {
    pub fn new(store: StoreHandle, graph: AudioGraph, events: Sender<MediaEvent>) -> Self {
        let (tx, rx) = mpsc::channel::<MediaCmd>();
        let handle = spawn_media_thread(store, graph, rx, events);
        Self {
            tx,
            join: Mutex::new(Some(handle)),
        }
    }
}

impl MediaElement for RodioMedia {
    fn set_source(&mut self, url: &str) {
        let _ = self.tx.send(MediaCmd::SetSource(url.to_string()));
    }

    fn clear_source(&mut self) {
        let _ = self.tx.send(MediaCmd::ClearSource);
    }

    fn play(&mut self) {
        let _ = self.tx.send(MediaCmd::Play);
    }

    fn pause(&mut self) {
        let _ = self.tx.send(MediaCmd::Pause);
    }

    fn set_volume(&mut self, value: f32) {
        let _ = self.tx.send(MediaCmd::SetVolume(value));
    }

    /// Stop playback and wait for the audio thread to exit.
    fn shutdown(&mut self) {
        let _ = self.tx.send(MediaCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
