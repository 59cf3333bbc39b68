use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::graph::AudioGraph;

use super::chain::build_sink;
use super::element::MediaEvent;
use super::store::StoreHandle;

#[derive(Debug)]
pub(super) enum MediaCmd {
    SetSource(String),
    ClearSource,
    Play,
    Pause,
    SetVolume(f32),
    Quit,
}

pub(super) fn spawn_media_thread(
    store: StoreHandle,
    graph: AudioGraph,
    rx: Receiver<MediaCmd>,
    events: Sender<MediaEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        // The output stream opens on the first play action, not at startup:
        // until someone actually plays, the device stays untouched.
        let mut stream: Option<OutputStream> = None;
        let mut sink: Option<Sink> = None;
        let mut source_url: Option<String> = None;
        let mut volume: f32 = 1.0;
        let mut ended_emitted = false;

        loop {
            match rx.recv_timeout(Duration::from_millis(100)) {
                Ok(MediaCmd::SetSource(url)) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    source_url = Some(url);
                    ended_emitted = false;
                }

                Ok(MediaCmd::ClearSource) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    source_url = None;
                    ended_emitted = false;
                }

                Ok(MediaCmd::Play) => {
                    if stream.is_none() {
                        match OutputStreamBuilder::open_default_stream() {
                            Ok(mut s) => {
                                // rodio logs to stderr when OutputStream is
                                // dropped; noisy for a TUI app.
                                s.log_on_drop(false);
                                stream = Some(s);
                            }
                            Err(e) => {
                                log::warn!("audio output unavailable: {e}");
                                let _ = events.send(MediaEvent::Unavailable(format!(
                                    "audio output unavailable: {e}"
                                )));
                                continue;
                            }
                        }
                    }

                    if sink.is_none() {
                        let Some(url) = source_url.as_deref() else {
                            continue;
                        };
                        let bytes = store.lock().ok().and_then(|s| s.resolve(url));
                        let Some(bytes) = bytes else {
                            log::warn!("source url vanished before play: {url}");
                            continue;
                        };
                        let stream_ref = stream.as_ref().expect("output stream opened above");
                        match build_sink(stream_ref, bytes, &graph, volume) {
                            Ok(s) => sink = Some(s),
                            Err(e) => {
                                log::warn!("failed to decode {url}: {e}");
                                let _ = events
                                    .send(MediaEvent::Unavailable(format!("cannot decode: {e}")));
                                continue;
                            }
                        }
                    }

                    if let Some(s) = sink.as_ref() {
                        if s.is_paused() {
                            s.play();
                            let _ = events.send(MediaEvent::Play);
                        }
                    }
                }

                Ok(MediaCmd::Pause) => {
                    if let Some(s) = sink.as_ref() {
                        if !s.is_paused() {
                            s.pause();
                            let _ = events.send(MediaEvent::Pause);
                        }
                    }
                }

                Ok(MediaCmd::SetVolume(v)) => {
                    volume = v.max(0.0);
                    // Fallback knob only: once the chain is active the gain
                    // stage owns loudness and the sink stays at unity.
                    if !graph.is_initialized() {
                        if let Some(s) = sink.as_ref() {
                            s.set_volume(volume);
                        }
                    }
                }

                Ok(MediaCmd::Quit) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    break;
                }

                Err(RecvTimeoutError::Timeout) => {
                    // End-of-track detection: a sink that ran dry while
                    // unpaused has finished its source.
                    if let Some(s) = sink.as_ref() {
                        if !s.is_paused() && s.empty() && !ended_emitted {
                            ended_emitted = true;
                            let _ = events.send(MediaEvent::Ended);
                        }
                    }
                }

                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
