use crate::graph::AudioGraph;
use crate::media::{MediaElement, MediaEvent, StoreHandle};
use crate::picker::PickedFile;
use crate::playlist::{Playlist, Track};
use crate::viz::{self, FrameScheduler, NeedleHandle, VizHandle};

use super::types::{Command, MediaSession, NowPlaying, PlaybackState};

const UNKNOWN_ARTIST: &str = "Unknown Artist";
const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Owns the playlist and drives the single media element.
///
/// Playing/Paused are mirrored from the media element's own notifications
/// (`on_media_event`), never set when a command is merely issued, so the UI
/// cannot drift from what the resource is actually doing.
pub struct PlaybackController {
    playlist: Playlist,
    playback: PlaybackState,
    now_playing: Option<String>,
    volume: f32,
    audio_error: Option<String>,

    graph: AudioGraph,
    media: Box<dyn MediaElement>,
    session: Option<Box<dyn MediaSession>>,
    store: StoreHandle,

    needle: NeedleHandle,
    // Taken on the first graph init; its absence afterwards is what makes
    // "start the viz loop exactly once" hold.
    viz_scheduler: Option<Box<dyn FrameScheduler>>,
    viz: Option<VizHandle>,
}

impl PlaybackController {
    pub fn new(
        media: Box<dyn MediaElement>,
        session: Option<Box<dyn MediaSession>>,
        store: StoreHandle,
        graph: AudioGraph,
        needle: NeedleHandle,
        scheduler: Box<dyn FrameScheduler>,
    ) -> Self {
        Self {
            playlist: Playlist::new(),
            playback: PlaybackState::Stopped,
            now_playing: None,
            volume: 1.0,
            audio_error: None,
            graph,
            media,
            session,
            store,
            needle,
            viz_scheduler: Some(scheduler),
            viz: None,
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    /// Label for the header; `None` means nothing has been selected since
    /// startup (or the playing track was deleted).
    pub fn now_playing(&self) -> Option<&str> {
        self.now_playing.as_deref()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn audio_error(&self) -> Option<&str> {
        self.audio_error.as_deref()
    }

    pub fn graph(&self) -> &AudioGraph {
        &self.graph
    }

    /// Dispatch one typed command.
    pub fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::AddFiles(files) => self.add_files(files),
            Command::Play(index) => self.play_track(index),
            Command::TogglePlayPause => self.toggle_play_pause(),
            Command::Resume => self.media.play(),
            Command::Pause => self.media.pause(),
            Command::Next => self.play_next(),
            Command::Prev => self.play_previous(),
            Command::Delete(index) => self.delete_track(index),
            Command::SetVolume(v) => self.set_volume(v),
            Command::SetBandGain { band, db } => self.graph.set_band_gain(band, db),
        }
    }

    /// React to a notification from the media element.
    pub fn on_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::Play => {
                self.playback = PlaybackState::Playing;
                self.audio_error = None;
                self.publish_playback();
            }
            MediaEvent::Pause => {
                // A pause notification racing a stop (deleted track) must
                // not resurrect the Paused state.
                if self.playback == PlaybackState::Playing {
                    self.playback = PlaybackState::Paused;
                    self.publish_playback();
                }
            }
            MediaEvent::Ended => self.play_next(),
            MediaEvent::Unavailable(reason) => {
                log::warn!("media unavailable: {reason}");
                self.audio_error = Some(reason);
            }
        }
    }

    /// Stop the viz loop and the media element. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(viz) = self.viz.take() {
            viz.stop();
        }
        self.media.shutdown();
    }

    fn add_files(&mut self, files: Vec<PickedFile>) {
        for file in files {
            let url = match self.store.lock() {
                Ok(mut store) => store.create(file.bytes),
                Err(_) => continue,
            };
            self.playlist.push(Track::new(file.name, url));
        }

        // First add into an unselected playlist starts playback at the top.
        if self.playlist.current().is_none() && !self.playlist.is_empty() {
            self.play_track(0);
        }
    }

    fn play_track(&mut self, index: usize) {
        let Some(track) = self.playlist.get(index) else {
            return;
        };
        let url = track.url.clone();
        let display = track.display_name(index);

        self.ensure_graph();

        self.playlist.set_current(index);
        self.media.set_source(&url);
        self.media.play();
        self.now_playing = Some(display.to_uppercase());

        if let Some(session) = &self.session {
            session.publish_metadata(&NowPlaying {
                title: display,
                artist: UNKNOWN_ARTIST.to_string(),
                album: UNKNOWN_ALBUM.to_string(),
            });
        }
    }

    fn toggle_play_pause(&mut self) {
        if self.playlist.current().is_none() {
            if !self.playlist.is_empty() {
                self.play_track(0);
            }
            return;
        }

        match self.playback {
            PlaybackState::Playing => self.media.pause(),
            PlaybackState::Paused => self.media.play(),
            // Stopped with a selection (the track was deleted mid-play, or a
            // previous play failed): reload the selected track.
            PlaybackState::Stopped => {
                if let Some(current) = self.playlist.current() {
                    self.play_track(current);
                }
            }
        }
    }

    fn play_next(&mut self) {
        if let Some(next) = self.playlist.next_index() {
            self.play_track(next);
        }
    }

    fn play_previous(&mut self) {
        if let Some(prev) = self.playlist.prev_index() {
            self.play_track(prev);
        }
    }

    fn delete_track(&mut self, index: usize) {
        let Some(removed) = self.playlist.remove(index) else {
            return;
        };

        if removed.was_current {
            self.media.pause();
            self.media.clear_source();
            self.playback = PlaybackState::Stopped;
            self.now_playing = None;
            self.publish_playback();
        }

        // Release the locator now, not at some later sweep: removed tracks
        // otherwise pin their bytes for the rest of the session.
        if let Ok(mut store) = self.store.lock() {
            if let Err(e) = store.revoke(&removed.track.url) {
                log::warn!("releasing removed track: {e}");
            }
        }
    }

    fn set_volume(&mut self, value: f32) {
        self.volume = value.max(0.0);
        if self.graph.is_initialized() {
            self.graph.set_master_gain(self.volume);
        } else {
            self.media.set_volume(self.volume);
        }
    }

    fn ensure_graph(&mut self) {
        if self.graph.initialize() {
            // Loudness moves from the fallback knob to the gain stage.
            self.graph.set_master_gain(self.volume);
            if let Some(scheduler) = self.viz_scheduler.take() {
                self.viz = Some(viz::start(
                    self.graph.analyser(),
                    scheduler,
                    self.needle.clone(),
                ));
            }
        }
    }

    fn publish_playback(&self) {
        if let Some(session) = &self.session {
            session.publish_playback(self.playback);
        }
    }
}
