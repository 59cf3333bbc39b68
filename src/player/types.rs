//! Command and state types consumed by the controller.

use crate::picker::PickedFile;

/// The playback state of the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Stopped
    }
}

/// Every user or media-session intent, as a typed command.
///
/// Key handlers and the MPRIS thread only translate raw input into one of
/// these; all actual behavior lives in the controller, which keeps it
/// testable without a terminal or a D-Bus session.
#[derive(Debug)]
pub enum Command {
    /// Append picked files to the playlist.
    AddFiles(Vec<PickedFile>),
    /// Start playing the track at the given index.
    Play(usize),
    /// Toggle play/pause; starts the first track when nothing is selected.
    TogglePlayPause,
    /// Resume playback (media-session play intent).
    Resume,
    /// Pause playback (media-session pause intent).
    Pause,
    /// Skip to the next track, wrapping at the end.
    Next,
    /// Go back to the previous track, wrapping at the front.
    Prev,
    /// Remove the track at the given index.
    Delete(usize),
    /// Set the master volume.
    SetVolume(f32),
    /// Set one equalizer band's gain in dB.
    SetBandGain { band: usize, db: f32 },
}

/// Now-playing metadata as the media session wants it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub album: String,
}

/// OS-level media-session collaborator. Optional: the controller checks for
/// presence before publishing.
pub trait MediaSession: Send {
    fn publish_metadata(&self, meta: &NowPlaying);
    fn publish_playback(&self, state: PlaybackState);
}
