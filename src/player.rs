//! Playback control: the command-driven state machine that ties the
//! playlist, the media element, the audio graph and the media session
//! together.

mod controller;
mod types;

pub use controller::*;
pub use types::*;
