use std::env;
use std::path::Path;

use crate::app::App;
use crate::config::Settings;
use crate::picker;
use crate::player::{Command, PlaybackController};

/// Apply configured defaults and load the optional command-line directory.
///
/// Adding into the empty playlist auto-plays the first track, so launching
/// with a directory argument starts the music immediately.
pub fn apply_startup(app: &mut App, controller: &mut PlaybackController, settings: &Settings) {
    controller.handle(Command::SetVolume(settings.audio.volume));

    for (band, &db) in settings.audio.eq_gains_db.iter().enumerate() {
        if db != 0.0 {
            controller.handle(Command::SetBandGain { band, db });
        }
    }

    if let Some(dir) = env::args().nth(1) {
        let files = picker::pick_dir(Path::new(&dir), &settings.library);
        if files.is_empty() {
            app.set_status(format!("no audio files under {dir}"));
        } else {
            app.set_status(format!("added {} file(s) from {dir}", files.len()));
            controller.handle(Command::AddFiles(files));
        }
    }
}
