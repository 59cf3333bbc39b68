use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, InputMode};
use crate::config::Settings;
use crate::media::MediaEvent;
use crate::mpris::ControlCmd;
use crate::picker;
use crate::player::{Command, PlaybackController};
use crate::ui;
use crate::viz::{self, NeedleHandle};

/// Main terminal event loop: drains media events and MPRIS intents into
/// the controller, handles input and redraws. Returns `Ok(())` when
/// shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &Settings,
    app: &mut App,
    controller: &mut PlaybackController,
    media_rx: &mpsc::Receiver<MediaEvent>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    needle: &NeedleHandle,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Resource notifications first: playback state must reflect what the
        // media element actually did before we draw.
        while let Ok(ev) = media_rx.try_recv() {
            controller.on_media_event(ev);
        }

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, controller) {
                return Ok(());
            }
        }

        app.clamp_cursor(controller.playlist().len());

        let needle_deg = needle.lock().map(|n| *n).unwrap_or(viz::REST_ANGLE);
        terminal.draw(|f| ui::draw(f, app, controller, needle_deg, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, controller) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_control_cmd(cmd: ControlCmd, controller: &mut PlaybackController) -> bool {
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => controller.handle(Command::Resume),
        ControlCmd::Pause => controller.handle(Command::Pause),
        ControlCmd::PlayPause => controller.handle(Command::TogglePlayPause),
        // There is no standalone stop; the nearest transport state is paused.
        ControlCmd::Stop => controller.handle(Command::Pause),
        ControlCmd::Next => controller.handle(Command::Next),
        ControlCmd::Prev => controller.handle(Command::Prev),
    }
    false
}

fn handle_key_event(
    key: KeyEvent,
    settings: &Settings,
    app: &mut App,
    controller: &mut PlaybackController,
) -> bool {
    if app.mode == InputMode::AddPath {
        match key.code {
            KeyCode::Esc => app.cancel_add_mode(),
            KeyCode::Backspace => app.pop_input_char(),
            KeyCode::Enter => {
                let path = app.take_path_input();
                if path.is_empty() {
                    return false;
                }
                let files = picker::pick_dir(Path::new(&path), &settings.library);
                if files.is_empty() {
                    app.set_status(format!("no audio files under {path}"));
                } else {
                    app.set_status(format!("added {} file(s)", files.len()));
                    controller.handle(Command::AddFiles(files));
                }
            }
            KeyCode::Char(c) if !c.is_control() => app.push_input_char(c),
            _ => {}
        }
        return false;
    }

    let len = controller.playlist().len();
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(len),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(len),
        KeyCode::Enter => {
            if len > 0 {
                controller.handle(Command::Play(app.cursor));
            }
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            controller.handle(Command::TogglePlayPause);
        }
        KeyCode::Char('l') => controller.handle(Command::Next),
        KeyCode::Char('h') => controller.handle(Command::Prev),
        KeyCode::Char('d') | KeyCode::Char('x') => {
            controller.handle(Command::Delete(app.cursor));
            app.clamp_cursor(controller.playlist().len());
        }
        KeyCode::Char('a') => app.enter_add_mode(),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let v = controller.volume() + settings.controls.volume_step;
            controller.handle(Command::SetVolume(v));
        }
        KeyCode::Char('-') => {
            let v = (controller.volume() - settings.controls.volume_step).max(0.0);
            controller.handle(Command::SetVolume(v));
        }
        KeyCode::Char('e') => app.next_band(),
        KeyCode::Char(']') => {
            let db = controller.graph().band_gains()[app.band] + settings.controls.band_step_db;
            controller.handle(Command::SetBandGain { band: app.band, db });
        }
        KeyCode::Char('[') => {
            let db = controller.graph().band_gains()[app.band] - settings.controls.band_step_db;
            controller.handle(Command::SetBandGain { band: app.band, db });
        }
        _ => {}
    }

    false
}
