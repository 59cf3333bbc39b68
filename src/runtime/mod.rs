use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::graph::AudioGraph;
use crate::media::{MediaEvent, RodioMedia, SourceStore};
use crate::mpris::ControlCmd;
use crate::player::PlaybackController;
use crate::viz::{self, DisplayTicker};

mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let store = SourceStore::shared();
    let graph = AudioGraph::new(&settings.audio);
    let needle = viz::needle_handle();

    let (media_tx, media_rx) = mpsc::channel::<MediaEvent>();
    let media = RodioMedia::new(store.clone(), graph.clone(), media_tx);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let session = crate::mpris::spawn_mpris(control_tx);

    let mut controller = PlaybackController::new(
        Box::new(media),
        Some(Box::new(session)),
        store,
        graph,
        needle.clone(),
        Box::new(DisplayTicker::new(settings.ui.refresh_hz)),
    );

    let mut app = App::new();
    startup::apply_startup(&mut app, &mut controller, &settings);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut controller,
        &media_rx,
        &control_rx,
        &needle,
    );

    // Tear down the viz loop and audio thread before leaving the screen.
    controller.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
