mod app;
mod config;
mod graph;
mod media;
mod mpris;
mod picker;
mod player;
mod playlist;
mod runtime;
mod ui;
mod viz;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    runtime::run()
}
