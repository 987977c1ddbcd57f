mod app;
mod audio;
mod catalog;
mod cli;
mod config;
mod logging;
mod mpris;
mod player;
mod runtime;
mod timefmt;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
