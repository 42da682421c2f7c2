mod app;
mod audio;
mod config;
mod error;
mod library;
mod logging;
mod lyrics;
mod mpris;
mod runtime;
mod timefmt;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
