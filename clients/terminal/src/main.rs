//! Terminal frontend: menus, keyboard input and rendering around a `MatchController`.

mod app;
mod event;
mod input;
mod settings;
mod ui;

use std::fs::File;

use color_eyre::eyre::WrapErr;

use crate::app::App;
use crate::settings::Settings;

const LOG_FILE: &str = "terminal-client.log";

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_logging()?;

    let settings = Settings::load()?;
    // Reject a bad config before taking over the terminal
    settings
        .config()
        .validate()
        .wrap_err("invalid match configuration")?;

    let terminal = ratatui::init();
    let result = App::new(settings).and_then(|app| app.run(terminal));
    ratatui::restore();
    result
}

/// Log to a file, and only when `RUST_LOG` is set, so the TUI stays intact
fn init_logging() -> color_eyre::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }

    let file = File::create(LOG_FILE)
        .wrap_err_with(|| format!("failed to create {LOG_FILE}"))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
