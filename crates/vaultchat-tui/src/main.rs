mod app;
mod handler;
mod tui;
mod ui;

use anyhow::{anyhow, Result};
use std::fs::{self, OpenOptions};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;
use vaultchat_core::config::API_KEY_ENV;
use vaultchat_core::Settings;

use crate::app::App;
use crate::tui::{EventHandler, Tui};

/// Env var holding the log filter, e.g. `VAULTCHAT_LOG=vaultchat_core=debug`
const LOG_ENV: &str = "VAULTCHAT_LOG";

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let settings = Settings::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not read settings, using defaults");
        Settings::default()
    });
    let config = settings.into_config(std::env::var(API_KEY_ENV).ok()).map_err(|e| {
        let path = Settings::get_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "the config file".to_string());
        anyhow!("{e}\nSet {API_KEY_ENV} or add \"api_key\" to {path}")
    })?;

    let mut app = App::new(Arc::new(config));

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore()?;

    result
}

async fn run(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }

    Ok(())
}

/// Log to a file; stderr belongs to the terminal UI.
fn init_logging() -> Result<()> {
    let log_dir = dirs::cache_dir()
        .ok_or_else(|| anyhow!("Could not determine cache directory"))?
        .join("vaultchat");
    fs::create_dir_all(&log_dir)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("vaultchat.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| EnvFilter::new("vaultchat_core=info,vaultchat_tui=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
