mod action;
mod app;
mod app_state;
mod cli;
mod component;
mod components;
mod logging;
mod theme;
mod widgets;

use clap::Parser;
use radiohub_core::{config::Config, platform, Catalog, PlaybackController};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.use_system_deps {
        platform::set_use_system_deps(true);
    }

    let (log_path, log_rx) = logging::init(&platform::data_dir())?;
    tracing::info!("radiohub starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!("config unreadable, using defaults: {:#}", e);
        Config::default()
    });
    if let Some(player) = cli.player.clone() {
        config.player.binary = player;
    }

    // ── Station catalog ──────────────────────────────────────────────────────
    let catalog = match cli.stations.as_ref().or(config.stations.file.as_ref()) {
        Some(path) => Catalog::load_toml(path).unwrap_or_else(|e| {
            tracing::warn!("station file {} unusable, using built-in list: {:#}", path.display(), e);
            Catalog::builtin()
        }),
        None => Catalog::builtin(),
    };

    if cli.list {
        print!("{}", cli::catalog_listing(&catalog));
        return Ok(());
    }

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("radiohub log: {}", log_path.display());

    let genre = cli.genre.filter(|g| {
        let known = !catalog.filter_by_genre(g).is_empty();
        if !known {
            tracing::warn!("unknown genre {:?}, showing all stations", g);
        }
        known
    });

    // ── Playback + TUI ───────────────────────────────────────────────────────
    let controller = PlaybackController::new(&config)?;
    let app = app::App::new(controller.clone(), catalog, genre, config.ui.tick(), &log_path);
    let result = app.run(log_rx).await;

    controller.shutdown();
    tracing::info!("radiohub exiting");
    result
}
