mod app;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::info;

use logos_galaxy::config::AppConfig;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file with generator, viewport and filter settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Notes to generate on startup; overrides the config file.
    #[arg(long, allow_negative_numbers = true)]
    notes: Option<i64>,
    /// Seed for reproducible layouts; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(notes) = args.notes {
        config.initial_notes = notes;
    }
    if let Some(seed) = args.seed {
        config.generator.seed = Some(seed);
    }
    info!(
        notes = config.initial_notes,
        seed = ?config.generator.seed,
        "starting galaxy viewer"
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Logos Galaxy",
        options,
        Box::new(move |cc| Ok(Box::new(app::GalaxyApp::new(cc, config)))),
    )
    .map_err(|error| anyhow!("{error}"))
    .context("galaxy viewer exited with an error")
}
