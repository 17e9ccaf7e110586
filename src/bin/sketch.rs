//! Sketch Practice - timed drawing slideshow
//!
//! Flags:
//! - `--folder <dir>`: load a folder of images on startup
//! - `--interval <seconds>`: image duration (1..=3600)
//! - `--start`: start the slideshow immediately
//! - `--no-mirror`: disable foreground window mirroring

#![windows_subsystem = "windows"]

use sketch_practice::config;
use sketch_practice::gui::{self, GuiFlags};
use sketch_practice::interval::Interval;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    tracing::info!("Sketch Practice starting...");

    if let Err(e) = config::ensure_config_file() {
        tracing::warn!("Could not create default config file: {}", e);
    }
    let app_config = config::load_config();

    let flags = parse_args(std::env::args().skip(1), app_config);
    tracing::info!("Startup flags: {:?}", flags);

    gui::run(flags)?;

    Ok(())
}

/// Parse command line arguments into startup flags
fn parse_args(args: impl IntoIterator<Item = String>, config: config::AppConfig) -> GuiFlags {
    let mut flags = GuiFlags {
        config,
        mirror: true,
        ..Default::default()
    };

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--folder" => match args.next() {
                Some(dir) => flags.folder = Some(PathBuf::from(dir)),
                None => tracing::error!("--folder requires a directory"),
            },
            "--interval" => match args.next().as_deref().map(Interval::parse_custom) {
                Some(Ok(interval)) => flags.interval = Some(interval),
                Some(Err(e)) => tracing::error!("Ignoring --interval: {}", e),
                None => tracing::error!("--interval requires a number of seconds"),
            },
            "--start" => flags.start = true,
            "--no-mirror" => flags.mirror = false,
            other => tracing::warn!("Unknown argument: {}", other),
        }
    }

    flags
}
