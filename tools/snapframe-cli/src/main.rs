//! SnapFrame CLI: inspect monitors and preferences, capture without the overlay.
//!
//! Usage:
//!   snapframe monitors            List monitors and the virtual desktop
//!   snapframe prefs show|reset|path
//!   snapframe capture [OPTIONS]   Capture the stored (or given) region

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use snapframe_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "snapframe",
    about = "Multi-monitor region screenshots",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List monitors and the virtual desktop bounds
    Monitors {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Inspect or reset the stored selection and options
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },

    /// Capture a region without the overlay
    Capture {
        /// Left edge in virtual-desktop pixels
        #[arg(long, allow_hyphen_values = true)]
        x: Option<i32>,

        /// Top edge in virtual-desktop pixels
        #[arg(long, allow_hyphen_values = true)]
        y: Option<i32>,

        /// Region width
        #[arg(long)]
        width: Option<u32>,

        /// Region height
        #[arg(long)]
        height: Option<u32>,

        /// Delay in seconds (snapped to 0 or 5)
        #[arg(long)]
        delay: Option<f64>,

        /// Draw the pointer into the image
        #[arg(long)]
        pointer: bool,

        /// Do not copy the image to the clipboard
        #[arg(long)]
        no_clipboard: bool,

        /// Save the image into this folder
        #[arg(long)]
        folder: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print the stored preferences
    Show,
    /// Delete the stored preferences
    Reset,
    /// Print the preferences file location
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    snapframe_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Monitors { json } => commands::monitors::run(json),
        Commands::Prefs { action } => match action {
            PrefsAction::Show => commands::prefs::show(&config),
            PrefsAction::Reset => commands::prefs::reset(&config),
            PrefsAction::Path => commands::prefs::path(&config),
        },
        Commands::Capture {
            x,
            y,
            width,
            height,
            delay,
            pointer,
            no_clipboard,
            folder,
        } => {
            let overrides = commands::capture::CaptureOverrides {
                x,
                y,
                width,
                height,
                delay,
                pointer,
                no_clipboard,
                folder,
            };
            commands::capture::run(&config, overrides).await
        }
    }
}
