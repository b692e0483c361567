//! SnapFrame overlay: one transparent viewport spanning every monitor.
//!
//! Launching the binary opens a selection session right away. With
//! `--resident` it instead waits, click-through, for SIGUSR1 (unix) or F12
//! and stays alive between sessions.

use std::path::PathBuf;

use clap::Parser;
use eframe::egui;
use snapframe_capture_engine::backend::{ClipboardKeeper, XcapMonitors};
use snapframe_capture_engine::{channel_trigger, Capabilities, SnapController};
use snapframe_common::config::AppConfig;
use snapframe_platform_core::{enumerate_monitors, primary_monitor, virtual_desktop_bounds};

mod app;
mod paint;
mod signals;

use app::OverlayApp;

#[derive(Parser)]
#[command(name = "snapframe-overlay", about = "Select and capture a screen region", version)]
struct Args {
    /// Stay running between sessions and wait for triggers
    #[arg(long)]
    resident: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    let mut logging = config.logging.clone();
    if args.verbose {
        logging.level = "debug".to_string();
    }
    snapframe_common::logging::init_logging(&logging);

    let monitors = enumerate_monitors(&XcapMonitors);
    let bounds = virtual_desktop_bounds(&monitors);
    // Viewport geometry is in points; mixed-DPI layouts use the primary scale.
    let scale = primary_monitor(&monitors)
        .map(|m| m.scale_factor as f32)
        .filter(|s| *s > 0.0)
        .unwrap_or(1.0);

    // A one-shot overlay exits right after copying; the keeper serves the
    // clipboard afterwards where the owning process must stay alive.
    let keeper = ClipboardKeeper::new();
    let capabilities = if args.resident {
        Capabilities::system()
    } else {
        Capabilities::system_handing_off(keeper.clone())
    };
    let controller = SnapController::from_config(&config, Box::new(XcapMonitors), capabilities);
    let (handle, trigger) = channel_trigger();
    if !args.resident {
        handle.activate();
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("SnapFrame")
            .with_position([bounds.x as f32 / scale, bounds.y as f32 / scale])
            .with_inner_size([bounds.width as f32 / scale, bounds.height as f32 / scale])
            .with_always_on_top()
            .with_decorations(false)
            .with_resizable(false)
            .with_transparent(true)
            .with_mouse_passthrough(args.resident),
        ..Default::default()
    };

    tracing::info!(
        monitors = monitors.len(),
        x = bounds.x,
        y = bounds.y,
        width = bounds.width,
        height = bounds.height,
        resident = args.resident,
        "Starting overlay"
    );

    let resident = args.resident;
    let dim_alpha = config.overlay.dim_alpha;
    eframe::run_native(
        "SnapFrame",
        options,
        Box::new(move |cc| {
            if let Err(e) = signals::spawn_signal_trigger(handle, cc.egui_ctx.clone()) {
                tracing::warn!(error = %e, "Signal trigger unavailable");
            }
            Box::new(OverlayApp::new(
                controller,
                trigger,
                (bounds.x, bounds.y),
                dim_alpha,
                resident,
            ))
        }),
    )
    .map_err(|e| anyhow::anyhow!("overlay launch failed: {e}"))?;

    if let Err(e) = keeper.serve() {
        tracing::warn!(error = %e, "Clipboard contents could not be kept");
    }
    Ok(())
}
