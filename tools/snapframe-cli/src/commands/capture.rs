//! Headless capture of the stored or given region.

use std::path::PathBuf;
use std::time::Instant;

use snapframe_capture_engine::backend::{ClipboardKeeper, XcapMonitors};
use snapframe_capture_engine::{
    Capabilities, CaptureRequest, CaptureSession, ControllerSettings, SessionState,
};
use snapframe_common::clock::CaptureNamer;
use snapframe_common::config::AppConfig;
use snapframe_platform_core::{
    enumerate_monitors, primary_monitor, virtual_desktop_bounds, Rect,
};
use snapframe_selection_model::{snap_delay, PreferenceStore, Selection};

/// Command-line overrides of the stored session.
#[derive(Debug, Default)]
pub struct CaptureOverrides {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub delay: Option<f64>,
    pub pointer: bool,
    pub no_clipboard: bool,
    pub folder: Option<PathBuf>,
}

impl CaptureOverrides {
    fn apply_rect(&self, rect: Rect) -> Rect {
        Rect::new(
            self.x.unwrap_or(rect.x),
            self.y.unwrap_or(rect.y),
            self.width.unwrap_or(rect.width),
            self.height.unwrap_or(rect.height),
        )
    }
}

pub async fn run(config: &AppConfig, overrides: CaptureOverrides) -> anyhow::Result<()> {
    let settings = ControllerSettings::from_config(config);
    let store =
        PreferenceStore::new(config.preferences_file()).with_min_size(settings.limits.min_size);

    let monitors = enumerate_monitors(&XcapMonitors);
    let bounds = virtual_desktop_bounds(&monitors);
    let home = primary_monitor(&monitors)
        .map(|m| m.bounds())
        .unwrap_or_else(|| bounds.as_rect());

    let prefs = store.load(&home);
    let rect = settings
        .limits
        .clamp(overrides.apply_rect(prefs.rectangle), &bounds);

    let mut options = prefs.options;
    if let Some(delay) = overrides.delay {
        options.delay_seconds = snap_delay(delay);
    }
    if overrides.pointer {
        options.include_pointer = true;
    }
    if overrides.no_clipboard {
        options.save_to_clipboard = false;
    }
    if let Some(folder) = overrides.folder {
        options.save_to_folder = true;
        options.folder_path = folder;
    }

    tracing::debug!(?rect, ?options, "Headless capture requested");
    println!(
        "Capturing {}x{} at ({}, {})",
        rect.width, rect.height, rect.x, rect.y
    );

    let mut session = CaptureSession::new(
        CaptureRequest {
            selection: Selection { rect, options },
            pointer: None,
        },
        settings.settle,
    );
    session.begin(Instant::now());

    if let Some(deadline) = session.deadline() {
        if session.request().selection.options.delay_seconds > 0 {
            println!("Press Ctrl+C to cancel...");
        }
        tokio::select! {
            _ = tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)) => {}
            _ = tokio::signal::ctrl_c() => {
                session.on_trigger();
                println!("Capture cancelled.");
                return Ok(());
            }
        }
    }

    let keeper = ClipboardKeeper::new();
    let mut capabilities = Capabilities::system_handing_off(keeper.clone());
    let mut namer = CaptureNamer::new(settings.filename_prefix);
    let Some(report) = session.poll(Instant::now(), &mut capabilities, &store, &mut namer) else {
        anyhow::bail!("Capture did not run (state: {:?})", session.state());
    };

    if report.copied_to_clipboard {
        println!("Copied to clipboard");
    }
    if let Some(path) = &report.saved_file {
        println!("Saved to: {}", path.display());
    }
    for notice in &report.notices {
        println!("{notice}");
    }

    if session.state() == SessionState::Failed || report.has_errors() {
        anyhow::bail!("Capture finished with errors");
    }

    if keeper.pending_size().is_some() {
        println!("Keeping the clipboard until something else is copied (Ctrl+C to stop)...");
        // A detached thread: Ctrl+C must not wait for the blocking serve.
        let (tx, rx) = tokio::sync::oneshot::channel();
        std::thread::spawn(move || {
            let _ = tx.send(keeper.serve());
        });
        tokio::select! {
            served = rx => served??,
            _ = tokio::signal::ctrl_c() => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_overrides_keep_stored_values() {
        let overrides = CaptureOverrides {
            x: Some(-200),
            width: Some(320),
            ..Default::default()
        };
        assert_eq!(
            overrides.apply_rect(Rect::new(10, 20, 640, 480)),
            Rect::new(-200, 20, 320, 480)
        );
    }
}
