//! Stored selection and options.

use snapframe_capture_engine::backend::XcapMonitors;
use snapframe_common::config::AppConfig;
use snapframe_platform_core::{enumerate_monitors, primary_monitor, virtual_desktop_bounds};
use snapframe_selection_model::PreferenceStore;

fn store(config: &AppConfig) -> PreferenceStore {
    PreferenceStore::new(config.preferences_file()).with_min_size(config.overlay.min_size)
}

pub fn show(config: &AppConfig) -> anyhow::Result<()> {
    let store = store(config);
    let monitors = enumerate_monitors(&XcapMonitors);
    let home = primary_monitor(&monitors)
        .map(|m| m.bounds())
        .unwrap_or_else(|| virtual_desktop_bounds(&monitors).as_rect());

    let prefs = store.load(&home);
    if !store.path().exists() {
        println!("No stored preferences; showing defaults.");
    }
    println!("{}", serde_json::to_string_pretty(&prefs)?);
    Ok(())
}

pub fn reset(config: &AppConfig) -> anyhow::Result<()> {
    let store = store(config);
    if store.reset()? {
        println!("Removed {}", store.path().display());
    } else {
        println!("Nothing to reset at {}", store.path().display());
    }
    Ok(())
}

pub fn path(config: &AppConfig) -> anyhow::Result<()> {
    println!("{}", store(config).path().display());
    Ok(())
}
