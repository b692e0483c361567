//! List monitors.

use snapframe_capture_engine::backend::XcapMonitors;
use snapframe_platform_core::{enumerate_monitors, virtual_desktop_bounds};

pub fn run(json: bool) -> anyhow::Result<()> {
    let monitors = enumerate_monitors(&XcapMonitors);
    let bounds = virtual_desktop_bounds(&monitors);

    if json {
        let value = serde_json::json!({
            "monitors": monitors,
            "desktop": bounds,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Monitors: {}", monitors.len());
    for m in &monitors {
        println!(
            "  {} {}x{} at ({}, {}) (scale: {}x) {}",
            m.name,
            m.width,
            m.height,
            m.x,
            m.y,
            m.scale_factor,
            if m.primary { "(primary)" } else { "" }
        );
    }
    println!();
    println!(
        "Virtual desktop: {}x{} at ({}, {})",
        bounds.width, bounds.height, bounds.x, bounds.y
    );

    Ok(())
}
