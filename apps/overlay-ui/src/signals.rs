//! External activation through SIGUSR1, for hotkey daemons
//! (`pkill -USR1 snapframe-overlay`).

use eframe::egui;
use snapframe_capture_engine::TriggerHandle;

#[cfg(unix)]
pub fn spawn_signal_trigger(handle: TriggerHandle, ctx: egui::Context) -> anyhow::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    std::thread::Builder::new()
        .name("snapframe-signals".to_string())
        .spawn(move || {
            runtime.block_on(async move {
                let mut stream = match signal(SignalKind::user_defined1()) {
                    Ok(stream) => stream,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to listen for SIGUSR1");
                        return;
                    }
                };
                while stream.recv().await.is_some() {
                    tracing::debug!("SIGUSR1 received");
                    if !handle.activate() {
                        break;
                    }
                    ctx.request_repaint();
                }
            });
        })?;

    Ok(())
}

#[cfg(not(unix))]
pub fn spawn_signal_trigger(handle: TriggerHandle, _ctx: egui::Context) -> anyhow::Result<()> {
    drop(handle);
    tracing::debug!("No signal trigger on this platform; use F12");
    Ok(())
}
