//! Trigger-driven lifecycle: armed, selecting, capturing.

use std::time::{Duration, Instant};

use snapframe_common::clock::CaptureNamer;
use snapframe_common::config::AppConfig;
use snapframe_platform_core::{
    enumerate_monitors, monitor_at, primary_monitor, virtual_desktop_bounds, MonitorInfo,
    MonitorSource, Point,
};
use snapframe_selection_model::{Limits, OptionsPanel, PreferenceStore, SelectionOverlay};

use crate::backend::Capabilities;
use crate::session::{
    CaptureReport, CaptureRequest, CaptureSession, SessionState, TriggerDisposition,
};

/// Tunables taken from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub limits: Limits,
    pub settle: Duration,
    pub filename_prefix: String,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            settle: Duration::from_millis(150),
            filename_prefix: "screenshot".to_string(),
        }
    }
}

impl ControllerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            limits: Limits::new(config.overlay.min_size, config.overlay.handle_size),
            settle: Duration::from_millis(config.capture.settle_ms),
            filename_prefix: config.capture.filename_prefix.clone(),
        }
    }
}

/// Coarse controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Armed,
    Selecting,
    Capturing,
}

/// What a controller call did.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    SessionOpened,
    Ignored,
    Cancelled,
    CaptureScheduled { deadline: Instant },
    Aborted,
    Finished(CaptureReport),
}

/// Overlay and panel of the session being edited.
#[derive(Debug, Clone)]
pub struct ActiveSelection {
    pub overlay: SelectionOverlay,
    pub panel: OptionsPanel,
    pub monitors: Vec<MonitorInfo>,
}

enum Phase {
    Armed,
    Selecting(ActiveSelection),
    Capturing(CaptureSession),
}

/// Owns everything a session needs; one session at a time.
pub struct SnapController {
    store: PreferenceStore,
    monitors: Box<dyn MonitorSource>,
    capabilities: Capabilities,
    namer: CaptureNamer,
    settings: ControllerSettings,
    phase: Phase,
    last_pointer: Option<Point>,
}

impl SnapController {
    pub fn new(
        store: PreferenceStore,
        monitors: Box<dyn MonitorSource>,
        capabilities: Capabilities,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            store: store.with_min_size(settings.limits.min_size),
            monitors,
            capabilities,
            namer: CaptureNamer::new(settings.filename_prefix.clone()),
            settings,
            phase: Phase::Armed,
            last_pointer: None,
        }
    }

    /// Controller wired from the application configuration.
    pub fn from_config(
        config: &AppConfig,
        monitors: Box<dyn MonitorSource>,
        capabilities: Capabilities,
    ) -> Self {
        Self::new(
            PreferenceStore::new(config.preferences_file()),
            monitors,
            capabilities,
            ControllerSettings::from_config(config),
        )
    }

    pub fn state(&self) -> ControllerState {
        match self.phase {
            Phase::Armed => ControllerState::Armed,
            Phase::Selecting(_) => ControllerState::Selecting,
            Phase::Capturing(_) => ControllerState::Capturing,
        }
    }

    pub fn store(&self) -> &PreferenceStore {
        &self.store
    }

    pub fn selection(&self) -> Option<&ActiveSelection> {
        match &self.phase {
            Phase::Selecting(active) => Some(active),
            _ => None,
        }
    }

    pub fn selection_mut(&mut self) -> Option<&mut ActiveSelection> {
        match &mut self.phase {
            Phase::Selecting(active) => Some(active),
            _ => None,
        }
    }

    /// Latest pointer position in desktop coordinates.
    pub fn set_pointer(&mut self, point: Point) {
        self.last_pointer = Some(point);
    }

    /// Time left before a pending capture runs.
    pub fn capture_remaining(&self, now: Instant) -> Option<Duration> {
        match &self.phase {
            Phase::Capturing(session) if session.state() == SessionState::Delaying => {
                session.remaining(now)
            }
            _ => None,
        }
    }

    pub fn on_trigger(&mut self, now: Instant) -> ControllerEvent {
        match &mut self.phase {
            Phase::Armed => {
                self.open_session();
                ControllerEvent::SessionOpened
            }
            Phase::Selecting(_) => {
                tracing::debug!("Trigger ignored while selecting");
                ControllerEvent::Ignored
            }
            Phase::Capturing(session) => match session.on_trigger() {
                TriggerDisposition::Aborted => {
                    self.phase = Phase::Armed;
                    ControllerEvent::Aborted
                }
                TriggerDisposition::Ignored => {
                    tracing::debug!(?now, "Trigger ignored while capturing");
                    ControllerEvent::Ignored
                }
            },
        }
    }

    fn open_session(&mut self) {
        let monitors = enumerate_monitors(self.monitors.as_ref());
        let bounds = virtual_desktop_bounds(&monitors);
        let home = self
            .last_pointer
            .and_then(|point| monitor_at(&monitors, point))
            .or_else(|| primary_monitor(&monitors))
            .map(MonitorInfo::bounds)
            .unwrap_or_else(|| bounds.as_rect());

        let prefs = self.store.load(&home);
        let overlay = SelectionOverlay::open(&prefs, bounds, self.settings.limits);
        let panel = OptionsPanel::new(prefs.options);

        tracing::info!(
            monitors = monitors.len(),
            rect = ?overlay.rect(),
            "Selection session opened"
        );
        self.phase = Phase::Selecting(ActiveSelection {
            overlay,
            panel,
            monitors,
        });
    }

    /// Confirm the selection and start the capture countdown.
    pub fn confirm(&mut self, now: Instant) -> ControllerEvent {
        let Some(active) = self.take_selection() else {
            return ControllerEvent::Ignored;
        };

        let ActiveSelection { overlay, panel, .. } = active;
        let Some(selection) = overlay.finish(panel.confirm()) else {
            return ControllerEvent::Cancelled;
        };

        let mut session = CaptureSession::new(
            CaptureRequest {
                selection,
                pointer: self.last_pointer,
            },
            self.settings.settle,
        );
        session.begin(now);
        let deadline = session.deadline().unwrap_or(now);
        self.phase = Phase::Capturing(session);
        ControllerEvent::CaptureScheduled { deadline }
    }

    /// Close the overlay without capturing or saving.
    pub fn cancel(&mut self) -> ControllerEvent {
        let Some(active) = self.take_selection() else {
            return ControllerEvent::Ignored;
        };
        let ActiveSelection { overlay, panel, .. } = active;
        let _ = overlay.finish(panel.cancel());
        tracing::info!("Selection cancelled");
        ControllerEvent::Cancelled
    }

    /// Advance a pending capture. Returns `Finished` once, when it ends.
    pub fn poll(&mut self, now: Instant) -> Option<ControllerEvent> {
        let Phase::Capturing(session) = &mut self.phase else {
            return None;
        };
        if let Some(point) = self.last_pointer {
            session.track_pointer(point);
        }
        let report = session.poll(now, &mut self.capabilities, &self.store, &mut self.namer)?;
        self.phase = Phase::Armed;
        Some(ControllerEvent::Finished(report))
    }

    /// Leave `Selecting`, handing out the session. Other phases stay put.
    fn take_selection(&mut self) -> Option<ActiveSelection> {
        match std::mem::replace(&mut self.phase, Phase::Armed) {
            Phase::Selecting(active) => Some(active),
            other => {
                self.phase = other;
                None
            }
        }
    }
}
