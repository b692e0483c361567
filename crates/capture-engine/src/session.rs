//! One capture pass: delay, grab, route, persist.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use snapframe_common::clock::{CaptureNamer, DelayTimer};
use snapframe_platform_core::Point;
use snapframe_selection_model::{PreferenceStore, Selection};

use crate::backend::Capabilities;

/// Lifecycle of a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not started.
    Idle,
    /// UI hidden, waiting for the delay to run out.
    Delaying,
    /// Grabbing pixels and routing them.
    Capturing,
    /// Capture taken; outputs reported individually.
    Completed,
    /// Re-triggered during the delay. Nothing captured or saved.
    Aborted,
    /// The grab itself failed. Nothing saved.
    Failed,
}

/// Where the image is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputRoute {
    Clipboard,
    Folder,
}

impl fmt::Display for OutputRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clipboard => f.write_str("clipboard"),
            Self::Folder => f.write_str("folder"),
        }
    }
}

/// User-visible outcome messages. None of them block the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    CaptureFailure(String),
    OutputRouteFailure { route: OutputRoute, message: String },
    NoOutputSelected,
    ConfigSaveWarning(String),
}

impl Notice {
    /// Whether the notice reports a failure rather than a hint.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::CaptureFailure(_) | Self::OutputRouteFailure { .. }
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CaptureFailure(message) => write!(f, "Screenshot failed: {message}"),
            Self::OutputRouteFailure { route, message } => {
                write!(f, "Could not save to {route}: {message}")
            }
            Self::NoOutputSelected => {
                f.write_str("Screenshot taken but not saved: no output selected")
            }
            Self::ConfigSaveWarning(message) => {
                write!(f, "Preferences were not saved: {message}")
            }
        }
    }
}

/// Result of a finished session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureReport {
    /// Pixel size of the captured image.
    pub image_size: Option<(u32, u32)>,
    pub copied_to_clipboard: bool,
    pub saved_file: Option<PathBuf>,
    pub preferences_saved: bool,
    pub notices: Vec<Notice>,
}

impl CaptureReport {
    pub fn has_errors(&self) -> bool {
        self.notices.iter().any(Notice::is_error)
    }
}

/// Outcome of a trigger delivered to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerDisposition {
    Ignored,
    Aborted,
}

/// What to capture and how.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    pub selection: Selection,
    /// Latest pointer position seen by the UI, used for the marker when the
    /// grabber cannot report a live one.
    pub pointer: Option<Point>,
}

/// Drives one capture from a confirmed selection.
#[derive(Debug)]
pub struct CaptureSession {
    request: CaptureRequest,
    settle: Duration,
    state: SessionState,
    timer: DelayTimer,
}

impl CaptureSession {
    pub fn new(request: CaptureRequest, settle: Duration) -> Self {
        Self {
            request,
            settle,
            state: SessionState::Idle,
            timer: DelayTimer::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn request(&self) -> &CaptureRequest {
        &self.request
    }

    /// User delay plus settle time.
    pub fn total_delay(&self) -> Duration {
        Duration::from_secs(u64::from(self.request.selection.options.delay_seconds)) + self.settle
    }

    /// Start the countdown. The caller has already hidden its UI.
    pub fn begin(&mut self, now: Instant) {
        if self.state != SessionState::Idle {
            return;
        }
        let delay = self.total_delay();
        self.timer.schedule(now, delay);
        self.state = SessionState::Delaying;
        tracing::info!(
            delay_ms = delay.as_millis() as u64,
            rect = ?self.request.selection.rect,
            "Capture scheduled"
        );
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Time left in the countdown.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    /// Record a newer pointer position seen while the delay runs.
    pub fn track_pointer(&mut self, point: Point) {
        self.request.pointer = Some(point);
    }

    /// A trigger during the delay aborts the session.
    pub fn on_trigger(&mut self) -> TriggerDisposition {
        if self.state != SessionState::Delaying {
            return TriggerDisposition::Ignored;
        }
        self.timer.cancel();
        self.state = SessionState::Aborted;
        tracing::info!("Capture aborted during delay");
        TriggerDisposition::Aborted
    }

    /// Capture once the delay has run out. Returns the report on the poll
    /// that performs the capture, `None` otherwise.
    pub fn poll(
        &mut self,
        now: Instant,
        capabilities: &mut Capabilities,
        store: &PreferenceStore,
        namer: &mut CaptureNamer,
    ) -> Option<CaptureReport> {
        if self.state != SessionState::Delaying || !self.timer.is_due(now) {
            return None;
        }
        self.timer.cancel();
        self.state = SessionState::Capturing;
        Some(self.capture(capabilities, store, namer))
    }

    fn capture(
        &mut self,
        capabilities: &mut Capabilities,
        store: &PreferenceStore,
        namer: &mut CaptureNamer,
    ) -> CaptureReport {
        let mut report = CaptureReport::default();
        let rect = self.request.selection.rect;
        let options = &self.request.selection.options;

        let pointer = if options.include_pointer {
            capabilities
                .grabber
                .pointer_position()
                .or(self.request.pointer)
        } else {
            None
        };

        let image = match capabilities.grabber.capture(rect, pointer) {
            Ok(image) => image,
            Err(e) => {
                tracing::error!(error = %e, "Capture failed");
                report.notices.push(Notice::CaptureFailure(e.to_string()));
                self.state = SessionState::Failed;
                return report;
            }
        };
        report.image_size = Some(image.dimensions());

        if !options.has_output() {
            tracing::warn!("No output selected; screenshot discarded");
            report.notices.push(Notice::NoOutputSelected);
        }

        if options.save_to_clipboard {
            match capabilities.clipboard.write_image(&image) {
                Ok(()) => report.copied_to_clipboard = true,
                Err(e) => {
                    tracing::warn!(error = %e, "Clipboard output failed");
                    report.notices.push(Notice::OutputRouteFailure {
                        route: OutputRoute::Clipboard,
                        message: e.to_string(),
                    });
                }
            }
        }

        if options.save_to_folder {
            let path = namer.next_path(&options.folder_path, chrono::Local::now().naive_local());
            match capabilities.files.write_image(&image, &path) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "Screenshot saved");
                    report.saved_file = Some(path);
                }
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "Folder output failed");
                    report.notices.push(Notice::OutputRouteFailure {
                        route: OutputRoute::Folder,
                        message: e.to_string(),
                    });
                }
            }
        }

        let prefs = self.request.selection.clone().into_preferences();
        match store.save(&prefs) {
            Ok(()) => report.preferences_saved = true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to persist preferences");
                report.notices.push(Notice::ConfigSaveWarning(e.to_string()));
            }
        }

        self.state = SessionState::Completed;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapframe_platform_core::Rect;
    use snapframe_selection_model::OptionsRecord;

    fn session(delay_seconds: u32) -> CaptureSession {
        let selection = Selection {
            rect: Rect::new(0, 0, 100, 100),
            options: OptionsRecord {
                delay_seconds,
                ..Default::default()
            },
        };
        CaptureSession::new(
            CaptureRequest {
                selection,
                pointer: None,
            },
            Duration::from_millis(150),
        )
    }

    #[test]
    fn test_total_delay_includes_settle() {
        assert_eq!(session(5).total_delay(), Duration::from_millis(5150));
        assert_eq!(session(0).total_delay(), Duration::from_millis(150));
    }

    #[test]
    fn test_trigger_only_aborts_while_delaying() {
        let mut s = session(5);
        assert_eq!(s.on_trigger(), TriggerDisposition::Ignored);
        assert_eq!(s.state(), SessionState::Idle);

        let now = Instant::now();
        s.begin(now);
        assert_eq!(s.state(), SessionState::Delaying);
        assert_eq!(s.deadline(), Some(now + Duration::from_millis(5150)));

        assert_eq!(s.on_trigger(), TriggerDisposition::Aborted);
        assert_eq!(s.state(), SessionState::Aborted);
        assert_eq!(s.deadline(), None);
        assert_eq!(s.on_trigger(), TriggerDisposition::Ignored);
    }

    #[test]
    fn test_notice_messages() {
        let notice = Notice::OutputRouteFailure {
            route: OutputRoute::Clipboard,
            message: "no display".into(),
        };
        assert_eq!(notice.to_string(), "Could not save to clipboard: no display");
        assert!(notice.is_error());
        assert!(!Notice::NoOutputSelected.is_error());
    }
}
