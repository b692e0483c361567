use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use image::{Rgba, RgbaImage};
use snapframe_capture_engine::backend::{ClipboardSink, ImageFileSink, ScreenGrabber};
use snapframe_capture_engine::{
    Capabilities, CaptureRequest, CaptureSession, ControllerEvent, ControllerSettings,
    ControllerState, Notice, OutputRoute, SessionState, SnapController,
};
use snapframe_common::clock::CaptureNamer;
use snapframe_common::error::{SnapError, SnapResult};
use snapframe_platform_core::{MonitorInfo, Point, Rect, StaticMonitors};
use snapframe_selection_model::{OptionsRecord, PreferenceStore, Selection};

#[derive(Debug, Default)]
struct Log {
    calls: Vec<String>,
    captured: Vec<(Rect, Option<Point>)>,
    files: Vec<PathBuf>,
}

type SharedLog = Rc<RefCell<Log>>;

struct FakeGrabber {
    log: SharedLog,
    fail: bool,
    live_pointer: Option<Point>,
}

impl ScreenGrabber for FakeGrabber {
    fn capture(&mut self, rect: Rect, pointer: Option<Point>) -> SnapResult<RgbaImage> {
        let mut log = self.log.borrow_mut();
        log.calls.push("capture".into());
        log.captured.push((rect, pointer));
        if self.fail {
            return Err(SnapError::capture("display server went away"));
        }
        Ok(RgbaImage::from_pixel(rect.width, rect.height, Rgba([1, 2, 3, 255])))
    }

    fn pointer_position(&self) -> Option<Point> {
        self.live_pointer
    }
}

struct FakeClipboard {
    log: SharedLog,
    fail: bool,
}

impl ClipboardSink for FakeClipboard {
    fn write_image(&mut self, _image: &RgbaImage) -> SnapResult<()> {
        self.log.borrow_mut().calls.push("clipboard".into());
        if self.fail {
            return Err(SnapError::output_route("clipboard", "clipboard unavailable"));
        }
        Ok(())
    }
}

struct FakeFiles {
    log: SharedLog,
}

impl ImageFileSink for FakeFiles {
    fn write_image(&mut self, _image: &RgbaImage, path: &Path) -> SnapResult<()> {
        let mut log = self.log.borrow_mut();
        log.calls.push("folder".into());
        log.files.push(path.to_path_buf());
        Ok(())
    }
}

fn capabilities(log: &SharedLog, grab_fails: bool, clipboard_fails: bool) -> Capabilities {
    Capabilities::new(
        Box::new(FakeGrabber {
            log: log.clone(),
            fail: grab_fails,
            live_pointer: None,
        }),
        Box::new(FakeClipboard {
            log: log.clone(),
            fail: clipboard_fails,
        }),
        Box::new(FakeFiles { log: log.clone() }),
    )
}

fn selection(options: OptionsRecord) -> Selection {
    Selection {
        rect: Rect::new(-1000, 100, 500, 300),
        options,
    }
}

const SETTLE: Duration = Duration::from_millis(150);

#[test]
fn clipboard_failure_is_reported_and_preferences_persist() {
    let dir = tempfile::tempdir().unwrap();
    let store = PreferenceStore::new(dir.path().join("preferences.json"));
    let log = SharedLog::default();
    let mut caps = capabilities(&log, false, true);
    let mut namer = CaptureNamer::default();

    let options = OptionsRecord {
        save_to_clipboard: true,
        save_to_folder: false,
        ..Default::default()
    };
    let mut session = CaptureSession::new(
        CaptureRequest {
            selection: selection(options.clone()),
            pointer: None,
        },
        SETTLE,
    );

    let start = Instant::now();
    session.begin(start);
    assert!(session
        .poll(start, &mut caps, &store, &mut namer)
        .is_none());

    let report = session
        .poll(start + SETTLE, &mut caps, &store, &mut namer)
        .expect("capture due");

    assert_eq!(session.state(), SessionState::Completed);
    assert_eq!(log.borrow().calls, vec!["capture", "clipboard"]);
    assert!(log.borrow().files.is_empty());
    assert!(!report.copied_to_clipboard);
    assert!(report.has_errors());
    assert!(matches!(
        report.notices.as_slice(),
        [Notice::OutputRouteFailure { route: OutputRoute::Clipboard, .. }]
    ));

    assert!(report.preferences_saved);
    let saved = store.load(&Rect::new(0, 0, 1920, 1080));
    assert_eq!(saved.rectangle, Rect::new(-1000, 100, 500, 300));
    assert_eq!(saved.options, options);
}

#[test]
fn retrigger_during_delay_aborts_without_capture() {
    let dir = tempfile::tempdir().unwrap();
    let store = PreferenceStore::new(dir.path().join("preferences.json"));
    let log = SharedLog::default();
    let mut caps = capabilities(&log, false, false);
    let mut namer = CaptureNamer::default();

    let mut session = CaptureSession::new(
        CaptureRequest {
            selection: selection(OptionsRecord {
                delay_seconds: 5,
                ..Default::default()
            }),
            pointer: None,
        },
        SETTLE,
    );

    let start = Instant::now();
    session.begin(start);
    assert!(session
        .poll(start + Duration::from_secs(2), &mut caps, &store, &mut namer)
        .is_none());

    session.on_trigger();
    assert_eq!(session.state(), SessionState::Aborted);

    assert!(session
        .poll(start + Duration::from_secs(10), &mut caps, &store, &mut namer)
        .is_none());
    assert!(log.borrow().calls.is_empty());
    assert!(!store.path().exists());
}

#[test]
fn capture_failure_skips_outputs_and_preferences() {
    let dir = tempfile::tempdir().unwrap();
    let store = PreferenceStore::new(dir.path().join("preferences.json"));
    let log = SharedLog::default();
    let mut caps = capabilities(&log, true, false);
    let mut namer = CaptureNamer::default();

    let mut session = CaptureSession::new(
        CaptureRequest {
            selection: selection(OptionsRecord::default()),
            pointer: None,
        },
        Duration::ZERO,
    );
    let now = Instant::now();
    session.begin(now);
    let report = session.poll(now, &mut caps, &store, &mut namer).unwrap();

    assert_eq!(session.state(), SessionState::Failed);
    assert_eq!(log.borrow().calls, vec!["capture"]);
    assert!(matches!(report.notices.as_slice(), [Notice::CaptureFailure(_)]));
    assert!(!report.preferences_saved);
    assert!(!store.path().exists());
}

#[test]
fn both_routes_run_in_order_with_pointer() {
    let dir = tempfile::tempdir().unwrap();
    let store = PreferenceStore::new(dir.path().join("preferences.json"));
    let log = SharedLog::default();
    let mut caps = capabilities(&log, false, false);
    let mut namer = CaptureNamer::default();
    let folder = dir.path().join("shots");

    let mut session = CaptureSession::new(
        CaptureRequest {
            selection: selection(OptionsRecord {
                include_pointer: true,
                save_to_clipboard: true,
                save_to_folder: true,
                folder_path: folder.clone(),
                delay_seconds: 0,
            }),
            pointer: Some(Point::new(-800.0, 200.0)),
        },
        Duration::ZERO,
    );
    let now = Instant::now();
    session.begin(now);
    let report = session.poll(now, &mut caps, &store, &mut namer).unwrap();

    let log = log.borrow();
    assert_eq!(log.calls, vec!["capture", "clipboard", "folder"]);
    assert_eq!(
        log.captured,
        vec![(Rect::new(-1000, 100, 500, 300), Some(Point::new(-800.0, 200.0)))]
    );
    assert!(report.notices.is_empty());
    assert!(report.copied_to_clipboard);
    assert_eq!(report.image_size, Some((500, 300)));

    let saved = report.saved_file.expect("file route");
    assert_eq!(saved.parent(), Some(folder.as_path()));
    let name = saved.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("screenshot_") && name.ends_with(".png"));
}

#[test]
fn no_output_still_captures_and_warns() {
    let dir = tempfile::tempdir().unwrap();
    let store = PreferenceStore::new(dir.path().join("preferences.json"));
    let log = SharedLog::default();
    let mut caps = capabilities(&log, false, false);
    let mut namer = CaptureNamer::default();

    let mut session = CaptureSession::new(
        CaptureRequest {
            selection: selection(OptionsRecord {
                save_to_clipboard: false,
                save_to_folder: false,
                ..Default::default()
            }),
            pointer: Some(Point::new(0.0, 0.0)),
        },
        Duration::ZERO,
    );
    let now = Instant::now();
    session.begin(now);
    let report = session.poll(now, &mut caps, &store, &mut namer).unwrap();

    assert_eq!(log.borrow().calls, vec!["capture"]);
    assert_eq!(log.borrow().captured[0].1, None);
    assert_eq!(report.notices, vec![Notice::NoOutputSelected]);
    assert!(!report.has_errors());
    assert!(report.preferences_saved);
}

fn controller(dir: &Path, log: &SharedLog) -> SnapController {
    let monitors = vec![
        MonitorInfo {
            name: "main".into(),
            width: 1920,
            height: 1080,
            x: 0,
            y: 0,
            scale_factor: 1.0,
            primary: true,
        },
        MonitorInfo {
            name: "left".into(),
            width: 1920,
            height: 1080,
            x: -1920,
            y: 0,
            scale_factor: 1.0,
            primary: false,
        },
    ];
    SnapController::new(
        PreferenceStore::new(dir.join("preferences.json")),
        Box::new(StaticMonitors(monitors)),
        capabilities(log, false, false),
        ControllerSettings::default(),
    )
}

#[test]
fn controller_runs_a_full_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let log = SharedLog::default();
    let mut controller = controller(dir.path(), &log);
    let start = Instant::now();

    // The default rect is centered on the monitor under the pointer.
    controller.set_pointer(Point::new(-100.0, 500.0));
    assert_eq!(controller.on_trigger(start), ControllerEvent::SessionOpened);
    assert_eq!(controller.state(), ControllerState::Selecting);
    assert_eq!(
        controller.selection().unwrap().overlay.rect(),
        Rect::new(-1440, 270, 960, 540)
    );

    assert_eq!(controller.on_trigger(start), ControllerEvent::Ignored);

    let active = controller.selection_mut().unwrap();
    active.overlay.nudge(40, 0);
    active.panel.options_mut().save_to_clipboard = true;

    let event = controller.confirm(start);
    assert_eq!(
        event,
        ControllerEvent::CaptureScheduled {
            deadline: start + Duration::from_millis(150)
        }
    );
    assert_eq!(controller.state(), ControllerState::Capturing);
    assert!(controller.selection().is_none());
    assert!(controller.poll(start).is_none());

    match controller.poll(start + Duration::from_millis(150)) {
        Some(ControllerEvent::Finished(report)) => assert!(report.copied_to_clipboard),
        other => panic!("expected finished capture, got {other:?}"),
    }
    assert_eq!(controller.state(), ControllerState::Armed);
    assert_eq!(
        log.borrow().captured[0].0,
        Rect::new(-1400, 270, 960, 540)
    );

    // Reopening restores the captured rect.
    controller.on_trigger(start);
    assert_eq!(
        controller.selection().unwrap().overlay.rect(),
        Rect::new(-1400, 270, 960, 540)
    );
}

#[test]
fn controller_delay_abort_rearms_without_saving() {
    let dir = tempfile::tempdir().unwrap();
    let log = SharedLog::default();
    let mut controller = controller(dir.path(), &log);
    let start = Instant::now();

    controller.on_trigger(start);
    controller
        .selection_mut()
        .unwrap()
        .panel
        .set_delay_seconds(5.0);
    controller.confirm(start);
    assert_eq!(
        controller.capture_remaining(start + Duration::from_secs(1)),
        Some(Duration::from_millis(4150))
    );

    assert_eq!(
        controller.on_trigger(start + Duration::from_secs(2)),
        ControllerEvent::Aborted
    );
    assert_eq!(controller.state(), ControllerState::Armed);
    assert!(controller.poll(start + Duration::from_secs(10)).is_none());
    assert!(log.borrow().calls.is_empty());
    assert!(!controller.store().path().exists());
}

#[test]
fn controller_cancel_discards_edits() {
    let dir = tempfile::tempdir().unwrap();
    let log = SharedLog::default();
    let mut controller = controller(dir.path(), &log);
    let start = Instant::now();

    assert_eq!(controller.confirm(start), ControllerEvent::Ignored);
    controller.on_trigger(start);
    controller.selection_mut().unwrap().overlay.nudge(-300, 0);
    assert_eq!(controller.cancel(), ControllerEvent::Cancelled);
    assert_eq!(controller.state(), ControllerState::Armed);
    assert!(!controller.store().path().exists());

    controller.on_trigger(start);
    assert_eq!(
        controller.selection().unwrap().overlay.rect(),
        Rect::new(480, 270, 960, 540)
    );
}

#[test]
fn marker_follows_pointer_moved_during_delay() {
    let dir = tempfile::tempdir().unwrap();
    let log = SharedLog::default();
    let mut controller = controller(dir.path(), &log);
    let start = Instant::now();

    controller.set_pointer(Point::new(700.0, 900.0));
    controller.on_trigger(start);
    let active = controller.selection_mut().unwrap();
    active.panel.options_mut().include_pointer = true;
    active.panel.set_delay_seconds(5.0);
    controller.confirm(start);

    controller.set_pointer(Point::new(960.0, 540.0));
    assert!(matches!(
        controller.poll(start + Duration::from_secs(6)),
        Some(ControllerEvent::Finished(_))
    ));
    assert_eq!(
        log.borrow().captured[0].1,
        Some(Point::new(960.0, 540.0))
    );
}

#[test]
fn live_pointer_wins_over_last_seen_position() {
    let dir = tempfile::tempdir().unwrap();
    let store = PreferenceStore::new(dir.path().join("preferences.json"));
    let log = SharedLog::default();
    let mut caps = Capabilities::new(
        Box::new(FakeGrabber {
            log: log.clone(),
            fail: false,
            live_pointer: Some(Point::new(-900.0, 200.0)),
        }),
        Box::new(FakeClipboard {
            log: log.clone(),
            fail: false,
        }),
        Box::new(FakeFiles { log: log.clone() }),
    );
    let mut namer = CaptureNamer::default();

    let mut session = CaptureSession::new(
        CaptureRequest {
            selection: selection(OptionsRecord {
                include_pointer: true,
                ..Default::default()
            }),
            pointer: Some(Point::new(-990.0, 110.0)),
        },
        Duration::ZERO,
    );
    let now = Instant::now();
    session.begin(now);
    session.poll(now, &mut caps, &store, &mut namer).unwrap();

    assert_eq!(
        log.borrow().captured[0].1,
        Some(Point::new(-900.0, 200.0))
    );
}
