//! SnapFrame Capture Engine
//!
//! Turns a confirmed selection into pixels and routes them to the chosen
//! outputs. The controller owns the trigger-driven lifecycle; the session
//! runs one hide → delay → capture → route → persist pass.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               SnapController                 │
//! │   Armed ──trigger──▶ Selecting ──confirm──┐  │
//! │     ▲                    │ cancel         │  │
//! │     └────────────────────┘                ▼  │
//! │  ┌─────────────────────────────────────────┐ │
//! │  │            CaptureSession               │ │
//! │  │  Delaying ─▶ Capturing ─▶ Completed     │ │
//! │  │     │ trigger     │ error               │ │
//! │  │     ▼             ▼                     │ │
//! │  │  Aborted        Failed                  │ │
//! │  └──────┬──────────────┬───────────────────┘ │
//! │         ▼              ▼                     │
//! │  ScreenGrabber   ClipboardSink / ImageFileSink│
//! └──────────────────────────────────────────────┘
//! ```

pub mod backend;
pub mod controller;
pub mod session;
pub mod trigger;

pub use backend::Capabilities;
pub use controller::*;
pub use session::*;
pub use trigger::*;
