//! SnapFrame Selection Model
//!
//! The interactive region-selection core, independent of any UI toolkit:
//! - **Geometry:** clamping, handle hit testing, and drag application
//! - **Overlay:** the pointer-driven `Idle`/`Dragging` state machine
//! - **Panel:** the options form and its placement next to the selection
//! - **Preferences:** the persisted last rectangle and options
//!
//! All coordinates are integer virtual-desktop pixels; the origin may be
//! negative when a monitor sits left of or above the primary one.

pub mod geometry;
pub mod overlay;
pub mod panel;
pub mod preferences;

pub use geometry::*;
pub use overlay::*;
pub use panel::*;
pub use preferences::*;
