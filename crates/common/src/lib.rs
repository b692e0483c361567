//! SnapFrame Common Utilities
//!
//! Shared infrastructure for all SnapFrame crates:
//! - Error types and result aliases
//! - Delay timer and capture file naming
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
