//! Error types shared across SnapFrame crates.

use std::path::PathBuf;

/// Top-level error type for SnapFrame operations.
#[derive(Debug, thiserror::Error)]
pub enum SnapError {
    #[error("Failed to load configuration at {path}: {message}")]
    ConfigLoad { path: PathBuf, message: String },

    #[error("Failed to save configuration at {path}: {source}")]
    ConfigSave {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Capture error: {message}")]
    Capture { message: String },

    #[error("Output to {route} failed: {message}")]
    OutputRoute { route: String, message: String },

    #[error("Platform error: {message}")]
    Platform { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SnapError.
pub type SnapResult<T> = Result<T, SnapError>;

impl SnapError {
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture {
            message: msg.into(),
        }
    }

    pub fn output_route(route: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::OutputRoute {
            route: route.into(),
            message: msg.into(),
        }
    }

    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform {
            message: msg.into(),
        }
    }

    pub fn config_save(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigSave {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_route_message_names_the_route() {
        let err = SnapError::output_route("clipboard", "no display");
        assert_eq!(err.to_string(), "Output to clipboard failed: no display");
    }

    #[test]
    fn config_save_keeps_io_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = SnapError::config_save("/tmp/prefs.json", io);
        assert!(err.to_string().contains("/tmp/prefs.json"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
