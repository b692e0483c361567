//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Overrides the well-known preferences file location.
    pub preferences_path: Option<PathBuf>,

    /// Selection overlay appearance and geometry limits.
    pub overlay: OverlayConfig,

    /// Capture timing and file naming.
    pub capture: CaptureDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Selection overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Edge length of the square resize handles (pixels).
    pub handle_size: u32,

    /// Smallest width/height the selection may shrink to (pixels).
    pub min_size: u32,

    /// Alpha of the tint drawn over the excluded area (0-255).
    pub dim_alpha: u8,
}

/// Capture defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureDefaults {
    /// Pause after hiding the overlay so the compositor repaints
    /// before pixels are grabbed.
    pub settle_ms: u64,

    /// Prefix of generated screenshot file names.
    pub filename_prefix: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "snapframe=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            preferences_path: None,
            overlay: OverlayConfig::default(),
            capture: CaptureDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            handle_size: 10,
            min_size: 16,
            dim_alpha: 110,
        }
    }
}

impl Default for CaptureDefaults {
    fn default() -> Self {
        Self {
            settle_ms: 150,
            filename_prefix: "screenshot".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Where the selection preferences live for this configuration.
    pub fn preferences_file(&self) -> PathBuf {
        self.preferences_path
            .clone()
            .unwrap_or_else(preferences_file_path)
    }
}

fn config_base_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

fn home_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home)
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    config_base_dir().join("snapframe").join("config.json")
}

/// Standard preferences file location.
pub fn preferences_file_path() -> PathBuf {
    config_base_dir().join("snapframe").join("preferences.json")
}

/// Default folder for saved screenshots: the user's desktop, or home
/// when there is no desktop directory.
pub fn default_screenshot_folder() -> PathBuf {
    let home = home_dir();
    let desktop = home.join("Desktop");
    if desktop.is_dir() {
        desktop
    } else {
        home
    }
}
