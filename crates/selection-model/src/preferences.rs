//! Persisted selection preferences (`preferences.json`).
//!
//! The record holds the last confirmed rectangle and capture options. Loading
//! never fails: a missing, unreadable, corrupt or newer-schema file yields the
//! default record, and missing keys default one by one.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use snapframe_common::config::{default_screenshot_folder, preferences_file_path};
use snapframe_common::error::{SnapError, SnapResult};
use snapframe_platform_core::Rect;

use crate::geometry::MIN_SIZE;

/// Schema version written by this build.
pub const PREFERENCES_VERSION: u32 = 1;

/// Supported capture delays in seconds.
pub const DELAY_CHOICES: [u32; 2] = [0, 5];

/// Capture options chosen in the options panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsRecord {
    /// Draw the mouse pointer into the capture.
    #[serde(alias = "capture_pointer")]
    pub include_pointer: bool,

    /// Copy the capture to the clipboard.
    #[serde(alias = "save_clipboard")]
    pub save_to_clipboard: bool,

    /// Write the capture into `folder_path`.
    #[serde(alias = "save_folder")]
    pub save_to_folder: bool,

    /// Destination folder for saved captures.
    pub folder_path: PathBuf,

    /// Delay before capturing: 0 or 5 seconds.
    #[serde(alias = "delay_screenshot", deserialize_with = "deserialize_delay")]
    pub delay_seconds: u32,
}

impl Default for OptionsRecord {
    fn default() -> Self {
        Self {
            include_pointer: false,
            save_to_clipboard: true,
            save_to_folder: false,
            folder_path: default_screenshot_folder(),
            delay_seconds: 0,
        }
    }
}

impl OptionsRecord {
    /// Whether at least one output route is selected.
    pub fn has_output(&self) -> bool {
        self.save_to_clipboard || self.save_to_folder
    }
}

/// Snap a requested delay to the nearest supported value.
pub fn snap_delay(seconds: f64) -> u32 {
    if seconds >= 2.5 {
        DELAY_CHOICES[1]
    } else {
        DELAY_CHOICES[0]
    }
}

/// Accepts numbers of any shape, and the boolean "delay 5 seconds" flag of
/// older files. Anything else means no delay.
fn deserialize_delay<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(true) => DELAY_CHOICES[1],
        serde_json::Value::Number(n) => n.as_f64().map(snap_delay).unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().map(snap_delay).unwrap_or(0),
        _ => 0,
    })
}

/// The record stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedPreferences {
    /// Schema version.
    pub version: u32,

    /// Last confirmed selection in virtual-desktop coordinates.
    pub rectangle: Rect,

    /// Last confirmed options.
    #[serde(alias = "dialog")]
    pub options: OptionsRecord,
}

impl Default for PersistedPreferences {
    fn default() -> Self {
        Self {
            version: PREFERENCES_VERSION,
            rectangle: Rect::default(),
            options: OptionsRecord::default(),
        }
    }
}

impl PersistedPreferences {
    pub fn new(rectangle: Rect, options: OptionsRecord) -> Self {
        Self {
            version: PREFERENCES_VERSION,
            rectangle,
            options,
        }
    }

    /// The full default record for a session whose home monitor is `home`.
    pub fn defaults_for(home: &Rect) -> Self {
        Self::new(default_rectangle(home), OptionsRecord::default())
    }
}

/// Half the home monitor's size, centered on it.
pub fn default_rectangle(home: &Rect) -> Rect {
    Rect::centered_in(home, home.width / 2, home.height / 2)
}

/// Where a stored record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoredLayout {
    Current,
    /// Options under `dialog`. The rectangle of such files is relative to
    /// the old overlay canvas, not the desktop, and is not reused.
    Legacy,
}

/// Loads and saves [`PersistedPreferences`] at a fixed path.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
    min_size: u32,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            min_size: MIN_SIZE,
        }
    }

    /// Stored rectangles narrower or shorter than `min_size` are replaced
    /// by the default on load.
    pub fn with_min_size(mut self, min_size: u32) -> Self {
        self.min_size = min_size.max(1);
        self
    }

    /// Store at `$XDG_CONFIG_HOME/snapframe/preferences.json`.
    pub fn at_default_location() -> Self {
        Self::new(preferences_file_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record, substituting defaults for anything unusable.
    ///
    /// `home` is the monitor the default rectangle is centered on.
    pub fn load(&self, home: &Rect) -> PersistedPreferences {
        let mut prefs = match self.read() {
            Ok(Some((prefs, StoredLayout::Current))) => prefs,
            Ok(Some((mut prefs, StoredLayout::Legacy))) => {
                tracing::debug!("Legacy preferences: keeping options, resetting rectangle");
                prefs.rectangle = default_rectangle(home);
                prefs
            }
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "No preferences yet, using defaults");
                return PersistedPreferences::defaults_for(home);
            }
            Err(e) => {
                tracing::warn!("{}", e);
                return PersistedPreferences::defaults_for(home);
            }
        };

        if prefs.rectangle.width < self.min_size || prefs.rectangle.height < self.min_size {
            tracing::debug!(rect = ?prefs.rectangle, "Stored rectangle unusable, using default");
            prefs.rectangle = default_rectangle(home);
        }
        prefs.version = PREFERENCES_VERSION;
        prefs
    }

    fn read(&self) -> SnapResult<Option<(PersistedPreferences, StoredLayout)>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.load_error(e)),
        };

        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| self.load_error(e))?;
        let layout = if value.get("dialog").is_some() && value.get("options").is_none() {
            StoredLayout::Legacy
        } else {
            StoredLayout::Current
        };
        let prefs: PersistedPreferences =
            serde_json::from_value(value).map_err(|e| self.load_error(e))?;

        if prefs.version > PREFERENCES_VERSION {
            return Err(self.load_error(format!(
                "unsupported schema version {} (newest known is {})",
                prefs.version, PREFERENCES_VERSION
            )));
        }

        Ok(Some((prefs, layout)))
    }

    fn load_error(&self, message: impl std::fmt::Display) -> SnapError {
        SnapError::ConfigLoad {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }

    /// Write the record atomically: temp file in the same directory, then
    /// rename over the target.
    pub fn save(&self, prefs: &PersistedPreferences) -> SnapResult<()> {
        let json = serde_json::to_string_pretty(prefs)?;
        let tmp_path = self.tmp_path();

        let result = (|| -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut file = std::fs::File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
            std::fs::rename(&tmp_path, &self.path)
        })();

        if let Err(e) = result {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(SnapError::config_save(&self.path, e));
        }

        tracing::debug!(path = %self.path.display(), "Preferences saved");
        Ok(())
    }

    /// Delete the stored record. Returns whether a file was removed.
    pub fn reset(&self) -> SnapResult<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SnapError::config_save(&self.path, e)),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "preferences.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
