// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Stored as JSON in `<config_dir>/viewfinder/config.json`. Every field has a
//! default, so partial files are fine and a missing file means defaults.

use crate::app::state::{ButtonStyle, LensFacing, Size};
use crate::constants::{APP_NAME, DEFAULT_NOTIFICATION_DURATION, DEFAULT_PINCH_STEP, JpegQuality};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lens bound when the viewfinder opens
    pub initial_lens: LensFacing,
    /// Capture button color when the viewfinder opens
    pub initial_button_style: ButtonStyle,
    /// Device path forced for the front lens (e.g. `/dev/video2`)
    pub front_device: Option<String>,
    /// Device path forced for the back lens
    pub back_device: Option<String>,
    /// Where photos go instead of the picture directory
    pub photo_directory: Option<PathBuf>,
    pub jpeg_quality: JpegQuality,
    /// Zoom factor applied per key press or scroll step
    pub pinch_step: f32,
    /// Preview size the live feed aims for
    pub feed_size: Size,
    /// How long notifications stay on screen, in milliseconds
    pub notification_ms: u64,
    /// Sensor size of the virtual back lens, `null` removes it
    pub virtual_back_size: Option<Size>,
    /// Sensor size of the virtual front lens, `null` removes it
    pub virtual_front_size: Option<Size>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_lens: LensFacing::Back,
            initial_button_style: ButtonStyle::White,
            front_device: None,
            back_device: None,
            photo_directory: None,
            jpeg_quality: JpegQuality::default(),
            pinch_step: DEFAULT_PINCH_STEP,
            feed_size: Size::new(640, 480),
            notification_ms: DEFAULT_NOTIFICATION_DURATION.as_millis() as u64,
            virtual_back_size: Some(Size::new(1920, 1080)),
            virtual_front_size: Some(Size::new(1280, 720)),
        }
    }
}

impl Config {
    /// `<config_dir>/viewfinder/config.json`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Load from the default location, falling back to defaults on any problem
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            warn!("No config directory available, using defaults");
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unusable config file");
                Self::default()
            }
        }
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(AppError::Config(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("invalid {}: {}", path.display(), e)))?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Write to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let unwritable =
            |e: std::io::Error| AppError::Config(format!("cannot write {}: {}", path.display(), e));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(unwritable)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("cannot serialize config: {}", e)))?;
        std::fs::write(path, json).map_err(unwritable)?;
        debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Pinch step, replaced by the default unless it actually zooms
    pub fn pinch_step(&self) -> f32 {
        if self.pinch_step.is_finite() && self.pinch_step > 1.0 {
            self.pinch_step
        } else {
            DEFAULT_PINCH_STEP
        }
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }
}
