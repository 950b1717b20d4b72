// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application name, used for config and cache directories
pub const APP_NAME: &str = "viewfinder";

/// Lower bound of the digital zoom factor
pub const MIN_ZOOM: f32 = 1.0;

/// Upper bound of the digital zoom factor
pub const MAX_ZOOM: f32 = 2.0;

/// Default scale factor applied by one pinch step (key press or scroll notch)
pub const DEFAULT_PINCH_STEP: f32 = 1.1;

/// Synthetic fling velocity for keyboard flings (pixels per second)
pub const KEYBOARD_FLING_VELOCITY: f32 = 1000.0;

/// Extension of captured photos
pub const PHOTO_EXTENSION: &str = "jpg";

/// How long a transient notification stays on screen
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_secs(2);

/// Poll interval of the terminal event loop (~60 Hz)
pub const UI_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Frames buffered between the live feed thread and the UI loop
pub const FRAME_CHANNEL_CAPACITY: usize = 4;

/// Frame rate of the virtual test-pattern feed
pub const VIRTUAL_FEED_FPS: u64 = 30;

/// Time allowed for a one-shot capture to receive its first usable frame
pub const CAPTURE_TIMEOUT: Duration = Duration::from_secs(5);

/// Frames received before this point are discarded as sensor warm-up
pub const CAPTURE_WARMUP: Duration = Duration::from_millis(500);

/// JPEG quality presets for captured photos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JpegQuality {
    /// Smaller files, visible artifacts
    Low,
    /// Balanced quality and file size
    Medium,
    /// Low compression
    High,
    /// Minimal compression (default)
    #[default]
    Maximum,
}

impl JpegQuality {
    pub const ALL: [JpegQuality; 4] = [
        JpegQuality::Low,
        JpegQuality::Medium,
        JpegQuality::High,
        JpegQuality::Maximum,
    ];

    /// Quality value handed to the JPEG encoder (0-100)
    pub fn value(&self) -> u8 {
        match self {
            JpegQuality::Low => 60,
            JpegQuality::Medium => 80,
            JpegQuality::High => 92,
            JpegQuality::Maximum => 98,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            JpegQuality::Low => "Low",
            JpegQuality::Medium => "Medium",
            JpegQuality::High => "High",
            JpegQuality::Maximum => "Maximum",
        }
    }
}
