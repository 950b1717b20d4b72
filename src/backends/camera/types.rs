// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use crate::errors::CameraError;
use futures::channel::mpsc;
use std::sync::Arc;
use std::time::Instant;

/// Result alias used by every backend
pub type BackendResult<T> = Result<T, CameraError>;

/// Live feed frames travel from the capture thread to the UI loop on this channel
pub type FrameSender = mpsc::Sender<CameraFrame>;

/// Receiving half of [`FrameSender`]
pub type FrameReceiver = mpsc::Receiver<CameraFrame>;

/// Represents a camera device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Human readable name (V4L2 card)
    pub name: String,
    /// Capture node, e.g. `/dev/video0`
    pub path: String,
    /// Driver name (V4L2 driver)
    pub driver: String,
    /// Bus info; nodes sharing it belong to the same physical camera
    pub bus: String,
}

/// Pixel formats the live feed knows how to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Motion JPEG, one JPEG image per buffer
    Mjpg,
    /// Packed 4:2:2 (Y0 U Y1 V)
    Yuyv,
    /// 24-bit RGB
    Rgb24,
    /// 8-bit grayscale
    Gray8,
}

impl PixelFormat {
    /// Formats in order of preference for the live feed
    pub const PREFERRED: [PixelFormat; 4] = [
        PixelFormat::Mjpg,
        PixelFormat::Yuyv,
        PixelFormat::Rgb24,
        PixelFormat::Gray8,
    ];

    pub fn fourcc(&self) -> [u8; 4] {
        match self {
            PixelFormat::Mjpg => *b"MJPG",
            PixelFormat::Yuyv => *b"YUYV",
            PixelFormat::Rgb24 => *b"RGB3",
            PixelFormat::Gray8 => *b"GREY",
        }
    }

    pub fn from_fourcc(fourcc: &[u8; 4]) -> Option<Self> {
        Self::PREFERRED
            .into_iter()
            .find(|format| &format.fourcc() == fourcc)
    }

    /// Bytes per row for uncompressed formats
    pub fn min_stride(&self, width: u32) -> Option<usize> {
        match self {
            PixelFormat::Mjpg => None,
            PixelFormat::Yuyv => Some(width as usize * 2),
            PixelFormat::Rgb24 => Some(width as usize * 3),
            PixelFormat::Gray8 => Some(width as usize),
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fourcc = self.fourcc();
        write!(f, "{}", String::from_utf8_lossy(&fourcc))
    }
}

/// Camera format specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraFormat {
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
}

impl std::fmt::Display for CameraFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} {}", self.width, self.height, self.pixel_format)
    }
}

/// A decoded frame: tightly packed RGB24, `width * height * 3` bytes
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
    pub sequence: u32,
    pub captured_at: Instant,
}

impl CameraFrame {
    pub fn new(width: u32, height: u32, data: Vec<u8>, sequence: u32) -> Self {
        Self {
            width,
            height,
            data: Arc::from(data),
            sequence,
            captured_at: Instant::now(),
        }
    }

    /// Sample one pixel, clamping coordinates into the frame
    pub fn rgb_at(&self, x: u32, y: u32) -> (u8, u8, u8) {
        if self.width == 0 || self.height == 0 {
            return (0, 0, 0);
        }
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let idx = (y * self.width as usize + x) * 3;
        match self.data.get(idx..idx + 3) {
            Some(px) => (px[0], px[1], px[2]),
            None => (0, 0, 0),
        }
    }

    /// Copy into an `image` buffer for encoding
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.data.to_vec())
    }
}
