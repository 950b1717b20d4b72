// SPDX-License-Identifier: GPL-3.0-only

//! View state for the viewfinder screen
//!
//! [`ViewState`] is a small `Copy` value. The presenter never mutates it in
//! place: every intent builds a successor and replaces the old one.

use crate::constants::{MAX_ZOOM, MIN_ZOOM};
use serde::{Deserialize, Serialize};

/// Which physical camera is active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LensFacing {
    Front,
    #[default]
    Back,
}

impl LensFacing {
    pub const ALL: [LensFacing; 2] = [LensFacing::Back, LensFacing::Front];

    /// The lens on the other side of the device
    pub fn opposite(self) -> Self {
        match self {
            LensFacing::Front => LensFacing::Back,
            LensFacing::Back => LensFacing::Front,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LensFacing::Front => "front",
            LensFacing::Back => "back",
        }
    }
}

impl std::fmt::Display for LensFacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LensFacing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(LensFacing::Front),
            "back" | "rear" => Ok(LensFacing::Back),
            other => Err(format!("unknown lens facing '{}' (expected front or back)", other)),
        }
    }
}

/// Pixel dimensions of a sensor array
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0,
        height: 0,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Rectangle covering the whole array
    pub fn to_rect(self) -> ZoomRect {
        ZoomRect::new(0, 0, self.width as i32, self.height as i32)
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Visible crop in sensor coordinates, stored as edges
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ZoomRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ZoomRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Map this rectangle from `resolution` space onto a frame of
    /// `frame_width` x `frame_height` pixels.
    ///
    /// Returns `(x, y, width, height)` in frame pixels, always inside the
    /// frame and at least one pixel in each direction. An unknown resolution
    /// or an empty rectangle selects the whole frame.
    pub fn scaled_to(&self, resolution: Size, frame_width: u32, frame_height: u32) -> (u32, u32, u32, u32) {
        if resolution.is_empty() || self.is_empty() || frame_width == 0 || frame_height == 0 {
            return (0, 0, frame_width, frame_height);
        }

        let sx = frame_width as f64 / resolution.width as f64;
        let sy = frame_height as f64 / resolution.height as f64;

        let left = (self.left.max(0) as f64 * sx) as u32;
        let top = (self.top.max(0) as f64 * sy) as u32;
        let right = ((self.right.max(0) as f64 * sx) as u32).min(frame_width);
        let bottom = ((self.bottom.max(0) as f64 * sy) as u32).min(frame_height);

        let left = left.min(frame_width - 1);
        let top = top.min(frame_height - 1);
        let width = right.saturating_sub(left).max(1);
        let height = bottom.saturating_sub(top).max(1);

        (left, top, width, height)
    }
}

impl std::fmt::Display for ZoomRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Cosmetic color of the capture button, cycled by horizontal flings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonStyle {
    #[default]
    White,
    Red,
    Green,
    Blue,
}

impl ButtonStyle {
    /// Fixed cycle order
    pub const ALL: [ButtonStyle; 4] = [
        ButtonStyle::White,
        ButtonStyle::Red,
        ButtonStyle::Green,
        ButtonStyle::Blue,
    ];

    pub fn index(self) -> usize {
        match self {
            ButtonStyle::White => 0,
            ButtonStyle::Red => 1,
            ButtonStyle::Green => 2,
            ButtonStyle::Blue => 3,
        }
    }

    /// Step `direction` places through the cycle, wrapping both ways
    pub fn cycled(self, direction: i32) -> Self {
        let len = Self::ALL.len() as i64;
        let index = (self.index() as i64 + direction as i64).rem_euclid(len);
        Self::ALL[index as usize]
    }

    /// Tint applied to the capture button
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            ButtonStyle::White => (0xFF, 0xFF, 0xFF),
            ButtonStyle::Red => (0xFF, 0x44, 0x44),
            ButtonStyle::Green => (0x99, 0xCC, 0x00),
            ButtonStyle::Blue => (0x33, 0xB5, 0xE5),
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ButtonStyle::White => "White",
            ButtonStyle::Red => "Red",
            ButtonStyle::Green => "Green",
            ButtonStyle::Blue => "Blue",
        }
    }
}

/// Everything the viewfinder screen shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub lens_facing: LensFacing,
    /// Sensor array of the active lens, `(0, 0)` when unknown
    pub resolution: Size,
    /// Always within `[MIN_ZOOM, MAX_ZOOM]`
    pub zoom: f32,
    pub zoom_rect: ZoomRect,
    pub button_style: ButtonStyle,
}

impl ViewState {
    /// State before the first initialization
    pub fn initial(lens_facing: LensFacing, button_style: ButtonStyle) -> Self {
        Self {
            lens_facing,
            resolution: Size::ZERO,
            zoom: MIN_ZOOM,
            zoom_rect: ZoomRect::default(),
            button_style,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::initial(LensFacing::default(), ButtonStyle::default())
    }
}

/// Clamp a zoom factor into the supported range
pub fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_nan() {
        return MIN_ZOOM;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}
