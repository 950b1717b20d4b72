// SPDX-License-Identifier: GPL-3.0-only

//! Rendering contract between the presenter and the host
//!
//! The presenter hands every new [`ViewState`] to a [`Renderer`]. The stock
//! renderer, [`DiffRenderer`], remembers the last state it saw and only
//! touches the [`ViewfinderSurface`] for fields that actually changed.

use super::state::{LensFacing, Size, ViewState, ZoomRect};
use crate::constants::MIN_ZOOM;
use crate::errors::CameraError;
use tracing::{debug, warn};

/// Sink for presenter output
pub trait Renderer {
    fn render(&mut self, state: &ViewState);
}

/// Host side of the viewfinder screen
pub trait ViewfinderSurface {
    /// Point the live feed at the lens of `state`
    fn bind_lens(&mut self, state: &ViewState) -> Result<(), CameraError>;

    /// Show only `rect` (sensor coordinates of `resolution`) of the feed
    fn apply_crop(&mut self, resolution: Size, rect: ZoomRect);

    /// Zoom indicator text, `None` hides it
    fn set_zoom_label(&mut self, label: Option<String>);

    fn tint_capture_button(&mut self, rgb: (u8, u8, u8));

    /// Transient message for the user
    fn notify(&mut self, message: String);
}

/// Renderer that forwards only changed fields to a surface
pub struct DiffRenderer<S> {
    surface: S,
    previous: Option<ViewState>,
}

impl<S: ViewfinderSurface> DiffRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            previous: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Last state rendered
    pub fn previous(&self) -> Option<&ViewState> {
        self.previous.as_ref()
    }

    fn bind(&mut self, state: &ViewState) {
        if let Err(e) = self.surface.bind_lens(state) {
            warn!(lens = %state.lens_facing, error = %e, "Failed to bind camera");
            self.surface
                .notify(format!("Failed to start {} camera: {}", state.lens_facing, e));
        }
    }
}

impl<S: ViewfinderSurface> Renderer for DiffRenderer<S> {
    fn render(&mut self, state: &ViewState) {
        let previous = self.previous.replace(*state);

        if previous.is_none_or(|p| p.lens_facing != state.lens_facing) {
            debug!(lens = %state.lens_facing, "Rebinding camera");
            self.bind(state);
        }

        if previous.is_none_or(|p| p.zoom_rect != state.zoom_rect) {
            self.surface.apply_crop(state.resolution, state.zoom_rect);
            self.surface.set_zoom_label(zoom_label(state.zoom));
        }

        if previous.is_none_or(|p| p.button_style != state.button_style) {
            self.surface.tint_capture_button(state.button_style.rgb());
        }
    }
}

/// Text of the zoom indicator, hidden at 1x
pub fn zoom_label(zoom: f32) -> Option<String> {
    (zoom > MIN_ZOOM).then(|| format!("x {:.1}", zoom))
}

/// Calls recorded by [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    BindLens(LensFacing),
    ApplyCrop(Size, ZoomRect),
    SetZoomLabel(Option<String>),
    TintCaptureButton((u8, u8, u8)),
    Notify(String),
}

/// Surface that records every call, for tests and headless runs
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
    /// Error returned by the next `bind_lens` calls
    pub bind_error: Option<CameraError>,
}

impl RecordingSurface {
    pub fn take_calls(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }
}

impl ViewfinderSurface for RecordingSurface {
    fn bind_lens(&mut self, state: &ViewState) -> Result<(), CameraError> {
        self.calls.push(SurfaceCall::BindLens(state.lens_facing));
        match &self.bind_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn apply_crop(&mut self, resolution: Size, rect: ZoomRect) {
        self.calls.push(SurfaceCall::ApplyCrop(resolution, rect));
    }

    fn set_zoom_label(&mut self, label: Option<String>) {
        self.calls.push(SurfaceCall::SetZoomLabel(label));
    }

    fn tint_capture_button(&mut self, rgb: (u8, u8, u8)) {
        self.calls.push(SurfaceCall::TintCaptureButton(rgb));
    }

    fn notify(&mut self, message: String) {
        self.calls.push(SurfaceCall::Notify(message));
    }
}
