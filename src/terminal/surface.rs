// SPDX-License-Identifier: GPL-3.0-only

//! Terminal implementation of the viewfinder surface
//!
//! Holds everything the renderer changes (bound feed, crop, zoom label,
//! button tint, notifications) so the draw pass only has to read it.

use crate::app::render::ViewfinderSurface;
use crate::app::state::{LensFacing, Size, ViewState, ZoomRect};
use crate::backends::camera::{CameraBackend, CameraFrame, FeedLoop, FrameReceiver};
use crate::constants::FRAME_CHANNEL_CAPACITY;
use crate::errors::CameraError;
use futures::channel::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// A single transient message with an expiry
#[derive(Debug)]
pub struct Notifications {
    duration: Duration,
    current: Option<(String, Instant)>,
}

impl Notifications {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            current: None,
        }
    }

    /// Show `message`, replacing any message still on screen
    pub fn push(&mut self, message: String, now: Instant) {
        self.current = Some((message, now + self.duration));
    }

    /// Message still visible at `now`
    pub fn current(&self, now: Instant) -> Option<&str> {
        match &self.current {
            Some((message, expires)) if now < *expires => Some(message),
            _ => None,
        }
    }
}

pub struct TerminalSurface {
    backend: Arc<dyn CameraBackend>,
    feed: Option<FeedLoop>,
    frames: Option<FrameReceiver>,
    frame: Option<Arc<CameraFrame>>,
    lens: Option<LensFacing>,
    resolution: Size,
    crop: ZoomRect,
    zoom_label: Option<String>,
    button_rgb: (u8, u8, u8),
    notifications: Notifications,
}

impl TerminalSurface {
    pub fn new(backend: Arc<dyn CameraBackend>, notification_duration: Duration) -> Self {
        Self {
            backend,
            feed: None,
            frames: None,
            frame: None,
            lens: None,
            resolution: Size::ZERO,
            crop: ZoomRect::default(),
            zoom_label: None,
            button_rgb: (0xFF, 0xFF, 0xFF),
            notifications: Notifications::new(notification_duration),
        }
    }

    /// Drain the feed channel, keeping only the newest frame
    pub fn poll_frames(&mut self) {
        while let Some(frame) = self.frames.as_mut().and_then(|rx| rx.try_recv().ok()) {
            self.frame = Some(Arc::new(frame));
        }
    }

    pub fn latest_frame(&self) -> Option<Arc<CameraFrame>> {
        self.frame.clone()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Lens of the running feed, `None` before the first successful bind
    pub fn bound_lens(&self) -> Option<LensFacing> {
        self.lens
    }

    /// Crop of the latest frame as `(x, y, width, height)` in frame pixels
    pub fn frame_crop(&self, frame: &CameraFrame) -> (u32, u32, u32, u32) {
        self.crop
            .scaled_to(self.resolution, frame.width, frame.height)
    }

    pub fn zoom_label(&self) -> Option<&str> {
        self.zoom_label.as_deref()
    }

    pub fn button_rgb(&self) -> (u8, u8, u8) {
        self.button_rgb
    }

    pub fn notification(&self, now: Instant) -> Option<&str> {
        self.notifications.current(now)
    }

    fn release_feed(&mut self) {
        if let Some(mut feed) = self.feed.take() {
            debug!(name = feed.name(), "Releasing feed");
            feed.stop();
        }
        self.frames = None;
        self.frame = None;
        self.lens = None;
    }
}

impl ViewfinderSurface for TerminalSurface {
    fn bind_lens(&mut self, state: &ViewState) -> Result<(), CameraError> {
        self.release_feed();

        let (sender, receiver) = mpsc::channel(FRAME_CHANNEL_CAPACITY);
        let feed = self.backend.start_feed(state.lens_facing, sender)?;
        info!(lens = %state.lens_facing, backend = self.backend.name(), "Feed bound");

        self.feed = Some(feed);
        self.frames = Some(receiver);
        self.lens = Some(state.lens_facing);
        Ok(())
    }

    fn apply_crop(&mut self, resolution: Size, rect: ZoomRect) {
        self.resolution = resolution;
        self.crop = rect;
    }

    fn set_zoom_label(&mut self, label: Option<String>) {
        self.zoom_label = label;
    }

    fn tint_capture_button(&mut self, rgb: (u8, u8, u8)) {
        self.button_rgb = rgb;
    }

    fn notify(&mut self, message: String) {
        info!(message = %message, "Notification");
        self.notifications.push(message, Instant::now());
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        self.release_feed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_camera::VirtualBackend;

    fn surface() -> TerminalSurface {
        let backend = VirtualBackend::new(Some(Size::new(320, 240)), None, Size::new(160, 120));
        TerminalSurface::new(Arc::new(backend), Duration::from_secs(2))
    }

    #[test]
    fn test_notification_expires() {
        let mut notifications = Notifications::new(Duration::from_secs(2));
        let now = Instant::now();
        notifications.push("hello".to_string(), now);
        assert_eq!(notifications.current(now), Some("hello"));
        assert_eq!(notifications.current(now + Duration::from_secs(3)), None);
    }

    #[test]
    fn test_newer_notification_replaces_older() {
        let mut notifications = Notifications::new(Duration::from_secs(2));
        let now = Instant::now();
        notifications.push("first".to_string(), now);
        notifications.push("second".to_string(), now);
        assert_eq!(notifications.current(now), Some("second"));
    }

    #[test]
    fn test_bind_missing_lens_fails() {
        let mut surface = surface();
        let state = ViewState::initial(LensFacing::Front, Default::default());
        assert_eq!(
            surface.bind_lens(&state),
            Err(CameraError::LensUnavailable(LensFacing::Front))
        );
        assert_eq!(surface.bound_lens(), None);
    }

    #[test]
    fn test_bind_and_receive_frames() {
        let mut surface = surface();
        surface.bind_lens(&ViewState::default()).unwrap();
        assert_eq!(surface.bound_lens(), Some(LensFacing::Back));

        let deadline = Instant::now() + Duration::from_secs(2);
        while surface.latest_frame().is_none() {
            assert!(Instant::now() < deadline, "no frame arrived");
            std::thread::sleep(Duration::from_millis(5));
            surface.poll_frames();
        }
        let frame = surface.latest_frame().unwrap();
        assert_eq!((frame.width, frame.height), (160, 120));
    }

    #[test]
    fn test_crop_maps_onto_frame() {
        let mut surface = surface();
        surface.apply_crop(Size::new(320, 240), ZoomRect::new(80, 60, 240, 180));
        let frame = CameraFrame::new(160, 120, vec![0; 160 * 120 * 3], 0);
        assert_eq!(surface.frame_crop(&frame), (40, 30, 80, 60));
    }
}
