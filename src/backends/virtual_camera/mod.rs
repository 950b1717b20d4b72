// SPDX-License-Identifier: GPL-3.0-only

//! Virtual camera backend
//!
//! Two synthetic lenses that produce animated test patterns, so the
//! viewfinder can run (and be tested) on machines without a camera. The back
//! lens shows color bars, the front lens a diagonal gradient; both carry a
//! moving marker so a frozen feed is easy to spot.

use crate::app::state::{LensFacing, Size};
use crate::backends::camera::{
    BackendResult, CameraBackend, CameraDevice, CameraFrame, CapabilityProvider, FeedLoop,
    FeedStep, FrameSender, LensInfo,
};
use crate::constants::VIRTUAL_FEED_FPS;
use crate::errors::CameraError;
use std::time::Duration;
use tracing::info;

/// Classic 75% color bars
const COLOR_BARS: [(u8, u8, u8); 7] = [
    (191, 191, 191),
    (191, 191, 0),
    (0, 191, 191),
    (0, 191, 0),
    (191, 0, 191),
    (191, 0, 0),
    (0, 0, 191),
];

/// Synthetic camera with a configurable set of lenses
#[derive(Debug, Clone)]
pub struct VirtualBackend {
    back: Option<Size>,
    front: Option<Size>,
    feed_size: Size,
}

impl VirtualBackend {
    /// `back` and `front` are the sensor sizes reported for each lens;
    /// `None` makes that lens absent
    pub fn new(back: Option<Size>, front: Option<Size>, feed_size: Size) -> Self {
        Self {
            back,
            front,
            feed_size,
        }
    }

    fn sensor(&self, lens: LensFacing) -> Option<Size> {
        match lens {
            LensFacing::Back => self.back,
            LensFacing::Front => self.front,
        }
        .filter(|size| !size.is_empty())
    }

    fn device(lens: LensFacing) -> CameraDevice {
        CameraDevice {
            name: format!("Virtual {} camera", lens),
            path: format!("virtual:{}", lens),
            driver: "virtual".to_string(),
            bus: format!("virtual-{}", lens),
        }
    }
}

impl CapabilityProvider for VirtualBackend {
    fn resolution_for(&self, lens: LensFacing) -> Option<Size> {
        self.sensor(lens)
    }

    fn has_lens(&self, lens: LensFacing) -> bool {
        self.sensor(lens).is_some()
    }
}

impl CameraBackend for VirtualBackend {
    fn name(&self) -> &'static str {
        "Virtual"
    }

    fn lenses(&self) -> Vec<LensInfo> {
        LensFacing::ALL
            .into_iter()
            .filter_map(|facing| {
                self.sensor(facing).map(|size| LensInfo {
                    facing,
                    device: Self::device(facing),
                    resolution: Some(size),
                })
            })
            .collect()
    }

    fn start_feed(&self, lens: LensFacing, sender: FrameSender) -> BackendResult<FeedLoop> {
        let sensor = self.sensor(lens).ok_or(CameraError::LensUnavailable(lens))?;
        let frame_size = fit_within(sensor, self.feed_size);
        let interval = Duration::from_millis(1000 / VIRTUAL_FEED_FPS.max(1));

        info!(lens = %lens, size = %frame_size, "Starting virtual feed");

        Ok(FeedLoop::spawn(
            &format!("virtual-{}", lens),
            || Ok(0u32),
            move |tick| {
                std::thread::sleep(interval);
                *tick = tick.wrapping_add(1);
                let data = test_pattern(lens, frame_size.width, frame_size.height, *tick);
                FeedStep::Frame(CameraFrame::new(
                    frame_size.width,
                    frame_size.height,
                    data,
                    *tick,
                ))
            },
            sender,
        ))
    }
}

/// Scale `sensor` down (keeping its aspect ratio) until it fits in `bounds`
pub fn fit_within(sensor: Size, bounds: Size) -> Size {
    if bounds.is_empty() || (sensor.width <= bounds.width && sensor.height <= bounds.height) {
        return sensor;
    }
    let scale = f64::min(
        bounds.width as f64 / sensor.width as f64,
        bounds.height as f64 / sensor.height as f64,
    );
    Size::new(
        ((sensor.width as f64 * scale) as u32).max(1),
        ((sensor.height as f64 * scale) as u32).max(1),
    )
}

/// Render one RGB24 test-pattern frame
pub fn test_pattern(lens: LensFacing, width: u32, height: u32, tick: u32) -> Vec<u8> {
    let (w, h) = (width as usize, height as usize);
    let mut rgb = Vec::with_capacity(w * h * 3);
    let marker_x = if w == 0 { 0 } else { (tick as usize * 4) % w };
    let marker_half = (w / 64).max(1);

    for y in 0..h {
        for x in 0..w {
            let (r, g, b) = if x.abs_diff(marker_x) < marker_half {
                (255, 255, 255)
            } else {
                match lens {
                    LensFacing::Back => COLOR_BARS[x * COLOR_BARS.len() / w.max(1)],
                    LensFacing::Front => (
                        (x * 255 / w.max(1)) as u8,
                        (y * 255 / h.max(1)) as u8,
                        128,
                    ),
                }
            };
            rgb.extend_from_slice(&[r, g, b]);
        }
    }

    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::mpsc;

    fn backend() -> VirtualBackend {
        VirtualBackend::new(
            Some(Size::new(1920, 1080)),
            None,
            Size::new(640, 480),
        )
    }

    #[test]
    fn test_capabilities_follow_configuration() {
        let backend = backend();
        assert!(backend.has_lens(LensFacing::Back));
        assert!(!backend.has_lens(LensFacing::Front));
        assert_eq!(
            backend.resolution_for(LensFacing::Back),
            Some(Size::new(1920, 1080))
        );
        assert_eq!(backend.resolution_for(LensFacing::Front), None);
        assert_eq!(backend.lenses().len(), 1);
    }

    #[test]
    fn test_fit_within_keeps_aspect() {
        assert_eq!(
            fit_within(Size::new(1920, 1080), Size::new(640, 480)),
            Size::new(640, 360)
        );
        assert_eq!(
            fit_within(Size::new(320, 240), Size::new(640, 480)),
            Size::new(320, 240)
        );
    }

    #[test]
    fn test_pattern_has_frame_size() {
        let data = test_pattern(LensFacing::Front, 16, 8, 3);
        assert_eq!(data.len(), 16 * 8 * 3);
    }

    #[test]
    fn test_missing_lens_feed_fails() {
        let (sender, _receiver) = mpsc::channel(1);
        let result = backend().start_feed(LensFacing::Front, sender);
        assert!(matches!(
            result,
            Err(CameraError::LensUnavailable(LensFacing::Front))
        ));
    }

    #[test]
    fn test_feed_delivers_frames() {
        let (sender, mut receiver) = mpsc::channel(4);
        let mut feed = backend().start_feed(LensFacing::Back, sender).unwrap();

        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        let frame = loop {
            if let Ok(frame) = receiver.try_recv() {
                break frame;
            }
            assert!(std::time::Instant::now() < deadline, "no frame from virtual feed");
            std::thread::sleep(Duration::from_millis(5));
        };
        feed.stop();

        assert_eq!((frame.width, frame.height), (640, 360));
        assert_eq!(frame.data.len(), 640 * 360 * 3);
    }
}
