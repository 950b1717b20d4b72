// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera backend
//!
//! Talks to `/dev/video*` nodes through the `v4l` crate: capability queries
//! for the presenter, device listing for the CLI and an mmap streaming feed
//! for the terminal viewfinder.

use super::format_converters::decode_to_rgb;
use super::frame_loop::{FeedLoop, FeedStep};
use super::types::{BackendResult, CameraDevice, CameraFormat, CameraFrame, FrameSender, PixelFormat};
use super::{CameraBackend, CapabilityProvider, LensCatalog, LensInfo, LensOverrides};
use crate::app::state::{LensFacing, Size};
use crate::errors::CameraError;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use v4l::buffer::Type;
use v4l::capability::Flags;
use v4l::framesize::FrameSizeEnum;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::{Format, FourCC};

/// Number of mmap buffers requested from the driver
const STREAM_BUFFERS: u32 = 4;

/// Backend over the V4L2 capture devices of this machine
///
/// Devices are re-enumerated on every query so hot-plugged cameras show up
/// on the next lens switch.
#[derive(Debug, Clone)]
pub struct V4l2Backend {
    overrides: LensOverrides,
    feed_size: Size,
}

impl V4l2Backend {
    /// `feed_size` is the preview size the live feed aims for
    pub fn new(overrides: LensOverrides, feed_size: Size) -> Self {
        Self {
            overrides,
            feed_size,
        }
    }

    fn catalog(&self) -> LensCatalog {
        LensCatalog::assign(&enumerate_devices(), &self.overrides)
    }
}

impl CapabilityProvider for V4l2Backend {
    fn resolution_for(&self, lens: LensFacing) -> Option<Size> {
        let catalog = self.catalog();
        let device = catalog.device(lens)?;
        match sensor_resolution(&device.path) {
            Ok(size) => size,
            Err(e) => {
                warn!(lens = %lens, path = %device.path, error = %e, "Failed to query sensor resolution");
                None
            }
        }
    }

    fn has_lens(&self, lens: LensFacing) -> bool {
        self.catalog().device(lens).is_some()
    }
}

impl CameraBackend for V4l2Backend {
    fn name(&self) -> &'static str {
        "V4L2"
    }

    fn lenses(&self) -> Vec<LensInfo> {
        self.catalog()
            .iter()
            .map(|(facing, device)| LensInfo {
                facing,
                device: device.clone(),
                resolution: sensor_resolution(&device.path).ok().flatten(),
            })
            .collect()
    }

    fn start_feed(&self, lens: LensFacing, sender: FrameSender) -> BackendResult<FeedLoop> {
        let catalog = self.catalog();
        let device = catalog
            .device(lens)
            .cloned()
            .ok_or(CameraError::LensUnavailable(lens))?;

        let dev = Device::with_path(&device.path).map_err(|e| {
            CameraError::InitializationFailed(format!("cannot open {}: {}", device.path, e))
        })?;
        let candidates = supported_formats(&dev, self.feed_size);
        let format = choose_feed_format(&candidates, self.feed_size).ok_or_else(|| {
            CameraError::InvalidFormat(format!("{} offers no supported pixel format", device.name))
        })?;
        let applied = apply_format(&dev, format)?;
        drop(dev);

        info!(lens = %lens, device = %device.name, format = %applied, "Starting V4L2 feed");

        let path = device.path.clone();
        Ok(FeedLoop::spawn(
            &format!("v4l2-{}", lens),
            move || open_stream(&path, applied),
            next_frame,
            sender,
        ))
    }
}

/// All `/dev/video*` nodes, whether or not they can be opened
pub fn device_nodes() -> Vec<PathBuf> {
    let mut nodes = v4l::context::enum_devices();
    nodes.sort_by_key(|node| node.index());
    nodes.iter().map(|node| node.path().to_path_buf()).collect()
}

/// Capture devices, one node per physical camera
pub fn enumerate_devices() -> Vec<CameraDevice> {
    let mut devices: Vec<CameraDevice> = Vec::new();

    for path in device_nodes() {
        let path = path.to_string_lossy().to_string();
        let dev = match Device::with_path(&path) {
            Ok(dev) => dev,
            Err(e) => {
                debug!(path = %path, error = %e, "Skipping unopenable video node");
                continue;
            }
        };
        let caps = match dev.query_caps() {
            Ok(caps) => caps,
            Err(e) => {
                debug!(path = %path, error = %e, "Skipping video node without capabilities");
                continue;
            }
        };

        if !caps.capabilities.contains(Flags::VIDEO_CAPTURE) {
            continue;
        }
        if !caps.bus.is_empty() && devices.iter().any(|d| d.bus == caps.bus) {
            debug!(path = %path, bus = %caps.bus, "Skipping secondary node of known camera");
            continue;
        }

        debug!(path = %path, card = %caps.card, driver = %caps.driver, "Found capture device");
        devices.push(CameraDevice {
            name: caps.card,
            path,
            driver: caps.driver,
            bus: caps.bus,
        });
    }

    devices
}

/// Largest frame size the device can deliver in any format
pub fn sensor_resolution(path: &str) -> std::io::Result<Option<Size>> {
    let dev = Device::with_path(path)?;
    let mut best: Option<Size> = None;

    for description in dev.enum_formats()? {
        let sizes = match dev.enum_framesizes(description.fourcc) {
            Ok(sizes) => sizes,
            Err(_) => continue,
        };
        for frame_size in sizes {
            let size = match frame_size.size {
                FrameSizeEnum::Discrete(discrete) => Size::new(discrete.width, discrete.height),
                FrameSizeEnum::Stepwise(step) => Size::new(step.max_width, step.max_height),
            };
            if best.is_none_or(|b| size.area() > b.area()) {
                best = Some(size);
            }
        }
    }

    Ok(best)
}

/// Decodable formats offered by the device
///
/// Stepwise ranges contribute the size closest to `preferred` inside them.
fn supported_formats(dev: &Device, preferred: Size) -> Vec<CameraFormat> {
    let mut formats = Vec::new();
    let Ok(descriptions) = dev.enum_formats() else {
        return formats;
    };

    for description in descriptions {
        let Some(pixel_format) = PixelFormat::from_fourcc(&description.fourcc.repr) else {
            continue;
        };
        let Ok(sizes) = dev.enum_framesizes(description.fourcc) else {
            continue;
        };
        for frame_size in sizes {
            let (width, height) = match frame_size.size {
                FrameSizeEnum::Discrete(discrete) => (discrete.width, discrete.height),
                FrameSizeEnum::Stepwise(step) => (
                    preferred.width.clamp(step.min_width, step.max_width),
                    preferred.height.clamp(step.min_height, step.max_height),
                ),
            };
            formats.push(CameraFormat {
                width,
                height,
                pixel_format,
            });
        }
    }

    formats
}

/// Pick the feed format closest in area to `preferred`, breaking ties by
/// pixel format preference
pub fn choose_feed_format(candidates: &[CameraFormat], preferred: Size) -> Option<CameraFormat> {
    let target = preferred.area() as i64;
    candidates.iter().copied().min_by_key(|format| {
        let area = format.width as i64 * format.height as i64;
        let rank = PixelFormat::PREFERRED
            .iter()
            .position(|p| *p == format.pixel_format)
            .unwrap_or(PixelFormat::PREFERRED.len());
        ((area - target).abs(), rank)
    })
}

/// Configured stream format, including the driver's row stride
#[derive(Debug, Clone, Copy)]
struct AppliedFormat {
    format: CameraFormat,
    stride: u32,
}

impl std::fmt::Display for AppliedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.format.fmt(f)
    }
}

fn apply_format(dev: &Device, format: CameraFormat) -> BackendResult<AppliedFormat> {
    let fourcc = FourCC::new(&format.pixel_format.fourcc());
    let applied = dev.set_format(&Format::new(format.width, format.height, fourcc))?;

    let pixel_format = PixelFormat::from_fourcc(&applied.fourcc.repr).ok_or_else(|| {
        CameraError::InvalidFormat(format!("driver switched to unsupported {:?}", applied.fourcc))
    })?;

    Ok(AppliedFormat {
        format: CameraFormat {
            width: applied.width,
            height: applied.height,
            pixel_format,
        },
        stride: applied.stride,
    })
}

struct V4l2Stream {
    stream: MmapStream<'static>,
    applied: AppliedFormat,
}

fn open_stream(path: &str, applied: AppliedFormat) -> Result<V4l2Stream, String> {
    let dev = Device::with_path(path).map_err(|e| format!("Failed to open device: {}", e))?;
    let applied = apply_format(&dev, applied.format).map_err(|e| e.to_string())?;
    let stream = MmapStream::with_buffers(&dev, Type::VideoCapture, STREAM_BUFFERS)
        .map_err(|e| format!("Failed to create stream: {}", e))?;
    Ok(V4l2Stream { stream, applied })
}

fn next_frame(state: &mut V4l2Stream) -> FeedStep {
    let (buf, meta) = match state.stream.next() {
        Ok(frame) => frame,
        Err(e) => {
            warn!(error = %e, "Failed to capture frame");
            std::thread::sleep(std::time::Duration::from_millis(10));
            return FeedStep::Skip;
        }
    };

    let used = meta.bytesused as usize;
    let data = if used > 0 && used <= buf.len() {
        &buf[..used]
    } else {
        buf
    };

    let format = state.applied.format;
    match decode_to_rgb(
        format.pixel_format,
        data,
        format.width,
        format.height,
        state.applied.stride,
    ) {
        Ok((rgb, width, height)) => FeedStep::Frame(CameraFrame::new(width, height, rgb, meta.sequence)),
        Err(e) => {
            debug!(sequence = meta.sequence, error = %e, "Dropping undecodable frame");
            FeedStep::Skip
        }
    }
}
