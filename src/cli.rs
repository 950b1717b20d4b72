// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera operations
//!
//! - Listing the lenses the viewfinder would use
//! - Taking a single photo without the interactive UI

use futures::channel::mpsc;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use viewfinder::app::state::LensFacing;
use viewfinder::backends::camera::{CameraBackend, CameraFrame};
use viewfinder::config::Config;
use viewfinder::constants::{CAPTURE_TIMEOUT, CAPTURE_WARMUP, FRAME_CHANNEL_CAPACITY};
use viewfinder::errors::{CameraError, PhotoError};
use viewfinder::pipelines::photo::PhotoPipeline;

/// List the lenses of the backend, back first
pub fn list_lenses(backend: &dyn CameraBackend) -> Result<(), Box<dyn std::error::Error>> {
    let lenses = backend.lenses();

    if lenses.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available lenses ({}):", backend.name());
    println!();
    for lens in &lenses {
        println!("  [{}] {}", lens.facing, lens.device.name);
        println!("      Device: {}", lens.device.path);
        match lens.resolution {
            Some(size) => println!("      Sensor: {}", size),
            None => println!("      Sensor: unknown"),
        }
        println!();
    }

    Ok(())
}

/// Take a photo with `lens`
///
/// `output` may be a directory (a timestamped file is created inside it) or
/// a file path. Without it the photo goes to `photo_dir`.
pub fn take_photo(
    backend: &dyn CameraBackend,
    config: &Config,
    lens: LensFacing,
    output: Option<PathBuf>,
    photo_dir: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    if !backend.has_lens(lens) {
        return Err(CameraError::LensUnavailable(lens).into());
    }
    println!("Using {} lens", lens);

    println!("Capturing...");
    let (sender, mut receiver) = mpsc::channel(FRAME_CHANNEL_CAPACITY);
    let mut feed = backend.start_feed(lens, sender)?;

    // Wait for frames to stabilize (camera warm-up)
    let start = Instant::now();
    let mut frame: Option<CameraFrame> = None;

    while start.elapsed() < CAPTURE_TIMEOUT {
        match receiver.try_recv() {
            Ok(f) => {
                frame = Some(f);
                // After warmup period, use the next good frame
                if start.elapsed() > CAPTURE_WARMUP {
                    break;
                }
            }
            Err(_) => {
                std::thread::sleep(Duration::from_millis(16));
            }
        }
    }
    feed.stop();

    let frame = Arc::new(frame.ok_or(PhotoError::NoFrameAvailable)?);
    info!(width = frame.width, height = frame.height, "Frame captured");

    let pipeline = PhotoPipeline::new(config.jpeg_quality);
    let rt = tokio::runtime::Runtime::new()?;
    let output_path = rt.block_on(async {
        match output {
            Some(path) if !path.is_dir() => pipeline.save_to(frame, path).await,
            Some(dir) => pipeline.capture_and_save(frame, &dir).await,
            None => pipeline.capture_and_save(frame, &photo_dir).await,
        }
    })?;

    println!("Photo saved: {}", output_path.display());
    Ok(())
}
