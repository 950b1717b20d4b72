// SPDX-License-Identifier: MPL-2.0

//! Async photo capture pipeline
//!
//! ```text
//! Latest preview frame → Encoding → Disk I/O
//!       ↓
//! Preview continues uninterrupted
//! ```
//!
//! The pipeline itself is async; [`CaptureWorker`] runs it on a dedicated
//! thread so the UI loop only ever submits frames and drains outcomes.

pub mod encoding;
pub mod worker;

pub use encoding::{EncodedImage, PhotoEncoder};
pub use worker::{CaptureOutcome, CaptureWorker, OutcomeReceiver};

use crate::backends::camera::CameraFrame;
use crate::constants::JpegQuality;
use crate::errors::PhotoError;
use crate::storage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Encode → save workflow for one photo
pub struct PhotoPipeline {
    encoder: PhotoEncoder,
}

impl PhotoPipeline {
    pub fn new(quality: JpegQuality) -> Self {
        Self {
            encoder: PhotoEncoder::new(quality),
        }
    }

    /// Encode `frame` and save it as `<unix_millis>.jpg` in `output_dir`
    pub async fn capture_and_save(
        &self,
        frame: Arc<CameraFrame>,
        output_dir: &Path,
    ) -> Result<PathBuf, PhotoError> {
        let encoded = self.encoder.encode(frame).await?;
        self.encoder
            .save(encoded, storage::new_photo_path(output_dir))
            .await
    }

    /// Encode `frame` and save it at exactly `path`
    pub async fn save_to(&self, frame: Arc<CameraFrame>, path: PathBuf) -> Result<PathBuf, PhotoError> {
        let encoded = self.encoder.encode(frame).await?;
        self.encoder.save(encoded, path).await
    }
}

impl Default for PhotoPipeline {
    fn default() -> Self {
        Self::new(JpegQuality::default())
    }
}
