// SPDX-License-Identifier: GPL-3.0-only

//! Async JPEG encoding
//!
//! Encoding and file writes are blocking work, so both run on tokio's
//! blocking pool.

use crate::backends::camera::CameraFrame;
use crate::constants::JpegQuality;
use crate::errors::PhotoError;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Encoded image data ready for saving
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Photo encoder
pub struct PhotoEncoder {
    quality: JpegQuality,
}

impl PhotoEncoder {
    pub fn new(quality: JpegQuality) -> Self {
        Self { quality }
    }

    pub fn quality(&self) -> JpegQuality {
        self.quality
    }

    /// Encode a frame as JPEG in a background task
    pub async fn encode(&self, frame: Arc<CameraFrame>) -> Result<EncodedImage, PhotoError> {
        info!(
            width = frame.width,
            height = frame.height,
            quality = self.quality.value(),
            "Starting encoding"
        );

        let quality = self.quality;
        tokio::task::spawn_blocking(move || {
            let data = encode_jpeg(&frame, quality)?;
            debug!(size = data.len(), "Encoding complete");
            Ok::<_, PhotoError>(EncodedImage {
                data,
                width: frame.width,
                height: frame.height,
            })
        })
        .await
        .map_err(|e| PhotoError::EncodingFailed(format!("encoding task error: {}", e)))?
    }

    /// Write encoded data to `path`, creating the directory if needed
    pub async fn save(&self, encoded: EncodedImage, path: PathBuf) -> Result<PathBuf, PhotoError> {
        info!(path = %path.display(), "Saving photo");

        let target = path.clone();
        tokio::task::spawn_blocking(move || {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&target, &encoded.data)?;
            Ok::<_, PhotoError>(())
        })
        .await
        .map_err(|e| PhotoError::SaveFailed(format!("save task error: {}", e)))??;

        info!(path = %path.display(), "Photo saved successfully");
        Ok(path)
    }
}

/// Encode an RGB24 frame as JPEG
pub fn encode_jpeg(frame: &CameraFrame, quality: JpegQuality) -> Result<Vec<u8>, PhotoError> {
    let image = frame.to_rgb_image().ok_or_else(|| {
        PhotoError::EncodingFailed(format!(
            "frame data does not match {}x{}",
            frame.width, frame.height
        ))
    })?;

    let mut buffer = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality.value())
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| PhotoError::EncodingFailed(format!("JPEG encoding failed: {}", e)))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_jpeg_decodes_back() {
        let frame = CameraFrame::new(4, 2, vec![128; 4 * 2 * 3], 0);
        let data = encode_jpeg(&frame, JpegQuality::High).unwrap();
        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 2));
    }

    #[test]
    fn test_higher_quality_is_larger() {
        let data: Vec<u8> = (0..32 * 32 * 3).map(|i| (i * 37 % 251) as u8).collect();
        let frame = CameraFrame::new(32, 32, data, 0);
        let low = encode_jpeg(&frame, PhotoEncoder::new(JpegQuality::Low).quality()).unwrap();
        let max = encode_jpeg(&frame, JpegQuality::Maximum).unwrap();
        assert!(max.len() > low.len());
    }

    #[test]
    fn test_mismatched_frame_is_rejected() {
        let frame = CameraFrame::new(4, 4, vec![0; 3], 0);
        assert!(matches!(
            encode_jpeg(&frame, JpegQuality::Low),
            Err(PhotoError::EncodingFailed(_))
        ));
    }
}
