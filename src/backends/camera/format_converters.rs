// SPDX-License-Identifier: GPL-3.0-only
//! Pixel format conversion for the live feed
//!
//! Every device buffer is converted to tightly packed RGB24 before it leaves
//! the capture thread, so the UI and the photo pipeline only deal with one
//! layout.

use super::types::{BackendResult, PixelFormat};
use crate::errors::CameraError;

/// Decode one device buffer to RGB24
///
/// `stride` is the device's bytes-per-line for uncompressed formats; pass 0
/// to assume tightly packed rows. Returns the RGB data together with the
/// actual dimensions (MJPG buffers carry their own).
pub fn decode_to_rgb(
    format: PixelFormat,
    data: &[u8],
    width: u32,
    height: u32,
    stride: u32,
) -> BackendResult<(Vec<u8>, u32, u32)> {
    let Some(min_stride) = format.min_stride(width) else {
        return decode_jpeg(data);
    };
    let stride = (stride as usize).max(min_stride);
    let needed = stride * height.saturating_sub(1) as usize + min_stride;
    if data.len() < needed {
        return Err(CameraError::InvalidFormat(format!(
            "{} buffer too small: {} bytes, expected {}",
            format,
            data.len(),
            needed
        )));
    }

    let rgb = match format {
        PixelFormat::Yuyv => yuyv_to_rgb(data, width, height, stride),
        PixelFormat::Rgb24 => repack_rows(data, width as usize * 3, height, stride),
        PixelFormat::Gray8 => gray_to_rgb(data, width, height, stride),
        PixelFormat::Mjpg => return decode_jpeg(data),
    };
    Ok((rgb, width, height))
}

fn decode_jpeg(data: &[u8]) -> BackendResult<(Vec<u8>, u32, u32)> {
    let img = image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)
        .map_err(|e| CameraError::InvalidFormat(format!("MJPG decode failed: {}", e)))?
        .to_rgb8();
    let (w, h) = img.dimensions();
    Ok((img.into_raw(), w, h))
}

/// Convert YUYV (YUV 4:2:2) to RGB
///
/// YUYV format: Y0 U Y1 V - each 4-byte group encodes 2 pixels.
pub fn yuyv_to_rgb(data: &[u8], width: u32, height: u32, stride: usize) -> Vec<u8> {
    let w = width as usize;
    let mut rgb = Vec::with_capacity(w * height as usize * 3);

    for row in 0..height as usize {
        let line = &data[row * stride..row * stride + w * 2];
        for chunk in line.chunks_exact(4) {
            let (y0, u, y1, v) = (chunk[0], chunk[1], chunk[2], chunk[3]);
            for luma in [y0, y1] {
                let (r, g, b) = yuv_to_rgb(luma, u, v);
                rgb.extend_from_slice(&[r, g, b]);
            }
        }
        if w % 2 == 1 {
            // Trailing pixel whose chroma pair was cut off by the row end
            let luma = line[line.len() - 2];
            rgb.extend_from_slice(&[luma, luma, luma]);
        }
    }

    rgb
}

fn gray_to_rgb(data: &[u8], width: u32, height: u32, stride: usize) -> Vec<u8> {
    let w = width as usize;
    let mut rgb = Vec::with_capacity(w * height as usize * 3);
    for row in 0..height as usize {
        for &v in &data[row * stride..row * stride + w] {
            rgb.extend_from_slice(&[v, v, v]);
        }
    }
    rgb
}

fn repack_rows(data: &[u8], row_bytes: usize, height: u32, stride: usize) -> Vec<u8> {
    if stride == row_bytes {
        return data[..row_bytes * height as usize].to_vec();
    }
    let mut out = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        out.extend_from_slice(&data[row * stride..row * stride + row_bytes]);
    }
    out
}

/// Convert YUV (BT.601) to RGB
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as f32;
    let u = u as f32 - 128.0;
    let v = v as f32 - 128.0;

    let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
    let g = (y - 0.344136 * u - 0.714136 * v).clamp(0.0, 255.0) as u8;
    let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;

    (r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuv_neutral_chroma_is_gray() {
        assert_eq!(yuv_to_rgb(0, 128, 128), (0, 0, 0));
        assert_eq!(yuv_to_rgb(255, 128, 128), (255, 255, 255));
        assert_eq!(yuv_to_rgb(100, 128, 128), (100, 100, 100));
    }

    #[test]
    fn test_yuyv_two_pixels() {
        // Two gray pixels sharing neutral chroma
        let data = [50u8, 128, 200, 128];
        let (rgb, w, h) = decode_to_rgb(PixelFormat::Yuyv, &data, 2, 1, 0).unwrap();
        assert_eq!((w, h), (2, 1));
        assert_eq!(rgb, vec![50, 50, 50, 200, 200, 200]);
    }

    #[test]
    fn test_yuyv_respects_stride() {
        // 2x2 image with 2 bytes of row padding
        let data = [
            10u8, 128, 20, 128, 0, 0, //
            30, 128, 40, 128, 0, 0,
        ];
        let (rgb, _, _) = decode_to_rgb(PixelFormat::Yuyv, &data, 2, 2, 6).unwrap();
        assert_eq!(rgb, vec![10, 10, 10, 20, 20, 20, 30, 30, 30, 40, 40, 40]);
    }

    #[test]
    fn test_gray_expands_to_rgb() {
        let data = [0u8, 127, 255];
        let (rgb, _, _) = decode_to_rgb(PixelFormat::Gray8, &data, 3, 1, 3).unwrap();
        assert_eq!(rgb, vec![0, 0, 0, 127, 127, 127, 255, 255, 255]);
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let data = [0u8; 5];
        let result = decode_to_rgb(PixelFormat::Rgb24, &data, 2, 1, 0);
        assert!(matches!(result, Err(CameraError::InvalidFormat(_))));
    }

    #[test]
    fn test_mjpg_round_trips_dimensions() {
        let img = image::RgbImage::from_pixel(8, 4, image::Rgb([200, 10, 10]));
        let mut jpeg = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, 90)
            .encode(img.as_raw(), 8, 4, image::ExtendedColorType::Rgb8)
            .unwrap();

        let (rgb, w, h) = decode_to_rgb(PixelFormat::Mjpg, &jpeg, 0, 0, 0).unwrap();
        assert_eq!((w, h), (8, 4));
        assert_eq!(rgb.len(), 8 * 4 * 3);
    }
}
