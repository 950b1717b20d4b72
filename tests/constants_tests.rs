// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use viewfinder::constants::{JpegQuality, MAX_ZOOM, MIN_ZOOM, DEFAULT_PINCH_STEP};

#[test]
fn test_jpeg_quality_values() {
    // Test that all presets exist (Low, Medium, High, Maximum)
    assert_eq!(JpegQuality::ALL.len(), 4);
}

#[test]
fn test_jpeg_quality_ordering() {
    // Test that presets are ordered from lowest to highest quality
    let mut prev = 0u8;
    for preset in JpegQuality::ALL {
        let value = preset.value();
        assert!(
            value > prev,
            "Presets should be ordered from lowest to highest"
        );
        assert!(value <= 100);
        prev = value;
    }
}

#[test]
fn test_jpeg_quality_display_names() {
    for preset in JpegQuality::ALL {
        let name = preset.display_name();
        assert!(
            !name.is_empty(),
            "Preset {:?} has empty display name",
            preset
        );
    }
}

#[test]
fn test_zoom_range() {
    assert_eq!(MIN_ZOOM, 1.0);
    assert_eq!(MAX_ZOOM, 2.0);
    assert!(DEFAULT_PINCH_STEP > 1.0 && DEFAULT_PINCH_STEP < MAX_ZOOM);
}
