// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use std::path::PathBuf;
use viewfinder::app::state::Size;
use viewfinder::{ButtonStyle, Config, JpegQuality, LensFacing};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("viewfinder-config-{}-{}", name, std::process::id()))
        .join("config.json")
}

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.initial_lens, LensFacing::Back);
    assert_eq!(config.initial_button_style, ButtonStyle::White);
    assert_eq!(config.jpeg_quality, JpegQuality::Maximum);
    assert_eq!(config.virtual_back_size, Some(Size::new(1920, 1080)));
    assert_eq!(config.virtual_front_size, Some(Size::new(1280, 720)));
    assert!(config.photo_directory.is_none());
}

#[test]
fn test_config_round_trip() {
    let path = temp_path("round-trip");
    let config = Config {
        initial_lens: LensFacing::Front,
        initial_button_style: ButtonStyle::Green,
        back_device: Some("/dev/video2".to_string()),
        jpeg_quality: JpegQuality::Low,
        virtual_front_size: None,
        ..Config::default()
    };

    config.save_to(&path).unwrap();
    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn test_missing_file_gives_defaults() {
    let path = temp_path("missing");
    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_partial_file_fills_defaults() {
    let path = temp_path("partial");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, r#"{ "initial_lens": "Front", "pinch_step": 1.5 }"#).unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.initial_lens, LensFacing::Front);
    assert_eq!(config.pinch_step(), 1.5);
    assert_eq!(config.jpeg_quality, JpegQuality::Maximum);

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn test_malformed_file_is_an_error() {
    let path = temp_path("malformed");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    assert!(Config::load_from(&path).is_err());

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn test_useless_pinch_step_falls_back() {
    let config = Config {
        pinch_step: 0.5,
        ..Config::default()
    };
    assert_eq!(config.pinch_step(), viewfinder::constants::DEFAULT_PINCH_STEP);
}
