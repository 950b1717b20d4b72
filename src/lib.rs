// SPDX-License-Identifier: MPL-2.0

//! Viewfinder - a camera viewfinder for the terminal
//!
//! A presenter reduces pinch, tap and fling gestures into a small immutable
//! view state (lens, zoom, crop, capture button color); a renderer diffs
//! successive states and updates the host surface.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: View state, presenter, gestures and the render contract
//! - [`backends`]: V4L2 and virtual cameras, live feeds
//! - [`pipelines`]: Photo encoding and the capture worker
//! - [`terminal`]: The ratatui host
//! - [`config`]: User configuration handling
//! - [`permissions`]: Startup access checks
//! - [`storage`]: Photo locations and file names

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod permissions;
pub mod pipelines;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::{ButtonStyle, Intent, LensFacing, Presenter, ViewState};
pub use config::Config;
pub use constants::JpegQuality;
