// SPDX-License-Identifier: MPL-2.0

//! Camera backends
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            Presenter / Terminal              │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                   │
//! │  ┌─────────────────┐  ┌──────────────────┐  │
//! │  │     Camera      │  │ Virtual Camera   │  │
//! │  │     (V4L2)      │  │ (test patterns)  │  │
//! │  └─────────────────┘  └──────────────────┘  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`camera`]: backend traits, lens catalog, V4L2 devices and live feeds
//! - [`virtual_camera`]: synthetic lenses for machines without a camera

pub mod camera;
pub mod virtual_camera;

use crate::config::Config;
use camera::{CameraBackend, LensOverrides, V4l2Backend};
use std::sync::Arc;
use virtual_camera::VirtualBackend;

/// Build the backend selected on the command line
pub fn create_backend(config: &Config, use_virtual: bool) -> Arc<dyn CameraBackend> {
    if use_virtual {
        Arc::new(VirtualBackend::new(
            config.virtual_back_size,
            config.virtual_front_size,
            config.feed_size,
        ))
    } else {
        Arc::new(V4l2Backend::new(
            LensOverrides {
                front: config.front_device.clone(),
                back: config.back_device.clone(),
            },
            config.feed_size,
        ))
    }
}
