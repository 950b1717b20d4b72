// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! The presenter only ever asks two questions of the camera subsystem, and
//! [`CapabilityProvider`] carries exactly those two. Hosts that also need to
//! list devices and stream frames use the wider [`CameraBackend`] trait.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │ Presenter (reducer) │  ← resolution_for / has_lens
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CapabilityProvider  │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CameraBackend Trait │  ← enumeration + live feed for the host
//! └──────────┬──────────┘
//!            │
//!       ┌────┴─────┐
//!       ▼          ▼
//!   ┌──────┐  ┌─────────┐
//!   │ V4L2 │  │ Virtual │
//!   └──────┘  └─────────┘
//! ```

pub mod format_converters;
pub mod frame_loop;
pub mod types;
pub mod v4l2;

pub use frame_loop::{FeedLoop, FeedStep};
pub use types::*;
pub use v4l2::V4l2Backend;

use crate::app::state::{LensFacing, Size};
use std::collections::HashMap;
use tracing::debug;

/// Capability queries consulted by the presenter
pub trait CapabilityProvider {
    /// Sensor pixel array size of the lens, `None` if absent or the query failed
    fn resolution_for(&self, lens: LensFacing) -> Option<Size>;

    /// Whether a camera with this facing exists
    fn has_lens(&self, lens: LensFacing) -> bool;
}

impl<P: CapabilityProvider + ?Sized> CapabilityProvider for std::sync::Arc<P> {
    fn resolution_for(&self, lens: LensFacing) -> Option<Size> {
        (**self).resolution_for(lens)
    }

    fn has_lens(&self, lens: LensFacing) -> bool {
        (**self).has_lens(lens)
    }
}

/// A lens as seen by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LensInfo {
    pub facing: LensFacing,
    pub device: CameraDevice,
    pub resolution: Option<Size>,
}

/// Complete camera backend used by the terminal host and the CLI
pub trait CameraBackend: CapabilityProvider + Send + Sync {
    /// Short name for logs and the status bar
    fn name(&self) -> &'static str;

    /// Lenses currently present, back first
    fn lenses(&self) -> Vec<LensInfo>;

    /// Start streaming decoded frames of `lens` into `sender`
    ///
    /// Opening and configuring the device happens before this returns, so a
    /// missing or busy camera is reported here rather than on the feed thread.
    fn start_feed(&self, lens: LensFacing, sender: FrameSender) -> BackendResult<FeedLoop>;
}

/// Explicit device paths per facing, usually from the config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LensOverrides {
    pub front: Option<String>,
    pub back: Option<String>,
}

/// Card name fragments that identify a user-facing camera
const FRONT_HINTS: [&str; 4] = ["front", "user", "integrated", "facetime"];

/// Card name fragments that identify a world-facing camera
const BACK_HINTS: [&str; 3] = ["back", "rear", "world"];

/// Assignment of capture devices to lens facings
///
/// V4L2 does not report which way a camera points, so facing is derived:
/// 1. configured device paths win;
/// 2. card names containing a facing hint are assigned to that facing;
/// 3. remaining devices fill Back first, then Front, in enumeration order.
///
/// Each facing maps to at most one device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LensCatalog {
    lenses: HashMap<LensFacing, CameraDevice>,
}

impl LensCatalog {
    pub fn assign(devices: &[CameraDevice], overrides: &LensOverrides) -> Self {
        let mut lenses: HashMap<LensFacing, CameraDevice> = HashMap::new();
        let mut taken: Vec<&str> = Vec::new();

        let configured = [
            (LensFacing::Back, overrides.back.as_deref()),
            (LensFacing::Front, overrides.front.as_deref()),
        ];
        for (facing, path) in configured {
            let Some(path) = path else { continue };
            if let Some(device) = devices
                .iter()
                .find(|d| d.path == path && !taken.contains(&d.path.as_str()))
            {
                debug!(lens = %facing, path, "Lens assigned from config");
                lenses.insert(facing, device.clone());
                taken.push(&device.path);
            }
        }

        for device in devices {
            if taken.contains(&device.path.as_str()) {
                continue;
            }
            let Some(facing) = facing_hint(&device.name) else {
                continue;
            };
            if lenses.contains_key(&facing) {
                continue;
            }
            debug!(lens = %facing, name = %device.name, "Lens assigned from card name");
            lenses.insert(facing, device.clone());
            taken.push(&device.path);
        }

        for device in devices {
            if taken.contains(&device.path.as_str()) {
                continue;
            }
            let Some(facing) = LensFacing::ALL
                .into_iter()
                .find(|facing| !lenses.contains_key(facing))
            else {
                break;
            };
            debug!(lens = %facing, name = %device.name, "Lens assigned by order");
            lenses.insert(facing, device.clone());
            taken.push(&device.path);
        }

        Self { lenses }
    }

    pub fn device(&self, lens: LensFacing) -> Option<&CameraDevice> {
        self.lenses.get(&lens)
    }

    pub fn is_empty(&self) -> bool {
        self.lenses.is_empty()
    }

    /// Assigned lenses, back first
    pub fn iter(&self) -> impl Iterator<Item = (LensFacing, &CameraDevice)> {
        LensFacing::ALL
            .into_iter()
            .filter_map(|facing| self.lenses.get(&facing).map(|device| (facing, device)))
    }
}

fn facing_hint(card: &str) -> Option<LensFacing> {
    let card = card.to_ascii_lowercase();
    if FRONT_HINTS.iter().any(|hint| card.contains(hint)) {
        Some(LensFacing::Front)
    } else if BACK_HINTS.iter().any(|hint| card.contains(hint)) {
        Some(LensFacing::Back)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(name: &str, path: &str) -> CameraDevice {
        CameraDevice {
            name: name.to_string(),
            path: path.to_string(),
            driver: "uvcvideo".to_string(),
            bus: format!("usb-{}", path),
        }
    }

    #[test]
    fn test_single_camera_is_back() {
        let devices = [device("HD Webcam", "/dev/video0")];
        let catalog = LensCatalog::assign(&devices, &LensOverrides::default());
        assert_eq!(catalog.device(LensFacing::Back), Some(&devices[0]));
        assert_eq!(catalog.device(LensFacing::Front), None);
    }

    #[test]
    fn test_order_fills_back_then_front() {
        let devices = [
            device("USB Camera A", "/dev/video0"),
            device("USB Camera B", "/dev/video2"),
            device("USB Camera C", "/dev/video4"),
        ];
        let catalog = LensCatalog::assign(&devices, &LensOverrides::default());
        assert_eq!(catalog.device(LensFacing::Back), Some(&devices[0]));
        assert_eq!(catalog.device(LensFacing::Front), Some(&devices[1]));
    }

    #[test]
    fn test_card_name_hints() {
        let devices = [
            device("Integrated Camera", "/dev/video0"),
            device("Logitech C920", "/dev/video2"),
        ];
        let catalog = LensCatalog::assign(&devices, &LensOverrides::default());
        assert_eq!(catalog.device(LensFacing::Front), Some(&devices[0]));
        assert_eq!(catalog.device(LensFacing::Back), Some(&devices[1]));
    }

    #[test]
    fn test_overrides_win_over_hints() {
        let devices = [
            device("Integrated Camera", "/dev/video0"),
            device("Rear sensor", "/dev/video2"),
        ];
        let overrides = LensOverrides {
            front: Some("/dev/video2".to_string()),
            back: Some("/dev/video0".to_string()),
        };
        let catalog = LensCatalog::assign(&devices, &overrides);
        assert_eq!(catalog.device(LensFacing::Back), Some(&devices[0]));
        assert_eq!(catalog.device(LensFacing::Front), Some(&devices[1]));
    }

    #[test]
    fn test_unknown_override_falls_back() {
        let devices = [device("Webcam", "/dev/video0")];
        let overrides = LensOverrides {
            front: Some("/dev/video9".to_string()),
            back: None,
        };
        let catalog = LensCatalog::assign(&devices, &overrides);
        assert_eq!(catalog.device(LensFacing::Back), Some(&devices[0]));
        assert_eq!(catalog.device(LensFacing::Front), None);
    }

    #[test]
    fn test_iter_lists_back_first() {
        let devices = [
            device("Front camera", "/dev/video0"),
            device("Back camera", "/dev/video1"),
        ];
        let catalog = LensCatalog::assign(&devices, &LensOverrides::default());
        let facings: Vec<LensFacing> = catalog.iter().map(|(facing, _)| facing).collect();
        assert_eq!(facings, vec![LensFacing::Back, LensFacing::Front]);
    }
}
