// SPDX-License-Identifier: MPL-2.0

//! Processing pipelines
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ Camera Frame │ ──▶ │  Photo Pipeline   │ ──▶ │  JPEG File   │
//! │   (RGB24)    │     │  - Encoding       │     │ <millis>.jpg │
//! │              │     │  - Disk I/O       │     │              │
//! └──────────────┘     └───────────────────┘     └──────────────┘
//! ```
//!
//! The preview never waits on a capture: heavy work runs on the capture
//! worker thread.

pub mod photo;
