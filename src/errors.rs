// SPDX-License-Identifier: MPL-2.0

//! Error types for the viewfinder
//!
//! Each layer has its own enum. [`AppError`] wraps them for the places that
//! can fail for more than one reason (startup, config, the capture worker).

use crate::app::state::LensFacing;
use std::fmt;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone)]
pub enum AppError {
    Camera(CameraError),
    Photo(PhotoError),
    Permission(PermissionError),
    /// Config file unreadable, malformed or unwritable
    Config(String),
    /// Thread or async runtime could not be started
    Runtime(String),
}

/// Failures talking to a camera device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// No camera with the requested facing
    LensUnavailable(LensFacing),
    /// Opening or configuring the device failed
    InitializationFailed(String),
    /// Device offers no pixel format we can decode
    InvalidFormat(String),
    /// Another process holds the device
    Busy,
    /// Anything else reported by the V4L2 layer
    BackendError(String),
}

/// Failures between pressing the shutter and the file landing on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    /// Nothing has arrived from the feed yet
    NoFrameAvailable,
    /// The capture worker is gone
    WorkerUnavailable,
    EncodingFailed(String),
    SaveFailed(String),
}

/// Startup permission failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// Camera device nodes are not readable and writable
    CameraDenied(String),
    /// Photos cannot be written to the picture directory
    StorageDenied(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => e.fmt(f),
            AppError::Photo(e) => e.fmt(f),
            AppError::Permission(e) => e.fmt(f),
            AppError::Config(msg) => write!(f, "Bad configuration: {}", msg),
            AppError::Runtime(msg) => write!(f, "Runtime failure: {}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::LensUnavailable(lens) => write!(f, "No {} camera available", lens),
            CameraError::InitializationFailed(msg) => write!(f, "Could not open camera: {}", msg),
            CameraError::InvalidFormat(msg) => write!(f, "Unsupported pixel format: {}", msg),
            CameraError::Busy => f.write_str("Camera is in use by another application"),
            CameraError::BackendError(msg) => write!(f, "V4L2: {}", msg),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::NoFrameAvailable => f.write_str("no frame received yet"),
            PhotoError::WorkerUnavailable => f.write_str("capture worker is not running"),
            PhotoError::EncodingFailed(msg) => write!(f, "JPEG encoding: {}", msg),
            PhotoError::SaveFailed(msg) => write!(f, "writing photo: {}", msg),
        }
    }
}

impl fmt::Display for PermissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionError::CameraDenied(msg) => write!(f, "Camera access denied: {}", msg),
            PermissionError::StorageDenied(msg) => write!(f, "Storage access denied: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for PhotoError {}
impl std::error::Error for PermissionError {}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        AppError::Photo(err)
    }
}

impl From<PermissionError> for AppError {
    fn from(err: PermissionError) -> Self {
        AppError::Permission(err)
    }
}

impl From<std::io::Error> for PhotoError {
    fn from(err: std::io::Error) -> Self {
        PhotoError::SaveFailed(err.to_string())
    }
}

impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        match err.raw_os_error() {
            Some(libc::EBUSY) => CameraError::Busy,
            _ => CameraError::BackendError(err.to_string()),
        }
    }
}
