// SPDX-License-Identifier: MPL-2.0

//! Storage utilities for photo files

use crate::constants::PHOTO_EXTENSION;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory photos are saved to
///
/// A configured directory wins; otherwise the user's picture directory,
/// then the home directory, then the working directory.
pub fn photo_directory(configured: Option<&Path>) -> PathBuf {
    if let Some(dir) = configured {
        return dir.to_path_buf();
    }
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// File name for a photo taken at `millis` since the Unix epoch
pub fn photo_file_name(millis: i64) -> String {
    format!("{}.{}", millis, PHOTO_EXTENSION)
}

/// Full path of a new photo taken now
pub fn new_photo_path(directory: &Path) -> PathBuf {
    let millis = chrono::Utc::now().timestamp_millis();
    let path = directory.join(photo_file_name(millis));
    debug!(path = %path.display(), "New photo path");
    path
}
