// SPDX-License-Identifier: GPL-3.0-only

//! Startup permission gate
//!
//! Checked once before the viewfinder initializes: the camera device nodes
//! must be readable and writable, and the photo directory (or the closest
//! existing parent, since it is created on first save) must be writable.

use crate::errors::PermissionError;
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Message shown when the gate refuses to open the viewfinder
pub const PERMISSION_DENIED_MESSAGE: &str = "Permissions not granted by the user.";

/// Check camera and storage access
pub fn check(device_nodes: &[PathBuf], photo_dir: &Path) -> Result<(), PermissionError> {
    check_camera_access(device_nodes)?;
    check_storage_access(photo_dir)
}

/// At least one device node must be usable
///
/// No nodes at all is not a permission problem: the viewfinder then simply
/// has no lenses.
pub fn check_camera_access(device_nodes: &[PathBuf]) -> Result<(), PermissionError> {
    if device_nodes.is_empty() {
        debug!("No video device nodes, skipping camera permission check");
        return Ok(());
    }

    if device_nodes
        .iter()
        .any(|node| accessible(node, libc::R_OK | libc::W_OK))
    {
        return Ok(());
    }

    let nodes = device_nodes
        .iter()
        .map(|node| node.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    warn!(nodes = %nodes, "No accessible video device");
    Err(PermissionError::CameraDenied(format!(
        "cannot open {} (is the user in the video group?)",
        nodes
    )))
}

pub fn check_storage_access(photo_dir: &Path) -> Result<(), PermissionError> {
    let existing = photo_dir
        .ancestors()
        .find(|dir| dir.exists())
        .unwrap_or(Path::new("."));

    if existing.is_dir() && accessible(existing, libc::W_OK | libc::X_OK) {
        return Ok(());
    }

    warn!(dir = %photo_dir.display(), checked = %existing.display(), "Photo directory not writable");
    Err(PermissionError::StorageDenied(format!(
        "cannot write to {}",
        photo_dir.display()
    )))
}

/// `access(2)` check with the real user id
fn accessible(path: &Path, mode: libc::c_int) -> bool {
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string for the duration of the call
    unsafe { libc::access(c_path.as_ptr(), mode) == 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_devices_is_not_denied() {
        assert_eq!(check_camera_access(&[]), Ok(()));
    }

    #[test]
    fn test_missing_device_is_denied() {
        let nodes = vec![PathBuf::from("/nonexistent/video0")];
        assert!(matches!(
            check_camera_access(&nodes),
            Err(PermissionError::CameraDenied(_))
        ));
    }

    #[test]
    fn test_temp_dir_is_writable() {
        assert_eq!(check_storage_access(&std::env::temp_dir()), Ok(()));
    }

    #[test]
    fn test_missing_dir_checks_parent() {
        let dir = std::env::temp_dir().join("viewfinder-not-created").join("photos");
        assert_eq!(check_storage_access(&dir), Ok(()));
    }

    #[test]
    fn test_file_is_not_a_photo_dir() {
        let file = std::env::temp_dir().join(format!("viewfinder-perm-{}", std::process::id()));
        std::fs::write(&file, b"x").unwrap();
        assert!(check_storage_access(&file).is_err());
        std::fs::remove_file(&file).unwrap();
    }
}
