//! Platform-specific camera backends.

use crate::{CameraError, DeviceInfo};

/// Android backend over the UVCCamera helper library.
#[cfg(target_os = "android")]
pub mod android;

/// Desktop backend built on nokhwa.
#[cfg(all(
    feature = "desktop",
    any(target_os = "windows", target_os = "linux", target_os = "macos")
))]
pub mod desktop;

/// List the USB video devices the platform backend can see.
///
/// # Errors
/// Returns [`CameraError::NotSupported`] on platforms without a backend, or
/// the backend's enumeration error.
#[cfg(target_os = "android")]
pub fn list_devices() -> Result<Vec<DeviceInfo>, CameraError> {
    android::list_devices()
}

/// List the USB video devices the platform backend can see.
///
/// # Errors
/// Returns [`CameraError::NotSupported`] on platforms without a backend, or
/// the backend's enumeration error.
#[cfg(all(
    feature = "desktop",
    any(target_os = "windows", target_os = "linux", target_os = "macos")
))]
pub fn list_devices() -> Result<Vec<DeviceInfo>, CameraError> {
    desktop::list_devices()
}

// Fallback for platforms without a backend
/// List the USB video devices the platform backend can see.
///
/// # Errors
/// Returns [`CameraError::NotSupported`] on platforms without a backend, or
/// the backend's enumeration error.
#[cfg(not(any(
    target_os = "android",
    all(
        feature = "desktop",
        any(target_os = "windows", target_os = "linux", target_os = "macos")
    )
)))]
pub const fn list_devices() -> Result<Vec<DeviceInfo>, CameraError> {
    Err(CameraError::NotSupported)
}
