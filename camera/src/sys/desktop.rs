//! Desktop camera implementation using nokhwa.
//!
//! Desktop systems have no USB permission prompt and no monitor callbacks:
//! [`request_permission`](CameraHandle::request_permission) opens the camera
//! at the requested index directly, and the monitor registration calls are
//! no-ops.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info};
use nokhwa::Camera as NokhwaDevice;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType};

use crate::{
    CameraError, CameraHandle, DeviceId, DeviceInfo, RecordParams, Resolution, UvcCamera,
};

/// List cameras visible to nokhwa.
///
/// # Errors
/// Returns [`CameraError::Backend`] if the query fails.
pub fn list_devices() -> Result<Vec<DeviceInfo>, CameraError> {
    let devices =
        nokhwa::query(ApiBackend::Auto).map_err(|e| CameraError::Backend(e.to_string()))?;

    Ok(devices
        .into_iter()
        .enumerate()
        .map(|(position, d)| {
            let index = d
                .index()
                .as_index()
                .unwrap_or_else(|_| u32::try_from(position).unwrap_or(u32::MAX));
            DeviceInfo {
                index,
                id: DeviceId(index),
                name: Some(d.human_name()),
            }
        })
        .collect())
}

/// A local webcam driven through nokhwa.
pub struct NokhwaCamera {
    camera: Mutex<Option<NokhwaDevice>>,
    preview_size: Mutex<Resolution>,
}

impl NokhwaCamera {
    /// Create an unopened camera.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            camera: Mutex::new(None),
            preview_size: Mutex::new(Resolution::HD),
        }
    }

    fn device(&self) -> MutexGuard<'_, Option<NokhwaDevice>> {
        self.camera.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn preview_size(&self) -> Resolution {
        *self
            .preview_size
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for NokhwaCamera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NokhwaCamera")
            .field("opened", &self.is_opened())
            .field("preview_size", &self.preview_size())
            .finish()
    }
}

impl Default for NokhwaCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraHandle for NokhwaCamera {
    fn is_opened(&self) -> bool {
        self.device().is_some()
    }

    fn start_preview(&self) -> Result<(), CameraError> {
        let mut guard = self.device();
        let camera = guard.as_mut().ok_or(CameraError::NotOpened)?;
        camera
            .open_stream()
            .map_err(|e| CameraError::Backend(e.to_string()))
    }

    fn stop_preview(&self) -> Result<(), CameraError> {
        let mut guard = self.device();
        let camera = guard.as_mut().ok_or(CameraError::NotOpened)?;
        camera
            .stop_stream()
            .map_err(|e| CameraError::Backend(e.to_string()))
    }

    fn request_permission(&self, index: u32) -> Result<(), CameraError> {
        let mut guard = self.device();
        if guard.is_some() {
            debug!("camera already open, ignoring request for index {index}");
            return Ok(());
        }

        let size = self.preview_size();
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::HighestResolution(
            nokhwa::utils::Resolution::new(size.width, size.height),
        ));
        let camera = NokhwaDevice::new(CameraIndex::Index(index), requested)
            .map_err(|e| CameraError::Backend(e.to_string()))?;
        let opened = camera.resolution();
        info!(
            "opened camera {index} at {}x{}",
            opened.width(),
            opened.height()
        );
        *guard = Some(camera);
        Ok(())
    }

    fn close_camera(&self) -> Result<(), CameraError> {
        if let Some(mut camera) = self.device().take() {
            if camera.is_stream_open() {
                camera
                    .stop_stream()
                    .map_err(|e| CameraError::Backend(e.to_string()))?;
            }
        }
        Ok(())
    }
}

impl UvcCamera for NokhwaCamera {
    fn prepare(&self, preview_size: Resolution) -> Result<(), CameraError> {
        *self
            .preview_size
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = preview_size;
        Ok(())
    }

    fn register_usb(&self) -> Result<(), CameraError> {
        debug!("no usb monitor on desktop");
        Ok(())
    }

    fn unregister_usb(&self) -> Result<(), CameraError> {
        Ok(())
    }

    fn capture_picture(&self, _path: &Path) -> Result<(), CameraError> {
        Err(CameraError::NotSupported)
    }

    fn start_recording(&self, _params: &RecordParams) -> Result<(), CameraError> {
        Err(CameraError::NotSupported)
    }

    fn stop_recording(&self) -> Result<(), CameraError> {
        Err(CameraError::NotSupported)
    }
}
