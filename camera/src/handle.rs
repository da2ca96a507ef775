//! Capabilities exposed by the UVC helper library.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{CameraError, Resolution};

/// The part of the camera library the lifecycle coordinator drives.
///
/// Implementations are expected to be thin forwarding layers: opening the
/// camera after a permission grant, rendering into the surface and decoding
/// frames all happen inside the library.
pub trait CameraHandle {
    /// Whether the library currently holds an opened camera.
    fn is_opened(&self) -> bool;

    /// Start rendering the preview into the bound surface.
    ///
    /// # Errors
    /// Returns an error if the library rejects the call.
    fn start_preview(&self) -> Result<(), CameraError>;

    /// Stop rendering the preview.
    ///
    /// # Errors
    /// Returns an error if the library rejects the call.
    fn stop_preview(&self) -> Result<(), CameraError>;

    /// Ask the OS for access to the device at `index` in the monitor's list.
    ///
    /// The library opens the camera asynchronously once access is granted.
    ///
    /// # Errors
    /// Returns an error if the request cannot be issued.
    fn request_permission(&self, index: u32) -> Result<(), CameraError>;

    /// Close the camera, releasing the device.
    ///
    /// # Errors
    /// Returns an error if the library rejects the call.
    fn close_camera(&self) -> Result<(), CameraError>;
}

/// The full helper-library surface used by a camera session.
pub trait UvcCamera: CameraHandle {
    /// Set the preview size the library negotiates when it opens a camera
    /// and create the camera handler. Called once, before the USB monitor
    /// is registered.
    ///
    /// # Errors
    /// Returns an error if the library rejects the size.
    fn prepare(&self, preview_size: Resolution) -> Result<(), CameraError>;

    /// Start watching for USB attach/detach.
    ///
    /// # Errors
    /// Returns an error if the monitor cannot be registered.
    fn register_usb(&self) -> Result<(), CameraError>;

    /// Stop watching for USB attach/detach.
    ///
    /// # Errors
    /// Returns an error if the monitor cannot be unregistered.
    fn unregister_usb(&self) -> Result<(), CameraError>;

    /// Save the current frame as a JPEG at `path`.
    ///
    /// # Errors
    /// Returns an error if the capture cannot be issued.
    fn capture_picture(&self, path: &Path) -> Result<(), CameraError>;

    /// Start encoding the stream to a file.
    ///
    /// # Errors
    /// Returns an error if the recorder cannot be started.
    fn start_recording(&self, params: &RecordParams) -> Result<(), CameraError>;

    /// Stop the running recording.
    ///
    /// # Errors
    /// Returns an error if the recorder cannot be stopped.
    fn stop_recording(&self) -> Result<(), CameraError>;
}

/// Recording parameters handed to the library's encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordParams {
    /// Output file (MP4).
    pub path: PathBuf,
    /// Split the output every `duration_secs` seconds; `0` never splits.
    pub duration_secs: u32,
    /// Record without audio.
    pub voice_closed: bool,
    /// Burn the timestamp overlay into the video.
    pub overlay: bool,
}

impl RecordParams {
    /// Parameters for a silent, unsplit recording with overlay.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            duration_secs: 0,
            voice_closed: true,
            overlay: true,
        }
    }

    /// Set the split duration in seconds.
    #[must_use]
    pub fn with_duration(mut self, duration_secs: u32) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    /// Record audio alongside the video.
    #[must_use]
    pub fn with_voice(mut self, enabled: bool) -> Self {
        self.voice_closed = !enabled;
        self
    }

    /// Enable or disable the overlay.
    #[must_use]
    pub fn with_overlay(mut self, overlay: bool) -> Self {
        self.overlay = overlay;
        self
    }
}

macro_rules! forward_camera_handle {
    ($($ty:ty),*) => {$(
        impl<T: CameraHandle + ?Sized> CameraHandle for $ty {
            fn is_opened(&self) -> bool {
                (**self).is_opened()
            }

            fn start_preview(&self) -> Result<(), CameraError> {
                (**self).start_preview()
            }

            fn stop_preview(&self) -> Result<(), CameraError> {
                (**self).stop_preview()
            }

            fn request_permission(&self, index: u32) -> Result<(), CameraError> {
                (**self).request_permission(index)
            }

            fn close_camera(&self) -> Result<(), CameraError> {
                (**self).close_camera()
            }
        }
    )*};
}

macro_rules! forward_uvc_camera {
    ($($ty:ty),*) => {$(
        impl<T: UvcCamera + ?Sized> UvcCamera for $ty {
            fn prepare(&self, preview_size: Resolution) -> Result<(), CameraError> {
                (**self).prepare(preview_size)
            }

            fn register_usb(&self) -> Result<(), CameraError> {
                (**self).register_usb()
            }

            fn unregister_usb(&self) -> Result<(), CameraError> {
                (**self).unregister_usb()
            }

            fn capture_picture(&self, path: &Path) -> Result<(), CameraError> {
                (**self).capture_picture(path)
            }

            fn start_recording(&self, params: &RecordParams) -> Result<(), CameraError> {
                (**self).start_recording(params)
            }

            fn stop_recording(&self) -> Result<(), CameraError> {
                (**self).stop_recording()
            }
        }
    )*};
}

forward_camera_handle!(&T, Box<T>, Arc<T>);
forward_uvc_camera!(&T, Box<T>, Arc<T>);
