//! USB (UVC) camera lifecycle coordination.
//!
//! A UVC helper library does the heavy lifting (device enumeration, USB
//! permission negotiation, frame decoding, rendering into a surface). What it
//! leaves to the host application is sequencing: a preview may only start once
//! the surface exists *and* the camera is open, the permission prompt must not
//! be raised twice for one plug-in, and the camera must be closed when the
//! device goes away.
//!
//! This crate owns that sequencing:
//!
//! - [`CameraHandle`] / [`UvcCamera`]: the narrow capability the helper
//!   library exposes.
//! - [`DeviceLifecycleCoordinator`]: reacts to surface and USB device events
//!   and issues at most one start/stop and at most one request/close.
//! - [`SharedCoordinator`]: the same coordinator behind a mutex, for hosts
//!   that deliver surface and USB callbacks on different threads.
//! - [`UsbCameraSession`]: start/end/capture/record on top of the coordinator.
//!
//! # Usage
//!
//! ```ignore
//! use uvckit_camera::{CoordinatorConfig, DeviceId, DeviceLifecycleCoordinator};
//!
//! let mut coordinator = DeviceLifecycleCoordinator::new(&camera, CoordinatorConfig::default());
//! coordinator.on_device_attached(DeviceId(1002));
//! // ... the helper library opens the camera ...
//! coordinator.on_surface_created();
//! assert!(coordinator.state().preview_active());
//! ```

#![warn(missing_docs)]

mod coordinator;
mod event;
mod handle;
mod queue;
mod session;
mod shared;
mod state;

pub mod sys;

use std::fmt;

pub use coordinator::{CoordinatorConfig, DeviceLifecycleCoordinator};
pub use event::{DeviceEvent, LifecycleEvent, SurfaceEvent};
pub use handle::{CameraHandle, RecordParams, UvcCamera};
pub use queue::{EventReceiver, EventSender, event_queue};
pub use session::{CaptureLayout, SessionConfig, SessionSlot, UsbCameraSession};
pub use shared::SharedCoordinator;
pub use state::{CoordinatorState, PermissionState, SurfaceState};

/// Errors that can occur with camera operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    /// The operation is not supported by this backend or platform.
    #[error("not supported on this platform")]
    NotSupported,
    /// The backend has not been initialized.
    #[error("camera backend not initialized")]
    NotInitialized,
    /// The operation requires an opened camera.
    #[error("camera is not opened")]
    NotOpened,
    /// The user or the OS refused access to the device.
    #[error("camera permission denied")]
    PermissionDenied,
    /// A recording is already running.
    #[error("recording already in progress")]
    AlreadyRecording,
    /// No recording is running.
    #[error("no recording in progress")]
    NotRecording,
    /// The requested device index does not exist or cannot be represented.
    #[error("invalid device index: {0}")]
    InvalidDeviceIndex(u32),
    /// The underlying camera library reported an error.
    #[error("camera backend error: {0}")]
    Backend(String),
    /// An unknown error occurred.
    #[error("unknown error: {0}")]
    Unknown(String),
}

/// Camera resolution configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Standard 720p resolution.
    pub const HD: Self = Self {
        width: 1280,
        height: 720,
    };

    /// Standard 1080p resolution.
    pub const FULL_HD: Self = Self {
        width: 1920,
        height: 1080,
    };

    /// Create a resolution from width and height.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::HD
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Identifier the USB monitor assigns to an attached device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub u32);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "usb#{}", self.0)
    }
}

/// A USB video device as enumerated by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Position in the backend's device list, as passed to
    /// [`CameraHandle::request_permission`].
    pub index: u32,
    /// Identifier of the device.
    pub id: DeviceId,
    /// Human-readable product name, if the device reports one.
    pub name: Option<String>,
}

/// Which enumerated device a permission request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceSelector {
    /// The first device the USB monitor enumerated.
    #[default]
    First,
    /// A specific position in the monitor's device list.
    Index(u32),
}

impl DeviceSelector {
    /// The device-list index to hand to [`CameraHandle::request_permission`].
    #[must_use]
    pub const fn index(self) -> u32 {
        match self {
            Self::First => 0,
            Self::Index(index) => index,
        }
    }
}
