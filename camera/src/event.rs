//! Notifications consumed by the coordinator.

use crate::DeviceId;

/// Lifecycle of the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The surface is ready to be drawn into.
    Created,
    /// The surface was resized.
    Changed {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
    /// The surface is gone.
    Destroyed,
}

/// Lifecycle of a USB device as reported by the USB monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceEvent {
    /// A device was plugged in.
    Attached(DeviceId),
    /// A device was unplugged.
    Detached(DeviceId),
    /// The library finished (or failed) opening the device.
    Connected {
        /// The device.
        device: DeviceId,
        /// Whether the camera is now open.
        connected: bool,
    },
    /// The library closed its connection to the device.
    Disconnected(DeviceId),
}

/// Any event the coordinator reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A surface notification.
    Surface(SurfaceEvent),
    /// A USB device notification.
    Device(DeviceEvent),
}

impl From<SurfaceEvent> for LifecycleEvent {
    fn from(event: SurfaceEvent) -> Self {
        Self::Surface(event)
    }
}

impl From<DeviceEvent> for LifecycleEvent {
    fn from(event: DeviceEvent) -> Self {
        Self::Device(event)
    }
}
