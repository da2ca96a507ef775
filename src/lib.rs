//! # uvckit
//!
//! Drive a USB (UVC) camera through its helper library without racing the
//! surface and USB lifecycles against each other.
//!
//! ## Features
//!
//! - `camera` (default): the lifecycle coordinator, the camera session and
//!   the Android backend.
//! - `desktop`: the nokhwa-backed desktop camera.
//! - `dialog`: native confirmation dialogs.
//!
//! Use the `full` feature to enable everything.
//!
//! ## Example
//!
//! ```toml
//! [dependencies]
//! uvckit = { version = "0.1", features = ["camera", "dialog"] }
//! ```
//!
//! ```ignore
//! use uvckit::camera::{CoordinatorConfig, DeviceId, SharedCoordinator};
//!
//! let coordinator = SharedCoordinator::new(camera, CoordinatorConfig::default());
//! coordinator.on_device_attached(DeviceId(1002));
//! coordinator.on_surface_created();
//! ```

#[cfg(feature = "camera")]
pub use uvckit_camera as camera;

#[cfg(feature = "dialog")]
pub use uvckit_dialog as dialog;
