//! Sequencing of preview and permission calls against lifecycle events.

use log::{debug, info, warn};

use crate::{
    CameraError, CameraHandle, CoordinatorState, DeviceEvent, DeviceId, DeviceSelector,
    LifecycleEvent, PermissionState, SurfaceEvent, SurfaceState,
};

/// Coordinator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordinatorConfig {
    /// Device targeted by permission requests.
    pub device: DeviceSelector,
    /// Start the preview when the camera finishes opening after the surface
    /// is already up. Off by default: a surface that appears before the
    /// camera opens stays idle until it is recreated.
    pub resume_on_open: bool,
}

impl CoordinatorConfig {
    /// Set the device targeted by permission requests.
    #[must_use]
    pub const fn with_device(mut self, device: DeviceSelector) -> Self {
        self.device = device;
        self
    }

    /// Enable or disable starting the preview on camera open.
    #[must_use]
    pub const fn with_resume_on_open(mut self, resume: bool) -> Self {
        self.resume_on_open = resume;
        self
    }
}

/// Reacts to surface and USB device notifications and drives the camera.
///
/// Guarantees at most one active preview and at most one outstanding
/// permission request, however the two event streams interleave or repeat.
/// Calls into the camera are best effort: failures are logged and never
/// block a transition.
///
/// The coordinator itself is not synchronized. Hosts that deliver events
/// from more than one thread should use [`SharedCoordinator`](crate::SharedCoordinator).
#[derive(Debug)]
pub struct DeviceLifecycleCoordinator<H> {
    camera: H,
    config: CoordinatorConfig,
    state: CoordinatorState,
}

impl<H: CameraHandle> DeviceLifecycleCoordinator<H> {
    /// Create a coordinator driving `camera`.
    pub fn new(camera: H, config: CoordinatorConfig) -> Self {
        Self {
            camera,
            config,
            state: CoordinatorState::default(),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> CoordinatorState {
        self.state
    }

    /// Configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// The camera handle.
    #[must_use]
    pub const fn camera(&self) -> &H {
        &self.camera
    }

    /// Dispatch an event to the matching handler.
    pub fn handle(&mut self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::Surface(SurfaceEvent::Created) => self.on_surface_created(),
            LifecycleEvent::Surface(SurfaceEvent::Changed { width, height }) => {
                self.on_surface_changed(width, height);
            }
            LifecycleEvent::Surface(SurfaceEvent::Destroyed) => self.on_surface_destroyed(),
            LifecycleEvent::Device(DeviceEvent::Attached(device)) => {
                self.on_device_attached(device);
            }
            LifecycleEvent::Device(DeviceEvent::Detached(device)) => {
                self.on_device_detached(device);
            }
            LifecycleEvent::Device(DeviceEvent::Connected { device, connected }) => {
                self.on_device_connected(device, connected);
            }
            LifecycleEvent::Device(DeviceEvent::Disconnected(device)) => {
                self.on_device_disconnected(device);
            }
        }
    }

    /// The surface is ready. Starts the preview if the camera is open.
    pub fn on_surface_created(&mut self) {
        if self.state.surface == SurfaceState::Previewing {
            debug!("surface created while previewing, ignoring");
            return;
        }

        if self.camera.is_opened() {
            self.start_preview();
        } else {
            info!("surface ready but camera not opened, preview deferred");
            self.state.surface = SurfaceState::Ready;
        }
    }

    /// The surface was resized. Only logged.
    pub fn on_surface_changed(&self, width: u32, height: u32) {
        debug!("surface changed to {width}x{height}");
    }

    /// The surface is gone. Stops the preview if one is running.
    pub fn on_surface_destroyed(&mut self) {
        match self.state.surface {
            SurfaceState::Previewing => {
                if self.camera.is_opened() {
                    debug!("surface destroyed, stopping preview");
                    report("stop_preview", self.camera.stop_preview());
                } else {
                    debug!("surface destroyed after camera closed, nothing to stop");
                }
            }
            SurfaceState::Ready => debug!("surface destroyed before preview started"),
            SurfaceState::Absent => {
                debug!("surface destroyed twice, ignoring");
                return;
            }
        }
        self.state.surface = SurfaceState::Absent;
    }

    /// A device was plugged in. Requests permission unless a request is
    /// already outstanding.
    pub fn on_device_attached(&mut self, device: DeviceId) {
        if let PermissionState::Requested { device: pending } = self.state.permission {
            debug!("{device} attached with request for {pending:?} outstanding, ignoring");
            return;
        }
        debug!("{device} attached, requesting permission");
        self.issue_request(Some(device));
    }

    /// Request permission without an attach notification, for devices that
    /// were already plugged in when the monitor was registered.
    ///
    /// Subject to the same at-most-one-outstanding rule as
    /// [`on_device_attached`](Self::on_device_attached).
    pub fn request_permission(&mut self) {
        if self.state.permission_requested() {
            debug!("permission already requested, ignoring");
            return;
        }
        debug!("requesting permission");
        self.issue_request(None);
    }

    /// Ask the library for permission again, even with a request
    /// outstanding, so a prompt the user dismissed is raised anew.
    ///
    /// An outstanding request keeps its device; from idle this behaves like
    /// [`request_permission`](Self::request_permission).
    pub fn rerequest_permission(&mut self) {
        let PermissionState::Requested { device } = self.state.permission else {
            debug!("requesting permission");
            self.issue_request(None);
            return;
        };
        debug!("re-requesting permission for {device:?}");
        let index = self.config.device.index();
        report("request_permission", self.camera.request_permission(index));
    }

    /// A device was unplugged. Closes the camera if a request was
    /// outstanding.
    ///
    /// Any device's detach ends the cycle: the monitor only ever targets one
    /// device index, so identifiers are not matched.
    pub fn on_device_detached(&mut self, device: DeviceId) {
        let PermissionState::Requested { device: pending } = self.state.permission else {
            debug!("{device} detached with no request outstanding, ignoring");
            return;
        };
        if pending.is_some_and(|pending| pending != device) {
            warn!("{device} detached while request was for {pending:?}, closing anyway");
        } else {
            debug!("{device} detached, closing camera");
        }
        self.release_camera();
    }

    /// The library reports the outcome of opening a device.
    ///
    /// With [`CoordinatorConfig::resume_on_open`] set, a successful open
    /// starts the preview on a surface that was created too early.
    pub fn on_device_connected(&mut self, device: DeviceId, connected: bool) {
        if !connected {
            debug!("{device} failed to open");
            self.demote_if_closed();
            return;
        }
        if self.config.resume_on_open
            && self.state.surface == SurfaceState::Ready
            && self.camera.is_opened()
        {
            info!("{device} opened with surface waiting, starting deferred preview");
            self.start_preview();
        } else {
            debug!("{device} connected");
        }
    }

    /// The library closed its connection to a device. No camera calls are
    /// made; an active preview is marked as ended only once the camera
    /// reports closed.
    pub fn on_device_disconnected(&mut self, device: DeviceId) {
        debug!("{device} disconnected");
        self.demote_if_closed();
    }

    /// Stop the preview on request of the host (e.g. a stop button), keeping
    /// the surface.
    pub fn stop_preview(&mut self) {
        if self.state.surface != SurfaceState::Previewing {
            debug!("stop requested with no preview running");
            return;
        }
        if self.camera.is_opened() {
            report("stop_preview", self.camera.stop_preview());
        }
        self.state.surface = SurfaceState::Ready;
    }

    /// Stop the preview and close the camera if a request is outstanding,
    /// returning to the idle permission state.
    pub fn release(&mut self) {
        self.stop_preview();
        if self.state.permission_requested() {
            debug!("releasing camera");
            self.release_camera();
        }
    }

    fn start_preview(&mut self) {
        debug!("starting preview");
        report("start_preview", self.camera.start_preview());
        self.state.surface = SurfaceState::Previewing;
    }

    fn issue_request(&mut self, device: Option<DeviceId>) {
        self.state.permission = PermissionState::Requested { device };
        let index = self.config.device.index();
        report("request_permission", self.camera.request_permission(index));
    }

    fn release_camera(&mut self) {
        self.state.permission = PermissionState::Idle;
        report("close_camera", self.camera.close_camera());
        self.demote_preview();
    }

    // A report that arrives while the camera still reads as opened leaves
    // the preview running.
    fn demote_if_closed(&mut self) {
        if self.state.surface == SurfaceState::Previewing && !self.camera.is_opened() {
            self.state.surface = SurfaceState::Ready;
        }
    }

    fn demote_preview(&mut self) {
        if self.state.surface == SurfaceState::Previewing {
            self.state.surface = SurfaceState::Ready;
        }
    }
}

fn report(call: &str, result: Result<(), CameraError>) {
    if let Err(e) = result {
        warn!("{call} failed: {e}");
    }
}
