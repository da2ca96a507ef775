//! Thread-safe coordinator wrapper.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    CameraHandle, CoordinatorConfig, CoordinatorState, DeviceId, DeviceLifecycleCoordinator,
    LifecycleEvent,
};

/// A [`DeviceLifecycleCoordinator`] behind a mutex.
///
/// Every operation runs under the lock, so the check and the camera call of
/// a transition are atomic with respect to events arriving on other threads.
/// Clones share the same coordinator.
#[derive(Debug)]
pub struct SharedCoordinator<H> {
    inner: Arc<Mutex<DeviceLifecycleCoordinator<H>>>,
}

impl<H> Clone for SharedCoordinator<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: CameraHandle> SharedCoordinator<H> {
    /// Create a shared coordinator driving `camera`.
    pub fn new(camera: H, config: CoordinatorConfig) -> Self {
        Self::from(DeviceLifecycleCoordinator::new(camera, config))
    }

    /// Run `f` with exclusive access to the coordinator.
    pub fn with<R>(&self, f: impl FnOnce(&mut DeviceLifecycleCoordinator<H>) -> R) -> R {
        f(&mut self.lock())
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> CoordinatorState {
        self.lock().state()
    }

    /// See [`DeviceLifecycleCoordinator::handle`].
    pub fn handle(&self, event: LifecycleEvent) {
        self.lock().handle(event);
    }

    /// See [`DeviceLifecycleCoordinator::on_surface_created`].
    pub fn on_surface_created(&self) {
        self.lock().on_surface_created();
    }

    /// See [`DeviceLifecycleCoordinator::on_surface_changed`].
    pub fn on_surface_changed(&self, width: u32, height: u32) {
        self.lock().on_surface_changed(width, height);
    }

    /// See [`DeviceLifecycleCoordinator::on_surface_destroyed`].
    pub fn on_surface_destroyed(&self) {
        self.lock().on_surface_destroyed();
    }

    /// See [`DeviceLifecycleCoordinator::on_device_attached`].
    pub fn on_device_attached(&self, device: DeviceId) {
        self.lock().on_device_attached(device);
    }

    /// See [`DeviceLifecycleCoordinator::on_device_detached`].
    pub fn on_device_detached(&self, device: DeviceId) {
        self.lock().on_device_detached(device);
    }

    /// See [`DeviceLifecycleCoordinator::on_device_connected`].
    pub fn on_device_connected(&self, device: DeviceId, connected: bool) {
        self.lock().on_device_connected(device, connected);
    }

    /// See [`DeviceLifecycleCoordinator::on_device_disconnected`].
    pub fn on_device_disconnected(&self, device: DeviceId) {
        self.lock().on_device_disconnected(device);
    }

    /// See [`DeviceLifecycleCoordinator::request_permission`].
    pub fn request_permission(&self) {
        self.lock().request_permission();
    }

    /// See [`DeviceLifecycleCoordinator::rerequest_permission`].
    pub fn rerequest_permission(&self) {
        self.lock().rerequest_permission();
    }

    /// See [`DeviceLifecycleCoordinator::stop_preview`].
    pub fn stop_preview(&self) {
        self.lock().stop_preview();
    }

    /// See [`DeviceLifecycleCoordinator::release`].
    pub fn release(&self) {
        self.lock().release();
    }

    // The state is a plain value, valid even if a camera call panicked
    // mid-transition.
    fn lock(&self) -> MutexGuard<'_, DeviceLifecycleCoordinator<H>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<H> From<DeviceLifecycleCoordinator<H>> for SharedCoordinator<H> {
    fn from(coordinator: DeviceLifecycleCoordinator<H>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(coordinator)),
        }
    }
}
