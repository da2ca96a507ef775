//! Coordinator state values.

use crate::DeviceId;

/// Where the rendering surface is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceState {
    /// No surface, or it has been destroyed.
    #[default]
    Absent,
    /// The surface exists but nothing is rendering into it.
    Ready,
    /// The preview is rendering into the surface.
    Previewing,
}

/// Whether a permission request is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    /// No request outstanding.
    #[default]
    Idle,
    /// A request was issued and no detach has been seen since.
    Requested {
        /// The device whose attach triggered the request, if any.
        device: Option<DeviceId>,
    },
}

/// Snapshot of a coordinator's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordinatorState {
    /// Surface and preview state.
    pub surface: SurfaceState,
    /// Permission request state.
    pub permission: PermissionState,
}

impl CoordinatorState {
    /// Whether a preview session is active.
    #[must_use]
    pub const fn preview_active(&self) -> bool {
        matches!(self.surface, SurfaceState::Previewing)
    }

    /// Whether a permission request is outstanding.
    #[must_use]
    pub const fn permission_requested(&self) -> bool {
        matches!(self.permission, PermissionState::Requested { .. })
    }

    /// Whether a surface currently exists.
    #[must_use]
    pub const fn surface_present(&self) -> bool {
        !matches!(self.surface, SurfaceState::Absent)
    }
}
