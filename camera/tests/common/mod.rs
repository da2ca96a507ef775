//! A camera that records every command it receives.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use uvckit_camera::{CameraError, CameraHandle, RecordParams, Resolution, UvcCamera};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    StartPreview,
    StopPreview,
    RequestPermission(u32),
    CloseCamera,
    Prepare(Resolution),
    RegisterUsb,
    UnregisterUsb,
    CapturePicture(PathBuf),
    StartRecording(RecordParams),
    StopRecording,
}

#[derive(Debug, Default)]
pub struct RecordingCamera {
    opened: AtomicBool,
    open_on_request: bool,
    fail_recording: bool,
    fail_stop: bool,
    calls: Mutex<Vec<Call>>,
}

impl RecordingCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened() -> Self {
        let camera = Self::default();
        camera.set_opened(true);
        camera
    }

    /// Behave like a library whose permission prompt is granted at once.
    pub fn granting() -> Self {
        Self {
            open_on_request: true,
            ..Self::default()
        }
    }

    /// Reject every `start_recording` with a backend error.
    pub fn failing_recorder() -> Self {
        Self {
            fail_recording: true,
            ..Self::opened()
        }
    }

    /// Open camera whose `stop_recording` always fails.
    pub fn stuck_recorder() -> Self {
        Self {
            fail_stop: true,
            ..Self::opened()
        }
    }

    pub fn set_opened(&self, opened: bool) {
        self.opened.store(opened, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.log().iter().filter(|c| *c == call).count()
    }

    pub fn clear(&self) {
        self.log().clear();
    }

    fn log(&self) -> MutexGuard<'_, Vec<Call>> {
        self.calls.lock().unwrap()
    }

    fn push(&self, call: Call) {
        self.log().push(call);
    }
}

impl CameraHandle for RecordingCamera {
    fn is_opened(&self) -> bool {
        self.opened.load(Ordering::SeqCst)
    }

    fn start_preview(&self) -> Result<(), CameraError> {
        self.push(Call::StartPreview);
        Ok(())
    }

    fn stop_preview(&self) -> Result<(), CameraError> {
        self.push(Call::StopPreview);
        Ok(())
    }

    fn request_permission(&self, index: u32) -> Result<(), CameraError> {
        self.push(Call::RequestPermission(index));
        if self.open_on_request {
            self.set_opened(true);
        }
        Ok(())
    }

    fn close_camera(&self) -> Result<(), CameraError> {
        self.push(Call::CloseCamera);
        self.set_opened(false);
        Ok(())
    }
}

impl UvcCamera for RecordingCamera {
    fn prepare(&self, preview_size: Resolution) -> Result<(), CameraError> {
        self.push(Call::Prepare(preview_size));
        Ok(())
    }

    fn register_usb(&self) -> Result<(), CameraError> {
        self.push(Call::RegisterUsb);
        Ok(())
    }

    fn unregister_usb(&self) -> Result<(), CameraError> {
        self.push(Call::UnregisterUsb);
        Ok(())
    }

    fn capture_picture(&self, path: &Path) -> Result<(), CameraError> {
        self.push(Call::CapturePicture(path.to_path_buf()));
        Ok(())
    }

    fn start_recording(&self, params: &RecordParams) -> Result<(), CameraError> {
        if self.fail_recording {
            return Err(CameraError::Backend("encoder unavailable".into()));
        }
        self.push(Call::StartRecording(params.clone()));
        Ok(())
    }

    fn stop_recording(&self) -> Result<(), CameraError> {
        self.push(Call::StopRecording);
        if self.fail_stop {
            return Err(CameraError::Backend("encoder stuck".into()));
        }
        Ok(())
    }
}
