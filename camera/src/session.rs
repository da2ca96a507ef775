//! USB camera session: the start/end/capture/record controls of a camera
//! screen.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use chrono::{DateTime, Local, TimeZone};
use log::{debug, info};

use crate::{
    CameraError, CoordinatorConfig, RecordParams, Resolution, SharedCoordinator, UvcCamera,
};

const DEFAULT_ALBUM: &str = "USBCameraTest";
const FILE_STAMP: &str = "%Y-%m-%d %H%M%S";

/// Where captured pictures and recordings are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureLayout {
    /// Root directory for pictures.
    pub pictures_dir: PathBuf,
    /// Root directory for recordings.
    pub movies_dir: PathBuf,
    /// Sub-directory created under both roots.
    pub album: String,
}

impl CaptureLayout {
    /// Layout with the default album name.
    pub fn new(pictures_dir: impl Into<PathBuf>, movies_dir: impl Into<PathBuf>) -> Self {
        Self {
            pictures_dir: pictures_dir.into(),
            movies_dir: movies_dir.into(),
            album: DEFAULT_ALBUM.to_string(),
        }
    }

    /// Set the album sub-directory.
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    /// Path of a picture taken at `at`.
    pub fn picture_path<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> PathBuf
    where
        Tz::Offset: std::fmt::Display,
    {
        stamped(&self.pictures_dir, &self.album, at, "jpg")
    }

    /// Path of a recording started at `at`.
    pub fn recording_path<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> PathBuf
    where
        Tz::Offset: std::fmt::Display,
    {
        stamped(&self.movies_dir, &self.album, at, "mp4")
    }
}

impl Default for CaptureLayout {
    fn default() -> Self {
        Self::new("Pictures", "Movies")
    }
}

fn stamped<Tz: TimeZone>(root: &Path, album: &str, at: &DateTime<Tz>, ext: &str) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    root.join(album)
        .join(format!("{}.{ext}", at.format(FILE_STAMP)))
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionConfig {
    /// Coordinator settings.
    pub coordinator: CoordinatorConfig,
    /// Preview size requested from the library.
    pub preview_size: Resolution,
    /// Output locations.
    pub capture: CaptureLayout,
}

impl SessionConfig {
    /// Set the coordinator settings.
    #[must_use]
    pub fn with_coordinator(mut self, coordinator: CoordinatorConfig) -> Self {
        self.coordinator = coordinator;
        self
    }

    /// Set the preview size.
    #[must_use]
    pub fn with_preview_size(mut self, size: Resolution) -> Self {
        self.preview_size = size;
        self
    }

    /// Set the output locations.
    #[must_use]
    pub fn with_capture(mut self, capture: CaptureLayout) -> Self {
        self.capture = capture;
        self
    }
}

/// A USB camera bound to a surface, with its lifecycle coordinator.
///
/// Surface and device callbacks go to [`coordinator`](Self::coordinator);
/// user actions go to the methods here.
#[derive(Debug)]
pub struct UsbCameraSession<H> {
    camera: Arc<H>,
    coordinator: SharedCoordinator<Arc<H>>,
    capture: CaptureLayout,
    recording: AtomicBool,
}

impl<H: UvcCamera> UsbCameraSession<H> {
    /// Configure the camera and start watching for USB devices.
    ///
    /// The permission request follows from the monitor's attach
    /// notification for devices already plugged in.
    ///
    /// # Errors
    /// Returns an error if the preview size or the USB monitor is rejected.
    pub fn new(camera: H, config: SessionConfig) -> Result<Self, CameraError> {
        let session = Self::prepare(camera, config)?;
        session.register_usb()?;
        Ok(session)
    }

    /// Configure the camera without registering the USB monitor.
    ///
    /// Callers that must publish the session before device callbacks can
    /// arrive follow up with [`register_usb`](Self::register_usb).
    ///
    /// # Errors
    /// Returns an error if the preview size is rejected.
    pub fn prepare(camera: H, config: SessionConfig) -> Result<Self, CameraError> {
        let camera = Arc::new(camera);
        camera.prepare(config.preview_size)?;
        info!("usb camera session ready, preview {}", config.preview_size);

        Ok(Self {
            coordinator: SharedCoordinator::new(Arc::clone(&camera), config.coordinator),
            camera,
            capture: config.capture,
            recording: AtomicBool::new(false),
        })
    }

    /// Start watching for USB devices.
    ///
    /// # Errors
    /// Returns an error if the USB monitor cannot be registered.
    pub fn register_usb(&self) -> Result<(), CameraError> {
        self.camera.register_usb()
    }

    /// The lifecycle coordinator. Clone it into callback sources.
    #[must_use]
    pub const fn coordinator(&self) -> &SharedCoordinator<Arc<H>> {
        &self.coordinator
    }

    /// The camera handle.
    #[must_use]
    pub fn camera(&self) -> &H {
        &self.camera
    }

    /// Whether a recording is running.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::Acquire)
    }

    /// Watch for USB devices and ask for access to the configured one.
    ///
    /// The request is issued even with one outstanding, so pressing start
    /// again raises a prompt the user dismissed.
    ///
    /// # Errors
    /// Returns an error if the USB monitor cannot be registered.
    pub fn start(&self) -> Result<(), CameraError> {
        self.camera.register_usb()?;
        self.coordinator.rerequest_permission();
        Ok(())
    }

    /// Stop the preview, release the camera and stop watching for devices.
    ///
    /// Releasing here means a later [`start`](Self::start) issues a fresh
    /// permission request instead of waiting for a detach that the
    /// unregistered monitor will never report. Teardown runs even when
    /// stopping a recording fails.
    ///
    /// # Errors
    /// Returns the first error from stopping the recording or unregistering
    /// the USB monitor.
    pub fn end(&self) -> Result<(), CameraError> {
        let stopped = if self.is_recording() {
            self.stop_recording()
        } else {
            Ok(())
        };
        self.coordinator.release();
        let unregistered = self.camera.unregister_usb();
        stopped.and(unregistered)
    }

    /// Save the current frame under the pictures directory.
    ///
    /// # Errors
    /// Returns [`CameraError::NotOpened`] without an open camera, or the
    /// library's error.
    pub fn capture_picture(&self) -> Result<PathBuf, CameraError> {
        self.capture_picture_at(&Local::now())
    }

    /// Like [`capture_picture`](Self::capture_picture) with an explicit
    /// timestamp for the file name.
    ///
    /// # Errors
    /// See [`capture_picture`](Self::capture_picture).
    pub fn capture_picture_at<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> Result<PathBuf, CameraError>
    where
        Tz::Offset: std::fmt::Display,
    {
        self.require_opened()?;
        let path = self.capture.picture_path(at);
        self.camera.capture_picture(&path)?;
        info!("picture saved to {}", path.display());
        Ok(path)
    }

    /// Start recording under the movies directory.
    ///
    /// # Errors
    /// Returns [`CameraError::NotOpened`] without an open camera,
    /// [`CameraError::AlreadyRecording`] if a recording is running, or the
    /// library's error.
    pub fn start_recording(&self) -> Result<PathBuf, CameraError> {
        self.start_recording_at(&Local::now())
    }

    /// Like [`start_recording`](Self::start_recording) with an explicit
    /// timestamp for the file name.
    ///
    /// # Errors
    /// See [`start_recording`](Self::start_recording).
    pub fn start_recording_at<Tz: TimeZone>(
        &self,
        at: &DateTime<Tz>,
    ) -> Result<PathBuf, CameraError>
    where
        Tz::Offset: std::fmt::Display,
    {
        self.require_opened()?;
        if self
            .recording
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CameraError::AlreadyRecording);
        }

        let params = RecordParams::new(self.capture.recording_path(at));
        if let Err(e) = self.camera.start_recording(&params) {
            self.recording.store(false, Ordering::Release);
            return Err(e);
        }
        info!("recording to {}", params.path.display());
        Ok(params.path)
    }

    /// Stop the running recording.
    ///
    /// # Errors
    /// Returns [`CameraError::NotRecording`] if nothing is recording, or the
    /// library's error.
    pub fn stop_recording(&self) -> Result<(), CameraError> {
        if !self.recording.swap(false, Ordering::AcqRel) {
            return Err(CameraError::NotRecording);
        }
        debug!("stopping recording");
        self.camera.stop_recording()
    }

    fn require_opened(&self) -> Result<(), CameraError> {
        if self.camera.is_opened() {
            Ok(())
        } else {
            Err(CameraError::NotOpened)
        }
    }
}

/// A process-wide slot holding at most one session.
///
/// Initialization is serialized: concurrent callers build at most one
/// session, and its USB monitor is registered only once the session is
/// published, so device callbacks always find it.
#[derive(Debug)]
pub struct SessionSlot<H> {
    session: OnceLock<UsbCameraSession<H>>,
    init: Mutex<()>,
}

impl<H> SessionSlot<H> {
    /// An empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            session: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// The published session, if any.
    pub fn get(&self) -> Option<&UsbCameraSession<H>> {
        self.session.get()
    }
}

impl<H> Default for SessionSlot<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: UvcCamera> SessionSlot<H> {
    /// Return the published session, or publish the one `build` prepares and
    /// register its USB monitor.
    ///
    /// `build` should return an unregistered session, e.g. from
    /// [`UsbCameraSession::prepare`]. It runs at most once per slot.
    ///
    /// # Errors
    /// Returns the error of `build`, or of registering the USB monitor. A
    /// session whose registration failed stays published; its
    /// [`start`](UsbCameraSession::start) registers again.
    pub fn get_or_init(
        &self,
        build: impl FnOnce() -> Result<UsbCameraSession<H>, CameraError>,
    ) -> Result<&UsbCameraSession<H>, CameraError> {
        if let Some(session) = self.session.get() {
            return Ok(session);
        }

        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(session) = self.session.get() {
            return Ok(session);
        }

        let session = build()?;
        let session = self.session.get_or_init(|| session);
        session.register_usb()?;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn paths_are_stamped_under_album() {
        let layout = CaptureLayout::new("/sdcard/Pictures", "/sdcard/Movies");
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();

        assert_eq!(
            layout.picture_path(&at),
            PathBuf::from("/sdcard/Pictures/USBCameraTest/2024-03-09 070501.jpg")
        );
        assert_eq!(
            layout.with_album("cam").recording_path(&at),
            PathBuf::from("/sdcard/Movies/cam/2024-03-09 070501.mp4")
        );
    }

    #[test]
    fn default_config_uses_720p() {
        let config = SessionConfig::default();
        assert_eq!(config.preview_size, Resolution::HD);
        assert_eq!(config.capture.album, DEFAULT_ALBUM);
        assert!(!config.coordinator.resume_on_open);
    }
}
