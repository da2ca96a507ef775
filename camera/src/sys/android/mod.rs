//! Android camera implementation over the UVCCamera helper library via JNI.
//!
//! The host app bundles the helper library and compiles `UvcBridge.kt` (next
//! to this file). The bridge is registered as both the texture view's
//! surface callback and the helper's device listener, and forwards every
//! notification to the `nativeOn*` entry points below.

use std::path::Path;

use jni::objects::{GlobalRef, JClass, JObject, JValue};
use jni::sys::{jboolean, jint, JNI_TRUE};
use jni::{JNIEnv, JavaVM};
use log::{debug, error, warn};

use crate::{
    CameraError, CameraHandle, DeviceId, DeviceInfo, RecordParams, Resolution, SessionConfig,
    SessionSlot, UsbCameraSession, UvcCamera,
};

const HELPER_CLASS: &str = "com/jiangdg/usbcamera/UVCCameraHelper";
const BRIDGE_CLASS: &str = "com/uvckit/camera/UvcBridge";
const RECORD_PARAMS_CLASS: &str = "com/serenegiant/usb/encoder/RecordParams";

const VIEW_SIG: &str = "Lcom/serenegiant/usb/widget/CameraViewInterface;";
const CAPTURE_LISTENER_SIG: &str =
    "Lcom/serenegiant/usb/common/AbstractUVCCameraHandler$OnCaptureListener;";
const ENCODE_LISTENER_SIG: &str =
    "Lcom/serenegiant/usb/common/AbstractUVCCameraHandler$OnEncodeResultListener;";

/// Session created by [`init_with_activity`].
static SESSION: SessionSlot<UvcCameraHelper> = SessionSlot::new();

/// The session created by [`init_with_activity`], if any.
pub fn session() -> Option<&'static UsbCameraSession<UvcCameraHelper>> {
    SESSION.get()
}

/// Bind the helper library to `activity` and `view` and create the global
/// session. Later calls, including concurrent ones, return the existing
/// session.
///
/// `view` must implement `com.serenegiant.usb.widget.CameraViewInterface`
/// (e.g. a `UVCCameraTextureView`).
///
/// # Errors
/// Returns [`CameraError::Backend`] if a JNI call fails, e.g. because the
/// helper library or `UvcBridge` is missing from the app.
pub fn init_with_activity(
    env: &mut JNIEnv,
    activity: &JObject,
    view: &JObject,
    config: SessionConfig,
) -> Result<&'static UsbCameraSession<UvcCameraHelper>, CameraError> {
    SESSION.get_or_init(|| {
        let helper = UvcCameraHelper::new(env, activity, view)?;
        UsbCameraSession::prepare(helper, config)
    })
}

/// List devices through the initialized session's helper.
///
/// # Errors
/// Returns [`CameraError::NotInitialized`] before [`init_with_activity`].
pub fn list_devices() -> Result<Vec<DeviceInfo>, CameraError> {
    SESSION
        .get()
        .ok_or(CameraError::NotInitialized)?
        .camera()
        .devices()
}

/// JNI handle to the `UVCCameraHelper` singleton.
#[derive(Debug)]
pub struct UvcCameraHelper {
    vm: JavaVM,
    helper: GlobalRef,
    activity: GlobalRef,
    view: GlobalRef,
    bridge: GlobalRef,
    record_params_class: GlobalRef,
}

impl UvcCameraHelper {
    /// Look up the helper singleton and attach a bridge to `view`.
    ///
    /// Classes are resolved here, on a thread that sees the app's class
    /// loader, and kept for calls that later arrive on attached threads.
    ///
    /// # Errors
    /// Returns [`CameraError::Backend`] if a class or method is missing.
    pub fn new(env: &mut JNIEnv, activity: &JObject, view: &JObject) -> Result<Self, CameraError> {
        let vm = env.get_java_vm().map_err(backend("get_java_vm"))?;

        let helper = env
            .call_static_method(
                HELPER_CLASS,
                "getInstance",
                "()Lcom/jiangdg/usbcamera/UVCCameraHelper;",
                &[],
            )
            .and_then(|v| v.l())
            .map_err(backend("getInstance"))?;

        let bridge = env
            .new_object(BRIDGE_CLASS, "()V", &[])
            .map_err(backend("new UvcBridge"))?;

        env.call_method(
            view,
            "setCallback",
            "(Lcom/serenegiant/usb/widget/CameraViewInterface$Callback;)V",
            &[JValue::Object(&bridge)],
        )
        .map_err(backend("setCallback"))?;

        let record_params_class = env
            .find_class(RECORD_PARAMS_CLASS)
            .map_err(backend("find RecordParams"))?;

        Ok(Self {
            vm,
            helper: env.new_global_ref(helper).map_err(backend("global helper"))?,
            activity: env
                .new_global_ref(activity)
                .map_err(backend("global activity"))?,
            view: env.new_global_ref(view).map_err(backend("global view"))?,
            bridge: env.new_global_ref(bridge).map_err(backend("global bridge"))?,
            record_params_class: env
                .new_global_ref(record_params_class)
                .map_err(backend("global RecordParams"))?,
        })
    }

    /// Devices currently known to the helper's USB monitor.
    ///
    /// # Errors
    /// Returns [`CameraError::Backend`] if a JNI call fails.
    pub fn devices(&self) -> Result<Vec<DeviceInfo>, CameraError> {
        self.with_env("getUsbDeviceList", |env| {
            let list = env
                .call_method(
                    self.helper.as_obj(),
                    "getUsbDeviceList",
                    "()Ljava/util/List;",
                    &[],
                )?
                .l()?;
            if list.is_null() {
                return Ok(Vec::new());
            }

            let size = env.call_method(&list, "size", "()I", &[])?.i()?;
            let mut devices = Vec::new();
            for position in 0..size {
                let device = env
                    .call_method(&list, "get", "(I)Ljava/lang/Object;", &[JValue::Int(position)])?
                    .l()?;
                let id = env.call_method(&device, "getDeviceId", "()I", &[])?.i()?;
                let name = env
                    .call_method(&device, "getProductName", "()Ljava/lang/String;", &[])?
                    .l()?;
                let name = if name.is_null() {
                    None
                } else {
                    Some(String::from(env.get_string((&name).into())?))
                };
                devices.push(DeviceInfo {
                    index: position.unsigned_abs(),
                    id: device_id(id),
                    name,
                });
            }
            Ok(devices)
        })
    }

    fn with_env<R>(
        &self,
        call: &str,
        f: impl FnOnce(&mut JNIEnv) -> jni::errors::Result<R>,
    ) -> Result<R, CameraError> {
        let mut env = self
            .vm
            .attach_current_thread()
            .map_err(backend("attach_current_thread"))?;

        f(&mut *env).map_err(|e| {
            // A pending exception would abort the next JNI call.
            if env.exception_check().unwrap_or(false) {
                let _ = env.exception_describe();
                let _ = env.exception_clear();
            }
            CameraError::Backend(format!("{call}: {e}"))
        })
    }

    fn call_helper(&self, name: &str, sig: &str, args: &[JValue]) -> Result<(), CameraError> {
        self.with_env(name, |env| {
            env.call_method(self.helper.as_obj(), name, sig, args)?;
            Ok(())
        })
    }
}

impl CameraHandle for UvcCameraHelper {
    fn is_opened(&self) -> bool {
        self.with_env("isCameraOpened", |env| {
            env.call_method(self.helper.as_obj(), "isCameraOpened", "()Z", &[])?
                .z()
        })
        .unwrap_or_else(|e| {
            warn!("{e}");
            false
        })
    }

    fn start_preview(&self) -> Result<(), CameraError> {
        self.call_helper(
            "startPreview",
            &format!("({VIEW_SIG})V"),
            &[JValue::Object(self.view.as_obj())],
        )
    }

    fn stop_preview(&self) -> Result<(), CameraError> {
        self.call_helper("stopPreview", "()V", &[])
    }

    fn request_permission(&self, index: u32) -> Result<(), CameraError> {
        let index = jint::try_from(index).map_err(|_| CameraError::InvalidDeviceIndex(index))?;
        self.call_helper("requestPermission", "(I)V", &[JValue::Int(index)])
    }

    fn close_camera(&self) -> Result<(), CameraError> {
        self.call_helper("closeCamera", "()V", &[])
    }
}

impl UvcCamera for UvcCameraHelper {
    fn prepare(&self, preview_size: Resolution) -> Result<(), CameraError> {
        let width = jint::try_from(preview_size.width)
            .map_err(|_| CameraError::Backend(format!("preview size {preview_size}")))?;
        let height = jint::try_from(preview_size.height)
            .map_err(|_| CameraError::Backend(format!("preview size {preview_size}")))?;

        // The helper rejects a preview size once its handler exists, so the
        // size goes first.
        self.call_helper(
            "setDefaultPreviewSize",
            "(II)V",
            &[JValue::Int(width), JValue::Int(height)],
        )?;
        self.call_helper(
            "initUSBMonitor",
            &format!(
                "(Landroid/app/Activity;{VIEW_SIG}Lcom/jiangdg/usbcamera/UVCCameraHelper$OnMyDevConnectListener;)V"
            ),
            &[
                JValue::Object(self.activity.as_obj()),
                JValue::Object(self.view.as_obj()),
                JValue::Object(self.bridge.as_obj()),
            ],
        )?;
        self.call_helper("createUVCCamera", "()V", &[])
    }

    fn register_usb(&self) -> Result<(), CameraError> {
        self.call_helper("registerUSB", "()V", &[])
    }

    fn unregister_usb(&self) -> Result<(), CameraError> {
        self.call_helper("unregisterUSB", "()V", &[])
    }

    fn capture_picture(&self, path: &Path) -> Result<(), CameraError> {
        self.with_env("capturePicture", |env| {
            let path = env.new_string(path.to_string_lossy())?;
            env.call_method(
                self.helper.as_obj(),
                "capturePicture",
                &format!("(Ljava/lang/String;{CAPTURE_LISTENER_SIG})V"),
                &[JValue::Object(&path), JValue::Object(&JObject::null())],
            )?;
            Ok(())
        })
    }

    fn start_recording(&self, params: &RecordParams) -> Result<(), CameraError> {
        let duration = jint::try_from(params.duration_secs)
            .map_err(|_| CameraError::Backend(format!("duration {}", params.duration_secs)))?;

        self.with_env("startPusher", |env| {
            let class = <&JClass>::from(self.record_params_class.as_obj());
            let record = env.new_object(class, "()V", &[])?;
            let path = env.new_string(params.path.to_string_lossy())?;

            env.call_method(
                &record,
                "setRecordPath",
                "(Ljava/lang/String;)V",
                &[JValue::Object(&path)],
            )?;
            env.call_method(&record, "setRecordDuration", "(I)V", &[JValue::Int(duration)])?;
            env.call_method(
                &record,
                "setVoiceClose",
                "(Z)V",
                &[JValue::Bool(params.voice_closed.into())],
            )?;
            env.call_method(
                &record,
                "setSupportOverlay",
                "(Z)V",
                &[JValue::Bool(params.overlay.into())],
            )?;

            env.call_method(
                self.helper.as_obj(),
                "startPusher",
                &format!("(L{RECORD_PARAMS_CLASS};{ENCODE_LISTENER_SIG})V"),
                &[JValue::Object(&record), JValue::Object(&JObject::null())],
            )?;
            Ok(())
        })
    }

    fn stop_recording(&self) -> Result<(), CameraError> {
        self.call_helper("stopPusher", "()V", &[])
    }
}

fn backend(call: &'static str) -> impl Fn(jni::errors::Error) -> CameraError {
    move |e| CameraError::Backend(format!("{call}: {e}"))
}

// Android hands out positive device ids.
const fn device_id(raw: jint) -> DeviceId {
    DeviceId(raw.unsigned_abs())
}

fn with_session(callback: &str, f: impl FnOnce(&UsbCameraSession<UvcCameraHelper>)) {
    match SESSION.get() {
        Some(session) => f(session),
        None => error!("{callback} before init_with_activity, dropping"),
    }
}

// ============================================================================
// UvcBridge native callbacks
// ============================================================================

/// `CameraViewInterface.Callback.onSurfaceCreated`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_uvckit_camera_UvcBridge_nativeOnSurfaceCreated(
    _env: JNIEnv,
    _this: JObject,
) {
    with_session("onSurfaceCreated", |s| s.coordinator().on_surface_created());
}

/// `CameraViewInterface.Callback.onSurfaceChanged`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_uvckit_camera_UvcBridge_nativeOnSurfaceChanged(
    _env: JNIEnv,
    _this: JObject,
    width: jint,
    height: jint,
) {
    with_session("onSurfaceChanged", |s| {
        s.coordinator()
            .on_surface_changed(width.unsigned_abs(), height.unsigned_abs());
    });
}

/// `CameraViewInterface.Callback.onSurfaceDestroy`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_uvckit_camera_UvcBridge_nativeOnSurfaceDestroyed(
    _env: JNIEnv,
    _this: JObject,
) {
    with_session("onSurfaceDestroy", |s| s.coordinator().on_surface_destroyed());
}

/// `OnMyDevConnectListener.onAttachDev`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_uvckit_camera_UvcBridge_nativeOnAttach(
    _env: JNIEnv,
    _this: JObject,
    device: jint,
) {
    with_session("onAttachDev", |s| {
        s.coordinator().on_device_attached(device_id(device));
    });
}

/// `OnMyDevConnectListener.onDettachDev`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_uvckit_camera_UvcBridge_nativeOnDetach(
    _env: JNIEnv,
    _this: JObject,
    device: jint,
) {
    with_session("onDettachDev", |s| {
        s.coordinator().on_device_detached(device_id(device));
    });
}

/// `OnMyDevConnectListener.onConnectDev`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_uvckit_camera_UvcBridge_nativeOnConnect(
    _env: JNIEnv,
    _this: JObject,
    device: jint,
    connected: jboolean,
) {
    debug!("onConnectDev {device} {connected}");
    with_session("onConnectDev", |s| {
        s.coordinator()
            .on_device_connected(device_id(device), connected == JNI_TRUE);
    });
}

/// `OnMyDevConnectListener.onDisConnectDev`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_uvckit_camera_UvcBridge_nativeOnDisconnect(
    _env: JNIEnv,
    _this: JObject,
    device: jint,
) {
    with_session("onDisConnectDev", |s| {
        s.coordinator().on_device_disconnected(device_id(device));
    });
}
