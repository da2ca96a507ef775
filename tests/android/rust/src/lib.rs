//! Android JNI harness for the USB camera session.
//!
//! This crate is only compiled for Android targets.
//! To build: cargo ndk -t arm64-v8a build -p uvckit-test-android
//!
//! `MainActivity` declares the matching `external fun native*` methods, loads
//! `libuvckit_test_android.so`, and calls `nativeInit` from `onCreate` once
//! its layout holds a `UVCCameraTextureView`.

#![cfg(target_os = "android")]
#![allow(non_snake_case)]

use jni::JNIEnv;
use jni::objects::{JObject, JString};
use jni::sys::{JNI_FALSE, JNI_TRUE, jboolean, jstring};
use log::{LevelFilter, error, info};
use uvckit_camera::sys::android::{self, UvcCameraHelper};
use uvckit_camera::{CameraError, CaptureLayout, SessionConfig, UsbCameraSession};

fn init_logging() {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("uvckit"),
    );
}

/// Report `err` in the log and in a dialog over `activity`.
fn report(env: &mut JNIEnv, activity: &JObject, action: &str, err: &CameraError) {
    error!("{action} failed: {err}");
    if let Err(e) = uvckit_dialog::sys::android::alert_with_context(
        env,
        activity,
        &format!("{action} failed: {err}"),
    ) {
        error!("could not show dialog: {e}");
    }
}

fn run<T>(
    env: &mut JNIEnv,
    activity: &JObject,
    action: &str,
    f: impl FnOnce(&UsbCameraSession<UvcCameraHelper>) -> Result<T, CameraError>,
) -> Option<T> {
    let result = android::session()
        .ok_or(CameraError::NotInitialized)
        .and_then(f);
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            report(env, activity, action, &e);
            None
        }
    }
}

fn path_string(env: &mut JNIEnv, path: &std::path::Path) -> jstring {
    env.new_string(path.to_string_lossy())
        .map_or(std::ptr::null_mut(), JString::into_raw)
}

/// Create the camera session for `view`, writing captures under
/// `pictures_dir` and `movies_dir`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_uvckit_test_MainActivity_nativeInit(
    mut env: JNIEnv,
    activity: JObject,
    view: JObject,
    pictures_dir: JString,
    movies_dir: JString,
) -> jboolean {
    init_logging();

    let mut dir = |path: &JString| env.get_string(path).map(String::from);
    let (pictures, movies) = match (dir(&pictures_dir), dir(&movies_dir)) {
        (Ok(pictures), Ok(movies)) => (pictures, movies),
        (Err(e), _) | (_, Err(e)) => {
            error!("invalid capture directories: {e}");
            return JNI_FALSE;
        }
    };

    let config =
        SessionConfig::default().with_capture(CaptureLayout::new(pictures, movies));
    match android::init_with_activity(&mut env, &activity, &view, config) {
        Ok(_) => {
            info!("usb camera ready");
            JNI_TRUE
        }
        Err(e) => {
            report(&mut env, &activity, "camera setup", &e);
            JNI_FALSE
        }
    }
}

/// Register the USB monitor and ask for the camera.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_uvckit_test_MainActivity_nativeStartUsbCamera(
    mut env: JNIEnv,
    activity: JObject,
) {
    run(&mut env, &activity, "start", |session| session.start());
}

/// Release the camera and unregister the USB monitor.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_uvckit_test_MainActivity_nativeEndUsbCamera(
    mut env: JNIEnv,
    activity: JObject,
) {
    run(&mut env, &activity, "end", |session| session.end());
}

/// Capture a picture. Returns its path, or null on failure.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_uvckit_test_MainActivity_nativeCaptureUsbCamera(
    mut env: JNIEnv,
    activity: JObject,
) -> jstring {
    run(&mut env, &activity, "capture", |session| session.capture_picture())
        .map_or(std::ptr::null_mut(), |path| path_string(&mut env, &path))
}

/// Start recording. Returns the output path, or null on failure.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_uvckit_test_MainActivity_nativeStartRecording(
    mut env: JNIEnv,
    activity: JObject,
) -> jstring {
    run(&mut env, &activity, "start recording", |session| {
        session.start_recording()
    })
    .map_or(std::ptr::null_mut(), |path| path_string(&mut env, &path))
}

/// Stop recording.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_uvckit_test_MainActivity_nativeStopRecording(
    mut env: JNIEnv,
    activity: JObject,
) -> jboolean {
    if run(&mut env, &activity, "stop recording", |session| {
        session.stop_recording()
    })
    .is_some()
    {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}
