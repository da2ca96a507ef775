//! `android.app.AlertDialog` built over JNI.
//!
//! The buttons carry no click listeners: either one simply dismisses the
//! dialog. [`show_with_context`] must run on the UI thread, typically from a
//! native method the activity calls in `onCreate` or a click handler.

use crate::{Dialog, DialogError, DialogType};
use jni::JNIEnv;
use jni::objects::{JObject, JValue};
use log::debug;

const BUILDER_CLASS: &str = "android/app/AlertDialog$Builder";
const BUILDER_SIG: &str = "Landroid/app/AlertDialog$Builder;";

fn jni_error(call: &str) -> impl FnOnce(jni::errors::Error) -> DialogError + '_ {
    move |e| DialogError::PlatformError(format!("JNI error {call}: {e}"))
}

fn icon(env: &mut JNIEnv, type_: DialogType) -> Result<i32, DialogError> {
    let name = match type_ {
        DialogType::Info => "ic_dialog_info",
        DialogType::Warning | DialogType::Error => "ic_dialog_alert",
    };
    env.get_static_field("android/R$drawable", name, "I")
        .and_then(|v| v.i())
        .map_err(jni_error("R.drawable"))
}

fn builder<'local>(
    env: &mut JNIEnv<'local>,
    context: &JObject,
    dialog: &Dialog,
) -> Result<JObject<'local>, DialogError> {
    let builder = env
        .new_object(
            BUILDER_CLASS,
            "(Landroid/content/Context;)V",
            &[JValue::Object(context)],
        )
        .map_err(jni_error("AlertDialog.Builder"))?;

    let title = env.new_string(&dialog.title).map_err(jni_error("new_string"))?;
    let message = env
        .new_string(&dialog.message)
        .map_err(jni_error("new_string"))?;
    let icon = icon(env, dialog.type_)?;

    env.call_method(
        &builder,
        "setTitle",
        format!("(Ljava/lang/CharSequence;){BUILDER_SIG}"),
        &[JValue::Object(&title)],
    )
    .map_err(jni_error("setTitle"))?;
    env.call_method(
        &builder,
        "setMessage",
        format!("(Ljava/lang/CharSequence;){BUILDER_SIG}"),
        &[JValue::Object(&message)],
    )
    .map_err(jni_error("setMessage"))?;
    env.call_method(
        &builder,
        "setIcon",
        format!("(I){BUILDER_SIG}"),
        &[JValue::Int(icon)],
    )
    .map_err(jni_error("setIcon"))?;

    Ok(builder)
}

fn set_button(
    env: &mut JNIEnv,
    builder: &JObject,
    method: &str,
    label: &str,
) -> Result<(), DialogError> {
    let label = env.new_string(label).map_err(jni_error("new_string"))?;
    let no_listener = JObject::null();
    env.call_method(
        builder,
        method,
        format!("(Ljava/lang/CharSequence;Landroid/content/DialogInterface$OnClickListener;){BUILDER_SIG}"),
        &[JValue::Object(&label), JValue::Object(&no_listener)],
    )
    .map_err(jni_error(method))?;
    Ok(())
}

/// Show `dialog` with both buttons. Returns once the dialog is on screen;
/// the choice is not reported.
///
/// # Errors
/// Returns [`DialogError::PlatformError`] if any JNI call fails.
pub fn show_with_context(
    env: &mut JNIEnv,
    context: &JObject,
    dialog: &Dialog,
) -> Result<(), DialogError> {
    let builder = builder(env, context, dialog)?;
    set_button(env, &builder, "setPositiveButton", &dialog.positive)?;
    set_button(env, &builder, "setNegativeButton", &dialog.negative)?;
    env.call_method(&builder, "show", "()Landroid/app/AlertDialog;", &[])
        .map_err(jni_error("show"))?;
    debug!("showing dialog {:?}", dialog.title);
    Ok(())
}

/// Show `dialog` with only its positive button.
///
/// # Errors
/// Returns [`DialogError::PlatformError`] if any JNI call fails.
pub fn show_alert_with_context(
    env: &mut JNIEnv,
    context: &JObject,
    dialog: &Dialog,
) -> Result<(), DialogError> {
    let builder = builder(env, context, dialog)?;
    set_button(env, &builder, "setPositiveButton", &dialog.positive)?;
    env.call_method(&builder, "show", "()Landroid/app/AlertDialog;", &[])
        .map_err(jni_error("show"))?;
    Ok(())
}

/// Show a "Yes"/"No" confirmation of `message`.
///
/// # Errors
/// See [`show_with_context`].
pub fn alert_with_context(
    env: &mut JNIEnv,
    context: &JObject,
    message: &str,
) -> Result<(), DialogError> {
    show_with_context(env, context, &Dialog::confirm(message))
}

/// Needs a `Context`; use [`show_alert_with_context`].
///
/// # Errors
/// Always returns [`DialogError::NotSupported`].
pub async fn show_alert(_dialog: Dialog) -> Result<(), DialogError> {
    Err(DialogError::NotSupported(
        "Android: use show_alert_with_context() with JNIEnv and Context".into(),
    ))
}

/// Needs a `Context`; use [`show_with_context`].
///
/// # Errors
/// Always returns [`DialogError::NotSupported`].
pub async fn show_confirm(_dialog: Dialog) -> Result<bool, DialogError> {
    Err(DialogError::NotSupported(
        "Android: use show_with_context() with JNIEnv and Context".into(),
    ))
}
