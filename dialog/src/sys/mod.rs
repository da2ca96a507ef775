#[cfg(any(target_os = "windows", target_os = "linux", target_os = "macos"))]
mod desktop;
#[cfg(any(target_os = "windows", target_os = "linux", target_os = "macos"))]
pub use desktop::{show_alert, show_confirm};

/// Android dialogs, shown from the UI thread with a `Context`.
#[cfg(target_os = "android")]
pub mod android;
#[cfg(target_os = "android")]
pub use android::{show_alert, show_confirm};

#[cfg(not(any(
    target_os = "android",
    target_os = "windows",
    target_os = "linux",
    target_os = "macos"
)))]
mod unsupported {
    use crate::{Dialog, DialogError};

    /// Dialogs are not available on this platform.
    ///
    /// # Errors
    /// Always returns [`DialogError::NotSupported`].
    pub async fn show_alert(_dialog: Dialog) -> Result<(), DialogError> {
        Err(DialogError::NotSupported("dialogs on this platform".into()))
    }

    /// Dialogs are not available on this platform.
    ///
    /// # Errors
    /// Always returns [`DialogError::NotSupported`].
    pub async fn show_confirm(_dialog: Dialog) -> Result<bool, DialogError> {
        Err(DialogError::NotSupported("dialogs on this platform".into()))
    }
}
#[cfg(not(any(
    target_os = "android",
    target_os = "windows",
    target_os = "linux",
    target_os = "macos"
)))]
pub use unsupported::{show_alert, show_confirm};
