//! Native confirmation dialogs.
//!
//! A [`Dialog`] carries a title, a message and two button labels. On desktop
//! it is shown through `rfd`; on Android it must be shown from the UI thread
//! with a `Context` via `sys::android::show_with_context`.
//!
//! ```ignore
//! let confirmed = uvckit_dialog::Dialog::confirm("Start recording?")
//!     .show_confirm()
//!     .await?;
//! ```

#![warn(missing_docs)]

mod error;

/// Platform-specific implementations.
pub mod sys;

pub use error::DialogError;

/// Title used by [`Dialog::confirm`].
pub const DEFAULT_TITLE: &str = "Confirm";

/// Types of dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogType {
    /// Information dialog.
    #[default]
    Info,
    /// Warning dialog.
    Warning,
    /// Error dialog.
    Error,
}

/// A native dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    /// Title of the dialog.
    pub title: String,
    /// Message content of the dialog.
    pub message: String,
    /// Type/Icon of the dialog.
    pub type_: DialogType,
    /// Label of the accepting button.
    pub positive: String,
    /// Label of the declining button.
    pub negative: String,
}

impl Dialog {
    /// Create a new dialog with default Info type and "OK"/"Cancel" buttons.
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            type_: DialogType::Info,
            positive: "OK".to_string(),
            negative: "Cancel".to_string(),
        }
    }

    /// A "Yes"/"No" confirmation with the default title.
    pub fn confirm(message: impl Into<String>) -> Self {
        Self::new(DEFAULT_TITLE, message).with_labels("Yes", "No")
    }

    /// Set the dialog type.
    #[must_use]
    pub const fn with_type(mut self, type_: DialogType) -> Self {
        self.type_ = type_;
        self
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the button labels.
    #[must_use]
    pub fn with_labels(mut self, positive: impl Into<String>, negative: impl Into<String>) -> Self {
        self.positive = positive.into();
        self.negative = negative.into();
        self
    }

    /// Show the dialog with a single acknowledgement button.
    /// Returns when the user dismisses the dialog.
    ///
    /// # Errors
    /// Returns an error if the native dialog fails to show or is not
    /// supported without a platform context.
    pub async fn show(self) -> Result<(), DialogError> {
        sys::show_alert(self).await
    }

    /// Show the dialog with both buttons.
    /// Returns true if the positive button was chosen.
    ///
    /// # Errors
    /// Returns an error if the native dialog fails to show or is not
    /// supported without a platform context.
    pub async fn show_confirm(self) -> Result<bool, DialogError> {
        sys::show_confirm(self).await
    }
}

/// Ask a "Yes"/"No" question with the default title.
///
/// # Errors
/// See [`Dialog::show_confirm`].
pub async fn alert(message: impl Into<String>) -> Result<bool, DialogError> {
    Dialog::confirm(message).show_confirm().await
}
