use thiserror::Error;

/// Errors that can occur when using dialogs.
///
/// A dismissed dialog is not an error: confirmations resolve to `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DialogError {
    /// An error occurred in the underlying platform implementation.
    #[error("Platform error: {0}")]
    PlatformError(String),

    /// The requested feature is not supported on this platform.
    #[error("Not supported: {0}")]
    NotSupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_carries_its_cause() {
        let errors = [
            DialogError::PlatformError("JNI error show: detached".into()),
            DialogError::NotSupported("dialogs on this platform".into()),
        ];

        for error in errors {
            let cause = match &error {
                DialogError::PlatformError(cause) | DialogError::NotSupported(cause) => cause,
            };
            assert!(error.to_string().ends_with(cause.as_str()));
        }
    }
}
