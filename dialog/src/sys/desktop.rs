use crate::{Dialog, DialogError, DialogType};
use futures::channel::oneshot;
use log::debug;
use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

const fn level(type_: DialogType) -> MessageLevel {
    match type_ {
        DialogType::Info => MessageLevel::Info,
        DialogType::Warning => MessageLevel::Warning,
        DialogType::Error => MessageLevel::Error,
    }
}

fn confirmed(result: &MessageDialogResult, positive: &str) -> bool {
    match result {
        MessageDialogResult::Ok | MessageDialogResult::Yes => true,
        MessageDialogResult::Custom(label) => label == positive,
        MessageDialogResult::No | MessageDialogResult::Cancel => false,
    }
}

/// Show an alert dialog with a single button labelled with the dialog's
/// positive label.
///
/// # Errors
/// Returns an error if the native dialog fails to show.
pub async fn show_alert(dialog: Dialog) -> Result<(), DialogError> {
    let (tx, rx) = oneshot::channel();

    std::thread::spawn(move || {
        MessageDialog::new()
            .set_level(level(dialog.type_))
            .set_title(&dialog.title)
            .set_description(&dialog.message)
            .set_buttons(MessageButtons::OkCustom(dialog.positive))
            .show();

        let _ = tx.send(());
    });

    rx.await
        .map_err(|_| DialogError::PlatformError("Dialog panicked or channel closed".into()))
}

/// Show a confirmation dialog.
///
/// # Errors
/// Returns an error if the native dialog fails to show.
pub async fn show_confirm(dialog: Dialog) -> Result<bool, DialogError> {
    let (tx, rx) = oneshot::channel();

    std::thread::spawn(move || {
        let buttons = if dialog.positive == "Yes" && dialog.negative == "No" {
            MessageButtons::YesNo
        } else {
            MessageButtons::OkCancelCustom(dialog.positive.clone(), dialog.negative.clone())
        };

        let result = MessageDialog::new()
            .set_level(level(dialog.type_))
            .set_title(&dialog.title)
            .set_description(&dialog.message)
            .set_buttons(buttons)
            .show();
        let accepted = confirmed(&result, &dialog.positive);
        debug!("dialog {:?} closed, accepted: {accepted}", dialog.title);

        let _ = tx.send(accepted);
    });

    rx.await
        .map_err(|_| DialogError::PlatformError("Dialog panicked or channel closed".into()))
}
