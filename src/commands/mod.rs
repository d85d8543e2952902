pub mod document;
pub mod settings;
pub mod speech;

use tauri::{AppHandle, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

use crate::controller::{Notice, NoticeKind};

/// Label of the reader window in `tauri.conf.json`; dialogs are modal to it.
pub const MAIN_WINDOW: &str = "main";

/// Show a notice as a modal message dialog.
pub fn show_notice(app_handle: &AppHandle, notice: &Notice) {
    let kind = match notice.kind {
        NoticeKind::Info => MessageDialogKind::Info,
        NoticeKind::Error => MessageDialogKind::Error,
    };
    let mut dialog = app_handle
        .dialog()
        .message(notice.message.clone())
        .title(notice.title.clone())
        .kind(kind);
    if let Some(window) = app_handle.get_webview_window(MAIN_WINDOW) {
        dialog = dialog.parent(&window);
    }
    dialog.show(|_| {});
}
