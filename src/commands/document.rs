use std::path::Path;

use tauri::{AppHandle, Emitter, Manager};
use tauri_plugin_dialog::DialogExt;

use crate::persistence;
use crate::state::AppState;
use crate::view::ViewSnapshot;

/// Tauri command: ask for a document and load it
#[tauri::command]
pub fn open_document(app_handle: AppHandle) {
    prompt_open(&app_handle);
}

/// Tauri command: load a document from a known path
#[tauri::command]
pub fn load_document(app_handle: AppHandle, path: String) -> Result<ViewSnapshot, String> {
    load_and_publish(&app_handle, Path::new(&path))
}

/// Tauri command: current view contents
#[tauri::command]
pub fn get_view(app_handle: AppHandle) -> ViewSnapshot {
    let state = app_handle.state::<AppState>();
    let snapshot = state.reader.lock().unwrap().snapshot();
    snapshot
}

/// Show the open dialog; the chosen file is loaded when the dialog closes.
pub fn prompt_open(app_handle: &AppHandle) {
    let start_dir = {
        let state = app_handle.state::<AppState>();
        let dir = state.settings.lock().unwrap().general.dialog_directory();
        dir
    };

    let mut dialog = app_handle
        .dialog()
        .file()
        .add_filter("Word Document", &["docx"])
        .add_filter("All Files", &["*"]);
    if let Some(dir) = start_dir {
        dialog = dialog.set_directory(dir);
    }
    if let Some(window) = app_handle.get_webview_window(super::MAIN_WINDOW) {
        dialog = dialog.set_parent(&window);
    }

    let handle = app_handle.clone();
    dialog.pick_file(move |picked| {
        let Some(picked) = picked else {
            tracing::info!("Open dialog cancelled");
            return;
        };
        match picked.into_path() {
            Ok(path) => {
                let _ = load_and_publish(&handle, &path);
            }
            Err(e) => tracing::warn!("Unusable path from open dialog: {}", e),
        }
    });
}

/// Load `path` into the reader. On success the new view is emitted as
/// `view-updated`; on failure an error dialog is shown and nothing changes.
pub fn load_and_publish(app_handle: &AppHandle, path: &Path) -> Result<ViewSnapshot, String> {
    let state = app_handle.state::<AppState>();
    let (notice, snapshot) = {
        let mut reader = state.reader.lock().unwrap();
        let notice = reader.open_or_notice(path);
        (notice, reader.snapshot())
    };

    if let Some(notice) = notice {
        super::show_notice(app_handle, &notice);
        return Err(notice.message);
    }

    persistence::remember_directory(app_handle, path);
    let _ = app_handle.emit("view-updated", &snapshot);
    Ok(snapshot)
}
