use tauri::{AppHandle, Manager};

use crate::controller::{Notice, RegionUpdate};
use crate::state::AppState;
use crate::view::tagger::RegionEvent;

/// Tauri command: pointer event on a word region (click, enter, leave)
#[tauri::command]
pub fn region_event(app_handle: AppHandle, id: String, kind: RegionEvent) -> Option<RegionUpdate> {
    let state = app_handle.state::<AppState>();
    let update = state.reader.lock().unwrap().handle_region_event(&id, kind);
    update
}

/// Tauri command: pronounce the text selected in the view.
/// Returns the new status line.
#[tauri::command]
pub fn pronounce_selection(app_handle: AppHandle, selection: Option<String>) -> String {
    let state = app_handle.state::<AppState>();
    let mut reader = state.reader.lock().unwrap();
    if let Some(notice) = reader.pronounce_selection(selection.as_deref()) {
        super::show_notice(&app_handle, &notice);
    }
    reader.status().to_string()
}

#[tauri::command]
pub fn increase_rate(app_handle: AppHandle) -> u32 {
    let state = app_handle.state::<AppState>();
    let rate = state.reader.lock().unwrap().increase_rate();
    rate
}

#[tauri::command]
pub fn decrease_rate(app_handle: AppHandle) -> u32 {
    let state = app_handle.state::<AppState>();
    let rate = state.reader.lock().unwrap().decrease_rate();
    rate
}

#[tauri::command]
pub fn reset_rate(app_handle: AppHandle) -> u32 {
    let state = app_handle.state::<AppState>();
    let (notice, rate) = {
        let mut reader = state.reader.lock().unwrap();
        (reader.reset_rate(), reader.rate().get())
    };
    super::show_notice(&app_handle, &notice);
    rate
}

/// Voice selection follows the system default.
pub fn change_voice(app_handle: &AppHandle) {
    super::show_notice(
        app_handle,
        &Notice::info("Voice Settings", "Using the system default voice"),
    );
}

/// The toolbar stepper is the only rate control.
pub fn adjust_rate(app_handle: &AppHandle) {
    let rate = app_handle.state::<AppState>().reader.lock().unwrap().rate();
    super::show_notice(
        app_handle,
        &Notice::info(
            "Speech Rate",
            format!("Current speech rate is {rate}; use the toolbar stepper to change it"),
        ),
    );
}
