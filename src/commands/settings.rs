use tauri::{AppHandle, Manager};

use crate::persistence;
use crate::state::{AppState, Settings};

#[tauri::command]
pub fn get_settings(app_handle: AppHandle) -> Result<Settings, String> {
    let state = app_handle.state::<AppState>();
    let settings = state.settings.lock().unwrap().clone();
    Ok(settings)
}

/// Replace the settings, rebuild the speech chain and persist.
#[tauri::command]
pub fn update_settings(app_handle: AppHandle, settings: Settings) -> Result<(), String> {
    if settings.speech.command.trim().is_empty() {
        return Err("Speech command must not be empty".into());
    }
    app_handle.state::<AppState>().apply_settings(settings);
    persistence::save_settings(&app_handle);
    tracing::info!("Settings updated");
    Ok(())
}

#[tauri::command]
pub fn get_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
