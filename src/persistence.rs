use std::path::Path;
use std::sync::Arc;

use tauri::{AppHandle, Manager, Wry};
use tauri_plugin_store::{Store, StoreExt};

use crate::state::{AppState, Settings};

const STORE_FILE: &str = "settings.json";
const SETTINGS_KEY: &str = "settings";

fn open_store(app_handle: &AppHandle) -> Option<Arc<Store<Wry>>> {
    app_handle
        .store(STORE_FILE)
        .inspect_err(|e| tracing::warn!("Settings store {} unavailable: {}", STORE_FILE, e))
        .ok()
}

/// Stored settings, or defaults when the store is missing or unreadable.
pub fn load_settings(app_handle: &AppHandle) -> Settings {
    let Some(value) = open_store(app_handle).and_then(|store| store.get(SETTINGS_KEY)) else {
        tracing::info!("No stored settings found. Using defaults.");
        return Settings::default();
    };

    serde_json::from_value::<Settings>(value).unwrap_or_else(|e| {
        tracing::warn!("Stored settings are invalid: {}. Using defaults.", e);
        Settings::default()
    })
}

/// Write the managed settings to disk.
pub fn save_settings(app_handle: &AppHandle) {
    let settings = app_handle.state::<AppState>().settings.lock().unwrap().clone();
    let Some(store) = open_store(app_handle) else {
        return;
    };

    let value = match serde_json::to_value(&settings) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Failed to serialize settings: {}", e);
            return;
        }
    };
    store.set(SETTINGS_KEY, value);
    if let Err(e) = store.save() {
        tracing::error!("Failed to save settings to {}: {}", STORE_FILE, e);
    }
}

/// Remember the folder of a document that opened successfully.
pub fn remember_directory(app_handle: &AppHandle, document: &Path) {
    let Some(dir) = document.parent().filter(|d| !d.as_os_str().is_empty()) else {
        return;
    };
    {
        let state = app_handle.state::<AppState>();
        let mut settings = state.settings.lock().unwrap();
        if settings.general.last_directory.as_deref() == Some(dir) {
            return;
        }
        settings.general.last_directory = Some(dir.to_path_buf());
    }
    save_settings(app_handle);
}
