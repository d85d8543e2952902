mod commands;
mod controller;
mod document;
mod menu;
mod persistence;
mod speech;
mod state;
mod view;
mod vocabulary;

use state::AppState;
use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt::init();

    tracing::info!("Starting Vocabulary Reader v{}", env!("CARGO_PKG_VERSION"));

    tauri::Builder::default()
        .plugin(tauri_plugin_store::Builder::new().build())
        .plugin(tauri_plugin_dialog::init())
        .manage(AppState::new())
        .invoke_handler(tauri::generate_handler![
            commands::document::open_document,
            commands::document::load_document,
            commands::document::get_view,
            commands::speech::region_event,
            commands::speech::pronounce_selection,
            commands::speech::increase_rate,
            commands::speech::decrease_rate,
            commands::speech::reset_rate,
            commands::settings::get_settings,
            commands::settings::update_settings,
            commands::settings::get_app_version,
        ])
        .setup(|app| {
            let loaded = persistence::load_settings(app.handle());
            {
                let state = app.state::<AppState>();
                state.apply_settings(loaded);
                let backends = state.reader.lock().unwrap().backend_names().join(" -> ");
                tracing::info!("Settings loaded from store; speech chain: {}", backends);
            }

            let menu = menu::build(app.handle())?;
            app.handle().set_menu(menu)?;
            app.handle().on_menu_event(menu::handle_menu_event);

            tracing::info!("App setup complete");

            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
