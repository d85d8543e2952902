use tauri::menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem, Submenu};
use tauri::{AppHandle, Manager, Runtime};

use crate::commands;

pub const OPEN: &str = "open";
pub const EXIT: &str = "exit";
pub const CHANGE_VOICE: &str = "change_voice";
pub const ADJUST_RATE: &str = "adjust_rate";

/// Window menu: File (Open, Exit) and Voice Settings (Change Voice, Adjust Rate)
pub fn build<R: Runtime, M: Manager<R>>(manager: &M) -> tauri::Result<Menu<R>> {
    let open = MenuItem::with_id(manager, OPEN, "Open Word File...", true, Some("CmdOrCtrl+O"))?;
    let exit = MenuItem::with_id(manager, EXIT, "Exit", true, Some("CmdOrCtrl+Q"))?;
    let separator = PredefinedMenuItem::separator(manager)?;
    let file_menu = Submenu::with_items(manager, "File", true, &[&open, &separator, &exit])?;

    let change_voice =
        MenuItem::with_id(manager, CHANGE_VOICE, "Change Voice", true, None::<&str>)?;
    let adjust_rate = MenuItem::with_id(manager, ADJUST_RATE, "Adjust Rate", true, None::<&str>)?;
    let voice_menu =
        Submenu::with_items(manager, "Voice Settings", true, &[&change_voice, &adjust_rate])?;

    // macOS shows the first submenu under the application name.
    #[cfg(target_os = "macos")]
    {
        let app_menu = Submenu::with_items(
            manager,
            "Vocabulary Reader",
            true,
            &[&PredefinedMenuItem::about(manager, None, None)?, &PredefinedMenuItem::quit(manager, None)?],
        )?;
        return Menu::with_items(manager, &[&app_menu, &file_menu, &voice_menu]);
    }

    #[cfg(not(target_os = "macos"))]
    Menu::with_items(manager, &[&file_menu, &voice_menu])
}

pub fn handle_menu_event(app: &AppHandle, event: MenuEvent) {
    match event.id.as_ref() {
        OPEN => commands::document::prompt_open(app),
        EXIT => {
            tracing::info!("Exit requested from menu");
            app.exit(0);
        }
        CHANGE_VOICE => commands::speech::change_voice(app),
        ADJUST_RATE => commands::speech::adjust_rate(app),
        other => tracing::debug!("Unhandled menu item: {}", other),
    }
}
