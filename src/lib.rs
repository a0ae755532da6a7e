// Tabbed Shell Library Entry Point
// This file exposes all modules so they can be imported by main.rs
// and tested independently.

// Tauri-facing modules
pub mod browser;
pub mod settings;
pub mod webview_host;

// Shared state
pub mod state;

// Pure logic modules (no Tauri imports)
pub mod modules;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    tauri::Builder::default()
        .plugin(tauri_plugin_log::Builder::default().level(level).build())
        .setup(|app| browser::setup(app))
        .invoke_handler(tauri::generate_handler![browser::ui_gesture, browser::chrome_ready])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
