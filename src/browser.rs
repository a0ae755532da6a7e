// Application wiring: builds the window, menu and both loops, and exposes the
// two commands the chrome page may call.

use log::{info, warn};
use tauri::menu::{MenuBuilder, MenuItemBuilder, PredefinedMenuItem, SubmenuBuilder};
use tauri::{App, AppHandle, Emitter, LogicalSize, Manager, State, WindowEvent};
use tokio::sync::mpsc::unbounded_channel;

use crate::modules::host::WindowSize;
use crate::modules::runtime::{run_coordinator, run_ui, ChannelLink, CoordinatorInput, UiInput};
use crate::modules::shortcuts::Shortcut;
use crate::modules::tabs::Coordinator;
use crate::modules::ui::{ChromeState, Gesture, Surface, UiController};
use crate::settings::Settings;
use crate::state::{AppState, TabIds};
use crate::webview_host::TauriHost;

const CHROME_LABEL: &str = "main";

/// Draws into the chrome page by pushing it events.
struct ChromeSurface {
    app: AppHandle,
}

impl Surface for ChromeSurface {
    fn render(&mut self, state: &ChromeState) {
        if let Err(e) = self.app.emit_to(CHROME_LABEL, "chrome-state", state) {
            warn!("[UI] render failed: {}", e);
        }
    }

    fn focus_address_bar(&mut self) {
        // Window first, then the chrome webview, then the DOM element.
        if let Some(window) = self.app.get_window(CHROME_LABEL) {
            let _ = window.set_focus();
        }
        if let Some(webview) = self.app.get_webview(CHROME_LABEL) {
            let _ = webview.set_focus();
        }
        let _ = self.app.emit_to(CHROME_LABEL, "focus-url-bar", ());
    }
}

fn build_menu(app: &App) -> tauri::Result<()> {
    let item = |shortcut: Shortcut| {
        MenuItemBuilder::with_id(shortcut.menu_id(), shortcut.label())
            .accelerator(shortcut.accelerator())
            .build(app)
    };

    let app_menu = SubmenuBuilder::new(app, "Tabbed Shell")
        .item(&PredefinedMenuItem::about(app, Some("About Tabbed Shell"), None)?)
        .separator()
        .item(&PredefinedMenuItem::quit(app, Some("Quit Tabbed Shell"))?)
        .build()?;

    let file_menu = SubmenuBuilder::new(app, "File")
        .item(&item(Shortcut::NewTab)?)
        .item(&item(Shortcut::CloseTab)?)
        .build()?;

    let edit_menu = SubmenuBuilder::new(app, "Edit")
        .item(&PredefinedMenuItem::undo(app, Some("Undo"))?)
        .item(&PredefinedMenuItem::redo(app, Some("Redo"))?)
        .separator()
        .item(&PredefinedMenuItem::cut(app, Some("Cut"))?)
        .item(&PredefinedMenuItem::copy(app, Some("Copy"))?)
        .item(&PredefinedMenuItem::paste(app, Some("Paste"))?)
        .item(&PredefinedMenuItem::select_all(app, Some("Select All"))?)
        .build()?;

    let view_menu = SubmenuBuilder::new(app, "View")
        .item(&item(Shortcut::FocusAddressBar)?)
        .item(&item(Shortcut::Reload)?)
        .build()?;

    let history_menu = SubmenuBuilder::new(app, "History")
        .item(&item(Shortcut::Back)?)
        .item(&item(Shortcut::Forward)?)
        .build()?;

    let menu = MenuBuilder::new(app)
        .items(&[&app_menu, &file_menu, &edit_menu, &view_menu, &history_menu])
        .build()?;
    app.set_menu(menu)?;
    Ok(())
}

pub fn setup(app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
    let handle = app.handle().clone();
    let settings = Settings::load(&handle);
    info!("[Setup] home={} engine={:?}", settings.homepage, settings.search_engine);

    let main_window = app
        .get_window(CHROME_LABEL)
        .ok_or("main window missing from config")?;
    main_window.set_size(LogicalSize::new(settings.window_width, settings.window_height))?;

    build_menu(app)?;

    let (coordinator_tx, coordinator_rx) = unbounded_channel::<CoordinatorInput>();
    let (ui_tx, ui_rx) = unbounded_channel::<UiInput>();
    let ids = TabIds::new();

    // --- Coordinator loop (owns every content view) ---
    let host = TauriHost::new(
        main_window.clone(),
        coordinator_tx.clone(),
        WindowSize {
            width: settings.window_width,
            height: settings.window_height,
        },
    );
    let coordinator = Coordinator::new(host, ids.clone(), settings.homepage.clone(), settings.chrome_height);
    tauri::async_runtime::spawn(run_coordinator(coordinator, coordinator_rx, ui_tx.clone()));

    // --- UI loop (mirror + gestures) ---
    let ui = UiController::new(
        ChannelLink::new(coordinator_tx.clone()),
        ChromeSurface { app: handle.clone() },
        ids,
        settings.homepage.clone(),
        settings.search_engine,
    );
    std::thread::Builder::new()
        .name("ui-controller".into())
        .spawn(move || run_ui(ui, ui_rx))?;

    // Handle Window Resizing
    let resize_tx = coordinator_tx;
    main_window.on_window_event(move |event| {
        if let WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } = event {
            let _ = resize_tx.send(CoordinatorInput::WindowResized);
        }
    });

    // Menu accelerators arrive as shortcut gestures
    let menu_tx = ui_tx.clone();
    app.on_menu_event(move |_app_handle, event| {
        if let Some(shortcut) = Shortcut::from_menu_id(event.id().0.as_str()) {
            let _ = menu_tx.send(UiInput::Gesture(Gesture::Shortcut { shortcut }));
        }
    });

    app.manage(AppState { ui: ui_tx });
    Ok(())
}

/// Raw user input from the chrome page.
#[tauri::command]
pub fn ui_gesture(state: State<AppState>, gesture: Gesture) -> Result<(), String> {
    state
        .ui
        .send(UiInput::Gesture(gesture))
        .map_err(|e| e.to_string())
}

/// The chrome page is listening; send it a full frame.
#[tauri::command]
pub fn chrome_ready(state: State<AppState>) -> Result<(), String> {
    state.ui.send(UiInput::Redraw).map_err(|e| e.to_string())
}
