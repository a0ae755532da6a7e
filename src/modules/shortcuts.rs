// Keyboard shortcuts and native-menu accelerators. Pure mapping, no Tauri imports.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Shortcut {
    NewTab,
    CloseTab,
    Reload,
    FocusAddressBar,
    Back,
    Forward,
}

impl Shortcut {
    pub const ALL: [Shortcut; 6] = [
        Self::NewTab,
        Self::CloseTab,
        Self::Reload,
        Self::FocusAddressBar,
        Self::Back,
        Self::Forward,
    ];

    /// Maps a key pressed together with Ctrl (Cmd on macOS).
    pub fn from_key(key: &str, primary_modifier: bool) -> Option<Self> {
        if !primary_modifier {
            return None;
        }
        match key.to_ascii_lowercase().as_str() {
            "t" => Some(Self::NewTab),
            "w" => Some(Self::CloseTab),
            "r" => Some(Self::Reload),
            "l" => Some(Self::FocusAddressBar),
            "[" => Some(Self::Back),
            "]" => Some(Self::Forward),
            _ => None,
        }
    }

    pub fn menu_id(&self) -> &'static str {
        match self {
            Self::NewTab => "new_tab",
            Self::CloseTab => "close_tab",
            Self::Reload => "reload",
            Self::FocusAddressBar => "focus_location",
            Self::Back => "go_back",
            Self::Forward => "go_forward",
        }
    }

    pub fn from_menu_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.menu_id() == id)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NewTab => "New Tab",
            Self::CloseTab => "Close Tab",
            Self::Reload => "Reload Page",
            Self::FocusAddressBar => "Open Location",
            Self::Back => "Back",
            Self::Forward => "Forward",
        }
    }

    pub fn accelerator(&self) -> &'static str {
        match self {
            Self::NewTab => "CmdOrCtrl+T",
            Self::CloseTab => "CmdOrCtrl+W",
            Self::Reload => "CmdOrCtrl+R",
            Self::FocusAddressBar => "CmdOrCtrl+L",
            Self::Back => "CmdOrCtrl+[",
            Self::Forward => "CmdOrCtrl+]",
        }
    }
}
