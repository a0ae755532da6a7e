// UI Controller - the unprivileged side. No Tauri imports.
//
// Keeps a read-through mirror of the tabs for rendering, turns gestures into
// protocol commands, and applies events pushed back by the Coordinator. The
// mirror is never authoritative: events overwrite it.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::modules::navigation::normalize_address;
use crate::modules::protocol::{Command, Event};
use crate::modules::shortcuts::Shortcut;
use crate::settings::SearchEngine;
use crate::state::{NavigationState, TabId, TabIds, DEFAULT_TAB_TITLE};

/// Outbound half of the protocol as seen from the UI.
pub trait CoordinatorLink {
    fn send(&mut self, command: Command);
    /// Synchronous; must answer promptly.
    fn navigation_state(&mut self, tab_id: TabId) -> NavigationState;
}

/// Whatever actually draws the tab strip and toolbar.
pub trait Surface {
    fn render(&mut self, state: &ChromeState);
    fn focus_address_bar(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabView {
    pub id: TabId,
    pub url: String,
    pub title: String,
    pub loading: bool,
}

/// Everything the surface needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChromeState {
    pub tabs: Vec<TabView>,
    pub active_tab_id: Option<TabId>,
    /// False while waiting for the replacement of a closed last tab.
    pub has_active_tab: bool,
    pub address: String,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

/// User input as reported by the surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Gesture {
    #[serde(rename_all = "camelCase")]
    SelectTab { tab_id: TabId },
    #[serde(rename_all = "camelCase")]
    CloseTab { tab_id: TabId },
    NewTab,
    /// Enter in the address bar, or the Go button.
    Submit { text: String },
    Back,
    Forward,
    Reload,
    Home,
    Key { key: String, primary: bool },
    Shortcut { shortcut: Shortcut },
}

pub struct UiController<L, S> {
    link: L,
    surface: S,
    ids: TabIds,
    home_url: String,
    search_engine: SearchEngine,
    tabs: Vec<TabView>,
    active: Option<TabId>,
    address: String,
    nav: NavigationState,
}

impl<L: CoordinatorLink, S: Surface> UiController<L, S> {
    pub fn new(
        link: L,
        surface: S,
        ids: TabIds,
        home_url: impl Into<String>,
        search_engine: SearchEngine,
    ) -> Self {
        Self {
            link,
            surface,
            ids,
            home_url: home_url.into(),
            search_engine,
            tabs: Vec::new(),
            active: None,
            address: String::new(),
            nav: NavigationState::default(),
        }
    }

    /// Opens the first tab at the home location.
    pub fn start(&mut self) {
        info!("[UI] Starting with home {}", self.home_url);
        let home = self.home_url.clone();
        self.create_tab(&home);
        self.render();
    }

    pub fn handle_gesture(&mut self, gesture: Gesture) {
        debug!("[UI] gesture {:?}", gesture);
        match gesture {
            Gesture::SelectTab { tab_id } => self.switch_tab(tab_id),
            Gesture::CloseTab { tab_id } => self.close_tab(tab_id),
            Gesture::NewTab => self.new_tab(),
            Gesture::Submit { text } => self.navigate_to(&text),
            Gesture::Back => self.send_to_active(|tab_id| Command::GoBack { tab_id }),
            Gesture::Forward => self.send_to_active(|tab_id| Command::GoForward { tab_id }),
            Gesture::Reload => self.send_to_active(|tab_id| Command::Reload { tab_id }),
            Gesture::Home => {
                let home = self.home_url.clone();
                self.navigate_to(&home);
            }
            Gesture::Key { key, primary } => {
                if let Some(shortcut) = Shortcut::from_key(&key, primary) {
                    self.run_shortcut(shortcut);
                }
            }
            Gesture::Shortcut { shortcut } => self.run_shortcut(shortcut),
        }
        self.render();
    }

    pub fn handle_event(&mut self, event: Event) {
        debug!("[UI] event {:?}", event);
        match event {
            Event::TabCreated { tab_id, url } => {
                if self.find(tab_id).is_none() {
                    self.ids.observe(tab_id);
                    self.tabs.push(TabView {
                        id: tab_id,
                        url,
                        title: DEFAULT_TAB_TITLE.to_string(),
                        loading: false,
                    });
                }
                if self.active.is_none() {
                    self.switch_tab(tab_id);
                }
            }
            Event::TabNavigated { tab_id, url } => {
                if let Some(index) = self.find(tab_id) {
                    self.tabs[index].url = url.clone();
                }
                if self.active == Some(tab_id) {
                    self.address = url;
                }
                self.refresh_navigation_buttons();
            }
            Event::TabTitleUpdated { tab_id, title } => {
                if let Some(index) = self.find(tab_id) {
                    self.tabs[index].title = title;
                }
            }
            Event::TabLoading { tab_id, loading } => {
                if let Some(index) = self.find(tab_id) {
                    self.tabs[index].loading = loading;
                }
                if self.active == Some(tab_id) {
                    self.refresh_navigation_buttons();
                }
            }
            Event::TabClosed { tab_id } => {
                if self.find(tab_id).is_some() {
                    info!("[UI] Coordinator dropped tab {}", tab_id);
                    self.forget_tab(tab_id);
                }
            }
        }
        self.render();
    }

    pub fn state(&self) -> ChromeState {
        ChromeState {
            tabs: self.tabs.clone(),
            active_tab_id: self.active,
            has_active_tab: self.active.is_some(),
            address: self.address.clone(),
            can_go_back: self.nav.can_go_back,
            can_go_forward: self.nav.can_go_forward,
        }
    }

    pub fn active(&self) -> Option<TabId> {
        self.active
    }

    pub fn new_tab(&mut self) {
        let home = self.home_url.clone();
        self.create_tab(&home);
    }

    pub fn create_tab(&mut self, url: &str) -> TabId {
        let tab_id = self.ids.next();
        self.tabs.push(TabView {
            id: tab_id,
            url: url.to_string(),
            title: DEFAULT_TAB_TITLE.to_string(),
            loading: false,
        });
        self.link.send(Command::CreateTab {
            tab_id,
            url: url.to_string(),
        });
        self.switch_tab(tab_id);
        tab_id
    }

    pub fn switch_tab(&mut self, tab_id: TabId) {
        let Some(index) = self.find(tab_id) else {
            return;
        };
        self.active = Some(tab_id);
        self.link.send(Command::SwitchTab { tab_id });
        self.address = self.tabs[index].url.clone();
        self.refresh_navigation_buttons();
    }

    pub fn close_tab(&mut self, tab_id: TabId) {
        if self.find(tab_id).is_none() {
            return;
        }
        self.link.send(Command::CloseTab { tab_id });
        self.forget_tab(tab_id);
    }

    /// Drops `tab_id` from the mirror and, if it was active, moves to its left
    /// neighbour.
    fn forget_tab(&mut self, tab_id: TabId) {
        let Some(index) = self.find(tab_id) else {
            return;
        };
        self.tabs.remove(index);

        if self.active != Some(tab_id) {
            return;
        }
        if self.tabs.is_empty() {
            // The Coordinator opens the replacement and announces it with tab-created.
            self.active = None;
            self.address.clear();
            self.nav = NavigationState::default();
        } else {
            let next = self.tabs[index.saturating_sub(1)].id;
            self.switch_tab(next);
        }
    }

    /// Normalizes address-bar text and loads it in the active tab.
    pub fn navigate_to(&mut self, input: &str) {
        let Some(tab_id) = self.active else {
            return;
        };
        let url = normalize_address(input, self.search_engine);
        if let Some(index) = self.find(tab_id) {
            self.tabs[index].url = url.clone();
        }
        self.address = url.clone();
        self.link.send(Command::Navigate { tab_id, url });
    }

    fn run_shortcut(&mut self, shortcut: Shortcut) {
        match shortcut {
            Shortcut::NewTab => self.new_tab(),
            Shortcut::CloseTab => {
                if let Some(tab_id) = self.active {
                    self.close_tab(tab_id);
                }
            }
            Shortcut::Reload => self.send_to_active(|tab_id| Command::Reload { tab_id }),
            Shortcut::Back => self.send_to_active(|tab_id| Command::GoBack { tab_id }),
            Shortcut::Forward => self.send_to_active(|tab_id| Command::GoForward { tab_id }),
            Shortcut::FocusAddressBar => self.surface.focus_address_bar(),
        }
    }

    fn send_to_active(&mut self, command: impl FnOnce(TabId) -> Command) {
        if let Some(tab_id) = self.active {
            self.link.send(command(tab_id));
        }
    }

    fn refresh_navigation_buttons(&mut self) {
        if let Some(tab_id) = self.active {
            self.nav = self.link.navigation_state(tab_id);
        }
    }

    pub fn render(&mut self) {
        let state = self.state();
        self.surface.render(&state);
    }

    fn find(&self, tab_id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }
}
