// Tab registry and active-view state machine - pure logic, no Tauri imports.
// Follows strict modular monolith pattern: the host is reached only through
// the traits in `host.rs`.

use log::{debug, error, info, warn};

use crate::modules::host::{Bounds, ContentView, Host, HostSignal};
use crate::modules::protocol::{Command, Event};
use crate::state::{NavigationState, Tab, TabId, TabIds};

struct Entry<V> {
    tab: Tab,
    view: V,
    attached: bool,
}

/// Owns the window, every content view, and the active-tab pointer.
///
/// Invariants held after every public call:
/// - registry ids are exactly the ids of live content views;
/// - a non-empty registry has exactly one active tab;
/// - only the active tab's view is attached to the window.
///
/// Every operation on an unknown id is a no-op. The UI may be a step ahead
/// of us (closing a tab while a switch is still queued) and that must not
/// take the process down.
pub struct Coordinator<H: Host> {
    host: H,
    tabs: Vec<Entry<H::View>>,
    active: Option<TabId>,
    ids: TabIds,
    home_url: String,
    chrome_height: u32,
    outbox: Vec<Event>,
}

impl<H: Host> Coordinator<H> {
    pub fn new(host: H, ids: TabIds, home_url: impl Into<String>, chrome_height: u32) -> Self {
        Self {
            host,
            tabs: Vec::new(),
            active: None,
            ids,
            home_url: home_url.into(),
            chrome_height,
            outbox: Vec::new(),
        }
    }

    /// Opens a tab under a fresh id and makes it active.
    pub fn create(&mut self, url: &str) -> Option<TabId> {
        let tab_id = self.ids.next();
        self.create_with_id(tab_id, url).then_some(tab_id)
    }

    /// Opens a tab under an id the caller allocated. Returns false if nothing was created.
    pub fn create_with_id(&mut self, tab_id: TabId, url: &str) -> bool {
        self.ids.observe(tab_id);
        if self.position(tab_id).is_some() {
            warn!("[Coordinator] create for existing tab {}, ignoring", tab_id);
            return false;
        }

        let view = match self.host.create_view(tab_id, url) {
            Ok(view) => view,
            Err(e) => {
                error!("[Coordinator] {}", e);
                // The UI has already listed this id; take it back out.
                self.outbox.push(Event::TabClosed { tab_id });
                if self.tabs.is_empty() && url != self.home_url {
                    let home = self.home_url.clone();
                    self.create(&home);
                }
                return false;
            }
        };

        info!("[Coordinator] Created tab {} -> {}", tab_id, url);
        self.tabs.push(Entry {
            tab: Tab::new(tab_id, url),
            view,
            attached: false,
        });
        self.outbox.push(Event::TabCreated {
            tab_id,
            url: url.to_string(),
        });
        self.switch(tab_id);
        true
    }

    /// Shows `tab_id` in the window, hiding (not destroying) whatever was shown.
    pub fn switch(&mut self, tab_id: TabId) {
        let Some(target) = self.position(tab_id) else {
            debug!("[Coordinator] switch to unknown tab {}", tab_id);
            return;
        };

        let previous = self
            .active
            .and_then(|id| self.position(id))
            .filter(|&current| current != target);

        if let Some(current) = previous {
            if !self.detach_at(current) {
                warn!("[Coordinator] tab {} is still shown, staying on it", self.tabs[current].tab.id);
                return;
            }
        }
        if !self.attach_at(target) {
            if let Some(current) = previous {
                self.attach_at(current);
                return;
            }
            // Nothing else to show; keep the pointer on the only candidate.
        }
        self.active = Some(tab_id);
        self.apply_bounds(target);
        debug!("[Coordinator] Active tab is now {}", tab_id);
    }

    /// Destroys `tab_id`. If it was active, its left neighbour takes over; if it
    /// was the last tab, a fresh one is opened at the home location.
    pub fn close(&mut self, tab_id: TabId) {
        let Some(index) = self.position(tab_id) else {
            debug!("[Coordinator] close of unknown tab {}", tab_id);
            return;
        };

        // Order matters: detach, then destroy, then drop from the registry.
        if !self.detach_at(index) {
            error!("[Coordinator] tab {} could not be hidden, keeping it", tab_id);
            let url = self.tabs[index].tab.url.clone();
            self.outbox.push(Event::TabCreated { tab_id, url });
            return;
        }
        if let Err(e) = self.tabs[index].view.destroy() {
            warn!("[Coordinator] destroy tab {} failed: {}", tab_id, e);
        }
        self.tabs.remove(index);
        self.outbox.push(Event::TabClosed { tab_id });
        info!("[Coordinator] Closed tab {}", tab_id);

        if self.active != Some(tab_id) {
            return;
        }
        self.active = None;

        if self.tabs.is_empty() {
            let home = self.home_url.clone();
            self.create(&home);
        } else {
            let next = self.tabs[index.saturating_sub(1)].tab.id;
            self.switch(next);
        }
    }

    /// Starts loading `url` and caches it optimistically. The confirmed
    /// location arrives later as a navigation signal.
    pub fn navigate(&mut self, tab_id: TabId, url: &str) {
        let Some(index) = self.position(tab_id) else {
            debug!("[Coordinator] navigate on unknown tab {}", tab_id);
            return;
        };
        let entry = &mut self.tabs[index];
        if let Err(e) = entry.view.load(url) {
            warn!("[Coordinator] load {} in tab {} failed: {}", url, tab_id, e);
            return;
        }
        entry.tab.url = url.to_string();
    }

    pub fn go_back(&mut self, tab_id: TabId) {
        if let Some(view) = self.view_mut(tab_id) {
            if view.can_go_back() {
                if let Err(e) = view.go_back() {
                    warn!("[Coordinator] back in tab {} failed: {}", tab_id, e);
                }
            }
        }
    }

    pub fn go_forward(&mut self, tab_id: TabId) {
        if let Some(view) = self.view_mut(tab_id) {
            if view.can_go_forward() {
                if let Err(e) = view.go_forward() {
                    warn!("[Coordinator] forward in tab {} failed: {}", tab_id, e);
                }
            }
        }
    }

    pub fn reload(&mut self, tab_id: TabId) {
        if let Some(view) = self.view_mut(tab_id) {
            if let Err(e) = view.reload() {
                warn!("[Coordinator] reload tab {} failed: {}", tab_id, e);
            }
        }
    }

    /// Answers immediately from the view; unknown ids get `{false, false}`.
    pub fn navigation_state(&self, tab_id: TabId) -> NavigationState {
        match self.position(tab_id) {
            Some(index) => {
                let view = &self.tabs[index].view;
                NavigationState {
                    can_go_back: view.can_go_back(),
                    can_go_forward: view.can_go_forward(),
                }
            }
            None => NavigationState::default(),
        }
    }

    /// Window resized: refit the visible view.
    pub fn resized(&mut self) {
        if let Some(index) = self.active.and_then(|id| self.position(id)) {
            self.apply_bounds(index);
        }
    }

    pub fn handle_command(&mut self, command: Command) {
        match command {
            Command::CreateTab { tab_id, url } => {
                self.create_with_id(tab_id, &url);
            }
            Command::SwitchTab { tab_id } => self.switch(tab_id),
            Command::CloseTab { tab_id } => self.close(tab_id),
            Command::Navigate { tab_id, url } => self.navigate(tab_id, &url),
            Command::GoBack { tab_id } => self.go_back(tab_id),
            Command::GoForward { tab_id } => self.go_forward(tab_id),
            Command::Reload { tab_id } => self.reload(tab_id),
        }
    }

    /// Folds a content-view lifecycle signal into the cache and queues the
    /// matching event for the UI.
    pub fn handle_signal(&mut self, tab_id: TabId, signal: HostSignal) {
        let Some(index) = self.position(tab_id) else {
            // The view was destroyed while the signal was in flight.
            debug!("[Coordinator] {:?} from closed tab {}", signal, tab_id);
            return;
        };
        let tab = &mut self.tabs[index].tab;

        match signal {
            HostSignal::NavigationCommitted(url) | HostSignal::InPageNavigation(url) => {
                tab.url = url.clone();
                self.outbox.push(Event::TabNavigated { tab_id, url });
            }
            HostSignal::TitleChanged(title) => {
                tab.title = title.clone();
                self.outbox.push(Event::TabTitleUpdated { tab_id, title });
            }
            HostSignal::LoadStarted => {
                self.outbox.push(Event::TabLoading { tab_id, loading: true });
            }
            HostSignal::LoadFinished { title } => {
                if let Some(title) = title {
                    tab.title = title;
                }
                let title = tab.title.clone();
                self.outbox.push(Event::TabLoading { tab_id, loading: false });
                self.outbox.push(Event::TabTitleUpdated { tab_id, title });
            }
        }
    }

    /// Events queued since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.outbox)
    }

    pub fn active(&self) -> Option<TabId> {
        self.active
    }

    /// Tabs in display order.
    pub fn tabs(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.iter().map(|e| &e.tab)
    }

    pub fn tab(&self, tab_id: TabId) -> Option<&Tab> {
        self.position(tab_id).map(|i| &self.tabs[i].tab)
    }

    pub fn view(&self, tab_id: TabId) -> Option<&H::View> {
        self.position(tab_id).map(|i| &self.tabs[i].view)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    fn position(&self, tab_id: TabId) -> Option<usize> {
        self.tabs.iter().position(|e| e.tab.id == tab_id)
    }

    fn view_mut(&mut self, tab_id: TabId) -> Option<&mut H::View> {
        match self.position(tab_id) {
            Some(index) => Some(&mut self.tabs[index].view),
            None => {
                debug!("[Coordinator] command for unknown tab {}", tab_id);
                None
            }
        }
    }

    /// Returns whether the view is off screen afterwards.
    fn detach_at(&mut self, index: usize) -> bool {
        let entry = &mut self.tabs[index];
        if entry.attached {
            match self.host.detach(&mut entry.view) {
                Ok(()) => entry.attached = false,
                Err(e) => warn!("[Coordinator] detach tab {} failed: {}", entry.tab.id, e),
            }
        }
        !entry.attached
    }

    /// Returns whether the view is on screen afterwards.
    fn attach_at(&mut self, index: usize) -> bool {
        let entry = &mut self.tabs[index];
        if !entry.attached {
            match self.host.attach(&mut entry.view) {
                Ok(()) => entry.attached = true,
                Err(e) => warn!("[Coordinator] attach tab {} failed: {}", entry.tab.id, e),
            }
        }
        entry.attached
    }

    fn apply_bounds(&mut self, index: usize) {
        let bounds = Bounds::below_chrome(self.host.window_size(), self.chrome_height);
        let entry = &mut self.tabs[index];
        if let Err(e) = entry.view.set_bounds(bounds) {
            warn!("[Coordinator] resize tab {} failed: {}", entry.tab.id, e);
        }
    }
}
