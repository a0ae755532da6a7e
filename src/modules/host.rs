// Host browser-engine seam - no Tauri imports allowed.
// The Coordinator only ever talks to content views through these traits.

use serde::{Deserialize, Serialize};

use crate::state::TabId;

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("failed to create content view for tab {0}: {1}")]
    CreateView(TabId, String),

    #[error("content view operation failed: {0}")]
    View(String),

    #[error("invalid url {0}: {1}")]
    InvalidUrl(String, String),
}

/// Inner size of the host window, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

/// On-screen rectangle of a content view, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    /// Full window minus the chrome strip at the top.
    pub fn below_chrome(window: WindowSize, chrome_height: u32) -> Self {
        Self {
            x: 0,
            y: chrome_height as i32,
            width: window.width,
            height: window.height.saturating_sub(chrome_height),
        }
    }
}

/// Lifecycle signals a content view reports back to the Coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSignal {
    NavigationCommitted(String),
    InPageNavigation(String),
    TitleChanged(String),
    LoadStarted,
    /// `title` is whatever the host can report at that moment, if anything.
    LoadFinished { title: Option<String> },
}

/// One isolated, independently-navigable rendering surface.
pub trait ContentView {
    fn load(&mut self, url: &str) -> Result<(), HostError>;
    fn reload(&mut self) -> Result<(), HostError>;
    fn can_go_back(&self) -> bool;
    fn can_go_forward(&self) -> bool;
    fn go_back(&mut self) -> Result<(), HostError>;
    fn go_forward(&mut self) -> Result<(), HostError>;
    fn set_bounds(&mut self, bounds: Bounds) -> Result<(), HostError>;
    /// Irreversible. The view must already be detached.
    fn destroy(&mut self) -> Result<(), HostError>;
}

/// The single host window that content views are attached to.
pub trait Host {
    type View: ContentView;

    /// Builds a view for `tab_id` that starts loading `url`. The new view is detached.
    fn create_view(&mut self, tab_id: TabId, url: &str) -> Result<Self::View, HostError>;
    fn attach(&mut self, view: &mut Self::View) -> Result<(), HostError>;
    fn detach(&mut self, view: &mut Self::View) -> Result<(), HostError>;
    fn window_size(&self) -> WindowSize;
}

#[cfg(test)]
pub mod fake {
    //! In-memory host that records what the Coordinator did to it.

    use std::collections::BTreeSet;
    use std::sync::{Arc, Mutex, MutexGuard};

    use super::*;

    #[derive(Debug)]
    pub struct FakeWindow {
        pub live: BTreeSet<TabId>,
        pub attached: Vec<TabId>,
        pub destroyed: Vec<TabId>,
        pub fail_create: bool,
        /// Urls whose view creation fails even when `fail_create` is off.
        pub rejected_urls: Vec<String>,
        /// Views that refuse to be shown.
        pub fail_attach_for: Vec<TabId>,
        pub fail_detach: bool,
        pub size: WindowSize,
    }

    impl Default for FakeWindow {
        fn default() -> Self {
            Self {
                live: BTreeSet::new(),
                attached: Vec::new(),
                destroyed: Vec::new(),
                fail_create: false,
                rejected_urls: Vec::new(),
                fail_attach_for: Vec::new(),
                fail_detach: false,
                size: WindowSize { width: 1400, height: 900 },
            }
        }
    }

    /// Clones share the same window, so a test can keep one to inspect.
    #[derive(Clone, Default)]
    pub struct FakeHost {
        pub window: Arc<Mutex<FakeWindow>>,
    }

    impl FakeHost {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn window(&self) -> MutexGuard<'_, FakeWindow> {
            self.window.lock().unwrap()
        }
    }

    #[derive(Debug)]
    pub struct FakeView {
        pub tab_id: TabId,
        pub history: Vec<String>,
        pub cursor: usize,
        pub reloads: usize,
        pub bounds: Option<Bounds>,
        window: Arc<Mutex<FakeWindow>>,
    }

    impl FakeView {
        pub fn current_url(&self) -> &str {
            &self.history[self.cursor]
        }
    }

    impl ContentView for FakeView {
        fn load(&mut self, url: &str) -> Result<(), HostError> {
            self.history.truncate(self.cursor + 1);
            self.history.push(url.to_string());
            self.cursor = self.history.len() - 1;
            Ok(())
        }

        fn reload(&mut self) -> Result<(), HostError> {
            self.reloads += 1;
            Ok(())
        }

        fn can_go_back(&self) -> bool {
            self.cursor > 0
        }

        fn can_go_forward(&self) -> bool {
            self.cursor + 1 < self.history.len()
        }

        fn go_back(&mut self) -> Result<(), HostError> {
            assert!(self.can_go_back(), "go_back without capability");
            self.cursor -= 1;
            Ok(())
        }

        fn go_forward(&mut self) -> Result<(), HostError> {
            assert!(self.can_go_forward(), "go_forward without capability");
            self.cursor += 1;
            Ok(())
        }

        fn set_bounds(&mut self, bounds: Bounds) -> Result<(), HostError> {
            self.bounds = Some(bounds);
            Ok(())
        }

        fn destroy(&mut self) -> Result<(), HostError> {
            let mut window = self.window.lock().unwrap();
            assert!(
                !window.attached.contains(&self.tab_id),
                "destroyed tab {} while attached",
                self.tab_id
            );
            window.live.remove(&self.tab_id);
            window.destroyed.push(self.tab_id);
            Ok(())
        }
    }

    impl Host for FakeHost {
        type View = FakeView;

        fn create_view(&mut self, tab_id: TabId, url: &str) -> Result<FakeView, HostError> {
            let mut window = self.window.lock().unwrap();
            if window.fail_create || window.rejected_urls.iter().any(|u| u == url) {
                return Err(HostError::CreateView(tab_id, "refused".to_string()));
            }
            window.live.insert(tab_id);
            Ok(FakeView {
                tab_id,
                history: vec![url.to_string()],
                cursor: 0,
                reloads: 0,
                bounds: None,
                window: Arc::clone(&self.window),
            })
        }

        fn attach(&mut self, view: &mut FakeView) -> Result<(), HostError> {
            let mut window = self.window.lock().unwrap();
            if window.fail_attach_for.contains(&view.tab_id) {
                return Err(HostError::View("show refused".to_string()));
            }
            if !window.attached.contains(&view.tab_id) {
                window.attached.push(view.tab_id);
            }
            Ok(())
        }

        fn detach(&mut self, view: &mut FakeView) -> Result<(), HostError> {
            let mut window = self.window.lock().unwrap();
            if window.fail_detach {
                return Err(HostError::View("hide refused".to_string()));
            }
            window.attached.retain(|id| *id != view.tab_id);
            Ok(())
        }

        fn window_size(&self) -> WindowSize {
            self.window.lock().unwrap().size
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_below_chrome() {
        let bounds = Bounds::below_chrome(WindowSize { width: 1400, height: 900 }, 100);
        assert_eq!(bounds, Bounds { x: 0, y: 100, width: 1400, height: 800 });
    }

    #[test]
    fn test_bounds_never_negative_height() {
        let bounds = Bounds::below_chrome(WindowSize { width: 300, height: 60 }, 100);
        assert_eq!(bounds.height, 0);
        assert_eq!(bounds.y, 100);
    }
}
