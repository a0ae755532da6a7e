// Tauri implementation of the host seam: one child webview per tab, all
// stacked in the main window, with only the active one shown.

use std::sync::{Arc, Mutex};

use log::{debug, warn};
use tauri::webview::{PageLoadEvent, Webview, WebviewBuilder};
use tauri::{LogicalPosition, LogicalSize, Window, WebviewUrl};
use tokio::sync::mpsc::UnboundedSender;
use url::Url;

use crate::modules::host::{Bounds, ContentView, Host, HostError, HostSignal, WindowSize};
use crate::modules::runtime::CoordinatorInput;
use crate::state::TabId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Traversal {
    Back,
    Forward,
}

/// Best-effort copy of a webview's session history.
///
/// The webview API has no canGoBack/canGoForward query, so committed
/// navigations are replayed here. Traversals we start ourselves are marked
/// so their commit moves the cursor instead of pushing a new entry.
#[derive(Debug, Default)]
pub struct HistoryMirror {
    entries: Vec<String>,
    cursor: usize,
    pending: Option<Traversal>,
}

impl HistoryMirror {
    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn begin_back(&mut self) {
        self.pending = Some(Traversal::Back);
    }

    pub fn begin_forward(&mut self) {
        self.pending = Some(Traversal::Forward);
    }

    pub fn committed(&mut self, url: &str) {
        match self.pending.take() {
            Some(Traversal::Back) if self.can_go_back() => {
                self.cursor -= 1;
                self.entries[self.cursor] = url.to_string();
            }
            Some(Traversal::Forward) if self.can_go_forward() => {
                self.cursor += 1;
                self.entries[self.cursor] = url.to_string();
            }
            _ => {
                // Reloads commit the same location again.
                if self.entries.get(self.cursor).map(String::as_str) == Some(url) {
                    return;
                }
                if !self.entries.is_empty() {
                    self.entries.truncate(self.cursor + 1);
                }
                self.entries.push(url.to_string());
                self.cursor = self.entries.len() - 1;
            }
        }
    }
}

fn post(signals: &UnboundedSender<CoordinatorInput>, tab_id: TabId, signal: HostSignal) {
    if signals.send(CoordinatorInput::Host { tab_id, signal }).is_err() {
        debug!("[Host] Coordinator gone, dropping signal for tab {}", tab_id);
    }
}

pub struct TauriContentView {
    tab_id: TabId,
    webview: Webview,
    history: Arc<Mutex<HistoryMirror>>,
}

impl TauriContentView {
    fn eval(&self, js: &str) -> Result<(), HostError> {
        self.webview.eval(js).map_err(|e| HostError::View(e.to_string()))
    }

    fn with_history<T>(&self, f: impl FnOnce(&mut HistoryMirror) -> T) -> Option<T> {
        match self.history.lock() {
            Ok(mut history) => Some(f(&mut history)),
            Err(e) => {
                warn!("[Host] history mirror for tab {} poisoned: {}", self.tab_id, e);
                None
            }
        }
    }
}

impl ContentView for TauriContentView {
    fn load(&mut self, url: &str) -> Result<(), HostError> {
        let parsed = Url::parse(url).map_err(|e| HostError::InvalidUrl(url.to_string(), e.to_string()))?;
        self.webview
            .navigate(parsed)
            .map_err(|e| HostError::View(e.to_string()))
    }

    fn reload(&mut self) -> Result<(), HostError> {
        self.eval("window.location.reload()")
    }

    fn can_go_back(&self) -> bool {
        self.with_history(|h| h.can_go_back()).unwrap_or(false)
    }

    fn can_go_forward(&self) -> bool {
        self.with_history(|h| h.can_go_forward()).unwrap_or(false)
    }

    fn go_back(&mut self) -> Result<(), HostError> {
        self.with_history(HistoryMirror::begin_back);
        self.eval("window.history.back()")
    }

    fn go_forward(&mut self) -> Result<(), HostError> {
        self.with_history(HistoryMirror::begin_forward);
        self.eval("window.history.forward()")
    }

    fn set_bounds(&mut self, bounds: Bounds) -> Result<(), HostError> {
        self.webview
            .set_bounds(tauri::Rect {
                position: tauri::Position::Logical(LogicalPosition::new(bounds.x as f64, bounds.y as f64)),
                size: tauri::Size::Logical(LogicalSize::new(bounds.width as f64, bounds.height as f64)),
            })
            .map_err(|e| HostError::View(e.to_string()))
    }

    fn destroy(&mut self) -> Result<(), HostError> {
        self.webview.close().map_err(|e| HostError::View(e.to_string()))
    }
}

pub struct TauriHost {
    window: Window,
    signals: UnboundedSender<CoordinatorInput>,
    fallback_size: WindowSize,
}

impl TauriHost {
    pub fn new(
        window: Window,
        signals: UnboundedSender<CoordinatorInput>,
        fallback_size: WindowSize,
    ) -> Self {
        Self {
            window,
            signals,
            fallback_size,
        }
    }
}

impl Host for TauriHost {
    type View = TauriContentView;

    fn create_view(&mut self, tab_id: TabId, url: &str) -> Result<TauriContentView, HostError> {
        let parsed = Url::parse(url).map_err(|e| HostError::InvalidUrl(url.to_string(), e.to_string()))?;
        let history = Arc::new(Mutex::new(HistoryMirror::default()));

        let load_signals = self.signals.clone();
        let load_history = Arc::clone(&history);
        let title_signals = self.signals.clone();

        let builder = WebviewBuilder::new(format!("tab-{}", tab_id), WebviewUrl::External(parsed))
            .on_page_load(move |_webview, payload| {
                let url = payload.url().to_string();
                match payload.event() {
                    PageLoadEvent::Started => {
                        if let Ok(mut history) = load_history.lock() {
                            history.committed(&url);
                        }
                        post(&load_signals, tab_id, HostSignal::LoadStarted);
                        post(&load_signals, tab_id, HostSignal::NavigationCommitted(url));
                    }
                    PageLoadEvent::Finished => {
                        post(&load_signals, tab_id, HostSignal::LoadFinished { title: None });
                    }
                }
            })
            .on_document_title_changed(move |_webview, title| {
                post(&title_signals, tab_id, HostSignal::TitleChanged(title));
            });

        let size = self.window_size();
        let webview = self
            .window
            .add_child(
                builder,
                LogicalPosition::new(0.0, 0.0),
                LogicalSize::new(size.width as f64, size.height as f64),
            )
            .map_err(|e| HostError::CreateView(tab_id, e.to_string()))?;

        // New views start detached; the Coordinator shows them on switch.
        if let Err(e) = webview.hide() {
            let _ = webview.close();
            return Err(HostError::CreateView(tab_id, e.to_string()));
        }

        debug!("[Host] Created webview tab-{} for {}", tab_id, url);
        Ok(TauriContentView {
            tab_id,
            webview,
            history,
        })
    }

    fn attach(&mut self, view: &mut TauriContentView) -> Result<(), HostError> {
        view.webview.show().map_err(|e| HostError::View(e.to_string()))
    }

    fn detach(&mut self, view: &mut TauriContentView) -> Result<(), HostError> {
        view.webview.hide().map_err(|e| HostError::View(e.to_string()))
    }

    fn window_size(&self) -> WindowSize {
        let logical = self.window.scale_factor().and_then(|scale| {
            self.window
                .inner_size()
                .map(|size| size.to_logical::<f64>(scale))
        });
        match logical {
            Ok(size) => WindowSize {
                width: size.width.round() as u32,
                height: size.height.round() as u32,
            },
            Err(e) => {
                warn!("[Host] window size unavailable: {}", e);
                self.fallback_size
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_commit_has_no_history() {
        let mut history = HistoryMirror::default();
        history.committed("https://a.test/");
        assert!(!history.can_go_back());
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_new_navigation_enables_back() {
        let mut history = HistoryMirror::default();
        history.committed("https://a.test/");
        history.committed("https://b.test/");
        assert!(history.can_go_back());
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_reload_does_not_push() {
        let mut history = HistoryMirror::default();
        history.committed("https://a.test/");
        history.committed("https://a.test/");
        assert!(!history.can_go_back());
    }

    #[test]
    fn test_traversals_move_cursor() {
        let mut history = HistoryMirror::default();
        history.committed("https://a.test/");
        history.committed("https://b.test/");
        history.committed("https://c.test/");

        history.begin_back();
        history.committed("https://b.test/");
        assert!(history.can_go_back());
        assert!(history.can_go_forward());

        history.begin_forward();
        history.committed("https://c.test/");
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_navigating_after_back_drops_forward_entries() {
        let mut history = HistoryMirror::default();
        history.committed("https://a.test/");
        history.committed("https://b.test/");
        history.begin_back();
        history.committed("https://a.test/");

        history.committed("https://d.test/");
        assert!(history.can_go_back());
        assert!(!history.can_go_forward());
        assert_eq!(history.entries, vec!["https://a.test/", "https://d.test/"]);
    }
}
