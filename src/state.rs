// Shared state structs to avoid circular dependencies.
// These are used by both loops and by the Tauri wiring, and can be tested independently.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::modules::runtime::UiInput;

pub const DEFAULT_TAB_TITLE: &str = "New Tab";

/// Identifies one browsing context for the whole session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session-wide tab id allocator.
///
/// Cloned into both the UI Controller and the Coordinator so that ids minted on
/// either side of the boundary never collide. Ids are never handed out twice.
///
/// This counter is the only memory the two loops share, and it assumes both run
/// in one process. Everything else crosses as a message. `observe` moves the
/// counter past ids that arrive over the protocol.
#[derive(Clone, Debug, Default)]
pub struct TabIds {
    next: Arc<AtomicU64>,
}

impl TabIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> TabId {
        TabId(self.next.fetch_add(1, Ordering::SeqCst))
    }

    /// Moves the counter past an id that arrived from elsewhere.
    pub fn observe(&self, id: TabId) {
        self.next.fetch_max(id.0 + 1, Ordering::SeqCst);
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: TabId,
    /// Last-known location. The content view holds the authoritative one.
    pub url: String,
    pub title: String,
}

impl Tab {
    pub fn new(id: TabId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            title: DEFAULT_TAB_TITLE.to_string(),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

/// Tauri-managed state. The chrome page only ever reaches the UI loop;
/// nothing it sends goes to the Coordinator directly.
pub struct AppState {
    pub ui: UnboundedSender<UiInput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic_across_clones() {
        let ids = TabIds::new();
        let other = ids.clone();
        assert_eq!(ids.next(), TabId(0));
        assert_eq!(other.next(), TabId(1));
        assert_eq!(ids.next(), TabId(2));
    }

    #[test]
    fn test_observe_skips_past_foreign_id() {
        let ids = TabIds::new();
        ids.observe(TabId(7));
        assert_eq!(ids.next(), TabId(8));

        // Observing an older id never rewinds.
        ids.observe(TabId(3));
        assert_eq!(ids.next(), TabId(9));
    }

    #[test]
    fn test_tab_serializes_camel_case() {
        let tab = Tab::new(TabId(4), "https://example.com");
        let json = serde_json::to_value(&tab).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 4, "url": "https://example.com", "title": "New Tab"})
        );
    }
}
