// Command/event protocol between the UI Controller and the Coordinator.
// Pure data - no Tauri imports. Every message carries the tab id it is about,
// so a late or reordered message can never land on the wrong tab.

use serde::{Deserialize, Serialize};

use crate::state::TabId;

/// UI -> Coordinator. Fire-and-forget; the navigation-state query travels
/// separately because it needs a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Command {
    #[serde(rename_all = "camelCase")]
    CreateTab { tab_id: TabId, url: String },
    #[serde(rename_all = "camelCase")]
    SwitchTab { tab_id: TabId },
    #[serde(rename_all = "camelCase")]
    CloseTab { tab_id: TabId },
    #[serde(rename_all = "camelCase")]
    Navigate { tab_id: TabId, url: String },
    #[serde(rename_all = "camelCase")]
    GoBack { tab_id: TabId },
    #[serde(rename_all = "camelCase")]
    GoForward { tab_id: TabId },
    #[serde(rename_all = "camelCase")]
    Reload { tab_id: TabId },
}

impl Command {
    pub fn tab_id(&self) -> TabId {
        match self {
            Self::CreateTab { tab_id, .. }
            | Self::SwitchTab { tab_id }
            | Self::CloseTab { tab_id }
            | Self::Navigate { tab_id, .. }
            | Self::GoBack { tab_id }
            | Self::GoForward { tab_id }
            | Self::Reload { tab_id } => *tab_id,
        }
    }
}

/// Name of the synchronous query channel.
pub const GET_NAVIGATION_STATE: &str = "get-navigation-state";

/// Coordinator -> UI. Pushed without acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Event {
    #[serde(rename_all = "camelCase")]
    TabCreated { tab_id: TabId, url: String },
    #[serde(rename_all = "camelCase")]
    TabNavigated { tab_id: TabId, url: String },
    #[serde(rename_all = "camelCase")]
    TabTitleUpdated { tab_id: TabId, title: String },
    #[serde(rename_all = "camelCase")]
    TabLoading { tab_id: TabId, loading: bool },
    /// The tab has no content view any more: it was closed, or its view
    /// could not be created in the first place.
    #[serde(rename_all = "camelCase")]
    TabClosed { tab_id: TabId },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TabCreated { .. } => "tab-created",
            Self::TabNavigated { .. } => "tab-navigated",
            Self::TabTitleUpdated { .. } => "tab-title-updated",
            Self::TabLoading { .. } => "tab-loading",
            Self::TabClosed { .. } => "tab-closed",
        }
    }

    pub fn tab_id(&self) -> TabId {
        match self {
            Self::TabCreated { tab_id, .. }
            | Self::TabNavigated { tab_id, .. }
            | Self::TabTitleUpdated { tab_id, .. }
            | Self::TabLoading { tab_id, .. }
            | Self::TabClosed { tab_id } => *tab_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_wire_shape() {
        let cmd = Command::CreateTab { tab_id: TabId(3), url: "https://x.com".into() };
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({"type": "create-tab", "tabId": 3, "url": "https://x.com"})
        );

        let parsed: Command = serde_json::from_value(json!({"type": "go-forward", "tabId": 9})).unwrap();
        assert_eq!(parsed, Command::GoForward { tab_id: TabId(9) });
        assert_eq!(parsed.tab_id(), TabId(9));
    }

    #[test]
    fn test_event_name_matches_tag() {
        let events = [
            Event::TabCreated { tab_id: TabId(0), url: String::new() },
            Event::TabNavigated { tab_id: TabId(0), url: String::new() },
            Event::TabTitleUpdated { tab_id: TabId(0), title: String::new() },
            Event::TabLoading { tab_id: TabId(0), loading: true },
            Event::TabClosed { tab_id: TabId(0) },
        ];
        for event in events {
            let value = serde_json::to_value(&event).unwrap();
            assert_eq!(value["type"], event.name());
        }
    }

    #[test]
    fn test_event_payload_is_camel_case() {
        let event = Event::TabLoading { tab_id: TabId(2), loading: false };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "tab-loading", "tabId": 2, "loading": false})
        );
    }

    #[test]
    fn test_tab_closed_wire_shape() {
        let event = Event::TabClosed { tab_id: TabId(4) };
        assert_eq!(serde_json::to_value(&event).unwrap(), json!({"type": "tab-closed", "tabId": 4}));
        assert_eq!(event.tab_id(), TabId(4));
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        let result = serde_json::from_value::<Command>(json!({"type": "format-disk", "tabId": 1}));
        assert!(result.is_err());
    }
}
