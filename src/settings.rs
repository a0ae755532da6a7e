use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tauri::AppHandle;
use tauri::Manager;

use crate::modules::navigation::normalize_address;

pub const HOME_PAGE: &str = "https://www.google.com";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SearchEngine {
    DuckDuckGo,
    #[default]
    Google,
    Bing,
    Brave,
}

impl SearchEngine {
    pub fn query_url(&self, query: &str) -> String {
        let q = urlencoding::encode(query);
        match self {
            Self::DuckDuckGo => format!("https://duckduckgo.com/?q={}", q),
            Self::Google => format!("https://www.google.com/search?q={}", q),
            Self::Bing => format!("https://bing.com/search?q={}", q),
            Self::Brave => format!("https://search.brave.com/search?q={}", q),
        }
    }
}

/// Startup configuration. Read once, never written back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub homepage: String,
    pub search_engine: SearchEngine,
    /// Logical pixels reserved at the top of the window for tab strip and toolbar.
    pub chrome_height: u32,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            homepage: HOME_PAGE.to_string(),
            search_engine: SearchEngine::default(),
            chrome_height: 100,
            window_width: 1400,
            window_height: 900,
        }
    }
}

impl Settings {
    pub fn get_path(app: &AppHandle) -> Option<PathBuf> {
        app.path()
            .app_config_dir()
            .ok()
            .map(|dir| dir.join("settings.json"))
    }

    pub fn load(app: &AppHandle) -> Self {
        match Self::get_path(app) {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("[Settings] No config dir available, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let settings: Self = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("[Settings] Failed to parse settings: {}, using defaults", e);
                Self::default()
            }),
            Err(e) => {
                log::warn!("[Settings] Failed to read file: {}, using defaults", e);
                Self::default()
            }
        };
        settings.normalized()
    }

    /// Runs the homepage through the address-bar rules.
    fn normalized(mut self) -> Self {
        let homepage = normalize_address(&self.homepage, self.search_engine);
        if homepage != self.homepage {
            log::info!("[Settings] homepage {:?} read as {}", self.homepage, homepage);
            self.homepage = homepage;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.homepage, HOME_PAGE);
        assert_eq!(settings.chrome_height, 100);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"homepage": "https://example.org", "search_engine": "DuckDuckGo"}}"#).unwrap();

        let settings = Settings::load_from(file.path());
        assert_eq!(settings.homepage, "https://example.org");
        assert_eq!(settings.search_engine, SearchEngine::DuckDuckGo);
        assert_eq!(settings.window_width, 1400);
    }

    #[test]
    fn test_garbage_file_yields_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();
        assert_eq!(Settings::load_from(file.path()), Settings::default());
    }

    #[rstest]
    #[case("duckduckgo.com", "https://duckduckgo.com")]
    #[case("  https://example.org  ", "https://example.org")]
    #[case("", "about:blank")]
    #[case("my start page", "https://www.google.com/search?q=my%20start%20page")]
    fn test_homepage_is_normalized(#[case] homepage: &str, #[case] expected: &str) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::json!({ "homepage": homepage });
        write!(file, "{}", json).unwrap();
        assert_eq!(Settings::load_from(file.path()).homepage, expected);
    }

    #[rstest]
    #[case(SearchEngine::Google, "https://www.google.com/search?q=rust%20lang")]
    #[case(SearchEngine::DuckDuckGo, "https://duckduckgo.com/?q=rust%20lang")]
    #[case(SearchEngine::Bing, "https://bing.com/search?q=rust%20lang")]
    #[case(SearchEngine::Brave, "https://search.brave.com/search?q=rust%20lang")]
    fn test_query_url(#[case] engine: SearchEngine, #[case] expected: &str) {
        assert_eq!(engine.query_url("rust lang"), expected);
    }
}
