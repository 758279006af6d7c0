//! Persisted user preferences.
//!
//! The only preference is the colour [`Theme`], stored under the key
//! `theme` as `"light"` or `"dark"`. A missing or unreadable store reads as
//! defaults; only writes can fail.

use crate::error::PostforgeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Colour theme of the rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}' (expected light or dark)")),
        }
    }
}

/// Everything kept in the preference store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
}

/// Where preferences live.
pub trait PreferenceStore: Send + Sync {
    /// Current preferences; defaults when nothing usable is stored.
    fn load(&self) -> Preferences;

    fn save(&self, prefs: &Preferences) -> Result<(), PostforgeError>;
}

/// Current theme from a store.
pub fn load_theme(store: &dyn PreferenceStore) -> Theme {
    store.load().theme
}

/// Set and persist a theme.
pub fn set_theme(store: &dyn PreferenceStore, theme: Theme) -> Result<Theme, PostforgeError> {
    let mut prefs = store.load();
    prefs.theme = theme;
    store.save(&prefs)?;
    Ok(theme)
}

/// Flip between light and dark and persist the result.
pub fn toggle_theme(store: &dyn PreferenceStore) -> Result<Theme, PostforgeError> {
    let next = load_theme(store).toggled();
    set_theme(store, next)
}

// ── File store ───────────────────────────────────────────────────────────

/// JSON file store, by default at `<config_dir>/postforge/preferences.json`.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform config directory.
    ///
    /// Default locations:
    /// - **Linux**: `~/.config/postforge/preferences.json`
    /// - **macOS**: `~/Library/Application Support/postforge/preferences.json`
    /// - **Windows**: `%APPDATA%\postforge\preferences.json`
    pub fn default_location() -> Result<Self, PostforgeError> {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .ok_or_else(|| PostforgeError::Preferences {
                detail: "no config or home directory available".into(),
            })?;
        Ok(Self::new(base.join("postforge").join("preferences.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Preferences {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) => {
                debug!("No preferences at {}: {}", self.path.display(), e);
                return Preferences::default();
            }
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("Ignoring unreadable preferences {}: {}", self.path.display(), e);
            Preferences::default()
        })
    }

    fn save(&self, prefs: &Preferences) -> Result<(), PostforgeError> {
        let err = |detail: String| PostforgeError::Preferences { detail };

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(|e| err(format!("{}: {e}", dir.display())))?;

        let json = serde_json::to_string_pretty(prefs).map_err(|e| err(e.to_string()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| err(format!("{}: {e}", dir.display())))?;
        std::io::Write::write_all(&mut tmp, json.as_bytes()).map_err(|e| err(e.to_string()))?;
        tmp.persist(&self.path)
            .map_err(|e| err(format!("{}: {}", self.path.display(), e.error)))?;
        debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }
}

// ── Memory store ─────────────────────────────────────────────────────────

/// In-process store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    prefs: Mutex<Preferences>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Preferences {
        self.prefs.lock().map(|p| *p).unwrap_or_default()
    }

    fn save(&self, prefs: &Preferences) -> Result<(), PostforgeError> {
        let mut slot = self.prefs.lock().map_err(|_| PostforgeError::Preferences {
            detail: "preference lock poisoned".into(),
        })?;
        *slot = *prefs;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_defaults_to_light() {
        assert_eq!(load_theme(&MemoryPreferenceStore::default()), Theme::Light);
    }

    #[test]
    fn toggle_flips_and_persists() {
        let store = MemoryPreferenceStore::default();
        assert_eq!(toggle_theme(&store).unwrap(), Theme::Dark);
        assert_eq!(load_theme(&store), Theme::Dark);
        assert_eq!(toggle_theme(&store).unwrap(), Theme::Light);
    }

    #[test]
    fn theme_parses_case_insensitively() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn file_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("nested").join("preferences.json"));
        assert_eq!(load_theme(&store), Theme::Light);

        toggle_theme(&store).unwrap();
        let reopened = FilePreferenceStore::new(store.path());
        assert_eq!(load_theme(&reopened), Theme::Dark);

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\"theme\": \"dark\""));
    }

    #[test]
    fn corrupt_file_reads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(load_theme(&FilePreferenceStore::new(&path)), Theme::Light);
    }

    #[test]
    fn unknown_theme_value_reads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, r#"{"theme":"neon"}"#).unwrap();
        assert_eq!(load_theme(&FilePreferenceStore::new(&path)), Theme::Light);
    }
}
