//! Cosmetic preferences persisted on the local device.
//!
//! Preferences are read once at startup and written back on every change.
//! Storage failures are logged and never interrupt the user.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

pub const CURRENT_USER_KEY: &str = "currentUser";
pub const HEADING_KEY: &str = "customHeading";
pub const ACCENT_KEY: &str = "accentColor";
pub const ANIMATIONS_KEY: &str = "animationsEnabled";
pub const BACKGROUND_KEY: &str = "backgroundImage";

pub const DEFAULT_HEADING: &str = "Problem Tracker";
pub const DEFAULT_ACCENT: &str = "indigo";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value storage, in the manner of browser local storage
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, SettingsError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), SettingsError>;
    fn delete(&mut self, key: &str) -> Result<(), SettingsError>;
}

/// Key/value store kept as one JSON object on disk
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file starts empty; an unreadable or corrupt one is logged
    /// and also starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Failed to read preferences, using defaults: {e}");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, SettingsError> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    fn flush(&self) -> Result<(), SettingsError> {
        let io_error = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json).map_err(io_error)
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn delete(&mut self, key: &str) -> Result<(), SettingsError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Cosmetic settings of the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub current_user: Option<String>,
    pub heading: String,
    /// Accent color identifier, e.g. `indigo`
    pub accent: String,
    pub animations_enabled: bool,
    /// Background image as a data URL
    pub background_image: Option<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            current_user: None,
            heading: DEFAULT_HEADING.to_string(),
            accent: DEFAULT_ACCENT.to_string(),
            animations_enabled: true,
            background_image: None,
        }
    }
}

impl Preferences {
    /// Read every preference, falling back to its default when absent or
    /// unparsable.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let defaults = Self::default();
        Self {
            current_user: read_or(store, CURRENT_USER_KEY, defaults.current_user),
            heading: read_or(store, HEADING_KEY, defaults.heading),
            accent: read_or(store, ACCENT_KEY, defaults.accent),
            animations_enabled: read_or(store, ANIMATIONS_KEY, defaults.animations_enabled),
            background_image: read_or(store, BACKGROUND_KEY, defaults.background_image),
        }
    }
}

fn read_or<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str, default: T) -> T {
    match store.read(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, "Ignoring unparsable preference: {e}");
            default
        }),
        Ok(None) => default,
        Err(e) => {
            tracing::warn!(key, "Failed to read preference: {e}");
            default
        }
    }
}

/// Preferences bound to the store they persist to
#[derive(Debug)]
pub struct PreferenceSession<S> {
    store: S,
    preferences: Preferences,
}

impl<S: KeyValueStore> PreferenceSession<S> {
    pub fn load(store: S) -> Self {
        let preferences = Preferences::load(&store);
        Self { store, preferences }
    }

    pub const fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn set_current_user(&mut self, user: Option<String>) {
        self.persist(CURRENT_USER_KEY, user.as_ref());
        self.preferences.current_user = user;
    }

    pub fn set_heading(&mut self, heading: String) {
        self.persist(HEADING_KEY, Some(&heading));
        self.preferences.heading = heading;
    }

    pub fn set_accent(&mut self, accent: String) {
        self.persist(ACCENT_KEY, Some(&accent));
        self.preferences.accent = accent;
    }

    pub fn set_animations_enabled(&mut self, enabled: bool) {
        self.persist(ANIMATIONS_KEY, Some(&enabled));
        self.preferences.animations_enabled = enabled;
    }

    pub fn set_background_image(&mut self, image: Option<String>) {
        self.persist(BACKGROUND_KEY, image.as_ref());
        self.preferences.background_image = image;
    }

    /// Best-effort write; absent values delete the key.
    fn persist<T: Serialize>(&mut self, key: &str, value: Option<&T>) {
        let result = match value {
            None => self.store.delete(key),
            Some(value) => serde_json::to_string(value)
                .map_err(SettingsError::from)
                .and_then(|json| self.store.write(key, &json)),
        };
        if let Err(e) = result {
            tracing::warn!(key, "Failed to persist preference: {e}");
        }
    }
}
