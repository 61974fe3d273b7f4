//! Light/dark theme preference.

use std::collections::HashMap;

/// Storage key holding the theme.
pub const THEME_KEY: &str = "theme";

/// Error type for preference storage.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Storage is disabled or missing (private mode, sandboxed frame)
    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },
    /// Write was refused (quota, permissions)
    #[error("Storage write refused for {key}: {reason}")]
    WriteRefused { key: String, reason: String },
}

/// Key-value persistence for user preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory [`PreferenceStore`].
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Page colour theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Body class, also the persisted value.
    pub fn class_name(&self) -> &'static str {
        match self {
            Theme::Light => "light-theme",
            Theme::Dark => "dark-theme",
        }
    }

    /// Icon on the toggle button: the theme you would switch to.
    pub fn icon_class(&self) -> &'static str {
        match self {
            Theme::Light => "fas fa-moon",
            Theme::Dark => "fas fa-sun",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Parse a persisted value.
    pub fn from_stored(value: &str) -> Option<Self> {
        match value.trim() {
            "light-theme" | "light" => Some(Theme::Light),
            "dark-theme" | "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

/// Theme toggle bound to a [`PreferenceStore`].
///
/// ## Example
///
/// ```rust
/// use folio_core_fx::{MemoryStore, Theme, ThemeToggle};
///
/// let mut toggle = ThemeToggle::load(MemoryStore::new());
/// assert_eq!(toggle.current(), Theme::Light);
/// assert_eq!(toggle.toggle(), Theme::Dark);
/// assert_eq!(toggle.toggle(), Theme::Light);
/// ```
#[derive(Clone, Debug)]
pub struct ThemeToggle<S> {
    store: S,
    current: Theme,
}

impl<S: PreferenceStore> ThemeToggle<S> {
    /// Read the saved preference once.
    ///
    /// A missing, unreadable or unknown value falls back to [`Theme::Light`].
    pub fn load(store: S) -> Self {
        let current = match store.get(THEME_KEY) {
            Ok(Some(value)) => Theme::from_stored(&value).unwrap_or_else(|| {
                log::warn!("theme: ignoring unknown stored value {:?}", value);
                Theme::Light
            }),
            Ok(None) => Theme::Light,
            Err(err) => {
                log::warn!("theme: {}", err);
                Theme::Light
            }
        };
        Self { store, current }
    }

    #[inline]
    pub fn current(&self) -> Theme {
        self.current
    }

    /// Flip the theme and persist it.
    ///
    /// A failed write is logged; the theme still changes for this page.
    pub fn toggle(&mut self) -> Theme {
        self.current = self.current.toggled();
        if let Err(err) = self.store.set(THEME_KEY, self.current.class_name()) {
            log::warn!("theme: cannot save preference: {}", err);
        }
        self.current
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable {
                reason: "disabled".into(),
            })
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::WriteRefused {
                key: key.into(),
                reason: "quota".into(),
            })
        }
    }

    #[test]
    fn test_defaults_to_light() {
        let toggle = ThemeToggle::load(MemoryStore::new());
        assert_eq!(toggle.current(), Theme::Light);
        assert_eq!(toggle.current().icon_class(), "fas fa-moon");
    }

    #[test]
    fn test_reads_saved_theme() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "dark-theme").unwrap();
        let toggle = ThemeToggle::load(store);
        assert_eq!(toggle.current(), Theme::Dark);
        assert_eq!(toggle.current().icon_class(), "fas fa-sun");
    }

    #[test]
    fn test_toggle_persists() {
        let mut toggle = ThemeToggle::load(MemoryStore::new());
        toggle.toggle();
        assert_eq!(
            toggle.store().get(THEME_KEY).unwrap().as_deref(),
            Some("dark-theme")
        );
    }

    #[test]
    fn test_even_toggles_round_trip() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "dark-theme").unwrap();
        let mut toggle = ThemeToggle::load(store);
        for _ in 0..4 {
            toggle.toggle();
        }
        let store = toggle.into_store();
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark-theme"));

        // Reloading sees the same preference
        assert_eq!(ThemeToggle::load(store).current(), Theme::Dark);
    }

    #[test]
    fn test_unknown_value_falls_back() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(ThemeToggle::load(store).current(), Theme::Light);
    }

    #[test]
    fn test_broken_store_degrades() {
        let mut toggle = ThemeToggle::load(BrokenStore);
        assert_eq!(toggle.current(), Theme::Light);
        assert_eq!(toggle.toggle(), Theme::Dark);
        assert_eq!(toggle.current(), Theme::Dark);
    }

    #[test]
    fn test_from_stored() {
        assert_eq!(Theme::from_stored("light"), Some(Theme::Light));
        assert_eq!(Theme::from_stored("dark"), Some(Theme::Dark));
        assert_eq!(Theme::from_stored(""), None);
    }
}
