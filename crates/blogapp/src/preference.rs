//! # Preference Store
//!
//! Client-only display preferences: the dark-mode flag and the interface
//! language. Neither has a server counterpart and nothing here touches the
//! network.
//!
//! ## Dark Mode
//!
//! The initial value is resolved once, at construction:
//! 1. the persisted `darkMode` entry (a JSON boolean), if present and valid
//! 2. the platform's color-scheme preference, if it can be detected
//! 3. `false`
//!
//! The resolved value is applied to the [`DisplayRoot`] right away but only
//! written to storage by [`PreferenceStore::toggle`].
//!
//! ## Language
//!
//! Stored under `i18nextLng` as a language code. Unknown or missing values
//! fall back to [`Language::default`].

use crate::error::Result;
use crate::i18n::Language;
use crate::store::{keys, StorageBackend};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

/// Flag name set on the display root while dark mode is on.
pub const DARK_FLAG: &str = "dark";

/// The top-level display element whose flags select the theme.
pub trait DisplayRoot {
    fn set_flag(&self, flag: &str, on: bool);
}

/// A display root that simply remembers its flags.
#[derive(Debug, Default)]
pub struct RootFlags {
    flags: RefCell<BTreeSet<String>>,
}

impl RootFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, flag: &str) -> bool {
        self.flags.borrow().contains(flag)
    }
}

impl DisplayRoot for RootFlags {
    fn set_flag(&self, flag: &str, on: bool) {
        let mut flags = self.flags.borrow_mut();
        if on {
            flags.insert(flag.to_string());
        } else {
            flags.remove(flag);
        }
    }
}

/// Asks the OS whether it prefers a dark color scheme.
///
/// The OS always gives an answer here. A platform hook that returns `None`
/// is what makes [`PreferenceStore::new`] fall back to light mode.
pub fn platform_prefers_dark() -> Option<bool> {
    match dark_light::detect() {
        dark_light::Mode::Dark => Some(true),
        dark_light::Mode::Light => Some(false),
    }
}

pub struct PreferenceStore<B: StorageBackend> {
    storage: Rc<B>,
    root: Rc<dyn DisplayRoot>,
    dark: Cell<bool>,
}

impl<B: StorageBackend> PreferenceStore<B> {
    /// `platform` is consulted only when nothing valid is persisted.
    pub fn new(
        storage: Rc<B>,
        root: Rc<dyn DisplayRoot>,
        platform: impl FnOnce() -> Option<bool>,
    ) -> Self {
        let dark = match persisted_dark(storage.as_ref()) {
            Some(dark) => dark,
            None => platform().unwrap_or(false),
        };
        root.set_flag(DARK_FLAG, dark);
        Self {
            storage,
            root,
            dark: Cell::new(dark),
        }
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark.get()
    }

    /// Flips dark mode, persists it and updates the display root.
    ///
    /// The in-memory value and the root change even if persisting fails;
    /// the storage error is still returned.
    pub fn toggle(&self) -> Result<bool> {
        let dark = !self.dark.get();
        self.dark.set(dark);
        self.root.set_flag(DARK_FLAG, dark);
        tracing::debug!(dark, "Dark mode toggled");
        self.storage
            .set_item(keys::DARK_MODE, if dark { "true" } else { "false" })?;
        Ok(dark)
    }

    pub fn language(&self) -> Language {
        match self.storage.get_item(keys::LANGUAGE) {
            Ok(Some(code)) => code.parse().unwrap_or_default(),
            Ok(None) => Language::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read language preference");
                Language::default()
            }
        }
    }

    pub fn set_language(&self, language: Language) -> Result<()> {
        self.storage.set_item(keys::LANGUAGE, language.code())
    }
}

fn persisted_dark<B: StorageBackend>(storage: &B) -> Option<bool> {
    let raw = match storage.get_item(keys::DARK_MODE) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read dark mode preference");
            return None;
        }
    };
    match serde_json::from_str::<bool>(&raw) {
        Ok(dark) => Some(dark),
        Err(_) => {
            tracing::warn!(value = %raw, "Ignoring invalid dark mode preference");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    fn store_with(
        persisted: Option<&str>,
        platform: Option<bool>,
    ) -> (PreferenceStore<MemBackend>, Rc<MemBackend>, Rc<RootFlags>) {
        let storage = Rc::new(MemBackend::new());
        if let Some(value) = persisted {
            storage.set_item(keys::DARK_MODE, value).unwrap();
        }
        let root = Rc::new(RootFlags::new());
        let store = PreferenceStore::new(storage.clone(), root.clone(), move || platform);
        (store, storage, root)
    }

    #[test]
    fn test_persisted_value_wins_over_platform() {
        let (store, _, root) = store_with(Some("false"), Some(true));
        assert!(!store.is_dark_mode());
        assert!(!root.has(DARK_FLAG));
    }

    #[test]
    fn test_platform_used_when_nothing_persisted() {
        let (store, storage, root) = store_with(None, Some(true));
        assert!(store.is_dark_mode());
        assert!(root.has(DARK_FLAG));
        // Resolving the initial value does not write it back
        assert_eq!(storage.get_item(keys::DARK_MODE).unwrap(), None);
    }

    #[test]
    fn test_defaults_to_light() {
        let (store, _, _) = store_with(None, None);
        assert!(!store.is_dark_mode());
    }

    #[test]
    fn test_platform_detection_always_answers() {
        assert!(platform_prefers_dark().is_some());
    }

    #[test]
    fn test_invalid_persisted_value_falls_through() {
        let (store, _, _) = store_with(Some("maybe"), Some(true));
        assert!(store.is_dark_mode());
    }

    #[test]
    fn test_toggle_persists_and_updates_root() {
        let (store, storage, root) = store_with(None, None);

        assert!(store.toggle().unwrap());
        assert!(root.has(DARK_FLAG));
        assert_eq!(storage.get_item(keys::DARK_MODE).unwrap(), Some("true".into()));

        assert!(!store.toggle().unwrap());
        assert!(!root.has(DARK_FLAG));
        assert_eq!(storage.get_item(keys::DARK_MODE).unwrap(), Some("false".into()));
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let (store, storage, root) = store_with(Some("true"), None);
        store.toggle().unwrap();
        store.toggle().unwrap();
        assert!(store.is_dark_mode());
        assert!(root.has(DARK_FLAG));
        assert_eq!(storage.get_item(keys::DARK_MODE).unwrap(), Some("true".into()));
    }

    #[test]
    fn test_language_round_trip() {
        let (store, storage, _) = store_with(None, None);
        assert_eq!(store.language(), Language::Tr);

        store.set_language(Language::En).unwrap();
        assert_eq!(storage.get_item(keys::LANGUAGE).unwrap(), Some("en".into()));
        assert_eq!(store.language(), Language::En);

        storage.set_item(keys::LANGUAGE, "en-US").unwrap();
        assert_eq!(store.language(), Language::En);

        storage.set_item(keys::LANGUAGE, "klingon").unwrap();
        assert_eq!(store.language(), Language::Tr);
    }
}
