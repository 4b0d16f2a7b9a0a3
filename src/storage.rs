use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::{
    error::{AppResult, lock},
    models::Language,
};

/// Keys persisted in device storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    AuthToken,
    Language,
    OnboardingSeen,
    NotificationsEnabled,
    PushToken,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::AuthToken => "token",
            StorageKey::Language => "language",
            StorageKey::OnboardingSeen => "has_seen_onboarding",
            StorageKey::NotificationsEnabled => "notifications_enabled",
            StorageKey::PushToken => "fcm_token",
        }
    }
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: StorageKey) -> AppResult<Option<String>>;
    fn set(&self, key: StorageKey, value: &str) -> AppResult<()>;
    fn remove(&self, key: StorageKey) -> AppResult<()>;
}

pub type SharedStore = Arc<dyn KeyValueStore>;

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: StorageKey) -> AppResult<Option<String>> {
        Ok(lock(&self.values, "storage")?.get(&key).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> AppResult<()> {
        lock(&self.values, "storage")?.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> AppResult<()> {
        lock(&self.values, "storage")?.remove(&key);
        Ok(())
    }
}

/// JSON object on disk, rewritten in full on every mutation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => HashMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        tracing::debug!(path = %path.display(), keys = values.len(), "opened device storage");
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    fn flush(&self, values: &HashMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: StorageKey) -> AppResult<Option<String>> {
        Ok(lock(&self.values, "storage")?.get(key.as_str()).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> AppResult<()> {
        let mut values = lock(&self.values, "storage")?;
        values.insert(key.as_str().to_string(), value.to_string());
        self.flush(&values)
    }

    fn remove(&self, key: StorageKey) -> AppResult<()> {
        let mut values = lock(&self.values, "storage")?;
        if values.remove(key.as_str()).is_some() {
            self.flush(&values)?;
        }
        Ok(())
    }
}

/// Typed access to the non-session preferences kept in device storage.
#[derive(Clone)]
pub struct Preferences {
    store: SharedStore,
    default_language: Language,
}

impl Preferences {
    pub fn new(store: SharedStore, default_language: Language) -> Self {
        Self {
            store,
            default_language,
        }
    }

    pub fn language(&self) -> AppResult<Language> {
        Ok(self
            .store
            .get(StorageKey::Language)?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(self.default_language))
    }

    pub fn set_language(&self, language: Language) -> AppResult<()> {
        self.store.set(StorageKey::Language, language.code())
    }

    pub fn has_seen_onboarding(&self) -> AppResult<bool> {
        self.flag(StorageKey::OnboardingSeen, false)
    }

    pub fn mark_onboarding_seen(&self) -> AppResult<()> {
        self.store.set(StorageKey::OnboardingSeen, "true")
    }

    pub fn notifications_enabled(&self) -> AppResult<bool> {
        self.flag(StorageKey::NotificationsEnabled, true)
    }

    pub fn set_notifications_enabled(&self, enabled: bool) -> AppResult<()> {
        self.store
            .set(StorageKey::NotificationsEnabled, if enabled { "true" } else { "false" })
    }

    pub fn push_token(&self) -> AppResult<Option<String>> {
        self.store.get(StorageKey::PushToken)
    }

    pub fn set_push_token(&self, token: &str) -> AppResult<()> {
        self.store.set(StorageKey::PushToken, token)
    }

    fn flag(&self, key: StorageKey, default: bool) -> AppResult<bool> {
        Ok(match self.store.get(key)?.as_deref() {
            Some("true") => true,
            Some("false") => false,
            _ => default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("device.json");

        let store = FileStore::open(&path).unwrap();
        store.set(StorageKey::AuthToken, "abc").unwrap();
        store.set(StorageKey::Language, "ar").unwrap();
        store.remove(StorageKey::Language).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get(StorageKey::AuthToken).unwrap().as_deref(),
            Some("abc")
        );
        assert_eq!(reopened.get(StorageKey::Language).unwrap(), None);
    }

    #[test]
    fn preferences_fall_back_to_defaults() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let prefs = Preferences::new(store.clone(), Language::Ar);

        assert_eq!(prefs.language().unwrap(), Language::Ar);
        assert!(!prefs.has_seen_onboarding().unwrap());
        assert!(prefs.notifications_enabled().unwrap());

        prefs.set_language(Language::En).unwrap();
        prefs.mark_onboarding_seen().unwrap();
        prefs.set_notifications_enabled(false).unwrap();

        assert_eq!(prefs.language().unwrap(), Language::En);
        assert!(prefs.has_seen_onboarding().unwrap());
        assert!(!prefs.notifications_enabled().unwrap());
    }
}
