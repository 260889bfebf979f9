// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory config store fake for testing without filesystem I/O.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use topo_app_core::config::{ConfigError, ConfigStore, INTERACTION_PREFS_KEY};
use topo_app_core::prefs::InteractionPrefs;

/// In-memory [`ConfigStore`] with call counters and failure injection.
///
/// Clones share state, so a test can hand one clone to a
/// [`ConfigService`](topo_app_core::config::ConfigService) and inspect the other.
///
/// # Example
///
/// ```
/// use topo_dry_tests::InMemoryConfigStore;
/// use topo_app_core::config::{ConfigService, INTERACTION_PREFS_KEY};
/// use topo_app_core::prefs::InteractionPrefs;
///
/// let store = InMemoryConfigStore::new();
/// let service = ConfigService::new(store.clone());
///
/// service.save(INTERACTION_PREFS_KEY, &InteractionPrefs::default()).unwrap();
/// assert_eq!(store.save_count(), 1);
/// assert!(store.contains_key(INTERACTION_PREFS_KEY));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    data: HashMap<String, Vec<u8>>,
    load_count: usize,
    save_count: usize,
    fail_on_load: bool,
    fail_on_save: bool,
}

impl InMemoryConfigStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `prefs` under [`INTERACTION_PREFS_KEY`].
    pub fn with_prefs(prefs: &InteractionPrefs) -> Self {
        let store = Self::new();
        if let Ok(bytes) = serde_json::to_vec(prefs) {
            store.lock().data.insert(INTERACTION_PREFS_KEY.to_owned(), bytes);
        }
        store
    }

    /// Store holding a raw blob under `key` (e.g. malformed JSON).
    pub fn with_raw(key: &str, data: &[u8]) -> Self {
        let store = Self::new();
        store.lock().data.insert(key.to_owned(), data.to_vec());
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every `load_raw` fail.
    pub fn set_fail_on_load(&self, fail: bool) {
        self.lock().fail_on_load = fail;
    }

    /// Make every `save_raw` fail.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.lock().fail_on_save = fail;
    }

    /// `load_raw` attempts, failed ones included.
    pub fn load_count(&self) -> usize {
        self.lock().load_count
    }

    /// `save_raw` attempts, failed ones included.
    pub fn save_count(&self) -> usize {
        self.lock().save_count
    }

    /// True when `key` holds a blob.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().data.contains_key(key)
    }

    /// Raw blob stored under `key`.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().data.get(key).cloned()
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let mut inner = self.lock();
        inner.load_count += 1;
        if inner.fail_on_load {
            return Err(ConfigError::Other("simulated load failure".into()));
        }
        inner.data.get(key).cloned().ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let mut inner = self.lock();
        inner.save_count += 1;
        if inner.fail_on_save {
            return Err(ConfigError::Other("simulated save failure".into()));
        }
        inner.data.insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use topo_app_core::config::ConfigService;
    use topo_app_core::prefs::ModifierKey;

    #[test]
    fn prefs_round_trip_through_the_service() {
        let prefs = InteractionPrefs {
            regroup_modifier: ModifierKey::Alt,
            ..InteractionPrefs::default()
        };
        let store = InMemoryConfigStore::with_prefs(&prefs);
        let service = ConfigService::new(store.clone());
        let loaded: InteractionPrefs = service.load_or_default(INTERACTION_PREFS_KEY).unwrap();
        assert_eq!(loaded, prefs);
        assert_eq!(store.load_count(), 1);
    }

    #[test]
    fn missing_prefs_fall_back_to_defaults() {
        let service = ConfigService::new(InMemoryConfigStore::new());
        let loaded: InteractionPrefs = service.load_or_default(INTERACTION_PREFS_KEY).unwrap();
        assert_eq!(loaded, InteractionPrefs::default());
    }

    #[test]
    fn malformed_blobs_are_decode_errors() {
        let store = InMemoryConfigStore::with_raw(INTERACTION_PREFS_KEY, b"{not json");
        let service = ConfigService::new(store);
        let err = service
            .load::<InteractionPrefs>(INTERACTION_PREFS_KEY)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Serde(_)));
    }

    #[test]
    fn failures_still_count_and_store_nothing() {
        let store = InMemoryConfigStore::new();
        store.set_fail_on_save(true);
        assert!(store.save_raw("k", b"v").is_err());
        assert_eq!(store.save_count(), 1);
        assert!(!store.contains_key("k"));

        store.set_fail_on_save(false);
        store.save_raw("k", b"v").unwrap();
        store.set_fail_on_load(true);
        assert!(matches!(store.load_raw("k"), Err(ConfigError::Other(_))));
        assert_eq!(store.raw("k").as_deref(), Some(&b"v"[..]));
    }

    #[test]
    fn clones_share_state() {
        let a = InMemoryConfigStore::new();
        let b = a.clone();
        a.save_raw("shared", b"1").unwrap();
        assert_eq!(b.load_raw("shared").unwrap(), b"1");
        assert_eq!(b.save_count(), 1);
        let raw = serde_json::to_vec(&InteractionPrefs::default()).unwrap();
        b.save_raw(INTERACTION_PREFS_KEY, &raw).unwrap();
        assert!(a.contains_key(INTERACTION_PREFS_KEY));
    }
}
