//! Small persistence interface over the browser key-value store.
//!
//! The channel/poller cores take the store as a parameter so their logic can
//! be exercised in native tests with an in-memory map.

use web_sys::window;

/// Minimal get/set persistence used for baselines and cached profiles.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Production store backed by `window.localStorage`.
///
/// Every accessor degrades to a no-op when the storage area is unavailable
/// (private browsing, detached window): persistence here is a convenience,
/// never a correctness requirement.
#[derive(Clone, Copy, Default)]
pub struct BrowserStorage;

fn local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// In-memory store for native tests of code that persists through
/// [`KeyValueStore`].
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: std::cell::RefCell<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.map.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.map.borrow_mut().remove(key);
    }
}
