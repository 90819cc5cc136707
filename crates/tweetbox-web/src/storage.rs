//! `window.localStorage` as a tweetbox key-value store.

use tweetbox_core::{Error, KeyValueStore};
use wasm_bindgen::JsValue;
use web_sys::{Storage, Window};

/// Browser local storage. Clones share the same underlying storage.
#[derive(Clone)]
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// The window's local storage, if the browser exposes one.
    pub fn from_window(window: &Window) -> Result<Self, Error> {
        let storage = window
            .local_storage()
            .map_err(|e| Error::Storage(format!("localStorage unavailable: {}", describe(&e))))?
            .ok_or_else(|| Error::Storage("localStorage unavailable".into()))?;
        Ok(Self::new(storage))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.storage
            .get_item(key)
            .map_err(|e| Error::Storage(format!("Failed to read {}: {}", key, describe(&e))))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        // Throws QuotaExceededError when the origin is out of space.
        self.storage
            .set_item(key, value)
            .map_err(|e| Error::Storage(format!("Failed to write {}: {}", key, describe(&e))))
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
