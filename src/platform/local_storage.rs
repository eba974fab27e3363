//! `window.localStorage` backend (WASM only)

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Storage};

use super::storage::KeyValueStore;
use crate::error::StorageError;

/// Origin-scoped browser storage
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// Open the window's LocalStorage
    ///
    /// Fails when there is no window (workers) or storage access is denied.
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|err| StorageError::Unavailable(describe(&err)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is null".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|err| StorageError::Unavailable(describe(&err)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(|err| {
            if is_quota_error(&err) {
                // The browser does not report remaining space
                StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed: key.len() + value.len(),
                    available: 0,
                }
            } else {
                StorageError::Unavailable(describe(&err))
            }
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|err| StorageError::Unavailable(describe(&err)))
    }
}

fn is_quota_error(err: &JsValue) -> bool {
    err.dyn_ref::<DomException>()
        .map(|e| super::is_quota_exceeded(&e.name(), e.code()))
        .unwrap_or(false)
}

fn describe(err: &JsValue) -> String {
    match err.dyn_ref::<DomException>() {
        Some(e) => format!("{}: {}", e.name(), e.message()),
        None => format!("{:?}", err),
    }
}
