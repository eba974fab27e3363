//! Platform abstraction layer
//!
//! Handles browser/native differences for durable key-value storage:
//! LocalStorage on web, an in-memory store everywhere else.

pub mod storage;

#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorage;
pub use storage::{KeyValueStore, MemoryStore};

use std::rc::Rc;

/// Best available durable store for the current target
///
/// Falls back to a fresh [`MemoryStore`] when LocalStorage is missing
/// (private mode, sandboxed iframe) so callers keep working for the session.
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Rc<dyn KeyValueStore> {
    match LocalStorage::open() {
        Ok(storage) => Rc::new(storage),
        Err(err) => {
            log::warn!("LocalStorage unavailable ({}), using in-memory store", err);
            Rc::new(MemoryStore::new())
        }
    }
}

/// Native targets have no browser storage; values live for the process only
#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> Rc<dyn KeyValueStore> {
    Rc::new(MemoryStore::new())
}

/// Whether a storage `DOMException` means the origin's quota is used up
///
/// Chromium and Safari report `QuotaExceededError` (legacy code 22),
/// Firefox `NS_ERROR_DOM_QUOTA_REACHED` (code 1014).
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn is_quota_exceeded(name: &str, code: u16) -> bool {
    matches!(name, "QuotaExceededError" | "NS_ERROR_DOM_QUOTA_REACHED")
        || matches!(code, 22 | 1014)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_error_names() {
        assert!(is_quota_exceeded("QuotaExceededError", 22));
        assert!(is_quota_exceeded("NS_ERROR_DOM_QUOTA_REACHED", 1014));
        // Matched by code alone when the name is localized or missing
        assert!(is_quota_exceeded("", 1014));
        assert!(!is_quota_exceeded("SecurityError", 18));
        assert!(!is_quota_exceeded("InvalidStateError", 11));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_native_default_store_is_memory() {
        let store = default_store();
        assert_eq!(store.get_item("QCAT_WEBAPP_missing"), Ok(None));
        store.set_item("QCAT_WEBAPP_k", "1").unwrap();
        assert_eq!(store.get_item("QCAT_WEBAPP_k"), Ok(Some("1".to_string())));
    }
}
