//! Runtime configuration
//!
//! Defaults come from [`crate::consts`]; override the key prefix to share a
//! store between apps without collisions.

use serde::{Deserialize, Serialize};

use crate::consts::STORAGE_KEY_PREFIX;
use crate::random_id::IdRange;

/// Crate settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Prepended to every persistent key
    pub key_prefix: String,
    /// Bounds used by [`Settings::random_id`]
    #[serde(default)]
    pub id_range: IdRange,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            key_prefix: STORAGE_KEY_PREFIX.to_string(),
            id_range: IdRange::default(),
        }
    }
}

impl Settings {
    /// Settings with a custom key prefix and default id bounds
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Storage address for `key`
    pub fn namespaced_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    /// Draw an id from the configured range
    pub fn random_id(&self) -> i64 {
        self.id_range.sample(&mut rand::rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{RANDOM_ID_MAX, RANDOM_ID_MIN};

    #[test]
    fn test_default_prefix() {
        let settings = Settings::default();
        assert_eq!(settings.namespaced_key("theme"), "QCAT_WEBAPP_theme");
    }

    #[test]
    fn test_custom_prefix() {
        let settings = Settings::with_prefix("OTHER_");
        assert_eq!(settings.namespaced_key("theme"), "OTHER_theme");
        assert_eq!(settings.id_range, IdRange::default());
    }

    #[test]
    fn test_settings_json_missing_range() {
        let settings: Settings = serde_json::from_str(r#"{"key_prefix":"X_"}"#).unwrap();
        assert_eq!(settings.key_prefix, "X_");
        assert_eq!(settings.id_range.min(), RANDOM_ID_MIN);
        assert_eq!(settings.id_range.max(), RANDOM_ID_MAX);
    }

    #[test]
    fn test_settings_random_id_in_range() {
        let settings = Settings {
            id_range: IdRange::new(3, 4).unwrap(),
            ..Settings::default()
        };
        for _ in 0..100 {
            let id = settings.random_id();
            assert!((3..=4).contains(&id));
        }
    }
}
