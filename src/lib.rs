//! QCAT web app helpers
//!
//! Core modules:
//! - `reactive`: Observable value container
//! - `persistence`: Reactive values mirrored to durable storage
//! - `platform`: Browser/native storage backends
//! - `random_id`: Random integer ids for ephemeral identifiers
//! - `settings`: Runtime configuration

pub mod error;
pub mod persistence;
pub mod platform;
pub mod random_id;
pub mod reactive;
pub mod settings;

pub use error::{InvalidRangeError, PersistError, StorageError};
pub use persistence::{LoadOutcome, PersistentValue, make_persistent_value};
pub use platform::{KeyValueStore, MemoryStore, default_store};
pub use random_id::{IdGenerator, IdRange, random_id, random_id_in};
pub use reactive::{Reactive, SubscriptionId, WeakReactive};
pub use settings::Settings;

/// App-wide constants
pub mod consts {
    /// Namespace tag prepended to every persistent key
    pub const STORAGE_KEY_PREFIX: &str = "QCAT_WEBAPP_";

    /// Default random id bounds (inclusive)
    pub const RANDOM_ID_MIN: i64 = 100_000_000;
    pub const RANDOM_ID_MAX: i64 = 900_000_000;
}
