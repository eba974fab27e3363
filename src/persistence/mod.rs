//! Persistent reactive values
//!
//! Features:
//! - Namespaced keys (`QCAT_WEBAPP_` by default)
//! - Pluggable codec, JSON by default
//! - Fallback to the default on unreadable entries
//! - Write failures reported without disturbing the in-memory value

pub mod codec;
pub mod value;

pub use codec::{Codec, JsonCodec};
pub use value::{LoadOutcome, PersistentValue, make_persistent_value, make_persistent_value_with};
