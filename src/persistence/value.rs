//! Reactive values backed by a durable key-value store
//!
//! The stored entry is read once at creation and rewritten after every
//! mutation. The default is not written on creation; an untouched value
//! leaves the store as it was.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::codec::{Codec, JsonCodec};
use crate::error::PersistError;
use crate::platform::KeyValueStore;
use crate::reactive::{Reactive, SubscriptionId};
use crate::settings::Settings;

/// Where the initial value came from
#[derive(Debug)]
pub enum LoadOutcome {
    /// Decoded from an existing entry
    Restored,
    /// No entry existed
    Defaulted,
    /// Entry was unreadable; the default was used instead
    Recovered(PersistError),
}

impl LoadOutcome {
    pub fn is_restored(&self) -> bool {
        matches!(self, LoadOutcome::Restored)
    }

    pub fn error(&self) -> Option<&PersistError> {
        match self {
            LoadOutcome::Recovered(err) => Some(err),
            _ => None,
        }
    }
}

type ErrorSink = Box<dyn FnMut(&PersistError)>;

#[derive(Default)]
struct WriteStatus {
    last_error: Option<PersistError>,
    sink: Option<ErrorSink>,
}

/// A [`Reactive`] whose every change is written to storage
pub struct PersistentValue<T> {
    key: String,
    value: Reactive<T>,
    store: Rc<dyn KeyValueStore>,
    codec: Rc<dyn Codec<T>>,
    outcome: LoadOutcome,
    status: Rc<RefCell<WriteStatus>>,
    writer: SubscriptionId,
}

/// Persistent JSON value under the default `QCAT_WEBAPP_` namespace
pub fn make_persistent_value<T>(
    store: Rc<dyn KeyValueStore>,
    key: &str,
    default_value: T,
) -> PersistentValue<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    make_persistent_value_with(
        store,
        &Settings::default(),
        key,
        default_value,
        JsonCodec::<T>::new(),
    )
}

/// Persistent value with explicit settings and codec
pub fn make_persistent_value_with<T, C>(
    store: Rc<dyn KeyValueStore>,
    settings: &Settings,
    key: &str,
    default_value: T,
    codec: C,
) -> PersistentValue<T>
where
    T: 'static,
    C: Codec<T> + 'static,
{
    let address = settings.namespaced_key(key);
    let codec: Rc<dyn Codec<T>> = Rc::new(codec);

    let (initial, outcome) = match load(store.as_ref(), codec.as_ref(), &address) {
        Ok(Some(value)) => {
            log::info!("Loaded {} from storage", address);
            (value, LoadOutcome::Restored)
        }
        Ok(None) => {
            log::info!("No stored entry for {}, using default", address);
            (default_value, LoadOutcome::Defaulted)
        }
        Err(err) => {
            log::warn!("{}; using default", err);
            (default_value, LoadOutcome::Recovered(err))
        }
    };

    let value = Reactive::new(initial);
    let status = Rc::new(RefCell::new(WriteStatus::default()));

    let writer = {
        let store = Rc::clone(&store);
        let codec = Rc::clone(&codec);
        let status = Rc::clone(&status);
        let address = address.clone();
        let handle = value.downgrade();
        value.subscribe(move |new_value| {
            match save(store.as_ref(), codec.as_ref(), &address, new_value) {
                Ok(()) => log::debug!("Saved {}", address),
                Err(err) => {
                    log::warn!("{}; keeping in-memory value", err);
                    let status = Rc::clone(&status);
                    match handle.upgrade() {
                        // Sink may mutate the value, so wait until it is released
                        Some(value) => value.after_notify(move || report(&status, err)),
                        None => report(&status, err),
                    }
                }
            }
        })
    };

    PersistentValue {
        key: address,
        value,
        store,
        codec,
        outcome,
        status,
        writer,
    }
}

fn load<T>(
    store: &dyn KeyValueStore,
    codec: &dyn Codec<T>,
    address: &str,
) -> Result<Option<T>, PersistError> {
    let raw = store
        .get_item(address)
        .map_err(|source| PersistError::Persistence {
            key: address.to_string(),
            source,
        })?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    codec
        .decode(&raw)
        .map(Some)
        .map_err(|source| PersistError::Deserialization {
            key: address.to_string(),
            source,
        })
}

fn save<T>(
    store: &dyn KeyValueStore,
    codec: &dyn Codec<T>,
    address: &str,
    value: &T,
) -> Result<(), PersistError> {
    let raw = codec
        .encode(value)
        .map_err(|source| PersistError::Serialization {
            key: address.to_string(),
            source,
        })?;
    store
        .set_item(address, &raw)
        .map_err(|source| PersistError::Persistence {
            key: address.to_string(),
            source,
        })
}

/// Record a failed write; the in-memory value stays authoritative
fn report(status: &RefCell<WriteStatus>, err: PersistError) {
    // Status is not borrowed while the sink runs, so it may use the value
    let sink = status.borrow_mut().sink.take();
    if let Some(mut sink) = sink {
        sink(&err);
        let mut status = status.borrow_mut();
        if status.sink.is_none() {
            status.sink = Some(sink);
        }
    }
    status.borrow_mut().last_error = Some(err);
}

impl<T> PersistentValue<T> {
    /// Namespaced storage address
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.outcome
    }

    /// Shared handle to the underlying reactive value
    ///
    /// Mutations through the handle are persisted too.
    pub fn reactive(&self) -> Reactive<T> {
        self.value.clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.value.with(f)
    }

    pub fn set(&self, value: T) {
        self.value.set(value);
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.value.update(f)
    }

    pub fn subscribe(&self, observer: impl FnMut(&T) + 'static) -> SubscriptionId {
        self.value.subscribe(observer)
    }

    /// Remove an observer. The storage writer cannot be removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        if id == self.writer {
            return false;
        }
        self.value.unsubscribe(id)
    }

    /// Most recent failed write, cleared on read
    pub fn take_last_error(&self) -> Option<PersistError> {
        self.status.borrow_mut().last_error.take()
    }

    /// Forward write failures to `sink`, replacing any previous sink
    pub fn on_error(&self, sink: impl FnMut(&PersistError) + 'static) {
        self.status.borrow_mut().sink = Some(Box::new(sink));
    }

    /// Write the current value now, regardless of changes
    pub fn flush(&self) -> Result<(), PersistError> {
        self.value.with(|value| {
            save(self.store.as_ref(), self.codec.as_ref(), &self.key, value)
        })
    }
}

impl<T: Clone> PersistentValue<T> {
    pub fn get(&self) -> T {
        self.value.get()
    }
}

impl<T: PartialEq> PersistentValue<T> {
    /// Assign and persist only if the value differs
    pub fn set_if_changed(&self, value: T) -> bool {
        self.value.set_if_changed(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentValue")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("outcome", &self.outcome)
            .finish()
    }
}
