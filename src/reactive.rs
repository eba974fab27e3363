//! Observable value container
//!
//! Observers run synchronously after each mutation, once per mutation.
//! They are called in registration order, but callers should not depend on
//! that. An observer must not mutate the container it is watching; work
//! that needs to do so goes through [`Reactive::after_notify`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Handle returned by [`Reactive::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer<T> = Box<dyn FnMut(&T)>;
type Task = Box<dyn FnOnce()>;

struct Inner<T> {
    value: RefCell<T>,
    observers: RefCell<Vec<(SubscriptionId, Observer<T>)>>,
    /// Observers currently detached for notification
    detached: RefCell<Vec<SubscriptionId>>,
    /// Detached observers unsubscribed before they were reattached
    cancelled: RefCell<Vec<SubscriptionId>>,
    /// Tasks queued by observers, run once the value is released
    deferred: RefCell<Vec<Task>>,
    notifying: Cell<bool>,
    next_id: Cell<u64>,
}

/// Shared, single-threaded observable value
///
/// Clones share the same value and observers.
pub struct Reactive<T> {
    inner: Rc<Inner<T>>,
}

/// Non-owning handle, for observers that must refer back to their container
pub struct WeakReactive<T> {
    inner: Weak<Inner<T>>,
}

impl<T> WeakReactive<T> {
    pub fn upgrade(&self) -> Option<Reactive<T>> {
        self.inner.upgrade().map(|inner| Reactive { inner })
    }
}

impl<T> Clone for WeakReactive<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T> Clone for Reactive<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Reactive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reactive")
            .field("value", &*self.inner.value.borrow())
            .field("observers", &self.observer_count())
            .finish()
    }
}

impl<T> Reactive<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(initial),
                observers: RefCell::new(Vec::new()),
                detached: RefCell::new(Vec::new()),
                cancelled: RefCell::new(Vec::new()),
                deferred: RefCell::new(Vec::new()),
                notifying: Cell::new(false),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Borrow the current value
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Replace the value and notify observers
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.notify();
    }

    /// Mutate in place and notify observers
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut self.inner.value.borrow_mut());
        self.notify();
        result
    }

    /// Register an observer called after every mutation
    pub fn subscribe(&self, observer: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .observers
            .borrow_mut()
            .push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.inner.observers.borrow_mut();
        if let Some(pos) = observers.iter().position(|(oid, _)| *oid == id) {
            observers.remove(pos);
            return true;
        }
        drop(observers);

        let mut cancelled = self.inner.cancelled.borrow_mut();
        if self.inner.detached.borrow().contains(&id) && !cancelled.contains(&id) {
            cancelled.push(id);
            return true;
        }
        false
    }

    pub fn downgrade(&self) -> WeakReactive<T> {
        WeakReactive {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Run `task` once the current notification has finished
    ///
    /// Observers use this to mutate the container they watch. Outside a
    /// notification the task runs immediately.
    pub fn after_notify(&self, task: impl FnOnce() + 'static) {
        if self.inner.notifying.get() {
            self.inner.deferred.borrow_mut().push(Box::new(task));
        } else {
            task();
        }
    }

    pub fn observer_count(&self) -> usize {
        let detached = self.inner.detached.borrow().len();
        let cancelled = self.inner.cancelled.borrow().len();
        self.inner.observers.borrow().len() + detached - cancelled
    }

    fn notify(&self) {
        // Detach observers so they may subscribe/unsubscribe while running
        let mut running = std::mem::take(&mut *self.inner.observers.borrow_mut());
        *self.inner.detached.borrow_mut() = running.iter().map(|(id, _)| *id).collect();
        self.inner.notifying.set(true);
        {
            let value = self.inner.value.borrow();
            for (id, observer) in running.iter_mut() {
                if !self.inner.cancelled.borrow().contains(id) {
                    observer(&value);
                }
            }
        }
        self.inner.notifying.set(false);
        self.inner.detached.borrow_mut().clear();

        let cancelled = std::mem::take(&mut *self.inner.cancelled.borrow_mut());
        running.retain(|(id, _)| !cancelled.contains(id));
        {
            let mut observers = self.inner.observers.borrow_mut();
            let added = std::mem::take(&mut *observers);
            *observers = running;
            observers.extend(added);
        }

        // Value is released; deferred tasks may mutate and notify again
        let tasks = std::mem::take(&mut *self.inner.deferred.borrow_mut());
        for task in tasks {
            task();
        }
    }
}

impl<T: Clone> Reactive<T> {
    /// Clone of the current value
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }
}

impl<T: PartialEq> Reactive<T> {
    /// Assign only if different. Returns whether observers were notified.
    pub fn set_if_changed(&self, value: T) -> bool {
        if *self.inner.value.borrow() == value {
            return false;
        }
        self.set(value);
        true
    }
}

impl<T: Default> Default for Reactive<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
