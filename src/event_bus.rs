//! Named-event registry with ordered, synchronous dispatch.
//!
//! DESIGN
//! ======
//! Listeners are stored per event name in registration order and invoked
//! FIFO. `fire` snapshots the listener list before invoking anything, so a
//! listener may call `on`/`off` on the same bus mid-dispatch: the change takes
//! effect from the next dispatch on, and the in-flight one finishes against
//! its snapshot.
//!
//! FAILURE POLICY
//! ==============
//! Listeners are not isolated from each other. The first listener that
//! returns `Err` aborts the remaining listeners of that dispatch and the error
//! propagates to the caller of `fire`.
//!
//! Entries are created on first `on` and never garbage-collected; an entry
//! whose listeners were all removed simply dispatches to nobody.

#[cfg(test)]
#[path = "event_bus_test.rs"]
mod event_bus_test;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;

use crate::binding::Binding;
use crate::error::{CanvasError, ListenerError};

/// A registered listener callback.
pub type Callback<E, R> = Rc<dyn Fn(&E) -> Result<R, ListenerError>>;

/// Handle returned by `on`, used to remove that registration with `off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Listener<E, R> {
    id: ListenerId,
    callback: Callback<E, R>,
}

/// Event registry for payload type `E`; listeners return `R`.
pub struct EventBus<E, R = ()> {
    events: RefCell<HashMap<String, Vec<Listener<E, R>>>>,
    next_id: Cell<u64>,
}

impl<E, R> Default for EventBus<E, R> {
    fn default() -> Self {
        Self { events: RefCell::new(HashMap::new()), next_id: Cell::new(1) }
    }
}

impl<E, R> std::fmt::Debug for EventBus<E, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let events = self.events.borrow();
        let mut names = events.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("EventBus").field("events", &names).finish_non_exhaustive()
    }
}

impl<E: 'static, R: 'static> EventBus<E, R> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` under `name`, after any existing listeners.
    pub fn on<F>(&self, name: &str, callback: F) -> ListenerId
    where
        F: Fn(&E) -> Result<R, ListenerError> + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.events
            .borrow_mut()
            .entry(name.to_owned())
            .or_default()
            .push(Listener { id, callback: Rc::new(callback) });
        id
    }

    /// Remove the registration `id` from `name`.
    ///
    /// Unknown names and ids are a no-op; returns whether anything was removed.
    pub fn off(&self, name: &str, id: ListenerId) -> bool {
        let mut events = self.events.borrow_mut();
        let Some(listeners) = events.get_mut(name) else {
            return false;
        };
        let Some(index) = listeners.iter().position(|l| l.id == id) else {
            return false;
        };
        listeners.remove(index);
        true
    }

    /// Invoke every listener of `name` in registration order.
    ///
    /// Returns whether any listener was registered.
    ///
    /// # Errors
    ///
    /// Returns the first listener error; later listeners are not invoked.
    pub fn fire(&self, name: &str, event: &E) -> Result<bool, ListenerError> {
        let listeners = self.snapshot(name);
        for callback in &listeners {
            callback(event)?;
        }
        Ok(!listeners.is_empty())
    }

    /// Invoke every listener of `name` and collect their return values in order.
    ///
    /// # Errors
    ///
    /// Returns the first listener error; results gathered so far are dropped.
    pub fn fire_collecting(&self, name: &str, event: &E) -> Result<Vec<R>, ListenerError> {
        self.snapshot(name).iter().map(|callback| callback(event)).collect()
    }

    /// Number of listeners currently registered under `name`.
    #[must_use]
    pub fn listener_count(&self, name: &str) -> usize {
        self.events.borrow().get(name).map_or(0, Vec::len)
    }

    /// Whether an entry for `name` was ever created.
    #[must_use]
    pub fn has_entry(&self, name: &str) -> bool {
        self.events.borrow().contains_key(name)
    }

    fn snapshot(&self, name: &str) -> Vec<Callback<E, R>> {
        self.events
            .borrow()
            .get(name)
            .map(|listeners| listeners.iter().map(|l| Rc::clone(&l.callback)).collect())
            .unwrap_or_default()
    }
}

impl<E: Serialize + 'static> EventBus<E> {
    /// Register a host-registry entry as a listener.
    ///
    /// The event is serialized to JSON and passed as the single argument; the
    /// entry's return value is ignored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCallback` if `binding` is not a function.
    pub fn on_binding(&self, name: &str, binding: &Binding) -> Result<ListenerId, CanvasError> {
        let Some(function) = binding.callable() else {
            return Err(CanvasError::InvalidCallback { event: name.to_owned() });
        };
        Ok(self.on(name, move |event: &E| {
            let payload = serde_json::to_value(event).map_err(|err| ListenerError::new(err.to_string()))?;
            function(&[payload]).map(drop).map_err(CanvasError::into_listener_error)
        }))
    }
}
