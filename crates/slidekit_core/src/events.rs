//! Synchronous event bus
//!
//! Listeners register per event name and run in registration order with a
//! typed payload. Dispatch snapshots the listener list first, so a listener
//! may subscribe, unsubscribe or re-enter the emitting component.
//!
//! # Example
//!
//! ```rust
//! use slidekit_core::events::EventBus;
//!
//! let bus: EventBus<u32> = EventBus::new();
//! let id = bus.subscribe("tick", |n| println!("tick {n}"));
//! assert_eq!(bus.emit("tick", &1), 1);
//! bus.unsubscribe(id);
//! assert_eq!(bus.emit("tick", &2), 0);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;

/// Handle returned by [`EventBus::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<T> = Rc<dyn Fn(&T)>;

/// Per-name listener lists carrying payloads of type `T`
pub struct EventBus<T> {
    listeners: RefCell<FxHashMap<&'static str, Vec<(ListenerId, Listener<T>)>>>,
    next_id: Cell<u64>,
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventBus<T> {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(FxHashMap::default()),
            next_id: Cell::new(0),
        }
    }

    /// Register a listener for `name`
    pub fn subscribe<F>(&self, name: &'static str, callback: F) -> ListenerId
    where
        F: Fn(&T) + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners
            .borrow_mut()
            .entry(name)
            .or_default()
            .push((id, Rc::new(callback)));
        id
    }

    /// Remove a listener; returns whether it was registered
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        for list in listeners.values_mut() {
            if let Some(pos) = list.iter().position(|(lid, _)| *lid == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    /// Invoke every listener for `name`; returns how many ran
    pub fn emit(&self, name: &str, payload: &T) -> usize {
        let snapshot: Vec<Listener<T>> = self
            .listeners
            .borrow()
            .get(name)
            .map(|list| list.iter().map(|(_, l)| Rc::clone(l)).collect())
            .unwrap_or_default();
        for listener in &snapshot {
            listener(payload);
        }
        snapshot.len()
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.borrow().get(name).map_or(0, Vec::len)
    }

    /// Drop every listener
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }
}

impl<T> std::fmt::Debug for EventBus<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.borrow();
        let mut names: Vec<_> = listeners.iter().map(|(k, v)| (*k, v.len())).collect();
        names.sort_unstable();
        f.debug_struct("EventBus").field("listeners", &names).finish()
    }
}
