#![forbid(unsafe_code)]

//! Recording double for [`LocaleEvents`].
//!
//! Counts every registration, removal and delivery so tests can assert the
//! subscribe/unsubscribe pairing of a component without a live
//! [`Localizer`](crate::Localizer).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::events::{EventBus, Listener, ListenerId, LocaleEvents, SubscribeError};

/// Event-stream double backed by a real [`EventBus`].
#[derive(Debug, Default)]
pub struct RecordingEvents {
    bus: EventBus,
    available: bool,
    subscribe_calls: Cell<usize>,
    unsubscribe_calls: Cell<usize>,
    deliveries: Cell<usize>,
    active: RefCell<Vec<ListenerId>>,
}

impl RecordingEvents {
    /// A working event stream.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            available: true,
            ..Self::default()
        })
    }

    /// A stream whose `subscribe` always fails with
    /// [`SubscribeError::Unavailable`].
    #[must_use]
    pub fn unavailable() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Deliver `event` (with an empty payload) to the current listeners.
    /// Returns how many listeners ran.
    pub fn fire(&self, event: &str) -> usize {
        self.fire_with(event, "")
    }

    /// Deliver `event` with `payload`.
    pub fn fire_with(&self, event: &str, payload: &str) -> usize {
        let delivered = self.bus.emit(event, payload);
        self.deliveries.set(self.deliveries.get() + delivered);
        delivered
    }

    /// Total successful and failed `subscribe` calls.
    #[must_use]
    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls.get()
    }

    /// Total `unsubscribe` calls, including ones for unknown ids.
    #[must_use]
    pub fn unsubscribe_calls(&self) -> usize {
        self.unsubscribe_calls.get()
    }

    /// Listener invocations performed by [`fire`](Self::fire).
    #[must_use]
    pub fn deliveries(&self) -> usize {
        self.deliveries.get()
    }

    /// Ids handed out and not yet removed.
    #[must_use]
    pub fn active_ids(&self) -> Vec<ListenerId> {
        self.active.borrow().clone()
    }
}

impl LocaleEvents for RecordingEvents {
    fn subscribe(&self, event: &str, listener: Listener) -> Result<ListenerId, SubscribeError> {
        self.subscribe_calls.set(self.subscribe_calls.get() + 1);
        if !self.available {
            return Err(SubscribeError::Unavailable {
                event: event.to_owned(),
            });
        }
        let id = self.bus.subscribe(event, listener)?;
        self.active.borrow_mut().push(id);
        Ok(id)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.unsubscribe_calls.set(self.unsubscribe_calls.get() + 1);
        self.active.borrow_mut().retain(|active| *active != id);
        self.bus.unsubscribe(id)
    }

    fn listener_count(&self, event: &str) -> usize {
        self.bus.listener_count(event)
    }
}
