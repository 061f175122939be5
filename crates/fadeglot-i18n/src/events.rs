#![forbid(unsafe_code)]

//! Named event stream for localization notifications.
//!
//! # Design
//!
//! [`LocaleEvents`] is the narrow capability components depend on: register
//! a listener under an event name, get a [`ListenerId`] back, hand the id
//! back to unregister. [`EventBus`] is the single-threaded implementation
//! used by the [`Localizer`](crate::Localizer).
//!
//! Listeners are `Rc<dyn Fn(&str)>`; the argument is the event payload (for
//! [`LANGUAGE_CHANGED`], the new locale tag). Listeners that only care
//! about the occurrence ignore it.
//!
//! # Invariants
//!
//! 1. Listener ids are never reused within one bus.
//! 2. `emit` delivers in registration order.
//! 3. A listener unregistered before `emit` starts is never called by it.
//! 4. Listeners may subscribe or unsubscribe re-entrantly from inside a
//!    delivery; changes take effect from the next `emit`, except removal of
//!    a listener not yet reached, which is honored immediately.
//!
//! # Failure Modes
//!
//! - A panicking listener aborts the current delivery pass; the panic
//!   propagates to the emitter and the bus stays usable afterwards.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, info_span};

/// Event emitted after the active display language changed.
pub const LANGUAGE_CHANGED: &str = "languageChanged";

/// Callback registered on an event stream.
pub type Listener = Rc<dyn Fn(&str)>;

/// Opaque handle returned by [`LocaleEvents::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Build an id from a raw value. For [`LocaleEvents`] implementations
    /// that allocate their own ids.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value, for logging.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// Registration failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubscribeError {
    /// The notification source is not available.
    #[error("event source unavailable for '{event}'")]
    Unavailable { event: String },
    /// The source does not serve this event name.
    #[error("unknown event '{0}'")]
    UnknownEvent(String),
}

/// Subscribe/unsubscribe capability over a named event stream.
pub trait LocaleEvents {
    /// Register `listener` for `event`.
    fn subscribe(&self, event: &str, listener: Listener) -> Result<ListenerId, SubscribeError>;

    /// Remove a listener. Returns `false` if `id` was not registered.
    fn unsubscribe(&self, id: ListenerId) -> bool;

    /// Number of listeners currently registered for `event`.
    fn listener_count(&self, event: &str) -> usize;
}

struct Registration {
    id: ListenerId,
    event: String,
    listener: Listener,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    registrations: Vec<Registration>,
    /// Ids removed while a delivery is in progress.
    removed_during_emit: HashSet<ListenerId>,
    emitting: usize,
}

/// Single-threaded event bus.
///
/// Cloning creates another handle to the same registrations.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventBus")
            .field("listeners", &inner.registrations.len())
            .field("next_id", &inner.next_id)
            .finish()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `payload` to every listener of `event`. Returns how many
    /// listeners were called.
    pub fn emit(&self, event: &str, payload: &str) -> usize {
        let snapshot: Vec<(ListenerId, Listener)> = {
            let mut inner = self.inner.borrow_mut();
            inner.emitting += 1;
            inner
                .registrations
                .iter()
                .filter(|r| r.event == event)
                .map(|r| (r.id, Rc::clone(&r.listener)))
                .collect()
        };

        let _guard = EmitGuard { inner: &self.inner };

        let _span = info_span!("i18n.emit", event, listeners = snapshot.len()).entered();
        let mut delivered = 0;
        for (id, listener) in snapshot {
            let removed = self.inner.borrow().removed_during_emit.contains(&id);
            if removed {
                continue;
            }
            listener(payload);
            delivered += 1;
        }
        delivered
    }
}

/// Ends one delivery pass, also when a listener panics.
struct EmitGuard<'a> {
    inner: &'a RefCell<BusInner>,
}

impl Drop for EmitGuard<'_> {
    fn drop(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.emitting -= 1;
        if inner.emitting == 0 {
            inner.removed_during_emit.clear();
        }
    }
}

impl LocaleEvents for EventBus {
    fn subscribe(&self, event: &str, listener: Listener) -> Result<ListenerId, SubscribeError> {
        if event.is_empty() {
            return Err(SubscribeError::UnknownEvent(String::new()));
        }
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = ListenerId(inner.next_id);
        inner.registrations.push(Registration {
            id,
            event: event.to_owned(),
            listener,
        });
        debug!(%id, event, "listener registered");
        Ok(id)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.registrations.len();
        inner.registrations.retain(|r| r.id != id);
        let removed = inner.registrations.len() != before;
        if removed {
            if inner.emitting > 0 {
                inner.removed_during_emit.insert(id);
            }
            debug!(%id, "listener removed");
        }
        removed
    }

    fn listener_count(&self, event: &str) -> usize {
        self.inner
            .borrow()
            .registrations
            .iter()
            .filter(|r| r.event == event)
            .count()
    }
}
