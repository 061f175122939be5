#![forbid(unsafe_code)]

//! Locale-change crossfade wrapper.
//!
//! [`LocaleCrossfade`] wraps arbitrary content. While mounted it listens for
//! [`LANGUAGE_CHANGED`]; every notification advances a generation counter,
//! and the next `tick`/`render` hands the new generation to the transition
//! engine as a fresh identity key. The engine then fades the old rendering
//! out while the new one fades in.
//!
//! The content itself is never snapshotted: every rendered item wraps the
//! latest children. Only the container's visual state transitions.
//!
//! # Lifecycle
//!
//! ```text
//! mount ──subscribe──▶ mounted ──notification──▶ generation += 1 (queued)
//!                         │                         │
//!                         │◀──── tick/render: engine.replace(g) for each queued g
//!                         │
//!                      unmount / drop ──unsubscribe──▶ gone
//! ```
//!
//! # Invariants
//!
//! 1. Mounting registers exactly one listener; unmounting (or dropping,
//!    including during unwinding) removes exactly that listener.
//! 2. Each notification advances the generation by exactly 1. Queued
//!    generations reach the engine one by one, in order; none are merged.
//! 3. The listener only holds a weak reference to the wrapper's state, so a
//!    callback that outlives the wrapper cannot touch it.
//!
//! # Failure Modes
//!
//! - The event source cannot register the listener: `mount` fails with
//!   [`CrossfadeError::Subscribe`]. There is no non-reactive fallback.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use fadeglot_i18n::{LANGUAGE_CHANGED, Listener, ListenerId, LocaleEvents, SubscribeError};
use tracing::{debug, warn};

use crate::config::CrossfadeConfig;
use crate::element::{AnimatedItem, Container};
use crate::transition::{Generation, SpringTransitions, TransitionEngine};

/// Mounting failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CrossfadeError {
    /// The locale-change listener could not be registered.
    #[error("cannot subscribe to locale changes: {0}")]
    Subscribe(#[from] SubscribeError),
}

/// Inputs of a crossfade: the content and an optional class name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossfadeProps<C> {
    pub children: C,
    pub class_name: Option<String>,
}

impl<C> CrossfadeProps<C> {
    #[must_use]
    pub fn new(children: C) -> Self {
        Self {
            children,
            class_name: None,
        }
    }

    #[must_use]
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }
}

/// Generation counter shared with the listener.
#[derive(Debug, Default)]
struct GenerationState {
    counter: Cell<Generation>,
    pending: RefCell<VecDeque<Generation>>,
}

impl GenerationState {
    fn advance(&self) -> Generation {
        let next = self.counter.get() + 1;
        self.counter.set(next);
        self.pending.borrow_mut().push_back(next);
        next
    }

    fn take_pending(&self) -> VecDeque<Generation> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }
}

/// Content wrapper that crossfades whenever the display language changes.
///
/// ```
/// use fadeglot_i18n::{LocaleStrings, Localizer, StringCatalog};
/// use fadeglot_widgets::{CrossfadeProps, LocaleCrossfade};
///
/// let mut catalog = StringCatalog::new();
/// catalog.add_locale("en", LocaleStrings::new().with("title", "Devices"));
/// catalog.add_locale("de", LocaleStrings::new().with("title", "Geräte"));
/// let l10n = Localizer::new(catalog, "en").unwrap();
///
/// let mut fade = LocaleCrossfade::mount(
///     l10n.events(),
///     CrossfadeProps::new(l10n.t("title")).class_name("page"),
/// )
/// .unwrap();
///
/// l10n.change_language("de").unwrap();
/// fade.set_children(l10n.t("title"));
/// assert_eq!(fade.generation(), 1);
/// assert_eq!(fade.render().items.len(), 2);
/// ```
pub struct LocaleCrossfade<C, E: TransitionEngine = SpringTransitions> {
    events: Rc<dyn LocaleEvents>,
    listener: Option<ListenerId>,
    state: Rc<GenerationState>,
    engine: E,
    children: C,
    class_name: Option<String>,
}

impl<C> LocaleCrossfade<C> {
    /// Mount with the default crossfade motion.
    pub fn mount(
        events: Rc<dyn LocaleEvents>,
        props: CrossfadeProps<C>,
    ) -> Result<Self, CrossfadeError> {
        Self::mount_with(events, props, CrossfadeConfig::default())
    }

    /// Mount with custom motion parameters.
    pub fn mount_with(
        events: Rc<dyn LocaleEvents>,
        props: CrossfadeProps<C>,
        config: CrossfadeConfig,
    ) -> Result<Self, CrossfadeError> {
        if let Some(problem) = config.validate().first() {
            warn!(%problem, "crossfade config may never settle");
        }
        Self::mount_with_engine(events, props, SpringTransitions::new(0, config))
    }
}

impl<C, E: TransitionEngine> LocaleCrossfade<C, E> {
    /// Mount on a caller-supplied engine. The engine is expected to start
    /// keyed at generation 0.
    pub fn mount_with_engine(
        events: Rc<dyn LocaleEvents>,
        props: CrossfadeProps<C>,
        engine: E,
    ) -> Result<Self, CrossfadeError> {
        let state = Rc::new(GenerationState::default());
        let weak = Rc::downgrade(&state);
        let listener: Listener = Rc::new(move |_locale: &str| {
            if let Some(state) = weak.upgrade() {
                let generation = state.advance();
                debug!(generation, "locale change queued");
            }
        });

        let id = events.subscribe(LANGUAGE_CHANGED, listener)?;
        debug!(listener = %id, "crossfade mounted");

        Ok(Self {
            events,
            listener: Some(id),
            state,
            engine,
            children: props.children,
            class_name: props.class_name,
        })
    }

    /// Generation counter, including notifications not yet rendered.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.state.counter.get()
    }

    /// Listener registered at mount.
    #[must_use]
    pub fn listener_id(&self) -> Option<ListenerId> {
        self.listener
    }

    /// Hand queued generations to the engine, oldest first.
    pub fn sync(&mut self) {
        for generation in self.state.take_pending() {
            self.engine.replace(generation);
        }
    }

    /// Advance animations by `dt`. Returns `true` while anything moves.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.sync();
        self.engine.tick(dt)
    }

    /// Render the container. Every item wraps the latest children.
    pub fn render(&mut self) -> Container<'_, C> {
        self.sync();
        let children = &self.children;
        Container {
            class_name: self.class_name.as_deref().unwrap_or(""),
            items: self
                .engine
                .items()
                .into_iter()
                .map(|snapshot| AnimatedItem::new(snapshot, children))
                .collect(),
        }
    }

    #[must_use]
    pub fn children(&self) -> &C {
        &self.children
    }

    /// Replace the content. Takes effect on every item, leaving ones
    /// included.
    pub fn set_children(&mut self, children: C) {
        self.children = children;
    }

    /// Class name passed to the container; empty when unset.
    #[must_use]
    pub fn class_name(&self) -> &str {
        self.class_name.as_deref().unwrap_or("")
    }

    pub fn set_class_name(&mut self, class_name: Option<String>) {
        self.class_name = class_name;
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Unsubscribe and tear down.
    pub fn unmount(self) {
        drop(self);
    }

    fn release(&mut self) {
        if let Some(id) = self.listener.take() {
            let removed = self.events.unsubscribe(id);
            debug!(listener = %id, removed, generation = self.generation(), "crossfade unmounted");
        }
    }
}

impl<C, E: TransitionEngine> Drop for LocaleCrossfade<C, E> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<C: fmt::Debug, E: TransitionEngine> fmt::Debug for LocaleCrossfade<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleCrossfade")
            .field("listener", &self.listener)
            .field("generation", &self.generation())
            .field("current_key", &self.engine.current_key())
            .field("class_name", &self.class_name)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
