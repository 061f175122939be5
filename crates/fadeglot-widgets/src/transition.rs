#![forbid(unsafe_code)]

//! Keyed transition engine.
//!
//! Content is identified by a [`Generation`] key. When the key changes the
//! engine treats it as "content replaced": the current item starts leaving
//! and a new item starts entering, and the two animate at the same time.
//!
//! # State machine (per item)
//!
//! ```text
//!   Entering ──(spring at rest)──▶ Resident
//!      │                              │
//!      └──────(key replaced)──────────┴──▶ Leaving ──(spring at rest)──▶ removed
//! ```
//!
//! # Invariants
//!
//! 1. Exactly one item is not `Leaving`: the current one.
//! 2. At most one item is `Entering` and at most one is `Leaving`, so no
//!    more than two items ever coexist.
//! 3. A replacement while an item is still leaving drops one of the two
//!    outgoing candidates at once (interrupt-and-replace); rapid changes
//!    never pile up. The more visible candidate keeps leaving, so content on
//!    screen always fades out instead of vanishing.
//! 4. An interrupted item starts leaving from wherever it currently is.
//!
//! # Failure Modes
//!
//! - A spring configured with zero friction never rests: the entering item
//!   stays `Entering` and the leaving item is only dropped by the next
//!   replacement. [`CrossfadeConfig::validate`] reports this.

use std::time::Duration;

use fadeglot_core::animation::{StyleFrame, StyleSpring};
use tracing::trace;

use crate::config::CrossfadeConfig;

/// Identity key of a transition item.
pub type Generation = u64;

/// Lifecycle phase of a transition item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    /// Animating from the entering frame toward fully visible.
    Entering,
    /// Fully visible, at rest.
    Resident,
    /// Animating toward the leaving frame; removed when it arrives.
    Leaving,
}

impl TransitionPhase {
    #[inline]
    #[must_use]
    pub fn is_animating(self) -> bool {
        !matches!(self, Self::Resident)
    }
}

/// Read-only view of one item, as rendered this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemSnapshot {
    pub key: Generation,
    pub phase: TransitionPhase,
    pub style: StyleFrame,
}

/// Keyed transition engine driven by the crossfade wrapper.
pub trait TransitionEngine {
    /// Key of the current (non-leaving) item.
    fn current_key(&self) -> Generation;

    /// Register `key` as the new content identity. Same key is a no-op.
    fn replace(&mut self, key: Generation);

    /// Advance animations by `dt`. Returns `true` while anything moves.
    fn tick(&mut self, dt: Duration) -> bool;

    /// Items to render, back to front: the leaving item (if any), then the
    /// current item.
    fn items(&self) -> Vec<ItemSnapshot>;

    /// Whether any item is still animating.
    fn is_animating(&self) -> bool {
        self.items().iter().any(|item| item.phase.is_animating())
    }
}

#[derive(Debug, Clone)]
struct Item {
    key: Generation,
    phase: TransitionPhase,
    style: StyleSpring,
}

impl Item {
    fn snapshot(&self) -> ItemSnapshot {
        ItemSnapshot {
            key: self.key,
            phase: self.phase,
            style: self.style.current(),
        }
    }
}

/// Spring-driven [`TransitionEngine`].
#[derive(Debug, Clone)]
pub struct SpringTransitions {
    config: CrossfadeConfig,
    current: Item,
    leaving: Option<Item>,
    interrupted: u64,
}

impl SpringTransitions {
    /// Start with a single item keyed `initial`.
    ///
    /// The item enters from the entering frame when
    /// [`CrossfadeConfig::animate_initial`] is set, and is resident
    /// otherwise.
    #[must_use]
    pub fn new(initial: Generation, config: CrossfadeConfig) -> Self {
        let current = if config.animate_initial && !config.reduced_motion {
            Self::entering(initial, &config)
        } else {
            Self::resident(initial, &config)
        };
        Self {
            config,
            current,
            leaving: None,
            interrupted: 0,
        }
    }

    fn entering(key: Generation, config: &CrossfadeConfig) -> Item {
        Item {
            key,
            phase: TransitionPhase::Entering,
            style: StyleSpring::new(config.spring, config.entering_frame(), StyleFrame::VISIBLE),
        }
    }

    fn resident(key: Generation, config: &CrossfadeConfig) -> Item {
        Item {
            key,
            phase: TransitionPhase::Resident,
            style: StyleSpring::settled(config.spring, StyleFrame::VISIBLE),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CrossfadeConfig {
        &self.config
    }

    /// Leaving items dropped early because a newer replacement arrived.
    #[must_use]
    pub fn interrupted(&self) -> u64 {
        self.interrupted
    }
}

impl Default for SpringTransitions {
    fn default() -> Self {
        Self::new(0, CrossfadeConfig::default())
    }
}

impl TransitionEngine for SpringTransitions {
    fn current_key(&self) -> Generation {
        self.current.key
    }

    fn replace(&mut self, key: Generation) {
        if key == self.current.key {
            return;
        }

        if self.config.reduced_motion {
            trace!(from = self.current.key, to = key, "instant swap");
            self.current = Self::resident(key, &self.config);
            self.leaving = None;
            return;
        }

        let incoming = Self::entering(key, &self.config);
        let mut outgoing = std::mem::replace(&mut self.current, incoming);
        outgoing.phase = TransitionPhase::Leaving;
        outgoing.style.retarget(self.config.leaving_frame());

        let Some(leaving) = self.leaving.take() else {
            trace!(leaving = outgoing.key, entering = key, "crossfade started");
            self.leaving = Some(outgoing);
            return;
        };

        // Only one item may leave: keep the one the user can still see.
        let keep_previous = leaving.style.current().opacity > outgoing.style.current().opacity;
        let (kept, dropped) = if keep_previous {
            (leaving, outgoing)
        } else {
            (outgoing, leaving)
        };
        self.interrupted += 1;
        trace!(
            leaving = kept.key,
            dropped = dropped.key,
            entering = key,
            "leave interrupted"
        );
        self.leaving = Some(kept);
    }

    fn tick(&mut self, dt: Duration) -> bool {
        self.current.style.tick(dt);
        if self.current.phase == TransitionPhase::Entering && self.current.style.is_at_rest() {
            self.current.phase = TransitionPhase::Resident;
            trace!(key = self.current.key, "entered");
        }

        if let Some(leaving) = self.leaving.as_mut() {
            leaving.style.tick(dt);
            if leaving.style.is_at_rest() {
                trace!(key = leaving.key, "left");
                self.leaving = None;
            }
        }

        self.is_animating()
    }

    fn items(&self) -> Vec<ItemSnapshot> {
        self.leaving
            .iter()
            .chain(std::iter::once(&self.current))
            .map(Item::snapshot)
            .collect()
    }

    fn is_animating(&self) -> bool {
        self.leaving.is_some() || self.current.phase.is_animating()
    }
}
