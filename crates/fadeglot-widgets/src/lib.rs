#![forbid(unsafe_code)]

//! Locale-aware widgets for fadeglot.
//!
//! The centerpiece is [`LocaleCrossfade`]: wrap any content in it and the
//! content crossfades (fade plus a short vertical slide) every time the
//! display language changes, without the parent re-keying anything.
//!
//! # Layers
//! - [`transition`]: keyed item list with entering/resident/leaving phases.
//! - [`element`]: the rendered container handed back to the host.
//! - [`config`]: motion parameters, loadable from TOML/JSON.
//! - [`crossfade`]: subscription lifecycle and generation counter.

pub mod config;
pub mod crossfade;
pub mod element;
pub mod transition;

pub use config::CrossfadeConfig;
#[cfg(feature = "config")]
pub use config::ConfigError;
pub use crossfade::{CrossfadeError, CrossfadeProps, LocaleCrossfade};
pub use element::{AnimatedItem, Container};
pub use transition::{
    Generation, ItemSnapshot, SpringTransitions, TransitionEngine, TransitionPhase,
};
