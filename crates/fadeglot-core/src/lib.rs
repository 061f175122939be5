#![forbid(unsafe_code)]

//! Core: spring animation primitives and logging helpers.
//!
//! # Role in fadeglot
//! `fadeglot-core` owns the motion model. Widgets never compute curves
//! themselves; they hold a [`animation::StyleSpring`] per transition item and
//! advance it with frame deltas supplied by the host loop.
//!
//! # Primary responsibilities
//! - **Animation**: the common tick/complete/value contract.
//! - **Spring**: damped harmonic oscillator with tension/friction presets.
//! - **StyleSpring**: opacity and vertical offset animated together.
//! - **Logging**: `tracing` re-exports and an optional JSON subscriber.

pub mod animation;
#[cfg(feature = "tracing")]
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
