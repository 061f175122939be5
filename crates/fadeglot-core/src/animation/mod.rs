#![forbid(unsafe_code)]

//! Animation primitives.
//!
//! Everything here is driven by explicit frame deltas: nothing reads a clock,
//! so a given sequence of `tick` calls always produces the same values.

pub mod spring;
pub mod style;

use std::time::Duration;

pub use spring::{Spring, SpringConfig};
pub use style::{StyleFrame, StyleSpring};

/// A value that progresses over time toward completion.
///
/// # Invariants
///
/// 1. `value()` is always within [0.0, 1.0].
/// 2. Once `is_complete()` is true, further ticks leave `value()` unchanged
///    until `reset()` (or an implementation-specific retarget) is called.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has settled.
    fn is_complete(&self) -> bool;

    /// Normalized progress value in [0.0, 1.0].
    fn value(&self) -> f32;

    /// Return to the initial state.
    fn reset(&mut self);
}
