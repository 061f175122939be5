#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) animation.
//!
//! Transitions in fadeglot are spring-driven rather than fixed-duration:
//! the motion decelerates naturally and an interrupted spring keeps its
//! momentum when it is pointed at a new target.
//!
//!   F = -tension × (position - target) - friction × velocity
//!
//! Mass is fixed at 1, so tension and friction map directly onto the
//! stiffness and damping of the classical equation.
//!
//! # Integration
//!
//! Semi-implicit Euler. Deltas larger than 4ms are subdivided so that stiff
//! configurations stay stable at low frame rates.
//!
//! # Invariants
//!
//! 1. `value()` is the position clamped to [0.0, 1.0]; `position()` is raw.
//! 2. A spring at rest stays at rest until [`Spring::retarget`] or
//!    [`Animation::reset`] is called.
//! 3. When the spring comes to rest its position snaps exactly to target.
//! 4. Tension is at least [`MIN_TENSION`]; friction is never negative.
//!
//! # Failure Modes
//!
//! - Zero friction: the spring oscillates forever and never rests. Not an
//!   error, but transitions driven by it never complete.

use std::time::Duration;

use super::Animation;

/// Maximum dt per integration step (4ms).
const MAX_STEP_SECS: f64 = 0.004;

/// Position delta below which the spring may rest.
const DEFAULT_REST_THRESHOLD: f64 = 0.001;

/// Velocity below which (with the position check) the spring may rest.
const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.01;

/// Lower bound applied to tension.
pub const MIN_TENSION: f64 = 0.1;

/// Tension/friction pair describing how a spring moves.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpringConfig {
    /// Restoring force strength. Higher settles faster.
    pub tension: f64,
    /// Velocity drag. Higher overshoots less.
    pub friction: f64,
}

impl SpringConfig {
    /// Locale crossfade motion: tension 300, friction 30.
    ///
    /// Slightly underdamped (critical friction is ~34.6), so the content
    /// settles quickly with a barely visible overshoot.
    pub const CROSSFADE: Self = Self {
        tension: 300.0,
        friction: 30.0,
    };

    /// Low tension, high friction. Smooth and slow.
    pub const GENTLE: Self = Self {
        tension: 120.0,
        friction: 20.0,
    };

    /// High tension, near-critical friction. Snappy.
    pub const STIFF: Self = Self {
        tension: 400.0,
        friction: 38.0,
    };

    /// Very low tension, for background motion.
    pub const SLOW: Self = Self {
        tension: 50.0,
        friction: 14.0,
    };

    /// Create a config, clamping tension and friction into valid ranges.
    #[must_use]
    pub fn new(tension: f64, friction: f64) -> Self {
        Self {
            tension: tension.max(MIN_TENSION),
            friction: friction.max(0.0),
        }
    }

    /// Friction at which a spring with this tension is critically damped.
    #[must_use]
    pub fn critical_friction(&self) -> f64 {
        2.0 * self.tension.max(MIN_TENSION).sqrt()
    }

    /// Build a spring from `from` toward `to` with this configuration.
    #[must_use]
    pub fn spring(&self, from: f64, to: f64) -> Spring {
        Spring::new(from, to)
            .with_tension(self.tension)
            .with_friction(self.friction)
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::CROSSFADE
    }
}

/// A damped harmonic oscillator producing physically-based motion.
///
/// ```
/// use std::time::Duration;
/// use fadeglot_core::animation::{Animation, SpringConfig};
///
/// let mut spring = SpringConfig::CROSSFADE.spring(0.0, 1.0);
/// for _ in 0..120 {
///     spring.tick(Duration::from_millis(16));
/// }
/// assert!(spring.is_complete());
/// assert_eq!(spring.position(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    initial: f64,
    tension: f64,
    friction: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring at `initial` heading for `target`, using the
    /// crossfade configuration.
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        let config = SpringConfig::CROSSFADE;
        Self {
            position: initial,
            velocity: 0.0,
            target,
            initial,
            tension: config.tension,
            friction: config.friction,
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            at_rest: false,
        }
    }

    /// A spring already resting at `position`.
    #[must_use]
    pub fn settled(position: f64) -> Self {
        let mut spring = Self::new(position, position);
        spring.at_rest = true;
        spring
    }

    /// Set tension (builder pattern). Clamped to [`MIN_TENSION`].
    #[must_use]
    pub fn with_tension(mut self, tension: f64) -> Self {
        self.tension = tension.max(MIN_TENSION);
        self
    }

    /// Set friction (builder pattern). Clamped to 0.0.
    #[must_use]
    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction.max(0.0);
        self
    }

    /// Set the rest threshold (builder pattern).
    #[must_use]
    pub fn with_rest_threshold(mut self, threshold: f64) -> Self {
        self.rest_threshold = threshold.abs();
        self
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn tension(&self) -> f64 {
        self.tension
    }

    #[inline]
    #[must_use]
    pub fn friction(&self) -> f64 {
        self.friction
    }

    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Point the spring at a new target, keeping position and velocity.
    ///
    /// Wakes a resting spring unless it already sits on `target`.
    pub fn retarget(&mut self, target: f64) {
        self.target = target;
        if self.at_rest && (self.position - target).abs() <= self.rest_threshold {
            self.position = target;
            return;
        }
        self.at_rest = false;
    }

    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let acceleration = -self.tension * displacement - self.friction * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance by `dt`, subdividing for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }
        if (self.position - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.velocity_threshold
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    fn value(&self) -> f32 {
        (self.position as f32).clamp(0.0, 1.0)
    }

    fn reset(&mut self) {
        self.position = self.initial;
        self.velocity = 0.0;
        self.at_rest = false;
    }
}
