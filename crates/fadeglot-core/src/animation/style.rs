#![forbid(unsafe_code)]

//! Opacity and vertical offset animated as one unit.
//!
//! A transition item never fades without sliding or slides without fading:
//! [`StyleSpring`] owns one spring per channel and retargets both at once.
//! The item is at rest only when both channels are.

use std::time::Duration;

use super::spring::{Spring, SpringConfig};

/// Visual state of a transition item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleFrame {
    /// Opacity in [0.0, 1.0].
    pub opacity: f64,
    /// Vertical offset in layout units; positive moves content down.
    pub y_offset: f64,
}

impl StyleFrame {
    /// Fully visible, in place.
    pub const VISIBLE: Self = Self {
        opacity: 1.0,
        y_offset: 0.0,
    };

    #[must_use]
    pub const fn new(opacity: f64, y_offset: f64) -> Self {
        Self { opacity, y_offset }
    }

    /// Invisible, shifted by `y_offset`.
    #[must_use]
    pub const fn hidden(y_offset: f64) -> Self {
        Self {
            opacity: 0.0,
            y_offset,
        }
    }
}

impl Default for StyleFrame {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// Two springs moving a [`StyleFrame`] toward a target frame.
#[derive(Debug, Clone)]
pub struct StyleSpring {
    opacity: Spring,
    y_offset: Spring,
}

impl StyleSpring {
    /// Start at `from` and head for `to`.
    #[must_use]
    pub fn new(config: SpringConfig, from: StyleFrame, to: StyleFrame) -> Self {
        Self {
            opacity: config.spring(from.opacity, to.opacity),
            y_offset: config.spring(from.y_offset, to.y_offset),
        }
    }

    /// Already resting at `frame`.
    #[must_use]
    pub fn settled(config: SpringConfig, frame: StyleFrame) -> Self {
        Self {
            opacity: Spring::settled(frame.opacity)
                .with_tension(config.tension)
                .with_friction(config.friction),
            y_offset: Spring::settled(frame.y_offset)
                .with_tension(config.tension)
                .with_friction(config.friction),
        }
    }

    /// Retarget both channels from wherever they currently are.
    pub fn retarget(&mut self, to: StyleFrame) {
        self.opacity.retarget(to.opacity);
        self.y_offset.retarget(to.y_offset);
    }

    pub fn tick(&mut self, dt: Duration) {
        self.opacity.advance(dt);
        self.y_offset.advance(dt);
    }

    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.opacity.is_at_rest() && self.y_offset.is_at_rest()
    }

    /// Current frame. Opacity is clamped to [0.0, 1.0]; the offset is raw.
    #[must_use]
    pub fn current(&self) -> StyleFrame {
        StyleFrame {
            opacity: self.opacity.position().clamp(0.0, 1.0),
            y_offset: self.y_offset.position(),
        }
    }

    /// Frame the springs are heading for.
    #[must_use]
    pub fn target(&self) -> StyleFrame {
        StyleFrame {
            opacity: self.opacity.target(),
            y_offset: self.y_offset.target(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);

    #[test]
    fn both_channels_move_together() {
        let mut style = StyleSpring::new(
            SpringConfig::CROSSFADE,
            StyleFrame::hidden(10.0),
            StyleFrame::VISIBLE,
        );
        style.tick(MS_16);
        let frame = style.current();
        assert!(frame.opacity > 0.0 && frame.opacity < 1.0);
        assert!(frame.y_offset < 10.0 && frame.y_offset > 0.0);
    }

    #[test]
    fn settles_on_target() {
        let mut style = StyleSpring::new(
            SpringConfig::CROSSFADE,
            StyleFrame::VISIBLE,
            StyleFrame::hidden(-10.0),
        );
        for _ in 0..200 {
            style.tick(MS_16);
        }
        assert!(style.is_at_rest());
        assert_eq!(style.current(), StyleFrame::hidden(-10.0));
    }

    #[test]
    fn opacity_never_leaves_unit_range() {
        let mut style = StyleSpring::new(
            SpringConfig::new(300.0, 5.0),
            StyleFrame::hidden(10.0),
            StyleFrame::VISIBLE,
        );
        for _ in 0..100 {
            style.tick(MS_16);
            let opacity = style.current().opacity;
            assert!((0.0..=1.0).contains(&opacity), "opacity = {opacity}");
        }
    }

    #[test]
    fn settled_reports_rest_and_target() {
        let style = StyleSpring::settled(SpringConfig::CROSSFADE, StyleFrame::VISIBLE);
        assert!(style.is_at_rest());
        assert_eq!(style.target(), StyleFrame::VISIBLE);
    }

    #[test]
    fn retarget_mid_flight_starts_from_current() {
        let mut style = StyleSpring::new(
            SpringConfig::CROSSFADE,
            StyleFrame::hidden(10.0),
            StyleFrame::VISIBLE,
        );
        style.tick(Duration::from_millis(48));
        let before = style.current();
        style.retarget(StyleFrame::hidden(-10.0));
        assert_eq!(style.current(), before);
        assert_eq!(style.target(), StyleFrame::hidden(-10.0));
        assert!(!style.is_at_rest());
    }
}
