#![forbid(unsafe_code)]

//! Motion parameters for the locale crossfade.
//!
//! Defaults reproduce the built-in crossfade: spring tension 300, friction
//! 30, content entering 10 units below its resting place and leaving 10
//! units above it. With the `config` feature the same struct loads from TOML
//! or JSON; missing fields keep their defaults.
//!
//! ```toml
//! enter_offset = 10.0
//! leave_offset = -10.0
//! reduced_motion = false
//!
//! [spring]
//! tension = 300.0
//! friction = 30.0
//! ```

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use fadeglot_core::animation::{SpringConfig, StyleFrame};

/// Crossfade motion configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct CrossfadeConfig {
    /// Spring driving both opacity and offset.
    pub spring: SpringConfig,
    /// Vertical offset new content starts from.
    pub enter_offset: f64,
    /// Vertical offset old content ends at.
    pub leave_offset: f64,
    /// Animate the very first content in, instead of showing it at rest.
    pub animate_initial: bool,
    /// Swap content instantly, without motion.
    pub reduced_motion: bool,
}

impl Default for CrossfadeConfig {
    fn default() -> Self {
        Self {
            spring: SpringConfig::CROSSFADE,
            enter_offset: 10.0,
            leave_offset: -10.0,
            animate_initial: true,
            reduced_motion: false,
        }
    }
}

impl CrossfadeConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that never animates.
    #[must_use]
    pub fn reduced_motion() -> Self {
        Self {
            animate_initial: false,
            reduced_motion: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_spring(mut self, spring: SpringConfig) -> Self {
        self.spring = spring;
        self
    }

    /// Frame an incoming item starts from.
    #[must_use]
    pub fn entering_frame(&self) -> StyleFrame {
        StyleFrame::hidden(self.enter_offset)
    }

    /// Frame an outgoing item heads for.
    #[must_use]
    pub fn leaving_frame(&self) -> StyleFrame {
        StyleFrame::hidden(self.leave_offset)
    }

    /// Validate parameters. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(self.spring.tension.is_finite() && self.spring.tension > 0.0) {
            errors.push(format!(
                "spring.tension must be positive and finite, got {}",
                self.spring.tension
            ));
        }
        if !(self.spring.friction.is_finite() && self.spring.friction > 0.0) {
            errors.push(format!(
                "spring.friction must be positive and finite (zero never settles), got {}",
                self.spring.friction
            ));
        }
        if !self.enter_offset.is_finite() {
            errors.push(format!("enter_offset must be finite, got {}", self.enter_offset));
        }
        if !self.leave_offset.is_finite() {
            errors.push(format!("leave_offset must be finite, got {}", self.leave_offset));
        }
        errors
    }

    /// Load from a TOML string and validate.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(s)?.validated()
    }

    /// Load from a TOML file on disk and validate.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(s)?.validated()
    }

    /// Load from a JSON file on disk and validate.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    #[cfg(feature = "config")]
    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading a [`CrossfadeConfig`].
#[cfg(feature = "config")]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
