#![forbid(unsafe_code)]

//! Localization service and locale-change event stream for fadeglot.
//!
//! # Role in fadeglot
//! Components never reach for a global localization singleton. They receive
//! an `Rc<dyn LocaleEvents>` and subscribe to [`LANGUAGE_CHANGED`] through
//! it, which lets tests hand them a [`testing::RecordingEvents`] double
//! instead of a live [`Localizer`].
//!
//! # How it fits in the system
//! `fadeglot-widgets` depends on the [`LocaleEvents`] capability only. The
//! [`Localizer`] is the production implementation: it owns the string
//! catalog, the active locale and the [`EventBus`] it emits on.

pub mod catalog;
pub mod events;
pub mod localizer;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use catalog::{I18nError, Locale, LocaleStrings, StringCatalog, normalize_locale};
pub use events::{EventBus, LANGUAGE_CHANGED, Listener, ListenerId, LocaleEvents, SubscribeError};
pub use localizer::Localizer;
#[cfg(feature = "config")]
pub use localizer::{ConfigError, LocalizerConfig};
