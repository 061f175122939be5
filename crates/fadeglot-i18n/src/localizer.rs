#![forbid(unsafe_code)]

//! The localization service: active locale, translations and change events.
//!
//! [`Localizer`] is what an application holds on to. Components only see the
//! event-stream side of it through [`Localizer::events`].
//!
//! # Invariants
//!
//! 1. The active locale is always a canonical tag supported by the catalog.
//! 2. [`LANGUAGE_CHANGED`] is emitted exactly once per successful change, after
//!    the new locale is visible through [`Localizer::language`].
//! 3. Changing to the already-active locale emits nothing.

use std::cell::RefCell;
#[cfg(feature = "config")]
use std::path::Path;
use std::rc::Rc;

use tracing::{debug, info};

use crate::catalog::{I18nError, Locale, StringCatalog, interpolate, normalize_locale};
use crate::events::{EventBus, LANGUAGE_CHANGED, LocaleEvents};

/// Active locale, string catalog and the bus change events go out on.
#[derive(Debug)]
pub struct Localizer {
    catalog: StringCatalog,
    language: RefCell<Locale>,
    bus: EventBus,
}

impl Localizer {
    /// Create a localizer starting in `initial_locale`.
    pub fn new(catalog: StringCatalog, initial_locale: &str) -> Result<Self, I18nError> {
        let language = normalize_locale(initial_locale)?;
        if !catalog.supports(&language) {
            return Err(I18nError::UnknownLocale(language));
        }
        Ok(Self {
            catalog,
            language: RefCell::new(language),
            bus: EventBus::new(),
        })
    }

    /// Create a localizer from loaded configuration.
    #[cfg(feature = "config")]
    pub fn from_config(
        mut catalog: StringCatalog,
        config: &LocalizerConfig,
    ) -> Result<Self, I18nError> {
        let chain = config
            .fallback_chain
            .iter()
            .map(|tag| normalize_locale(tag))
            .collect::<Result<Vec<_>, _>>()?;
        catalog.set_fallback_chain(chain);
        Self::new(catalog, &config.default_locale)
    }

    /// Currently active locale tag.
    #[must_use]
    pub fn language(&self) -> Locale {
        self.language.borrow().clone()
    }

    #[must_use]
    pub fn catalog(&self) -> &StringCatalog {
        &self.catalog
    }

    /// Translate `key` in the active locale. Missing keys translate to
    /// themselves so untranslated UI stays legible.
    #[must_use]
    pub fn t(&self, key: &str) -> String {
        let language = self.language.borrow();
        self.catalog
            .get(&language, key)
            .map_or_else(|| key.to_owned(), str::to_owned)
    }

    /// Translate with `{name}` interpolation.
    #[must_use]
    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        let language = self.language.borrow();
        let template = self.catalog.get(&language, key).unwrap_or(key);
        interpolate(template, args)
    }

    /// Switch the active locale.
    ///
    /// Returns `Ok(true)` when the locale changed and listeners were
    /// notified, `Ok(false)` when `tag` was already active.
    pub fn change_language(&self, tag: &str) -> Result<bool, I18nError> {
        let next = normalize_locale(tag)?;
        if !self.catalog.supports(&next) {
            return Err(I18nError::UnknownLocale(next));
        }
        {
            let mut current = self.language.borrow_mut();
            if *current == next {
                debug!(locale = %next, "language unchanged");
                return Ok(false);
            }
            info!(from = %current, to = %next, "language changed");
            *current = next.clone();
        }
        self.bus.emit(LANGUAGE_CHANGED, &next);
        Ok(true)
    }

    /// Event stream handle for components.
    #[must_use]
    pub fn events(&self) -> Rc<dyn LocaleEvents> {
        Rc::new(self.bus.clone())
    }

    /// Number of listeners waiting for language changes.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.bus.listener_count(LANGUAGE_CHANGED)
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Localizer settings loadable from TOML or JSON.
///
/// ```toml
/// default_locale = "en"
/// fallback_chain = ["en"]
/// ```
#[cfg(feature = "config")]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LocalizerConfig {
    pub default_locale: String,
    pub fallback_chain: Vec<String>,
}

#[cfg(feature = "config")]
impl Default for LocalizerConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".into(),
            fallback_chain: vec!["en".into()],
        }
    }
}

#[cfg(feature = "config")]
impl LocalizerConfig {
    /// Validate tags. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if normalize_locale(&self.default_locale).is_err() {
            errors.push(format!(
                "default_locale is not a valid locale tag: {:?}",
                self.default_locale
            ));
        }
        for tag in &self.fallback_chain {
            if normalize_locale(tag).is_err() {
                errors.push(format!("fallback_chain entry is not a valid locale tag: {tag:?}"));
            }
        }
        errors
    }

    /// Load from a TOML string and validate.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(s)?.validated()
    }

    /// Load from a TOML file on disk and validate.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(s)?.validated()
    }

    /// Load from a JSON file on disk and validate.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading a [`LocalizerConfig`].
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LocaleStrings;
    use std::cell::Cell;

    fn localizer() -> Localizer {
        let mut catalog = StringCatalog::new();
        catalog.add_locale(
            "en",
            LocaleStrings::new()
                .with("title", "Devices")
                .with("count", "{n} online"),
        );
        catalog.add_locale("de", LocaleStrings::new().with("title", "Geräte"));
        catalog.set_fallback_chain(vec!["en".into()]);
        Localizer::new(catalog, "en").unwrap()
    }

    #[test]
    fn rejects_unsupported_initial_locale() {
        let err = Localizer::new(StringCatalog::new(), "en").unwrap_err();
        assert!(matches!(err, I18nError::UnknownLocale(l) if l == "en"));
    }

    #[test]
    fn translates_in_active_locale() {
        let l10n = localizer();
        assert_eq!(l10n.t("title"), "Devices");
        l10n.change_language("de").unwrap();
        assert_eq!(l10n.t("title"), "Geräte");
        assert_eq!(l10n.t_with("count", &[("n", "3")]), "3 online");
        assert_eq!(l10n.t("nope"), "nope");
    }

    #[test]
    fn change_emits_once_with_new_tag() {
        let l10n = localizer();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        l10n.events()
            .subscribe(
                LANGUAGE_CHANGED,
                Rc::new(move |tag: &str| sink.borrow_mut().push(tag.to_owned())),
            )
            .unwrap();

        assert!(l10n.change_language("DE").unwrap());
        assert_eq!(*seen.borrow(), vec!["de"]);
    }

    #[test]
    fn no_op_change_emits_nothing() {
        let l10n = localizer();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        l10n.events()
            .subscribe(LANGUAGE_CHANGED, Rc::new(move |_: &str| counter.set(counter.get() + 1)))
            .unwrap();

        assert!(!l10n.change_language("en").unwrap());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn listener_sees_new_language() {
        let l10n = Rc::new(localizer());
        let observed = Rc::new(RefCell::new(String::new()));
        let weak = Rc::downgrade(&l10n);
        let sink = Rc::clone(&observed);
        l10n.events()
            .subscribe(
                LANGUAGE_CHANGED,
                Rc::new(move |_: &str| {
                    if let Some(l10n) = weak.upgrade() {
                        *sink.borrow_mut() = l10n.t("title");
                    }
                }),
            )
            .unwrap();

        l10n.change_language("de").unwrap();
        assert_eq!(*observed.borrow(), "Geräte");
    }

    #[test]
    fn unknown_or_invalid_locale_is_an_error() {
        let l10n = localizer();
        assert!(matches!(
            l10n.change_language("fr"),
            Err(I18nError::UnknownLocale(_))
        ));
        assert!(matches!(
            l10n.change_language("??"),
            Err(I18nError::InvalidLocale(_))
        ));
        assert_eq!(l10n.language(), "en");
    }

    #[cfg(feature = "config")]
    #[test]
    fn config_from_toml_and_json() {
        let toml = LocalizerConfig::from_toml_str("default_locale = \"de\"").unwrap();
        assert_eq!(toml.default_locale, "de");
        assert_eq!(toml.fallback_chain, vec!["en"]);

        let json = LocalizerConfig::from_json_str(r#"{"fallback_chain": ["de", "en"]}"#).unwrap();
        assert_eq!(json.default_locale, "en");
        assert_eq!(json.fallback_chain, vec!["de", "en"]);

        assert!(matches!(
            LocalizerConfig::from_toml_str("default_locale = 3"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            LocalizerConfig::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[cfg(feature = "config")]
    #[test]
    fn config_rejects_malformed_tags() {
        let toml = r#"
            default_locale = "en--US"
            fallback_chain = [""]
        "#;
        let err = LocalizerConfig::from_toml_str(toml).unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2, "{errors:?}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(feature = "config")]
    #[test]
    fn config_from_json_file_and_missing_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_locale": "fr_ca", "fallback_chain": ["fr", "en"]}}"#).unwrap();
        let config = LocalizerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.default_locale, "fr_ca");
        assert_eq!(config.fallback_chain, vec!["fr", "en"]);

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            LocalizerConfig::from_json_file(dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn non_canonical_catalog_keys_are_reachable() {
        let mut catalog = StringCatalog::new();
        catalog.add_locale("en", LocaleStrings::new().with("title", "Devices"));
        catalog.add_locale("en_us", LocaleStrings::new().with("title", "Devices (US)"));
        let l10n = Localizer::new(catalog, "en").unwrap();

        assert!(l10n.change_language("en_US").unwrap());
        assert_eq!(l10n.language(), "en-US");
        assert_eq!(l10n.t("title"), "Devices (US)");
    }

    #[cfg(feature = "config")]
    #[test]
    fn config_from_file_builds_localizer() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_locale = \"de\"\nfallback_chain = [\"en\"]").unwrap();
        let config = LocalizerConfig::from_toml_file(file.path()).unwrap();

        let mut catalog = StringCatalog::new();
        catalog.add_locale("en", LocaleStrings::new().with("title", "Devices"));
        catalog.add_locale("de", LocaleStrings::new());
        let l10n = Localizer::from_config(catalog, &config).unwrap();
        assert_eq!(l10n.language(), "de");
        assert_eq!(l10n.t("title"), "Devices");
    }
}
