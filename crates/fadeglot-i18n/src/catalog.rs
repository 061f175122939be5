#![forbid(unsafe_code)]

//! String catalog with locale fallback and interpolation.
//!
//! # Lookup order
//!
//! `get("pt-BR", key)` tries `pt-BR`, then the base language `pt`, then each
//! locale of the fallback chain in order. Each locale is tried at most once.
//! Stored tags are canonical (see [`normalize_locale`]); lookups expect
//! canonical tags too, which is what the [`Localizer`](crate::Localizer)
//! passes.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing key | Key not in any locale | Returns `None` |
//! | Missing locale | Locale not loaded | Falls through chain |
//! | Bad interpolation arg | `{name}` but no `name` arg | Token left as-is |
//! | Malformed tag | Empty or non-alphanumeric segment | `I18nError::InvalidLocale` |

use std::collections::HashMap;

/// Canonical locale tag (e.g., `"en"`, `"en-US"`).
pub type Locale = String;

/// Errors from localization operations.
#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    /// A locale string was malformed.
    #[error("invalid locale: {0:?}")]
    InvalidLocale(String),
    /// The locale is well formed but the catalog has no strings for it.
    #[error("no strings loaded for locale '{0}'")]
    UnknownLocale(String),
}

/// Validate a locale tag and bring it into canonical form.
///
/// Underscores become hyphens, the language subtag is lowercased and a
/// two-letter region subtag is uppercased: `"EN_us"` becomes `"en-US"`.
pub fn normalize_locale(tag: &str) -> Result<Locale, I18nError> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return Err(I18nError::InvalidLocale(tag.to_owned()));
    }
    let mut out = Vec::new();
    for (i, part) in trimmed.split(['-', '_']).enumerate() {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(I18nError::InvalidLocale(tag.to_owned()));
        }
        let canonical = match i {
            0 => part.to_ascii_lowercase(),
            _ if part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()) => {
                part.to_ascii_uppercase()
            }
            _ => part.to_owned(),
        };
        out.push(canonical);
    }
    Ok(out.join("-"))
}

/// Canonical form of `tag`, or `tag` unchanged when it is malformed.
fn canonical(tag: String) -> Locale {
    normalize_locale(&tag).unwrap_or(tag)
}

/// Base language of a canonical tag: `"en-US"` -> `"en"`.
fn base_language(locale: &str) -> Option<&str> {
    locale.split_once('-').map(|(base, _)| base)
}

/// Strings for a single locale.
#[derive(Debug, Clone, Default)]
pub struct LocaleStrings {
    strings: HashMap<String, String>,
}

impl LocaleStrings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a string.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Central string catalog with locale fallback.
///
/// ```
/// use fadeglot_i18n::{LocaleStrings, StringCatalog};
///
/// let mut catalog = StringCatalog::new();
/// catalog.add_locale("en", LocaleStrings::new().with("welcome", "Welcome, {name}!"));
/// catalog.add_locale("en-GB", LocaleStrings::new().with("colour", "Colour"));
/// catalog.set_fallback_chain(vec!["en".into()]);
///
/// assert_eq!(catalog.get("en-GB", "colour"), Some("Colour"));
/// assert_eq!(
///     catalog.format("en-GB", "welcome", &[("name", "Ada")]),
///     Some("Welcome, Ada!".into())
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringCatalog {
    locales: HashMap<Locale, LocaleStrings>,
    fallback_chain: Vec<Locale>,
}

impl StringCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add strings for a locale, merging into any strings already present.
    ///
    /// The tag is stored in canonical form, so `"en_us"` and `"en-US"` name
    /// the same locale.
    pub fn add_locale(&mut self, locale: impl Into<String>, strings: LocaleStrings) {
        let entry = self.locales.entry(canonical(locale.into())).or_default();
        entry.strings.extend(strings.strings);
    }

    /// Set the chain of locales tried after the requested one. Tags are
    /// canonicalized like [`add_locale`](Self::add_locale) keys.
    pub fn set_fallback_chain(&mut self, chain: Vec<Locale>) {
        self.fallback_chain = chain.into_iter().map(canonical).collect();
    }

    #[must_use]
    pub fn fallback_chain(&self) -> &[Locale] {
        &self.fallback_chain
    }

    /// Whether strings were loaded for exactly this canonical tag.
    #[must_use]
    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }

    /// Whether `locale` or its base language has strings.
    #[must_use]
    pub fn supports(&self, locale: &str) -> bool {
        self.has_locale(locale) || base_language(locale).is_some_and(|b| self.has_locale(b))
    }

    /// Look up a string, walking locale, base language, then fallbacks.
    #[must_use]
    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        let mut tried: Vec<&str> = Vec::with_capacity(2 + self.fallback_chain.len());
        let candidates = std::iter::once(locale)
            .chain(base_language(locale))
            .chain(self.fallback_chain.iter().map(String::as_str));
        for candidate in candidates {
            if tried.contains(&candidate) {
                continue;
            }
            tried.push(candidate);
            if let Some(value) = self.locales.get(candidate).and_then(|ls| ls.get(key)) {
                return Some(value);
            }
        }
        None
    }

    /// Look up a string and perform `{name}` interpolation.
    #[must_use]
    pub fn format(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> Option<String> {
        self.get(locale, key).map(|template| interpolate(template, args))
    }

    /// All registered locale tags, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

/// Single-pass `{name}` interpolation. Unmatched tokens left as-is.
pub(crate) fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match args.iter().find(|(k, _)| *k == name) {
                    Some((_, value)) => result.push_str(value),
                    None => {
                        result.push('{');
                        result.push_str(name);
                        result.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                result.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}
