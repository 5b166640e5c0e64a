//! Interface locale preference, kept in durable per-origin storage.

use std::fmt;
use std::str::FromStr;

use aula_store::KeyValueStore;

/// Durable storage key of the preferred locale.
pub const LOCALE_KEY: &str = "locale";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Es,
    Ca,
    Eu,
}

impl Locale {
    pub const ALL: [Locale; 4] = [Locale::En, Locale::Es, Locale::Ca, Locale::Eu];

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
            Locale::Ca => "ca",
            Locale::Eu => "eu",
        }
    }

    /// Supported locale for a navigator language tag (`es-ES` → `es`).
    pub fn from_language_tag(tag: &str) -> Option<Locale> {
        let primary = tag.split(['-', '_']).next()?;
        primary.parse().ok()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocaleError {
    #[error("unsupported locale '{0}' (supported: en, es, ca, eu)")]
    Unsupported(String),
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Locale::ALL
            .into_iter()
            .find(|l| l.code() == lower)
            .ok_or_else(|| LocaleError::Unsupported(s.to_string()))
    }
}

/// Locale to start with: the stored preference, else the navigator
/// language if supported, else English.
pub fn initial_locale(store: &dyn KeyValueStore, navigator_language: Option<&str>) -> Locale {
    if let Some(stored) = store.get(LOCALE_KEY) {
        match stored.parse() {
            Ok(locale) => return locale,
            Err(e) => tracing::debug!(error = %e, "ignoring stored locale"),
        }
    }
    navigator_language
        .and_then(Locale::from_language_tag)
        .unwrap_or_default()
}

/// Switch locale and persist the preference.
pub fn change_locale(store: &dyn KeyValueStore, locale: Locale) -> anyhow::Result<()> {
    store.set(LOCALE_KEY, locale.code())?;
    tracing::debug!(%locale, "locale preference saved");
    Ok(())
}
