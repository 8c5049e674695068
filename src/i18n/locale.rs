//! Locale type: the two languages the site is published in.
//!
//! The set is closed (Arabic and English), so unlike an open registry of
//! language codes this is a plain enum. Metadata such as display names lives in
//! the registry and is reached through [`Locale::config`].

use crate::error::SiteError;
use crate::i18n::{LocaleConfig, LocaleRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Text direction of a locale, written to the document root as `dir`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    /// The `dir` attribute value ("ltr" / "rtl").
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

/// A supported locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Ar,
    En,
}

impl Locale {
    /// All supported locales, in switcher order.
    pub const ALL: [Locale; 2] = [Locale::Ar, Locale::En];

    /// Parse a locale code ("ar" / "en"), case-insensitively.
    ///
    /// # Returns
    /// * `Ok(Locale)` for a supported code
    /// * `Err(SiteError::UnknownLocale)` otherwise
    pub fn from_code(code: &str) -> Result<Locale, SiteError> {
        LocaleRegistry::get()
            .get_by_code(&code.trim().to_ascii_lowercase())
            .map(|config| config.locale)
            .ok_or_else(|| SiteError::UnknownLocale(code.to_string()))
    }

    /// Match a user-agent language tag against the supported locales.
    ///
    /// Only the primary subtag is compared, so "ar-SA", "en_GB.UTF-8" and "EN"
    /// all match. Returns `None` when the primary subtag is not supported.
    pub fn negotiate(tag: &str) -> Option<Locale> {
        let primary = tag.split(['-', '_', '.']).next().unwrap_or_default();
        Locale::from_code(primary).ok()
    }

    /// The ISO 639-1 code ("ar" / "en").
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Ar => "ar",
            Locale::En => "en",
        }
    }

    /// The other supported locale, used as the rendering fallback.
    pub fn other(&self) -> Locale {
        match self {
            Locale::Ar => Locale::En,
            Locale::En => Locale::Ar,
        }
    }

    pub fn direction(&self) -> Direction {
        self.config().direction
    }

    pub fn is_rtl(&self) -> bool {
        self.direction() == Direction::Rtl
    }

    /// Registry metadata for this locale.
    pub fn config(&self) -> &'static LocaleConfig {
        LocaleRegistry::get().config(*self)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::from_code(s)
    }
}
