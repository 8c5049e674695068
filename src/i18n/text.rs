//! Paired Arabic/English text with fallback resolution.

use crate::i18n::Locale;
use serde::{Deserialize, Serialize};

/// A string available in both locales.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub ar: String,
    pub en: String,
}

impl LocalizedText {
    pub fn new(ar: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            ar: ar.into(),
            en: en.into(),
        }
    }

    /// The raw string stored for `locale`, possibly blank.
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Ar => &self.ar,
            Locale::En => &self.en,
        }
    }

    /// The string to display for `locale`.
    ///
    /// Falls back to the other locale when the requested one is blank.
    /// Returns `None` when both are blank so callers leave prior content alone.
    pub fn resolve(&self, locale: Locale) -> Option<&str> {
        [locale, locale.other()]
            .into_iter()
            .map(|candidate| self.get(candidate))
            .find(|text| !text.trim().is_empty())
    }

    /// True if the string for `locale` is blank.
    pub fn is_blank(&self, locale: Locale) -> bool {
        self.get(locale).trim().is_empty()
    }

    /// True if every locale has a non-blank string.
    pub fn is_complete(&self) -> bool {
        Locale::ALL.iter().all(|locale| !self.is_blank(*locale))
    }
}
