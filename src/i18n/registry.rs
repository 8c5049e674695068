//! Locale registry: static metadata for every supported locale.
//!
//! Initialized once on first access through `OnceLock` and immutable thereafter.

use crate::i18n::{Direction, Locale};
use std::sync::OnceLock;

/// Metadata for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// The locale this entry describes
    pub locale: Locale,

    /// English name of the language (e.g., "Arabic"), used in logs
    pub name: &'static str,

    /// Native name, the accessible label of the locale switch controls (e.g., "العربية")
    pub native_name: &'static str,

    /// Text direction for the document root
    pub direction: Direction,
}

/// Global locale registry singleton.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Get the configuration of a locale.
    ///
    /// Every `Locale` variant has an entry, so this lookup is total.
    pub fn config(&self, locale: Locale) -> &LocaleConfig {
        self.locales
            .iter()
            .find(|config| config.locale == locale)
            .unwrap_or_else(|| unreachable!("locale {} missing from registry", locale.code()))
    }

    /// Get a locale configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales
            .iter()
            .find(|config| config.locale.code() == code)
    }
}

fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            locale: Locale::Ar,
            name: "Arabic",
            native_name: "العربية",
            direction: Direction::Rtl,
        },
        LocaleConfig {
            locale: Locale::En,
            name: "English",
            native_name: "English",
            direction: Direction::Ltr,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LocaleRegistry::get();
        let registry2 = LocaleRegistry::get();
        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_every_locale_is_registered() {
        let registry = LocaleRegistry::get();
        for locale in Locale::ALL {
            assert_eq!(registry.config(locale).locale, locale);
            assert_eq!(registry.get_by_code(locale.code()).unwrap().locale, locale);
        }
    }

    #[test]
    fn test_get_by_code_arabic() {
        let config = LocaleRegistry::get().get_by_code("ar").unwrap();
        assert_eq!(config.name, "Arabic");
        assert_eq!(config.native_name, "العربية");
        assert_eq!(config.direction, Direction::Rtl);
    }

    #[test]
    fn test_get_by_code_nonexistent() {
        assert!(LocaleRegistry::get().get_by_code("es").is_none());
    }
}
