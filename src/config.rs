use crate::error::SiteError;
use crate::i18n::Locale;
use anyhow::{Context, Result};
use chrono::Duration;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    // Outbound contact channels
    pub chat_domain: String,
    pub chat_number: String,
    pub inquiry_email: String,

    // Localization
    pub default_locale: Locale,
    pub storage_key: String,
    pub preferences_file: String,

    // Interaction timing
    pub debounce_window_ms: u64,
    pub notice_ttl_secs: u64,
}

/// Longest accepted debounce window.
pub const MAX_DEBOUNCE_WINDOW_MS: u64 = 10_000;

/// Longest accepted notice display time.
pub const MAX_NOTICE_TTL_SECS: u64 = 3_600;

static DIGITS_REGEX: OnceLock<Regex> = OnceLock::new();
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let default_locale = match std::env::var("DEFAULT_LOCALE") {
            Ok(code) => Locale::from_code(&code).context("DEFAULT_LOCALE is not a supported locale")?,
            Err(_) => defaults.default_locale,
        };

        let config = Self {
            chat_domain: std::env::var("CHAT_DOMAIN").unwrap_or(defaults.chat_domain),
            chat_number: std::env::var("CHAT_NUMBER").unwrap_or(defaults.chat_number),
            inquiry_email: std::env::var("INQUIRY_EMAIL").unwrap_or(defaults.inquiry_email),

            default_locale,
            storage_key: std::env::var("LANGUAGE_STORAGE_KEY").unwrap_or(defaults.storage_key),
            preferences_file: std::env::var("PREFERENCES_FILE")
                .unwrap_or(defaults.preferences_file),

            debounce_window_ms: std::env::var("DEBOUNCE_WINDOW_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.debounce_window_ms),
            notice_ttl_secs: std::env::var("NOTICE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.notice_ttl_secs),
        };

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    /// Reject values that would produce broken deep links or a dead debounce.
    pub fn validate(&self) -> Result<(), SiteError> {
        let digits = DIGITS_REGEX.get_or_init(|| Regex::new(r"^[0-9]{6,15}$").unwrap());
        let email =
            EMAIL_REGEX.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

        if self.chat_domain.trim().is_empty() || self.chat_domain.contains('/') {
            return Err(SiteError::Config(format!(
                "chat domain must be a bare host, got '{}'",
                self.chat_domain
            )));
        }
        if !digits.is_match(&self.chat_number) {
            return Err(SiteError::Config(format!(
                "chat number must be 6-15 digits without '+', got '{}'",
                self.chat_number
            )));
        }
        if !email.is_match(&self.inquiry_email) {
            return Err(SiteError::Config(format!(
                "inquiry email is not an address: '{}'",
                self.inquiry_email
            )));
        }
        if self.storage_key.trim().is_empty() {
            return Err(SiteError::Config("storage key must not be empty".into()));
        }
        if self.debounce_window_ms == 0 || self.debounce_window_ms > MAX_DEBOUNCE_WINDOW_MS {
            return Err(SiteError::Config(format!(
                "debounce window must be 1-{} ms, got {}",
                MAX_DEBOUNCE_WINDOW_MS, self.debounce_window_ms
            )));
        }
        if self.notice_ttl_secs > MAX_NOTICE_TTL_SECS {
            return Err(SiteError::Config(format!(
                "notice ttl must be at most {} s, got {}",
                MAX_NOTICE_TTL_SECS, self.notice_ttl_secs
            )));
        }
        Ok(())
    }

    /// The debounce window, clamped to `MAX_DEBOUNCE_WINDOW_MS` for
    /// configs built without `validate()`.
    pub fn debounce_window(&self) -> Duration {
        let ms = self.debounce_window_ms.min(MAX_DEBOUNCE_WINDOW_MS);
        i64::try_from(ms)
            .ok()
            .and_then(Duration::try_milliseconds)
            .unwrap_or_else(|| Duration::milliseconds(MAX_DEBOUNCE_WINDOW_MS as i64))
    }

    /// The notice display time, clamped to `MAX_NOTICE_TTL_SECS`.
    pub fn notice_ttl(&self) -> Duration {
        let secs = self.notice_ttl_secs.min(MAX_NOTICE_TTL_SECS);
        i64::try_from(secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or_else(|| Duration::seconds(MAX_NOTICE_TTL_SECS as i64))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chat_domain: "wa.me".to_string(),
            chat_number: "966534672153".to_string(),
            inquiry_email: "globalrafe@gmail.com".to_string(),
            default_locale: Locale::En,
            storage_key: "rafe_language".to_string(),
            preferences_file: ".rafe_preferences.json".to_string(),
            debounce_window_ms: 300,
            notice_ttl_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.debounce_window(), Duration::milliseconds(300));
        assert_eq!(config.default_locale, Locale::En);
    }

    #[test]
    fn test_rejects_plus_prefixed_number() {
        let config = Config {
            chat_number: "+966534672153".to_string(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("chat number"));
    }

    #[test]
    fn test_rejects_bad_email() {
        let config = Config {
            inquiry_email: "globalrafe".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_domain_with_path() {
        let config = Config {
            chat_domain: "wa.me/966".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_debounce() {
        let config = Config {
            debounce_window_ms: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_debounce() {
        let config = Config {
            debounce_window_ms: u64::MAX,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("debounce window"));
        // Unvalidated configs still get a positive window
        assert_eq!(
            config.debounce_window(),
            Duration::milliseconds(MAX_DEBOUNCE_WINDOW_MS as i64)
        );
    }

    #[test]
    fn test_rejects_oversized_notice_ttl() {
        let config = Config {
            notice_ttl_secs: 9_000_000_000_000,
            ..Config::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(config.notice_ttl(), Duration::seconds(MAX_NOTICE_TTL_SECS as i64));
    }

    #[test]
    fn test_accepts_limits() {
        let config = Config {
            debounce_window_ms: MAX_DEBOUNCE_WINDOW_MS,
            notice_ttl_secs: MAX_NOTICE_TTL_SECS,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_storage_key() {
        let config = Config {
            storage_key: " ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
