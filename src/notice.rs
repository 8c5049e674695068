//! User-visible notices (the site's toasts and alerts).
//!
//! A notice is shown immediately and dismissed on its own once `expires_at`
//! passes; nothing waits on it.

use crate::i18n::{Locale, LocaleStrings};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Why a notice was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// A rent control referenced an id that is not in the catalog
    EquipmentNotFound,
    /// A rent control carried no equipment id
    ContactDirectly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub locale: Locale,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

impl Notice {
    /// Build a notice localized for `locale`, expiring `ttl` after `now`.
    pub fn new(kind: NoticeKind, locale: Locale, now: DateTime<Utc>, ttl: Duration) -> Self {
        let strings = LocaleStrings::for_locale(locale);
        let message = match kind {
            NoticeKind::EquipmentNotFound => strings.equipment_not_found,
            NoticeKind::ContactDirectly => strings.contact_directly,
        };

        Self {
            kind,
            locale,
            message: message.to_string(),
            expires_at: now
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_notice_is_localized() {
        let notice = Notice::new(
            NoticeKind::EquipmentNotFound,
            Locale::En,
            t0(),
            Duration::seconds(5),
        );
        assert_eq!(notice.message, "Equipment not found. Please try again.");

        let notice = Notice::new(
            NoticeKind::ContactDirectly,
            Locale::Ar,
            t0(),
            Duration::seconds(5),
        );
        assert_eq!(notice.message, "يرجى الاتصال بنا مباشرة لهذه المعدات");
    }

    #[test]
    fn test_notice_expiry() {
        let notice = Notice::new(
            NoticeKind::EquipmentNotFound,
            Locale::En,
            t0(),
            Duration::seconds(5),
        );
        assert!(!notice.is_expired(t0() + Duration::seconds(4)));
        assert!(notice.is_expired(t0() + Duration::seconds(5)));
    }

    #[test]
    fn test_notice_with_huge_ttl_never_expires() {
        let notice = Notice::new(
            NoticeKind::EquipmentNotFound,
            Locale::En,
            t0(),
            Duration::MAX,
        );
        assert_eq!(notice.expires_at, DateTime::<Utc>::MAX_UTC);
        assert!(!notice.is_expired(t0() + Duration::days(365)));
    }
}
