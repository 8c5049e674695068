//! Localized user-facing strings and message templates.
//!
//! Templates use `{name}` style placeholders filled by [`fill`]. Every template
//! must carry the same placeholder set in both locales; the markup validator
//! checks this at bootstrap.

use crate::i18n::Locale;
use regex::{Captures, Regex};
use std::sync::OnceLock;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Matches a `{placeholder}` and captures its name.
pub(crate) fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").unwrap())
}

/// All localized strings for one locale
#[derive(Debug, Clone)]
pub struct LocaleStrings {
    // ==================== Inquiry Templates ====================
    /// Prefilled chat message.
    /// Placeholders: {name}, {id}
    pub chat_message: &'static str,

    /// Email subject.
    /// Placeholders: {name}
    pub email_subject: &'static str,

    /// Email body with blanks for project location, duration and requirements.
    /// Placeholders: {name}, {id}
    pub email_body: &'static str,

    // ==================== Notices ====================
    /// Shown when a rent control references an id missing from the catalog
    pub equipment_not_found: &'static str,

    /// Shown when a rent control carries no equipment id at all
    pub contact_directly: &'static str,

    // ==================== Floating Chat Button ====================
    /// Title and tooltip of the floating chat button
    pub chat_button_title: &'static str,

    // ==================== Inquiry Dialog ====================
    /// Accessible label of the dialog close control
    pub close_label: &'static str,

    /// Chat link text of the built-in dialog
    pub chat_link_label: &'static str,

    /// Email link text of the built-in dialog
    pub email_link_label: &'static str,
}

impl LocaleStrings {
    /// Get the strings for a locale.
    pub fn for_locale(locale: Locale) -> &'static LocaleStrings {
        match locale {
            Locale::Ar => &ARABIC_STRINGS,
            Locale::En => &ENGLISH_STRINGS,
        }
    }

    /// Every template paired with its field name, for validation.
    pub fn templates(&self) -> [(&'static str, &'static str); 3] {
        [
            ("chat_message", self.chat_message),
            ("email_subject", self.email_subject),
            ("email_body", self.email_body),
        ]
    }
}

/// Replace each `{key}` in `template` with its value in a single pass.
///
/// Values are inserted verbatim: placeholders inside a value are not expanded.
/// Unknown placeholders are left as they are.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(key, _)| *key == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

// ==================== English Strings ====================

pub const ENGLISH_STRINGS: LocaleStrings = LocaleStrings {
    chat_message: "Hello Rafe Global, I'm interested in renting: {name} (Equipment ID: {id})",
    email_subject: "Rental Inquiry: {name}",
    email_body: "I'm interested in renting {name} (Equipment ID: {id}). Please send me more information.\n\n\
Project Details:\n\
- Location:\n\
- Duration:\n\
- Special Requirements:",

    equipment_not_found: "Equipment not found. Please try again.",
    contact_directly: "Please contact us directly for this equipment",

    chat_button_title: "Chat with us on WhatsApp",
    close_label: "Close",
    chat_link_label: "WhatsApp",
    email_link_label: "Email",
};

// ==================== Arabic Strings ====================

pub const ARABIC_STRINGS: LocaleStrings = LocaleStrings {
    chat_message: "مرحبًا رفع العالمية، أنا مهتم بتأجير: {name} (رقم المعدة: {id})",
    email_subject: "استفسار تأجير: {name}",
    email_body: "أنا مهتم بتأجير {name} (رقم المعدة: {id}). يرجى إرسال المزيد من المعلومات.\n\n\
تفاصيل المشروع:\n\
- الموقع:\n\
- المدة:\n\
- المتطلبات الخاصة:",

    equipment_not_found: "لم يتم العثور على المعدات. يرجى المحاولة مرة أخرى",
    contact_directly: "يرجى الاتصال بنا مباشرة لهذه المعدات",

    chat_button_title: "تواصل معنا على واتساب",
    close_label: "إغلاق",
    chat_link_label: "واتساب",
    email_link_label: "البريد الإلكتروني",
};
