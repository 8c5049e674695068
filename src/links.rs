//! Outbound deep links: prefilled chat messages and email drafts.
//!
//! The escaping matches JavaScript's `encodeURIComponent` byte for byte, since
//! chat and mail clients on the receiving side were built against it.

use crate::catalog::EquipmentId;
use crate::config::Config;
use crate::i18n::{fill, Locale, LocaleStrings};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

/// Characters `encodeURIComponent` leaves alone, besides ASCII alphanumerics.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode one URI component.
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// `https://<domain>/<number>?text=<message>`
pub fn chat_link(config: &Config, message: &str) -> String {
    format!(
        "https://{}/{}?text={}",
        config.chat_domain,
        config.chat_number,
        encode_component(message)
    )
}

/// `https://<domain>/<number>` with no prefilled text.
pub fn chat_home_link(config: &Config) -> String {
    format!("https://{}/{}", config.chat_domain, config.chat_number)
}

/// `mailto:<address>?subject=<subject>&body=<body>`
pub fn email_link(config: &Config, subject: &str, body: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        config.inquiry_email,
        encode_component(subject),
        encode_component(body)
    )
}

/// The pair of links written into the inquiry dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InquiryLinks {
    pub chat: String,
    pub email: String,
}

impl InquiryLinks {
    /// Compose both links for one equipment item in `locale`.
    pub fn compose(config: &Config, locale: Locale, name: &str, id: &EquipmentId) -> Self {
        let strings = LocaleStrings::for_locale(locale);
        let values = [("name", name), ("id", id.as_str())];

        let message = fill(strings.chat_message, &values);
        let subject = fill(strings.email_subject, &values);
        let body = fill(strings.email_body, &values);

        Self {
            chat: chat_link(config, &message),
            email: email_link(config, &subject, &body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;

    fn decode(s: &str) -> String {
        percent_decode_str(s).decode_utf8().unwrap().to_string()
    }

    fn query_param<'a>(link: &'a str, name: &str) -> &'a str {
        let query = link.split_once('?').unwrap().1;
        query
            .split('&')
            .find_map(|pair| pair.strip_prefix(&format!("{}=", name)))
            .unwrap()
    }

    // ==================== Encoding Tests ====================

    #[test]
    fn test_encode_matches_encode_uri_component() {
        // encodeURIComponent("a b&c=d/e?f#g") === "a%20b%26c%3Dd%2Fe%3Ff%23g"
        assert_eq!(encode_component("a b&c=d/e?f#g"), "a%20b%26c%3Dd%2Fe%3Ff%23g");
        // Unreserved marks pass through
        assert_eq!(encode_component("-_.!~*'()"), "-_.!~*'()");
    }

    #[test]
    fn test_encode_newlines_and_colons() {
        assert_eq!(encode_component("Details:\n- Location:"), "Details%3A%0A-%20Location%3A");
    }

    #[test]
    fn test_encode_arabic_utf8() {
        // encodeURIComponent("رفع") === "%D8%B1%D9%81%D8%B9"
        assert_eq!(encode_component("رفع"), "%D8%B1%D9%81%D8%B9");
    }

    // ==================== Link Format Tests ====================

    #[test]
    fn test_chat_link_format() {
        let config = Config::default();
        assert_eq!(
            chat_link(&config, "hi there"),
            "https://wa.me/966534672153?text=hi%20there"
        );
        assert_eq!(chat_home_link(&config), "https://wa.me/966534672153");
    }

    #[test]
    fn test_email_link_format() {
        let config = Config::default();
        assert_eq!(
            email_link(&config, "A&B", "x\ny"),
            "mailto:globalrafe@gmail.com?subject=A%26B&body=x%0Ay"
        );
    }

    // ==================== Composition Tests ====================

    #[test]
    fn test_compose_english_mobile_cranes() {
        let links = InquiryLinks::compose(
            &Config::default(),
            Locale::En,
            "Mobile Cranes",
            &EquipmentId::from(3),
        );

        assert!(links.chat.starts_with("https://wa.me/966534672153?text="));
        assert_eq!(
            decode(query_param(&links.chat, "text")),
            "Hello Rafe Global, I'm interested in renting: Mobile Cranes (Equipment ID: 3)"
        );
        assert!(links.email.starts_with("mailto:globalrafe@gmail.com?"));
        assert_eq!(
            decode(query_param(&links.email, "subject")),
            "Rental Inquiry: Mobile Cranes"
        );
        assert!(decode(query_param(&links.email, "body"))
            .starts_with("I'm interested in renting Mobile Cranes (Equipment ID: 3)."));
    }

    #[test]
    fn test_compose_arabic() {
        let links = InquiryLinks::compose(
            &Config::default(),
            Locale::Ar,
            "كرينات متنقلة",
            &EquipmentId::from(3),
        );
        assert_eq!(
            decode(query_param(&links.chat, "text")),
            "مرحبًا رفع العالمية، أنا مهتم بتأجير: كرينات متنقلة (رقم المعدة: 3)"
        );
        assert_eq!(
            decode(query_param(&links.email, "subject")),
            "استفسار تأجير: كرينات متنقلة"
        );
    }

    #[test]
    fn test_compose_keeps_braces_in_name_verbatim() {
        let links = InquiryLinks::compose(
            &Config::default(),
            Locale::En,
            "Crane {id} XL",
            &EquipmentId::from(3),
        );
        assert_eq!(
            decode(query_param(&links.chat, "text")),
            "Hello Rafe Global, I'm interested in renting: Crane {id} XL (Equipment ID: 3)"
        );
        assert_eq!(
            decode(query_param(&links.email, "subject")),
            "Rental Inquiry: Crane {id} XL"
        );
    }

    #[test]
    fn test_compose_escapes_reserved_characters_in_name() {
        let links = InquiryLinks::compose(
            &Config::default(),
            Locale::En,
            "Lifts & Hoists",
            &EquipmentId::from("x?y"),
        );
        // A raw '&' would split the query
        assert_eq!(links.email.matches('&').count(), 1);
        assert!(decode(query_param(&links.email, "subject")).ends_with("Lifts & Hoists"));
        assert!(!query_param(&links.chat, "text").contains('?'));
    }
}
