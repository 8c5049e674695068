//! Floating chat button pinned to every page.

use crate::config::Config;
use crate::i18n::{Locale, LocaleStrings, LocalizedText};
use crate::links::chat_home_link;
use crate::localization::LocaleObserver;
use crate::page::{ElementId, Markup, Page, Tag};
use tracing::{debug, info};

pub const CONTAINER_CLASS: &str = "whatsapp-container";
pub const FLOAT_CLASS: &str = "whatsapp-float";
pub const TOOLTIP_CLASS: &str = "whatsapp-tooltip";

pub struct ChatButton {
    link: ElementId,
    tooltip: Option<ElementId>,
    tooltip_text: LocalizedText,
}

impl ChatButton {
    /// Use the page's floating button, creating one if the page has none.
    pub fn mount(page: &mut Page, config: &Config, locale: Locale) -> Self {
        if page.find_by_class(CONTAINER_CLASS).is_empty() {
            debug!("No floating chat button in markup, creating one");
            let body = page.root();
            page.append(body, floating_button_markup(config, locale));
        }

        let link = match page.find_by_class(FLOAT_CLASS).first() {
            Some(link) => *link,
            None => {
                // A container without the link itself: add the link to it
                let container = page.find_by_class(CONTAINER_CLASS)[0];
                page.append(container, float_link_markup(config, locale))
            }
        };

        // Only the first tooltip span is localized; the number span is not
        let tooltip = page.find_in(link, TOOLTIP_CLASS).and_then(|tooltip| {
            page.get(tooltip)
                .children()
                .iter()
                .copied()
                .find(|child| page.get(*child).tag == Tag::Span)
        });

        let tooltip_text = tooltip
            .and_then(|span| {
                let element = page.get(span);
                Some(LocalizedText::new(
                    element.attr("data-ar")?,
                    element.attr("data-en")?,
                ))
            })
            .unwrap_or_else(default_title);

        info!("Floating chat button set up");
        Self {
            link,
            tooltip,
            tooltip_text,
        }
    }

    /// Log clicks on the button. Returns true if `target` is inside it.
    pub fn handle_click(&self, page: &Page, target: ElementId) -> bool {
        if !page.contains(self.link, target) {
            return false;
        }
        info!(target: "rafe_site::analytics", "Chat button clicked");
        true
    }

    pub fn link(&self) -> ElementId {
        self.link
    }
}

impl LocaleObserver for ChatButton {
    fn locale_changed(&mut self, page: &mut Page, locale: Locale) {
        let title = LocaleStrings::for_locale(locale).chat_button_title;
        page.set_attr(self.link, "title", title);

        if let Some(span) = self.tooltip.filter(|span| page.get(*span).is_attached()) {
            if let Some(text) = self.tooltip_text.resolve(locale) {
                page.set_text_content(span, text);
            }
        }
    }
}

fn default_title() -> LocalizedText {
    LocalizedText::new(
        LocaleStrings::for_locale(Locale::Ar).chat_button_title,
        LocaleStrings::for_locale(Locale::En).chat_button_title,
    )
}

fn float_link_markup(config: &Config, locale: Locale) -> Markup {
    let titles = default_title();
    let title = titles.get(locale);

    Markup::new(Tag::A)
        .with_class(FLOAT_CLASS)
        .with_attr("href", &chat_home_link(config))
        .with_attr("target", "_blank")
        .with_attr("rel", "noopener noreferrer")
        .with_attr("aria-label", "WhatsApp")
        .with_attr("title", title)
        .with_child(Markup::new(Tag::Div).with_class("whatsapp-icon-wrapper"))
        .with_child(
            Markup::new(Tag::Div)
                .with_class(TOOLTIP_CLASS)
                .with_child(
                    Markup::new(Tag::Span)
                        .with_attr("data-en", &titles.en)
                        .with_attr("data-ar", &titles.ar)
                        .with_text(title),
                )
                .with_child(
                    Markup::new(Tag::Span)
                        .with_class("whatsapp-number")
                        .with_text(&format!("+{}", config.chat_number)),
                ),
        )
}

fn floating_button_markup(config: &Config, locale: Locale) -> Markup {
    Markup::new(Tag::Div)
        .with_class(CONTAINER_CLASS)
        .with_child(float_link_markup(config, locale))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tooltip_text(page: &Page, button: &ChatButton) -> String {
        let tooltip = page.find_in(button.link(), TOOLTIP_CLASS).unwrap();
        let span = page.get(tooltip).children()[0];
        page.text_content(span)
    }

    #[test]
    fn test_creates_button_when_missing() {
        let mut page = Page::from_json(r#"{"tag": "body"}"#).unwrap();
        let button = ChatButton::mount(&mut page, &Config::default(), Locale::En);

        let link = page.get(button.link());
        assert_eq!(link.attr("href"), Some("https://wa.me/966534672153"));
        assert_eq!(link.attr("title"), Some("Chat with us on WhatsApp"));
        assert_eq!(tooltip_text(&page, &button), "Chat with us on WhatsApp");
        assert_eq!(page.find_by_class("whatsapp-number").len(), 1);
    }

    #[test]
    fn test_reuses_existing_button() {
        let mut page = Page::from_json(
            r#"{"tag": "body", "children": [
                {"tag": "div", "class": "whatsapp-container", "children": [
                    {"tag": "a", "id": "float", "class": "whatsapp-float", "href": "https://wa.me/+966534672153", "children": [
                        {"tag": "div", "class": "whatsapp-tooltip", "children": [
                            {"tag": "span", "data-en": "Talk to us", "data-ar": "تحدث معنا", "text": "Talk to us"}
                        ]}
                    ]}
                ]}
            ]}"#,
        )
        .unwrap();
        let mut button = ChatButton::mount(&mut page, &Config::default(), Locale::En);

        assert_eq!(page.find_by_class(CONTAINER_CLASS).len(), 1);
        assert_eq!(Some(button.link()), page.find_by_dom_id("float"));

        button.locale_changed(&mut page, Locale::Ar);
        assert_eq!(tooltip_text(&page, &button), "تحدث معنا");
        assert_eq!(
            page.get(button.link()).attr("title"),
            Some("تواصل معنا على واتساب")
        );
    }

    #[test]
    fn test_click_inside_button() {
        let mut page = Page::from_json(r#"{"tag": "body", "children": [{"tag": "p", "id": "p"}]}"#).unwrap();
        let button = ChatButton::mount(&mut page, &Config::default(), Locale::En);

        let tooltip = page.find_in(button.link(), TOOLTIP_CLASS).unwrap();
        assert!(button.handle_click(&page, tooltip));
        assert!(!button.handle_click(&page, page.find_by_dom_id("p").unwrap()));
    }
}
