//! Typed document model the site's features operate on.
//!
//! A `Page` is an arena of elements loaded from JSON markup. Elements keep
//! their attributes as a string map, the way page templates ship them; the
//! features parse what they need once at setup and keep typed tables keyed by
//! [`ElementId`] instead of re-reading attributes on every event.

use crate::error::SiteError;
use crate::i18n::Direction;
use crate::notice::Notice;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable handle to an element in a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(usize);

/// Element tag names the features care about; everything else is `Other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Body,
    #[default]
    Div,
    Section,
    Nav,
    Span,
    P,
    H1,
    H2,
    H3,
    H4,
    A,
    Button,
    Input,
    Textarea,
    Img,
    #[serde(other)]
    Other,
}

impl Tag {
    /// Elements that can receive keyboard focus.
    pub fn is_focusable(&self) -> bool {
        matches!(self, Tag::A | Tag::Button | Tag::Input | Tag::Textarea)
    }
}

/// Serialized markup: one element and its subtree.
///
/// Attributes other than `tag`, `id`, `class`, `text` and `children` are kept
/// verbatim (e.g. `"data-en"`, `"data-equipment-id"`, `"href"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markup {
    #[serde(default)]
    pub tag: Tag,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Space-separated class list
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class: String,

    /// Direct text of the element (its own text nodes)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,

    #[serde(flatten)]
    pub attrs: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Markup>,
}

impl Markup {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class = class.to_string();
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_child(mut self, child: Markup) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    pub tag: Tag,
    pub dom_id: Option<String>,
    classes: Vec<String>,
    text: String,
    attrs: BTreeMap<String, String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attached: bool,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// The element's own text, excluding descendants.
    pub fn own_text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// False once the element was removed by a `set_text_content` on an ancestor.
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

/// The document: element arena plus document-level state.
#[derive(Debug, Clone)]
pub struct Page {
    elements: Vec<Element>,
    root: ElementId,
    lang: String,
    dir: Direction,
    scroll_locked: bool,
    focused: Option<ElementId>,
    notices: Vec<Notice>,
}

impl Page {
    /// Build a page whose root (the body) is `markup`.
    pub fn from_markup(markup: Markup) -> Self {
        let mut page = Self {
            elements: Vec::new(),
            root: ElementId(0),
            lang: String::new(),
            dir: Direction::Ltr,
            scroll_locked: false,
            focused: None,
            notices: Vec::new(),
        };
        page.root = page.insert(None, markup);
        page
    }

    /// Parse JSON markup into a page.
    pub fn from_json(json: &str) -> Result<Self, SiteError> {
        let markup: Markup = serde_json::from_str(json)?;
        Ok(Self::from_markup(markup))
    }

    fn insert(&mut self, parent: Option<ElementId>, markup: Markup) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Element {
            tag: markup.tag,
            dom_id: markup.id,
            classes: markup.class.split_whitespace().map(str::to_string).collect(),
            text: markup.text,
            attrs: markup.attrs,
            parent,
            children: Vec::new(),
            attached: true,
        });

        for child in markup.children {
            let child_id = self.insert(Some(id), child);
            self.elements[id.0].children.push(child_id);
        }

        id
    }

    /// Append `markup` as the last child of `parent`.
    pub fn append(&mut self, parent: ElementId, markup: Markup) -> ElementId {
        let id = self.insert(Some(parent), markup);
        self.elements[parent.0].children.push(id);
        id
    }

    /// Serialize the attached subtree at `id` back to markup.
    pub fn to_markup(&self, id: ElementId) -> Markup {
        let element = self.get(id);
        Markup {
            tag: element.tag,
            id: element.dom_id.clone(),
            class: element.classes.join(" "),
            text: element.text.clone(),
            attrs: element.attrs.clone(),
            children: element
                .children
                .iter()
                .map(|child| self.to_markup(*child))
                .collect(),
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn get(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }

    fn get_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.0]
    }

    // ==================== Traversal ====================

    /// Attached descendants of `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.get(id).children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.get(next).children.iter().rev().copied());
        }
        out
    }

    /// Every attached element in document order, root first.
    pub fn all(&self) -> Vec<ElementId> {
        let mut out = vec![self.root];
        out.extend(self.descendants(self.root));
        out
    }

    /// `id` followed by its ancestors up to the root.
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::successors(Some(id), move |current| self.get(*current).parent)
    }

    /// True if `id` is `ancestor` or lies inside it.
    pub fn contains(&self, ancestor: ElementId, id: ElementId) -> bool {
        self.ancestors(id).any(|candidate| candidate == ancestor)
    }

    pub fn find_by_dom_id(&self, dom_id: &str) -> Option<ElementId> {
        self.all()
            .into_iter()
            .find(|id| self.get(*id).dom_id.as_deref() == Some(dom_id))
    }

    pub fn find_by_class(&self, class: &str) -> Vec<ElementId> {
        self.all()
            .into_iter()
            .filter(|id| self.get(*id).has_class(class))
            .collect()
    }

    /// First element with `class` inside `scope` (excluding `scope`).
    pub fn find_in(&self, scope: ElementId, class: &str) -> Option<ElementId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.get(*id).has_class(class))
    }

    // ==================== Content ====================

    /// Concatenated text of the element and its attached descendants.
    pub fn text_content(&self, id: ElementId) -> String {
        let mut text = self.get(id).text.clone();
        for child in &self.get(id).children {
            text.push_str(&self.text_content(*child));
        }
        text
    }

    /// Replace the element's content with `text`, removing all of its children.
    pub fn set_text_content(&mut self, id: ElementId, text: &str) {
        let removed = self.descendants(id);
        for gone in &removed {
            self.get_mut(*gone).attached = false;
        }
        if self.focused.is_some_and(|focused| removed.contains(&focused)) {
            self.focused = None;
        }

        let element = self.get_mut(id);
        element.children.clear();
        element.text = text.to_string();
    }

    pub fn set_attr(&mut self, id: ElementId, name: &str, value: &str) {
        self.get_mut(id)
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.get(id).has_class(class)
    }

    /// Add or remove `class` so that its presence equals `on`.
    pub fn toggle_class(&mut self, id: ElementId, class: &str, on: bool) {
        let element = self.get_mut(id);
        let present = element.has_class(class);
        if on && !present {
            element.classes.push(class.to_string());
        } else if !on && present {
            element.classes.retain(|c| c != class);
        }
    }

    // ==================== Document State ====================

    /// The document root `lang` attribute.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn dir(&self) -> Direction {
        self.dir
    }

    pub fn set_lang(&mut self, lang: &str, dir: Direction) {
        self.lang = lang.to_string();
        self.dir = dir;
    }

    /// True while background scrolling is suppressed.
    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    pub fn focus(&mut self, id: ElementId) {
        self.focused = Some(id);
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    // ==================== Notices ====================

    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drop notices whose display time has elapsed.
    pub fn prune_notices(&mut self, now: DateTime<Utc>) {
        self.notices.retain(|notice| !notice.is_expired(now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> Page {
        Page::from_json(
            r#"{
                "tag": "body",
                "children": [
                    {"tag": "h1", "class": "hero-title", "text": "Title"},
                    {"tag": "div", "id": "card", "class": "card", "children": [
                        {"tag": "span", "text": "A"},
                        {"tag": "span", "text": "B", "data-en": "B", "data-ar": "ب"}
                    ]},
                    {"tag": "marquee", "text": "legacy"}
                ]
            }"#,
        )
        .expect("Should parse")
    }

    // ==================== Loading Tests ====================

    #[test]
    fn test_from_json_builds_tree() {
        let page = sample_page();
        assert_eq!(page.get(page.root()).tag, Tag::Body);
        assert_eq!(page.all().len(), 6);
    }

    #[test]
    fn test_unknown_tag_maps_to_other() {
        let page = sample_page();
        let last = *page.get(page.root()).children().last().unwrap();
        assert_eq!(page.get(last).tag, Tag::Other);
    }

    #[test]
    fn test_attributes_are_kept() {
        let page = sample_page();
        let card = page.find_by_dom_id("card").unwrap();
        let b = page.get(card).children()[1];
        assert_eq!(page.get(b).attr("data-ar"), Some("ب"));
        assert!(page.get(b).has_attr("data-en"));
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Page::from_json("{not json").is_err());
    }

    // ==================== Traversal Tests ====================

    #[test]
    fn test_descendants_document_order() {
        let page = sample_page();
        let texts: Vec<String> = page
            .descendants(page.root())
            .into_iter()
            .map(|id| page.get(id).own_text().to_string())
            .collect();
        assert_eq!(texts, vec!["Title", "", "A", "B", "legacy"]);
    }

    #[test]
    fn test_contains_and_ancestors() {
        let page = sample_page();
        let card = page.find_by_dom_id("card").unwrap();
        let a = page.get(card).children()[0];
        assert!(page.contains(card, a));
        assert!(page.contains(page.root(), a));
        assert!(!page.contains(a, card));
        assert_eq!(page.ancestors(a).count(), 3);
    }

    #[test]
    fn test_find_by_class() {
        let page = sample_page();
        assert_eq!(page.find_by_class("card").len(), 1);
        assert!(page.find_by_class("missing").is_empty());
    }

    // ==================== Content Tests ====================

    #[test]
    fn test_text_content_concatenates() {
        let page = sample_page();
        let card = page.find_by_dom_id("card").unwrap();
        assert_eq!(page.text_content(card), "AB");
    }

    #[test]
    fn test_set_text_content_detaches_children() {
        let mut page = sample_page();
        let card = page.find_by_dom_id("card").unwrap();
        let a = page.get(card).children()[0];
        page.focus(a);

        page.set_text_content(card, "replaced");

        assert_eq!(page.text_content(card), "replaced");
        assert!(!page.get(a).is_attached());
        assert!(page.focused().is_none());
        assert_eq!(page.all().len(), 4);
    }

    #[test]
    fn test_toggle_class() {
        let mut page = sample_page();
        let root = page.root();
        page.toggle_class(root, "rtl-layout", true);
        page.toggle_class(root, "rtl-layout", true);
        assert_eq!(page.get(root).classes(), ["rtl-layout".to_string()]);
        page.toggle_class(root, "rtl-layout", false);
        assert!(!page.has_class(root, "rtl-layout"));
    }

    #[test]
    fn test_append_and_round_trip_markup() {
        let mut page = sample_page();
        let root = page.root();
        let added = page.append(root, Markup::new(Tag::A).with_class("x").with_attr("href", "#"));
        assert_eq!(page.find_by_class("x"), vec![added]);

        let markup = page.to_markup(root);
        assert_eq!(markup.children.len(), 4);
        assert_eq!(markup.children[3].attrs.get("href").map(String::as_str), Some("#"));
    }
}
